//! 연료전지 사이징 평가 파이프라인.
//!
//! 출력 감소 → 출력/기생손실 → 다중 스택 → 연료 소비 → 배터리 → 케이블 →
//! 디젤 비교 → 연료전지 비용 → 재무 비교 → 물류 순으로 한 번만 계산한다.
//! 엔진은 계수 테이블만 들고 있으며 호출 간에 상태를 남기지 않는다.

pub mod battery;
pub mod cable;
pub mod derating;
pub mod fuel;
pub mod power;
pub mod request;

use std::borrow::Cow;

use thiserror::Error;

use crate::catalog::{FuelCellCatalog, FuelCellId, FuelCellSpec};
use crate::constants::ModelConstants;
use crate::economics::{
    analyze_diesel, analyze_fuel_cell_costs, assess_asset, compare_financials, AssetAssessment,
    AssetRecommendation, AssetRequest, DieselInput, FinancialInput, PaybackStatus,
};
use crate::logistics::plan_logistics;

pub use battery::{size_battery, BatteryInput, BatterySizing};
pub use cable::{size_cable, CableSizing};
pub use derating::{derating_factor, DeratingInput};
pub use fuel::{fuel_consumption, FuelConsumption};
pub use power::{power_budget, resolve_stacks, PowerBudget, StackConfiguration};
pub use request::{
    validate_spec, GeneratorParameters, HydrogenParameters, SiteParameters, SizingRequest,
    SystemVoltage,
};

/// 사이징 계산 오류. 입력이 같으면 항상 같은 오류가 나므로 재시도 대상이 아니다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    /// 허용 범위를 벗어난 입력. 첫 번째 위반 항목만 보고한다.
    #[error("입력 오류 [{field}]: {reason}")]
    Validation {
        field: &'static str,
        reason: Cow<'static, str>,
    },
    /// 카탈로그에 없는 연료전지 id.
    #[error("연료전지 id {id}를 카탈로그에서 찾을 수 없습니다.")]
    NotFound { id: FuelCellId },
    /// 감소 계수와 기생손실이 모듈 출력을 모두 잠식한 경우.
    #[error("모듈 1기의 감소 후 출력이 {single_unit_output_kw} kW로 0 이하입니다.")]
    ArithmeticDegenerate { single_unit_output_kw: f64 },
    /// 올림한 개수가 정수로 정확히 표현되지 않을 만큼 큰 경우.
    #[error("{quantity} 값 {value}이(가) 표현 가능한 개수 범위를 넘습니다.")]
    CountOutOfRange { quantity: &'static str, value: f64 },
}

/// f64가 정수를 정확히 표현하는 상한 (2^53).
pub const MAX_EXACT_COUNT: u64 = 1 << 53;

/// 올림한 개수를 정수로 바꾼다. 음수는 0으로 본다.
///
/// 유한하지 않거나 `MAX_EXACT_COUNT`를 넘으면 잘라내지 않고 오류를 낸다.
pub fn checked_count(quantity: &'static str, value: f64) -> Result<u64, SizingError> {
    let value = value.ceil();
    if !value.is_finite() || value > MAX_EXACT_COUNT as f64 {
        return Err(SizingError::CountOutOfRange { quantity, value });
    }
    Ok(value.max(0.0) as u64)
}

impl SizingError {
    pub fn validation(field: &'static str, reason: impl Into<Cow<'static, str>>) -> Self {
        SizingError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// 검증 오류라면 해당 항목 이름.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SizingError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// 한 번의 평가로 만들어지는 전체 결과. 반올림하지 않은 값이다.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub derating_factor: f64,
    pub power: PowerBudget,
    pub stacks: StackConfiguration,
    pub fuel: FuelConsumption,
    pub battery: BatterySizing,
    pub cable: CableSizing,

    pub dg_capacity_kw: f64,
    pub dg_load_factor: f64,
    pub dg_fuel_consumption_hourly: f64,
    pub dg_fuel_with_theft: f64,
    pub dg_daily_cost: f64,
    pub dg_annual_cost: f64,
    /// 디젤 연간 CO2 배출량 = 연료전지 전환 시 회피량 [kg/yr]
    pub co2_emissions: f64,

    pub fc_fuel_cost_base: f64,
    pub fc_daily_cost: f64,
    pub fc_annual_cost: f64,

    pub daily_savings: f64,
    pub annual_savings: f64,
    pub fc_capex: f64,
    pub capex_difference: f64,
    pub payback_years: Option<f64>,
    pub payback_status: PaybackStatus,

    pub total_h2_required: f64,
    pub cylinders_required: u64,
    pub bundles_required: u64,

    /// 모듈 1기 정격 출력 [kW]
    pub fc_rated_power: f64,
}

/// 상태 없는 평가기. 계수 테이블을 주입받는다.
#[derive(Debug, Clone, Default)]
pub struct SizingEngine {
    constants: ModelConstants,
}

impl SizingEngine {
    /// 계수 테이블을 검증한 뒤 평가기를 만든다.
    pub fn new(constants: ModelConstants) -> Result<Self, SizingError> {
        constants.validate()?;
        Ok(Self { constants })
    }

    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }

    /// 요청 검증 → 카탈로그 조회 → 평가를 한 번에 수행한다.
    pub fn calculate(
        &self,
        request: &SizingRequest,
        catalog: &dyn FuelCellCatalog,
    ) -> Result<CalculationResult, SizingError> {
        let (site, generator, hydrogen) = request.split()?;
        let spec = catalog
            .get_fuel_cell_spec(request.fuel_cell_id)
            .ok_or(SizingError::NotFound {
                id: request.fuel_cell_id,
            })?;
        log::debug!(
            "연료전지 {} ({})로 평가합니다.",
            spec.id,
            spec.display_name()
        );
        self.evaluate(&site, &generator, &hydrogen, &spec)
    }

    /// 기존 디젤 발전기의 부하율과 연수로 처리 방안을 진단한다.
    pub fn assess_asset(&self, request: &AssetRequest) -> Result<AssetAssessment, SizingError> {
        request.validate()?;
        let k = &self.constants;
        let a = assess_asset(request, &k.diesel, &k.asset, &k.time);
        log::debug!(
            "발전기 {:.1} kW, 부하율 {:.1}% → {}",
            a.dg_capacity_kw,
            a.load_factor,
            a.recommendation
        );
        if a.recommendation == AssetRecommendation::Support {
            log::warn!("발전기 부하율 {:.0}%로 여유가 없습니다.", a.load_factor);
        }
        Ok(a)
    }

    /// 검증된 파라미터로 전체 파이프라인을 평가한다.
    pub fn evaluate(
        &self,
        site: &SiteParameters,
        generator: &GeneratorParameters,
        hydrogen: &HydrogenParameters,
        spec: &FuelCellSpec,
    ) -> Result<CalculationResult, SizingError> {
        validate_spec(spec)?;
        let k = &self.constants;
        let load_kw = site.load_kw;
        let volts = site.system_voltage.volts();

        let factor = derating_factor(
            DeratingInput {
                max_temperature_c: site.max_temperature,
                altitude_m: site.altitude,
            },
            &k.derating,
        );
        let power = power_budget(load_kw, factor, spec.parasitic_loss_rate);
        let stacks = resolve_stacks(load_kw, spec.rated_power_kw, factor, spec.parasitic_loss_rate)?;
        log::debug!(
            "감소 계수 {factor:.3}, 모듈당 {:.2} kW, {}기 필요",
            stacks.single_unit_derated_output,
            stacks.required_stack_count
        );
        if stacks.is_undersized {
            log::warn!(
                "총 감소 후 출력 {:.2} kW가 부하 {load_kw:.2} kW에 못 미칩니다.",
                stacks.total_derated_power
            );
        }

        let fuel = fuel_consumption(
            power.gross_power_required,
            spec.efficiency,
            spec.lhv,
            k.time.hours_per_day,
        );
        let battery = size_battery(
            BatteryInput {
                load_kw,
                buffer_hours: site.battery_buffer_hours,
                dod: site.battery_dod,
                system_voltage: volts,
            },
            &k.electrical,
        )?;
        let cable = size_cable(load_kw, volts, &k.electrical);

        let diesel = analyze_diesel(
            DieselInput {
                load_kw,
                capacity_kva: generator.dg_capacity_kva,
                diesel_price: generator.diesel_price,
                pilferage_factor: generator.pilferage_factor,
            },
            &k.diesel,
            &k.time,
        );
        if diesel.load_factor > 100.0 {
            log::warn!(
                "디젤 발전기 부하율이 {:.0}%로 용량을 초과합니다.",
                diesel.load_factor
            );
        }
        let fc_costs = analyze_fuel_cell_costs(
            fuel.hourly_kg,
            hydrogen.h2_price,
            hydrogen.logistics_cost_pct,
            &k.fuel_cell,
            &k.time,
        );

        let fc_capex =
            spec.capex_per_kw * spec.rated_power_kw * stacks.required_stack_count as f64;
        let financial = compare_financials(
            FinancialInput {
                dg_daily_cost: diesel.daily_cost,
                fc_daily_cost: fc_costs.daily_cost,
                fc_capex,
                dg_capex: generator.dg_capex,
            },
            &k.payback,
            &k.time,
        );
        if financial.payback_status == PaybackStatus::DieselFavorable {
            log::warn!(
                "연료전지 운전비가 디젤보다 하루 {:.2}$ 더 듭니다.",
                -financial.daily_savings
            );
        }

        let logistics = plan_logistics(
            fuel.hourly_kg,
            site.refueling_cycle_days,
            &k.logistics,
            &k.time,
        )?;
        log::debug!(
            "보급 주기당 수소 {:.1} kg, 실린더 {}개",
            logistics.total_h2_required,
            logistics.cylinders_required
        );

        Ok(CalculationResult {
            derating_factor: factor,
            power,
            stacks,
            fuel,
            battery,
            cable,
            dg_capacity_kw: diesel.capacity_kw,
            dg_load_factor: diesel.load_factor,
            dg_fuel_consumption_hourly: diesel.fuel_consumption_hourly,
            dg_fuel_with_theft: diesel.fuel_with_theft,
            dg_daily_cost: diesel.daily_cost,
            dg_annual_cost: diesel.annual_cost,
            co2_emissions: diesel.co2_emissions_kg,
            fc_fuel_cost_base: fc_costs.fuel_cost_base,
            fc_daily_cost: fc_costs.daily_cost,
            fc_annual_cost: fc_costs.annual_cost,
            daily_savings: financial.daily_savings,
            annual_savings: financial.annual_savings,
            fc_capex,
            capex_difference: financial.capex_difference,
            payback_years: financial.payback_years,
            payback_status: financial.payback_status,
            total_h2_required: logistics.total_h2_required,
            cylinders_required: logistics.cylinders_required,
            bundles_required: logistics.bundles_required,
            fc_rated_power: spec.rated_power_kw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BuiltInCatalog, StackKind};

    fn spec() -> FuelCellSpec {
        FuelCellSpec::new(1, "Test", "T-5", StackKind::Pemfc, 5.0, 50.0)
    }

    #[test]
    fn unknown_id_is_not_found() {
        let engine = SizingEngine::default();
        let req = SizingRequest::new(4.0, 999, 8.0);
        let err = engine.calculate(&req, &BuiltInCatalog::new()).unwrap_err();
        assert_eq!(err, SizingError::NotFound { id: 999 });
    }

    #[test]
    fn validation_happens_before_lookup() {
        let engine = SizingEngine::default();
        let req = SizingRequest::new(-1.0, 999, 8.0);
        let err = engine.calculate(&req, &BuiltInCatalog::new()).unwrap_err();
        assert_eq!(err.field(), Some("loadKw"));
    }

    #[test]
    fn degenerate_unit_output_is_reported() {
        let engine = SizingEngine::default();
        let (site, generator, h2) = SizingRequest::new(4.0, 1, 8.0).split().expect("valid");
        let mut s = spec();
        s.parasitic_loss_rate = 1.2;
        let err = engine.evaluate(&site, &generator, &h2, &s).unwrap_err();
        assert!(matches!(err, SizingError::ArithmeticDegenerate { .. }));
    }

    #[test]
    fn savings_identity_holds() {
        let engine = SizingEngine::default();
        let (site, generator, h2) = SizingRequest::new(4.0, 1, 8.0).split().expect("valid");
        let r = engine.evaluate(&site, &generator, &h2, &spec()).expect("evaluate");
        assert_eq!(r.annual_savings, r.daily_savings * 365.0);
        assert_eq!(r.fc_capex, 3000.0 * 5.0);
    }

    #[test]
    fn invalid_constants_are_rejected_up_front() {
        let mut k = ModelConstants::default();
        k.electrical.cable_ampacity_a_per_mm2 = 0.0;
        assert!(SizingEngine::new(k).is_err());
    }

    #[test]
    fn asset_assessment_uses_injected_bands() {
        let mut k = ModelConstants::default();
        k.asset.low_load_pct = 20.0;
        let engine = SizingEngine::new(k).expect("constants");
        // 20 kVA → 16 kW, 4 kW → 25 %: 기본 구간이면 이전, 여기서는 유지
        let a = engine
            .assess_asset(&AssetRequest::new(20.0, 4.0, 12.0))
            .expect("assess");
        assert_eq!(a.recommendation, AssetRecommendation::Keep);
        let err = engine
            .assess_asset(&AssetRequest::new(20.0, 0.0, 12.0))
            .unwrap_err();
        assert_eq!(err.field(), Some("loadKw"));
    }

    #[test]
    fn counts_are_converted_without_saturating() {
        assert_eq!(checked_count("strings", 2.1), Ok(3));
        assert_eq!(checked_count("strings", 13_333_333_333.4), Ok(13_333_333_334));
        assert!(matches!(
            checked_count("strings", 1e18),
            Err(SizingError::CountOutOfRange { quantity: "strings", .. })
        ));
        assert!(checked_count("strings", f64::INFINITY).is_err());
    }

    #[test]
    fn huge_site_keeps_exact_counts() {
        // 1 GW, 24 V, DoD 0.5, 24 h 버퍼, 60일 보급 주기
        let engine = SizingEngine::default();
        let mut req = SizingRequest::new(1e9, 1, 8.0);
        req.system_voltage = 24.0;
        req.battery_dod = 0.5;
        req.battery_buffer_hours = 24.0;
        req.refueling_cycle_days = 60.0;
        let (site, generator, h2) = req.split().expect("valid");
        let r = engine.evaluate(&site, &generator, &h2, &spec()).expect("evaluate");
        assert_eq!(r.battery.strings, 13_333_333_334);
        assert!(r.cylinders_required > u64::from(u32::MAX));
        assert_eq!(
            r.bundles_required,
            r.cylinders_required.div_ceil(12)
        );
    }
}
