//! 기존 디젤 발전기 자산 진단.
//!
//! 정격 대비 부하율과 사용 연수로 교체/이전/유지/보강 중 하나를 권고하고,
//! 저부하 운전으로 버려지는 연료와 비용을 추정한다.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{AssetConstants, DieselConstants, TimeConstants};
use crate::sizing::request::{check_min, check_range};
use crate::sizing::SizingError;

fn default_monthly_running_hours() -> f64 {
    500.0
}
fn default_diesel_price() -> f64 {
    1.0
}

/// 자산 진단 요청. JSON(camelCase)으로 주고받는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
    /// 발전기 정격 [kVA], ≥ 1
    pub dg_capacity_kva: f64,
    /// 현장 부하 [kW], > 0
    pub load_kw: f64,
    /// 사용 연수 [년], 0~100
    pub dg_age_years: f64,
    /// 월 운전 시간 [h], 0~744
    #[serde(default = "default_monthly_running_hours")]
    pub monthly_running_hours: f64,
    /// 경유 단가 [$/L]
    #[serde(default = "default_diesel_price")]
    pub diesel_price: f64,
}

impl AssetRequest {
    pub fn new(dg_capacity_kva: f64, load_kw: f64, dg_age_years: f64) -> Self {
        Self {
            dg_capacity_kva,
            load_kw,
            dg_age_years,
            monthly_running_hours: default_monthly_running_hours(),
            diesel_price: default_diesel_price(),
        }
    }

    /// 선언 순서대로 검사하고 첫 번째 위반을 보고한다.
    pub fn validate(&self) -> Result<(), SizingError> {
        check_min("dgCapacityKva", self.dg_capacity_kva, 1.0)?;
        if !self.load_kw.is_finite() || self.load_kw <= 0.0 {
            return Err(SizingError::validation("loadKw", "0보다 커야 합니다."));
        }
        check_range("dgAgeYears", self.dg_age_years, 0.0, 100.0)?;
        check_range("monthlyRunningHours", self.monthly_running_hours, 0.0, 744.0)?;
        check_min("dieselPrice", self.diesel_price, 0.0)?;
        Ok(())
    }
}

/// 자산 처리 권고.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetRecommendation {
    /// 저부하 + 노후: 폐기 후 적정 용량 연료전지로 교체
    Replace,
    /// 저부하지만 쓸 만함: 부하가 큰 현장으로 이전
    Relocate,
    /// 적정 부하: 유지하고 배터리 하이브리드로 운전 시간 단축
    Keep,
    /// 과부하: 연료전지 병렬 운전으로 보강
    Support,
}

impl AssetRecommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetRecommendation::Replace => "replace",
            AssetRecommendation::Relocate => "relocate",
            AssetRecommendation::Keep => "keep",
            AssetRecommendation::Support => "support",
        }
    }
}

impl fmt::Display for AssetRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 자산 진단 결과. 반올림하지 않은 값이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetAssessment {
    /// [kW]
    pub dg_capacity_kw: f64,
    /// [%]
    pub load_factor: f64,
    pub recommendation: AssetRecommendation,
    /// 적정 부하율 대비 효율 손실 [%p]
    pub efficiency_loss: f64,
    /// 저부하 운전으로 낭비되는 연간 연료비 추정 [$/yr]
    pub annual_waste_estimate: f64,
    /// 적정 용량을 넘는 정격 [kW]
    pub excess_capacity_kw: f64,
    /// 초과 용량이 태우는 연료 [L/h]
    pub wasted_fuel_hourly: f64,
    /// 상시 운전 기준 연간 낭비 연료 [L/yr]
    pub wasted_fuel_annual: f64,
    /// 낭비 연료의 CO2 [kg/yr]
    pub wasted_co2_kg: f64,
}

/// 부하율 구간과 사용 연수로 권고를 정한다.
///
/// 하한 미만이면 연수가 기준을 넘을 때만 교체, 아니면 이전.
/// 하한 이상 상한 이하는 유지, 상한 초과는 보강.
pub fn classify_asset(load_factor: f64, age_years: f64, a: &AssetConstants) -> AssetRecommendation {
    if load_factor < a.low_load_pct {
        if age_years > a.replace_age_years {
            AssetRecommendation::Replace
        } else {
            AssetRecommendation::Relocate
        }
    } else if load_factor <= a.high_load_pct {
        AssetRecommendation::Keep
    } else {
        AssetRecommendation::Support
    }
}

/// 검증된 요청으로 자산을 진단한다.
pub fn assess_asset(
    req: &AssetRequest,
    d: &DieselConstants,
    a: &AssetConstants,
    t: &TimeConstants,
) -> AssetAssessment {
    let dg_capacity_kw = req.dg_capacity_kva * d.power_factor;
    let load_factor = req.load_kw * 100.0 / dg_capacity_kw;
    let recommendation = classify_asset(load_factor, req.dg_age_years, a);

    let (efficiency_loss, annual_waste_estimate) = if load_factor < a.high_load_pct {
        let loss = (a.high_load_pct - load_factor) * a.efficiency_loss_per_pct;
        let hourly = d.idle_fuel_coeff * dg_capacity_kw + d.load_fuel_coeff * req.load_kw;
        let liters = hourly * req.monthly_running_hours * a.months_per_year;
        let waste = liters
            * req.diesel_price
            * a.maintenance_penalty
            * (1.0 - load_factor / 100.0);
        (loss, waste)
    } else {
        (0.0, 0.0)
    };

    let excess_capacity_kw = (dg_capacity_kw - req.load_kw * a.right_size_factor).max(0.0);
    let wasted_fuel_hourly = excess_capacity_kw * a.excess_fuel_l_per_kw;
    let wasted_fuel_annual = wasted_fuel_hourly * t.hours_per_day * t.days_per_year;

    AssetAssessment {
        dg_capacity_kw,
        load_factor,
        recommendation,
        efficiency_loss,
        annual_waste_estimate,
        excess_capacity_kw,
        wasted_fuel_hourly,
        wasted_fuel_annual,
        wasted_co2_kg: wasted_fuel_annual * d.co2_kg_per_liter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assess(kva: f64, load_kw: f64, age: f64) -> AssetAssessment {
        assess_asset(
            &AssetRequest::new(kva, load_kw, age),
            &DieselConstants::default(),
            &AssetConstants::default(),
            &TimeConstants::default(),
        )
    }

    #[test]
    fn band_edges() {
        let a = AssetConstants::default();
        assert_eq!(classify_asset(29.9, 10.0, &a), AssetRecommendation::Relocate);
        assert_eq!(classify_asset(29.9, 10.1, &a), AssetRecommendation::Replace);
        assert_eq!(classify_asset(30.0, 25.0, &a), AssetRecommendation::Keep);
        assert_eq!(classify_asset(70.0, 25.0, &a), AssetRecommendation::Keep);
        assert_eq!(classify_asset(70.1, 0.0, &a), AssetRecommendation::Support);
    }

    #[test]
    fn oversized_twenty_kva_set() {
        // 20 kVA → 16 kW, 부하 3 kW → 18.75 %
        let r = assess(20.0, 3.0, 8.0);
        assert!((r.dg_capacity_kw - 16.0).abs() < 1e-12);
        assert!((r.load_factor - 18.75).abs() < 1e-9);
        assert_eq!(r.recommendation, AssetRecommendation::Relocate);
        assert!((r.efficiency_loss - 25.625).abs() < 1e-9);
        // (0.07×16 + 0.24×3) × 500 × 12 × 1.2 × 0.8125
        let expected = (1.12 + 0.72) * 500.0 * 12.0 * 1.2 * 0.8125;
        assert!((r.annual_waste_estimate - expected).abs() < 1e-6);
        // 16 - 4.5 = 11.5 kW 초과 → 0.69 L/h
        assert!((r.excess_capacity_kw - 11.5).abs() < 1e-9);
        assert!((r.wasted_fuel_hourly - 0.69).abs() < 1e-9);
        assert!((r.wasted_fuel_annual - 0.69 * 8760.0).abs() < 1e-6);
    }

    #[test]
    fn no_waste_at_or_above_upper_band() {
        let r = assess(25.0, 14.0, 3.0);
        assert_eq!(r.load_factor, 70.0);
        assert_eq!(r.recommendation, AssetRecommendation::Keep);
        assert_eq!(r.efficiency_loss, 0.0);
        assert_eq!(r.annual_waste_estimate, 0.0);

        let over = assess(25.0, 18.0, 3.0);
        assert_eq!(over.recommendation, AssetRecommendation::Support);
        assert_eq!(over.excess_capacity_kw, 0.0);
    }

    #[test]
    fn request_validation_order() {
        let mut req = AssetRequest::new(0.5, -1.0, 3.0);
        assert_eq!(req.validate().unwrap_err().field(), Some("dgCapacityKva"));
        req.dg_capacity_kva = 20.0;
        assert_eq!(req.validate().unwrap_err().field(), Some("loadKw"));
        req.load_kw = 3.0;
        req.monthly_running_hours = 745.0;
        assert_eq!(
            req.validate().unwrap_err().field(),
            Some("monthlyRunningHours")
        );
        req.monthly_running_hours = 744.0;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn recommendation_serializes_kebab_case() {
        let s = serde_json::to_string(&AssetRecommendation::Replace).expect("json");
        assert_eq!(s, "\"replace\"");
    }
}
