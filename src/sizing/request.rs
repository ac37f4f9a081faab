use serde::{Deserialize, Serialize};

use super::SizingError;
use crate::catalog::{FuelCellId, FuelCellSpec};

fn default_max_temperature() -> f64 {
    35.0
}
fn default_hours_per_year() -> f64 {
    2000.0
}
fn default_dg_capacity_kva() -> f64 {
    20.0
}
fn default_diesel_price() -> f64 {
    1.0
}
fn default_pilferage_factor() -> f64 {
    10.0
}
fn default_dg_capex() -> f64 {
    5000.0
}
fn default_h2_price() -> f64 {
    15.0
}
fn default_logistics_cost_pct() -> f64 {
    10.0
}
fn default_battery_buffer_hours() -> f64 {
    4.0
}
fn default_battery_dod() -> f64 {
    0.8
}
fn default_system_voltage() -> f64 {
    48.0
}
fn default_refueling_cycle_days() -> f64 {
    7.0
}

/// 사이징 요청. JSON(camelCase)으로 주고받으며 생략된 항목은 기본값을 쓴다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingRequest {
    /// 부하 [kW], > 0
    pub load_kw: f64,
    /// 최고 외기온도 [°C], -20~60
    #[serde(default = "default_max_temperature")]
    pub max_temperature: f64,
    /// 설치 고도 [m], 0~5000
    #[serde(default)]
    pub altitude: f64,
    pub fuel_cell_id: FuelCellId,
    /// 자립 운전 시간 [h], ≥ 1
    pub autonomy_hours: f64,
    #[serde(default = "default_hours_per_year")]
    pub hours_per_year: f64,
    #[serde(default = "default_dg_capacity_kva")]
    pub dg_capacity_kva: f64,
    /// 경유 단가 [$/L]
    #[serde(default = "default_diesel_price")]
    pub diesel_price: f64,
    /// 도난/유실 비율 [%], 0~50
    #[serde(default = "default_pilferage_factor")]
    pub pilferage_factor: f64,
    #[serde(default = "default_dg_capex")]
    pub dg_capex: f64,
    /// 수소 단가 [$/kg]
    #[serde(default = "default_h2_price")]
    pub h2_price: f64,
    /// 수소 운송비 가산율 [%], 0~50
    #[serde(default = "default_logistics_cost_pct")]
    pub logistics_cost_pct: f64,
    #[serde(default = "default_battery_buffer_hours")]
    pub battery_buffer_hours: f64,
    /// 방전 심도 (소수), 0.5~1
    #[serde(default = "default_battery_dod")]
    pub battery_dod: f64,
    /// DC 버스 전압 [V], 24/48/110 중 하나
    #[serde(default = "default_system_voltage")]
    pub system_voltage: f64,
    #[serde(default = "default_refueling_cycle_days")]
    pub refueling_cycle_days: f64,
}

impl SizingRequest {
    /// 필수 항목만 받고 나머지는 기본값으로 채운다.
    pub fn new(load_kw: f64, fuel_cell_id: FuelCellId, autonomy_hours: f64) -> Self {
        Self {
            load_kw,
            max_temperature: default_max_temperature(),
            altitude: 0.0,
            fuel_cell_id,
            autonomy_hours,
            hours_per_year: default_hours_per_year(),
            dg_capacity_kva: default_dg_capacity_kva(),
            diesel_price: default_diesel_price(),
            pilferage_factor: default_pilferage_factor(),
            dg_capex: default_dg_capex(),
            h2_price: default_h2_price(),
            logistics_cost_pct: default_logistics_cost_pct(),
            battery_buffer_hours: default_battery_buffer_hours(),
            battery_dod: default_battery_dod(),
            system_voltage: default_system_voltage(),
            refueling_cycle_days: default_refueling_cycle_days(),
        }
    }

    /// 각 항목의 허용 범위를 선언 순서대로 검사하고 첫 번째 위반을 보고한다.
    pub fn validate(&self) -> Result<(), SizingError> {
        let load = self.load_kw;
        if !load.is_finite() || load <= 0.0 {
            return Err(SizingError::validation("loadKw", "0보다 커야 합니다."));
        }
        check_range("maxTemperature", self.max_temperature, -20.0, 60.0)?;
        check_range("altitude", self.altitude, 0.0, 5000.0)?;
        check_min("autonomyHours", self.autonomy_hours, 1.0)?;
        check_min("hoursPerYear", self.hours_per_year, 1.0)?;
        check_min("dgCapacityKva", self.dg_capacity_kva, 1.0)?;
        check_min("dieselPrice", self.diesel_price, 0.0)?;
        check_range("pilferageFactor", self.pilferage_factor, 0.0, 50.0)?;
        check_min("dgCapex", self.dg_capex, 0.0)?;
        check_min("h2Price", self.h2_price, 0.0)?;
        check_range("logisticsCostPct", self.logistics_cost_pct, 0.0, 50.0)?;
        check_range("batteryBufferHours", self.battery_buffer_hours, 1.0, 24.0)?;
        check_range("batteryDod", self.battery_dod, 0.5, 1.0)?;
        SystemVoltage::from_volts(self.system_voltage)?;
        check_range("refuelingCycleDays", self.refueling_cycle_days, 1.0, 60.0)?;
        Ok(())
    }

    /// 검증 후 단계별 파라미터 레코드로 나눈다.
    pub fn split(&self) -> Result<(SiteParameters, GeneratorParameters, HydrogenParameters), SizingError> {
        self.validate()?;
        let site = SiteParameters {
            load_kw: self.load_kw,
            max_temperature: self.max_temperature,
            altitude: self.altitude,
            autonomy_hours: self.autonomy_hours,
            hours_per_year: self.hours_per_year,
            system_voltage: SystemVoltage::from_volts(self.system_voltage)?,
            battery_buffer_hours: self.battery_buffer_hours,
            battery_dod: self.battery_dod,
            refueling_cycle_days: self.refueling_cycle_days,
        };
        let generator = GeneratorParameters {
            dg_capacity_kva: self.dg_capacity_kva,
            diesel_price: self.diesel_price,
            pilferage_factor: self.pilferage_factor,
            dg_capex: self.dg_capex,
        };
        let hydrogen = HydrogenParameters {
            h2_price: self.h2_price,
            logistics_cost_pct: self.logistics_cost_pct,
        };
        Ok((site, generator, hydrogen))
    }
}

pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), SizingError> {
    if !value.is_finite() || value < min || value > max {
        return Err(SizingError::validation(
            field,
            format!("{min}~{max} 범위여야 합니다. (입력값: {value})"),
        ));
    }
    Ok(())
}

pub(crate) fn check_min(field: &'static str, value: f64, min: f64) -> Result<(), SizingError> {
    if !value.is_finite() || value < min {
        return Err(SizingError::validation(
            field,
            format!("{min} 이상이어야 합니다. (입력값: {value})"),
        ));
    }
    Ok(())
}

/// 허용되는 DC 버스 전압.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemVoltage {
    V24,
    V48,
    V110,
}

impl SystemVoltage {
    pub fn from_volts(volts: f64) -> Result<Self, SizingError> {
        // 정확히 일치하는 값만 허용한다.
        if volts == 24.0 {
            Ok(SystemVoltage::V24)
        } else if volts == 48.0 {
            Ok(SystemVoltage::V48)
        } else if volts == 110.0 {
            Ok(SystemVoltage::V110)
        } else {
            Err(SizingError::validation(
                "systemVoltage",
                format!("24, 48, 110 중 하나여야 합니다. (입력값: {volts})"),
            ))
        }
    }

    pub fn volts(self) -> f64 {
        match self {
            SystemVoltage::V24 => 24.0,
            SystemVoltage::V48 => 48.0,
            SystemVoltage::V110 => 110.0,
        }
    }
}

/// 현장 조건.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteParameters {
    pub load_kw: f64,
    pub max_temperature: f64,
    pub altitude: f64,
    pub autonomy_hours: f64,
    pub hours_per_year: f64,
    pub system_voltage: SystemVoltage,
    pub battery_buffer_hours: f64,
    pub battery_dod: f64,
    pub refueling_cycle_days: f64,
}

/// 비교 대상 디젤 발전기.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParameters {
    pub dg_capacity_kva: f64,
    pub diesel_price: f64,
    /// [%]
    pub pilferage_factor: f64,
    pub dg_capex: f64,
}

/// 수소 조달 조건.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrogenParameters {
    /// [$/kg]
    pub h2_price: f64,
    /// [%]
    pub logistics_cost_pct: f64,
}

/// 카탈로그가 넘겨준 사양이 계산에 쓸 수 있는 값인지 확인한다.
///
/// 기생손실률이 1 이상인 경우는 여기서 막지 않는다. 다중 스택 단계에서
/// 단위 출력이 0 이하가 되어 별도 오류로 보고된다.
pub fn validate_spec(spec: &FuelCellSpec) -> Result<(), SizingError> {
    let rated = spec.rated_power_kw;
    if !rated.is_finite() || rated <= 0.0 {
        return Err(SizingError::validation(
            "fuelCell.ratedPowerKw",
            "0보다 커야 합니다.",
        ));
    }
    let eff = spec.efficiency;
    if !eff.is_finite() || eff <= 0.0 || eff > 100.0 {
        return Err(SizingError::validation(
            "fuelCell.efficiency",
            "0 초과 100 이하여야 합니다.",
        ));
    }
    let para = spec.parasitic_loss_rate;
    if !para.is_finite() || para < 0.0 {
        return Err(SizingError::validation(
            "fuelCell.parasiticLossRate",
            "0 이상이어야 합니다.",
        ));
    }
    if !spec.lhv.is_finite() || spec.lhv <= 0.0 {
        return Err(SizingError::validation("fuelCell.lhv", "0보다 커야 합니다."));
    }
    if !spec.capex_per_kw.is_finite() || spec.capex_per_kw < 0.0 {
        return Err(SizingError::validation(
            "fuelCell.capexPerKw",
            "0 이상이어야 합니다.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults_fill_optional_fields() {
        let req: SizingRequest =
            serde_json::from_str(r#"{"loadKw": 4, "fuelCellId": 1, "autonomyHours": 8}"#)
                .expect("parse request");
        assert_eq!(req, SizingRequest::new(4.0, 1, 8.0));
        assert_eq!(req.system_voltage, 48.0);
        assert_eq!(req.refueling_cycle_days, 7.0);
    }

    #[test]
    fn first_offending_field_is_reported() {
        let mut req = SizingRequest::new(4.0, 1, 8.0);
        req.altitude = -1.0;
        req.battery_dod = 0.1;
        let err = req.validate().unwrap_err();
        assert_eq!(err.field(), Some("altitude"));
    }

    #[test]
    fn voltage_outside_allowed_set_is_rejected() {
        let mut req = SizingRequest::new(4.0, 1, 8.0);
        req.system_voltage = 36.0;
        assert_eq!(req.validate().unwrap_err().field(), Some("systemVoltage"));
        req.system_voltage = 110.0;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn range_ends_are_inclusive() {
        let accepted: [(fn(&mut SizingRequest, f64), f64); 14] = [
            (|r, v| r.max_temperature = v, -20.0),
            (|r, v| r.max_temperature = v, 60.0),
            (|r, v| r.altitude = v, 0.0),
            (|r, v| r.altitude = v, 5000.0),
            (|r, v| r.autonomy_hours = v, 1.0),
            (|r, v| r.pilferage_factor = v, 0.0),
            (|r, v| r.pilferage_factor = v, 50.0),
            (|r, v| r.logistics_cost_pct = v, 50.0),
            (|r, v| r.battery_buffer_hours = v, 1.0),
            (|r, v| r.battery_buffer_hours = v, 24.0),
            (|r, v| r.battery_dod = v, 0.5),
            (|r, v| r.battery_dod = v, 1.0),
            (|r, v| r.refueling_cycle_days = v, 1.0),
            (|r, v| r.refueling_cycle_days = v, 60.0),
        ];
        for (set, value) in accepted {
            let mut req = SizingRequest::new(4.0, 1, 8.0);
            set(&mut req, value);
            assert!(req.validate().is_ok(), "{value} should be accepted: {req:?}");
        }
    }

    #[test]
    fn values_just_past_range_ends_are_rejected() {
        let rejected: [(fn(&mut SizingRequest, f64), f64, &str); 10] = [
            (|r, v| r.max_temperature = v, 60.01, "maxTemperature"),
            (|r, v| r.altitude = v, -0.01, "altitude"),
            (|r, v| r.autonomy_hours = v, 0.99, "autonomyHours"),
            (|r, v| r.pilferage_factor = v, 50.01, "pilferageFactor"),
            (|r, v| r.logistics_cost_pct = v, -0.01, "logisticsCostPct"),
            (|r, v| r.battery_buffer_hours = v, 24.01, "batteryBufferHours"),
            (|r, v| r.battery_dod = v, 0.49, "batteryDod"),
            (|r, v| r.battery_dod = v, 1.01, "batteryDod"),
            (|r, v| r.refueling_cycle_days = v, 0.99, "refuelingCycleDays"),
            (|r, v| r.refueling_cycle_days = v, 60.01, "refuelingCycleDays"),
        ];
        for (set, value, field) in rejected {
            let mut req = SizingRequest::new(4.0, 1, 8.0);
            set(&mut req, value);
            assert_eq!(req.validate().unwrap_err().field(), Some(field), "{value}");
        }
    }

    #[test]
    fn non_finite_load_is_rejected() {
        let req = SizingRequest::new(f64::NAN, 1, 8.0);
        assert_eq!(req.validate().unwrap_err().field(), Some("loadKw"));
    }

    #[test]
    fn zero_efficiency_spec_is_rejected() {
        let mut spec = FuelCellSpec::new(1, "A", "a", crate::catalog::StackKind::Pemfc, 5.0, 50.0);
        spec.efficiency = 0.0;
        assert_eq!(
            validate_spec(&spec).unwrap_err().field(),
            Some("fuelCell.efficiency")
        );
    }
}
