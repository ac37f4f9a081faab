//! 사이징/경제성 모델에서 쓰는 고정 계수 테이블.
//!
//! 수식 코드에는 숫자 리터럴을 두지 않고 모두 이 테이블을 통해 받는다.
//! `config.toml`의 `[constants]` 섹션으로 재보정할 수 있으며, 일부 항목만
//! 적어도 나머지는 기본값으로 채워진다.

use serde::{Deserialize, Serialize};

use crate::sizing::SizingError;

/// 현재 내장 계수 테이블의 버전 문자열.
pub const DEFAULT_CONSTANTS_VERSION: &str = "2024.1";

/// 온도/고도 출력 감소 계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeratingConstants {
    /// 감소가 시작되는 기준 온도 [°C]
    pub reference_temperature_c: f64,
    /// 기준 온도 초과 1 °C당 감소율
    pub per_degree_c: f64,
    /// 감소가 시작되는 기준 고도 [m]
    pub altitude_threshold_m: f64,
    /// 기준 고도 초과 100 m당 감소율
    pub per_100m: f64,
    /// 감소 계수 하한
    pub floor: f64,
}

impl Default for DeratingConstants {
    fn default() -> Self {
        Self {
            reference_temperature_c: 35.0,
            per_degree_c: 0.015,
            altitude_threshold_m: 500.0,
            per_100m: 0.01,
            floor: 0.5,
        }
    }
}

/// 배터리/케이블 관련 전기 계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectricalConstants {
    /// 배터리 스트링 1개의 용량 [Ah]
    pub battery_string_ah: f64,
    /// 케이블 허용 전류 밀도 [A/mm²]
    pub cable_ampacity_a_per_mm2: f64,
}

impl Default for ElectricalConstants {
    fn default() -> Self {
        Self {
            battery_string_ah: 150.0,
            cable_ampacity_a_per_mm2: 4.0,
        }
    }
}

/// 디젤 발전기 비교 계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DieselConstants {
    /// kVA → kW 환산 역률
    pub power_factor: f64,
    /// 무부하 연료 항 계수 [L/h per kW 정격]
    pub idle_fuel_coeff: f64,
    /// 부하 비례 연료 항 계수 [L/h per kW 부하]
    pub load_fuel_coeff: f64,
    /// 경유 1 L당 CO2 배출량 [kg]
    pub co2_kg_per_liter: f64,
    /// 시간당 정비비 [$/h]
    pub maintenance_per_hour: f64,
}

impl Default for DieselConstants {
    fn default() -> Self {
        Self {
            power_factor: 0.8,
            idle_fuel_coeff: 0.07,
            load_fuel_coeff: 0.24,
            co2_kg_per_liter: 2.68,
            maintenance_per_hour: 0.5,
        }
    }
}

/// 연료전지 운전 계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelCellConstants {
    /// 시간당 정비비 [$/h]
    pub maintenance_per_hour: f64,
}

impl Default for FuelCellConstants {
    fn default() -> Self {
        Self {
            maintenance_per_hour: 0.05,
        }
    }
}

/// 수소 실린더 물류 계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticsConstants {
    /// 50 L / 200 bar 실린더 1개의 사용 가능 수소량 [kg]
    pub cylinder_usable_kg: f64,
    /// 번들 1개당 실린더 수
    pub cylinders_per_bundle: u32,
}

impl Default for LogisticsConstants {
    fn default() -> Self {
        Self {
            cylinder_usable_kg: 0.89,
            cylinders_per_bundle: 12,
        }
    }
}

/// 회수기간 등급 경계 [년].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaybackConstants {
    pub excellent_max_years: f64,
    pub good_max_years: f64,
}

impl Default for PaybackConstants {
    fn default() -> Self {
        Self {
            excellent_max_years: 5.0,
            good_max_years: 10.0,
        }
    }
}

/// 디젤 발전기 자산 진단 계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConstants {
    /// 이 부하율 미만이면 과대 용량 [%]
    pub low_load_pct: f64,
    /// 이 부하율 초과면 과부하 [%]
    pub high_load_pct: f64,
    /// 과대 용량 설비를 폐기 대상으로 보는 사용 연수 [년], 초과 시 교체
    pub replace_age_years: f64,
    /// 부하율 1%p 부족당 효율 손실 [%p]
    pub efficiency_loss_per_pct: f64,
    /// 낭비 연료비에 붙는 정비 가산 배율
    pub maintenance_penalty: f64,
    pub months_per_year: f64,
    /// 적정 용량 = 부하 × 배율
    pub right_size_factor: f64,
    /// 초과 용량 1 kW당 낭비 연료 [L/h]
    pub excess_fuel_l_per_kw: f64,
}

impl Default for AssetConstants {
    fn default() -> Self {
        Self {
            low_load_pct: 30.0,
            high_load_pct: 70.0,
            replace_age_years: 10.0,
            efficiency_loss_per_pct: 0.5,
            maintenance_penalty: 1.2,
            months_per_year: 12.0,
            right_size_factor: 1.5,
            excess_fuel_l_per_kw: 0.06,
        }
    }
}

/// 시간 환산 계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConstants {
    pub hours_per_day: f64,
    pub days_per_year: f64,
}

impl Default for TimeConstants {
    fn default() -> Self {
        Self {
            hours_per_day: 24.0,
            days_per_year: 365.0,
        }
    }
}

/// 평가기에 주입되는 전체 계수 테이블.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConstants {
    pub version: String,
    pub derating: DeratingConstants,
    pub electrical: ElectricalConstants,
    pub diesel: DieselConstants,
    pub fuel_cell: FuelCellConstants,
    pub logistics: LogisticsConstants,
    pub payback: PaybackConstants,
    pub asset: AssetConstants,
    pub time: TimeConstants,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONSTANTS_VERSION.to_string(),
            derating: DeratingConstants::default(),
            electrical: ElectricalConstants::default(),
            diesel: DieselConstants::default(),
            fuel_cell: FuelCellConstants::default(),
            logistics: LogisticsConstants::default(),
            payback: PaybackConstants::default(),
            asset: AssetConstants::default(),
            time: TimeConstants::default(),
        }
    }
}

impl ModelConstants {
    /// 분모나 용량으로 쓰이는 계수가 양수인지, 나머지가 유한한지 확인한다.
    pub fn validate(&self) -> Result<(), SizingError> {
        let positive: [(&'static str, f64); 10] = [
            ("constants.derating.floor", self.derating.floor),
            (
                "constants.electrical.battery_string_ah",
                self.electrical.battery_string_ah,
            ),
            (
                "constants.electrical.cable_ampacity_a_per_mm2",
                self.electrical.cable_ampacity_a_per_mm2,
            ),
            ("constants.diesel.power_factor", self.diesel.power_factor),
            (
                "constants.logistics.cylinder_usable_kg",
                self.logistics.cylinder_usable_kg,
            ),
            ("constants.time.hours_per_day", self.time.hours_per_day),
            ("constants.time.days_per_year", self.time.days_per_year),
            (
                "constants.payback.good_max_years",
                self.payback.good_max_years,
            ),
            ("constants.asset.high_load_pct", self.asset.high_load_pct),
            ("constants.asset.months_per_year", self.asset.months_per_year),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SizingError::validation(field, "0보다 큰 유한값이어야 합니다."));
            }
        }

        let non_negative: [(&'static str, f64); 15] = [
            (
                "constants.derating.reference_temperature_c",
                self.derating.reference_temperature_c,
            ),
            ("constants.derating.per_degree_c", self.derating.per_degree_c),
            (
                "constants.derating.altitude_threshold_m",
                self.derating.altitude_threshold_m,
            ),
            ("constants.derating.per_100m", self.derating.per_100m),
            ("constants.diesel.idle_fuel_coeff", self.diesel.idle_fuel_coeff),
            ("constants.diesel.load_fuel_coeff", self.diesel.load_fuel_coeff),
            ("constants.diesel.co2_kg_per_liter", self.diesel.co2_kg_per_liter),
            (
                "constants.diesel.maintenance_per_hour",
                self.diesel.maintenance_per_hour,
            ),
            (
                "constants.fuel_cell.maintenance_per_hour",
                self.fuel_cell.maintenance_per_hour,
            ),
            ("constants.asset.low_load_pct", self.asset.low_load_pct),
            (
                "constants.asset.replace_age_years",
                self.asset.replace_age_years,
            ),
            (
                "constants.asset.efficiency_loss_per_pct",
                self.asset.efficiency_loss_per_pct,
            ),
            (
                "constants.asset.maintenance_penalty",
                self.asset.maintenance_penalty,
            ),
            (
                "constants.asset.right_size_factor",
                self.asset.right_size_factor,
            ),
            (
                "constants.asset.excess_fuel_l_per_kw",
                self.asset.excess_fuel_l_per_kw,
            ),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SizingError::validation(field, "0 이상의 유한값이어야 합니다."));
            }
        }

        if self.derating.floor > 1.0 {
            return Err(SizingError::validation(
                "constants.derating.floor",
                "1.0 이하여야 합니다.",
            ));
        }
        if self.logistics.cylinders_per_bundle == 0 {
            return Err(SizingError::validation(
                "constants.logistics.cylinders_per_bundle",
                "1 이상이어야 합니다.",
            ));
        }
        if self.asset.low_load_pct > self.asset.high_load_pct {
            return Err(SizingError::validation(
                "constants.asset.low_load_pct",
                "high_load_pct 이하여야 합니다.",
            ));
        }
        let excellent = self.payback.excellent_max_years;
        if !excellent.is_finite() || excellent <= 0.0 || excellent > self.payback.good_max_years {
            return Err(SizingError::validation(
                "constants.payback.excellent_max_years",
                "0보다 크고 good_max_years 이하여야 합니다.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ModelConstants::default().validate().is_ok());
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let cfg: ModelConstants = toml::from_str(
            r#"
            version = "site-calibration"
            [electrical]
            battery_string_ah = 200.0
            "#,
        )
        .expect("parse partial constants");
        assert_eq!(cfg.version, "site-calibration");
        assert_eq!(cfg.electrical.battery_string_ah, 200.0);
        assert_eq!(cfg.electrical.cable_ampacity_a_per_mm2, 4.0);
        assert_eq!(cfg.logistics.cylinders_per_bundle, 12);
    }

    #[test]
    fn zero_cylinder_capacity_is_rejected() {
        let mut c = ModelConstants::default();
        c.logistics.cylinder_usable_kg = 0.0;
        let err = c.validate().unwrap_err();
        assert_eq!(err.field(), Some("constants.logistics.cylinder_usable_kg"));
    }

    #[test]
    fn inverted_asset_bands_are_rejected() {
        let mut c = ModelConstants::default();
        c.asset.low_load_pct = 80.0;
        assert_eq!(
            c.validate().unwrap_err().field(),
            Some("constants.asset.low_load_pct")
        );
    }

    #[test]
    fn inverted_payback_bands_are_rejected() {
        let mut c = ModelConstants::default();
        c.payback.excellent_max_years = 12.0;
        assert!(c.validate().is_err());
    }
}
