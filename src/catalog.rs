//! 연료전지 모듈 카탈로그.
//!
//! 엔진은 카탈로그를 소유하지 않고 `FuelCellCatalog`를 통해 id로 사양을
//! 한 번 조회할 뿐이다. 내장 카탈로그와 TOML 파일 카탈로그를 제공한다.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 카탈로그 id.
pub type FuelCellId = u32;

/// 사양에 기생손실률이 없을 때의 기본값.
pub const DEFAULT_PARASITIC_LOSS_RATE: f64 = 0.08;
/// 사양에 발열량이 없을 때의 기본값 (수소 LHV) [kWh/kg]
pub const DEFAULT_LHV_KWH_PER_KG: f64 = 33.3;
/// 사양에 단가가 없을 때의 기본값 [$/kW]
pub const DEFAULT_CAPEX_PER_KW: f64 = 3000.0;

fn default_parasitic_loss_rate() -> f64 {
    DEFAULT_PARASITIC_LOSS_RATE
}

fn default_lhv() -> f64 {
    DEFAULT_LHV_KWH_PER_KG
}

fn default_capex_per_kw() -> f64 {
    DEFAULT_CAPEX_PER_KW
}

fn default_fuel_type() -> String {
    "Hydrogen".to_string()
}

/// 스택 종류.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StackKind {
    Pemfc,
    Dmfc,
    Sofc,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for StackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StackKind::Pemfc => "PEMFC",
            StackKind::Dmfc => "DMFC",
            StackKind::Sofc => "SOFC",
            StackKind::Other => "OTHER",
        };
        f.write_str(s)
    }
}

/// 연료전지 모듈 1기의 사양.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelCellSpec {
    pub id: FuelCellId,
    pub manufacturer: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: StackKind,
    /// 정격 출력 [kW]
    pub rated_power_kw: f64,
    /// 최소 출력 [kW]
    #[serde(default)]
    pub min_power_kw: f64,
    /// 출력 전압 [V]
    #[serde(default)]
    pub output_voltage_v: f64,
    /// 효율 [%] (0~100)
    pub efficiency: f64,
    /// 기생손실률 (소수)
    #[serde(default = "default_parasitic_loss_rate", alias = "parasiticLoss")]
    pub parasitic_loss_rate: f64,
    #[serde(default = "default_fuel_type")]
    pub fuel_type: String,
    /// 저위발열량 [kWh/kg]
    #[serde(default = "default_lhv")]
    pub lhv: f64,
    /// kW당 설비비 [$/kW]
    #[serde(default = "default_capex_per_kw")]
    pub capex_per_kw: f64,
}

impl FuelCellSpec {
    /// 선택 항목을 기본값으로 채운 사양을 만든다.
    pub fn new(
        id: FuelCellId,
        manufacturer: &str,
        model: &str,
        kind: StackKind,
        rated_power_kw: f64,
        efficiency: f64,
    ) -> Self {
        Self {
            id,
            manufacturer: manufacturer.to_string(),
            model: model.to_string(),
            kind,
            rated_power_kw,
            min_power_kw: 0.0,
            output_voltage_v: 0.0,
            efficiency,
            parasitic_loss_rate: DEFAULT_PARASITIC_LOSS_RATE,
            fuel_type: default_fuel_type(),
            lhv: DEFAULT_LHV_KWH_PER_KG,
            capex_per_kw: DEFAULT_CAPEX_PER_KW,
        }
    }

    /// "제조사 모델" 형식의 표시 이름.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model)
    }
}

/// 카탈로그 조회 인터페이스.
pub trait FuelCellCatalog {
    /// id로 사양을 조회한다. 없으면 None.
    fn get_fuel_cell_spec(&self, id: FuelCellId) -> Option<FuelCellSpec>;

    /// 전체 목록을 id 순으로 반환한다.
    fn list(&self) -> Vec<FuelCellSpec>;
}

/// 카탈로그 파일 로드 오류.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("카탈로그 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("카탈로그 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("카탈로그 id {id}가 중복되었습니다.")]
    Duplicate { id: FuelCellId },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    fuel_cell: Vec<FuelCellSpec>,
}

/// 메모리 상의 카탈로그. 내장 목록과 TOML 파일 모두 이 형태로 적재된다.
#[derive(Debug, Clone, Default)]
pub struct TomlCatalog {
    entries: BTreeMap<FuelCellId, FuelCellSpec>,
}

impl TomlCatalog {
    /// 사양 목록으로 카탈로그를 만든다. id가 겹치면 오류.
    pub fn from_specs(specs: Vec<FuelCellSpec>) -> Result<Self, CatalogError> {
        let mut entries = BTreeMap::new();
        for spec in specs {
            let id = spec.id;
            if entries.insert(id, spec).is_some() {
                return Err(CatalogError::Duplicate { id });
            }
        }
        Ok(Self { entries })
    }

    /// `[[fuel_cell]]` 배열 형식의 TOML 문자열을 읽는다.
    pub fn from_toml_str(src: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(src)?;
        Self::from_specs(file.fuel_cell)
    }

    /// TOML 파일을 읽는다.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        log::info!(
            "카탈로그 {}개 항목을 {}에서 읽었습니다.",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FuelCellCatalog for TomlCatalog {
    fn get_fuel_cell_spec(&self, id: FuelCellId) -> Option<FuelCellSpec> {
        self.entries.get(&id).cloned()
    }

    fn list(&self) -> Vec<FuelCellSpec> {
        self.entries.values().cloned().collect()
    }
}

struct SeedEntry {
    manufacturer: &'static str,
    model: &'static str,
    kind: StackKind,
    rated_power_kw: f64,
    min_power_kw: f64,
    output_voltage_v: f64,
    efficiency: f64,
    parasitic_loss_rate: f64,
    fuel_type: &'static str,
    lhv: f64,
    capex_per_kw: f64,
}

macro_rules! seed {
    ($mfr:expr, $model:expr, $kind:ident, $rated:expr, $min:expr, $volt:expr, $eff:expr, $para:expr, $fuel:expr, $lhv:expr, $capex:expr) => {
        SeedEntry {
            manufacturer: $mfr,
            model: $model,
            kind: StackKind::$kind,
            rated_power_kw: $rated,
            min_power_kw: $min,
            output_voltage_v: $volt,
            efficiency: $eff,
            parasitic_loss_rate: $para,
            fuel_type: $fuel,
            lhv: $lhv,
            capex_per_kw: $capex,
        }
    };
}

// 통신 기지국 백업 전원용으로 공개된 제조사 데이터시트 값.
const SEED: &[SeedEntry] = &[
    seed!("Ballard", "FCgen-H2PM", Pemfc, 5.0, 1.0, 48.0, 50.0, 0.08, "Hydrogen", 33.3, 3500.0),
    seed!("Ballard", "FCgen-1020ACS", Pemfc, 1.2, 0.2, 48.0, 46.0, 0.06, "Hydrogen", 33.3, 4200.0),
    seed!("Plug Power", "GenDrive 1000", Pemfc, 10.0, 2.0, 48.0, 55.0, 0.07, "Hydrogen", 33.3, 3200.0),
    seed!("Plug Power", "GenSure HP", Pemfc, 5.0, 1.0, 48.0, 52.0, 0.08, "Hydrogen", 33.3, 3400.0),
    seed!("Cummins", "HyPM HD 30", Pemfc, 30.0, 5.0, 48.0, 58.0, 0.09, "Hydrogen", 33.3, 2800.0),
    seed!("Cummins", "HyPM HD 12", Pemfc, 12.0, 2.0, 48.0, 56.0, 0.08, "Hydrogen", 33.3, 3000.0),
    seed!("SFC Energy", "EFOY Pro 2800", Dmfc, 0.5, 0.05, 24.0, 35.0, 0.05, "Methanol", 5.5, 5000.0),
    seed!("SFC Energy", "EFOY Pro 12000 Duo", Dmfc, 1.0, 0.1, 24.0, 38.0, 0.06, "Methanol", 5.5, 4500.0),
    seed!("Bloom Energy", "Energy Server ES5", Sofc, 200.0, 50.0, 480.0, 60.0, 0.12, "Natural Gas", 13.9, 4000.0),
    seed!("Intelligent Energy", "IE-POWER 800W", Pemfc, 0.8, 0.1, 48.0, 46.0, 0.05, "Hydrogen", 33.3, 4800.0),
    seed!("Intelligent Energy", "IE-POWER 2.5kW", Pemfc, 2.5, 0.5, 48.0, 52.0, 0.07, "Hydrogen", 33.3, 4000.0),
    seed!("PowerCell Sweden", "PS-5", Pemfc, 5.0, 1.0, 48.0, 53.0, 0.08, "Hydrogen", 33.3, 3600.0),
    seed!("Horizon", "H-3000", Pemfc, 3.0, 0.5, 48.0, 48.0, 0.07, "Hydrogen", 33.3, 2900.0),
    seed!("Horizon", "H-5000", Pemfc, 5.0, 1.0, 48.0, 51.0, 0.07, "Hydrogen", 33.3, 2700.0),
];

/// 내장 기준 카탈로그. id는 1부터 순서대로 부여된다.
#[derive(Debug, Clone)]
pub struct BuiltInCatalog {
    inner: TomlCatalog,
}

impl BuiltInCatalog {
    pub fn new() -> Self {
        let entries = SEED
            .iter()
            .zip(1..)
            .map(|(s, id)| {
                (
                    id,
                    FuelCellSpec {
                        id,
                        manufacturer: s.manufacturer.to_string(),
                        model: s.model.to_string(),
                        kind: s.kind.clone(),
                        rated_power_kw: s.rated_power_kw,
                        min_power_kw: s.min_power_kw,
                        output_voltage_v: s.output_voltage_v,
                        efficiency: s.efficiency,
                        parasitic_loss_rate: s.parasitic_loss_rate,
                        fuel_type: s.fuel_type.to_string(),
                        lhv: s.lhv,
                        capex_per_kw: s.capex_per_kw,
                    },
                )
            })
            .collect();
        Self {
            inner: TomlCatalog { entries },
        }
    }
}

impl Default for BuiltInCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FuelCellCatalog for BuiltInCatalog {
    fn get_fuel_cell_spec(&self, id: FuelCellId) -> Option<FuelCellSpec> {
        self.inner.get_fuel_cell_spec(id)
    }

    fn list(&self) -> Vec<FuelCellSpec> {
        self.inner.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_ids_start_at_one() {
        let cat = BuiltInCatalog::new();
        let first = cat.get_fuel_cell_spec(1).expect("id 1");
        assert_eq!(first.model, "FCgen-H2PM");
        assert_eq!(cat.list().len(), SEED.len());
        assert!(cat.get_fuel_cell_spec(0).is_none());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let cat = TomlCatalog::from_toml_str(
            r#"
            [[fuel_cell]]
            id = 7
            manufacturer = "Acme"
            model = "X1"
            type = "PEMFC"
            ratedPowerKw = 4.0
            efficiency = 50.0
            "#,
        )
        .expect("parse");
        let spec = cat.get_fuel_cell_spec(7).expect("id 7");
        assert_eq!(spec.parasitic_loss_rate, DEFAULT_PARASITIC_LOSS_RATE);
        assert_eq!(spec.lhv, DEFAULT_LHV_KWH_PER_KG);
        assert_eq!(spec.capex_per_kw, DEFAULT_CAPEX_PER_KW);
        assert_eq!(spec.fuel_type, "Hydrogen");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let a = FuelCellSpec::new(3, "A", "a", StackKind::Pemfc, 1.0, 50.0);
        let b = FuelCellSpec::new(3, "B", "b", StackKind::Sofc, 2.0, 55.0);
        assert!(matches!(
            TomlCatalog::from_specs(vec![a, b]),
            Err(CatalogError::Duplicate { id: 3 })
        ));
    }
}
