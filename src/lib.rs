//! 연료전지 사이징/경제성 평가 엔진을 라이브러리로 분리하여 CLI 외의 호출자도 쓸 수 있게 한다.

pub mod app;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod economics;
pub mod i18n;
pub mod logistics;
pub mod report;
pub mod sizing;
pub mod ui_cli;

pub use catalog::{BuiltInCatalog, FuelCellCatalog, FuelCellSpec};
pub use constants::ModelConstants;
pub use sizing::{CalculationResult, SizingEngine, SizingError, SizingRequest};
