//! 디젤 발전기 대비 연료전지 경제성 비교와 기존 발전기 자산 진단.

pub mod asset;
pub mod diesel;
pub mod financial;
pub mod fuel_cell;

pub use asset::*;
pub use diesel::*;
pub use financial::*;
pub use fuel_cell::*;
