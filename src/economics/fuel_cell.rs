use crate::constants::{FuelCellConstants, TimeConstants};

/// 연료전지 운전비 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelCellCostAnalysis {
    /// 운송비 가산 전 수소 연료비 [$/day]
    pub fuel_cost_base: f64,
    /// 연료비(운송비 포함) + 정비비 [$/day]
    pub daily_cost: f64,
    /// [$/yr]
    pub annual_cost: f64,
}

/// 수소 소비량 [kg/h]에 단가와 운송비 가산율을 적용해 운전비를 구한다.
pub fn analyze_fuel_cell_costs(
    fuel_consumption_hourly_kg: f64,
    h2_price: f64,
    logistics_cost_pct: f64,
    k: &FuelCellConstants,
    t: &TimeConstants,
) -> FuelCellCostAnalysis {
    let fuel_cost_base = fuel_consumption_hourly_kg * t.hours_per_day * h2_price;
    let daily_cost = fuel_cost_base * (1.0 + logistics_cost_pct / 100.0)
        + k.maintenance_per_hour * t.hours_per_day;
    FuelCellCostAnalysis {
        fuel_cost_base,
        daily_cost,
        annual_cost: daily_cost * t.days_per_year,
    }
}
