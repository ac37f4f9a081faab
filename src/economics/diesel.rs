use crate::constants::{DieselConstants, TimeConstants};

/// 디젤 발전기 운전비 계산 입력.
#[derive(Debug, Clone, Copy)]
pub struct DieselInput {
    pub load_kw: f64,
    /// 발전기 용량 [kVA]
    pub capacity_kva: f64,
    /// 경유 단가 [$/L]
    pub diesel_price: f64,
    /// 도난/유실 비율 [%]
    pub pilferage_factor: f64,
}

/// 디젤 발전기 운전비 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DieselAnalysis {
    /// [kW]
    pub capacity_kw: f64,
    /// 부하율 [%]
    pub load_factor: f64,
    /// 연료 소비 [L/h]
    pub fuel_consumption_hourly: f64,
    /// 유실분을 포함한 연료 소비 [L/h]
    pub fuel_with_theft: f64,
    /// 연료비 + 정비비 [$/day]
    pub daily_cost: f64,
    /// [$/yr]
    pub annual_cost: f64,
    /// 연간 CO2 배출 [kg/yr]
    pub co2_emissions_kg: f64,
}

/// 무부하 항 + 부하 비례 항의 연료 곡선으로 디젤 운전비를 구한다.
pub fn analyze_diesel(input: DieselInput, k: &DieselConstants, t: &TimeConstants) -> DieselAnalysis {
    let capacity_kw = input.capacity_kva * k.power_factor;
    let load_factor = input.load_kw / capacity_kw * 100.0;
    let fuel_consumption_hourly =
        k.idle_fuel_coeff * capacity_kw + k.load_fuel_coeff * input.load_kw;
    let fuel_with_theft = fuel_consumption_hourly * (1.0 + input.pilferage_factor / 100.0);

    let fuel_cost_daily = fuel_with_theft * t.hours_per_day * input.diesel_price;
    let maintenance_daily = k.maintenance_per_hour * t.hours_per_day;
    let daily_cost = fuel_cost_daily + maintenance_daily;

    DieselAnalysis {
        capacity_kw,
        load_factor,
        fuel_consumption_hourly,
        fuel_with_theft,
        daily_cost,
        annual_cost: daily_cost * t.days_per_year,
        co2_emissions_kg: fuel_with_theft * t.hours_per_day * t.days_per_year * k.co2_kg_per_liter,
    }
}
