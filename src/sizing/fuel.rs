/// 연료전지 연료 소비량.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelConsumption {
    /// [kg/h]
    pub hourly_kg: f64,
    /// [kg/day]
    pub daily_kg: f64,
}

/// 총 출력 요구량을 효율과 발열량으로 나눠 연료 소비량을 구한다.
///
/// `efficiency_pct`는 백분율(0~100), `lhv`는 kWh/kg.
pub fn fuel_consumption(
    gross_power_required: f64,
    efficiency_pct: f64,
    lhv: f64,
    hours_per_day: f64,
) -> FuelConsumption {
    let hourly_kg = gross_power_required / (efficiency_pct / 100.0) / lhv;
    FuelConsumption {
        hourly_kg,
        daily_kg: hourly_kg * hours_per_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_kw_at_fifty_percent() {
        let f = fuel_consumption(4.0, 50.0, 33.3, 24.0);
        assert!((f.hourly_kg - 0.2402).abs() < 1e-4);
        assert!((f.daily_kg - f.hourly_kg * 24.0).abs() < 1e-12);
    }
}
