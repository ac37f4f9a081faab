use crate::constants::DeratingConstants;

/// 온도/고도 출력 감소 계산 입력.
#[derive(Debug, Clone, Copy)]
pub struct DeratingInput {
    /// 최고 외기온도 [°C]
    pub max_temperature_c: f64,
    /// 설치 고도 [m]
    pub altitude_m: f64,
}

/// 선형 구간 근사로 출력 감소 계수를 구한다.
///
/// 기준 온도 초과 1 °C마다, 기준 고도 초과 100 m마다 일정 비율을 빼고
/// 하한으로 고정한다. 반복 계산은 하지 않는다.
pub fn derating_factor(input: DeratingInput, k: &DeratingConstants) -> f64 {
    let mut factor = 1.0;
    if input.max_temperature_c > k.reference_temperature_c {
        factor -= (input.max_temperature_c - k.reference_temperature_c) * k.per_degree_c;
    }
    if input.altitude_m > k.altitude_threshold_m {
        factor -= (input.altitude_m - k.altitude_threshold_m) / 100.0 * k.per_100m;
    }
    factor.max(k.floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(t: f64, alt: f64) -> f64 {
        derating_factor(
            DeratingInput {
                max_temperature_c: t,
                altitude_m: alt,
            },
            &DeratingConstants::default(),
        )
    }

    #[test]
    fn no_derating_at_reference_conditions() {
        assert_eq!(factor(35.0, 0.0), 1.0);
        assert_eq!(factor(-20.0, 500.0), 1.0);
    }

    #[test]
    fn hot_site_loses_one_and_a_half_percent_per_degree() {
        assert!((factor(45.0, 0.0) - 0.85).abs() < 1e-12);
    }

    #[test]
    fn altitude_and_temperature_combine() {
        // 1500 m → 10 % 감소, 40 °C → 7.5 % 감소
        assert!((factor(40.0, 1500.0) - 0.825).abs() < 1e-12);
    }

    #[test]
    fn floor_is_enforced() {
        assert_eq!(factor(60.0, 5000.0), 0.5);
    }
}
