//! 수소 실린더 보급 계획.

use crate::constants::{LogisticsConstants, TimeConstants};
use crate::sizing::{checked_count, SizingError};

/// 보급 주기 동안의 수소 물류 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticsPlan {
    /// 보급 주기 1회분 수소량 [kg]
    pub total_h2_required: f64,
    pub cylinders_required: u64,
    pub bundles_required: u64,
}

/// 보급 주기 동안 필요한 실린더/번들 수를 올림으로 구한다.
///
/// 실린더 수가 정확히 표현되지 않을 만큼 크면 `CountOutOfRange`를 돌려준다.
pub fn plan_logistics(
    fuel_consumption_hourly_kg: f64,
    refueling_cycle_days: f64,
    k: &LogisticsConstants,
    t: &TimeConstants,
) -> Result<LogisticsPlan, SizingError> {
    let total_h2_required = fuel_consumption_hourly_kg * t.hours_per_day * refueling_cycle_days;
    let cylinders_required =
        checked_count("cylindersRequired", total_h2_required / k.cylinder_usable_kg)?;
    Ok(LogisticsPlan {
        total_h2_required,
        cylinders_required,
        bundles_required: cylinders_required.div_ceil(u64::from(k.cylinders_per_bundle)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(hourly: f64, days: f64) -> LogisticsPlan {
        plan_logistics(
            hourly,
            days,
            &LogisticsConstants::default(),
            &TimeConstants::default(),
        )
        .expect("plan")
    }

    #[test]
    fn weekly_cycle_for_small_site() {
        // 0.25 kg/h × 24 × 7 = 42 kg → 48 실린더 → 4 번들
        let p = plan(0.25, 7.0);
        assert!((p.total_h2_required - 42.0).abs() < 1e-9);
        assert_eq!(p.cylinders_required, 48);
        assert_eq!(p.bundles_required, 4);
    }

    #[test]
    fn partial_bundle_rounds_up() {
        let p = plan(0.1, 5.0);
        // 12 kg → 14 실린더 → 2 번들
        assert_eq!(p.cylinders_required, 14);
        assert_eq!(p.bundles_required, 2);
    }

    #[test]
    fn cylinder_count_beyond_u32_is_exact() {
        // 6.0e7 kg/h × 24 × 60 = 8.64e10 kg
        let p = plan(6.0e7, 60.0);
        let expected = (p.total_h2_required / 0.89).ceil();
        assert!(expected > f64::from(u32::MAX));
        assert_eq!(p.cylinders_required as f64, expected);
        assert_eq!(p.bundles_required, p.cylinders_required.div_ceil(12));
    }

    #[test]
    fn unrepresentable_cylinder_count_is_an_error() {
        let err = plan_logistics(
            1e15,
            60.0,
            &LogisticsConstants::default(),
            &TimeConstants::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SizingError::CountOutOfRange { quantity: "cylindersRequired", .. }
        ));
    }
}
