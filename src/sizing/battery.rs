use super::{checked_count, SizingError};
use crate::constants::ElectricalConstants;

/// 배터리 버퍼 사이징 입력.
#[derive(Debug, Clone, Copy)]
pub struct BatteryInput {
    pub load_kw: f64,
    /// 버퍼 시간 [h]
    pub buffer_hours: f64,
    /// 방전 심도 (소수)
    pub dod: f64,
    /// DC 버스 전압 [V]
    pub system_voltage: f64,
}

/// 배터리 버퍼 사이징 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySizing {
    pub capacity_kwh: f64,
    pub capacity_ah: f64,
    /// 스트링 수 (스트링 1개 용량은 계수 테이블 값)
    pub strings: u64,
}

/// 스트링 수가 정확히 표현되지 않을 만큼 크면 `CountOutOfRange`를 돌려준다.
pub fn size_battery(
    input: BatteryInput,
    k: &ElectricalConstants,
) -> Result<BatterySizing, SizingError> {
    let capacity_kwh = input.load_kw * input.buffer_hours / input.dod;
    let capacity_ah =
        input.load_kw * 1000.0 * input.buffer_hours / (input.system_voltage * input.dod);
    Ok(BatterySizing {
        capacity_kwh,
        capacity_ah,
        strings: checked_count("batteryStrings", capacity_ah / k.battery_string_ah)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_kw_four_hours_at_48v() {
        let b = size_battery(
            BatteryInput {
                load_kw: 4.0,
                buffer_hours: 4.0,
                dod: 0.8,
                system_voltage: 48.0,
            },
            &ElectricalConstants::default(),
        )
        .expect("battery");
        assert!((b.capacity_kwh - 20.0).abs() < 1e-9);
        // 16000 Wh / (48 × 0.8) = 416.7 Ah → 150 Ah 스트링 3개
        assert!((b.capacity_ah - 416.666_666).abs() < 1e-3);
        assert_eq!(b.strings, 3);
    }

    #[test]
    fn string_count_beyond_u32_is_exact() {
        let b = size_battery(
            BatteryInput {
                load_kw: 1e9,
                buffer_hours: 24.0,
                dod: 0.5,
                system_voltage: 24.0,
            },
            &ElectricalConstants::default(),
        )
        .expect("battery");
        assert_eq!(b.capacity_ah, 2e12);
        assert_eq!(b.strings, 13_333_333_334);
    }

    #[test]
    fn unrepresentable_string_count_is_an_error() {
        let err = size_battery(
            BatteryInput {
                load_kw: 1e15,
                buffer_hours: 24.0,
                dod: 0.5,
                system_voltage: 24.0,
            },
            &ElectricalConstants::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SizingError::CountOutOfRange { quantity: "batteryStrings", .. }
        ));
    }
}
