use crate::constants::ElectricalConstants;

/// 케이블 사이징 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CableSizing {
    /// 부하 전류 [A]
    pub current_amps: f64,
    /// 필요 단면적 [mm²]
    pub cable_size_mm2: f64,
}

/// 허용 전류 밀도 경험식으로 DC 케이블 단면적을 구한다.
pub fn size_cable(load_kw: f64, system_voltage: f64, k: &ElectricalConstants) -> CableSizing {
    let current_amps = load_kw * 1000.0 / system_voltage;
    CableSizing {
        current_amps,
        cable_size_mm2: current_amps / k.cable_ampacity_a_per_mm2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_amps_per_square_millimetre() {
        let c = size_cable(4.8, 48.0, &ElectricalConstants::default());
        assert!((c.current_amps - 100.0).abs() < 1e-9);
        assert!((c.cable_size_mm2 - 25.0).abs() < 1e-9);
    }
}
