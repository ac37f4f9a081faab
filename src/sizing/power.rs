use super::{SizingError, MAX_EXACT_COUNT};

/// 기생손실을 포함한 총 출력 요구량.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerBudget {
    /// 감소 계수를 보상한 총 출력 [kW]
    pub gross_power_required: f64,
    /// 팬/펌프 등 내부 소비 [kW]
    pub parasitic_loss_kw: f64,
    /// 외부 부하로 나가는 순출력 [kW]
    pub net_output_kw: f64,
}

/// 부하를 감소 계수로 나눠 총 출력 요구량을 구하고 기생손실을 뺀다.
pub fn power_budget(load_kw: f64, derating_factor: f64, parasitic_loss_rate: f64) -> PowerBudget {
    let gross_power_required = load_kw / derating_factor;
    let parasitic_loss_kw = gross_power_required * parasitic_loss_rate;
    PowerBudget {
        gross_power_required,
        parasitic_loss_kw,
        net_output_kw: gross_power_required - parasitic_loss_kw,
    }
}

/// 다중 스택 구성 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackConfiguration {
    /// 모듈 1기의 감소 후 순출력 [kW]
    pub single_unit_derated_output: f64,
    pub required_stack_count: u64,
    pub total_rated_power: f64,
    pub total_derated_power: f64,
    pub needs_multiple_stacks: bool,
    pub is_undersized: bool,
    /// 부족 출력 [kW], 0 이상
    pub capacity_shortfall: f64,
    /// 여유율 [%]
    pub capacity_margin: f64,
}

/// 부하를 감당하는 최소 모듈 수를 구한다.
///
/// 모듈 1기의 순출력이 0 이하이면 어떤 수로도 부하를 맞출 수 없으므로
/// `ArithmeticDegenerate`를 돌려준다. 순출력은 양수지만 필요한 대수가
/// 정확히 표현되지 않을 만큼 크면 `CountOutOfRange`다.
pub fn resolve_stacks(
    load_kw: f64,
    rated_power_kw: f64,
    derating_factor: f64,
    parasitic_loss_rate: f64,
) -> Result<StackConfiguration, SizingError> {
    let single = rated_power_kw * derating_factor * (1.0 - parasitic_loss_rate);
    if !single.is_finite() || single <= 0.0 {
        return Err(SizingError::ArithmeticDegenerate {
            single_unit_output_kw: single,
        });
    }

    let count = minimal_stack_count(load_kw, single)?;
    let n = count as f64;
    let total_rated_power = rated_power_kw * n;
    let total_derated_power = single * n;

    Ok(StackConfiguration {
        single_unit_derated_output: single,
        required_stack_count: count,
        total_rated_power,
        total_derated_power,
        needs_multiple_stacks: count > 1,
        // 올림 나눗셈이 맞으면 발생하지 않지만 불변식 확인용으로 남긴다.
        is_undersized: total_derated_power < load_kw,
        capacity_shortfall: (load_kw - total_derated_power).max(0.0),
        capacity_margin: (total_derated_power - load_kw) / load_kw * 100.0,
    })
}

/// n × single ≥ load 를 만족하는 최소 n (1 이상).
fn minimal_stack_count(load_kw: f64, single: f64) -> Result<u64, SizingError> {
    let ratio = (load_kw / single).ceil().max(1.0);
    // 보정 단계에서 한 칸 올라갈 수 있으므로 상한 바로 아래까지만 받는다.
    if !ratio.is_finite() || ratio >= MAX_EXACT_COUNT as f64 {
        return Err(SizingError::CountOutOfRange {
            quantity: "requiredStackCount",
            value: ratio,
        });
    }
    let mut n = ratio as u64;
    // 나눗셈 반올림 오차로 한 칸 어긋나는 경우를 보정한다.
    while n > 1 && (n - 1) as f64 * single >= load_kw {
        n -= 1;
    }
    while (n as f64) * single < load_kw {
        n += 1;
    }
    Ok(n)
}
