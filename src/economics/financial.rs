use serde::{Deserialize, Serialize};

use crate::constants::{PaybackConstants, TimeConstants};

/// 회수기간 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaybackStatus {
    Excellent,
    Good,
    Marginal,
    BreakEven,
    DieselFavorable,
}

impl PaybackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaybackStatus::Excellent => "excellent",
            PaybackStatus::Good => "good",
            PaybackStatus::Marginal => "marginal",
            PaybackStatus::BreakEven => "break-even",
            PaybackStatus::DieselFavorable => "diesel-favorable",
        }
    }
}

impl std::fmt::Display for PaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 재무 비교 입력.
#[derive(Debug, Clone, Copy)]
pub struct FinancialInput {
    /// 디젤 일 운전비 [$/day]
    pub dg_daily_cost: f64,
    /// 연료전지 일 운전비 [$/day]
    pub fc_daily_cost: f64,
    /// 연료전지 설비비 [$]
    pub fc_capex: f64,
    /// 디젤 발전기 설비비 [$]
    pub dg_capex: f64,
}

/// 재무 비교 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialComparison {
    pub daily_savings: f64,
    pub annual_savings: f64,
    pub capex_difference: f64,
    /// 연간 절감액이 양수이고 나눗셈이 유한할 때만 값이 있다.
    pub payback_years: Option<f64>,
    pub payback_status: PaybackStatus,
}

/// 단순 회수기간과 등급을 계산한다.
///
/// 절감액이 0 이하이면 회수기간은 None이고 등급이 그 이유를 나타낸다.
/// 설비비 차이가 음수(연료전지가 더 싼 경우)이면 회수기간도 음수가 되며
/// 등급은 `Excellent`로 분류된다.
///
/// 절감액이 양수여도 나눗셈이 유한값을 넘으면 회수기간은 None이다. 이때
/// 등급은 설비비 차이의 부호로 정한다: 0 이하면 `Excellent`, 양수면 `Marginal`.
pub fn compare_financials(
    input: FinancialInput,
    p: &PaybackConstants,
    t: &TimeConstants,
) -> FinancialComparison {
    let daily_savings = input.dg_daily_cost - input.fc_daily_cost;
    let annual_savings = daily_savings * t.days_per_year;
    let capex_difference = input.fc_capex - input.dg_capex;

    let (payback_years, payback_status) = if annual_savings > 0.0 {
        let years = capex_difference / annual_savings;
        if !years.is_finite() {
            let status = if capex_difference <= 0.0 {
                PaybackStatus::Excellent
            } else {
                PaybackStatus::Marginal
            };
            (None, status)
        } else if years <= p.excellent_max_years {
            (Some(years), PaybackStatus::Excellent)
        } else if years <= p.good_max_years {
            (Some(years), PaybackStatus::Good)
        } else {
            (Some(years), PaybackStatus::Marginal)
        }
    } else if annual_savings == 0.0 {
        (None, PaybackStatus::BreakEven)
    } else {
        (None, PaybackStatus::DieselFavorable)
    };

    FinancialComparison {
        daily_savings,
        annual_savings,
        capex_difference,
        payback_years,
        payback_status,
    }
}
