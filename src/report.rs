//! 계산 결과를 응답 레코드/텍스트/CSV로 내보낸다.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::FuelCellSpec;
use crate::economics::{AssetAssessment, AssetRecommendation, AssetRequest, PaybackStatus};
use crate::i18n::{keys, Translator};
use crate::sizing::{CalculationResult, SizingRequest};

/// 보고서 출력 오류.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV 출력 오류: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON 출력 오류: {0}")]
    Json(#[from] serde_json::Error),
    #[error("출력 오류: {0}")]
    Io(#[from] std::io::Error),
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

fn whole(value: f64) -> i64 {
    value.round() as i64
}

/// 호출자에게 돌려주는 평면 응답 레코드.
///
/// 전력/금액/에너지/질량은 소수 2자리, 시간당 연료는 3자리, 개수는 정수,
/// 백분율은 정수, 회수기간은 1자리 또는 null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingReport {
    pub derating_factor: f64,
    pub gross_power_required: f64,
    pub parasitic_loss_kw: f64,
    pub net_output_kw: f64,

    pub fc_rated_power: f64,
    pub fc_derated_power: f64,
    pub required_stack_count: u64,
    pub total_rated_power: f64,
    pub total_derated_power: f64,
    pub needs_multiple_stacks: bool,
    pub is_undersized: bool,
    pub capacity_shortfall: f64,
    pub capacity_margin: i64,

    pub fuel_consumption_hourly: f64,
    pub fuel_consumption_daily: f64,

    pub battery_capacity_kwh: f64,
    pub battery_capacity_ah: f64,
    pub battery_strings: u64,
    pub current_amps: f64,
    pub cable_size_mm2: f64,

    pub dg_capacity_kw: f64,
    pub dg_load_factor: i64,
    pub dg_fuel_consumption_hourly: f64,
    pub dg_fuel_with_theft: f64,
    pub dg_daily_cost: f64,
    pub dg_annual_cost: f64,
    pub co2_savings: f64,

    pub fc_daily_cost: f64,
    pub fc_annual_cost: f64,

    pub daily_savings: f64,
    pub annual_savings: f64,
    pub fc_capex: f64,
    pub capex_difference: f64,
    pub payback_years: Option<f64>,
    pub payback_status: PaybackStatus,

    pub total_h2_required: f64,
    pub cylinders_required: u64,
    pub bundles_required: u64,

    pub autonomy_hours: f64,
    pub hours_per_year: f64,
}

impl SizingReport {
    pub fn new(result: &CalculationResult, request: &SizingRequest) -> Self {
        let r = result;
        Self {
            derating_factor: r.derating_factor,
            gross_power_required: round2(r.power.gross_power_required),
            parasitic_loss_kw: round2(r.power.parasitic_loss_kw),
            net_output_kw: round2(r.power.net_output_kw),
            fc_rated_power: r.fc_rated_power,
            fc_derated_power: round2(r.stacks.single_unit_derated_output),
            required_stack_count: r.stacks.required_stack_count,
            total_rated_power: round2(r.stacks.total_rated_power),
            total_derated_power: round2(r.stacks.total_derated_power),
            needs_multiple_stacks: r.stacks.needs_multiple_stacks,
            is_undersized: r.stacks.is_undersized,
            capacity_shortfall: round2(r.stacks.capacity_shortfall),
            capacity_margin: whole(r.stacks.capacity_margin),
            fuel_consumption_hourly: round_to(r.fuel.hourly_kg, 3),
            fuel_consumption_daily: round2(r.fuel.daily_kg),
            battery_capacity_kwh: round2(r.battery.capacity_kwh),
            battery_capacity_ah: round2(r.battery.capacity_ah),
            battery_strings: r.battery.strings,
            current_amps: round2(r.cable.current_amps),
            cable_size_mm2: round2(r.cable.cable_size_mm2),
            dg_capacity_kw: round2(r.dg_capacity_kw),
            dg_load_factor: whole(r.dg_load_factor),
            dg_fuel_consumption_hourly: round2(r.dg_fuel_consumption_hourly),
            dg_fuel_with_theft: round2(r.dg_fuel_with_theft),
            dg_daily_cost: round2(r.dg_daily_cost),
            dg_annual_cost: round2(r.dg_annual_cost),
            co2_savings: round2(r.co2_emissions),
            fc_daily_cost: round2(r.fc_daily_cost),
            fc_annual_cost: round2(r.fc_annual_cost),
            daily_savings: round2(r.daily_savings),
            annual_savings: round2(r.annual_savings),
            fc_capex: round2(r.fc_capex),
            capex_difference: round2(r.capex_difference),
            payback_years: r.payback_years.map(|y| round_to(y, 1)),
            payback_status: r.payback_status,
            total_h2_required: round2(r.total_h2_required),
            cylinders_required: r.cylinders_required,
            bundles_required: r.bundles_required,
            autonomy_hours: request.autonomy_hours,
            hours_per_year: request.hours_per_year,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 부하 규모별 권장 구성 안내.
pub fn recommendation(load_kw: f64, tr: &Translator) -> String {
    let key = if load_kw < 5.0 {
        keys::RECOMMEND_SMALL
    } else if load_kw < 20.0 {
        keys::RECOMMEND_MEDIUM
    } else {
        keys::RECOMMEND_LARGE
    };
    tr.t(key).into_owned()
}

/// CSV 한 행: 구분, 항목, 값, 단위.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Parameter")]
    parameter: &'a str,
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Unit")]
    unit: &'a str,
}

fn fmt_num(v: f64) -> String {
    format!("{v}")
}

/// 현장 조건/연료전지/사이징/경제성/물류 항목을 CSV로 쓴다.
pub fn write_csv<W: Write>(
    writer: W,
    report: &SizingReport,
    request: &SizingRequest,
    spec: &FuelCellSpec,
) -> Result<(), ReportError> {
    let rows: Vec<(&str, &str, String, &str)> = vec![
        ("Site Parameters", "Load Requirement", fmt_num(request.load_kw), "kW"),
        ("Site Parameters", "Autonomy", fmt_num(request.autonomy_hours), "hours"),
        ("Site Parameters", "System Voltage", fmt_num(request.system_voltage), "VDC"),
        ("Site Parameters", "Temperature", fmt_num(request.max_temperature), "C"),
        ("Site Parameters", "Altitude", fmt_num(request.altitude), "m"),
        ("Site Parameters", "Operating Hours", fmt_num(request.hours_per_year), "h/yr"),
        ("Fuel Cell", "Manufacturer", spec.manufacturer.clone(), ""),
        ("Fuel Cell", "Model", spec.model.clone(), ""),
        ("Fuel Cell", "Type", spec.kind.to_string(), ""),
        ("Fuel Cell", "Rated Power", fmt_num(report.fc_rated_power), "kW"),
        ("Fuel Cell", "Efficiency", fmt_num(spec.efficiency), "%"),
        ("Sizing", "Derating Factor", fmt_num(report.derating_factor), ""),
        ("Sizing", "Gross Power Required", fmt_num(report.gross_power_required), "kW"),
        ("Sizing", "Parasitic Loss", fmt_num(report.parasitic_loss_kw), "kW"),
        ("Sizing", "Net Output", fmt_num(report.net_output_kw), "kW"),
        ("Sizing", "Derated Power per Unit", fmt_num(report.fc_derated_power), "kW"),
        ("Sizing", "Required Stacks", report.required_stack_count.to_string(), "units"),
        ("Sizing", "Total Rated Power", fmt_num(report.total_rated_power), "kW"),
        ("Sizing", "Total Derated Power", fmt_num(report.total_derated_power), "kW"),
        ("Sizing", "Capacity Margin", report.capacity_margin.to_string(), "%"),
        ("Sizing", "Hydrogen Consumption", fmt_num(report.fuel_consumption_hourly), "kg/h"),
        ("Sizing", "Daily Hydrogen", fmt_num(report.fuel_consumption_daily), "kg/day"),
        ("Battery & Cable", "Battery Capacity", fmt_num(report.battery_capacity_kwh), "kWh"),
        ("Battery & Cable", "Battery Capacity", fmt_num(report.battery_capacity_ah), "Ah"),
        ("Battery & Cable", "Battery Strings", report.battery_strings.to_string(), "strings"),
        ("Battery & Cable", "Load Current", fmt_num(report.current_amps), "A"),
        ("Battery & Cable", "Cable Size", fmt_num(report.cable_size_mm2), "mm2"),
        ("Diesel Generator", "Capacity", fmt_num(report.dg_capacity_kw), "kW"),
        ("Diesel Generator", "Load Factor", report.dg_load_factor.to_string(), "%"),
        ("Diesel Generator", "Fuel Consumption", fmt_num(report.dg_fuel_consumption_hourly), "L/h"),
        ("Diesel Generator", "Fuel incl. Pilferage", fmt_num(report.dg_fuel_with_theft), "L/h"),
        ("Diesel Generator", "Daily Cost", fmt_num(report.dg_daily_cost), "$/day"),
        ("Diesel Generator", "Annual Cost", fmt_num(report.dg_annual_cost), "$/yr"),
        ("Diesel Generator", "CO2 Emissions", fmt_num(report.co2_savings), "kg/yr"),
        ("Fuel Cell Economics", "Daily Cost", fmt_num(report.fc_daily_cost), "$/day"),
        ("Fuel Cell Economics", "Annual Cost", fmt_num(report.fc_annual_cost), "$/yr"),
        ("Fuel Cell Economics", "CAPEX", fmt_num(report.fc_capex), "$"),
        ("Financial Comparison", "Daily Savings", fmt_num(report.daily_savings), "$/day"),
        ("Financial Comparison", "Annual Savings", fmt_num(report.annual_savings), "$/yr"),
        ("Financial Comparison", "CAPEX Difference", fmt_num(report.capex_difference), "$"),
        (
            "Financial Comparison",
            "Payback Period",
            report
                .payback_years
                .map(fmt_num)
                .unwrap_or_else(|| "N/A".to_string()),
            "years",
        ),
        ("Financial Comparison", "Payback Status", report.payback_status.to_string(), ""),
        ("Logistics", "H2 per Refueling Cycle", fmt_num(report.total_h2_required), "kg"),
        ("Logistics", "Cylinders", report.cylinders_required.to_string(), "cylinders"),
        ("Logistics", "Bundles", report.bundles_required.to_string(), "bundles"),
    ];

    write_rows(writer, rows)
}

fn write_rows<W: Write>(writer: W, rows: Vec<(&str, &str, String, &str)>) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (category, parameter, value, unit) in rows {
        wtr.serialize(CsvRow {
            category,
            parameter,
            value,
            unit,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// 터미널용 보고서 문자열을 만든다.
pub fn render_text(report: &SizingReport, spec: &FuelCellSpec, tr: &Translator) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("  {label:<28} {value}\n"));
    };

    line(&tr.t(keys::REPORT_FUEL_CELL), spec.display_name());
    line(
        &tr.t(keys::REPORT_DERATING),
        format!("{:.3}", report.derating_factor),
    );
    line(
        &tr.t(keys::REPORT_GROSS_POWER),
        format!(
            "{:.2} kW ({} {:.2} kW)",
            report.gross_power_required,
            tr.t(keys::REPORT_PARASITIC),
            report.parasitic_loss_kw
        ),
    );
    line(
        &tr.t(keys::REPORT_STACKS),
        format!(
            "{} × {:.2} kW = {:.2} kW ({:+}%)",
            report.required_stack_count,
            report.fc_derated_power,
            report.total_derated_power,
            report.capacity_margin
        ),
    );
    line(
        &tr.t(keys::REPORT_H2_CONSUMPTION),
        format!(
            "{:.3} kg/h, {:.2} kg/day",
            report.fuel_consumption_hourly, report.fuel_consumption_daily
        ),
    );
    line(
        &tr.t(keys::REPORT_BATTERY),
        format!(
            "{:.2} kWh / {:.0} Ah / {}",
            report.battery_capacity_kwh, report.battery_capacity_ah, report.battery_strings
        ),
    );
    line(
        &tr.t(keys::REPORT_CABLE),
        format!("{:.2} A → {:.2} mm²", report.current_amps, report.cable_size_mm2),
    );
    line(
        &tr.t(keys::REPORT_DIESEL),
        format!(
            "{:.2} kW, {}%, {:.2} L/h ({:.2} L/h)",
            report.dg_capacity_kw,
            report.dg_load_factor,
            report.dg_fuel_consumption_hourly,
            report.dg_fuel_with_theft
        ),
    );
    line(
        &tr.t(keys::REPORT_DAILY_COST),
        format!(
            "DG {:.2} $ / FC {:.2} $",
            report.dg_daily_cost, report.fc_daily_cost
        ),
    );
    line(
        &tr.t(keys::REPORT_ANNUAL_COST),
        format!(
            "DG {:.2} $ / FC {:.2} $",
            report.dg_annual_cost, report.fc_annual_cost
        ),
    );
    line(
        &tr.t(keys::REPORT_SAVINGS),
        format!(
            "{:.2} $/day, {:.2} $/yr",
            report.daily_savings, report.annual_savings
        ),
    );
    line(
        &tr.t(keys::REPORT_CAPEX),
        format!(
            "FC {:.2} $ (Δ {:.2} $)",
            report.fc_capex, report.capex_difference
        ),
    );
    let payback = match report.payback_years {
        Some(y) => format!("{y:.1} ({})", report.payback_status),
        None => format!("N/A ({})", report.payback_status),
    };
    line(&tr.t(keys::REPORT_PAYBACK), payback);
    line(
        &tr.t(keys::REPORT_CO2),
        format!("{:.2} kg/yr", report.co2_savings),
    );
    line(
        &tr.t(keys::REPORT_LOGISTICS),
        format!(
            "{:.2} kg → {} / {}",
            report.total_h2_required, report.cylinders_required, report.bundles_required
        ),
    );

    if report.needs_multiple_stacks {
        out.push_str(&format!("\n{}\n", tr.t(keys::REPORT_MULTIPLE_STACKS)));
    }
    if report.is_undersized {
        out.push_str(&format!(
            "\n{} ({:.2} kW)\n",
            tr.t(keys::REPORT_UNDERSIZED),
            report.capacity_shortfall
        ));
    }
    out
}

/// 자산 진단 응답 레코드. 부하율은 정수 %, 나머지는 소수 2자리.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReport {
    pub dg_capacity_kw: f64,
    pub load_factor: i64,
    pub dg_age_years: f64,
    pub recommendation: AssetRecommendation,
    pub efficiency_loss: f64,
    pub annual_waste_estimate: f64,
    pub excess_capacity_kw: f64,
    pub wasted_fuel_hourly: f64,
    pub wasted_fuel_annual: f64,
    pub wasted_co2_kg: f64,
}

impl AssetReport {
    pub fn new(a: &AssetAssessment, request: &AssetRequest) -> Self {
        Self {
            dg_capacity_kw: round2(a.dg_capacity_kw),
            load_factor: whole(a.load_factor),
            dg_age_years: request.dg_age_years,
            recommendation: a.recommendation,
            efficiency_loss: round2(a.efficiency_loss),
            annual_waste_estimate: round2(a.annual_waste_estimate),
            excess_capacity_kw: round2(a.excess_capacity_kw),
            wasted_fuel_hourly: round2(a.wasted_fuel_hourly),
            wasted_fuel_annual: round2(a.wasted_fuel_annual),
            wasted_co2_kg: round2(a.wasted_co2_kg),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn asset_action_key(r: AssetRecommendation) -> &'static str {
    match r {
        AssetRecommendation::Replace => keys::ASSET_ACTION_REPLACE,
        AssetRecommendation::Relocate => keys::ASSET_ACTION_RELOCATE,
        AssetRecommendation::Keep => keys::ASSET_ACTION_KEEP,
        AssetRecommendation::Support => keys::ASSET_ACTION_SUPPORT,
    }
}

/// 자산 진단 결과를 CSV로 쓴다.
pub fn write_asset_csv<W: Write>(
    writer: W,
    report: &AssetReport,
    request: &AssetRequest,
) -> Result<(), ReportError> {
    let rows: Vec<(&str, &str, String, &str)> = vec![
        ("Asset", "Rated Capacity", fmt_num(request.dg_capacity_kva), "kVA"),
        ("Asset", "Rated Power", fmt_num(report.dg_capacity_kw), "kW"),
        ("Asset", "Site Load", fmt_num(request.load_kw), "kW"),
        ("Asset", "Age", fmt_num(request.dg_age_years), "years"),
        ("Asset", "Monthly Running Hours", fmt_num(request.monthly_running_hours), "h"),
        ("Assessment", "Load Factor", report.load_factor.to_string(), "%"),
        ("Assessment", "Recommendation", report.recommendation.to_string(), ""),
        ("Assessment", "Efficiency Loss", fmt_num(report.efficiency_loss), "%"),
        ("Assessment", "Annual Waste Estimate", fmt_num(report.annual_waste_estimate), "$/yr"),
        ("Oversizing", "Excess Capacity", fmt_num(report.excess_capacity_kw), "kW"),
        ("Oversizing", "Wasted Fuel", fmt_num(report.wasted_fuel_hourly), "L/h"),
        ("Oversizing", "Wasted Fuel", fmt_num(report.wasted_fuel_annual), "L/yr"),
        ("Oversizing", "Wasted CO2", fmt_num(report.wasted_co2_kg), "kg/yr"),
    ];
    write_rows(writer, rows)
}

/// 터미널용 자산 진단 문자열을 만든다.
pub fn render_asset_text(report: &AssetReport, tr: &Translator) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("  {label:<28} {value}\n"));
    };
    line(
        &tr.t(keys::ASSET_LOAD_FACTOR),
        format!("{}% ({:.2} kW)", report.load_factor, report.dg_capacity_kw),
    );
    line(
        &tr.t(keys::ASSET_RECOMMENDATION),
        report.recommendation.to_string(),
    );
    line(
        &tr.t(keys::ASSET_EFFICIENCY_LOSS),
        format!("{:.2}%p", report.efficiency_loss),
    );
    line(
        &tr.t(keys::ASSET_ANNUAL_WASTE),
        format!("{:.2} $/yr", report.annual_waste_estimate),
    );
    line(
        &tr.t(keys::ASSET_EXCESS_CAPACITY),
        format!(
            "{:.2} kW → {:.2} L/h, {:.0} L/yr, {:.0} kg CO2/yr",
            report.excess_capacity_kw,
            report.wasted_fuel_hourly,
            report.wasted_fuel_annual,
            report.wasted_co2_kg
        ),
    );
    out.push_str(&format!(
        "\n{}\n",
        tr.t(asset_action_key(report.recommendation))
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_helpers() {
        assert_eq!(round2(66.9123), 66.91);
        assert_eq!(round_to(0.24024, 3), 0.24);
        assert_eq!(whole(24.6), 25);
        assert_eq!(whole(-3.4), -3);
    }

    #[test]
    fn every_recommendation_has_an_action_text() {
        let tr = Translator::new("en");
        for r in [
            AssetRecommendation::Replace,
            AssetRecommendation::Relocate,
            AssetRecommendation::Keep,
            AssetRecommendation::Support,
        ] {
            assert!(!tr.t(asset_action_key(r)).is_empty());
        }
    }
}
