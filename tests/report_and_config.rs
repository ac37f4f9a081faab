use std::path::PathBuf;

use fuel_cell_sizing_toolbox::{
    app::{self, Context, OutputFormat},
    catalog::{BuiltInCatalog, FuelCellCatalog, TomlCatalog},
    config::{self, Config},
    i18n::Translator,
    report::{self, SizingReport},
    sizing::{SizingEngine, SizingRequest},
};

fn evaluate(req: &SizingRequest) -> SizingReport {
    let r = SizingEngine::default()
        .calculate(req, &BuiltInCatalog::new())
        .expect("calc");
    SizingReport::new(&r, req)
}

#[test]
fn report_rounding_rules() {
    let req = SizingRequest::new(4.0, 1, 8.0);
    let rep = evaluate(&req);
    assert_eq!(rep.derating_factor, 1.0);
    assert_eq!(rep.gross_power_required, 4.0);
    // 4 / 0.5 / 33.3 = 0.24024...
    assert_eq!(rep.fuel_consumption_hourly, 0.24);
    assert_eq!(rep.dg_load_factor, 25);
    assert_eq!(rep.dg_fuel_consumption_hourly, 2.08);
    assert_eq!(rep.dg_daily_cost, 66.91);
    assert_eq!(rep.capacity_margin, 15);
    assert_eq!(rep.battery_strings, 3);
    if let Some(y) = rep.payback_years {
        assert_eq!(y, (y * 10.0).round() / 10.0);
    }
}

#[test]
fn null_payback_serializes_as_null() {
    let mut req = SizingRequest::new(4.0, 1, 8.0);
    req.h2_price = 60.0;
    let json = evaluate(&req).to_json_pretty().expect("json");
    assert!(json.contains("\"paybackYears\": null"));
    assert!(json.contains("\"paybackStatus\": \"diesel-favorable\""));
}

#[test]
fn csv_has_header_and_categories() {
    let req = SizingRequest::new(12.0, 3, 8.0);
    let rep = evaluate(&req);
    let spec = BuiltInCatalog::new().get_fuel_cell_spec(3).expect("spec");
    let mut buf = Vec::new();
    report::write_csv(&mut buf, &rep, &req, &spec).expect("csv");
    let text = String::from_utf8(buf).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Category,Parameter,Value,Unit"));
    assert!(text.contains("Fuel Cell,Model,GenDrive 1000,"));
    assert!(text.contains("Logistics,Bundles,"));
}

#[test]
fn text_report_mentions_multiple_stacks() {
    // 10 kW 부하에 1.2 kW 모듈
    let req = SizingRequest::new(10.0, 2, 8.0);
    let rep = evaluate(&req);
    let spec = BuiltInCatalog::new().get_fuel_cell_spec(2).expect("spec");
    let tr = Translator::new("en");
    let text = report::render_text(&rep, &spec, &tr);
    assert!(text.contains("Ballard FCgen-1020ACS"));
    assert!(text.contains("multiple units"));
    assert!(!text.contains("Warning"));
}

#[test]
fn config_is_created_then_reloaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let created = config::load_or_default(&path).expect("create");
    assert!(path.exists());
    assert_eq!(created, Config::default());

    let mut changed = created.clone();
    changed.language = "en".to_string();
    changed.constants.logistics.cylinders_per_bundle = 16;
    changed.save(&path).expect("save");
    let reloaded = config::load_or_default(&path).expect("reload");
    assert_eq!(reloaded, changed);
}

#[test]
fn catalog_file_drives_the_cli_context() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("catalog.toml");
    std::fs::write(
        &catalog_path,
        r#"
[[fuel_cell]]
id = 100
manufacturer = "Site"
model = "Custom 8"
type = "PEMFC"
ratedPowerKw = 8.0
efficiency = 55.0
parasiticLoss = 0.05
capexPerKw = 2500.0
"#,
    )
    .expect("write catalog");
    assert_eq!(
        TomlCatalog::from_path(&catalog_path).expect("load").len(),
        1
    );

    let cfg = Config {
        catalog_path: Some(catalog_path),
        ..Config::default()
    };
    let ctx = Context::new(cfg, PathBuf::from("unused.toml"), Some("en")).expect("ctx");
    let mut buf = Vec::new();
    app::calculate(&ctx, &SizingRequest::new(6.0, 100, 8.0), OutputFormat::Json, &mut buf)
        .expect("calculate");
    let text = String::from_utf8(buf).expect("utf8");
    assert!(text.contains("\"fcCapex\": 20000.0"));
}
