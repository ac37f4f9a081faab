use std::path::PathBuf;

use fuel_cell_sizing_toolbox::{
    app::{self, Context, OutputFormat},
    config::Config,
    economics::{AssetRecommendation, AssetRequest},
    sizing::{SizingEngine, SizingError},
};

fn recommend(kva: f64, load_kw: f64, age: f64) -> AssetRecommendation {
    SizingEngine::default()
        .assess_asset(&AssetRequest::new(kva, load_kw, age))
        .expect("assess")
        .recommendation
}

// 25 kVA × 0.8 = 20 kW 이므로 부하 kW × 5 = 부하율 %.

#[test]
fn below_lower_band_splits_on_age() {
    assert_eq!(recommend(25.0, 5.99, 10.0), AssetRecommendation::Relocate);
    assert_eq!(recommend(25.0, 5.99, 10.5), AssetRecommendation::Replace);
    assert_eq!(recommend(25.0, 1.0, 0.0), AssetRecommendation::Relocate);
}

#[test]
fn lower_band_edge_is_keep() {
    assert_eq!(recommend(25.0, 6.0, 30.0), AssetRecommendation::Keep);
}

#[test]
fn upper_band_edge_is_keep() {
    assert_eq!(recommend(25.0, 14.0, 30.0), AssetRecommendation::Keep);
    assert_eq!(recommend(25.0, 14.01, 30.0), AssetRecommendation::Support);
}

#[test]
fn overloaded_set_needs_support() {
    let a = SizingEngine::default()
        .assess_asset(&AssetRequest::new(25.0, 24.0, 2.0))
        .expect("assess");
    assert_eq!(a.recommendation, AssetRecommendation::Support);
    assert!((a.load_factor - 120.0).abs() < 1e-9);
    assert_eq!(a.efficiency_loss, 0.0);
    assert_eq!(a.annual_waste_estimate, 0.0);
}

#[test]
fn waste_shrinks_as_load_factor_rises() {
    let engine = SizingEngine::default();
    let light = engine
        .assess_asset(&AssetRequest::new(25.0, 2.0, 5.0))
        .expect("assess");
    let medium = engine
        .assess_asset(&AssetRequest::new(25.0, 10.0, 5.0))
        .expect("assess");
    assert!(light.efficiency_loss > medium.efficiency_loss);
    assert!(light.excess_capacity_kw > medium.excess_capacity_kw);
}

#[test]
fn invalid_asset_request_is_rejected() {
    let err = SizingEngine::default()
        .assess_asset(&AssetRequest::new(25.0, 5.0, -1.0))
        .unwrap_err();
    assert!(matches!(
        err,
        SizingError::Validation { field: "dgAgeYears", .. }
    ));
}

#[test]
fn asset_request_file_uses_defaults() {
    let req: AssetRequest =
        serde_json::from_str(r#"{"dgCapacityKva": 20, "loadKw": 3, "dgAgeYears": 8}"#)
            .expect("parse");
    assert_eq!(req, AssetRequest::new(20.0, 3.0, 8.0));
    assert_eq!(req.monthly_running_hours, 500.0);
}

#[test]
fn asset_report_in_text_and_csv() {
    let ctx = Context::new(Config::default(), PathBuf::from("unused.toml"), Some("en"))
        .expect("ctx");
    let req = AssetRequest::new(20.0, 3.0, 8.0);

    let mut buf = Vec::new();
    app::assess_asset(&ctx, &req, OutputFormat::Text, &mut buf).expect("text");
    let text = String::from_utf8(buf).expect("utf8");
    assert!(text.contains("relocate"));
    assert!(text.contains("hub site"));

    let mut buf = Vec::new();
    app::assess_asset(&ctx, &req, OutputFormat::Csv, &mut buf).expect("csv");
    let csv = String::from_utf8(buf).expect("utf8");
    assert!(csv.starts_with("Category,Parameter,Value,Unit"));
    assert!(csv.contains("Assessment,Recommendation,relocate,"));
    assert!(csv.contains("Assessment,Load Factor,19,%"));
}
