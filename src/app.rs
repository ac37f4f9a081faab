use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::catalog::{BuiltInCatalog, CatalogError, FuelCellCatalog, FuelCellId, TomlCatalog};
use crate::config::{Config, ConfigError};
use crate::economics::AssetRequest;
use crate::i18n::{self, keys, Translator};
use crate::report::{self, AssetReport, ReportError, SizingReport};
use crate::sizing::{SizingEngine, SizingError, SizingRequest};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("카탈로그 오류: {0}")]
    Catalog(#[from] CatalogError),
    #[error("사이징 오류: {0}")]
    Sizing(#[from] SizingError),
    #[error("보고서 오류: {0}")]
    Report(#[from] ReportError),
    #[error("요청 파일 오류: {0}")]
    Request(#[from] serde_json::Error),
    #[error("필수 인자가 없습니다: {0}")]
    MissingArgument(&'static str),
    #[error("입력이 닫혔습니다.")]
    InputClosed,
}

/// `calculate` 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// 요청 항목별 명령행 플래그. 요청 파일 값을 덮어쓴다.
#[derive(Debug, Clone, Default, Args)]
pub struct RequestOverrides {
    #[arg(long)]
    pub load_kw: Option<f64>,
    #[arg(long)]
    pub max_temperature: Option<f64>,
    #[arg(long)]
    pub altitude: Option<f64>,
    #[arg(long)]
    pub fuel_cell_id: Option<FuelCellId>,
    #[arg(long)]
    pub autonomy_hours: Option<f64>,
    #[arg(long)]
    pub hours_per_year: Option<f64>,
    #[arg(long)]
    pub dg_capacity_kva: Option<f64>,
    #[arg(long)]
    pub diesel_price: Option<f64>,
    #[arg(long)]
    pub pilferage_factor: Option<f64>,
    #[arg(long)]
    pub dg_capex: Option<f64>,
    #[arg(long)]
    pub h2_price: Option<f64>,
    #[arg(long)]
    pub logistics_cost_pct: Option<f64>,
    #[arg(long)]
    pub battery_buffer_hours: Option<f64>,
    #[arg(long)]
    pub battery_dod: Option<f64>,
    #[arg(long)]
    pub system_voltage: Option<f64>,
    #[arg(long)]
    pub refueling_cycle_days: Option<f64>,
}

impl RequestOverrides {
    /// 기준 요청(파일)에 플래그를 덮어써서 최종 요청을 만든다.
    pub fn into_request(self, base: Option<SizingRequest>) -> Result<SizingRequest, AppError> {
        let mut req = match base {
            Some(req) => req,
            None => SizingRequest::new(
                self.load_kw.ok_or(AppError::MissingArgument("--load-kw"))?,
                self.fuel_cell_id
                    .ok_or(AppError::MissingArgument("--fuel-cell-id"))?,
                self.autonomy_hours
                    .ok_or(AppError::MissingArgument("--autonomy-hours"))?,
            ),
        };
        let fields: [(Option<f64>, &mut f64); 15] = [
            (self.load_kw, &mut req.load_kw),
            (self.max_temperature, &mut req.max_temperature),
            (self.altitude, &mut req.altitude),
            (self.autonomy_hours, &mut req.autonomy_hours),
            (self.hours_per_year, &mut req.hours_per_year),
            (self.dg_capacity_kva, &mut req.dg_capacity_kva),
            (self.diesel_price, &mut req.diesel_price),
            (self.pilferage_factor, &mut req.pilferage_factor),
            (self.dg_capex, &mut req.dg_capex),
            (self.h2_price, &mut req.h2_price),
            (self.logistics_cost_pct, &mut req.logistics_cost_pct),
            (self.battery_buffer_hours, &mut req.battery_buffer_hours),
            (self.battery_dod, &mut req.battery_dod),
            (self.system_voltage, &mut req.system_voltage),
            (self.refueling_cycle_days, &mut req.refueling_cycle_days),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if let Some(id) = self.fuel_cell_id {
            req.fuel_cell_id = id;
        }
        Ok(req)
    }
}

/// 자산 진단 항목별 명령행 플래그. 요청 파일 값을 덮어쓴다.
#[derive(Debug, Clone, Default, Args)]
pub struct AssetOverrides {
    #[arg(long)]
    pub dg_capacity_kva: Option<f64>,
    #[arg(long)]
    pub load_kw: Option<f64>,
    #[arg(long)]
    pub dg_age_years: Option<f64>,
    #[arg(long)]
    pub monthly_running_hours: Option<f64>,
    #[arg(long)]
    pub diesel_price: Option<f64>,
}

impl AssetOverrides {
    pub fn into_request(self, base: Option<AssetRequest>) -> Result<AssetRequest, AppError> {
        let mut req = match base {
            Some(req) => req,
            None => AssetRequest::new(
                self.dg_capacity_kva
                    .ok_or(AppError::MissingArgument("--dg-capacity-kva"))?,
                self.load_kw.ok_or(AppError::MissingArgument("--load-kw"))?,
                self.dg_age_years
                    .ok_or(AppError::MissingArgument("--dg-age-years"))?,
            ),
        };
        let fields: [(Option<f64>, &mut f64); 5] = [
            (self.dg_capacity_kva, &mut req.dg_capacity_kva),
            (self.load_kw, &mut req.load_kw),
            (self.dg_age_years, &mut req.dg_age_years),
            (self.monthly_running_hours, &mut req.monthly_running_hours),
            (self.diesel_price, &mut req.diesel_price),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
        Ok(req)
    }
}

/// 실행 중 공유하는 설정/번역기/엔진/카탈로그.
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub translator: Translator,
    pub engine: SizingEngine,
    pub catalog: Box<dyn FuelCellCatalog>,
}

impl Context {
    /// 설정으로부터 실행 컨텍스트를 구성한다.
    pub fn new(config: Config, config_path: PathBuf, cli_lang: Option<&str>) -> Result<Self, AppError> {
        let engine = SizingEngine::new(config.constants.clone())?;
        let catalog = build_catalog(&config)?;
        let translator = make_translator(&config, cli_lang);
        Ok(Self {
            config,
            config_path,
            translator,
            engine,
            catalog,
        })
    }

    /// 언어 설정이 바뀌었을 때 번역기를 다시 만든다.
    pub fn reload_translator(&mut self) {
        self.translator = make_translator(&self.config, None);
    }
}

fn make_translator(config: &Config, cli_lang: Option<&str>) -> Translator {
    let lang = i18n::resolve_language(cli_lang, Some(config.language.as_str()));
    Translator::new_with_pack(&lang, config.locale_dir.as_deref())
}

/// 설정에 카탈로그 파일이 있으면 읽고, 없으면 내장 카탈로그를 쓴다.
pub fn build_catalog(config: &Config) -> Result<Box<dyn FuelCellCatalog>, AppError> {
    match &config.catalog_path {
        Some(path) => Ok(Box::new(TomlCatalog::from_path(path)?)),
        None => Ok(Box::new(BuiltInCatalog::new())),
    }
}

/// JSON 요청 파일을 읽는다.
pub fn read_request<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// 요청 하나를 평가하고 지정한 형식으로 출력한다.
pub fn calculate<W: Write>(
    ctx: &Context,
    request: &SizingRequest,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    let result = ctx.engine.calculate(request, ctx.catalog.as_ref())?;
    let spec = ctx
        .catalog
        .get_fuel_cell_spec(request.fuel_cell_id)
        .ok_or(SizingError::NotFound {
            id: request.fuel_cell_id,
        })?;
    let rep = SizingReport::new(&result, request);
    match format {
        OutputFormat::Json => writeln!(out, "{}", rep.to_json_pretty()?)?,
        OutputFormat::Csv => report::write_csv(&mut *out, &rep, request, &spec)?,
        OutputFormat::Text => {
            let tr = &ctx.translator;
            writeln!(out, "{}", tr.t(keys::REPORT_HEADING))?;
            write!(out, "{}", report::render_text(&rep, &spec, tr))?;
            writeln!(
                out,
                "\n{} {}",
                tr.t(keys::REPORT_RECOMMENDATION),
                report::recommendation(request.load_kw, tr)
            )?;
        }
    }
    Ok(())
}

/// 결과를 메모리에 모두 만든 뒤 파일에 쓴다. 계산이 실패하면 파일을 만들지 않는다.
pub fn render_to_file<F>(path: &Path, render: F) -> Result<(), AppError>
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), AppError>,
{
    let mut buf = Vec::new();
    render(&mut buf)?;
    fs::write(path, buf)?;
    log::info!("결과를 {}에 저장했습니다.", path.display());
    Ok(())
}

pub fn calculate_to_file(
    ctx: &Context,
    request: &SizingRequest,
    format: OutputFormat,
    path: &Path,
) -> Result<(), AppError> {
    render_to_file(path, |buf| calculate(ctx, request, format, buf))
}

/// 디젤 발전기 자산을 진단하고 지정한 형식으로 출력한다.
pub fn assess_asset<W: Write>(
    ctx: &Context,
    request: &AssetRequest,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    let assessment = ctx.engine.assess_asset(request)?;
    let rep = AssetReport::new(&assessment, request);
    match format {
        OutputFormat::Json => writeln!(out, "{}", rep.to_json_pretty()?)?,
        OutputFormat::Csv => report::write_asset_csv(&mut *out, &rep, request)?,
        OutputFormat::Text => {
            writeln!(out, "{}", ctx.translator.t(keys::ASSET_HEADING))?;
            write!(out, "{}", report::render_asset_text(&rep, &ctx.translator))?;
        }
    }
    Ok(())
}

/// 카탈로그 목록을 표 형태로 출력한다.
pub fn print_catalog<W: Write>(ctx: &Context, out: &mut W) -> Result<(), AppError> {
    writeln!(out, "{}", ctx.translator.t(keys::CATALOG_HEADING))?;
    writeln!(out, "{}", ctx.translator.t(keys::CATALOG_COLUMNS))?;
    for spec in ctx.catalog.list() {
        writeln!(
            out,
            "{:>3}  {:<36} {:<5} {:>7.2} {:>6.1} {:>6.2} {:>6.1} {:>7.0}",
            spec.id,
            spec.display_name(),
            spec.kind,
            spec.rated_power_kw,
            spec.efficiency,
            spec.parasitic_loss_rate,
            spec.lhv,
            spec.capex_per_kw
        )?;
    }
    Ok(())
}

/// 현재 계수 테이블을 TOML로 출력한다.
pub fn print_constants<W: Write>(ctx: &Context, out: &mut W) -> Result<(), AppError> {
    let text = toml::to_string_pretty(ctx.engine.constants()).map_err(ConfigError::from)?;
    write!(out, "{text}")?;
    Ok(())
}

/// 대화형 메뉴 루프를 실행한다. 입력이 닫히면 정상 종료한다.
pub fn run(ctx: &mut Context) -> Result<(), AppError> {
    match menu_loop(ctx) {
        Err(AppError::InputClosed) => {
            log::info!("표준 입력이 닫혀 대화형 모드를 종료합니다.");
            Ok(())
        }
        other => other,
    }
}

fn menu_loop(ctx: &mut Context) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(&ctx.translator)? {
            MenuChoice::Calculate => {
                let request = ui_cli::prompt_request(ctx)?;
                let stdout = io::stdout();
                // 계산 오류는 메뉴로 돌아가 다시 입력받는다.
                match calculate(ctx, &request, OutputFormat::Text, &mut stdout.lock()) {
                    Ok(()) => {}
                    Err(AppError::Sizing(e)) => {
                        println!("{}: {e}", ctx.translator.t(keys::ERROR_PREFIX));
                    }
                    Err(e) => return Err(e),
                }
            }
            MenuChoice::Catalog => print_catalog(ctx, &mut io::stdout().lock())?,
            MenuChoice::Asset => {
                let request = ui_cli::prompt_asset(ctx)?;
                match assess_asset(ctx, &request, OutputFormat::Text, &mut io::stdout().lock()) {
                    Ok(()) => {}
                    Err(AppError::Sizing(e)) => {
                        println!("{}: {e}", ctx.translator.t(keys::ERROR_PREFIX));
                    }
                    Err(e) => return Err(e),
                }
            }
            MenuChoice::Settings => {
                if ui_cli::handle_settings(ctx)? {
                    ctx.config.save(&ctx.config_path)?;
                    ctx.reload_translator();
                }
            }
            MenuChoice::Exit => {
                println!("{}", ctx.translator.t(keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}
