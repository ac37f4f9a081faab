use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use fuel_cell_sizing_toolbox::app::{
    self, AppError, AssetOverrides, Context, OutputFormat, RequestOverrides,
};
use fuel_cell_sizing_toolbox::economics::AssetRequest;
use fuel_cell_sizing_toolbox::sizing::SizingRequest;
use fuel_cell_sizing_toolbox::config::{self, DEFAULT_CONFIG_PATH};

/// 연료전지 백업 전원 사이징 및 디젤 발전기 대비 경제성 비교 도구.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// 표시 언어 (auto/ko/en)
    #[arg(long, short = 'L')]
    lang: Option<String>,
    /// 로그 상세도 (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 요청 하나를 평가한다.
    Calculate {
        /// JSON 요청 파일
        #[arg(long)]
        request: Option<PathBuf>,
        #[command(flatten)]
        overrides: RequestOverrides,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// 결과 파일. 없으면 표준 출력.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// 기존 디젤 발전기의 부하율/연수로 처리 방안을 진단한다.
    Asset {
        /// JSON 요청 파일
        #[arg(long)]
        request: Option<PathBuf>,
        #[command(flatten)]
        overrides: AssetOverrides,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// 결과 파일. 없으면 표준 출력.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// 연료전지 카탈로그를 출력한다.
    Catalog,
    /// 현재 계수 테이블을 TOML로 출력한다.
    Constants,
    /// 대화형 메뉴.
    Interactive,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 명령을 실행한다.
fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    if let Err(err) = try_run(cli) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let cfg = config::load_or_default(&cli.config)?;
    let mut ctx = Context::new(cfg, cli.config.clone(), cli.lang.as_deref())?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Calculate {
            request,
            overrides,
            format,
            output,
        } => {
            let base = request
                .as_deref()
                .map(app::read_request::<SizingRequest>)
                .transpose()?;
            let req = overrides.into_request(base)?;
            match output {
                Some(path) => app::calculate_to_file(&ctx, &req, format, &path)?,
                None => app::calculate(&ctx, &req, format, &mut io::stdout().lock())?,
            }
        }
        Command::Asset {
            request,
            overrides,
            format,
            output,
        } => {
            let base = request
                .as_deref()
                .map(app::read_request::<AssetRequest>)
                .transpose()?;
            let req = overrides.into_request(base)?;
            match output {
                Some(path) => app::render_to_file(&path, |buf| {
                    app::assess_asset(&ctx, &req, format, buf)
                })?,
                None => app::assess_asset(&ctx, &req, format, &mut io::stdout().lock())?,
            }
        }
        Command::Catalog => app::print_catalog(&ctx, &mut io::stdout().lock())?,
        Command::Constants => app::print_constants(&ctx, &mut io::stdout().lock())?,
        Command::Interactive => app::run(&mut ctx)?,
    }
    Ok(())
}
