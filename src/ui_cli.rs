use std::io::{self, BufRead, Write};

use crate::app::{AppError, Context};
use crate::economics::AssetRequest;
use crate::i18n::{keys, Translator};
use crate::sizing::SizingRequest;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Calculate,
    Catalog,
    Settings,
    Asset,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
///
/// 입력이 닫히면(EOF) 종료를 선택한 것으로 본다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    main_menu_from(&mut io::stdin().lock(), tr)
}

fn main_menu_from<R: BufRead>(input: &mut R, tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_CALCULATE));
    println!("{}", tr.t(keys::MAIN_MENU_CATALOG));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_ASSET));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = match read_line_from(input, &tr.t(keys::PROMPT_MENU_SELECT)) {
            Ok(sel) => sel,
            Err(AppError::InputClosed) => return Ok(MenuChoice::Exit),
            Err(e) => return Err(e),
        };
        match parse_menu(&sel) {
            Some(choice) => return Ok(choice),
            None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

fn parse_menu(sel: &str) -> Option<MenuChoice> {
    match sel.trim() {
        "1" => Some(MenuChoice::Calculate),
        "2" => Some(MenuChoice::Catalog),
        "3" => Some(MenuChoice::Settings),
        "4" => Some(MenuChoice::Asset),
        "0" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// 사이징 요청을 대화형으로 입력받는다. 자주 바꾸지 않는 항목은 기본값을 제안한다.
pub fn prompt_request(ctx: &Context) -> Result<SizingRequest, AppError> {
    let tr = &ctx.translator;
    println!("{}", tr.t(keys::CALC_HEADING));
    println!("{}", tr.t(keys::CALC_DEFAULT_HINT));
    let load_kw = read_f64(tr, &tr.t(keys::PROMPT_LOAD_KW))?;
    let autonomy_hours = read_f64(tr, &tr.t(keys::PROMPT_AUTONOMY_HOURS))?;
    for spec in ctx.catalog.list() {
        println!("  {:>3}) {} ({:.1} kW)", spec.id, spec.display_name(), spec.rated_power_kw);
    }
    let fuel_cell_id = loop {
        let s = read_line(&tr.t(keys::PROMPT_FUEL_CELL_ID))?;
        match s.trim().parse::<u32>() {
            Ok(id) => break id,
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    };

    let mut req = SizingRequest::new(load_kw, fuel_cell_id, autonomy_hours);
    req.max_temperature = read_f64_or(tr, keys::PROMPT_MAX_TEMPERATURE, req.max_temperature)?;
    req.altitude = read_f64_or(tr, keys::PROMPT_ALTITUDE, req.altitude)?;
    req.system_voltage = read_f64_or(tr, keys::PROMPT_SYSTEM_VOLTAGE, req.system_voltage)?;
    req.dg_capacity_kva = read_f64_or(tr, keys::PROMPT_DG_CAPACITY, req.dg_capacity_kva)?;
    req.diesel_price = read_f64_or(tr, keys::PROMPT_DIESEL_PRICE, req.diesel_price)?;
    req.h2_price = read_f64_or(tr, keys::PROMPT_H2_PRICE, req.h2_price)?;
    req.refueling_cycle_days =
        read_f64_or(tr, keys::PROMPT_REFUELING_DAYS, req.refueling_cycle_days)?;
    Ok(req)
}

/// 디젤 발전기 자산 진단 입력을 받는다.
pub fn prompt_asset(ctx: &Context) -> Result<AssetRequest, AppError> {
    let tr = &ctx.translator;
    println!("{}", tr.t(keys::ASSET_HEADING));
    println!("{}", tr.t(keys::CALC_DEFAULT_HINT));
    let kva = read_f64_or(tr, keys::PROMPT_DG_CAPACITY, 20.0)?;
    let load_kw = read_f64(tr, &tr.t(keys::PROMPT_LOAD_KW))?;
    let age = read_f64(tr, &tr.t(keys::PROMPT_DG_AGE))?;
    let mut req = AssetRequest::new(kva, load_kw, age);
    req.monthly_running_hours =
        read_f64_or(tr, keys::PROMPT_MONTHLY_HOURS, req.monthly_running_hours)?;
    req.diesel_price = read_f64_or(tr, keys::PROMPT_DIESEL_PRICE, req.diesel_price)?;
    Ok(req)
}

/// 설정 메뉴를 처리한다. 변경이 있으면 true.
pub fn handle_settings(ctx: &mut Context) -> Result<bool, AppError> {
    let tr = &ctx.translator;
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{} {}",
        tr.t(keys::SETTINGS_CURRENT_LANGUAGE),
        ctx.config.language
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if sel.trim().is_empty() {
        return Ok(false);
    }
    let lang = match sel.trim() {
        "1" => "ko",
        "2" => "en",
        "3" => "auto",
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(false);
        }
    };
    println!("{} {lang}", tr.t(keys::SETTINGS_SAVED));
    ctx.config.language = lang.to_string();
    Ok(true)
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// 한 줄을 읽는다. 0바이트 읽기(EOF)는 `InputClosed`.
fn read_line_from<R: BufRead>(input: &mut R, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Err(AppError::InputClosed);
    }
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    read_f64_from(&mut io::stdin().lock(), tr, prompt)
}

fn read_f64_from<R: BufRead>(input: &mut R, tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line_from(input, prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_f64_or(tr: &Translator, key: &str, default: f64) -> Result<f64, AppError> {
    let prompt = format!("{} [{default}]: ", tr.t(key));
    loop {
        let s = read_line(&prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match s.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers_map_to_choices() {
        assert_eq!(parse_menu(" 1\n"), Some(MenuChoice::Calculate));
        assert_eq!(parse_menu("4"), Some(MenuChoice::Asset));
        assert_eq!(parse_menu("0"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu("9"), None);
    }

    #[test]
    fn closed_input_is_reported_instead_of_looping() {
        let mut input: &[u8] = b"";
        assert!(matches!(
            read_line_from(&mut input, "> "),
            Err(AppError::InputClosed)
        ));

        let tr = Translator::new("en");
        let mut input: &[u8] = b"abc\n";
        assert!(matches!(
            read_f64_from(&mut input, &tr, "> "),
            Err(AppError::InputClosed)
        ));

        let mut input: &[u8] = b"2.5\n";
        assert_eq!(read_f64_from(&mut input, &tr, "> ").expect("number"), 2.5);
    }

    #[test]
    fn menu_exits_when_input_closes() {
        let tr = Translator::new("en");
        let mut input: &[u8] = b"9\n";
        assert_eq!(main_menu_from(&mut input, &tr).expect("menu"), MenuChoice::Exit);
        let mut input: &[u8] = b"2\n";
        assert_eq!(main_menu_from(&mut input, &tr).expect("menu"), MenuChoice::Catalog);
    }
}
