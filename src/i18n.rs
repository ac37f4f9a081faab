use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CALCULATE: &str = "main_menu.calculate";
    pub const MAIN_MENU_CATALOG: &str = "main_menu.catalog";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_ASSET: &str = "main_menu.asset";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const CALC_HEADING: &str = "calculate.heading";
    pub const CALC_DEFAULT_HINT: &str = "calculate.default_hint";
    pub const PROMPT_LOAD_KW: &str = "prompt.load_kw";
    pub const PROMPT_MAX_TEMPERATURE: &str = "prompt.max_temperature";
    pub const PROMPT_ALTITUDE: &str = "prompt.altitude";
    pub const PROMPT_FUEL_CELL_ID: &str = "prompt.fuel_cell_id";
    pub const PROMPT_AUTONOMY_HOURS: &str = "prompt.autonomy_hours";
    pub const PROMPT_SYSTEM_VOLTAGE: &str = "prompt.system_voltage";
    pub const PROMPT_DG_CAPACITY: &str = "prompt.dg_capacity";
    pub const PROMPT_DIESEL_PRICE: &str = "prompt.diesel_price";
    pub const PROMPT_H2_PRICE: &str = "prompt.h2_price";
    pub const PROMPT_REFUELING_DAYS: &str = "prompt.refueling_days";

    pub const CATALOG_HEADING: &str = "catalog.heading";
    pub const CATALOG_COLUMNS: &str = "catalog.columns";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const REPORT_HEADING: &str = "report.heading";
    pub const REPORT_FUEL_CELL: &str = "report.fuel_cell";
    pub const REPORT_DERATING: &str = "report.derating";
    pub const REPORT_GROSS_POWER: &str = "report.gross_power";
    pub const REPORT_PARASITIC: &str = "report.parasitic";
    pub const REPORT_STACKS: &str = "report.stacks";
    pub const REPORT_H2_CONSUMPTION: &str = "report.h2_consumption";
    pub const REPORT_BATTERY: &str = "report.battery";
    pub const REPORT_CABLE: &str = "report.cable";
    pub const REPORT_DIESEL: &str = "report.diesel";
    pub const REPORT_DAILY_COST: &str = "report.daily_cost";
    pub const REPORT_ANNUAL_COST: &str = "report.annual_cost";
    pub const REPORT_SAVINGS: &str = "report.savings";
    pub const REPORT_CAPEX: &str = "report.capex";
    pub const REPORT_PAYBACK: &str = "report.payback";
    pub const REPORT_CO2: &str = "report.co2";
    pub const REPORT_LOGISTICS: &str = "report.logistics";
    pub const REPORT_MULTIPLE_STACKS: &str = "report.multiple_stacks";
    pub const REPORT_UNDERSIZED: &str = "report.undersized";
    pub const REPORT_RECOMMENDATION: &str = "report.recommendation";

    pub const RECOMMEND_SMALL: &str = "recommend.small";
    pub const RECOMMEND_MEDIUM: &str = "recommend.medium";
    pub const RECOMMEND_LARGE: &str = "recommend.large";

    pub const ASSET_HEADING: &str = "asset.heading";
    pub const PROMPT_DG_AGE: &str = "prompt.dg_age";
    pub const PROMPT_MONTHLY_HOURS: &str = "prompt.monthly_hours";
    pub const ASSET_LOAD_FACTOR: &str = "asset.load_factor";
    pub const ASSET_RECOMMENDATION: &str = "asset.recommendation";
    pub const ASSET_EFFICIENCY_LOSS: &str = "asset.efficiency_loss";
    pub const ASSET_ANNUAL_WASTE: &str = "asset.annual_waste";
    pub const ASSET_EXCESS_CAPACITY: &str = "asset.excess_capacity";
    pub const ASSET_ACTION_REPLACE: &str = "asset.action_replace";
    pub const ASSET_ACTION_RELOCATE: &str = "asset.action_relocate";
    pub const ASSET_ACTION_KEEP: &str = "asset.action_keep";
    pub const ASSET_ACTION_SUPPORT: &str = "asset.action_support";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ko
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&Path>) -> Self {
        let overrides = pack_dir.and_then(|dir| load_overrides(dir, lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 → 선택 언어 → 한국어 순으로 찾는다.
    pub fn t(&self, key: &str) -> Cow<'_, str> {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return Cow::Borrowed(v.as_str());
        }
        let s = match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        };
        Cow::Borrowed(s)
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> String {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: 섹션/키를 점으로 이은 플랫 맵.
fn load_overrides(dir: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let path = dir.join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== 연료전지 사이징 툴박스 ===",
        MAIN_MENU_CALCULATE => "1) 사이징 / 경제성 계산",
        MAIN_MENU_CATALOG => "2) 연료전지 카탈로그",
        MAIN_MENU_SETTINGS => "3) 설정",
        MAIN_MENU_ASSET => "4) 디젤 발전기 자산 진단",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        CALC_HEADING => "\n-- 사이징 / 경제성 계산 --",
        CALC_DEFAULT_HINT => "엔터만 누르면 [ ] 안의 기본값을 사용합니다.",
        PROMPT_LOAD_KW => "부하 [kW]: ",
        PROMPT_MAX_TEMPERATURE => "최고 외기온도 [°C]",
        PROMPT_ALTITUDE => "고도 [m]",
        PROMPT_FUEL_CELL_ID => "연료전지 id: ",
        PROMPT_AUTONOMY_HOURS => "자립 운전 시간 [h]: ",
        PROMPT_SYSTEM_VOLTAGE => "시스템 전압 [V] (24/48/110)",
        PROMPT_DG_CAPACITY => "디젤 발전기 용량 [kVA]",
        PROMPT_DIESEL_PRICE => "경유 단가 [$/L]",
        PROMPT_H2_PRICE => "수소 단가 [$/kg]",
        PROMPT_REFUELING_DAYS => "보급 주기 [일]",
        CATALOG_HEADING => "\n-- 연료전지 카탈로그 --",
        CATALOG_COLUMNS => "id  제조사 / 모델  형식  정격[kW]  효율[%]  기생손실  LHV[kWh/kg]  단가[$/kW]",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_LANGUAGE => "현재 언어:",
        SETTINGS_OPTIONS => "1) 한국어  2) English  3) 자동",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "언어 설정이 변경되었습니다:",
        REPORT_HEADING => "\n=== 사이징 결과 ===",
        REPORT_FUEL_CELL => "연료전지",
        REPORT_DERATING => "출력 감소 계수",
        REPORT_GROSS_POWER => "총 출력 요구량",
        REPORT_PARASITIC => "기생손실",
        REPORT_STACKS => "스택 구성",
        REPORT_H2_CONSUMPTION => "연료 소비량",
        REPORT_BATTERY => "배터리 (kWh/Ah/스트링)",
        REPORT_CABLE => "케이블",
        REPORT_DIESEL => "디젤 발전기",
        REPORT_DAILY_COST => "일 운전비",
        REPORT_ANNUAL_COST => "연 운전비",
        REPORT_SAVINGS => "절감액",
        REPORT_CAPEX => "설비비",
        REPORT_PAYBACK => "회수기간 [년]",
        REPORT_CO2 => "CO2 저감량",
        REPORT_LOGISTICS => "수소 물류 (실린더/번들)",
        REPORT_MULTIPLE_STACKS => "안내: 단일 모듈로는 부하를 감당할 수 없어 여러 모듈로 구성했습니다.",
        REPORT_UNDERSIZED => "경고: 다중 스택으로도 감소 후 총 출력이 부하에 못 미칩니다. 더 큰 모델을 고려하세요.",
        REPORT_RECOMMENDATION => "권장 구성:",
        RECOMMEND_SMALL => "5 kW 미만 소형 부하는 EFOY Pro 같은 휴대형 연료전지와 24 V 배터리 백업을 권장합니다.",
        RECOMMEND_MEDIUM => "5~20 kW 부하는 GenDrive, FCgen 같은 모듈형 스택과 48 V 시스템을 권장합니다.",
        RECOMMEND_LARGE => "20 kW 이상 부하는 Bloom Energy 같은 산업용 시스템과 고전압 DC 버스를 권장합니다.",
        ASSET_HEADING => "\n-- 디젤 발전기 자산 진단 --",
        PROMPT_DG_AGE => "발전기 사용 연수 [년]: ",
        PROMPT_MONTHLY_HOURS => "월 운전 시간 [h]",
        ASSET_LOAD_FACTOR => "부하율",
        ASSET_RECOMMENDATION => "권고",
        ASSET_EFFICIENCY_LOSS => "효율 손실",
        ASSET_ANNUAL_WASTE => "연간 낭비 연료비",
        ASSET_EXCESS_CAPACITY => "초과 용량",
        ASSET_ACTION_REPLACE => "저부하 운전에 노후 설비입니다. 폐기하고 적정 용량의 연료전지로 교체하세요.",
        ASSET_ACTION_RELOCATE => "설비 상태는 양호하지만 이 현장에는 과대합니다. 10~15 kW 부하 현장으로 옮기고 이곳에는 소형 연료전지를 설치하세요.",
        ASSET_ACTION_KEEP => "용량이 부하에 맞습니다. 운전 시간을 줄이려면 배터리 하이브리드를 추가하세요.",
        ASSET_ACTION_SUPPORT => "최대 출력 근처에서 운전 중입니다. 연료전지 병렬 운전이나 배터리 충전으로 첨두 부하를 분담하세요.",
        _ => "",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        MAIN_MENU_TITLE => "\n=== Fuel Cell Sizing Toolbox ===",
        MAIN_MENU_CALCULATE => "1) Sizing / economics",
        MAIN_MENU_CATALOG => "2) Fuel cell catalog",
        MAIN_MENU_SETTINGS => "3) Settings",
        MAIN_MENU_ASSET => "4) Diesel generator asset check",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please choose again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        CALC_HEADING => "\n-- Sizing / economics --",
        CALC_DEFAULT_HINT => "Press enter to accept the default shown in [ ].",
        PROMPT_LOAD_KW => "Load [kW]: ",
        PROMPT_MAX_TEMPERATURE => "Max ambient temperature [°C]",
        PROMPT_ALTITUDE => "Altitude [m]",
        PROMPT_FUEL_CELL_ID => "Fuel cell id: ",
        PROMPT_AUTONOMY_HOURS => "Autonomy [h]: ",
        PROMPT_SYSTEM_VOLTAGE => "System voltage [V] (24/48/110)",
        PROMPT_DG_CAPACITY => "Diesel generator capacity [kVA]",
        PROMPT_DIESEL_PRICE => "Diesel price [$/L]",
        PROMPT_H2_PRICE => "Hydrogen price [$/kg]",
        PROMPT_REFUELING_DAYS => "Refueling cycle [days]",
        CATALOG_HEADING => "\n-- Fuel cell catalog --",
        CATALOG_COLUMNS => "id  manufacturer / model  type  rated[kW]  eff[%]  parasitic  LHV[kWh/kg]  capex[$/kW]",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language:",
        SETTINGS_OPTIONS => "1) 한국어  2) English  3) Auto",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; language unchanged.",
        SETTINGS_SAVED => "Language changed to:",
        REPORT_HEADING => "\n=== Sizing result ===",
        REPORT_FUEL_CELL => "Fuel cell",
        REPORT_DERATING => "Derating factor",
        REPORT_GROSS_POWER => "Gross power required",
        REPORT_PARASITIC => "parasitic",
        REPORT_STACKS => "Stack configuration",
        REPORT_H2_CONSUMPTION => "Fuel consumption",
        REPORT_BATTERY => "Battery (kWh/Ah/strings)",
        REPORT_CABLE => "Cable",
        REPORT_DIESEL => "Diesel generator",
        REPORT_DAILY_COST => "Daily cost",
        REPORT_ANNUAL_COST => "Annual cost",
        REPORT_SAVINGS => "Savings",
        REPORT_CAPEX => "CAPEX",
        REPORT_PAYBACK => "Payback [years]",
        REPORT_CO2 => "CO2 avoided",
        REPORT_LOGISTICS => "H2 logistics (cyl/bundles)",
        REPORT_MULTIPLE_STACKS => "Note: a single unit cannot carry the load; the system is configured for multiple units.",
        REPORT_UNDERSIZED => "Warning: even with multiple stacks the total derated capacity cannot meet the load. Consider a larger model.",
        REPORT_RECOMMENDATION => "Recommendation:",
        RECOMMEND_SMALL => "For loads under 5 kW, consider portable units such as the EFOY Pro series with 24 V battery backup.",
        RECOMMEND_MEDIUM => "Loads of 5-20 kW suit modular stacks such as GenDrive or FCgen on a 48 V system.",
        RECOMMEND_LARGE => "For loads over 20 kW, industrial systems such as Bloom Energy on a high-voltage DC bus are optimal.",
        ASSET_HEADING => "\n-- Diesel generator asset check --",
        PROMPT_DG_AGE => "Generator age [years]: ",
        PROMPT_MONTHLY_HOURS => "Monthly running hours [h]",
        ASSET_LOAD_FACTOR => "Load factor",
        ASSET_RECOMMENDATION => "Recommendation",
        ASSET_EFFICIENCY_LOSS => "Efficiency loss",
        ASSET_ANNUAL_WASTE => "Annual fuel waste",
        ASSET_EXCESS_CAPACITY => "Excess capacity",
        ASSET_ACTION_REPLACE => "Underloaded and past its service life. Scrap it and replace with a right-sized fuel cell system.",
        ASSET_ACTION_RELOCATE => "The unit is healthy but oversized for this site. Move it to a 10-15 kW hub site and install a small fuel cell here.",
        ASSET_ACTION_KEEP => "Capacity matches the load. Add a battery hybrid to cut running hours.",
        ASSET_ACTION_SUPPORT => "Running near full output. Add a fuel cell in parallel for peak shaving or battery charging.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_lookup_and_korean_fallback() {
        let en = Translator::new("en-us");
        assert_eq!(en.language(), Language::En);
        assert_eq!(en.t(keys::REPORT_CAPEX), "CAPEX");
        let ko = Translator::new("fr");
        assert_eq!(ko.language_code(), "ko");
        assert_eq!(ko.t(keys::REPORT_CAPEX), "설비비");
    }

    #[test]
    fn cli_flag_beats_config() {
        assert_eq!(resolve_language(Some("ko-KR"), Some("en")), "ko");
        assert_eq!(resolve_language(Some("auto"), Some("en")), "en");
    }

    #[test]
    fn nested_pack_keys_are_flattened() {
        let map = parse_toml_to_map("[report]\ncapex = \"Investment\"\n").expect("pack");
        assert_eq!(map.get("report.capex").map(String::as_str), Some("Investment"));
    }
}
