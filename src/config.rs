use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::ModelConstants;

/// 기본 설정 파일 이름.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn default_language() -> String {
    "auto".to_string()
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// "auto", "ko", "en"
    #[serde(default = "default_language")]
    pub language: String,
    /// TOML 카탈로그 파일. 없으면 내장 카탈로그를 쓴다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    /// 언어팩 디렉터리
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale_dir: Option<PathBuf>,
    #[serde(default)]
    pub constants: ModelConstants,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            catalog_path: None,
            locale_dir: None,
            constants: ModelConstants::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        log::info!(
            "{} 설정을 읽었습니다. (계수 테이블 {})",
            path.display(),
            cfg.constants.version
        );
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        log::info!("{}이 없어 기본 설정을 만들었습니다.", path.display());
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg: Config = toml::from_str("").expect("parse empty");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn constants_section_overrides_selected_values() {
        let cfg: Config = toml::from_str(
            r#"
            language = "en"
            [constants.diesel]
            maintenance_per_hour = 0.75
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.constants.diesel.maintenance_per_hour, 0.75);
        assert_eq!(cfg.constants.diesel.power_factor, 0.8);
    }
}
