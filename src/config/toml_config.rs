use crate::config::{DatasetKind, MAX_MIN_TOP_VOTES};
use crate::core::query::DEFAULT_MIN_TOP_VOTES;
use crate::core::ConfigProvider;
use crate::utils::error::{QueryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub data: DataConfig,
    pub loader: Option<LoaderConfig>,
    pub query: Option<QueryConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub dir: String,
    pub dataset: Option<DatasetKind>,
    pub basics_file: Option<String>,
    pub ratings_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub include_adult: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub min_top_votes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QueryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QueryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${IMDB_DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| QueryError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("data.dir", &self.data.dir)?;

        if let Some(basics) = &self.data.basics_file {
            validation::validate_path("data.basics_file", basics)?;
        }
        if let Some(ratings) = &self.data.ratings_file {
            validation::validate_path("data.ratings_file", ratings)?;
        }

        validation::validate_range(
            "query.min_top_votes",
            self.min_top_votes(),
            0,
            MAX_MIN_TOP_VOTES,
        )?;

        if let Some(level) = self.log_level() {
            validation::validate_non_empty_string("monitoring.log_level", level)?;
            validation::validate_one_of(
                "monitoring.log_level",
                level,
                &["trace", "debug", "info", "warn", "error"],
            )?;
        }

        Ok(())
    }

    pub fn dataset(&self) -> DatasetKind {
        self.data.dataset.unwrap_or_default()
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.data.dir
    }

    fn basics_file(&self) -> String {
        self.data
            .basics_file
            .clone()
            .unwrap_or_else(|| self.dataset().basics_file())
    }

    fn ratings_file(&self) -> String {
        self.data
            .ratings_file
            .clone()
            .unwrap_or_else(|| self.dataset().ratings_file())
    }

    fn include_adult(&self) -> bool {
        self.loader
            .as_ref()
            .and_then(|l| l.include_adult)
            .unwrap_or(false)
    }

    fn min_top_votes(&self) -> u64 {
        self.query
            .as_ref()
            .and_then(|q| q.min_top_votes)
            .unwrap_or(DEFAULT_MIN_TOP_VOTES)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[data]
dir = "./data"
dataset = "small"

[query]
min_top_votes = 250

[monitoring]
enabled = true
log_level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.data_dir(), "./data");
        assert_eq!(config.basics_file(), "small.basics.tsv");
        assert_eq!(config.ratings_file(), "small.ratings.tsv");
        assert_eq!(config.min_top_votes(), 250);
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = TomlConfig::from_toml_str("[data]\ndir = \"data\"\n").unwrap();

        assert_eq!(config.dataset(), DatasetKind::Title);
        assert_eq!(config.basics_file(), "title.basics.tsv");
        assert_eq!(config.min_top_votes(), DEFAULT_MIN_TOP_VOTES);
        assert!(!config.include_adult());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_explicit_file_names_win() {
        let toml_content = r#"
[data]
dir = "data"
dataset = "small"
basics_file = "basics-2024.tsv"
ratings_file = "ratings-2024.tsv"

[loader]
include_adult = true
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.basics_file(), "basics-2024.tsv");
        assert_eq!(config.ratings_file(), "ratings-2024.tsv");
        assert!(config.include_adult());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MOVIE_QUERY_TEST_DATA_DIR", "/srv/imdb");

        let toml_content = r#"
[data]
dir = "${MOVIE_QUERY_TEST_DATA_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "/srv/imdb");

        std::env::remove_var("MOVIE_QUERY_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[data]
dir = ""
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[data]
dir = "data"

[monitoring]
enabled = false
log_level = "loud"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_dataset_is_rejected() {
        let toml_content = r#"
[data]
dir = "data"
dataset = "huge"
"#;
        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[data]
dir = "fixtures"
dataset = "small"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_dir(), "fixtures");
    }
}
