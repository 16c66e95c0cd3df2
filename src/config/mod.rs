pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// 資料檔的前綴：完整的 IMDb 匯出 (`title`) 或縮小版 (`small`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    #[default]
    Title,
    Small,
}

impl DatasetKind {
    pub fn prefix(self) -> &'static str {
        match self {
            DatasetKind::Title => "title",
            DatasetKind::Small => "small",
        }
    }

    pub fn basics_file(self) -> String {
        format!("{}.basics.tsv", self.prefix())
    }

    pub fn ratings_file(self) -> String {
        format!("{}.ratings.tsv", self.prefix())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "movie-query")]
#[command(about = "Answer title and rating queries over IMDb TSV dumps")]
pub struct CliConfig {
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    #[arg(long, value_enum, default_value = "title")]
    pub dataset: DatasetKind,

    #[arg(long, help = "Basics file name; overrides the --dataset prefix")]
    pub basics_file: Option<String>,

    #[arg(long, help = "Ratings file name; overrides the --dataset prefix")]
    pub ratings_file: Option<String>,

    #[arg(short, long, help = "TOML configuration file; its values win over CLI defaults")]
    pub config: Option<String>,

    #[arg(short, long, help = "Read queries from this file instead of stdin")]
    pub queries: Option<String>,

    #[arg(long, default_value = "1000")]
    pub min_top_votes: u64,

    #[arg(long, help = "Keep titles flagged as adult")]
    pub include_adult: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 以命令列的值為底，TOML 有寫的欄位才覆蓋
    pub fn with_toml(mut self, toml: &TomlConfig) -> Self {
        self.data_dir = toml.data.dir.clone();
        if let Some(dataset) = toml.data.dataset {
            self.dataset = dataset;
        }
        if let Some(basics) = &toml.data.basics_file {
            self.basics_file = Some(basics.clone());
        }
        if let Some(ratings) = &toml.data.ratings_file {
            self.ratings_file = Some(ratings.clone());
        }
        if let Some(include_adult) = toml.loader.as_ref().and_then(|l| l.include_adult) {
            self.include_adult = include_adult;
        }
        if let Some(min_top_votes) = toml.query.as_ref().and_then(|q| q.min_top_votes) {
            self.min_top_votes = min_top_votes;
        }
        self.monitor |= toml.monitoring_enabled();
        self
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn basics_file(&self) -> String {
        self.basics_file
            .clone()
            .unwrap_or_else(|| self.dataset.basics_file())
    }

    fn ratings_file(&self) -> String {
        self.ratings_file
            .clone()
            .unwrap_or_else(|| self.dataset.ratings_file())
    }

    fn include_adult(&self) -> bool {
        self.include_adult
    }

    fn min_top_votes(&self) -> u64 {
        self.min_top_votes
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_dir", &self.data_dir)?;
        if let Some(basics) = &self.basics_file {
            validation::validate_path("basics_file", basics)?;
        }
        if let Some(ratings) = &self.ratings_file {
            validation::validate_path("ratings_file", ratings)?;
        }
        if let Some(config) = &self.config {
            validation::validate_path("config", config)?;
        }
        if let Some(queries) = &self.queries {
            validation::validate_path("queries", queries)?;
        }
        validation::validate_range("min_top_votes", self.min_top_votes, 0, MAX_MIN_TOP_VOTES)
    }
}

/// 票數門檻上限，超過就不可能有任何作品符合
pub const MAX_MIN_TOP_VOTES: u64 = 10_000_000;

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["movie-query"]);
        assert_eq!(config.data_dir(), "data");
        assert_eq!(config.basics_file(), "title.basics.tsv");
        assert_eq!(config.ratings_file(), "title.ratings.tsv");
        assert_eq!(config.min_top_votes(), 1000);
        assert!(!config.include_adult());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_small_dataset() {
        let config = CliConfig::parse_from([
            "movie-query",
            "--dataset",
            "small",
            "--data-dir",
            "fixtures",
            "--min-top-votes",
            "50",
        ]);
        assert_eq!(config.basics_file(), "small.basics.tsv");
        assert_eq!(config.data_dir(), "fixtures");
        assert_eq!(config.min_top_votes(), 50);
    }

    #[test]
    fn test_toml_only_overrides_keys_it_sets() {
        let cli = CliConfig::parse_from([
            "movie-query",
            "--config",
            "c.toml",
            "--dataset",
            "small",
            "--min-top-votes",
            "50",
            "--include-adult",
        ]);
        let toml = TomlConfig::from_toml_str("[data]\ndir = \"d\"\n").unwrap();

        let merged = cli.with_toml(&toml);
        assert_eq!(merged.data_dir(), "d");
        assert_eq!(merged.basics_file(), "small.basics.tsv");
        assert_eq!(merged.ratings_file(), "small.ratings.tsv");
        assert_eq!(merged.min_top_votes(), 50);
        assert!(merged.include_adult());
        assert!(!merged.monitor);
    }

    #[test]
    fn test_toml_values_win_over_cli() {
        let cli = CliConfig::parse_from([
            "movie-query",
            "--dataset",
            "small",
            "--min-top-votes",
            "50",
            "--include-adult",
        ]);
        let toml = TomlConfig::from_toml_str(
            r#"
[data]
dir = "d"
basics_file = "basics-2024.tsv"

[loader]
include_adult = false

[query]
min_top_votes = 7

[monitoring]
enabled = true
"#,
        )
        .unwrap();

        let merged = cli.with_toml(&toml);
        assert_eq!(merged.basics_file(), "basics-2024.tsv");
        // 沒寫 ratings_file 時沿用命令列的 dataset
        assert_eq!(merged.ratings_file(), "small.ratings.tsv");
        assert_eq!(merged.min_top_votes(), 7);
        assert!(!merged.include_adult());
        assert!(merged.monitor);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_cli_validation_rejects_empty_dir() {
        let config = CliConfig::parse_from(["movie-query", "--data-dir", ""]);
        assert!(config.validate().is_err());
    }
}
