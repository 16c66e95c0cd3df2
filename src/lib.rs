pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, DatasetKind};

pub use crate::core::{
    bounded::BoundedSorted,
    dispatch::{dispatch, Query, QueryKind},
    loader::{Dataset, DatasetLoader, LoadReport},
    query::{QueryEngine, QueryOutput},
    session::{QuerySession, SessionSummary},
};
pub use crate::domain::model::{Hit, Rating, RatingCollection, Title, TitleCollection};
pub use crate::utils::error::{QueryError, Result};
