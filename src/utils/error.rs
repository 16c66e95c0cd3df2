use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed record in {file} at line {line}: {reason}")]
    MalformedRecord {
        file: String,
        line: u64,
        reason: String,
    },

    #[error("No valid query could be found for '{command}'.")]
    UnknownQuery { command: String },

    #[error("{command}: missing argument <{name}>")]
    MissingArgument { command: String, name: String },

    #[error("{command}: invalid <{name}> '{value}': {reason}")]
    InvalidArgument {
        command: String,
        name: String,
        value: String,
        reason: String,
    },

    #[error("Referential integrity violated: rating '{id}' has no matching title")]
    ReferentialIntegrity { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Query,
    Integrity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QueryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QueryError::IoError(_) => ErrorCategory::Io,
            QueryError::CsvError(_) | QueryError::MalformedRecord { .. } => ErrorCategory::Data,
            QueryError::ConfigError { .. }
            | QueryError::ConfigValidationError { .. }
            | QueryError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            QueryError::UnknownQuery { .. }
            | QueryError::MissingArgument { .. }
            | QueryError::InvalidArgument { .. } => ErrorCategory::Query,
            QueryError::ReferentialIntegrity { .. } => ErrorCategory::Integrity,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Query => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Integrity => ErrorSeverity::Critical,
        }
    }

    /// 單一查詢失敗時是否可以繼續處理下一行
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Query
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QueryError::IoError(e) => format!("Could not read input data: {}", e),
            QueryError::CsvError(e) => format!("Could not parse TSV data: {}", e),
            QueryError::MalformedRecord { file, line, .. } => {
                format!("Data file {} is malformed near line {}", file, line)
            }
            QueryError::ReferentialIntegrity { id } => format!(
                "Loaded data is inconsistent: rating {} does not belong to any title",
                id
            ),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that --data-dir and --dataset point at existing TSV files",
            ErrorCategory::Data => "Re-download the IMDb dataset; the file may be truncated",
            ErrorCategory::Configuration => "Fix the configuration value and run again",
            ErrorCategory::Query => {
                "Use one of LOOKUP, CONTAINS, YEAR_AND_GENRE, RUNTIME, MOST_VOTES, TOP with its arguments"
            }
            ErrorCategory::Integrity => "Load ratings only after titles so unknown ids are filtered",
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
