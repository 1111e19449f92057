use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowtimeError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Unexpected API response: {message}")]
    ResponseFormatError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Lookup file not found: {path}")]
    LookupFileMissing { path: String },

    #[error("Column '{column}' not found in {path}")]
    LookupColumnMissing { path: String, column: String },

    #[error("No {kind} code found for '{name}'")]
    CodeNotFound { kind: LookupKind, name: String },

    #[error("No theater code found for '{theater}' and no movie code found for '{movie}'")]
    CodesNotFound { theater: String, movie: String },

    #[error("Invalid play date '{value}': expected YYYY-MM-DD or YYYYMMDD")]
    InvalidDate { value: String },
}

/// What a CSV lookup was resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Theater,
    Movie,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::Theater => write!(f, "theater"),
            LookupKind::Movie => write!(f, "movie"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Lookup,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a run that failed with this severity.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ShowtimeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShowtimeError::ApiError(_) | ShowtimeError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            ShowtimeError::ResponseFormatError { .. }
            | ShowtimeError::SerializationError(_)
            | ShowtimeError::CsvError(_) => ErrorCategory::Data,
            ShowtimeError::ConfigValidationError { .. }
            | ShowtimeError::InvalidConfigValueError { .. }
            | ShowtimeError::MissingConfigError { .. }
            | ShowtimeError::InvalidDate { .. } => ErrorCategory::Configuration,
            ShowtimeError::LookupFileMissing { .. }
            | ShowtimeError::LookupColumnMissing { .. }
            | ShowtimeError::CodeNotFound { .. }
            | ShowtimeError::CodesNotFound { .. } => ErrorCategory::Lookup,
            ShowtimeError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // upstream hiccups are worth retrying as-is
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Lookup | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ShowtimeError::ApiError(e) if e.is_timeout() => {
                "The booking API did not answer in time".to_string()
            }
            ShowtimeError::ApiError(e) if e.is_connect() => {
                "Could not connect to the booking API".to_string()
            }
            ShowtimeError::HttpStatusError { status, .. } => {
                format!("The booking API rejected the request (HTTP {})", status)
            }
            ShowtimeError::LookupFileMissing { path } => {
                format!("Lookup file {} does not exist", path)
            }
            ShowtimeError::CodeNotFound { kind, name } => {
                format!("Could not find the {} '{}' in the lookup tables", kind, name)
            }
            ShowtimeError::CodesNotFound { theater, movie } => format!(
                "Could not find the theater '{}' or the movie '{}' in the lookup tables",
                theater, movie
            ),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ShowtimeError::ApiError(_) | ShowtimeError::HttpStatusError { .. } => {
                "Check your network connection and try again later".to_string()
            }
            ShowtimeError::ResponseFormatError { .. } | ShowtimeError::SerializationError(_) => {
                "The chain may have changed its API; run with -v to inspect the raw response"
                    .to_string()
            }
            ShowtimeError::LookupFileMissing { .. } => {
                "Generate the CSV lookup files first, or point --data-dir at them".to_string()
            }
            ShowtimeError::LookupColumnMissing { column, .. } => format!(
                "Regenerate the CSV file or configure the column name (expected '{}')",
                column
            ),
            ShowtimeError::CodeNotFound { kind, .. } => format!(
                "Check the exact {} name in the CSV file, or pass --{}-code directly",
                kind, kind
            ),
            ShowtimeError::CodesNotFound { .. } => {
                "Check the exact names in the CSV files, or pass --theater-code and --movie-code directly"
                    .to_string()
            }
            ShowtimeError::InvalidDate { .. } => {
                "Pass the date as 2026-01-14 or 20260114".to_string()
            }
            ShowtimeError::ConfigValidationError { .. }
            | ShowtimeError::InvalidConfigValueError { .. }
            | ShowtimeError::MissingConfigError { .. } => {
                "Fix the configuration file and run again".to_string()
            }
            ShowtimeError::CsvError(_) => "Make sure the lookup file is valid UTF-8 CSV".to_string(),
            ShowtimeError::IoError(_) => "Check file permissions and disk state".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShowtimeError>;
