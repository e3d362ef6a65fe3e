use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Table '{table}' is missing columns: {}", .columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },

    #[error("Invalid sector geometry, {field} = {value}: {reason}")]
    InvalidSectorGeometry {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Input,
    Configuration,
    Geometry,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CoverageError {
    pub fn invalid_geometry(field: &str, value: f64, reason: impl Into<String>) -> Self {
        CoverageError::InvalidSectorGeometry {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CoverageError::IoError(_) => ErrorCategory::Io,
            CoverageError::CsvError(_) | CoverageError::MissingColumns { .. } => {
                ErrorCategory::Input
            }
            CoverageError::ConfigError { .. } | CoverageError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            CoverageError::InvalidSectorGeometry { .. } => ErrorCategory::Geometry,
            CoverageError::ZipError(_) | CoverageError::SerializationError(_) => {
                ErrorCategory::Export
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoverageError::InvalidSectorGeometry { .. } => ErrorSeverity::Low,
            CoverageError::CsvError(_)
            | CoverageError::MissingColumns { .. }
            | CoverageError::ConfigError { .. }
            | CoverageError::InvalidConfigValue { .. } => ErrorSeverity::High,
            CoverageError::ZipError(_) | CoverageError::SerializationError(_) => {
                ErrorSeverity::Medium
            }
            CoverageError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the input files exist and the output directory is writable",
            ErrorCategory::Input => {
                "Check that both CSV files have a header row and the required columns"
            }
            ErrorCategory::Configuration => "Review the command-line flags or the TOML configuration file",
            ErrorCategory::Geometry => {
                "Check the longitude, latitude, azimuth and beam values of the sector"
            }
            ErrorCategory::Export => "Re-run with --verbose to see which export step failed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CoverageError::MissingColumns { table, columns } => format!(
                "The {} file is missing the column(s): {}",
                table,
                columns.join(", ")
            ),
            CoverageError::InvalidConfigValue { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CoverageError::IoError(e) => format!("Could not read or write a file: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoverageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_every_column() {
        let err = CoverageError::MissingColumns {
            table: "revenue".to_string(),
            columns: vec!["prb".to_string(), "sa cluster".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Table 'revenue' is missing columns: prb, sa cluster"
        );
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_geometry_errors_are_low_severity() {
        let err = CoverageError::invalid_geometry("beam_width", 0.0, "must be in (0, 360]");

        assert_eq!(err.category(), ErrorCategory::Geometry);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.to_string().contains("beam_width = 0"));
    }
}
