use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowkitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Non-numeric value in field {field}: {value}")]
    NonNumericValue { field: String, value: String },

    #[error("Dataset is empty")]
    EmptyDataset,
}

impl RowkitError {
    pub fn validation(message: impl Into<String>) -> Self {
        RowkitError::Validation {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        RowkitError::MissingField {
            field: field.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RowkitError>;
