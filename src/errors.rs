use std::result::Result as StdResult;

use budgetbud_config::ConfigError;
use budgetbud_core::CoreError;
use thiserror::Error;

/// Unified error type for the service, config and storage layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Budget not found: {0}")]
    BudgetNotFound(String),
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

/// Failures that end the shell itself rather than a single command.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<CoreError> for BudgetError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::BudgetNotFound(message) => BudgetError::BudgetNotFound(message),
            CoreError::LineItemNotFound(id) => BudgetError::LineItemNotFound(id.to_string()),
            CoreError::PeriodOutOfRange { .. }
            | CoreError::InvalidOperation(_)
            | CoreError::Validation(_) => BudgetError::InvalidInput(err.to_string()),
            CoreError::Storage(message) | CoreError::Serde(message) => {
                BudgetError::StorageError(message)
            }
            CoreError::Io(err) => BudgetError::StorageError(err.to_string()),
        }
    }
}

impl From<ConfigError> for BudgetError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownKey(_) | ConfigError::InvalidValue { .. } => {
                BudgetError::InvalidInput(err.to_string())
            }
            other => BudgetError::ConfigError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetbud_domain::Frequency;

    #[test]
    fn core_errors_map_to_user_facing_variants() {
        let err: BudgetError = CoreError::PeriodOutOfRange {
            frequency: Frequency::Monthly,
            index: 13,
            max: 12,
        }
        .into();
        assert!(matches!(err, BudgetError::InvalidInput(ref msg) if msg.contains("1..=12")));

        let err: BudgetError = CoreError::Serde("bad json".into()).into();
        assert!(matches!(err, BudgetError::StorageError(_)));
    }

    #[test]
    fn config_key_errors_are_input_errors() {
        let err: BudgetError = ConfigError::UnknownKey("colour".into()).into();
        assert!(matches!(err, BudgetError::InvalidInput(_)));
    }
}
