use budgetbud_domain::Frequency;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Budget not found: {0}")]
    BudgetNotFound(String),
    #[error("Line item not found: {0}")]
    LineItemNotFound(Uuid),
    #[error("{frequency} period {index} is out of range (expected 1..={max})")]
    PeriodOutOfRange {
        frequency: Frequency,
        index: u32,
        max: u32,
    },
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
