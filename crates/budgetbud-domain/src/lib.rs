//! budgetbud-domain
//!
//! Pure domain models (Budget, LineItem, Category catalog, periods).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod book;
pub mod budget;
pub mod category;
pub mod common;
pub mod line_item;
pub mod period;

pub use book::*;
pub use budget::*;
pub use category::*;
pub use common::*;
pub use line_item::*;
pub use period::*;
