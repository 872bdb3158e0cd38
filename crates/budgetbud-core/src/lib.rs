//! budgetbud-core
//!
//! Period resolution, ledger aggregation, derived metrics and the services
//! built on them. Depends on budgetbud-domain. No CLI, no terminal I/O, no
//! direct storage interactions.

pub mod aggregate;
pub mod budget_service;
pub mod error;
pub mod metrics;
pub mod period;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use aggregate::*;
pub use budget_service::*;
pub use error::CoreError;
pub use metrics::*;
pub use period::*;
pub use summary_service::*;
pub use time::Clock;
