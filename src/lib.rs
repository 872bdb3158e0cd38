#![doc(test(attr(deny(warnings))))]

//! BudgetBud resolves budget periods, aggregates line items into budget
//! totals and derives savings metrics, behind a small command shell.

pub mod cli;
pub mod errors;
pub mod utils;

pub use budgetbud_config as config;
pub use budgetbud_core as services;
pub use budgetbud_domain as domain;
pub use budgetbud_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("BudgetBud tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
