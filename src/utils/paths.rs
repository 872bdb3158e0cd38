//! Where BudgetBud keeps its files.

use std::{env, path::PathBuf};

use budgetbud_config::Config;

/// Overrides the application directory when set.
pub const HOME_ENV: &str = "BUDGETBUD_HOME";

/// `$BUDGETBUD_HOME` when set and non-empty, else `~/.budgetbud`.
pub fn data_dir() -> PathBuf {
    env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_data_dir)
}

pub fn backups_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("backups")
}
