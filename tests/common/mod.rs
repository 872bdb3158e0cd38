#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use budgetbud::cli::{core::CliMode, ShellContext};
use budgetbud::services::Clock;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Pinned to Tuesday 2024-03-12, inside week 11, bi-week 6 and March.
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 12, 9, 30, 0).unwrap()
    }
}

/// A fresh data directory that outlives the calling test.
pub fn data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Script-mode shell over an isolated data directory and a fixed clock.
pub fn script_context() -> (ShellContext, PathBuf) {
    let dir = data_dir();
    let context = ShellContext::with_data_dir(CliMode::Script, &dir, Arc::new(FixedClock))
        .expect("create shell context");
    (context, dir)
}
