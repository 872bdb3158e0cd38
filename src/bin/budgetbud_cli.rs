use std::process::ExitCode;

use budgetbud::cli::{output, run_cli};

fn main() -> ExitCode {
    budgetbud::init();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            ExitCode::FAILURE
        }
    }
}
