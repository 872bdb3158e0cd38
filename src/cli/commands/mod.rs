pub mod budgets;
pub mod items;
pub mod reports;
pub mod system;

use std::collections::HashMap;

use budgetbud_domain::Frequency;
use chrono::NaiveDate;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    system::register(registry);
    budgets::register(registry);
    items::register(registry);
    reports::register(registry);
}

/// Positional arguments plus `--flag value` options.
pub(crate) struct Parsed<'a> {
    pub positional: Vec<&'a str>,
    pub options: HashMap<&'static str, String>,
}

impl Parsed<'_> {
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

/// Splits `args` into positionals and the `--name value` options in `known`.
pub(crate) fn parse_args<'a>(
    args: &[&'a str],
    known: &[&'static str],
) -> Result<Parsed<'a>, CommandError> {
    let mut positional = Vec::new();
    let mut options = HashMap::new();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        let Some(flag) = arg.strip_prefix("--") else {
            positional.push(arg);
            continue;
        };
        let name = known
            .iter()
            .copied()
            .find(|name| *name == flag)
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown option `{arg}`")))?;
        let value = iter
            .next()
            .ok_or_else(|| CommandError::InvalidArguments(format!("`{arg}` needs a value")))?;
        options.insert(name, value.to_string());
    }
    Ok(Parsed {
        positional,
        options,
    })
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))
}

pub(crate) fn parse_frequency(raw: &str) -> Result<Frequency, CommandError> {
    raw.parse::<Frequency>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

pub(crate) fn parse_index(raw: &str) -> Result<u32, CommandError> {
    raw.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a valid period number"))
    })
}

pub(crate) fn parse_year(raw: &str) -> Result<i32, CommandError> {
    raw.parse::<i32>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid year")))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a date (expected YYYY-MM-DD)"))
    })
}
