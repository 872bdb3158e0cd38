use budgetbud_core::SummaryService;

use crate::cli::{
    core::{CommandError, CommandResult, LoopControl},
    formatters, output,
    registry::{CommandEntry, CommandGroup, CommandRegistry},
    shell_context::ShellContext,
};

const BACKUP_USAGE: &str = "backup [create [note] | list | restore <#|name>]";

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandGroup::Reports,
        CommandEntry::new(
            "dashboard",
            "Income against recorded spending across all budgets",
            "dashboard",
            cmd_dashboard,
        ),
    );
    registry.register(
        CommandGroup::Reports,
        CommandEntry::new(
            "analytics",
            "Savings rate, monthly averages, top categories and monthly trends",
            "analytics [top-n]",
            cmd_analytics,
        ),
    );
    registry.register(
        CommandGroup::Reports,
        CommandEntry::new(
            "trend",
            "Planned savings per budget with a running total",
            "trend",
            cmd_trend,
        ),
    );
    registry.register(
        CommandGroup::Reports,
        CommandEntry::new(
            "backup",
            "Create, list or restore backups of the active user's book",
            BACKUP_USAGE,
            cmd_backup,
        ),
    );
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let book = context.book()?;
    let stats = SummaryService::dashboard(&book);
    output::section("Dashboard");
    output::block(&formatters::dashboard(
        &stats,
        book.budgets.len(),
        &context.config.currency,
    ));
    Ok(LoopControl::Continue)
}

fn cmd_analytics(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let top_n = match args {
        [] => context.config.top_categories,
        [raw] => raw
            .parse::<usize>()
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("`{raw}` is not a positive count"))
            })?,
        _ => return Err(CommandError::usage("analytics [top-n]")),
    };
    let book = context.book()?;
    let report = SummaryService::analytics(&book, top_n);
    output::section("Analytics");
    output::block(&formatters::analytics(&report, &context.config.currency));
    Ok(LoopControl::Continue)
}

fn cmd_trend(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let book = context.book()?;
    output::section("Savings trend");
    output::block(&formatters::savings_trend(
        &SummaryService::savings_trend(&book),
        &context.config.currency,
    ));
    Ok(LoopControl::Continue)
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let user = context.require_user()?.to_string();
    match args {
        [] | ["create", ..] => {
            let note = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
            let info = context
                .storage
                .backup_book(&user, Some(note.as_str()).filter(|n| !n.is_empty()))?;
            output::success(format!("Backup saved: {}", info.id));
        }
        ["list"] => {
            let entries = context.storage.list_backups(&user)?;
            output::section("Backups");
            output::block(&formatters::backups(&entries));
        }
        ["restore", reference] => {
            let entries = context.storage.list_backups(&user)?;
            let chosen = match reference.parse::<usize>() {
                Ok(position) => position.checked_sub(1).and_then(|idx| entries.get(idx)),
                Err(_) => entries.iter().find(|entry| entry.id == *reference),
            }
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("no backup matches `{reference}`"))
            })?;
            if !context.confirm(&format!("Replace {user}'s book with {}?", chosen.id))? {
                output::info("Restore cancelled.");
                return Ok(LoopControl::Continue);
            }
            let book = context.storage.restore_backup(chosen)?;
            output::success(format!(
                "Restored {} ({} budgets, {} items).",
                chosen.id,
                book.budgets.len(),
                book.items.len()
            ));
        }
        _ => return Err(CommandError::usage(BACKUP_USAGE)),
    }
    Ok(LoopControl::Continue)
}
