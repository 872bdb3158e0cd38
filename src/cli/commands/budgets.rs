use budgetbud_core::{
    period_containing, resolve_period, BudgetDraft, BudgetService, SummaryService,
};
use budgetbud_domain::Displayable;
use tracing::debug;

use super::{parse_amount, parse_args, parse_frequency, parse_index, parse_year};
use crate::cli::{
    core::{CommandError, CommandResult, LoopControl},
    formatters, output,
    registry::{CommandEntry, CommandGroup, CommandRegistry},
    selectors::{ordered_budgets, resolve_budget},
    shell_context::ShellContext,
};

const PERIOD_USAGE: &str = "period [frequency] [index] [year]";
const NEW_BUDGET_USAGE: &str =
    "new-budget <frequency> <index> <income> [--year <year>] [--name <name>]";

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandGroup::Budgets,
        CommandEntry::new(
            "period",
            "Show a period's dates and the active user's items dated in it",
            PERIOD_USAGE,
            cmd_period,
        ),
    );
    registry.register(
        CommandGroup::Budgets,
        CommandEntry::new(
            "new-budget",
            "Create a budget for one period",
            NEW_BUDGET_USAGE,
            cmd_new_budget,
        ),
    );
    registry.register(
        CommandGroup::Budgets,
        CommandEntry::new(
            "budgets",
            "List budgets by start date",
            "budgets",
            cmd_budgets,
        ),
    );
    registry.register(
        CommandGroup::Budgets,
        CommandEntry::new(
            "show-budget",
            "Show a budget with its items, totals and category breakdown",
            "show-budget <#|id>",
            cmd_show_budget,
        ),
    );
    registry.register(
        CommandGroup::Budgets,
        CommandEntry::new(
            "refresh",
            "Recompute every budget's planned totals from its items",
            "refresh",
            cmd_refresh,
        ),
    );
    registry.register(
        CommandGroup::Budgets,
        CommandEntry::new(
            "delete-budget",
            "Delete a budget and all of its items",
            "delete-budget <#|id>",
            cmd_delete_budget,
        ),
    );
}

fn cmd_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 3 {
        return Err(CommandError::usage(PERIOD_USAGE));
    }
    let frequency = match args.first() {
        Some(raw) => parse_frequency(raw)?,
        None => context.config.default_frequency,
    };
    let year = match args.get(2) {
        Some(raw) => parse_year(raw)?,
        None => context.clock.current_year(),
    };
    let index = match args.get(1) {
        Some(raw) => parse_index(raw)?,
        None => period_containing(frequency, context.clock.today()).ok_or_else(|| {
            CommandError::Message(format!(
                "today falls after the last {} period of the year",
                frequency.unit_label()
            ))
        })?,
    };

    let range = resolve_period(frequency, index, year)?;
    output::info(format!(
        "{} {} of {}: {} ({} days)",
        frequency,
        frequency.period_label(index),
        year,
        range,
        range.days()
    ));
    if context.user.is_some() {
        let book = context.book()?;
        let items = BudgetService::items_in_period(&book.items, range);
        output::block(&formatters::period_items(&items, &context.config.currency));
    }
    Ok(LoopControl::Continue)
}

fn cmd_new_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["year", "name"])?;
    let [frequency, index, income] = parsed.positional.as_slice() else {
        return Err(CommandError::usage(NEW_BUDGET_USAGE));
    };

    let mut draft = BudgetDraft::new(
        parse_frequency(frequency)?,
        parse_index(index)?,
        parse_amount(income)?,
    );
    if let Some(year) = parsed.option("year") {
        draft = draft.in_year(parse_year(year)?);
    }
    if let Some(name) = parsed.option("name") {
        draft = draft.named(name);
    }

    let (id, book) =
        context.mutate(|book, clock| BudgetService::create(book, draft.clone(), clock))?;
    let budget = book
        .budget(id)
        .ok_or_else(|| CommandError::Message("new budget missing after save".into()))?;
    debug!(budget = %id, "created from shell");
    output::success(format!(
        "Budget created: {} ({}), income {}.",
        budget.name,
        budget.range(),
        formatters::money(budget.total_income, &context.config.currency)
    ));
    Ok(LoopControl::Continue)
}

fn cmd_budgets(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let book = context.book()?;
    output::section("Budgets");
    output::block(&formatters::budget_table(
        &ordered_budgets(&book),
        &context.config.currency,
    ));
    Ok(LoopControl::Continue)
}

fn cmd_show_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(CommandError::usage("show-budget <#|id>"));
    };
    let book = context.book()?;
    let id = resolve_budget(&book, reference)?;
    let detail = SummaryService::budget_detail(&book, id)?;
    output::section(&detail.budget.name);
    output::block(&formatters::budget_detail(&detail, &context.config.currency));
    Ok(LoopControl::Continue)
}

fn cmd_refresh(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let (changed, book) = context.mutate(|book, clock| BudgetService::refresh_all(book, clock))?;
    if changed == 0 {
        output::info(format!(
            "All {} budgets were already up to date.",
            book.budgets.len()
        ));
    } else {
        output::success(format!("Recomputed totals for {changed} budgets."));
    }
    Ok(LoopControl::Continue)
}

fn cmd_delete_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(CommandError::usage("delete-budget <#|id>"));
    };
    let book = context.book()?;
    let id = resolve_budget(&book, reference)?;
    let items = book.items_for(id).count();
    let label = book
        .budget(id)
        .map(Displayable::display_label)
        .unwrap_or_default();

    if !context.confirm(&format!("Delete {label} and its {items} items?"))? {
        output::info("Deletion cancelled.");
        return Ok(LoopControl::Continue);
    }
    let (removed, _) =
        context.mutate(|book, clock| BudgetService::remove_budget(book, id, clock))?;
    output::success(format!(
        "Budget deleted: {} ({items} items removed).",
        removed.name
    ));
    Ok(LoopControl::Continue)
}
