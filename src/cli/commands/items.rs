use budgetbud_core::{BudgetService, LineItemPatch, NewLineItem};
use budgetbud_domain::{Category, Displayable, LineItemKind};

use super::{parse_amount, parse_args, parse_date};
use crate::cli::{
    core::{CommandError, CommandResult, LoopControl},
    formatters, output,
    registry::{CommandEntry, CommandGroup, CommandRegistry},
    selectors::{resolve_budget, resolve_item, short_id},
    shell_context::ShellContext,
};

const ADD_ITEM_USAGE: &str =
    "add-item <#|budget-id> <category> <amount> [--note <text>] [--date YYYY-MM-DD]";
const ADD_EXPENSE_USAGE: &str =
    "add-expense <#|budget-id> <category> <amount> [--note <text>] [--date YYYY-MM-DD]";
const EDIT_ITEM_USAGE: &str =
    "edit-item <item-id> [--category <id>] [--amount <amount>] [--note <text>]";

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandGroup::Items,
        CommandEntry::new(
            "add-item",
            "Plan a forecasted item in a budget",
            ADD_ITEM_USAGE,
            cmd_add_item,
        ),
    );
    registry.register(
        CommandGroup::Items,
        CommandEntry::new(
            "add-expense",
            "Record an actual expense against a budget",
            ADD_EXPENSE_USAGE,
            cmd_add_expense,
        ),
    );
    registry.register(
        CommandGroup::Items,
        CommandEntry::new(
            "edit-item",
            "Change an item's category, amount or note",
            EDIT_ITEM_USAGE,
            cmd_edit_item,
        ),
    );
    registry.register(
        CommandGroup::Items,
        CommandEntry::new(
            "toggle-item",
            "Mark a forecasted item completed or pending",
            "toggle-item <item-id>",
            cmd_toggle_item,
        ),
    );
    registry.register(
        CommandGroup::Items,
        CommandEntry::new(
            "remove-item",
            "Delete a line item",
            "remove-item <item-id>",
            cmd_remove_item,
        ),
    );
}

fn cmd_add_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    add_line_item(context, args, LineItemKind::Forecasted, ADD_ITEM_USAGE)
}

fn cmd_add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    add_line_item(context, args, LineItemKind::Actual, ADD_EXPENSE_USAGE)
}

fn add_line_item(
    context: &mut ShellContext,
    args: &[&str],
    kind: LineItemKind,
    usage: &str,
) -> CommandResult {
    let parsed = parse_args(args, &["note", "date"])?;
    let [budget_ref, category, amount] = parsed.positional.as_slice() else {
        return Err(CommandError::usage(usage));
    };
    let amount = parse_amount(amount)?;
    let budget_id = resolve_budget(&context.book()?, budget_ref)?;

    let mut new_item = match kind {
        LineItemKind::Forecasted => NewLineItem::forecasted(budget_id, *category, amount),
        LineItemKind::Actual => NewLineItem::actual(budget_id, *category, amount),
    };
    if let Some(date) = parsed.option("date") {
        new_item = new_item.on(parse_date(date)?);
    }
    if let Some(note) = parsed.option("note") {
        new_item = new_item.with_notes(note);
    }
    warn_if_uncatalogued(category);

    let (item_id, book) =
        context.mutate(|book, clock| BudgetService::add_item(book, new_item.clone(), clock))?;
    let currency = &context.config.currency;
    let label = match kind {
        LineItemKind::Forecasted => "Forecasted item added",
        LineItemKind::Actual => "Expense recorded",
    };
    output::success(format!(
        "{label}: {} {} ({}).",
        Category::label_for(category),
        formatters::money(amount, currency),
        short_id(item_id)
    ));
    if let Some(budget) = book.budget(budget_id) {
        output::info(format!(
            "{}: planned {}, savings {}.",
            budget.name,
            formatters::money(budget.cached.total_expenses, currency),
            formatters::money(budget.cached.savings, currency)
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_edit_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["category", "amount", "note"])?;
    let [item_ref] = parsed.positional.as_slice() else {
        return Err(CommandError::usage(EDIT_ITEM_USAGE));
    };
    let patch = LineItemPatch {
        category_id: parsed.option("category").map(str::to_string),
        amount: parsed.option("amount").map(parse_amount).transpose()?,
        notes: parsed.option("note").map(str::to_string),
    };
    if patch.category_id.is_none() && patch.amount.is_none() && patch.notes.is_none() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass --category, --amount or --note".into(),
        ));
    }
    if let Some(category) = patch.category_id.as_deref() {
        warn_if_uncatalogued(category);
    }

    let item_id = resolve_item(&context.book()?, item_ref)?;
    context.mutate(|book, clock| BudgetService::edit_item(book, item_id, patch.clone(), clock))?;
    output::success(format!("Item {} updated.", short_id(item_id)));
    Ok(LoopControl::Continue)
}

fn cmd_toggle_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [item_ref] = args else {
        return Err(CommandError::usage("toggle-item <item-id>"));
    };
    let item_id = resolve_item(&context.book()?, item_ref)?;
    let (completed, _) =
        context.mutate(|book, clock| BudgetService::toggle_completed(book, item_id, clock))?;
    let state = if completed { "completed" } else { "pending" };
    output::success(format!("Item {} marked {state}.", short_id(item_id)));
    Ok(LoopControl::Continue)
}

fn cmd_remove_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [item_ref] = args else {
        return Err(CommandError::usage("remove-item <item-id>"));
    };
    let book = context.book()?;
    let item_id = resolve_item(&book, item_ref)?;
    let label = book
        .item(item_id)
        .map(Displayable::display_label)
        .unwrap_or_default();
    if !context.confirm(&format!("Remove {label}?"))? {
        output::info("Removal cancelled.");
        return Ok(LoopControl::Continue);
    }
    let (removed, _) =
        context.mutate(|book, clock| BudgetService::remove_item(book, item_id, clock))?;
    output::success(format!(
        "Removed {} {}.",
        Category::label_for(&removed.category_id),
        formatters::money(removed.amount, &context.config.currency)
    ));
    Ok(LoopControl::Continue)
}

fn warn_if_uncatalogued(category: &str) {
    if Category::find(category).is_none() {
        output::warning(format!(
            "Category `{category}` is not in the catalog; it will be kept as typed."
        ));
    }
}
