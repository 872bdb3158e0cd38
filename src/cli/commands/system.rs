use budgetbud_config::Config;

use crate::cli::{
    core::{CommandError, CommandResult, LoopControl},
    formatters, output,
    registry::{CommandEntry, CommandGroup, CommandRegistry},
    shell_context::ShellContext,
};
use crate::utils::build_info;

pub(super) fn register(registry: &mut CommandRegistry) {
    registry.register(
        CommandGroup::System,
        CommandEntry::new(
            "help",
            "List commands or describe one",
            "help [command]",
            cmd_help,
        ),
    );
    registry.register(
        CommandGroup::System,
        CommandEntry::new(
            "user",
            "Show or switch the active user",
            "user [name]",
            cmd_user,
        ),
    );
    registry.register(
        CommandGroup::System,
        CommandEntry::new(
            "categories",
            "List the category catalog",
            "categories",
            cmd_categories,
        ),
    );
    registry.register(
        CommandGroup::System,
        CommandEntry::new(
            "config",
            "Show or change preferences",
            "config [show | set <key> <value> | backup [note] | backups | restore <name>]",
            cmd_config,
        ),
    );
    registry.register(
        CommandGroup::System,
        CommandEntry::new(
            "version",
            "Show build information",
            "version",
            cmd_version,
        ),
    );
    registry.register(
        CommandGroup::System,
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    );
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context
            .registry
            .get(&name.to_lowercase())
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown command `{name}`")))?;
        output::info(format!("{}: {}", entry.name, entry.description));
        output::hint(format!("usage: {} {}", entry.name, entry.arguments()).trim_end());
        return Ok(LoopControl::Continue);
    }

    for (group, entries) in context.registry.grouped() {
        output::section(group);
        let listing: Vec<String> = entries
            .iter()
            .map(|entry| format!("  {:<14}{}", entry.name, entry.description))
            .collect();
        output::block(&listing.join("\n"));
    }
    Ok(LoopControl::Continue)
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first().map(|name| name.trim()) else {
        match &context.user {
            Some(user) => output::info(format!("Active user: {user}")),
            None => output::info("No active user."),
        }
        let users = context.storage.list_users()?;
        if !users.is_empty() {
            output::info(format!("Known users: {}", users.join(", ")));
        }
        return Ok(LoopControl::Continue);
    };
    if name.is_empty() || args.len() > 1 {
        return Err(CommandError::usage("user [name]"));
    }

    context.user = Some(name.to_string());
    context.config.last_user = Some(name.to_string());
    context.save_config()?;
    let book = context.book()?;
    output::success(format!(
        "Active user is now `{name}` ({} budgets).",
        book.budgets.len()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Categories");
    output::block(&formatters::categories());
    Ok(LoopControl::Continue)
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output::section("Configuration");
            let lines: Vec<String> = context
                .config
                .entries()
                .into_iter()
                .map(|(key, value)| format!("  {key:<20}{value}"))
                .collect();
            output::block(&lines.join("\n"));
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            context.config.set(key, &value.join(" "))?;
            context.save_config()?;
            output::success(format!("Updated `{key}`."));
        }
        ["backup", note @ ..] => {
            let note = note.join(" ");
            let name = context
                .config_manager
                .backup(&context.config, Some(note.as_str()).filter(|n| !n.is_empty()))?;
            output::success(format!("Configuration backed up to {name}."));
        }
        ["backups"] => {
            let names = context.config_manager.list_backups()?;
            if names.is_empty() {
                output::info("No configuration backups yet.");
            } else {
                output::block(&names.join("\n"));
            }
        }
        ["restore", name] => {
            if !context.confirm(&format!("Replace the current configuration with {name}?"))? {
                output::info("Restore cancelled.");
                return Ok(LoopControl::Continue);
            }
            let restored: Config = context.config_manager.restore(name)?;
            context.config = restored;
            context.save_config()?;
            output::success(format!("Configuration restored from {name}."));
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "usage: config [show | set <key> <value> | backup [note] | backups | restore <name>] (keys: {})",
                Config::KEYS.join(", ")
            )))
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let build = build_info::current();
    output::info(build.summary());
    output::hint(build.rustc);
    Ok(LoopControl::Continue)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Ok(LoopControl::Exit)
}
