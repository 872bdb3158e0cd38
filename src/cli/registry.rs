use std::collections::HashMap;
use std::fmt;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Section a command is listed under in `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Budgets,
    Items,
    Reports,
    System,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandGroup::Budgets => "Budgets and periods",
            CommandGroup::Items => "Line items",
            CommandGroup::Reports => "Reports and backups",
            CommandGroup::System => "Session",
        })
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }

    /// Usage text without the leading command name.
    pub fn arguments(&self) -> &'static str {
        self.usage
            .strip_prefix(self.name)
            .map(str::trim_start)
            .unwrap_or(self.usage)
    }
}

/// Commands in registration order, indexed by name.
///
/// Registering a name twice replaces the earlier entry in place.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<(CommandGroup, CommandEntry)>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, group: CommandGroup, entry: CommandEntry) {
        match self.index.get(entry.name) {
            Some(&slot) => self.entries[slot] = (group, entry),
            None => {
                self.index.insert(entry.name, self.entries.len());
                self.entries.push((group, entry));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    /// Entries bucketed by group, groups in declaration order.
    pub fn grouped(&self) -> Vec<(CommandGroup, Vec<&CommandEntry>)> {
        let mut groups: Vec<(CommandGroup, Vec<&CommandEntry>)> = Vec::new();
        for (group, entry) in &self.entries {
            match groups.iter_mut().find(|(existing, _)| existing == group) {
                Some((_, bucket)) => bucket.push(entry),
                None => groups.push((*group, vec![entry])),
            }
        }
        groups.sort_by_key(|(group, _)| *group);
        groups
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, entry)| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::LoopControl;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(LoopControl::Continue)
    }

    #[test]
    fn groups_keep_registration_order_within_each_section() {
        let mut registry = CommandRegistry::new();
        registry.register(
            CommandGroup::System,
            CommandEntry::new("help", "List commands", "help [command]", noop),
        );
        registry.register(
            CommandGroup::Budgets,
            CommandEntry::new("period", "Dates", "period [frequency]", noop),
        );
        registry.register(
            CommandGroup::Budgets,
            CommandEntry::new("budgets", "List", "budgets", noop),
        );
        registry.register(
            CommandGroup::Budgets,
            CommandEntry::new("period", "Period dates", "period [frequency] [index]", noop),
        );

        let grouped = registry.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, CommandGroup::Budgets);
        let names: Vec<_> = grouped[0].1.iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["period", "budgets"]);
        assert_eq!(registry.names().count(), 3);

        let period = registry.get("period").expect("period registered");
        assert_eq!(period.description, "Period dates");
        assert_eq!(period.arguments(), "[frequency] [index]");
        assert_eq!(registry.get("budgets").expect("budgets").arguments(), "");
        assert!(registry.handler("missing").is_none());
    }
}
