//! Shared runtime state for CLI interactions and command execution.

use std::{path::Path, sync::Arc};

use budgetbud_config::{Config, ConfigManager};
use budgetbud_core::{storage::BookStorage, Clock, CoreError};
use budgetbud_domain::BudgetBook;
use budgetbud_storage_json::JsonBookStorage;
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::cli::{
    commands,
    core::{CliMode, CommandError, CommandResult, LoopControl},
    io as cli_io, output,
    registry::CommandRegistry,
    system_clock::SystemClock,
};
use crate::errors::{BudgetError, CliError};
use crate::utils::paths;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub storage: Arc<dyn BookStorage>,
    pub clock: Arc<dyn Clock>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub user: Option<String>,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Builds a context rooted at `$BUDGETBUD_HOME` (or `~/.budgetbud`).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_data_dir(mode, &paths::data_dir(), Arc::new(SystemClock))
    }

    pub fn with_data_dir(
        mode: CliMode,
        data_dir: &Path,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(data_dir).map_err(BudgetError::from)?;
        let config = config_manager.load().map_err(BudgetError::from)?;
        let storage = JsonBookStorage::new(
            config.resolve_books_root(data_dir),
            paths::backups_dir(data_dir),
        )
        .map_err(BudgetError::from)?;

        output::set_preferences(output::OutputPreferences {
            color: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            storage: Arc::new(storage),
            clock,
            config_manager,
            user: config.last_user.clone(),
            config,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match &self.user {
            Some(user) => format!("budgetbud({user})> "),
            None => "budgetbud> ".into(),
        }
    }

    pub fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> CommandResult {
        match self.registry.handler(command) {
            Some(handler) => handler(self, args),
            None => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let needle = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        self.confirm("Exit shell?")
            .map_err(|err| CliError::Command(err.to_string()))
    }

    /// Script mode answers yes to every confirmation.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::NoActiveUser => {
                output::error(CommandError::NoActiveUser);
                output::hint("Try `user alice` to get started.");
            }
            other => output::error(other),
        }
        Ok(())
    }

    pub(crate) fn require_user(&self) -> Result<&str, CommandError> {
        self.user.as_deref().ok_or(CommandError::NoActiveUser)
    }

    /// Snapshot of the active user's book.
    pub(crate) fn book(&self) -> Result<BudgetBook, CommandError> {
        let user = self.require_user()?;
        Ok(self.storage.load_book(user)?)
    }

    /// Runs `change` as one atomic read-modify-write of the active user's book.
    pub(crate) fn mutate<T, F>(&self, mut change: F) -> Result<(T, BudgetBook), CommandError>
    where
        F: FnMut(&mut BudgetBook, &dyn Clock) -> Result<T, CoreError>,
    {
        let user = self.require_user()?;
        let clock = Arc::clone(&self.clock);
        let mut outcome = None;
        let book = self.storage.update_book(user, &mut |book: &mut BudgetBook| {
            outcome = Some(change(book, clock.as_ref())?);
            Ok(())
        })?;
        let value = outcome
            .ok_or_else(|| CommandError::Message("book update produced no result".into()))?;
        Ok((value, book))
    }

    pub(crate) fn save_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        output::set_preferences(output::OutputPreferences {
            color: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
        Ok(())
    }
}
