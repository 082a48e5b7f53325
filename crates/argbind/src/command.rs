//! One level of subcommand dispatch.

use indexmap::IndexMap;

use crate::error::{CommandError, ConfigurationError, ErrorPolicy, Result};
use crate::help::{self, OFFSET};

type Handler<'a> = Box<dyn FnMut(&[&str]) -> Result<i32> + 'a>;

/// A named entry of a [`Dispatcher`].
pub struct Command<'a> {
    name: String,
    description: String,
    is_default: bool,
    handler: Option<Handler<'a>>,
}

impl std::fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("is_default", &self.is_default)
            .field("bound", &self.handler.is_some())
            .finish()
    }
}

impl<'a> Command<'a> {
    fn new(name: String, is_default: bool) -> Self {
        Self {
            name,
            description: String::new(),
            is_default,
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn description(&mut self, text: impl Into<String>) -> &mut Self {
        self.description = text.into();
        self
    }

    /// Set the function run when the command is selected.
    ///
    /// It receives the tokens starting at the command key, so a nested
    /// [`Parser`](crate::Parser) or [`Dispatcher`] can take them as its own
    /// `argv`. A default command selected because no key was given receives
    /// an empty slice.
    pub fn handle<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&[&str]) -> Result<i32> + 'a,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    fn help(&self) -> String {
        let mut out = format!("{OFFSET}{}\t{}", self.name, self.description);
        if self.is_default {
            if !self.description.is_empty() {
                out.push(' ');
            }
            out.push_str("(default)");
        }
        out
    }
}

/// Routes the first token of a command line to a registered [`Command`].
///
/// ```
/// use argbind::{Dispatcher, ErrorPolicy};
///
/// let mut dispatcher = Dispatcher::new("git");
/// dispatcher.command("init")?.handle(|_| Ok(1));
/// dispatcher.default_command("commit")?.handle(|_| Ok(2));
///
/// assert_eq!(dispatcher.parse(&["git", "init"], ErrorPolicy::Propagate)?, 1);
/// assert_eq!(dispatcher.parse(&["git"], ErrorPolicy::Propagate)?, 2);
/// # Ok::<(), argbind::Error>(())
/// ```
#[derive(Debug)]
pub struct Dispatcher<'a> {
    program: String,
    title: String,
    commands: IndexMap<String, Command<'a>>,
    default: Option<String>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            title: String::new(),
            commands: IndexMap::new(),
            default: None,
        }
    }

    /// Header line of the help screen.
    pub fn title(&mut self, text: impl Into<String>) -> &mut Self {
        self.title = text.into();
        self
    }

    pub fn command(&mut self, name: impl Into<String>) -> Result<&mut Command<'a>, ConfigurationError> {
        self.register(name.into(), false)
    }

    /// Register a command that also runs when no command key is given.
    pub fn default_command(
        &mut self,
        name: impl Into<String>,
    ) -> Result<&mut Command<'a>, ConfigurationError> {
        let name = name.into();
        if let Some(current) = &self.default {
            return Err(ConfigurationError::DuplicateDefaultCommand(name, current.clone()));
        }
        self.register(name, true)
    }

    fn register(&mut self, name: String, is_default: bool) -> Result<&mut Command<'a>, ConfigurationError> {
        if name.is_empty() {
            return Err(ConfigurationError::EmptyCommandName);
        }
        if self.commands.contains_key(&name) {
            return Err(ConfigurationError::DuplicateCommand(name));
        }
        if is_default {
            self.default = Some(name.clone());
        }
        let (idx, _) = self
            .commands
            .insert_full(name.clone(), Command::new(name, is_default));
        Ok(&mut self.commands[idx])
    }

    /// Select a command by `argv[1]` and run its handler, returning its status.
    ///
    /// Command-line errors follow `policy`; configuration errors are always
    /// returned.
    pub fn parse<S: AsRef<str>>(&mut self, argv: &[S], policy: ErrorPolicy) -> Result<i32> {
        tracing::debug!(program = %self.program, args = argv.len().saturating_sub(1), "dispatching command");
        let tokens: Vec<&str> = argv.iter().skip(1).map(AsRef::<str>::as_ref).collect();
        match self.dispatch(&tokens) {
            Err(err) if policy == ErrorPolicy::Exit && err.is_recoverable() => {
                self.exit_with_help(&err.to_string())
            }
            other => other,
        }
    }

    fn dispatch(&mut self, tokens: &[&str]) -> Result<i32> {
        let key = tokens.first().copied().unwrap_or_default();
        let name = if key.is_empty() {
            self.default.clone().ok_or(CommandError::Missing)?
        } else {
            key.to_string()
        };

        let command = self
            .commands
            .get_mut(&name)
            .ok_or_else(|| CommandError::Unknown(name.clone()))?;
        tracing::debug!(command = %name, "selected command");

        let handler = command
            .handler
            .as_mut()
            .ok_or_else(|| ConfigurationError::MissingBinding(name.clone()))?;
        handler(tokens)
    }

    /// Render the help screen. `error` replaces the title as the header line.
    pub fn help_message(&self, error: Option<&str>) -> String {
        let mut out = String::new();

        out.push_str(error.unwrap_or(&self.title));
        out.push('\n');

        out.push_str("\nUsage:\n");
        out.push_str(OFFSET);
        out.push_str(&self.program);
        if self.default.is_some() {
            out.push_str(" [<command>] [<args>]");
        } else {
            out.push_str(" <command> [<args>]");
        }

        out.push_str("\n\nCommands:\n");
        let mut lines: Vec<String> = self.commands.values().map(Command::help).collect();
        help::align_tabs(&mut lines);
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }

        out
    }

    /// Write the help screen to stderr.
    pub fn print_help(&self, error: Option<&str>) {
        eprintln!("{}", self.help_message(error));
    }

    /// Write the help screen headed by `error` to stderr and exit with status 1.
    pub fn exit_with_help(&self, error: &str) -> ! {
        self.print_help(Some(error));
        std::process::exit(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn rejects_bad_names() {
        let mut dispatcher = Dispatcher::new("git");
        assert_eq!(
            dispatcher.command("").unwrap_err(),
            ConfigurationError::EmptyCommandName
        );
        dispatcher.command("init").unwrap();
        assert_eq!(
            dispatcher.command("init").unwrap_err(),
            ConfigurationError::DuplicateCommand("init".into())
        );
        assert_eq!(
            dispatcher.default_command("init").unwrap_err(),
            ConfigurationError::DuplicateCommand("init".into())
        );
    }

    #[test]
    fn only_one_default() {
        let mut dispatcher = Dispatcher::new("git");
        dispatcher.default_command("commit").unwrap();
        assert_eq!(
            dispatcher.default_command("push").unwrap_err(),
            ConfigurationError::DuplicateDefaultCommand("push".into(), "commit".into())
        );
        let commit = dispatcher.commands.get("commit").unwrap();
        assert_eq!(commit.name(), "commit");
        assert!(commit.is_default());
    }

    #[test]
    fn handler_sees_the_key_first() {
        let mut seen: Vec<String> = Vec::new();
        {
            let mut dispatcher = Dispatcher::new("git");
            dispatcher.command("add").unwrap().handle(|args| {
                seen.extend(args.iter().map(|s| s.to_string()));
                Ok(0)
            });
            dispatcher
                .parse(&["git", "add", "-v", "file"], ErrorPolicy::Propagate)
                .unwrap();
        }
        assert_eq!(seen, vec!["add", "-v", "file"]);
    }

    #[test]
    fn empty_key_without_default_is_missing() {
        let mut dispatcher = Dispatcher::new("git");
        dispatcher.command("init").unwrap().handle(|_| Ok(0));
        assert_eq!(
            dispatcher.parse(&["git"], ErrorPolicy::Propagate).unwrap_err(),
            Error::Command(CommandError::Missing)
        );
    }

    #[test]
    fn unknown_key_ignores_the_default() {
        let mut dispatcher = Dispatcher::new("git");
        dispatcher.default_command("commit").unwrap().handle(|_| Ok(0));
        match dispatcher.parse(&["git", "push"], ErrorPolicy::Propagate) {
            Err(Error::Command(CommandError::Unknown(name))) => assert_eq!(name, "push"),
            other => panic!("expected unknown command, got: {other:?}"),
        }
    }

    #[test]
    fn command_without_handler_is_a_configuration_error() {
        let mut dispatcher = Dispatcher::new("git");
        dispatcher.command("init").unwrap();
        assert_eq!(
            dispatcher.parse(&["git", "init"], ErrorPolicy::Exit).unwrap_err(),
            Error::Configuration(ConfigurationError::MissingBinding("init".into()))
        );
    }

    #[test]
    fn help_lists_commands_in_order() {
        let mut dispatcher = Dispatcher::new("git");
        dispatcher.title("A tiny vcs");
        dispatcher
            .command("init")
            .unwrap()
            .description("create a repository");
        dispatcher
            .default_command("commit")
            .unwrap()
            .description("record changes");

        let expected = "A tiny vcs\n\
            \n\
            Usage:\n  git [<command>] [<args>]\n\
            \n\
            Commands:\n\
            \x20 init      create a repository\n\
            \x20 commit    record changes (default)\n";
        assert_eq!(dispatcher.help_message(None), expected);
    }

    #[test]
    fn usage_without_default_requires_a_command() {
        let mut dispatcher = Dispatcher::new("git");
        dispatcher.command("init").unwrap();
        assert!(
            dispatcher
                .help_message(Some("Command is not specified"))
                .starts_with("Command is not specified\n\nUsage:\n  git <command> [<args>]\n")
        );
    }
}
