//! Error taxonomy and the policy that decides what a failed parse does.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What `parse` does when the command line itself is wrong.
///
/// Configuration errors are never subject to the policy: they are bugs in the
/// declaring code and are always returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Print the help screen with the error as its header and exit with status 1.
    #[default]
    Exit,
    /// Return the error to the caller.
    Propagate,
}

/// Misuse of the declaration API. Detected at bind time or when the faulty
/// declaration is first exercised by a parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Cannot add option: at least one of a short or a long name is required")]
    Unnamed,

    #[error("Cannot add option -{0}: the name is already used")]
    DuplicateShort(char),

    #[error("Cannot add option --{0}: the name is already used")]
    DuplicateLong(String),

    #[error("Cannot add two help options")]
    DuplicateHelp,

    #[error("Cannot set default value for option {0}: the rendered value is empty")]
    EmptyDefault(String),

    #[error("Cannot append option {0}: call repeatable() before append()")]
    AppendNotRepeatable(String),

    #[error("Cannot parse option {0}: the handler was not set")]
    MissingBinding(String),

    #[error("Cannot add command: the name is empty")]
    EmptyCommandName,

    #[error("Cannot add command {0}: the name is already used")]
    DuplicateCommand(String),

    #[error("Cannot add default command {0}: default command is already set to {1}")]
    DuplicateDefaultCommand(String, String),
}

/// The command line does not fit the declared options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    #[error("Unknown option {0}")]
    UnknownOption(String),

    #[error("Option {0} is required.")]
    Required(String),

    #[error("Cannot parse option {0}: argument required.")]
    MissingValue(String),

    #[error("Cannot parse option {0}: option is not repeatable")]
    NotRepeatable(String),

    #[error("Cannot parse option {name}: {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: ConversionError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Command is not specified")]
    Missing,

    #[error("Unknown command {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid free arguments count, got {count} while maximum is {max}")]
pub struct InvalidFreeArgumentsCount {
    pub count: usize,
    pub max: usize,
}

/// Text that does not losslessly parse into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{text}' to {target}: {reason}")]
pub struct ConversionError {
    pub text: String,
    pub target: &'static str,
    pub reason: String,
}

impl ConversionError {
    pub fn new(text: &str, target: &'static str, reason: impl std::fmt::Display) -> Self {
        Self {
            text: text.to_string(),
            target,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Processor(#[from] ProcessorError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    FreeArguments(#[from] InvalidFreeArgumentsCount),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl Error {
    /// Whether the error comes from the command line rather than the declarations.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }
}
