//! Declarative argv parsing that writes straight into program state.
//!
//! Options are declared with [`Arg`], bound to caller-owned variables or
//! handlers, and registered on a [`Parser`]. A [`Dispatcher`] selects a
//! subcommand by its first token and hands the rest of the command line to it.
//!
//! # Example
//!
//! ```
//! use argbind::{Arg, ErrorPolicy, Parser};
//!
//! let mut numbers: Vec<i64> = Vec::new();
//! let mut total = 0i64;
//! {
//!     let mut parser = Parser::new("sum");
//!     parser
//!         .add(
//!             Arg::new('i', "int")
//!                 .repeatable()
//!                 .value_type("INTEGER")
//!                 .handle_as(|n: i64| total += n),
//!         )?
//!         .add_help('h', Some("help"))?;
//!     parser.free_arguments("numbers").unlimited().store(&mut numbers);
//!     parser.parse(&["sum", "-i", "1", "--int", "2", "--", "-3"], ErrorPolicy::Propagate)?;
//! }
//! assert_eq!(total, 3);
//! assert_eq!(numbers, vec![-3]);
//! # Ok::<(), argbind::Error>(())
//! ```

pub mod convert;

mod arg;
mod command;
mod error;
mod free_args;
mod help;
mod parser;
mod token;

pub use arg::{Arg, ArgSpec};
pub use command::{Command, Dispatcher};
pub use convert::{Formattable, Parsable};
pub use error::{
    CommandError, ConfigurationError, ConversionError, Error, ErrorPolicy,
    InvalidFreeArgumentsCount, ProcessorError, Result,
};
pub use free_args::{FreeArgs, UNLIMITED};
pub use parser::Parser;
