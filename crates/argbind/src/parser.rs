//! The option parser: registration, the matching pass and the help screen.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::arg::{Arg, Processor};
use crate::error::{ConfigurationError, ErrorPolicy, ProcessorError, Result};
use crate::free_args::FreeArgs;
use crate::help::{self, OFFSET};
use crate::token::{self, Token};

/// Parses one level of a command line into the variables bound by its options.
///
/// The parser borrows every bound target for `'a`, so the targets can be read
/// once the parser is dropped.
///
/// ```
/// use argbind::{Arg, ErrorPolicy, Parser};
///
/// let mut count = 0u32;
/// let mut verbose = false;
/// {
///     let mut parser = Parser::new("demo");
///     parser
///         .add(Arg::new('c', "count").value_type("N").store(&mut count))?
///         .add(Arg::new('v', "verbose").switch(&mut verbose))?;
///     parser.parse(&["demo", "-c", "3", "--verbose"], ErrorPolicy::Propagate)?;
/// }
/// assert_eq!(count, 3);
/// assert!(verbose);
/// # Ok::<(), argbind::Error>(())
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    program: String,
    mode: String,
    title: String,
    processors: Vec<Processor<'a>>,
    positional: Vec<usize>,
    short: HashMap<char, usize>,
    long: HashMap<String, usize>,
    help: Option<usize>,
    free_args: FreeArgs<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_mode(program, "")
    }

    /// `mode` is printed after the program name in the usage line.
    pub fn with_mode(program: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            mode: mode.into(),
            title: String::new(),
            processors: Vec::new(),
            positional: Vec::new(),
            short: HashMap::new(),
            long: HashMap::new(),
            help: None,
            free_args: FreeArgs::default(),
        }
    }

    /// Header line of the help screen.
    pub fn title(&mut self, text: impl Into<String>) -> &mut Self {
        self.title = text.into();
        self
    }

    /// Register an option. Positional declarations get the next position index.
    pub fn add(&mut self, arg: Arg<'a>) -> Result<&mut Self, ConfigurationError> {
        self.register(arg)?;
        Ok(self)
    }

    /// Register `arg` as a flag.
    pub fn flag(&mut self, arg: Arg<'a>) -> Result<&mut Self, ConfigurationError> {
        self.add(arg.flag())
    }

    /// Name the free arguments and return the collector for configuration.
    pub fn free_arguments(&mut self, name: impl Into<String>) -> &mut FreeArgs<'a> {
        self.free_args.name(name)
    }

    /// Add the option that prints the help screen and exits with status 0.
    pub fn add_help(
        &mut self,
        short: char,
        long: Option<&str>,
    ) -> Result<&mut Self, ConfigurationError> {
        if self.help.is_some() {
            return Err(ConfigurationError::DuplicateHelp);
        }
        let idx = self.register(Arg::help_option(short, long))?;
        self.help = Some(idx);
        Ok(self)
    }

    fn register(&mut self, arg: Arg<'a>) -> Result<usize, ConfigurationError> {
        let spec = arg.spec();
        let idx = self.processors.len();

        if spec.is_positional() {
            if spec.long().is_none() {
                return Err(ConfigurationError::Unnamed);
            }
            let position = self.positional.len();
            self.positional.push(idx);
            self.processors.push(Processor::new(arg, Some(position)));
            return Ok(idx);
        }

        if spec.short().is_none() && spec.long().is_none() {
            return Err(ConfigurationError::Unnamed);
        }
        if let Some(short) = spec.short()
            && self.short.contains_key(&short)
        {
            return Err(ConfigurationError::DuplicateShort(short));
        }
        if let Some(long) = spec.long()
            && self.long.contains_key(long)
        {
            return Err(ConfigurationError::DuplicateLong(long.to_string()));
        }

        if let Some(short) = spec.short() {
            self.short.insert(short, idx);
        }
        if let Some(long) = spec.long() {
            self.long.insert(long.to_string(), idx);
        }
        self.processors.push(Processor::new(arg, None));
        Ok(idx)
    }

    /// Run the matching pass over `argv` (`argv[0]` is the program and is skipped).
    ///
    /// Returns `Ok(0)` on success. Command-line errors follow `policy`;
    /// configuration errors are always returned.
    pub fn parse<S: AsRef<str>>(&mut self, argv: &[S], policy: ErrorPolicy) -> Result<i32> {
        tracing::debug!(program = %self.program, args = argv.len().saturating_sub(1), "parsing arguments");
        match self.run(argv) {
            Ok(()) => Ok(0),
            Err(err) if policy == ErrorPolicy::Exit && err.is_recoverable() => {
                self.exit_with_help(&err.to_string())
            }
            Err(err) => Err(err),
        }
    }

    fn run<S: AsRef<str>>(&mut self, argv: &[S]) -> Result<()> {
        let mut unused: IndexSet<usize> = (0..self.processors.len()).collect();
        let mut free: Vec<&str> = Vec::new();
        let mut next_positional = 0;
        let mut after_delimiter = false;

        let mut tokens = argv.iter().skip(1).map(AsRef::<str>::as_ref).peekable();
        while let Some(raw) = tokens.next() {
            let positional_open = next_positional < self.positional.len();
            let token = Token::classify(raw, after_delimiter, positional_open);
            tracing::trace!(raw, ?token, "classified token");

            match token {
                Token::Delimiter => after_delimiter = true,
                Token::Free(text) => free.push(text),
                Token::Positional(text) => {
                    let idx = self.positional[next_positional];
                    next_positional += 1;
                    self.deliver(idx, text, &mut unused)?;
                }
                Token::Long(name) => {
                    let idx = self.lookup_long(name)?;
                    let value = Self::inline_value(&mut tokens);
                    self.deliver(idx, value, &mut unused)?;
                }
                Token::Short(name) => {
                    let idx = self.lookup_short(name)?;
                    let value = Self::inline_value(&mut tokens);
                    self.deliver(idx, value, &mut unused)?;
                }
            }
        }

        for idx in unused {
            let processor = &mut self.processors[idx];
            tracing::trace!(option = %processor.spec().name(), "resolving absent option");
            processor.resolve_absent()?;
        }

        self.free_args.parse(&free)
    }

    fn lookup_long(&self, name: &str) -> Result<usize> {
        self.long
            .get(name)
            .copied()
            .ok_or_else(|| ProcessorError::UnknownOption(format!("--{name}")).into())
    }

    fn lookup_short(&self, name: &str) -> Result<usize> {
        name.chars()
            .next()
            .and_then(|c| self.short.get(&c).copied())
            .ok_or_else(|| ProcessorError::UnknownOption(format!("-{name}")).into())
    }

    /// Take the next token as the option's value unless it looks like another option.
    fn inline_value<'t, I>(tokens: &mut std::iter::Peekable<I>) -> &'t str
    where
        I: Iterator<Item = &'t str>,
    {
        tokens.next_if(|next| token::is_value(next)).unwrap_or_default()
    }

    fn deliver(&mut self, idx: usize, text: &str, unused: &mut IndexSet<usize>) -> Result<()> {
        let first = unused.shift_remove(&idx);
        let spec = self.processors[idx].spec();
        if !first && !spec.is_repeatable() {
            return Err(ProcessorError::NotRepeatable(spec.name()).into());
        }
        if self.help == Some(idx) {
            self.print_help(None);
            std::process::exit(0);
        }
        self.processors[idx].parse(text)
    }

    /// Options in display order: positional first, then required, declaration
    /// order otherwise. The help option is left out.
    fn sorted(&self) -> Vec<&Processor<'a>> {
        let mut sorted: Vec<&Processor<'a>> = self
            .processors
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != self.help)
            .map(|(_, p)| p)
            .collect();
        sorted.sort_by_key(|p| (p.position().is_none(), !p.spec().is_required()));
        sorted
    }

    /// Render the help screen. `error` replaces the title as the header line.
    pub fn help_message(&self, error: Option<&str>) -> String {
        let mut out = String::new();

        out.push_str(error.unwrap_or(&self.title));
        out.push('\n');

        out.push_str("\nUsage:\n");
        out.push_str(OFFSET);
        out.push_str(&self.program);
        if !self.mode.is_empty() {
            out.push(' ');
            out.push_str(&self.mode);
        }

        let sorted = self.sorted();
        for p in &sorted {
            out.push(' ');
            out.push_str(&p.usage());
        }
        let free_usage = self.free_args.usage();
        if !free_usage.is_empty() {
            out.push(' ');
            out.push_str(&free_usage);
        }

        out.push_str("\n\nOptions:\n");
        let help_option = self.help.map(|idx| &self.processors[idx]);
        let mut lines: Vec<String> = help_option
            .into_iter()
            .chain(sorted)
            .map(|p| p.help())
            .collect();
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
