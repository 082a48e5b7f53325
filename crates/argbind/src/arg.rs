//! Option declarations and the per-option parse logic.
//!
//! An [`Arg`] is a staged builder: identity first (`Arg::short`, `Arg::long`,
//! `Arg::new`, `Arg::positional`), then attributes and exactly one binding.
//! [`Parser::add`](crate::Parser::add) finalizes it into an immutable
//! [`ArgSpec`] plus the binding that writes into caller-owned state.

use std::fmt;

use crate::convert::{self, Formattable, Parsable};
use crate::error::{ConfigurationError, ConversionError, ProcessorError, Result};
use crate::help::OFFSET;

/// Text delivered to a `store` binding of a flag that is present.
const FLAG_ON: &str = "true";
/// Text delivered to a `store` binding of a flag that is absent.
const FLAG_OFF: &str = "false";

type Sink<'a> = Box<dyn FnMut(&str) -> Result<(), ConversionError> + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindingKind {
    Store,
    Handle,
    Append,
    Help,
}

pub(crate) struct Binding<'a> {
    kind: BindingKind,
    sink: Sink<'a>,
}

impl fmt::Debug for Binding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("kind", &self.kind).finish()
    }
}

/// Immutable description of a declared option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSpec {
    short: Option<char>,
    long: Option<String>,
    positional: bool,
    required: bool,
    flag: bool,
    repeatable: bool,
    default_value: Option<String>,
    value_type: String,
    description: String,
}

impl ArgSpec {
    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_flag(&self) -> bool {
        self.flag
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name used in messages: the long name, or the short one when there is none.
    pub fn name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => long.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => String::new(),
        }
    }

    fn type_label(&self) -> &str {
        if self.flag { "flag" } else { self.value_type.as_str() }
    }
}

/// Builder for one option, flag or positional argument.
#[derive(Debug)]
pub struct Arg<'a> {
    spec: ArgSpec,
    binding: Option<Binding<'a>>,
}

impl<'a> Arg<'a> {
    fn with_names(short: Option<char>, long: &str) -> Self {
        let long = (!long.is_empty()).then(|| long.to_string());
        Self {
            spec: ArgSpec {
                short,
                long,
                ..Default::default()
            },
            binding: None,
        }
    }

    /// `-c` and `--long`.
    pub fn new(short: char, long: impl AsRef<str>) -> Self {
        Self::with_names(Some(short), long.as_ref())
    }

    /// `-c` only.
    pub fn short(short: char) -> Self {
        Self::with_names(Some(short), "")
    }

    /// `--long` only.
    pub fn long(long: impl AsRef<str>) -> Self {
        Self::with_names(None, long.as_ref())
    }

    /// Matched by order among the positional declarations of a parser.
    pub fn positional(name: impl AsRef<str>) -> Self {
        let mut arg = Self::with_names(None, name.as_ref());
        arg.spec.positional = true;
        arg
    }

    pub(crate) fn help_option(short: char, long: Option<&str>) -> Self {
        Self::with_names(Some(short), long.unwrap_or_default())
            .flag()
            .description("print this help and exit")
            .bind(BindingKind::Help, Box::new(|_| Ok(())))
    }

    pub fn spec(&self) -> &ArgSpec {
        &self.spec
    }

    fn bind(mut self, kind: BindingKind, sink: Sink<'a>) -> Self {
        self.binding = Some(Binding { kind, sink });
        self
    }

    /// Overwrite `target` with the converted value every time the option fires.
    ///
    /// On a flag the target receives `true` when present and `false` when absent.
    pub fn store<T: Parsable>(self, target: &'a mut T) -> Self {
        self.bind(
            BindingKind::Store,
            Box::new(move |text| {
                *target = convert::to(text)?;
                Ok(())
            }),
        )
    }

    /// Call `handler` with the raw text.
    pub fn handle<F>(self, mut handler: F) -> Self
    where
        F: FnMut(&str) + 'a,
    {
        self.bind(
            BindingKind::Handle,
            Box::new(move |text| {
                handler(text);
                Ok(())
            }),
        )
    }

    /// Convert the text to `T` and call `handler` with it.
    pub fn handle_as<T, F>(self, mut handler: F) -> Self
    where
        T: Parsable + 'a,
        F: FnMut(T) + 'a,
    {
        self.bind(
            BindingKind::Handle,
            Box::new(move |text| {
                handler(convert::to(text)?);
                Ok(())
            }),
        )
    }

    /// Push every occurrence onto `target`. The option must already be repeatable.
    pub fn append<T: Parsable>(
        self,
        target: &'a mut Vec<T>,
    ) -> Result<Self, ConfigurationError> {
        if !self.spec.repeatable {
            return Err(ConfigurationError::AppendNotRepeatable(self.spec.name()));
        }
        Ok(self.bind(
            BindingKind::Append,
            Box::new(move |text| {
                target.push(convert::to(text)?);
                Ok(())
            }),
        ))
    }

    /// Declare a boolean flag bound to `target`: `true` when present, `false` when absent.
    pub fn switch(self, target: &'a mut bool) -> Self {
        self.flag().store(target)
    }

    /// The option takes no value.
    pub fn flag(mut self) -> Self {
        self.spec.flag = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.spec.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.spec.required = false;
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.spec.repeatable = true;
        self
    }

    /// Value used when the option is absent or given without a value.
    pub fn default_value<T: Formattable>(mut self, value: T) -> Result<Self, ConfigurationError> {
        let text = convert::from(&value);
        if text.is_empty() {
            return Err(ConfigurationError::EmptyDefault(self.spec.name()));
        }
        self.spec.default_value = Some(text);
        Ok(self)
    }

    pub fn value_type(mut self, label: impl Into<String>) -> Self {
        self.spec.value_type = label.into();
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.spec.description = text.into();
        self
    }
}

/// A registered option: its frozen declaration plus the binding.
#[derive(Debug)]
pub(crate) struct Processor<'a> {
    spec: ArgSpec,
    position: Option<usize>,
    binding: Option<Binding<'a>>,
}

impl<'a> Processor<'a> {
    pub(crate) fn new(arg: Arg<'a>, position: Option<usize>) -> Self {
        Self {
            spec: arg.spec,
            position,
            binding: arg.binding,
        }
    }

    pub(crate) fn spec(&self) -> &ArgSpec {
        &self.spec
    }

    pub(crate) fn position(&self) -> Option<usize> {
        self.position
    }

    /// Feed the text found on the command line. Empty text means no value was given.
    ///
    /// A flag stores `true` whatever the text; its handlers get the text as is.
    pub(crate) fn parse(&mut self, text: &str) -> Result<()> {
        let Some(kind) = self.binding.as_ref().map(|b| b.kind) else {
            return Err(ConfigurationError::MissingBinding(self.spec.name()).into());
        };
        if self.spec.flag {
            return match kind {
                BindingKind::Store => self.apply(FLAG_ON),
                _ => self.apply(text),
            };
        }
        if !text.is_empty() {
            return self.apply(text);
        }
        match self.spec.default_value.clone() {
            Some(default) => self.apply(&default),
            None => Err(ProcessorError::MissingValue(self.spec.name()).into()),
        }
    }

    /// Resolve an option that never appeared on the command line.
    pub(crate) fn resolve_absent(&mut self) -> Result<()> {
        if self.spec.required {
            return Err(ProcessorError::Required(self.spec.name()).into());
        }
        if self.spec.flag {
            return match self.binding.as_ref().map(|b| b.kind) {
                None => Err(ConfigurationError::MissingBinding(self.spec.name()).into()),
                Some(BindingKind::Store) => self.apply(FLAG_OFF),
                Some(_) => Ok(()),
            };
        }
        if self.spec.default_value.is_some() {
            return self.parse("");
        }
        Ok(())
    }

    fn apply(&mut self, text: &str) -> Result<()> {
        let Some(binding) = self.binding.as_mut() else {
            return Err(ConfigurationError::MissingBinding(self.spec.name()).into());
        };
        (binding.sink)(text).map_err(|source| {
            ProcessorError::InvalidValue {
                name: self.spec.name(),
                source,
            }
            .into()
        })
    }

    /// Token for the usage line, e.g. `[--int <INT>]` or `file`.
    pub(crate) fn usage(&self) -> String {
        let spec = &self.spec;
        let mut out = String::new();

        if !spec.required {
            out.push('[');
        }
        match (&spec.long, spec.short) {
            (Some(long), _) if spec.positional => out.push_str(long),
            (Some(long), _) => out.push_str(&format!("--{long}")),
            (None, Some(short)) => out.push_str(&format!("-{short}")),
            (None, None) => {}
        }
        if !spec.flag && !spec.value_type.is_empty() {
            out.push_str(&format!(" <{}>", spec.value_type));
        }
        if !spec.required {
            out.push(']');
        }

        out
    }

    /// Entry for the options block; `\t` marks where the description column starts.
    pub(crate) fn help(&self) -> String {
        let spec = &self.spec;
        let mut out = String::from(OFFSET);

        if spec.positional {
            out.push_str(spec.long.as_deref().unwrap_or_default());
        } else {
            let names: Vec<String> = spec
                .short
                .map(|s| format!("-{s}"))
                .into_iter()
                .chain(spec.long.as_ref().map(|l| format!("--{l}")))
                .collect();
            out.push_str(&names.join(", "));
        }
        if !spec.type_label().is_empty() {
            out.push_str(&format!(" <{}>", spec.type_label()));
        }
        out.push('\t');
        out.push_str(&spec.description);
        if let Some(default) = spec.default_value.as_deref().filter(|_| !spec.flag) {
            out.push_str(&format!(" [default = {default}]"));
        }
        if spec.repeatable {
            out.push_str(" (repeatable)");
        }

        out
    }
}
