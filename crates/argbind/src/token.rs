//! Classification of raw argv tokens.

/// Literal token that turns every following token into a free argument.
pub(crate) const DELIMITER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'s> {
    /// `--` on its own.
    Delimiter,
    /// `--name`; holds the text after the dashes.
    Long(&'s str),
    /// `-x...`; holds the text after the dash. Only its first character names the option.
    Short(&'s str),
    /// Bare text while a positional slot is still open.
    Positional(&'s str),
    /// Bare text with no positional slot left, or anything after the delimiter.
    Free(&'s str),
}

impl<'s> Token<'s> {
    pub(crate) fn classify(raw: &'s str, after_delimiter: bool, positional_open: bool) -> Self {
        if after_delimiter {
            return Self::Free(raw);
        }
        if raw == DELIMITER {
            Self::Delimiter
        } else if let Some(name) = raw.strip_prefix("--") {
            Self::Long(name)
        } else if let Some(rest) = raw.strip_prefix('-') {
            Self::Short(rest)
        } else if positional_open {
            Self::Positional(raw)
        } else {
            Self::Free(raw)
        }
    }
}

/// Whether `raw` may be taken as the inline value of the preceding option.
pub(crate) fn is_value(raw: &str) -> bool {
    !raw.starts_with('-')
}
