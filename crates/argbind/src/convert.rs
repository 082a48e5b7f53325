//! String <-> value conversion used by every binding.
//!
//! A type takes part in binding by implementing [`Parsable`] (text to value)
//! and, for default values, [`Formattable`] (value to text). Conversion is
//! strict: the whole text must be consumed, so `"123.123"` is not an integer
//! and `" 12"` is not a number at all.

use std::path::{Path, PathBuf};

use crate::error::ConversionError;

pub trait Parsable: Sized {
    fn parse_arg(text: &str) -> Result<Self, ConversionError>;
}

pub trait Formattable {
    fn format_arg(&self) -> String;
}

/// Parse `text` into `T`.
pub fn to<T: Parsable>(text: &str) -> Result<T, ConversionError> {
    T::parse_arg(text)
}

/// Render `value` the way [`to`] reads it back.
pub fn from<T: Formattable + ?Sized>(value: &T) -> String {
    value.format_arg()
}

macro_rules! via_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Parsable for $ty {
                fn parse_arg(text: &str) -> Result<Self, ConversionError> {
                    text.parse::<$ty>()
                        .map_err(|e| ConversionError::new(text, stringify!($ty), e))
                }
            }

            impl Formattable for $ty {
                fn format_arg(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

via_from_str!(
    bool, char, f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

// Text-like targets take the token verbatim.
impl Parsable for String {
    fn parse_arg(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_string())
    }
}

impl Formattable for String {
    fn format_arg(&self) -> String {
        self.clone()
    }
}

impl Formattable for str {
    fn format_arg(&self) -> String {
        self.to_string()
    }
}

impl Formattable for &str {
    fn format_arg(&self) -> String {
        (*self).to_string()
    }
}

impl Parsable for PathBuf {
    fn parse_arg(text: &str) -> Result<Self, ConversionError> {
        Ok(PathBuf::from(text))
    }
}

impl Formattable for PathBuf {
    fn format_arg(&self) -> String {
        self.as_path().format_arg()
    }
}

impl Formattable for Path {
    fn format_arg(&self) -> String {
        self.to_string_lossy().into_owned()
    }
}
