//! Collector for trailing tokens that no option or positional slot claimed.

use crate::convert::{self, Parsable};
use crate::error::{ConversionError, InvalidFreeArgumentsCount, Result};

/// Sentinel for "no upper bound".
pub const UNLIMITED: usize = usize::MAX;

type Consumer<'a> = Box<dyn FnMut(&[&str]) -> Result<(), ConversionError> + 'a>;

/// Free arguments of a parser. Disallowed (maximum 0) until configured.
pub struct FreeArgs<'a> {
    name: String,
    max: usize,
    consumer: Option<Consumer<'a>>,
}

impl std::fmt::Debug for FreeArgs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreeArgs")
            .field("name", &self.name)
            .field("max", &self.max)
            .field("bound", &self.consumer.is_some())
            .finish()
    }
}

impl Default for FreeArgs<'_> {
    fn default() -> Self {
        Self {
            name: String::new(),
            max: 0,
            consumer: None,
        }
    }
}

impl<'a> FreeArgs<'a> {
    pub(crate) fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn max(&mut self, count: usize) -> &mut Self {
        self.max = count;
        self
    }

    pub fn unlimited(&mut self) -> &mut Self {
        self.max(UNLIMITED)
    }

    pub fn max_count(&self) -> usize {
        self.max
    }

    /// Convert every free argument and push it onto `target`.
    pub fn store<T: Parsable>(&mut self, target: &'a mut Vec<T>) -> &mut Self {
        self.consumer = Some(Box::new(move |args| {
            for arg in args {
                target.push(convert::to(arg)?);
            }
            Ok(())
        }));
        self
    }

    /// Hand all free arguments to `handler` at once.
    pub fn handle<F>(&mut self, mut handler: F) -> &mut Self
    where
        F: FnMut(&[&str]) + 'a,
    {
        self.consumer = Some(Box::new(move |args| {
            handler(args);
            Ok(())
        }));
        self
    }

    pub(crate) fn parse(&mut self, args: &[&str]) -> Result<()> {
        if args.len() > self.max {
            return Err(InvalidFreeArgumentsCount {
                count: args.len(),
                max: self.max,
            }
            .into());
        }
        if let Some(consumer) = self.consumer.as_mut() {
            consumer(args)?;
        }
        Ok(())
    }

    pub(crate) fn usage(&self) -> String {
        if self.max > 0 {
            format!("{}...", self.name)
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn disallowed_by_default() {
        let mut free = FreeArgs::default();
        assert!(free.parse(&[]).is_ok());
        assert_eq!(
            free.parse(&["x"]).unwrap_err(),
            Error::FreeArguments(InvalidFreeArgumentsCount { count: 1, max: 0 })
        );
    }

    #[test]
    fn enforces_the_maximum() {
        let mut free = FreeArgs::default();
        assert_eq!(free.max_count(), 0);
        free.max(2);
        assert_eq!(free.max_count(), 2);
        assert!(free.parse(&["a", "b"]).is_ok());
        assert!(matches!(
            free.parse(&["a", "b", "c"]),
            Err(Error::FreeArguments(InvalidFreeArgumentsCount { count: 3, max: 2 }))
        ));
    }

    #[test]
    fn store_converts_in_order() {
        let mut numbers: Vec<i32> = Vec::new();
        {
            let mut free = FreeArgs::default();
            free.unlimited().store(&mut numbers);
            free.parse(&["123", "15", "1024"]).unwrap();
        }
        assert_eq!(numbers, vec![123, 15, 1024]);
    }

    #[test]
    fn store_reports_conversion_errors() {
        let mut numbers: Vec<i32> = Vec::new();
        let mut free = FreeArgs::default();
        free.unlimited().store(&mut numbers);
        assert!(matches!(
            free.parse(&["1", "x"]),
            Err(Error::Conversion(ConversionError { .. }))
        ));
    }

    #[test]
    fn last_consumer_wins() {
        let mut stored: Vec<String> = Vec::new();
        let mut handled = 0;
        {
            let mut free = FreeArgs::default();
            free.unlimited()
                .store(&mut stored)
                .handle(|args| handled += args.len());
            free.parse(&["a", "b"]).unwrap();
        }
        assert!(stored.is_empty());
        assert_eq!(handled, 2);
    }

    #[test]
    fn usage_only_when_allowed() {
        let mut free = FreeArgs::default();
        free.name("files");
        assert_eq!(free.usage(), "");
        free.unlimited();
        assert_eq!(free.max_count(), UNLIMITED);
        free.max(0);
        free.max(1);
        assert_eq!(free.usage(), "files...");
    }
}
