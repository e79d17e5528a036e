//! Utilities for debugging parsers.
//!
//! *“He was staring at the instruments with the air of one who is trying to convert Fahrenheit to centigrade in his
//! head while his house is burning down.”*
//!
//! Parsers built from closures are opaque, which makes a misbehaving grammar hard to diagnose. [`Parser::debug`] wraps
//! a parser so that every application of it is reported through the [`log`] facade at `trace` level, along with the
//! place in the source where the wrapper was created. Install any `log` implementation to see the output.

use super::*;

use std::{borrow::Cow, panic::Location};

/// Information about a specific parser.
#[derive(Clone, Debug)]
pub struct ParserInfo {
    name: Cow<'static, str>,
    location: &'static Location<'static>,
}

impl ParserInfo {
    pub(crate) fn new(name: impl Into<Cow<'static, str>>, location: &'static Location<'static>) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// The label given to the parser.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where in the source the parser was labelled.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl fmt::Display for ParserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` ({})", self.name, self.location)
    }
}

impl<I: Clone + 'static, A: 'static> Parser<I, A> {
    /// Log every application of this parser, and its outcome, at `trace` level.
    ///
    /// The parser's behaviour is otherwise unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let digits = text::digit().many1().debug("digits");
    ///
    /// assert_eq!(digits.parse("42").into_result().map(|d| d.len()), Ok(2));
    /// ```
    #[track_caller]
    pub fn debug(self, name: impl Into<Cow<'static, str>>) -> Self {
        let info = Arc::new(ParserInfo::new(name, Location::caller()));
        let p = self.clone();
        Parser::new(
            move || p.emptiness(),
            move |ctx, input| {
                log::trace!("entering {} at position {}", info, input.position());
                let info = info.clone();
                self.apply(ctx, input).map(move |res| {
                    match &res {
                        ParseResult::Success { next, .. } => {
                            log::trace!("{} matched up to position {}", info, next.position())
                        }
                        ParseResult::Failure { error, .. } => log::trace!("{} failed: {}", info, error),
                    }
                    res
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_records_caller() {
        let info = ParserInfo::new("expr", Location::caller());
        assert_eq!(info.name(), "expr");
        assert_eq!(info.location().file(), file!());
        assert!(info.to_string().starts_with("`expr` ("));
    }

    #[test]
    fn debug_is_transparent() {
        let plain = just('a').then(just('b'));
        let traced = plain.clone().debug("ab");
        for src in ["ab", "ax", ""] {
            let input = Input::from(src);
            assert_eq!(plain.parse(input.clone()), traced.parse(input));
        }
        assert_eq!(plain.accepts_empty(), traced.accepts_empty());
    }
}
