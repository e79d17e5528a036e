//! Error types, traits and utilities.
//!
//! There are two families of error in this crate, and they are deliberately kept apart:
//!
//! - [`ParseError`] is an ordinary value describing why some input was rejected. It travels inside
//!   [`crate::ParseResult::Failure`] and is inspected by combinators like [`crate::Parser::or`] to decide what to try
//!   next. The one exception is an error of kind [`ErrorKind::LeftRecursion`]: it is *fatal*, and no combinator will
//!   recover from it.
//!
//! - [`GrammarError`] describes a grammar that is malformed (an empty [`crate::choice`], a [`crate::Ref`] set twice or
//!   never set at all). These are programming mistakes rather than properties of the input.

use std::fmt;

/// The broad category of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A token was found that the parser did not expect.
    Unexpected,
    /// The input ended while the parser still expected a token.
    EndOfInput,
    /// A failure raised with a custom message, e.g. by [`crate::fail`] or [`crate::Parser::try_map`].
    Custom,
    /// A recursive rule was re-entered at the same position without consuming any input. Parsing cannot terminate
    /// from here, so this error is fatal.
    LeftRecursion,
}

/// A description of why a parser rejected its input.
///
/// # Examples
///
/// ```
/// # use bounce::{prelude::*, error::ErrorKind};
/// let sign = just('+').or(just('-'));
///
/// let err = sign.parse("x").into_result().unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Unexpected);
/// assert_eq!(err.to_string(), "expected one of: '+', '-', found 'x' at position 0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseError {
    kind: ErrorKind,
    position: usize,
    expected: Vec<String>,
    found: Option<String>,
    message: Option<String>,
    context: Vec<String>,
}

impl ParseError {
    fn new(kind: ErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            expected: Vec::new(),
            found: None,
            message: None,
            context: Vec::new(),
        }
    }

    /// An error for a token that did not match the `expected` pattern.
    pub fn unexpected(position: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: vec![expected.into()],
            found: Some(found.into()),
            ..Self::new(ErrorKind::Unexpected, position)
        }
    }

    /// An error for input that ended where the `expected` pattern should have been.
    pub fn end_of_input(position: usize, expected: impl Into<String>) -> Self {
        Self {
            expected: vec![expected.into()],
            ..Self::new(ErrorKind::EndOfInput, position)
        }
    }

    /// An error listing every pattern that would have been accepted. A `found` of `None` means the input had ended.
    pub fn expected_found(position: usize, expected: Vec<String>, found: Option<String>) -> Self {
        let kind = if found.is_some() {
            ErrorKind::Unexpected
        } else {
            ErrorKind::EndOfInput
        };
        Self {
            expected,
            found,
            ..Self::new(kind, position)
        }
    }

    /// An error carrying nothing but a message.
    pub fn custom(position: usize, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(ErrorKind::Custom, position)
        }
    }

    /// The fatal error raised when the rule `name` re-enters itself at `position`.
    pub fn left_recursion(position: usize, name: &str) -> Self {
        Self {
            message: Some(format!(
                "left recursion detected: rule `{}` re-entered without consuming input",
                name
            )),
            ..Self::new(ErrorKind::LeftRecursion, position)
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The token offset at which the error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The patterns that would have been accepted at this position, in the order they were tried.
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// A rendering of the token that was found instead, if any.
    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }

    /// The custom message attached to this error, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The notes attached by enclosing combinators, innermost first.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Returns `true` if no combinator may recover from this error.
    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::LeftRecursion
    }

    /// Attach a contextual note describing what was being parsed when the error occurred.
    #[must_use]
    pub fn with_context(mut self, note: impl Into<String>) -> Self {
        self.context.push(note.into());
        self
    }

    /// Replace the expected patterns of this error with a single label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if matches!(self.kind, ErrorKind::Unexpected | ErrorKind::EndOfInput) {
            self.expected = vec![label.into()];
        }
        self
    }

    /// Combine the errors of two alternatives.
    ///
    /// The error that got further through the input wins. If both occurred at the same position, their expected
    /// patterns are merged. A fatal error always wins over one that is not, and of two fatal errors the first is kept.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if self.is_fatal() {
            return self;
        }
        if other.is_fatal() {
            return other;
        }
        match self.position.cmp(&other.position) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal => {
                let mut merged = self;
                if merged.kind == ErrorKind::Custom && other.kind != ErrorKind::Custom {
                    merged.kind = other.kind;
                    merged.found = other.found.clone();
                }
                for label in other.expected {
                    if !merged.expected.contains(&label) {
                        merged.expected.push(label);
                    }
                }
                merged
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for note in self.context.iter().rev() {
            write!(f, "{}: ", note)?;
        }
        if self.expected.is_empty() {
            match &self.message {
                Some(message) => write!(f, "{}", message)?,
                None => write!(f, "unexpected input")?,
            }
        } else {
            match self.expected.as_slice() {
                [single] => write!(f, "expected {}", single)?,
                many => write!(f, "expected one of: {}", many.join(", "))?,
            }
            match &self.found {
                Some(found) => write!(f, ", found {}", found)?,
                None if self.kind == ErrorKind::EndOfInput => write!(f, ", found end of input")?,
                None => {}
            }
        }
        write!(f, " at position {}", self.position)
    }
}

impl std::error::Error for ParseError {}

/// A mistake in the construction of a grammar.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// [`crate::choice`] was given no alternatives to choose between.
    #[error("choice requires at least one alternative")]
    EmptyChoice,
    /// A [`crate::Ref`] was set a second time.
    #[error("parser reference `{name}` has already been set")]
    AlreadySet {
        /// The name of the reference.
        name: String,
    },
    /// A [`crate::Ref`] was applied to input before being set.
    #[error("parser reference `{name}` was used before being set")]
    Unset {
        /// The name of the reference.
        name: String,
    },
}
