//! The outcome of applying a parser to an input.

use super::*;

/// The result of applying a [`Parser`] to an [`Input`].
///
/// On success, the result holds the produced value and the cursor just past the consumed tokens. On failure, it holds
/// the cursor at which the failure occurred and an error describing it.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseResult<I, A> {
    /// The parser matched.
    Success {
        /// The value produced by the parser.
        value: A,
        /// The cursor immediately after the tokens that were consumed.
        next: Input<I>,
    },
    /// The parser did not match.
    Failure {
        /// The cursor at which the failure occurred.
        position: Input<I>,
        /// Why the input was rejected.
        error: ParseError,
    },
}

impl<I, A> ParseResult<I, A> {
    /// Create a successful result.
    pub fn success(value: A, next: Input<I>) -> Self {
        Self::Success { value, next }
    }

    /// Create a failed result.
    pub fn failure(position: Input<I>, error: ParseError) -> Self {
        Self::Failure { position, error }
    }

    /// Returns `true` if the parser matched.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns `true` if the parser did not match.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The produced value, if the parser matched.
    pub fn value(&self) -> Option<&A> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// The error, if the parser did not match.
    pub fn error(&self) -> Option<&ParseError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// The residual cursor, if the parser matched.
    pub fn next(&self) -> Option<&Input<I>> {
        match self {
            Self::Success { next, .. } => Some(next),
            Self::Failure { .. } => None,
        }
    }

    /// The cursor this result points at: after the match on success, at the failure otherwise.
    pub fn position(&self) -> &Input<I> {
        match self {
            Self::Success { next, .. } => next,
            Self::Failure { position, .. } => position,
        }
    }

    /// Convert into a standard [`Result`], discarding the cursors.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// assert_eq!(just('a').parse("a").into_result(), Ok('a'));
    ///
    /// let err = just('a').parse("").into_result().unwrap_err();
    /// assert_eq!(err.to_string(), "expected 'a', found end of input at position 0");
    /// ```
    pub fn into_result(self) -> Result<A, ParseError> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::Failure { error, .. } => Err(error),
        }
    }

    /// Consume the result with one of two functions, depending on its outcome.
    pub fn fold<R>(
        self,
        on_success: impl FnOnce(A, Input<I>) -> R,
        on_failure: impl FnOnce(Input<I>, ParseError) -> R,
    ) -> R {
        match self {
            Self::Success { value, next } => on_success(value, next),
            Self::Failure { position, error } => on_failure(position, error),
        }
    }

    /// Transform the value of a successful result. Failures are passed through untouched.
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> ParseResult<I, B> {
        match self {
            Self::Success { value, next } => ParseResult::Success {
                value: f(value),
                next,
            },
            Self::Failure { position, error } => ParseResult::Failure { position, error },
        }
    }

    /// Change the value type of a failed result. Returns the result unchanged on success.
    pub(crate) fn cast<B>(self) -> Result<(A, Input<I>), ParseResult<I, B>> {
        match self {
            Self::Success { value, next } => Ok((value, next)),
            Self::Failure { position, error } => Err(ParseResult::Failure { position, error }),
        }
    }
}
