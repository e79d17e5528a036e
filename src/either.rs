//! A choice between two parsers with differing output types, yielding an [`Either`].
//!
//! Only available with the `either` feature.

use super::*;

use ::either::Either;

/// Parse with `left` or, if it fails, with `right`, recording which of the two matched.
///
/// This behaves exactly like [`or`], including its error reporting, except that the alternatives need not produce
/// the same type.
///
/// # Examples
///
/// ```
/// # use bounce::{prelude::*, either::either};
/// use ::either::Either;
///
/// let atom = either(text::number(), text::word());
///
/// assert_eq!(atom.parse("42").into_result(), Ok(Either::Left(42)));
/// assert_eq!(atom.parse("abc").into_result(), Ok(Either::Right("abc".to_string())));
/// ```
pub fn either<I, A, B>(left: Parser<I, A>, right: Parser<I, B>) -> Parser<I, Either<A, B>>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
{
    or(left.map(Either::Left), right.map(Either::Right))
}

impl<I: Clone + 'static, A: 'static> Parser<I, A> {
    /// Parse with this parser or, if it fails, with `other`, which may produce a different type.
    ///
    /// See [`either()`].
    pub fn or_either<B: 'static>(self, other: Parser<I, B>) -> Parser<I, Either<A, B>> {
        either(self, other)
    }
}
