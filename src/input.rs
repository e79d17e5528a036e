//! Token inputs and the cursors that walk over them.
//!
//! An [`Input`] is an immutable position within a shared, immutable sequence of tokens. Advancing a cursor never
//! touches the tokens themselves: [`Input::next`] simply produces a new cursor that points one token further along.
//! Cursors are therefore cheap to clone and can be held onto freely (by [`crate::ParseResult`], for example) without
//! any concern for aliasing.

use std::{fmt, io, sync::Arc};

/// A cursor over a sequence of tokens of type `I`.
///
/// Two cursors are equal when they share the same backing storage and sit at the same position.
///
/// # Examples
///
/// ```
/// # use bounce::Input;
/// let start = Input::from("ab");
/// assert_eq!(start.current(), Some(&'a'));
///
/// let next = start.next();
/// assert_eq!(next.current(), Some(&'b'));
/// assert!(next.next().is_eof());
///
/// // Advancing produced a new cursor, the original is untouched
/// assert_eq!(start.position(), 0);
/// ```
pub struct Input<I> {
    tokens: Arc<[I]>,
    pos: usize,
}

impl<I> Input<I> {
    /// Create a cursor at the start of the given sequence of tokens.
    pub fn of(tokens: impl Into<Arc<[I]>>) -> Self {
        Self {
            tokens: tokens.into(),
            pos: 0,
        }
    }

    /// Returns `true` if the cursor has moved past the last token.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The token under the cursor, or `None` at the end of input.
    pub fn current(&self) -> Option<&I> {
        self.tokens.get(self.pos)
    }

    /// A cursor one token further along the same input.
    ///
    /// Advancing a cursor that is already at the end of input yields another end-of-input cursor.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            pos: (self.pos + 1).min(self.tokens.len()),
        }
    }

    /// The offset of this cursor, in tokens, from the start of the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The total number of tokens in the input, irrespective of the cursor's position.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the underlying input contains no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The tokens that have not yet been consumed.
    pub fn remaining(&self) -> &[I] {
        &self.tokens[self.pos..]
    }

    /// Returns `true` if both cursors walk the same backing storage.
    pub fn same_source(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tokens, &other.tokens)
    }
}

impl Input<char> {
    /// Read the whole of `reader` as UTF-8 text and create a cursor over its characters.
    ///
    /// The reader is drained eagerly: parsing always happens over fully materialised input.
    pub fn from_reader<R: io::Read>(mut reader: R) -> io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::from(text))
    }
}

impl<I> Clone for Input<I> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            pos: self.pos,
        }
    }
}

impl<I> PartialEq for Input<I> {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos && self.same_source(other)
    }
}

impl<I> Eq for Input<I> {}

impl<I: fmt::Debug> fmt::Debug for Input<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("position", &self.pos)
            .field("current", &self.current())
            .finish()
    }
}

impl<I: fmt::Debug> fmt::Display for Input<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current() {
            Some(tok) => write!(f, "{:?} at position {}", tok, self.pos),
            None => write!(f, "EOF at position {}", self.pos),
        }
    }
}

impl From<&str> for Input<char> {
    fn from(s: &str) -> Self {
        Self::of(s.chars().collect::<Vec<_>>())
    }
}

impl From<String> for Input<char> {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl<I> From<Vec<I>> for Input<I> {
    fn from(tokens: Vec<I>) -> Self {
        Self::of(tokens)
    }
}

impl<I: Clone> From<&[I]> for Input<I> {
    fn from(tokens: &[I]) -> Self {
        Self::of(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_does_not_move_original() {
        let input = Input::from("xyz");
        let second = input.next().next();
        assert_eq!(input.position(), 0);
        assert_eq!(second.current(), Some(&'z'));
        assert_eq!(second.remaining(), &['z']);
    }

    #[test]
    fn eof_has_no_current_token() {
        let input = Input::from("a").next();
        assert!(input.is_eof());
        assert_eq!(input.current(), None);
        assert_eq!(input.next().position(), 1);
    }

    #[test]
    fn equality_needs_same_storage() {
        let a = Input::from("ab");
        let b = Input::from("ab");
        assert_eq!(a.next(), a.next());
        assert_ne!(a, b);
    }

    #[test]
    fn reader_input() {
        let input = Input::from_reader("héllo".as_bytes()).unwrap();
        assert_eq!(input.len(), 5);
        assert_eq!(input.next().current(), Some(&'é'));
    }

    #[test]
    fn display_shows_token_or_eof() {
        let input = Input::from(vec![1u8]);
        assert_eq!(input.to_string(), "1 at position 0");
        assert_eq!(input.next().to_string(), "EOF at position 1");
    }
}
