//! Text-specific parsers and utilities.
//!
//! *“Ford!" he said, "there's an infinite number of monkeys outside who want to talk to us about this script for
//! Hamlet they've worked out.”*
//!
//! The parsers in this module work on inputs of [`char`]s, such as those produced from a [`&str`](str) or a
//! [`String`]. Character classes follow the Unicode definitions used by [`char`]'s own methods, except for [`digit`]
//! and the numeric parsers built on it, which only accept ASCII digits.

use super::*;

/// A parser that accepts exactly the character `c`.
///
/// This is [`just`] specialised to characters.
pub fn chr(c: char) -> Parser<char, char> {
    just(c)
}

/// A parser that accepts a single character satisfying `predicate`, described as `expected` in errors.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let hex = text::char_where("hex digit", |c| c.is_ascii_hexdigit());
///
/// assert_eq!(hex.parse("f").into_result(), Ok('f'));
/// assert_eq!(hex.parse("g").into_result().unwrap_err().to_string(), "expected hex digit, found 'g' at position 0");
/// ```
pub fn char_where<F>(expected: impl Into<String>, predicate: F) -> Parser<char, char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    satisfy(expected, move |c: &char| predicate(*c))
}

/// A parser that accepts a single ASCII digit.
pub fn digit() -> Parser<char, char> {
    char_where("digit", |c| c.is_ascii_digit())
}

/// A parser that accepts a single alphabetic character.
pub fn letter() -> Parser<char, char> {
    char_where("letter", char::is_alphabetic)
}

/// A parser that accepts a single alphanumeric character.
pub fn alpha_num() -> Parser<char, char> {
    char_where("letter or digit", char::is_alphanumeric)
}

/// A parser that accepts a single whitespace character.
///
/// To skip any amount of whitespace, use [`space`] or [`Parser::padded`].
pub fn whitespace() -> Parser<char, char> {
    char_where("whitespace", char::is_whitespace)
}

/// A parser that accepts one or more whitespace characters, yielding them.
pub fn space() -> Parser<char, String> {
    whitespace().many1().collect()
}

/// A parser that accepts one or more letters, yielding them.
pub fn word() -> Parser<char, String> {
    letter().many1().collect()
}

/// A parser that accepts an unsigned decimal number.
///
/// Numbers too large to fit in an [`i64`] are rejected at the position where they start.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let num = text::number();
///
/// assert_eq!(num.parse("1452").into_result(), Ok(1452));
/// assert_eq!(num.parse("007").into_result(), Ok(7));
/// assert!(num.parse("-1").is_failure());
/// assert!(num.parse("99999999999999999999").is_failure());
/// ```
pub fn number() -> Parser<char, i64> {
    digit()
        .many1()
        .collect::<String>()
        .try_map(|digits| digits.parse::<i64>())
        .labelled("number")
}

/// A parser that accepts a decimal integer with an optional leading `+` or `-` sign.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let int = text::integer();
///
/// assert_eq!(int.parse("42").into_result(), Ok(42));
/// assert_eq!(int.parse("+42").into_result(), Ok(42));
/// assert_eq!(int.parse("-42").into_result(), Ok(-42));
/// assert_eq!(int.parse("-9223372036854775808").into_result(), Ok(i64::MIN));
/// ```
pub fn integer() -> Parser<char, i64> {
    let sign = chr('+').or(chr('-')).optional();
    sign.then(digit().many1().collect::<String>())
        .try_map(|(sign, digits)| match sign {
            Some('-') => format!("-{}", digits).parse::<i64>(),
            _ => digits.parse::<i64>(),
        })
        .labelled("integer")
}

/// A parser that accepts exactly the characters of `s`, yielding them as a [`String`].
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let hello = text::string("hello");
///
/// assert_eq!(hello.parse("hello world").into_result(), Ok("hello".to_string()));
/// assert_eq!(hello.parse("help").into_result().unwrap_err().position(), 3);
/// ```
pub fn string(s: &str) -> Parser<char, String> {
    sequence(s.chars().map(chr)).collect()
}

/// A parser that accepts an identifier.
///
/// An identifier starts with a character with the Unicode `XID_Start` property or an underscore, followed by any
/// number of characters with the `XID_Continue` property.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let ident = text::ident();
///
/// assert_eq!(ident.parse("_foo1 bar").into_result(), Ok("_foo1".to_string()));
/// assert_eq!(ident.parse("größe").into_result(), Ok("größe".to_string()));
/// assert!(ident.parse("1abc").is_failure());
/// ```
pub fn ident() -> Parser<char, String> {
    let start = char_where("identifier", |c| c == '_' || unicode_ident::is_xid_start(c));
    let rest = char_where("identifier character", unicode_ident::is_xid_continue).many();
    start
        .then(rest)
        .map(|(first, rest)| std::iter::once(first).chain(rest).collect())
}

/// Like [`ident`], but only accepts exactly the identifier `keyword`.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let def = text::keyword("def");
///
/// // Exactly 'def' was found
/// assert!(def.parse("def").is_success());
/// // Exactly 'def' was found, with non-identifier trailing characters
/// assert!(def.parse("def(foo, bar)").is_success());
/// // 'def' was found, but only as part of a larger identifier, so this fails to parse
/// assert!(def.parse("define").is_failure());
/// ```
pub fn keyword(keyword: &str) -> Parser<char, ()> {
    let expected = format!("keyword `{}`", keyword);
    let keyword = keyword.to_string();
    ident()
        .try_map(move |s| {
            if s == keyword {
                Ok(())
            } else {
                Err(format!("expected {}, found `{}`", expected, s))
            }
        })
}

impl<A: 'static> Parser<char, A> {
    /// Parse this pattern, ignoring any amount of whitespace both before and after it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let ident = text::ident().padded();
    ///
    /// // A pattern with no whitespace surrounding it is accepted
    /// assert_eq!(ident.parse("hello").into_result(), Ok("hello".to_string()));
    /// // A pattern with arbitrary whitespace surrounding it is also accepted
    /// assert_eq!(ident.parse(" \t \n  \t   world  \t  ").into_result(), Ok("world".to_string()));
    /// ```
    pub fn padded(self) -> Self {
        self.padded_by(whitespace().many())
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ErrorKind, prelude::*};

    #[test]
    fn digit_is_ascii_only() {
        assert!(text::digit().parse("٣").is_failure());
        assert_eq!(text::digit().parse("3").into_result(), Ok('3'));
    }

    #[test]
    fn number_overflow_is_custom_error() {
        let err = text::number().parse("99999999999999999999").into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Custom);
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn number_is_labelled() {
        let err = text::number().parse("x").into_result().unwrap_err();
        assert_eq!(err.to_string(), "expected number, found 'x' at position 0");
    }

    #[test]
    fn integer_signs() {
        let int = text::integer().then_ignore(eof());
        assert_eq!(int.parse("-0").into_result(), Ok(0));
        assert!(int.parse("--1").is_failure());
        assert!(int.parse("+").is_failure());
    }

    #[test]
    fn space_and_word() {
        let p = text::word().then_ignore(text::space()).then(text::word());
        assert_eq!(
            p.parse("hello \t world").into_result(),
            Ok(("hello".to_string(), "world".to_string()))
        );
        assert!(p.parse("helloworld").is_failure());
    }

    #[test]
    fn padded_accepts_no_padding() {
        let p = text::chr('x').padded();
        let res = p.parse("x");
        assert_eq!(res.position().position(), 1);
        assert!(!p.accepts_empty());
    }

    #[test]
    fn keyword_rejects_other_identifiers() {
        let err = text::keyword("let").parse("lettuce").into_result().unwrap_err();
        assert_eq!(err.to_string(), "expected keyword `let`, found `lettuce` at position 0");
    }
}
