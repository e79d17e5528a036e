//! Parser primitives that accept specific token patterns.
//!
//! *“These creatures you call mice, you see, they are not quite as they appear.”*
//!
//! Everything else in the crate is built on top of these. Most of them inspect at most one token.

use super::*;

/// A parser that always succeeds with `value`, consuming nothing.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let answer = pure::<char, _>(42);
///
/// assert_eq!(answer.parse("").into_result(), Ok(42));
/// assert_eq!(answer.parse("xyz").position().position(), 0);
/// ```
pub fn pure<I, A>(value: A) -> Parser<I, A>
where
    I: Clone + 'static,
    A: Clone + Send + Sync + 'static,
{
    Parser::constant(true, move |_, input| {
        Trampoline::done(ParseResult::success(value.clone(), input))
    })
}

/// A parser that always fails with `message` at the current position.
///
/// It counts as accepting empty input, so it does not prevent an enclosing parser from doing so.
pub fn fail<I, A>(message: impl Into<String>) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
{
    let message: Arc<str> = message.into().into();
    Parser::constant(true, move |_, input: Input<I>| {
        let error = ParseError::custom(input.position(), &*message);
        Trampoline::done(ParseResult::failure(input, error))
    })
}

/// A parser that accepts only the end of input.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let a = just('a').then_ignore(eof());
///
/// assert!(a.parse("a").is_success());
/// assert!(a.parse("ab").is_failure());
/// ```
pub fn eof<I>() -> Parser<I, ()>
where
    I: Clone + fmt::Debug + 'static,
{
    Parser::constant(true, |_, input: Input<I>| {
        let res = match input.current() {
            None => ParseResult::success((), input),
            Some(tok) => {
                let error = ParseError::unexpected(input.position(), "end of input", format!("{:?}", tok));
                ParseResult::failure(input, error)
            }
        };
        Trampoline::done(res)
    })
}

/// A parser that accepts a single token satisfying `predicate`.
///
/// At the end of input, it fails with an [`ErrorKind::EndOfInput`] error. Otherwise, if the predicate rejects the
/// token, it fails without consuming anything, reporting `expected` as the pattern it was looking for.
///
/// # Examples
///
/// ```
/// # use bounce::{prelude::*, error::ErrorKind};
/// let vowel = satisfy("vowel", |c: &char| "aeiou".contains(*c));
///
/// assert_eq!(vowel.parse("e").into_result(), Ok('e'));
/// assert_eq!(vowel.parse("x").into_result().unwrap_err().to_string(), "expected vowel, found 'x' at position 0");
/// assert_eq!(vowel.parse("").into_result().unwrap_err().kind(), ErrorKind::EndOfInput);
/// ```
pub fn satisfy<I, F>(expected: impl Into<String>, predicate: F) -> Parser<I, I>
where
    I: Clone + fmt::Debug + 'static,
    F: Fn(&I) -> bool + Send + Sync + 'static,
{
    let expected: Arc<str> = expected.into().into();
    Parser::constant(false, move |_, input: Input<I>| {
        let res = match input.current() {
            None => {
                let error = ParseError::end_of_input(input.position(), &*expected);
                ParseResult::failure(input, error)
            }
            Some(tok) if predicate(tok) => ParseResult::success(tok.clone(), input.next()),
            Some(tok) => {
                let error = ParseError::unexpected(input.position(), &*expected, format!("{:?}", tok));
                ParseResult::failure(input, error)
            }
        };
        Trampoline::done(res)
    })
}

/// A parser that accepts any single token.
pub fn any<I>() -> Parser<I, I>
where
    I: Clone + fmt::Debug + 'static,
{
    satisfy("any token", |_| true)
}

/// A parser that accepts only the given token.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let question = just('?');
///
/// assert_eq!(question.parse("?").into_result(), Ok('?'));
/// assert!(question.parse("!").is_failure());
/// // This works because parsers do not eagerly consume input, so the '!' is not parsed
/// assert_eq!(question.parse("?!").into_result(), Ok('?'));
/// // This fails because the parser expects an end to the input after the '?'
/// assert!(question.then(eof()).parse("?!").is_failure());
/// ```
pub fn just<I>(token: I) -> Parser<I, I>
where
    I: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    let expected = format!("{:?}", token);
    satisfy(expected, move |tok| *tok == token)
}

/// A parser that accepts any one of the given tokens.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let digits = one_of("0123456789".chars())
///     .many1()
///     .then_ignore(eof())
///     .collect::<String>();
///
/// assert_eq!(digits.parse("48791").into_result(), Ok("48791".to_string()));
/// assert!(digits.parse("421!53").is_failure());
/// ```
pub fn one_of<I>(tokens: impl IntoIterator<Item = I>) -> Parser<I, I>
where
    I: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    let tokens: Vec<I> = tokens.into_iter().collect();
    let expected = tokens.iter().map(|tok| format!("{:?}", tok)).collect::<Vec<_>>();
    Parser::constant(false, move |_, input: Input<I>| {
        let res = match input.current() {
            Some(tok) if tokens.contains(tok) => ParseResult::success(tok.clone(), input.next()),
            found => {
                let found = found.map(|tok| format!("{:?}", tok));
                let error = ParseError::expected_found(input.position(), expected.clone(), found);
                ParseResult::failure(input, error)
            }
        };
        Trampoline::done(res)
    })
}

/// A parser that accepts any token except the given ones.
pub fn none_of<I>(tokens: impl IntoIterator<Item = I>) -> Parser<I, I>
where
    I: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    let tokens: Vec<I> = tokens.into_iter().collect();
    let expected = format!("any token except {:?}", tokens);
    satisfy(expected, move |tok| !tokens.contains(tok))
}

#[cfg(test)]
mod tests {
    use crate::{error::ErrorKind, prelude::*};

    #[test]
    fn satisfy_at_eof() {
        let input = Input::from("a").next();
        let res = any::<char>().parse(input.clone());
        assert_eq!(res.position(), &input);
        let err = res.into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfInput);
        assert_eq!(err.to_string(), "expected any token, found end of input at position 1");
    }

    #[test]
    fn satisfy_does_not_consume_on_mismatch() {
        let input = Input::from("b");
        let res = just('a').parse(input.clone());
        assert_eq!(res.position(), &input);
        assert_eq!(res.error().map(ParseError::kind), Some(ErrorKind::Unexpected));
    }

    #[test]
    fn fail_uses_message() {
        let err = fail::<char, ()>("nope").parse("abc").into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Custom);
        assert_eq!(err.to_string(), "nope at position 0");
    }

    #[test]
    fn one_of_lists_alternatives() {
        let err = one_of(['x', 'y']).parse("z").into_result().unwrap_err();
        assert_eq!(err.to_string(), "expected one of: 'x', 'y', found 'z' at position 0");
        let err = one_of(['x', 'y']).parse("").into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EndOfInput);
    }

    #[test]
    fn none_of_rejects_listed() {
        let p = none_of([',', ';']).many().collect::<String>();
        assert_eq!(p.parse("ab;c").into_result(), Ok("ab".to_string()));
    }

    #[test]
    fn generic_tokens() {
        #[derive(Clone, Debug, PartialEq)]
        enum Token {
            Num(i64),
            Plus,
        }

        let num = satisfy("number", |t: &Token| matches!(t, Token::Num(_)));
        let sum = num.clone().then_ignore(just(Token::Plus)).then(num);
        let toks = vec![Token::Num(1), Token::Plus, Token::Num(2)];
        assert_eq!(sum.parse(toks).into_result(), Ok((Token::Num(1), Token::Num(2))));
    }
}
