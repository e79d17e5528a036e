//! Combinators that allow combining and extending existing parsers.
//!
//! Every combinator here exists both as a free function and, where it reads naturally, as a method on [`Parser`].
//! Each one derives its accepts-empty flag from those of its children, and applies its children through the
//! [`Trampoline`], never by direct recursion.

use super::*;

/// Parse with `first` or, if it fails, with `second` against the same input.
///
/// Alternation is ordered: if `first` succeeds, `second` is never tried. A fatal error from `first` is propagated
/// without trying `second`. When both fail, the error that got furthest into the input is kept, and errors at the same
/// position are merged.
pub fn or<I, A>(first: Parser<I, A>, second: Parser<I, A>) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
{
    let (a, b) = (first.clone(), second.clone());
    Parser::new(
        move || either_empty(&a, &b),
        move |ctx, input| {
            let second = second.clone();
            let ctx2 = ctx.clone();
            first.apply(ctx, input.clone()).flat_map(move |res| match res {
                ParseResult::Failure {
                    position: pos1,
                    error: err1,
                } if !err1.is_fatal() => second.apply(&ctx2, input).map(move |res| match res {
                    ParseResult::Failure {
                        position: pos2,
                        error: err2,
                    } if !err2.is_fatal() => {
                        let position = if err2.position() > err1.position() { pos2 } else { pos1 };
                        ParseResult::failure(position, err1.merge(err2))
                    }
                    res => res,
                }),
                res => Trampoline::done(res),
            })
        },
    )
}

/// Try each parser in turn, yielding the output of the first to succeed.
///
/// This is a left-to-right reduction with [`or`]. A choice between no alternatives is a malformed grammar.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let op = choice(vec![just('+'), just('-'), just('*')]).unwrap();
///
/// assert_eq!(op.parse("*").into_result(), Ok('*'));
/// assert_eq!(
///     op.parse("/").into_result().unwrap_err().to_string(),
///     "expected one of: '+', '-', '*', found '/' at position 0",
/// );
///
/// assert_eq!(choice(Vec::<Parser<char, char>>::new()).unwrap_err(), GrammarError::EmptyChoice);
/// ```
pub fn choice<I, A>(parsers: impl IntoIterator<Item = Parser<I, A>>) -> Result<Parser<I, A>, GrammarError>
where
    I: Clone + 'static,
    A: 'static,
{
    parsers.into_iter().reduce(or).ok_or(GrammarError::EmptyChoice)
}

/// Parse with `first` and then with `second` from where `first` stopped, yielding both outputs.
///
/// If `first` fails, `second` is never applied and the failure is propagated. If `second` fails, its failure is
/// propagated even though `first` consumed input.
pub fn and<I, A, B>(first: Parser<I, A>, second: Parser<I, B>) -> Parser<I, (A, B)>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
{
    let (a, b) = (first.clone(), second.clone());
    Parser::new(
        move || both_empty(&a, &b),
        move |ctx, input| {
            let second = second.clone();
            let ctx = ctx.clone();
            first.apply(&ctx, input).flat_map(move |res| match res.cast() {
                Ok((x, next)) => second.apply(&ctx, next).map(move |res| res.map(move |y| (x, y))),
                Err(failure) => Trampoline::done(failure),
            })
        },
    )
}

/// Parse every parser in order, collecting their outputs.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let abc = sequence(vec![just('a'), just('b'), just('c')]).collect::<String>();
///
/// assert_eq!(abc.parse("abcd").into_result(), Ok("abc".to_string()));
/// assert!(abc.parse("abd").is_failure());
/// ```
pub fn sequence<I, A>(parsers: impl IntoIterator<Item = Parser<I, A>>) -> Parser<I, IList<A>>
where
    I: Clone + 'static,
    A: 'static,
{
    let parsers: Arc<[Parser<I, A>]> = parsers.into_iter().collect();
    let all = parsers.clone();
    Parser::new(
        move || all_empty(all.clone(), 0),
        move |ctx, input| run_sequence(parsers.clone(), 0, ctx.clone(), input, IList::new()),
    )
}

fn all_empty<I, A>(parsers: Arc<[Parser<I, A>]>, index: usize) -> Trampoline<bool>
where
    I: Clone + 'static,
    A: 'static,
{
    let Some(parser) = parsers.get(index) else {
        return Trampoline::done(true);
    };
    parser.emptiness().flat_map(move |empty| {
        if empty {
            all_empty(parsers, index + 1)
        } else {
            Trampoline::done(false)
        }
    })
}

fn run_sequence<I, A>(
    parsers: Arc<[Parser<I, A>]>,
    index: usize,
    ctx: Context,
    input: Input<I>,
    acc: IList<A>,
) -> Trampoline<ParseResult<I, IList<A>>>
where
    I: Clone + 'static,
    A: 'static,
{
    let Some(parser) = parsers.get(index) else {
        return Trampoline::done(ParseResult::success(acc, input));
    };
    parser.apply(&ctx, input).flat_map(move |res| match res.cast() {
        Ok((value, next)) => run_sequence(parsers, index + 1, ctx, next, acc.add(value)),
        Err(failure) => Trampoline::done(failure),
    })
}

pub(crate) fn map<I, A, B, F>(parser: Parser<I, A>, f: F) -> Parser<I, B>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
    F: Fn(A) -> B + Send + Sync + 'static,
{
    let p = parser.clone();
    let f = Arc::new(f);
    Parser::new(
        move || p.emptiness(),
        move |ctx, input| {
            let f = f.clone();
            parser.apply(ctx, input).map(move |res| res.map(|a| f(a)))
        },
    )
}

pub(crate) fn try_map<I, A, B, E, F>(parser: Parser<I, A>, f: F) -> Parser<I, B>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
    E: fmt::Display,
    F: Fn(A) -> Result<B, E> + Send + Sync + 'static,
{
    let p = parser.clone();
    let f = Arc::new(f);
    Parser::new(
        move || p.emptiness(),
        move |ctx, input| {
            let f = f.clone();
            let start = input.clone();
            parser.apply(ctx, input).map(move |res| match res.cast() {
                Ok((value, next)) => match f(value) {
                    Ok(out) => ParseResult::success(out, next),
                    Err(err) => {
                        let error = ParseError::custom(start.position(), err.to_string());
                        ParseResult::failure(start, error)
                    }
                },
                Err(failure) => failure,
            })
        },
    )
}

pub(crate) fn labelled<I, A>(parser: Parser<I, A>, label: String) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
{
    let p = parser.clone();
    let label: Arc<str> = label.into();
    Parser::new(
        move || p.emptiness(),
        move |ctx, input| {
            let label = label.clone();
            let start = input.position();
            parser.apply(ctx, input).map(move |res| match res {
                ParseResult::Failure { position, error } if error.position() == start && !error.is_fatal() => {
                    ParseResult::failure(position, error.with_label(&*label))
                }
                res => res,
            })
        },
    )
}

/// Attach a contextual note to every failure of `parser`.
fn in_context<I, A>(parser: Parser<I, A>, note: &'static str) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
{
    let p = parser.clone();
    Parser::new(
        move || p.emptiness(),
        move |ctx, input| {
            parser.apply(ctx, input).map(move |res| match res {
                ParseResult::Failure { position, error } => ParseResult::failure(position, error.with_context(note)),
                res => res,
            })
        },
    )
}

/// Parse `parser` any number of times, including zero, collecting the outputs.
///
/// Repetition ends at the first failure of `parser`; that failed attempt is discarded and the cursor is left after
/// the last successful iteration. Only a fatal failure is propagated.
///
/// An iteration that succeeds without consuming input also ends the repetition (its output is kept): repeating it at
/// the same position could never terminate.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let letters = many(text::letter()).collect::<String>();
///
/// assert_eq!(letters.parse("abc123").into_result(), Ok("abc".to_string()));
/// assert_eq!(letters.parse("123").into_result(), Ok(String::new()));
/// ```
pub fn many<I, A>(parser: Parser<I, A>) -> Parser<I, IList<A>>
where
    I: Clone + 'static,
    A: 'static,
{
    Parser::constant(true, move |ctx, input| {
        repeat(parser.clone(), ctx.clone(), input, IList::new())
    })
}

fn repeat<I, A>(parser: Parser<I, A>, ctx: Context, input: Input<I>, acc: IList<A>) -> Trampoline<ParseResult<I, IList<A>>>
where
    I: Clone + 'static,
    A: 'static,
{
    parser.apply(&ctx, input.clone()).flat_map(move |res| match res {
        ParseResult::Success { value, next } => {
            let acc = acc.add(value);
            if next.position() == input.position() {
                if parser.accepts_empty() {
                    log::debug!("repetition matched zero tokens at position {}; stopping", input.position());
                } else {
                    log::warn!(
                        "parser that does not accept empty input matched zero tokens at position {}",
                        input.position()
                    );
                }
                Trampoline::done(ParseResult::success(acc, next))
            } else {
                repeat(parser, ctx, next, acc)
            }
        }
        ParseResult::Failure { position, error } if error.is_fatal() => {
            Trampoline::done(ParseResult::failure(position, error))
        }
        ParseResult::Failure { .. } => Trampoline::done(ParseResult::success(acc, input)),
    })
}

/// Parse `parser` at least once, collecting the outputs.
///
/// This is `parser` followed by [`many`] of `parser`; it fails if the first application fails.
pub fn many1<I, A>(parser: Parser<I, A>) -> Parser<I, IList<A>>
where
    I: Clone + 'static,
    A: 'static,
{
    and(parser.clone(), many(parser)).map(|(first, rest)| IList::of(first).concat(rest))
}

/// Attempt to parse `parser`, yielding `None` and consuming nothing if it fails.
pub fn optional<I, A>(parser: Parser<I, A>) -> Parser<I, Option<A>>
where
    I: Clone + 'static,
    A: 'static,
{
    Parser::constant(true, move |ctx, input| {
        parser.apply(ctx, input.clone()).map(move |res| match res {
            ParseResult::Success { value, next } => ParseResult::success(Some(value), next),
            ParseResult::Failure { position, error } if error.is_fatal() => ParseResult::failure(position, error),
            ParseResult::Failure { .. } => ParseResult::success(None, input),
        })
    })
}

/// Parse at least one `parser`, separated by `separator`.
///
/// A separator that is not followed by another `parser` is not consumed.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let list = sep_by1(text::digit(), just(',')).collect::<String>().then(just(','));
///
/// // The trailing separator is left for the next parser
/// assert_eq!(list.parse("1,2,3,").into_result(), Ok(("123".to_string(), ',')));
/// ```
pub fn sep_by1<I, A, B>(parser: Parser<I, A>, separator: Parser<I, B>) -> Parser<I, IList<A>>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
{
    let rest = many(separator.ignore_then(parser.clone()));
    and(parser, rest).map(|(first, rest)| IList::of(first).concat(rest))
}

/// Parse any number of `parser`, separated by `separator`.
pub fn sep_by<I, A, B>(parser: Parser<I, A>, separator: Parser<I, B>) -> Parser<I, IList<A>>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
{
    optional(sep_by1(parser, separator)).map(Option::unwrap_or_default)
}

/// Parse `open`, then `content`, then `close`, yielding only the output of `content`.
///
/// Failures are annotated with the part that failed: `opening delimiter`, `content` or `closing delimiter`.
pub fn between<I, A, B, C>(open: Parser<I, B>, close: Parser<I, C>, content: Parser<I, A>) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
    C: 'static,
{
    let open = in_context(open, "opening delimiter");
    let content = in_context(content, "content");
    let close = in_context(close, "closing delimiter");
    and(and(open, content), close).map(|((_, content), _)| content)
}

/// Parse one or more `operand`s separated by `op`, folding them left-associatively.
///
/// `1-2-3` is evaluated as `(1-2)-3`.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let sub = just('-').to((|a: i64, b: i64| a - b) as fn(i64, i64) -> i64);
/// let expr = chainl1(text::number(), sub);
///
/// assert_eq!(expr.parse("9-3-2").into_result(), Ok(4));
/// ```
pub fn chainl1<I, A, F>(operand: Parser<I, A>, op: Parser<I, F>) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
    F: Fn(A, A) -> A + 'static,
{
    let rest = many(and(op, operand.clone()));
    and(operand, rest).map(|(first, rest)| rest.into_iter().fold(first, |lhs, (f, rhs)| f(lhs, rhs)))
}

/// Parse one or more `operand`s separated by `op`, folding them right-associatively.
///
/// `1-2-3` is evaluated as `1-(2-3)`.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let sub = just('-').to((|a: i64, b: i64| a - b) as fn(i64, i64) -> i64);
/// let expr = chainr1(text::number(), sub);
///
/// assert_eq!(expr.parse("9-3-2").into_result(), Ok(8));
/// ```
pub fn chainr1<I, A, F>(operand: Parser<I, A>, op: Parser<I, F>) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
    F: Fn(A, A) -> A + 'static,
{
    let rest = many(and(op, operand.clone()));
    and(operand, rest).map(|(first, rest)| {
        let (ops, operands): (Vec<F>, Vec<A>) = rest.into_iter().unzip();
        // Shift operands so each operator is paired with its left-hand side
        let mut lhs = Vec::with_capacity(ops.len());
        let mut last = first;
        for operand in operands {
            lhs.push(std::mem::replace(&mut last, operand));
        }
        ops.into_iter().zip(lhs).rev().fold(last, |rhs, (f, lhs)| f(lhs, rhs))
    })
}

/// Like [`chainl1`], but yielding `seed` instead of failing when no operand is present.
pub fn chainl<I, A, F>(operand: Parser<I, A>, op: Parser<I, F>, seed: A) -> Parser<I, A>
where
    I: Clone + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn(A, A) -> A + 'static,
{
    or(chainl1(operand, op), pure(seed))
}

/// Like [`chainr1`], but yielding `seed` instead of failing when no operand is present.
pub fn chainr<I, A, F>(operand: Parser<I, A>, op: Parser<I, F>, seed: A) -> Parser<I, A>
where
    I: Clone + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn(A, A) -> A + 'static,
{
    or(chainr1(operand, op), pure(seed))
}

/// Succeed without consuming input if, and only if, `parser` fails here.
///
/// This is a zero-width negative lookahead.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let keyword = text::string("let").then_ignore(not(text::alpha_num()));
///
/// assert!(keyword.parse("let x").is_success());
/// assert!(keyword.parse("letter").is_failure());
/// ```
pub fn not<I, A>(parser: Parser<I, A>) -> Parser<I, ()>
where
    I: Clone + 'static,
    A: 'static,
{
    Parser::constant(true, move |ctx, input| {
        parser.apply(ctx, input.clone()).map(move |res| match res {
            ParseResult::Success { .. } => {
                let error = ParseError::custom(input.position(), "matched a pattern that is not allowed here");
                ParseResult::failure(input, error)
            }
            ParseResult::Failure { position, error } if error.is_fatal() => ParseResult::failure(position, error),
            ParseResult::Failure { .. } => ParseResult::success((), input),
        })
    })
}
