#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod combinator;
pub mod container;
pub mod debug;
#[cfg(feature = "either")]
#[cfg_attr(docsrs, doc(cfg(feature = "either")))]
pub mod either;
pub mod error;
pub mod input;
pub mod primitive;
pub mod recursive;
pub mod result;
pub mod text;
pub mod trampoline;

pub use crate::{
    combinator::*,
    container::IList,
    error::{ErrorKind, GrammarError, ParseError},
    input::Input,
    primitive::*,
    recursive::{recursive, Ref},
    result::ParseResult,
    trampoline::Trampoline,
};

use crate::recursive::Context;

use hashbrown::HashMap;
use std::{
    cell::{Cell, RefCell},
    fmt, mem,
    sync::{Arc, OnceLock},
};

/// Commonly used functions, traits and types.
pub mod prelude {
    pub use super::{
        combinator::{
            and, between, chainl, chainl1, chainr, chainr1, choice, many, many1, not, optional, or, sep_by, sep_by1,
            sequence,
        },
        error::{GrammarError, ParseError},
        primitive::{any, eof, fail, just, none_of, one_of, pure, satisfy},
        recursive::{recursive, Ref},
        text, IList, Input, ParseResult, Parser,
    };
}

type ApplyFn<I, A> = dyn Fn(&Context, Input<I>) -> Trampoline<ParseResult<I, A>> + Send + Sync;
type EmptinessFn = dyn Fn() -> Trampoline<bool> + Send + Sync;

// Dropping a parser drops its children from inside its own frame
const DROP_RED_ZONE: usize = 32 * 1024;
const DROP_STACK_SIZE: usize = 1024 * 1024;

/// A grammar rule that parses tokens of type `I` into a value of type `A`.
///
/// Parsers are immutable values built out of smaller parsers by the combinators in this crate, either through the
/// methods on this type or through the free functions in [`combinator`] and [`primitive`]. Cloning a parser is cheap:
/// clones share the same underlying rule.
///
/// Applying a parser never mutates it, so a finished grammar may be shared between threads and used concurrently.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// let digit = satisfy("digit", |c: &char| c.is_ascii_digit());
/// let digits = digit.many1().collect::<String>();
///
/// assert_eq!(digits.parse("123abc").into_result(), Ok("123".to_string()));
/// assert!(digits.parse("abc").is_failure());
/// ```
pub struct Parser<I, A> {
    inner: Arc<Inner<I, A>>,
}

struct Inner<I, A> {
    // The memoised answer to "can this parser succeed without consuming any input?"
    accepts_empty: OnceLock<bool>,
    emptiness: Box<EmptinessFn>,
    apply: Box<ApplyFn<I, A>>,
}

impl<I, A> Drop for Inner<I, A> {
    fn drop(&mut self) {
        let emptiness = mem::replace(&mut self.emptiness, Box::new(|| -> Trampoline<bool> { unreachable!() }));
        let apply = mem::replace(
            &mut self.apply,
            Box::new(|_: &Context, _: Input<I>| -> Trampoline<ParseResult<I, A>> { unreachable!() }),
        );
        stacker::maybe_grow(DROP_RED_ZONE, DROP_STACK_SIZE, move || drop((emptiness, apply)));
    }
}

impl<I, A> Clone for Parser<I, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<I, A> fmt::Debug for Parser<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("accepts_empty", &self.inner.accepts_empty.get())
            .finish_non_exhaustive()
    }
}

thread_local! {
    // Emptiness queries currently being answered on this thread, by the depth at which they were entered
    static IN_PROGRESS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());
    static DEPTH: Cell<usize> = Cell::new(0);
    // The shallowest query that the current answer made an assumption about, or 0 for an unset rule
    static ASSUMED: Cell<usize> = Cell::new(usize::MAX);
}

/// Record that the emptiness answer being computed depends on a rule that has not been set yet.
pub(crate) fn mark_unsettled() {
    ASSUMED.with(|a| a.set(0));
}

/// Emptiness of `a` or of `b`, asking `b` only when `a` cannot be empty.
pub(crate) fn either_empty<I, A, B>(a: &Parser<I, A>, b: &Parser<I, B>) -> Trampoline<bool>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
{
    let b = b.clone();
    a.emptiness()
        .flat_map(move |empty| if empty { Trampoline::done(true) } else { b.emptiness() })
}

/// Emptiness of `a` followed by `b`, asking `b` only when `a` can be empty.
pub(crate) fn both_empty<I, A, B>(a: &Parser<I, A>, b: &Parser<I, B>) -> Trampoline<bool>
where
    I: Clone + 'static,
    A: 'static,
    B: 'static,
{
    let b = b.clone();
    a.emptiness()
        .flat_map(move |empty| if empty { b.emptiness() } else { Trampoline::done(false) })
}

impl<I: Clone + 'static, A: 'static> Parser<I, A> {
    /// Create a parser whose emptiness is derived from other parsers.
    ///
    /// `emptiness` must only ask its children through [`Parser::emptiness`], so that the query stays on the trampoline.
    pub(crate) fn new<E, F>(emptiness: E, apply: F) -> Self
    where
        E: Fn() -> Trampoline<bool> + Send + Sync + 'static,
        F: Fn(&Context, Input<I>) -> Trampoline<ParseResult<I, A>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                accepts_empty: OnceLock::new(),
                emptiness: Box::new(emptiness),
                apply: Box::new(apply),
            }),
        }
    }

    /// Create a parser whose emptiness is known up front.
    pub(crate) fn constant<F>(accepts_empty: bool, apply: F) -> Self
    where
        F: Fn(&Context, Input<I>) -> Trampoline<ParseResult<I, A>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                accepts_empty: OnceLock::from(accepts_empty),
                emptiness: Box::new(move || Trampoline::done(accepts_empty)),
                apply: Box::new(apply),
            }),
        }
    }

    /// Apply this parser at `input`.
    ///
    /// The application itself is deferred to the bounce loop, so a combinator calling into its children never nests
    /// host stack frames.
    pub(crate) fn apply(&self, ctx: &Context, input: Input<I>) -> Trampoline<ParseResult<I, A>> {
        let inner = self.inner.clone();
        let ctx = ctx.clone();
        Trampoline::more(move || (inner.apply)(&ctx, input))
    }

    /// The trampolined emptiness query behind [`Parser::accepts_empty`].
    ///
    /// A query that reaches a rule already being asked about on this thread assumes the least fixpoint (`false`) for
    /// it. Answers are remembered unless they depend on such an assumption about an outer rule, or on an unset
    /// [`Ref`]. The rule at the root of a cycle is remembered once its own query finishes.
    pub(crate) fn emptiness(&self) -> Trampoline<bool> {
        let inner = self.inner.clone();
        Trampoline::more(move || {
            if let Some(&known) = inner.accepts_empty.get() {
                return Trampoline::done(known);
            }

            let key = Arc::as_ptr(&inner) as *const () as usize;
            if let Some(active) = IN_PROGRESS.with(|map| map.borrow().get(&key).copied()) {
                ASSUMED.with(|a| a.set(a.get().min(active)));
                return Trampoline::done(false);
            }

            let depth = DEPTH.with(|d| {
                d.set(d.get() + 1);
                d.get()
            });
            IN_PROGRESS.with(|map| map.borrow_mut().insert(key, depth));
            let outer = ASSUMED.with(|a| a.replace(usize::MAX));

            (inner.emptiness)().map(move |accepts_empty| {
                IN_PROGRESS.with(|map| map.borrow_mut().remove(&key));
                DEPTH.with(|d| d.set(depth - 1));

                let assumed = ASSUMED.with(Cell::get);
                let pending = if assumed >= depth {
                    let _ = inner.accepts_empty.set(accepts_empty);
                    usize::MAX
                } else {
                    assumed
                };
                ASSUMED.with(|a| a.set(if depth == 1 { usize::MAX } else { outer.min(pending) }));
                accepts_empty
            })
        })
    }

    /// Returns `true` if this parser can succeed without consuming any input.
    ///
    /// The answer is computed on first request and remembered. For recursive grammars, a rule that can only reach
    /// itself without consuming input is assumed not to accept empty input, and a rule that refers to a [`Ref`] that
    /// has not yet been set is assumed not to accept empty input until it has been.
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// assert!(!just('a').accepts_empty());
    /// assert!(just('a').many().accepts_empty());
    /// assert!(just('a').or(pure('b')).accepts_empty());
    /// assert!(!just('a').then(pure('b')).accepts_empty());
    /// ```
    pub fn accepts_empty(&self) -> bool {
        self.emptiness().run()
    }

    /// Parse an input, producing either a value and the residual cursor or a failure.
    ///
    /// This drives the parser's [`Trampoline`] to completion, so the depth of the grammar and the length of the input
    /// have no bearing on how much of the host stack is used.
    ///
    /// Parsing does not require the whole input to be consumed; append [`eof`] for that.
    pub fn parse(&self, input: impl Into<Input<I>>) -> ParseResult<I, A> {
        let ctx = Context::default();
        self.apply(&ctx, input.into()).run()
    }

    /// Map the output of this parser to another value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let digit = satisfy("digit", |c: &char| c.is_ascii_digit()).map(|c| c.to_digit(10).unwrap_or(0));
    ///
    /// assert_eq!(digit.parse("7").into_result(), Ok(7));
    /// ```
    pub fn map<B: 'static, F>(self, f: F) -> Parser<I, B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        combinator::map(self, f)
    }

    /// Transform all outputs of this parser to a predetermined value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// #[derive(Clone, Debug, PartialEq)]
    /// enum Op { Add, Sub }
    ///
    /// let op = just('+').to(Op::Add).or(just('-').to(Op::Sub));
    ///
    /// assert_eq!(op.parse("-").into_result(), Ok(Op::Sub));
    /// ```
    pub fn to<B>(self, value: B) -> Parser<I, B>
    where
        B: Clone + Send + Sync + 'static,
    {
        combinator::map(self, move |_| value.clone())
    }

    /// After a successful parse, apply a fallible function to the output. If the function produces an error, treat it
    /// as a parse failure at the position where this parser started.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let byte = text::digit()
    ///     .many1()
    ///     .collect::<String>()
    ///     .try_map(|s| s.parse::<u8>());
    ///
    /// assert_eq!(byte.parse("255").into_result(), Ok(255));
    /// assert!(byte.parse("256").is_failure()); // Out of range
    /// ```
    pub fn try_map<B: 'static, E, F>(self, f: F) -> Parser<I, B>
    where
        E: fmt::Display,
        F: Fn(A) -> Result<B, E> + Send + Sync + 'static,
    {
        combinator::try_map(self, f)
    }

    /// Label the pattern parsed by this parser for more useful error messages.
    ///
    /// Errors raised where this parser started will report `label` as the expected pattern. Errors raised after the
    /// parser consumed some input are left untouched, since they describe a more specific problem.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let sign = just('+').or(just('-')).labelled("sign");
    ///
    /// let err = sign.parse("x").into_result().unwrap_err();
    /// assert_eq!(err.to_string(), "expected sign, found 'x' at position 0");
    /// ```
    pub fn labelled(self, label: impl Into<String>) -> Self {
        combinator::labelled(self, label.into())
    }

    /// Parse one thing and then another thing, yielding a tuple of the two outputs.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let pair = just('a').then(just('b'));
    ///
    /// assert_eq!(pair.parse("ab").into_result(), Ok(('a', 'b')));
    /// assert!(pair.parse("aa").is_failure());
    /// ```
    pub fn then<B: 'static>(self, other: Parser<I, B>) -> Parser<I, (A, B)> {
        combinator::and(self, other)
    }

    /// Parse one thing and then another thing, yielding only the output of the former.
    pub fn then_ignore<B: 'static>(self, other: Parser<I, B>) -> Self {
        combinator::and(self, other).map(|(a, _)| a)
    }

    /// Parse one thing and then another thing, yielding only the output of the latter.
    pub fn ignore_then<B: 'static>(self, other: Parser<I, B>) -> Parser<I, B> {
        combinator::and(self, other).map(|(_, b)| b)
    }

    /// Parse one thing or, on failure, another thing.
    ///
    /// The second parser is tried against the same input as the first, so no input consumed by a failed first attempt
    /// is lost. If both fail, the error that got furthest into the input is reported.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let ab = just('a').or(just('b'));
    ///
    /// assert_eq!(ab.parse("b").into_result(), Ok('b'));
    /// ```
    pub fn or(self, other: Self) -> Self {
        combinator::or(self, other)
    }

    /// Parse this pattern any number of times, including zero.
    ///
    /// Repetition stops at the first failure, which is discarded along with any input it consumed. An iteration that
    /// succeeds without consuming input also ends the repetition, since repeating it would never terminate.
    pub fn many(self) -> Parser<I, IList<A>> {
        combinator::many(self)
    }

    /// Parse this pattern at least once.
    pub fn many1(self) -> Parser<I, IList<A>> {
        combinator::many1(self)
    }

    /// Attempt to parse this pattern, yielding `None` instead of failing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let sign = just('-').optional();
    ///
    /// assert_eq!(sign.parse("-").into_result(), Ok(Some('-')));
    /// assert_eq!(sign.parse("5").into_result(), Ok(None));
    /// ```
    pub fn optional(self) -> Parser<I, Option<A>> {
        combinator::optional(self)
    }

    /// Parse any number of this pattern, separated by `separator`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let list = text::letter().sep_by(just(','));
    ///
    /// assert_eq!(list.parse("a,b,c").into_result().map(|l| l.len()), Ok(3));
    /// assert_eq!(list.parse("").into_result().map(|l| l.len()), Ok(0));
    /// ```
    pub fn sep_by<B: 'static>(self, separator: Parser<I, B>) -> Parser<I, IList<A>> {
        combinator::sep_by(self, separator)
    }

    /// Parse at least one of this pattern, separated by `separator`.
    pub fn sep_by1<B: 'static>(self, separator: Parser<I, B>) -> Parser<I, IList<A>> {
        combinator::sep_by1(self, separator)
    }

    /// Parse this pattern, delimited by two others.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let word = text::word().between(just('('), just(')'));
    ///
    /// assert_eq!(word.parse("(compute)").into_result(), Ok("compute".to_string()));
    ///
    /// let err = word.parse("(compute]").into_result().unwrap_err();
    /// assert_eq!(err.to_string(), "closing delimiter: expected ')', found ']' at position 8");
    /// ```
    pub fn between<B: 'static, C: 'static>(self, open: Parser<I, B>, close: Parser<I, C>) -> Self {
        combinator::between(open, close, self)
    }

    /// Parse this pattern with `padding` on either side, ignoring the padding.
    pub fn padded_by<B: 'static>(self, padding: Parser<I, B>) -> Self {
        padding.clone().ignore_then(self).then_ignore(padding)
    }

    /// Parse one or more operands separated by left-associative operators.
    ///
    /// See [`chainl1`].
    pub fn chainl1<F>(self, op: Parser<I, F>) -> Self
    where
        F: Fn(A, A) -> A + 'static,
    {
        combinator::chainl1(self, op)
    }

    /// Parse one or more operands separated by right-associative operators.
    ///
    /// See [`chainr1`].
    pub fn chainr1<F>(self, op: Parser<I, F>) -> Self
    where
        F: Fn(A, A) -> A + 'static,
    {
        combinator::chainr1(self, op)
    }

    /// Like [`Parser::chainl1`], but yielding `seed` when no operand is present.
    pub fn chainl<F>(self, op: Parser<I, F>, seed: A) -> Self
    where
        A: Clone + Send + Sync,
        F: Fn(A, A) -> A + 'static,
    {
        combinator::chainl(self, op, seed)
    }

    /// Like [`Parser::chainr1`], but yielding `seed` when no operand is present.
    pub fn chainr<F>(self, op: Parser<I, F>, seed: A) -> Self
    where
        A: Clone + Send + Sync,
        F: Fn(A, A) -> A + 'static,
    {
        combinator::chainr(self, op, seed)
    }

    /// Succeed, consuming nothing, only if this parser fails at the current position.
    pub fn not(self) -> Parser<I, ()> {
        combinator::not(self)
    }
}

impl<I: Clone + 'static, T: 'static> Parser<I, IList<T>> {
    /// Collect the output of this repeated parser into a type implementing [`FromIterator`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bounce::prelude::*;
    /// let word = text::letter().many1().collect::<String>();
    ///
    /// assert_eq!(word.parse("hello world").into_result(), Ok("hello".to_string()));
    /// ```
    pub fn collect<C: FromIterator<T> + 'static>(self) -> Parser<I, C> {
        self.map(|items| items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::{sync::Arc, thread};

    #[test]
    fn pure_is_left_unit_of_then() {
        let p = text::digit();
        let lhs = pure('x').then(p.clone());
        let rhs = p.map(|v| ('x', v));

        for src in ["1", "a", ""] {
            let input = Input::from(src);
            assert_eq!(lhs.parse(input.clone()), rhs.parse(input));
        }
    }

    #[test]
    fn emptiness_of_compositions() {
        let a = just('a');
        assert!(pure::<char, _>(1).accepts_empty());
        assert!(fail::<char, u8>("no").accepts_empty());
        assert!(!a.clone().many1().accepts_empty());
        assert!(a.clone().optional().accepts_empty());
        assert!(a.clone().not().accepts_empty());
        assert!(a.clone().sep_by(just(',')).accepts_empty());
        assert!(!a.clone().sep_by1(just(',')).accepts_empty());
        assert!(!a.clone().between(pure('('), pure(')')).accepts_empty());
        assert!(pure::<char, _>('x').between(pure('('), pure(')')).accepts_empty());
    }

    #[test]
    fn emptiness_through_unset_ref_is_not_remembered() {
        let r = Ref::<char, char>::named("late");
        let p = r.parser().or(just('a'));
        assert!(!p.accepts_empty());

        r.set(pure('z')).unwrap();
        assert!(p.accepts_empty());
    }

    #[test]
    fn emptiness_of_cycle() {
        let r = Ref::<char, char>::named("cycle");
        r.set(just('a').ignore_then(r.parser()).or(pure('b'))).unwrap();
        assert!(r.parser().accepts_empty());

        let s = Ref::<char, char>::named("tight");
        s.set(s.parser().then_ignore(just('a'))).unwrap();
        assert!(!s.parser().accepts_empty());
    }

    #[test]
    fn emptiness_of_cycle_is_remembered() {
        let s = Ref::<char, char>::named("tight");
        let body = s.parser().then_ignore(just('a'));
        s.set(body.clone()).unwrap();

        let top = s.parser();
        assert!(!top.accepts_empty());
        assert_eq!(top.inner.accepts_empty.get(), Some(&false));
        assert_eq!(body.inner.accepts_empty.get(), Some(&false));
    }

    #[test]
    fn emptiness_assumed_inside_cycle_is_not_remembered() {
        let x = Ref::<char, char>::named("x");
        let y = x.parser().map(|c| c);
        x.set(y.clone().or(pure('b'))).unwrap();

        // `y` is first asked about while `x` is assumed not to accept empty input
        assert!(x.parser().accepts_empty());
        assert!(y.accepts_empty());
    }

    #[test]
    fn shared_between_threads() {
        let digits = Arc::new(text::number().sep_by1(just(',')));

        thread::scope(|scope| {
            for n in 0..4u32 {
                let digits = digits.clone();
                scope.spawn(move || {
                    let src = (0..=n).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
                    let out = digits.parse(src.as_str()).into_result().unwrap();
                    assert_eq!(out.len(), n as usize + 1);
                });
            }
        });
    }
}
