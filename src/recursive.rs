//! Recursive parsers (parsers that include themselves within their patterns).
//!
//! *“It's unpleasantly like being drunk."
//! "What's so unpleasant about being drunk?"
//! "You ask a glass of water.”*
//!
//! A grammar is a graph, not a tree: an expression contains terms, which contain parenthesised expressions. Since a
//! [`Parser`] is immutable once built, such cycles are closed through a [`Ref`], a placeholder that is referred to
//! while the grammar is being constructed and bound to its definition afterwards.
//!
//! Applying a [`Ref`] is always deferred through the [`Trampoline`], so recursion in the grammar never turns into
//! recursion on the host stack. A rule that re-enters itself at the same position without having consumed any input
//! would never terminate; this is detected while parsing and reported as a fatal [`ErrorKind::LeftRecursion`] error.
//!
//! [`ErrorKind::LeftRecursion`]: crate::ErrorKind::LeftRecursion

use super::*;
use hashbrown::HashSet;

use std::{
    borrow::Cow,
    rc::Rc,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Weak,
    },
};

/// The rules currently being applied during a single call to [`Parser::parse`], keyed by rule and position.
#[derive(Clone, Default)]
pub(crate) struct Context {
    active: Rc<RefCell<HashSet<(usize, usize)>>>,
}

impl Context {
    /// Mark `key` as active. Returns `false` if it already was.
    pub(crate) fn enter(&self, key: (usize, usize)) -> bool {
        self.active.borrow_mut().insert(key)
    }

    pub(crate) fn exit(&self, key: (usize, usize)) {
        self.active.borrow_mut().remove(&key);
    }
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

struct Slot<I, A> {
    id: usize,
    name: Cow<'static, str>,
    parser: OnceLock<Parser<I, A>>,
}

impl<I, A> Slot<I, A> {
    fn new(name: Option<Cow<'static, str>>) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            name: name.unwrap_or_else(|| Cow::Owned(format!("#{}", id))),
            parser: OnceLock::new(),
        }
    }
}

enum Handle<I, A> {
    Owned(Arc<Slot<I, A>>),
    // Used by the self-reference handed out by `recursive`, so that a rule does not keep itself alive
    Unowned(Weak<Slot<I, A>>),
}

impl<I, A> Clone for Handle<I, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Owned(slot) => Self::Owned(slot.clone()),
            Self::Unowned(slot) => Self::Unowned(slot.clone()),
        }
    }
}

impl<I, A> Handle<I, A> {
    fn slot(&self) -> Arc<Slot<I, A>> {
        match self {
            Self::Owned(slot) => slot.clone(),
            Self::Unowned(slot) => slot
                .upgrade()
                .expect("recursive parser used after the parser returned by `recursive` was dropped"),
        }
    }
}

/// A mutable placeholder for a parser, used to build recursive grammars.
///
/// Create the reference first, refer to it with [`Ref::parser`] while building the rule it stands for, then bind it
/// to that rule with [`Ref::set`]. A reference may only be set once, and must be set before any parser referring to it
/// is applied to input.
///
/// Every parser obtained from a `Ref` holds the reference strongly. A rule that refers to its own `Ref` therefore
/// forms a reference cycle that is never freed. This is harmless for grammars that live as long as the program; for
/// short-lived grammars, prefer [`recursive`].
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// // Balanced parentheses, counting the depth of nesting
/// let parens = Ref::named("parens");
/// parens
///     .set(
///         parens
///             .parser()
///             .between(just('('), just(')'))
///             .map(|depth: usize| depth + 1)
///             .or(pure(0)),
///     )
///     .unwrap();
///
/// let depth = parens.parser().then_ignore(eof());
/// assert_eq!(depth.parse("((()))").into_result(), Ok(3));
/// assert!(depth.parse("(()").is_failure());
/// ```
pub struct Ref<I, A> {
    handle: Handle<I, A>,
}

impl<I, A> Clone for Ref<I, A> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
        }
    }
}

impl<I: Clone + 'static, A: 'static> Ref<I, A> {
    /// Create a new, unset reference.
    pub fn new() -> Self {
        Self {
            handle: Handle::Owned(Arc::new(Slot::new(None))),
        }
    }

    /// Create a new, unset reference with a name that appears in errors and logs.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            handle: Handle::Owned(Arc::new(Slot::new(Some(name.into())))),
        }
    }

    /// The name of this reference.
    pub fn name(&self) -> String {
        self.handle.slot().name.to_string()
    }

    /// Returns `true` if this reference has been bound to a parser.
    pub fn is_set(&self) -> bool {
        self.handle.slot().parser.get().is_some()
    }

    /// Bind this reference to `parser`.
    ///
    /// Fails with [`GrammarError::AlreadySet`] if the reference has already been bound, leaving the existing binding
    /// in place.
    pub fn set(&self, parser: Parser<I, A>) -> Result<(), GrammarError> {
        let slot = self.handle.slot();
        slot.parser.set(parser).map_err(|_| GrammarError::AlreadySet {
            name: slot.name.to_string(),
        })?;
        log::debug!("parser reference `{}` set", slot.name);
        Ok(())
    }

    /// A parser that behaves exactly like the parser this reference is (or will be) bound to.
    ///
    /// # Panics
    ///
    /// The returned parser panics if it is applied to input while the reference is still unset.
    pub fn parser(&self) -> Parser<I, A> {
        indirect(self.handle.clone())
    }
}

impl<I: Clone + 'static, A: 'static> Default for Ref<I, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, A> fmt::Debug for Ref<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.handle.slot();
        f.debug_struct("Ref")
            .field("name", &slot.name)
            .field("set", &slot.parser.get().is_some())
            .finish()
    }
}

impl<I: Clone + 'static, A: 'static> From<&Ref<I, A>> for Parser<I, A> {
    fn from(r: &Ref<I, A>) -> Self {
        r.parser()
    }
}

fn indirect<I, A>(handle: Handle<I, A>) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
{
    let target = handle.clone();
    Parser::new(
        move || match target.slot().parser.get() {
            Some(parser) => parser.emptiness(),
            None => {
                // Can't know yet; answer without committing to it
                mark_unsettled();
                Trampoline::done(false)
            }
        },
        move |ctx, input| {
            let slot = handle.slot();
            let Some(parser) = slot.parser.get() else {
                panic!(
                    "{}",
                    GrammarError::Unset {
                        name: slot.name.to_string()
                    }
                );
            };

            let key = (slot.id, input.position());
            if !ctx.enter(key) {
                log::debug!(
                    "rule `{}` re-entered at position {} without consuming input",
                    slot.name,
                    input.position()
                );
                let error = ParseError::left_recursion(input.position(), &slot.name);
                return Trampoline::done(ParseResult::failure(input, error));
            }

            log::trace!("entering rule `{}` at position {}", slot.name, input.position());
            let exit = ctx.clone();
            parser.apply(ctx, input).map(move |res| {
                exit.exit(key);
                res
            })
        },
    )
}

/// Construct a recursive parser (i.e: a parser that may contain itself as part of its pattern).
///
/// The given function receives a parser standing in for the one being defined, and must build the parser's
/// definition from it. Unlike a [`Ref`], the stand-in does not keep the definition alive, so the grammar is freed once
/// the returned parser (and every parser containing it) has been dropped. The stand-in must not be used to parse
/// input on its own after that.
///
/// # Examples
///
/// ```
/// # use bounce::prelude::*;
/// #[derive(Debug, PartialEq)]
/// enum Tree {
///     Leaf(String),
///     Branch(Vec<Tree>),
/// }
///
/// // Parser that recursively parses nested lists
/// let tree = recursive(|tree| {
///     tree.sep_by(just(',').padded())
///         .between(just('['), just(']'))
///         .map(|items| Tree::Branch(items.into_vec()))
///         .or(text::ident().map(Tree::Leaf))
///         .padded()
/// });
///
/// assert_eq!(tree.parse("hello").into_result(), Ok(Tree::Leaf("hello".to_string())));
/// assert_eq!(
///     tree.parse("[a, [b, c]]").into_result(),
///     Ok(Tree::Branch(vec![
///         Tree::Leaf("a".to_string()),
///         Tree::Branch(vec![Tree::Leaf("b".to_string()), Tree::Leaf("c".to_string())]),
///     ])),
/// );
/// ```
pub fn recursive<I, A, F>(f: F) -> Parser<I, A>
where
    I: Clone + 'static,
    A: 'static,
    F: FnOnce(Parser<I, A>) -> Parser<I, A>,
{
    let slot = Arc::new(Slot::new(None));
    let this = indirect(Handle::Unowned(Arc::downgrade(&slot)));
    slot.parser.set(f(this)).unwrap_or_else(|_| unreachable!());
    indirect(Handle::Owned(slot))
}

#[cfg(test)]
mod tests {
    use crate::{error::ErrorKind, prelude::*};

    fn nested() -> Parser<char, usize> {
        recursive(|this| {
            this.many()
                .between(just('['), just(']'))
                .map(|items| 1 + items.iter().copied().max().unwrap_or(0))
        })
    }

    #[test]
    fn recursive_nesting() {
        let p = nested().then_ignore(eof());
        assert_eq!(p.parse("[]").into_result(), Ok(1));
        assert_eq!(p.parse("[[][[]]]").into_result(), Ok(3));
        assert!(p.parse("[[]").is_failure());
    }

    #[test]
    fn set_twice() {
        let r = Ref::<char, char>::named("twice");
        assert!(!r.is_set());
        r.set(just('a')).unwrap();
        assert!(r.is_set());
        assert_eq!(
            r.set(just('b')),
            Err(GrammarError::AlreadySet {
                name: "twice".to_string()
            })
        );
        // The first binding survives
        assert_eq!(r.parser().parse("a").into_result(), Ok('a'));
    }

    #[test]
    #[should_panic(expected = "parser reference `unset` was used before being set")]
    fn unset_ref_panics() {
        let r = Ref::<char, char>::named("unset");
        let _ = r.parser().parse("a");
    }

    #[test]
    fn anonymous_names_are_distinct() {
        let a = Ref::<char, ()>::new();
        let b = Ref::<char, ()>::new();
        assert_ne!(a.name(), b.name());
        assert_eq!(a.clone().name(), a.name());
    }

    #[test]
    fn left_recursion_is_fatal() {
        let r = Ref::<char, char>::named("expr");
        r.set(r.parser().or(just('x'))).unwrap();

        let err = r.parser().parse("x").into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LeftRecursion);
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "left recursion detected: rule `expr` re-entered without consuming input at position 0"
        );

        // Not even `optional` recovers from it
        assert!(r.parser().optional().parse("x").is_failure());
    }

    #[test]
    fn same_rule_at_new_position_is_fine() {
        let r = Ref::<char, usize>::named("count");
        r.set(just('a').ignore_then(r.parser()).map(|n| n + 1).or(pure(0)))
            .unwrap();
        assert_eq!(r.parser().parse("aaaa").into_result(), Ok(4));
        // Sequential uses of the rule at one position are not re-entries
        let twice = r.parser().then(r.parser());
        assert_eq!(twice.parse("b").into_result(), Ok((0, 0)));
    }

    #[test]
    fn ref_converts_into_parser() {
        let r = Ref::<char, char>::default();
        r.set(just('q')).unwrap();
        let p: Parser<char, char> = (&r).into();
        assert_eq!(p.parse("q").into_result(), Ok('q'));
        assert!(format!("{:?}", r).contains("set: true"));
    }
}
