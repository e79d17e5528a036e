//! Stack-safe evaluation of deferred computations.
//!
//! Composing parsers naively means that every combinator calls into its children from inside its own stack frame, so
//! the depth of the host stack grows with the depth of the grammar *and* of the input. A [`Trampoline`] instead
//! describes the remaining work as data: either a finished value, a deferred step, or a computation followed by a
//! continuation. [`Trampoline::run`] then "bounces" through these steps in a loop, keeping pending continuations in a
//! heap-allocated stack. The host stack stays flat no matter how deep the parse goes.
//!
//! Continuations are type-erased internally so that a chain of [`Trampoline::flat_map`] calls with differing
//! intermediate types can share one continuation stack. Values must therefore be `'static`.

use std::{any::Any, marker::PhantomData};

type Value = Box<dyn Any>;
type Cont = Box<dyn FnOnce(Value) -> Step>;

enum Step {
    Done(Value),
    More(Box<dyn FnOnce() -> Step>),
    Bind(Box<Step>, Cont),
}

/// A suspended computation that produces an `A` when [run](Trampoline::run).
///
/// # Examples
///
/// ```
/// # use bounce::Trampoline;
/// // Counting down recursively through continuations would overflow the stack if each step were a function call.
/// fn count(n: u64, acc: u64) -> Trampoline<u64> {
///     if n == 0 {
///         Trampoline::done(acc)
///     } else {
///         Trampoline::more(move || count(n - 1, acc + 1))
///     }
/// }
///
/// assert_eq!(count(1_000_000, 0).run(), 1_000_000);
/// ```
#[must_use = "trampolines do nothing until run"]
pub struct Trampoline<A> {
    step: Step,
    phantom: PhantomData<fn() -> A>,
}

impl<A: 'static> Trampoline<A> {
    fn from_step(step: Step) -> Self {
        Self {
            step,
            phantom: PhantomData,
        }
    }

    /// A trampoline that has already finished with the given value.
    pub fn done(value: A) -> Self {
        Self::from_step(Step::Done(Box::new(value)))
    }

    /// Defer a computation until the trampoline is run.
    ///
    /// The closure is only invoked by the bounce loop, never from inside the caller's stack frame.
    pub fn more<F>(f: F) -> Self
    where
        F: FnOnce() -> Trampoline<A> + 'static,
    {
        Self::from_step(Step::More(Box::new(move || f().step)))
    }

    /// Sequence another trampolined computation after this one.
    ///
    /// `f` is invoked from the bounce loop once this trampoline has produced its value, so arbitrarily long chains of
    /// `flat_map` never grow the host stack.
    pub fn flat_map<B, F>(self, f: F) -> Trampoline<B>
    where
        B: 'static,
        F: FnOnce(A) -> Trampoline<B> + 'static,
    {
        Trampoline::from_step(Step::Bind(
            Box::new(self.step),
            Box::new(move |value| f(downcast(value)).step),
        ))
    }

    /// Transform the eventual value of this trampoline.
    pub fn map<B, F>(self, f: F) -> Trampoline<B>
    where
        B: 'static,
        F: FnOnce(A) -> B + 'static,
    {
        self.flat_map(move |a| Trampoline::done(f(a)))
    }

    /// Returns `true` if no further steps are required to produce the value.
    pub fn is_done(&self) -> bool {
        matches!(self.step, Step::Done(_))
    }

    /// Bounce through every pending step until a value is produced.
    pub fn run(self) -> A {
        let mut conts: Vec<Cont> = Vec::new();
        let mut step = self.step;
        loop {
            step = match step {
                Step::Done(value) => match conts.pop() {
                    Some(k) => k(value),
                    None => return downcast(value),
                },
                Step::More(f) => f(),
                Step::Bind(inner, k) => {
                    conts.push(k);
                    *inner
                }
            };
        }
    }
}

fn downcast<A: 'static>(value: Value) -> A {
    match value.downcast::<A>() {
        Ok(a) => *a,
        // Every continuation is created by `flat_map` with the type of the step it is bound to
        Err(_) => unreachable!("trampoline continuation received a value of the wrong type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_to(n: u64) -> Trampoline<u64> {
        if n == 0 {
            Trampoline::done(0)
        } else {
            Trampoline::more(move || sum_to(n - 1)).map(move |s| s + n)
        }
    }

    #[test]
    fn done_runs_immediately() {
        let t = Trampoline::done("hello");
        assert!(t.is_done());
        assert_eq!(t.run(), "hello");
    }

    #[test]
    fn deep_non_tail_recursion() {
        assert_eq!(sum_to(200_000).run(), 200_000 * 200_001 / 2);
    }

    #[test]
    fn left_nested_binds() {
        let mut t = Trampoline::done(0u32);
        for _ in 0..100_000 {
            t = t.flat_map(|n| Trampoline::more(move || Trampoline::done(n + 1)));
        }
        assert_eq!(t.run(), 100_000);
    }

    #[test]
    fn changes_type_between_steps() {
        let t = Trampoline::done(21)
            .map(|n: i32| n * 2)
            .flat_map(|n| Trampoline::done(n.to_string()))
            .map(|s| s.len());
        assert_eq!(t.run(), 2);
    }
}
