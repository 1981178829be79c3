//! # Handler Outcomes
//!
//! Every handler body returns exactly one [`Outcome`]. It says two things:
//!
//! 1. Whether there is a reply value (`Reply`) or not (`NoReply`).
//! 2. What happens to the actor state, as a [`StateDirective`]: keep it
//!    ([`StateDirective::Unchanged`]) or replace it ([`StateDirective::Replace`]).
//!
//! Handler bodies never build these variants by hand. They use the four builders:
//!
//! | Builder | Reply | State |
//! |---------|-------|-------|
//! | [`reply(v)`](reply) | `v` | unchanged |
//! | [`reply_with(v, s)`](reply_with) | `v` | replaced by `s` |
//! | [`no_reply()`](no_reply) | none | unchanged |
//! | [`no_reply_with(s)`](no_reply_with) | none | replaced by `s` |
//!
//! "Unchanged" means the state the handler was given on entry stays in place. The
//! actor loop applies the directive after the body returns; the body only sees a
//! shared reference to the state and cannot mutate it in place.

use crate::args::Payload;
use std::any::Any;
use std::fmt;

/// Marker carried by [`StateDirective::Unchanged`].
///
/// It has a private field, so code outside this crate can match on it but never
/// construct it. The only way to produce it is through [`reply`] or [`no_reply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unchanged(());

/// What the actor loop does with its state after a handler returns.
pub enum StateDirective<S> {
    /// Keep the state that was bound when the handler started.
    Unchanged(Unchanged),
    /// Replace the state.
    Replace(S),
}

impl<S> StateDirective<S> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, StateDirective::Unchanged(_))
    }

    /// Applies the directive to the stored state. Only the actor loop calls this,
    /// once per handled message.
    pub(crate) fn apply(self, state: &mut S) {
        if let StateDirective::Replace(next) = self {
            *state = next;
        }
    }
}

impl<S> fmt::Debug for StateDirective<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateDirective::Unchanged(_) => f.write_str("Unchanged"),
            StateDirective::Replace(_) => f.write_str("Replace(..)"),
        }
    }
}

/// The result of running one handler body.
pub enum Outcome<S> {
    Reply(Payload, StateDirective<S>),
    NoReply(StateDirective<S>),
}

impl<S> Outcome<S> {
    pub fn is_reply(&self) -> bool {
        matches!(self, Outcome::Reply(..))
    }

    pub fn directive(&self) -> &StateDirective<S> {
        match self {
            Outcome::Reply(_, directive) | Outcome::NoReply(directive) => directive,
        }
    }
}

impl<S> fmt::Debug for Outcome<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Reply(_, directive) => f.debug_tuple("Reply").field(directive).finish(),
            Outcome::NoReply(directive) => f.debug_tuple("NoReply").field(directive).finish(),
        }
    }
}

/// Reply with `value` and keep the current state.
pub fn reply<S, V: Any + Send>(value: V) -> Outcome<S> {
    Outcome::Reply(Box::new(value), StateDirective::Unchanged(Unchanged(())))
}

/// Reply with `value` and replace the state with `new_state`.
pub fn reply_with<S, V: Any + Send>(value: V, new_state: S) -> Outcome<S> {
    Outcome::Reply(Box::new(value), StateDirective::Replace(new_state))
}

/// No reply; keep the current state.
pub fn no_reply<S>() -> Outcome<S> {
    Outcome::NoReply(StateDirective::Unchanged(Unchanged(())))
}

/// No reply; replace the state with `new_state`.
pub fn no_reply_with<S>(new_state: S) -> Outcome<S> {
    Outcome::NoReply(StateDirective::Replace(new_state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_without_state_keeps_state() {
        let mut state = 10;
        let Outcome::Reply(value, directive) = reply::<i32, _>("ok") else {
            panic!("expected a reply");
        };
        assert_eq!(*value.downcast::<&str>().unwrap(), "ok");
        assert!(directive.is_unchanged());
        directive.apply(&mut state);
        assert_eq!(state, 10);
    }

    #[test]
    fn reply_with_state_replaces_state() {
        let mut state = 10;
        let outcome = reply_with(1u8, 20);
        assert!(outcome.is_reply());
        let Outcome::Reply(_, directive) = outcome else {
            unreachable!()
        };
        directive.apply(&mut state);
        assert_eq!(state, 20);
    }

    #[test]
    fn no_reply_variants() {
        let mut state = String::from("before");
        let Outcome::NoReply(directive) = no_reply_with(String::from("after")) else {
            unreachable!()
        };
        directive.apply(&mut state);
        assert_eq!(state, "after");

        let outcome = no_reply::<String>();
        assert!(!outcome.is_reply());
        assert!(outcome.directive().is_unchanged());
    }
}
