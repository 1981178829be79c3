//! # Counter
//!
//! A counter actor defined in one step from an [`ActorTypeConfig`], the
//! data-driven alternative to registering operations one by one. Callers reach
//! it through [`CounterClient`](crate::clients::CounterClient), whose stubs are
//! made by name.
//!
//! | Operation | Mode | Effect |
//! |-----------|------|--------|
//! | `increment/1` (by) | call | adds `by`, replies with the new value |
//! | `increment/0` | cast | adds one |
//! | `value/0` | call | replies with the current value |
//! | `reset/0` | cast | back to zero |

use gen_actor::{
    define_actor_type, no_reply_with, reply, reply_with, ActorError, ActorType, ActorTypeConfig,
    OperationDescriptor,
};

/// Qualified name of the counter type.
pub const COUNTER: &str = "Counter";

/// Describes the counter type, starting at `initial`.
pub fn config(initial: i64) -> ActorTypeConfig<i64> {
    ActorTypeConfig::new(COUNTER)
        .initial_state(initial)
        .call(
            OperationDescriptor::new("increment", &["by"], |(by,): (i64,), count: &i64| {
                reply_with(count + by, count + by)
            })
            .bind_state("count"),
        )
        .cast(
            OperationDescriptor::new("increment", &[], |(): (), count: &i64| {
                no_reply_with(count + 1)
            })
            .bind_state("count"),
        )
        .call(OperationDescriptor::new("value", &[], |(): (), count: &i64| {
            reply(*count)
        }))
        .cast(OperationDescriptor::new("reset", &[], |(): (), _: &i64| {
            no_reply_with(0)
        }))
}

/// Defines the counter type, starting at zero.
pub fn define() -> Result<ActorType<i64>, ActorError> {
    define_actor_type(config(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_increment_with_one_argument_is_rejected() {
        let config = config(0).call(OperationDescriptor::new(
            "increment",
            &["step"],
            |(step,): (i64,), count: &i64| reply(count - step),
        ));
        let err = define_actor_type(config).unwrap_err();
        assert!(matches!(
            err,
            ActorError::DuplicateOperation { ref name, arity: 1 } if name == "increment"
        ));
    }
}
