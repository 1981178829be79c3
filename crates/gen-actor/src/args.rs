//! # Argument Lists
//!
//! Messages carry their arguments as a type-erased, ordered [`Args`] list so the
//! dispatch table can be keyed by operation name and arity alone. The typed side
//! of the binding goes through two traits implemented for tuples:
//!
//! - [`IntoArgs`] packs a tuple into an [`Args`] list (used by the caller stubs).
//! - [`FromArgs`] unpacks an [`Args`] list back into a tuple (used by dispatch).
//!
//! Both are implemented for `()` and tuples of up to eight elements.

use std::any::Any;
use std::fmt;

/// A single type-erased value: an argument or a reply.
pub type Payload = Box<dyn Any + Send>;

/// Ordered, type-erased argument list carried by a [`Message`](crate::Message).
#[derive(Default)]
pub struct Args {
    slots: Vec<Option<Payload>>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one argument.
    pub fn push<T: Any + Send>(mut self, value: T) -> Self {
        self.slots.push(Some(Box::new(value)));
        self
    }

    /// Number of arguments. This is the arity used for dispatch.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Moves the argument at `index` out of the list if it has type `T`.
    ///
    /// Returns `None` when the slot is missing, already taken, or holds a
    /// different type. A type mismatch leaves the slot untouched.
    pub fn take<T: Any>(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        let value = slot.take()?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                *slot = Some(value);
                None
            }
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Args(arity={})", self.slots.len())
    }
}

/// Builds an [`Args`] list from a comma-separated list of values.
///
/// ```rust
/// let args = gen_actor::args!["a".to_string(), 1i64];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => { $crate::Args::new() };
    ($($value:expr),+ $(,)?) => { $crate::Args::new()$(.push($value))+ };
}

/// Packs a typed argument tuple into an [`Args`] list.
pub trait IntoArgs {
    const ARITY: usize;

    fn into_args(self) -> Args;
}

/// Unpacks an [`Args`] list into a typed argument tuple.
pub trait FromArgs: Sized {
    const ARITY: usize;

    /// On failure returns the index of the first argument that was missing or
    /// had the wrong type.
    fn from_args(args: Args) -> Result<Self, usize>;
}

macro_rules! impl_arg_tuple {
    ($arity:expr; $($idx:tt => $T:ident),*) => {
        impl<$($T: Any + Send),*> IntoArgs for ($($T,)*) {
            const ARITY: usize = $arity;

            fn into_args(self) -> Args {
                Args {
                    slots: vec![$(Some(Box::new(self.$idx) as Payload)),*],
                }
            }
        }

        impl<$($T: Any + Send),*> FromArgs for ($($T,)*) {
            const ARITY: usize = $arity;

            #[allow(unused_mut, unused_variables)]
            fn from_args(mut args: Args) -> Result<Self, usize> {
                if args.len() != $arity {
                    return Err(args.len().min($arity));
                }
                paste::paste! {
                    $(let [<arg_ $idx>] = args.take::<$T>($idx).ok_or($idx as usize)?;)*
                    Ok(($([<arg_ $idx>],)*))
                }
            }
        }
    };
}

impl_arg_tuple!(0;);
impl_arg_tuple!(1; 0 => A);
impl_arg_tuple!(2; 0 => A, 1 => B);
impl_arg_tuple!(3; 0 => A, 1 => B, 2 => C);
impl_arg_tuple!(4; 0 => A, 1 => B, 2 => C, 3 => D);
impl_arg_tuple!(5; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_arg_tuple!(6; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
impl_arg_tuple!(7; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);
impl_arg_tuple!(8; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_unpacks_in_order() {
        let args = ("key".to_string(), 7i64).into_args();
        assert_eq!(args.len(), 2);

        let (key, value) = <(String, i64)>::from_args(args).unwrap();
        assert_eq!(key, "key");
        assert_eq!(value, 7);
    }

    #[test]
    fn wrong_type_reports_index() {
        let args = crate::args!["key".to_string(), "not a number"];
        let err = <(String, i64)>::from_args(args).unwrap_err();
        assert_eq!(err, 1);
    }

    #[test]
    fn every_position_reports_its_own_index() {
        let args = (1u8, 2u8, 3u8, 4u8, 5u8, 6u8, 7u8, 8u8).into_args();
        let all = <(u8, u8, u8, u8, u8, u8, u8, u8)>::from_args(args).unwrap();
        assert_eq!(all, (1, 2, 3, 4, 5, 6, 7, 8));

        let first_wrong = crate::args![1i32, 2u8, 3u8];
        assert_eq!(<(u8, u8, u8)>::from_args(first_wrong).unwrap_err(), 0);

        let last_wrong = (1u8, 2u8, 3u8, 4u8, 5u8, 6u8, 7u8, "eight").into_args();
        let err = <(u8, u8, u8, u8, u8, u8, u8, u8)>::from_args(last_wrong).unwrap_err();
        assert_eq!(err, 7);
    }

    #[test]
    fn take_leaves_slot_on_mismatch() {
        let mut args = Args::new().push(5u32);
        assert_eq!(args.take::<i64>(0), None);
        assert_eq!(args.take::<u32>(0), Some(5));
        assert_eq!(args.take::<u32>(0), None);
    }

    #[test]
    fn unit_has_no_arguments() {
        assert!(().into_args().is_empty());
        assert!(<()>::from_args(Args::new()).is_ok());
        assert_eq!(<() as FromArgs>::ARITY, 0);
    }
}
