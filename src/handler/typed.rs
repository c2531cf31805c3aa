//! Typed handler functions.
//!
//! Any `Fn(&C, T1, .., Tn) -> R` with `n <= 8`, every `Ti: FromArgument` and
//! `R: IntoOutcome`, is a handler for controller `C`. The parameter types
//! declare how each argument is bound; the return type decides the outcome.

use crate::binding::{Argument, Arguments, BindError, FromArgument, ParamKind};
use crate::handler::outcome::{IntoOutcome, InvokeError, Outcome};

/// Binding shape of one handler parameter, read off its Rust type.
#[derive(Debug, Clone, Copy)]
pub struct ParamShape {
    pub kind: ParamKind,
    /// `Option<T>` parameters see a missing value as `None`.
    pub optional: bool,
}

/// A function that can serve requests for controller `C`.
///
/// `Args` is a marker tuple of the parameter types; it only exists to keep
/// the per-arity implementations apart.
pub trait Handler<C, Args>: Send + Sync + 'static {
    /// Parameter shapes in declaration order.
    fn shapes() -> Vec<ParamShape>;

    fn call(&self, controller: &C, args: Arguments) -> Result<Outcome, InvokeError>;
}

fn next_argument(
    iter: &mut impl Iterator<Item = Argument>,
    index: usize,
    expected: &'static str,
) -> Result<Argument, BindError> {
    iter.next().ok_or(BindError::ArgumentMismatch {
        index,
        expected,
        actual: "nothing",
    })
}

macro_rules! impl_handler {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
        impl<C, F, R, $($ty,)*> Handler<C, ($($ty,)*)> for F
        where
            F: Fn(&C, $($ty),*) -> R + Send + Sync + 'static,
            R: IntoOutcome,
            $($ty: FromArgument,)*
        {
            fn shapes() -> Vec<ParamShape> {
                vec![$(ParamShape {
                    kind: <$ty as FromArgument>::kind(),
                    optional: <$ty as FromArgument>::is_optional(),
                }),*]
            }

            fn call(&self, controller: &C, args: Arguments) -> Result<Outcome, InvokeError> {
                let mut iter = args.into_iter();
                let mut index = 0usize;
                $(
                    let expected = <$ty as FromArgument>::kind().describe();
                    let $ty = <$ty as FromArgument>::from_argument(
                        next_argument(&mut iter, index, expected)?,
                        index,
                    )?;
                    index += 1;
                )*
                (self)(controller, $($ty),*)
                    .into_outcome()
                    .map_err(InvokeError::Failed)
            }
        }
    };
}

impl_handler!();
impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
