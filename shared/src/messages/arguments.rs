use std::slice::Iter;

use netcall_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{messages::value::{FromRpcValue, RpcValue}, method::error::InvokeError};

/// Ordered argument list of a single RPC invocation
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RpcArguments {
    values: Vec<RpcValue>,
}

impl RpcArguments {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push<V: Into<RpcValue>>(&mut self, value: V) {
        self.values.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&RpcValue> {
        self.values.get(position)
    }

    pub fn iter(&self) -> Iter<'_, RpcValue> {
        self.values.iter()
    }

    pub fn into_inner(self) -> Vec<RpcValue> {
        self.values
    }

    /// Decodes the value at `position` as `T`
    pub fn decode<T: FromRpcValue>(&self, position: usize) -> Result<T, InvokeError> {
        let Some(value) = self.values.get(position) else {
            return Err(InvokeError::ArityMismatch {
                expected: position + 1,
                actual: self.values.len(),
            });
        };
        T::from_rpc_value(value).ok_or(InvokeError::ArgumentType {
            position,
            expected: T::TYPE_NAME,
            actual: value.type_name(),
        })
    }
}

impl From<Vec<RpcValue>> for RpcArguments {
    fn from(values: Vec<RpcValue>) -> Self {
        Self { values }
    }
}

impl<'a> IntoIterator for &'a RpcArguments {
    type Item = &'a RpcValue;
    type IntoIter = Iter<'a, RpcValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl Serde for RpcArguments {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.values.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            values: Serde::de(reader)?,
        })
    }
}

/// Builds an `RpcArguments` list from values convertible into `RpcValue`
///
/// ```
/// # use netcall_shared::rpc_args;
/// let arguments = rpc_args![5, "five", true];
/// assert_eq!(arguments.len(), 3);
/// ```
#[macro_export]
macro_rules! rpc_args {
    () => {
        $crate::RpcArguments::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::RpcArguments::from(vec![$($crate::RpcValue::from($value)),+])
    };
}

/// Decodes a full argument list into a typed parameter tuple
pub trait FromArguments: Sized {
    /// Number of parameters the tuple expects
    const ARITY: usize;

    fn from_arguments(arguments: &RpcArguments) -> Result<Self, InvokeError>;
}

impl FromArguments for () {
    const ARITY: usize = 0;

    fn from_arguments(arguments: &RpcArguments) -> Result<Self, InvokeError> {
        if !arguments.is_empty() {
            return Err(InvokeError::ArityMismatch {
                expected: 0,
                actual: arguments.len(),
            });
        }
        Ok(())
    }
}

macro_rules! impl_from_arguments {
    ($arity:expr; $($name:ident: $position:tt),+) => {
        impl<$($name: FromRpcValue),+> FromArguments for ($($name,)+) {
            const ARITY: usize = $arity;

            fn from_arguments(arguments: &RpcArguments) -> Result<Self, InvokeError> {
                if arguments.len() != Self::ARITY {
                    return Err(InvokeError::ArityMismatch {
                        expected: Self::ARITY,
                        actual: arguments.len(),
                    });
                }
                Ok(($(arguments.decode::<$name>($position)?,)+))
            }
        }
    };
}

impl_from_arguments!(1; A: 0);
impl_from_arguments!(2; A: 0, B: 1);
impl_from_arguments!(3; A: 0, B: 1, C: 2);
impl_from_arguments!(4; A: 0, B: 1, C: 2, D: 3);
impl_from_arguments!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_from_arguments!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
