use netcall_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger};
use uuid::Uuid;

/// A single opaque argument carried by an RPC message
#[derive(Clone, Debug, PartialEq)]
pub enum RpcValue {
    Unit,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Guid(Uuid),
    Bytes(Vec<u8>),
    List(Vec<RpcValue>),
}

impl RpcValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Guid(_) => "guid",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Self::Unit => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::UInt(_) => 3,
            Self::Float(_) => 4,
            Self::String(_) => 5,
            Self::Guid(_) => 6,
            Self::Bytes(_) => 7,
            Self::List(_) => 8,
        }
    }
}

type ValueTag = UnsignedInteger<4>;

/// Deepest `List` nesting accepted from the wire
pub const MAX_VALUE_DEPTH: usize = 32;

impl Serde for RpcValue {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ValueTag::new(self.tag()).ser(writer);
        match self {
            Self::Unit => {}
            Self::Bool(value) => value.ser(writer),
            Self::Int(value) => value.ser(writer),
            Self::UInt(value) => value.ser(writer),
            Self::Float(value) => value.ser(writer),
            Self::String(value) => value.ser(writer),
            Self::Guid(value) => value.ser(writer),
            Self::Bytes(value) => value.ser(writer),
            Self::List(value) => value.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag: u8 = ValueTag::de(reader)?.to()?;
        match tag {
            0 => Ok(Self::Unit),
            1 => Ok(Self::Bool(Serde::de(reader)?)),
            2 => Ok(Self::Int(Serde::de(reader)?)),
            3 => Ok(Self::UInt(Serde::de(reader)?)),
            4 => Ok(Self::Float(Serde::de(reader)?)),
            5 => Ok(Self::String(Serde::de(reader)?)),
            6 => Ok(Self::Guid(Serde::de(reader)?)),
            7 => Ok(Self::Bytes(Serde::de(reader)?)),
            8 => {
                reader.enter_nested(MAX_VALUE_DEPTH)?;
                let items = Vec::<RpcValue>::de(reader);
                reader.exit_nested();
                Ok(Self::List(items?))
            }
            _ => Err(SerdeErr::InvalidTag {
                kind: "rpc value",
                tag: tag as u64,
            }),
        }
    }
}

// Conversions into RpcValue

impl From<()> for RpcValue {
    fn from(_: ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for RpcValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_signed {
    ($($type:ty),*) => {$(
        impl From<$type> for RpcValue {
            fn from(value: $type) -> Self {
                Self::Int(i64::from(value))
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($type:ty),*) => {$(
        impl From<$type> for RpcValue {
            fn from(value: $type) -> Self {
                Self::UInt(u64::from(value))
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for RpcValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for RpcValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for RpcValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for RpcValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Uuid> for RpcValue {
    fn from(value: Uuid) -> Self {
        Self::Guid(value)
    }
}

impl From<Vec<u8>> for RpcValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<RpcValue>> for RpcValue {
    fn from(value: Vec<RpcValue>) -> Self {
        Self::List(value)
    }
}

/// Typed extraction of a method parameter from an RpcValue
pub trait FromRpcValue: Sized {
    /// Name reported when a value of the wrong kind is supplied
    const TYPE_NAME: &'static str;

    fn from_rpc_value(value: &RpcValue) -> Option<Self>;
}

impl FromRpcValue for RpcValue {
    const TYPE_NAME: &'static str = "any";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromRpcValue for () {
    const TYPE_NAME: &'static str = "unit";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        matches!(value, RpcValue::Unit).then_some(())
    }
}

impl FromRpcValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        match value {
            RpcValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

// Integers accept either signedness as long as the value fits.
macro_rules! impl_from_rpc_integer {
    ($($type:ty),*) => {$(
        impl FromRpcValue for $type {
            const TYPE_NAME: &'static str = stringify!($type);

            fn from_rpc_value(value: &RpcValue) -> Option<Self> {
                match value {
                    RpcValue::Int(value) => <$type>::try_from(*value).ok(),
                    RpcValue::UInt(value) => <$type>::try_from(*value).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

impl_from_rpc_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromRpcValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        match value {
            RpcValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromRpcValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        match value {
            RpcValue::Float(value) => Some(*value as f32),
            _ => None,
        }
    }
}

impl FromRpcValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        match value {
            RpcValue::String(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl FromRpcValue for Uuid {
    const TYPE_NAME: &'static str = "guid";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        match value {
            RpcValue::Guid(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromRpcValue for Vec<u8> {
    const TYPE_NAME: &'static str = "bytes";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        match value {
            RpcValue::Bytes(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl FromRpcValue for Vec<RpcValue> {
    const TYPE_NAME: &'static str = "list";

    fn from_rpc_value(value: &RpcValue) -> Option<Self> {
        match value {
            RpcValue::List(value) => Some(value.clone()),
            _ => None,
        }
    }
}
