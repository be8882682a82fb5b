use netcall_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{messages::arguments::RpcArguments, types::RpcIndex};

pub(crate) type IndexCodec = UnsignedVariableInteger<7>;

/// A call to a static method, addressed by its wire index
#[derive(Clone, Debug, PartialEq)]
pub struct StaticCallMessage {
    pub method_index: RpcIndex,
    pub arguments: RpcArguments,
}

impl StaticCallMessage {
    pub fn new(method_index: RpcIndex, arguments: RpcArguments) -> Self {
        Self {
            method_index,
            arguments,
        }
    }
}

impl Serde for StaticCallMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        IndexCodec::new(self.method_index).ser(writer);
        self.arguments.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let method_index = IndexCodec::de(reader)?.to()?;
        let arguments = RpcArguments::de(reader)?;
        Ok(Self {
            method_index,
            arguments,
        })
    }
}
