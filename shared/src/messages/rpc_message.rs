use netcall_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

use crate::{
    messages::{object_call::ObjectCallMessage, static_call::StaticCallMessage},
    types::RpcIndex,
};

/// Every RPC message a peer can send or receive
#[derive(Clone, Debug, PartialEq)]
pub enum RpcMessage {
    Static(StaticCallMessage),
    Object(ObjectCallMessage),
}

impl RpcMessage {
    pub fn method_index(&self) -> RpcIndex {
        match self {
            Self::Static(message) => message.method_index,
            Self::Object(message) => message.method_index,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = BitReader::new(bytes);
        Self::de(&mut reader)
    }
}

impl From<StaticCallMessage> for RpcMessage {
    fn from(message: StaticCallMessage) -> Self {
        Self::Static(message)
    }
}

impl From<ObjectCallMessage> for RpcMessage {
    fn from(message: ObjectCallMessage) -> Self {
        Self::Object(message)
    }
}

impl Serde for RpcMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Self::Static(message) => {
                writer.write_bit(false);
                message.ser(writer);
            }
            Self::Object(message) => {
                writer.write_bit(true);
                message.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(Self::Object(ObjectCallMessage::de(reader)?))
        } else {
            Ok(Self::Static(StaticCallMessage::de(reader)?))
        }
    }
}
