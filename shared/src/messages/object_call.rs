use netcall_serde::{BitReader, BitWrite, Serde, SerdeErr};
use uuid::Uuid;

use crate::{
    messages::{arguments::RpcArguments, static_call::IndexCodec},
    types::RpcIndex,
};

/// A call to an instance method on a scene object, or on one of its
/// components when `component_type_name` is set
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectCallMessage {
    pub object_id: Uuid,
    pub component_type_name: Option<String>,
    pub method_index: RpcIndex,
    pub arguments: RpcArguments,
}

impl ObjectCallMessage {
    pub fn new(
        object_id: Uuid,
        component_type_name: Option<String>,
        method_index: RpcIndex,
        arguments: RpcArguments,
    ) -> Self {
        Self {
            object_id,
            component_type_name,
            method_index,
            arguments,
        }
    }

    /// The targeted component's type name. An empty name targets the
    /// object itself, the same as no name at all.
    pub fn component(&self) -> Option<&str> {
        self.component_type_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

impl Serde for ObjectCallMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.object_id.ser(writer);
        self.component_type_name.ser(writer);
        IndexCodec::new(self.method_index).ser(writer);
        self.arguments.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let object_id = Uuid::de(reader)?;
        let component_type_name = Option::<String>::de(reader)?;
        let method_index = IndexCodec::de(reader)?.to()?;
        let arguments = RpcArguments::de(reader)?;
        Ok(Self {
            object_id,
            component_type_name,
            method_index,
            arguments,
        })
    }
}
