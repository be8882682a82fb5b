use uuid::Uuid;

use crate::messages::rpc_message::RpcMessage;

/// The network session RPC messages are sent through. Delivery, ordering
/// and reliability are the transport's concern.
pub trait RpcTransport: Send + Sync {
    /// Sends the message to every connected peer
    fn broadcast(&self, message: RpcMessage);

    /// Sends an authority call to whichever peer owns `object_id`.
    /// Transports without ownership information broadcast it.
    fn send_to_authority(&self, object_id: &Uuid, message: RpcMessage) {
        let _ = object_id;
        self.broadcast(message);
    }
}
