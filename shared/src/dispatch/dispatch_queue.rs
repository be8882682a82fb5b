use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use log::warn;

use crate::{connection::connection_ref::ConnectionRef, messages::rpc_message::RpcMessage};

/// Inbound messages waiting to be dispatched, in arrival order.
///
/// Transports may push from any thread; the owner drains the queue from a
/// single thread so that dispatches never run concurrently.
pub struct DispatchQueue {
    pending: Mutex<VecDeque<(RpcMessage, ConnectionRef)>>,
    capacity: usize,
    rejected: AtomicU64,
}

impl DispatchQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            capacity,
            rejected: AtomicU64::new(0),
        }
    }

    /// Queues a message. Returns false, and counts the rejection, when the
    /// queue is full.
    pub fn push(&self, message: RpcMessage, source: ConnectionRef) -> bool {
        // a poisoned queue still holds plain data, keep using it
        let mut pending = self.pending.lock().unwrap_or_else(|poison| poison.into_inner());
        if pending.len() >= self.capacity {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(
                "RPC queue full ({} messages); rejected message with index {} from {}",
                self.capacity,
                message.method_index(),
                source
            );
            return false;
        }
        pending.push_back((message, source));
        true
    }

    /// Removes and returns everything queued so far
    pub fn drain(&self) -> Vec<(RpcMessage, ConnectionRef)> {
        let mut pending = self.pending.lock().unwrap_or_else(|poison| poison.into_inner());
        pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .map(|pending| pending.len())
            .unwrap_or_else(|poison| poison.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of messages rejected because the queue was full
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}
