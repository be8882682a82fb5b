/// Two dispatchers wired together through in-memory byte queues.
/// Every message crosses as encoded bytes, so the wire codec is exercised
/// on the way.

use std::sync::{Arc, Mutex};

use log::debug;
use netcall_shared::{
    ConnectionRef, DispatchError, DispatchOutcome, Dispatcher, RpcConfig, RpcMessage,
    RpcTransport,
};
use uuid::Uuid;

use crate::{test_protocol::TestProtocol, test_scene::TestScene};

// Outgoing packets of one peer, waiting for `LoopbackPeers::exchange`
#[derive(Default)]
struct LoopbackTransport {
    outgoing: Mutex<Vec<Vec<u8>>>,
}

impl LoopbackTransport {
    fn take(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.outgoing.lock().unwrap())
    }
}

impl RpcTransport for LoopbackTransport {
    fn broadcast(&self, message: RpcMessage) {
        self.outgoing.lock().unwrap().push(message.to_bytes());
    }
}

/// One side of a loopback pair
pub struct Peer {
    pub id: Uuid,
    pub dispatcher: Arc<Dispatcher>,
    pub protocol: TestProtocol,
    pub scene: Arc<TestScene>,
    transport: Arc<LoopbackTransport>,
}

impl Peer {
    fn new(id: Uuid) -> Self {
        let protocol = TestProtocol::new();
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(protocol.build()),
            RpcConfig::default(),
        ));
        protocol.attach(&dispatcher);

        let scene = Arc::new(TestScene::new());
        dispatcher.set_scene(scene.clone()).unwrap();

        let transport = Arc::new(LoopbackTransport::default());
        dispatcher.connect(transport.clone()).unwrap();

        Self {
            id,
            dispatcher,
            protocol,
            scene,
            transport,
        }
    }

    /// How the other peer sees this one
    pub fn connection(&self) -> ConnectionRef {
        ConnectionRef::remote(self.id)
    }

    pub fn pending_packets(&self) -> usize {
        self.transport.outgoing.lock().unwrap().len()
    }
}

pub struct LoopbackPeers {
    pub host: Peer,
    pub guest: Peer,
}

impl Default for LoopbackPeers {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackPeers {
    pub fn new() -> Self {
        Self {
            host: Peer::new(Uuid::from_u128(1)),
            guest: Peer::new(Uuid::from_u128(2)),
        }
    }

    /// Spawns the same object (same id) in both scenes
    pub fn spawn_shared(&self, id: Uuid, type_name: &str, components: &[&str]) {
        self.host.scene.spawn_with_id(id, type_name, components);
        self.guest.scene.spawn_with_id(id, type_name, components);
    }

    /// Delivers every pending packet to the other peer, decodes it and
    /// dispatches it there. Returns the dispatch results, host-bound first.
    pub fn exchange(&self) -> Vec<Result<DispatchOutcome, DispatchError>> {
        Self::deliver(&self.guest, &self.host);
        Self::deliver(&self.host, &self.guest);

        let mut results = self.host.dispatcher.process_incoming();
        results.extend(self.guest.dispatcher.process_incoming());
        results
    }

    /// Exchanges until neither side has anything left to send, at most `rounds` times
    pub fn exchange_until_idle(&self, rounds: usize) -> Vec<Result<DispatchOutcome, DispatchError>> {
        let mut results = Vec::new();
        for _ in 0..rounds {
            if self.host.pending_packets() == 0 && self.guest.pending_packets() == 0 {
                break;
            }
            results.extend(self.exchange());
        }
        results
    }

    fn deliver(from: &Peer, to: &Peer) {
        for packet in from.transport.take() {
            let message = RpcMessage::from_bytes(&packet).unwrap();
            debug!("Loopback {} -> {}: {:?}", from.id, to.id, message);
            assert!(to.dispatcher.receive(message, from.connection()));
        }
    }
}
