/// Two peers exchanging encoded RPC messages through the serial inbound queue

use netcall_shared::{
    rpc_args, CallerContext, ConnectionRef, DispatchOutcome, Dispatcher, ObjectTarget, RpcConfig,
    RpcMessage, RpcValue, StaticCallMessage,
};
use netcall_test::{
    test_protocol::{door_id, DOOR, HINGE},
    LoopbackPeers, TestProtocol,
};
use std::sync::Arc;
use uuid::Uuid;

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

#[test]
fn static_call_runs_on_both_peers() {
    init_logger();
    let peers = LoopbackPeers::new();

    peers
        .host
        .dispatcher
        .call_static(&mut CallerContext::new(), "Game.Chat", "Say", &rpc_args![3, "hello"])
        .unwrap();
    let results = peers.exchange();

    assert_eq!(results, vec![Ok(DispatchOutcome::Invoked)]);

    let on_host = peers.host.protocol.invocations_of("Game.Chat.Say");
    let on_guest = peers.guest.protocol.invocations_of("Game.Chat.Say");
    assert_eq!(on_host.len(), 1);
    assert_eq!(on_host[0].caller, ConnectionRef::Local);
    assert_eq!(on_guest.len(), 1);
    assert_eq!(on_guest[0].caller, peers.host.connection());
    assert_eq!(
        on_guest[0].arguments,
        vec![RpcValue::Int(3), RpcValue::String("hello".to_string())]
    );

    // nothing echoes back
    assert!(peers.exchange().is_empty());
}

#[test]
fn object_call_reaches_shared_object() {
    let peers = LoopbackPeers::new();
    peers.spawn_shared(door_id(), DOOR, &[HINGE]);

    peers
        .guest
        .dispatcher
        .call_object(
            &mut CallerContext::new(),
            &ObjectTarget::component(door_id(), HINGE),
            "Creak",
            &rpc_args![220],
        )
        .unwrap();
    let results = peers.exchange_until_idle(4);

    assert_eq!(results, vec![Ok(DispatchOutcome::Invoked)]);
    let on_host = peers.host.protocol.invocations_of("Creak");
    assert_eq!(on_host.len(), 1);
    assert_eq!(on_host[0].caller, peers.guest.connection());
}

#[test]
fn object_call_for_object_missing_on_peer_is_dropped() {
    let peers = LoopbackPeers::new();
    let local_only = peers.host.scene.spawn(DOOR, &[]);

    peers
        .host
        .dispatcher
        .call_object(
            &mut CallerContext::new(),
            &ObjectTarget::object(local_only.id()),
            "Open",
            &rpc_args![],
        )
        .unwrap();
    let results = peers.exchange();

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Ok(DispatchOutcome::Dropped(_))));
    assert_eq!(peers.host.protocol.invocations_of("Open").len(), 1);
    assert!(peers.guest.protocol.invocations().is_empty());
}

#[test]
fn relay_runs_say_twice_on_remote_peer() {
    let peers = LoopbackPeers::new();

    peers
        .host
        .dispatcher
        .call_static(&mut CallerContext::new(), "Game.Chat", "Relay", &rpc_args![1])
        .unwrap();
    peers.exchange_until_idle(4);

    // once from the relayed body, once from the host's own forwarded Say
    assert_eq!(peers.guest.protocol.invocations_of("Game.Chat.Relay").len(), 1);
    assert_eq!(peers.guest.protocol.invocations_of("Game.Chat.Say").len(), 2);
    assert_eq!(peers.host.protocol.invocations_of("Game.Chat.Say").len(), 2);
}

#[test]
fn queue_dispatches_in_arrival_order() {
    let protocol = TestProtocol::new();
    let dispatcher = Dispatcher::new(Arc::new(protocol.build()), RpcConfig::default());
    let say = dispatcher.method_index().resolve_index("Game.Chat.Say").unwrap();
    let source = ConnectionRef::remote(Uuid::from_u128(3));

    for volume in 0..5 {
        assert!(dispatcher.receive(
            RpcMessage::Static(StaticCallMessage::new(say, rpc_args![volume])),
            source,
        ));
    }
    assert_eq!(dispatcher.pending_messages(), 5);

    let results = dispatcher.process_incoming();

    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|result| result.is_ok()));
    assert_eq!(dispatcher.pending_messages(), 0);
    let volumes: Vec<RpcValue> = protocol
        .invocations()
        .into_iter()
        .map(|invocation| invocation.arguments[0].clone())
        .collect();
    assert_eq!(volumes, (0..5).map(RpcValue::Int).collect::<Vec<_>>());
}

#[test]
fn queue_rejects_past_capacity() {
    let dispatcher = Dispatcher::new(
        Arc::new(TestProtocol::new().build()),
        RpcConfig {
            max_pending_messages: 2,
            ..Default::default()
        },
    );
    let source = ConnectionRef::remote(Uuid::from_u128(3));
    let message = RpcMessage::Static(StaticCallMessage::new(0, rpc_args![]));

    assert!(dispatcher.receive(message.clone(), source));
    assert!(dispatcher.receive(message.clone(), source));
    assert!(!dispatcher.receive(message, source));

    assert_eq!(dispatcher.pending_messages(), 2);
    assert_eq!(dispatcher.rejected_messages(), 1);
}

#[test]
fn failing_message_does_not_stop_the_queue() {
    let protocol = TestProtocol::new();
    let dispatcher = Dispatcher::new(Arc::new(protocol.build()), RpcConfig::default());
    let say = dispatcher.method_index().resolve_index("Game.Chat.Say").unwrap();
    let source = ConnectionRef::remote(Uuid::from_u128(3));

    dispatcher.receive(RpcMessage::Static(StaticCallMessage::new(999, rpc_args![])), source);
    dispatcher.receive(RpcMessage::Static(StaticCallMessage::new(say, rpc_args![1])), source);

    let results = dispatcher.process_incoming();

    assert!(results[0].is_err());
    assert_eq!(results[1], Ok(DispatchOutcome::Invoked));
    assert_eq!(protocol.invocations().len(), 1);
}
