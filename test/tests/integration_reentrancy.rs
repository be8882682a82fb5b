/// An inbound call's own wrapper must not send it back out. Calls the body
/// makes from inside itself are ordinary local calls.

use netcall_shared::{
    rpc_args, CallerContext, ConnectionRef, ObjectCallMessage, RpcMessage, StaticCallMessage,
};
use netcall_test::{
    assert_context_at_rest, assert_sent_count, test_protocol::DOOR, TestHarness,
};
use uuid::Uuid;

fn source() -> ConnectionRef {
    ConnectionRef::remote(Uuid::from_u128(5))
}

#[test]
fn inbound_static_call_is_not_rebroadcast() {
    let harness = TestHarness::new();
    let message = RpcMessage::Static(StaticCallMessage::new(
        harness.index_of("Game.Chat.Say"),
        rpc_args![1],
    ));

    for _ in 0..3 {
        harness
            .dispatcher
            .handle_incoming(&mut CallerContext::new(), &message, source())
            .unwrap();
    }

    assert_sent_count!(harness.transport, 0);
    assert_eq!(harness.protocol.invocations_of("Game.Chat.Say").len(), 3);
}

#[test]
fn inbound_object_call_is_not_resent() {
    let harness = TestHarness::new();
    let door = harness.scene.spawn(DOOR, &[]);

    for identifier in ["Open", "Lock"] {
        let arguments = if identifier == "Lock" {
            rpc_args![false]
        } else {
            rpc_args![]
        };
        let message = ObjectCallMessage::new(door.id(), None, harness.index_of(identifier), arguments);
        harness
            .dispatcher
            .handle_object(&mut CallerContext::new(), &message, source())
            .unwrap();
    }

    assert_sent_count!(harness.transport, 0);
    assert_eq!(harness.protocol.invocations().len(), 2);
}

#[test]
fn nested_call_inside_inbound_body_is_local() {
    let harness = TestHarness::new();
    let message = RpcMessage::Static(StaticCallMessage::new(
        harness.index_of("Game.Chat.Relay"),
        rpc_args![4],
    ));
    let mut context = CallerContext::new();

    harness
        .dispatcher
        .handle_incoming(&mut context, &message, source())
        .unwrap();

    // Relay itself is not resent; the Say it makes is a fresh local call
    let broadcasts = harness.transport.broadcasts();
    assert_eq!(broadcasts.len(), 1);
    assert_eq!(broadcasts[0].method_index(), harness.index_of("Game.Chat.Say"));

    let relay = harness.protocol.invocations_of("Game.Chat.Relay");
    let say = harness.protocol.invocations_of("Game.Chat.Say");
    assert_eq!(relay[0].caller, source());
    assert_eq!(say[0].caller, ConnectionRef::Local);
    assert_context_at_rest!(context);
}

#[test]
fn local_relay_sends_both_calls() {
    let harness = TestHarness::new();
    let mut context = CallerContext::new();

    harness
        .dispatcher
        .call_static(&mut context, "Game.Chat", "Relay", &rpc_args![4])
        .unwrap();

    let indices: Vec<u32> = harness
        .transport
        .broadcasts()
        .iter()
        .map(RpcMessage::method_index)
        .collect();
    assert_eq!(
        indices,
        vec![
            harness.index_of("Game.Chat.Relay"),
            harness.index_of("Game.Chat.Say")
        ]
    );
    assert_context_at_rest!(context);
}

#[test]
fn nested_inbound_calls_restore_each_caller() {
    let harness = TestHarness::new();
    let outer = ConnectionRef::remote(Uuid::from_u128(1));
    let inner = ConnectionRef::remote(Uuid::from_u128(2));
    let say = RpcMessage::Static(StaticCallMessage::new(
        harness.index_of("Game.Chat.Say"),
        rpc_args![1],
    ));
    let mut context = CallerContext::new();

    context.begin_remote_call(outer);
    let body = context.begin_local_call();
    harness
        .dispatcher
        .handle_incoming(&mut context, &say, inner)
        .unwrap();
    assert_eq!(context.current_caller(), outer);
    context.end_local_call(body).unwrap();
    context.end_remote_call().unwrap();

    assert_eq!(harness.protocol.invocations_of("Game.Chat.Say")[0].caller, inner);
    assert_sent_count!(harness.transport, 0);
    assert_context_at_rest!(context);
}
