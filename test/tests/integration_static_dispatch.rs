/// Static method calls: local calls are broadcast then run, inbound calls run
/// once with the sender as caller and are never sent back out

use netcall_shared::{
    rpc_args, CallerContext, ConnectionRef, RpcMessage, RpcValue, StaticCallMessage,
};
use netcall_test::{assert_context_at_rest, assert_sent_count, TestHarness};
use uuid::Uuid;

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

#[test]
fn inbound_static_call_runs_once_as_sender() {
    init_logger();
    let harness = TestHarness::new();
    let source = ConnectionRef::remote(Uuid::from_u128(42));
    let message = RpcMessage::Static(StaticCallMessage::new(
        harness.index_of("Game.Chat.Say"),
        rpc_args![5],
    ));
    let mut context = CallerContext::new();

    let outcome = harness
        .dispatcher
        .handle_incoming(&mut context, &message, source)
        .unwrap();

    assert!(outcome.is_invoked());
    let invocations = harness.protocol.invocations_of("Game.Chat.Say");
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].caller, source);
    assert_eq!(invocations[0].arguments, vec![RpcValue::Int(5)]);

    // caller is the sender during the call only
    assert_context_at_rest!(context);
    assert_sent_count!(harness.transport, 0);
}

#[test]
fn inbound_static_call_picks_overload_by_arity() {
    let harness = TestHarness::new();
    let source = ConnectionRef::remote(Uuid::from_u128(42));
    let message = RpcMessage::Static(StaticCallMessage::new(
        harness.index_of("Game.Chat.Say"),
        rpc_args![3, "hi"],
    ));

    harness
        .dispatcher
        .handle_incoming(&mut CallerContext::new(), &message, source)
        .unwrap();

    let invocations = harness.protocol.invocations_of("Game.Chat.Say");
    assert_eq!(invocations.len(), 1);
    assert_eq!(
        invocations[0].arguments,
        vec![RpcValue::Int(3), RpcValue::String("hi".to_string())]
    );
}

#[test]
fn local_broadcast_call_is_sent_then_run() {
    let harness = TestHarness::new();
    let mut context = CallerContext::new();

    harness
        .dispatcher
        .call_static(&mut context, "Game.Chat", "Say", &rpc_args![7])
        .unwrap();

    assert_eq!(
        harness.transport.broadcasts(),
        vec![RpcMessage::Static(StaticCallMessage::new(
            harness.index_of("Game.Chat.Say"),
            rpc_args![7],
        ))]
    );
    let invocations = harness.protocol.invocations_of("Game.Chat.Say");
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].caller, ConnectionRef::Local);
    assert_context_at_rest!(context);
}

#[test]
fn local_only_static_is_not_sent() {
    let harness = TestHarness::new();

    harness
        .dispatcher
        .call_static(&mut CallerContext::new(), "Game.Chat", "Whisper", &rpc_args!["psst"])
        .unwrap();

    assert_sent_count!(harness.transport, 0);
    assert_eq!(harness.protocol.invocations_of("Game.Chat.Whisper").len(), 1);
}

#[test]
fn no_session_means_no_send() {
    let harness = TestHarness::new();
    harness.dispatcher.disconnect().unwrap();
    assert!(!harness.dispatcher.is_connected());

    harness
        .dispatcher
        .call_static(&mut CallerContext::new(), "Game.Chat", "Say", &rpc_args![1])
        .unwrap();

    assert_sent_count!(harness.transport, 0);
    assert_eq!(harness.protocol.invocations_of("Game.Chat.Say").len(), 1);
}

#[test]
fn wrap_static_runs_body_with_local_caller() {
    let harness = TestHarness::new();
    let mut context = CallerContext::new();

    let caller = harness
        .dispatcher
        .wrap_static(&mut context, "Game.Chat.Say", &rpc_args![2], |context| {
            (context.current_caller(), context.depth())
        })
        .unwrap();

    assert_eq!(caller, (ConnectionRef::Local, 1));
    assert_sent_count!(harness.transport, 1);
    assert_context_at_rest!(context);
}

#[test]
fn wrapping_an_unindexed_identifier_fails_before_running() {
    let harness = TestHarness::new();
    let mut ran = false;

    let result = harness.dispatcher.wrap_static(
        &mut CallerContext::new(),
        "Game.Chat.Whisper",
        &rpc_args!["psst"],
        |_| ran = true,
    );

    assert!(result.is_err());
    assert!(!ran);
}
