/// Messages pushed from several threads while the owner drains and reloads:
/// every accepted message runs exactly once, and index lookups stay
/// consistent while generations are being dropped

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use netcall_shared::{
    rpc_args, ConnectionRef, MethodIndex, RpcConfig, RpcMessage, RpcValue, StaticCallMessage,
};
use netcall_test::{
    assert_sent_count, test_protocol::expected_identifiers, TestHarness, TestProtocol,
};
use uuid::Uuid;

const SENDERS: usize = 4;
const PER_SENDER: usize = 250;

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .is_test(true)
        .try_init()
        .ok();
}

fn sender(number: usize) -> ConnectionRef {
    ConnectionRef::remote(Uuid::from_u128(number as u128 + 1))
}

#[test]
fn concurrent_receive_dispatches_each_message_once() {
    init_logger();
    let harness = TestHarness::with_config(RpcConfig {
        max_pending_messages: SENDERS * PER_SENDER,
        ..RpcConfig::default()
    });
    let say = harness.index_of("Game.Chat.Say");
    let total = SENDERS * PER_SENDER;
    let mut results = Vec::new();

    thread::scope(|scope| {
        for number in 0..SENDERS {
            let dispatcher = &harness.dispatcher;
            scope.spawn(move || {
                for n in 0..PER_SENDER {
                    let value = (number * PER_SENDER + n) as i32;
                    let message =
                        RpcMessage::Static(StaticCallMessage::new(say, rpc_args![value]));
                    assert!(dispatcher.receive(message, sender(number)));
                    if n % 50 == 0 {
                        dispatcher.hotload().unwrap();
                    }
                }
            });
        }

        // drain on this thread while the senders are still pushing
        while results.len() < total {
            results.extend(harness.dispatcher.process_incoming());
            thread::yield_now();
        }
    });

    assert_eq!(results.len(), total);
    assert!(results
        .iter()
        .all(|result| matches!(result, Ok(outcome) if outcome.is_invoked())));
    assert_eq!(harness.dispatcher.pending_messages(), 0);
    assert_eq!(harness.dispatcher.rejected_messages(), 0);

    let mut seen = vec![0usize; total];
    for invocation in harness.protocol.invocations_of("Game.Chat.Say") {
        let RpcValue::Int(value) = invocation.arguments[0] else {
            panic!("unexpected argument {:?}", invocation.arguments);
        };
        let value = value as usize;
        assert_eq!(invocation.caller, sender(value / PER_SENDER));
        seen[value] += 1;
    }
    assert!(seen.iter().all(|&count| count == 1));

    // inbound calls are never sent back out
    assert_sent_count!(harness.transport, 0);
}

#[test]
fn concurrent_receive_counts_rejections() {
    let capacity = 100;
    let harness = TestHarness::with_config(RpcConfig {
        max_pending_messages: capacity,
        ..RpcConfig::default()
    });
    let say = harness.index_of("Game.Chat.Say");
    let accepted = AtomicUsize::new(0);

    thread::scope(|scope| {
        for number in 0..SENDERS {
            let dispatcher = &harness.dispatcher;
            let accepted = &accepted;
            scope.spawn(move || {
                for n in 0..capacity {
                    let message = RpcMessage::Static(StaticCallMessage::new(
                        say,
                        rpc_args![n as i32],
                    ));
                    if dispatcher.receive(message, sender(number)) {
                        accepted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert_eq!(accepted.load(Ordering::Relaxed), capacity);
    assert_eq!(
        harness.dispatcher.rejected_messages(),
        (SENDERS * capacity - capacity) as u64
    );
    assert_eq!(harness.dispatcher.pending_messages(), capacity);

    let results = harness.dispatcher.process_incoming();
    assert_eq!(results.len(), capacity);
    assert!(results.iter().all(|result| result.is_ok()));
    assert_eq!(harness.protocol.invocations_of("Game.Chat.Say").len(), capacity);
}

#[test]
fn lookups_stay_consistent_while_invalidating() {
    let index = Arc::new(MethodIndex::new(Arc::new(TestProtocol::new().build())));
    let expected = expected_identifiers();

    thread::scope(|scope| {
        let invalidator = &index;
        scope.spawn(move || {
            for _ in 0..500 {
                invalidator.invalidate().unwrap();
                thread::yield_now();
            }
        });

        for _ in 0..SENDERS {
            let index = &index;
            let expected = &expected;
            scope.spawn(move || {
                for _ in 0..200 {
                    for (position, identifier) in expected.iter().enumerate() {
                        let method_index = index.resolve_index(identifier).unwrap();
                        assert_eq!(method_index as usize, position);
                        assert_eq!(index.resolve_identifier(method_index).unwrap(), *identifier);
                    }
                }
            });
        }
    });

    assert_eq!(index.identifiers().unwrap(), expected);
}
