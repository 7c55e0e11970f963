//! Property-based tests for the durable operation queue

use liftlog::client::local_db::LocalDatabase;
use liftlog::client::{OperationMethod, OperationQueue};
use proptest::prelude::*;
use std::sync::Arc;

fn operation_strategy() -> impl Strategy<Value = (OperationMethod, String, Option<String>)> {
    (
        prop_oneof![
            Just(OperationMethod::Create),
            Just(OperationMethod::Update),
            Just(OperationMethod::Delete),
        ],
        prop_oneof![
            Just("/templates".to_string()),
            Just("/sessions".to_string()),
            (1..500i64).prop_map(|id| format!("/templates/{}", id)),
            (1..500i64).prop_map(|id| format!("/sessions/{}", id)),
        ],
        proptest::option::of("[a-zA-Z0-9 {}\":,]{0,40}"),
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_list_all_returns_insertion_order(
        ops in prop::collection::vec(operation_strategy(), 0..20)
    ) {
        runtime().block_on(async {
            let queue = OperationQueue::new(Arc::new(LocalDatabase::in_memory().await.unwrap()));

            let mut enqueued = Vec::new();
            for (method, target, payload) in &ops {
                enqueued.push(queue.enqueue(*method, target, payload.clone()).await.unwrap());
            }

            let listed = queue.list_all().await.unwrap();
            prop_assert_eq!(&listed, &enqueued);
            prop_assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
            for (entry, (method, target, payload)) in listed.iter().zip(&ops) {
                prop_assert_eq!(entry.method, *method);
                prop_assert_eq!(&entry.target_path, target);
                prop_assert_eq!(&entry.payload, payload);
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn test_remove_takes_exactly_one(
        ops in prop::collection::vec(operation_strategy(), 1..15),
        pick in any::<prop::sample::Index>(),
    ) {
        runtime().block_on(async {
            let queue = OperationQueue::new(Arc::new(LocalDatabase::in_memory().await.unwrap()));

            let mut enqueued = Vec::new();
            for (method, target, payload) in &ops {
                enqueued.push(queue.enqueue(*method, target, payload.clone()).await.unwrap());
            }

            let victim = enqueued.remove(pick.index(enqueued.len()));
            prop_assert!(queue.remove(victim.id).await.unwrap());
            prop_assert!(!queue.remove(victim.id).await.unwrap());
            prop_assert_eq!(queue.list_all().await.unwrap(), enqueued);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
