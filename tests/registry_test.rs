// Integration tests for the connection registry

use std::sync::Arc;
use tokio::sync::mpsc;

use pushgate::core::push::PushService;
use pushgate::core::registry::create_registry;

fn channel() -> (
    mpsc::UnboundedSender<warp::ws::Message>,
    mpsc::UnboundedReceiver<warp::ws::Message>,
) {
    mpsc::unbounded_channel()
}

#[tokio::test]
async fn test_register_and_lookup() {
    let registry = create_registry();
    let (tx, _rx) = channel();

    let conn = registry.register("u1".to_string(), tx).await;
    assert_eq!(conn.user_id, "u1");
    assert_eq!(registry.len().await, 1);
    assert!(registry.is_user_online("u1").await);

    let found = registry.lookup("u1").await.expect("u1 should be registered");
    assert_eq!(found.id, conn.id);

    assert!(registry.lookup("u2").await.is_none());
    assert!(!registry.is_user_online("u2").await);
}

#[tokio::test]
async fn test_unregister_removes_connection_everywhere() {
    let registry = create_registry();
    let (tx, _rx) = channel();

    let conn = registry.register("u1".to_string(), tx).await;
    registry.unregister(&conn).await;

    assert_eq!(registry.len().await, 0);
    assert!(registry.is_empty().await);
    assert!(registry.lookup("u1").await.is_none());
    assert!(!registry.is_user_online("u1").await);
    assert!(registry
        .all_active()
        .await
        .iter()
        .all(|c| c.id != conn.id));
}

#[tokio::test]
async fn test_duplicate_registration_keeps_both_connections() {
    let registry = create_registry();
    let (tx1, _rx1) = channel();
    let (tx2, _rx2) = channel();

    let first = registry.register("u1".to_string(), tx1).await;
    let second = registry.register("u1".to_string(), tx2).await;

    // Lookup resolves to the newest connection
    let current = registry.lookup("u1").await.unwrap();
    assert_eq!(current.id, second.id);

    // Both connections stay in the broadcast set until they disconnect
    let snapshot = registry.all_active().await;
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().any(|c| c.id == first.id));
    assert!(snapshot.iter().any(|c| c.id == second.id));
}

#[tokio::test]
async fn test_stale_unregister_does_not_evict_newer_connection() {
    let registry = create_registry();
    let (tx1, _rx1) = channel();
    let (tx2, _rx2) = channel();

    let stale = registry.register("u1".to_string(), tx1).await;
    let newer = registry.register("u1".to_string(), tx2).await;

    // The old connection's disconnect fires after the reconnect
    registry.unregister(&stale).await;

    let current = registry
        .lookup("u1")
        .await
        .expect("newer connection must survive the stale unregister");
    assert_eq!(current.id, newer.id);
    assert!(registry.is_user_online("u1").await);
    assert_eq!(registry.len().await, 1);

    // Unregistering the current connection does clear the lookup
    registry.unregister(&newer).await;
    assert!(registry.lookup("u1").await.is_none());
    assert_eq!(registry.len().await, 0);
}

#[tokio::test]
async fn test_snapshot_never_contains_duplicates_under_churn() {
    let registry = create_registry();
    let mut handles = Vec::new();

    for task in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            for round in 0..50 {
                let (tx, rx) = channel();
                let conn = registry
                    .register(format!("user-{}-{}", task, round), tx)
                    .await;
                tokio::task::yield_now().await;
                registry.unregister(&conn).await;
                drop(rx);
            }
        }));
    }

    // Concurrent readers verify snapshot integrity while writers churn
    for _ in 0..4 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..100 {
                let snapshot = registry.all_active().await;
                let mut ids: Vec<String> =
                    snapshot.iter().map(|c| c.id.clone()).collect();
                let total = ids.len();
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), total, "snapshot contained a duplicate");
                tokio::task::yield_now().await;
            }
        }));
    }

    for handle in handles {
        handle.await.expect("task panicked");
    }

    // Quiescence: every registration was matched by an unregister
    assert_eq!(registry.len().await, 0);
    assert!(registry.all_active().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_registration_with_broadcasts() {
    let registry = create_registry();
    let push = Arc::new(PushService::new(registry.clone()));
    let mut handles = Vec::new();

    // Persistent connections that should survive the churn
    let mut receivers = Vec::new();
    for i in 0..4 {
        let (tx, rx) = channel();
        registry.register(format!("steady-{}", i), tx).await;
        receivers.push(rx);
    }

    for task in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            for round in 0..25 {
                let (tx, rx) = channel();
                let conn = registry
                    .register(format!("churn-{}-{}", task, round), tx)
                    .await;
                tokio::task::yield_now().await;
                registry.unregister(&conn).await;
                drop(rx);
            }
        }));
    }

    for _ in 0..4 {
        let push = push.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..25 {
                push.broadcast("tick").await;
                tokio::task::yield_now().await;
            }
        }));
    }

    for handle in handles {
        handle.await.expect("task panicked");
    }

    // Only the steady connections remain
    assert_eq!(registry.len().await, 4);
    for i in 0..4 {
        assert!(registry.is_user_online(&format!("steady-{}", i)).await);
    }

    // Each steady connection received every broadcast exactly once: 100
    // broadcasts ran to completion before quiescence
    for rx in receivers.iter_mut() {
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 100);
    }
}
