use gen_actor::{args, ActorClient, ActorError, ActorSystem, ExitReason, StartOptions};
use kv_sample::kv_server::{self, KvError};
use kv_sample::lifecycle::{KvSystem, COUNTER_NAME};
use kv_sample::model::Store;

/// Full end-to-end test with the real actors.
#[tokio::test]
async fn test_kv_scenario() {
    let system = KvSystem::new().expect("Failed to start system");
    let kv = &system.kv_client;

    assert_eq!(kv.put("a", 1).await.unwrap(), None);
    assert_eq!(kv.get("a").await.unwrap(), Some(1));
    assert_eq!(kv.get("b").await.unwrap(), None);

    system.shutdown().await;
}

#[tokio::test]
async fn test_writes_reads_and_casts() {
    let system = KvSystem::new().unwrap();
    let kv = &system.kv_client;

    kv.put("a", 1).await.unwrap();
    kv.put("b", 2).await.unwrap();
    assert_eq!(kv.put("a", 10).await.unwrap(), Some(1));
    assert_eq!(kv.len().await.unwrap(), 2);

    kv.delete("b").unwrap();
    kv.delete("never-set").unwrap();
    assert_eq!(kv.get("b").await.unwrap(), None);
    assert_eq!(kv.require("a").await.unwrap(), 10);
    assert_eq!(
        kv.require("b").await,
        Err(KvError::NotFound("b".to_string()))
    );

    let expected: Store = [("a", 10)].into_iter().collect();
    assert_eq!(kv.snapshot().await.unwrap(), expected);

    kv.clear().unwrap();
    assert_eq!(kv.len().await.unwrap(), 0);

    system.shutdown().await;
}

#[tokio::test]
async fn test_empty_key_is_rejected_by_client() {
    let system = KvSystem::new().unwrap();
    assert_eq!(
        system.kv_client.put("", 1).await,
        Err(KvError::InvalidKey(String::new()))
    );
    assert_eq!(system.kv_client.len().await.unwrap(), 0);
    system.shutdown().await;
}

#[tokio::test]
async fn test_counter_through_registry() {
    let system = KvSystem::new().unwrap();
    let counter = &system.counter_client;

    counter.increment().unwrap();
    counter.increment().unwrap();
    assert_eq!(counter.increment_by(3).await.unwrap(), 5);
    counter.reset().unwrap();
    assert_eq!(counter.value().await.unwrap(), 0);

    let found = system.system().whereis::<i64>(COUNTER_NAME).unwrap();
    assert_eq!(found.id(), counter.handle().id());
    assert_eq!(
        system.system().registered(),
        vec![COUNTER_NAME.to_string(), "kv_server".to_string()]
    );

    system.shutdown().await;
}

#[tokio::test]
async fn test_second_system_cannot_take_registered_names() {
    let actors = ActorSystem::new();
    let system = KvSystem::with_system(actors.clone()).unwrap();

    let err = KvSystem::with_system(actors.clone()).err().unwrap();
    assert_eq!(
        err,
        KvError::from(ActorError::StartError {
            name: "kv_server".to_string()
        })
    );

    system.shutdown().await;
    assert!(actors.registered().is_empty());
}

#[tokio::test]
async fn test_client_stop_reports_exit_reason() {
    let system = KvSystem::new().unwrap();
    let kv = system.kv_client.clone();

    kv.put("a", 1).await.unwrap();
    assert_eq!(kv.stop().await.unwrap(), ExitReason::Stopped);
    assert!(!kv.is_alive());
    assert!(matches!(
        kv.get("a").await,
        Err(KvError::ActorCommunicationError(_))
    ));

    // Nothing left to stop.
    system.shutdown().await;
}

#[tokio::test]
async fn test_unhandled_call_terminates_server() {
    let (kind, _) = kv_server::define().unwrap();
    let handle = ActorSystem::new()
        .start(&kind, StartOptions::new())
        .unwrap();

    let result = handle.call("put", args!["a".to_string()]).await;
    assert!(matches!(
        result,
        Err(ActorError::UnhandledMessage { ref operation, arity: 1 }) if operation == "put"
    ));
    assert_eq!(
        handle.terminated().await,
        ExitReason::UnhandledMessage {
            operation: "put".to_string(),
            arity: 1,
        }
    );
}

#[tokio::test]
async fn test_explicit_initial_state() {
    let (kind, operations) = kv_server::define().unwrap();
    let seeded: Store = [("x", 7)].into_iter().collect();
    let handle = ActorSystem::new()
        .start(&kind, StartOptions::new().state(seeded))
        .unwrap();

    assert_eq!(
        operations.get.call(&handle, ("x".to_string(),)).await.unwrap(),
        Some(7)
    );
}
