use gen_actor::mock::MockActor;
use gen_actor::{ActorClient, ActorError, ExitReason};
use kv_sample::clients::{CounterClient, KvClient};
use kv_sample::kv_server::{self, KvError};
use kv_sample::model::Store;

/// Client logic against a scripted actor: no server is started.
#[tokio::test]
async fn test_kv_client_with_mocked_server() {
    let mut mock = MockActor::<Store>::new();
    mock.expect_call("put").return_ok(None::<i64>);
    mock.expect_call("get").return_ok(Some(1i64));
    mock.expect_cast("delete");
    mock.expect_call("get").return_ok(None::<i64>);

    let (_, operations) = kv_server::define().unwrap();
    let client = KvClient::new(mock.handle(), operations);

    assert_eq!(client.put("a", 1).await.unwrap(), None);
    assert_eq!(client.get("a").await.unwrap(), Some(1));
    client.delete("a").unwrap();
    assert_eq!(
        client.require("a").await,
        Err(KvError::NotFound("a".to_string()))
    );

    mock.verify().await;
}

#[tokio::test]
async fn test_actor_errors_are_mapped() {
    let mut mock = MockActor::<Store>::new();
    mock.expect_call("len").return_err(ActorError::MailboxFull);

    let (_, operations) = kv_server::define().unwrap();
    let client = KvClient::new(mock.handle(), operations);

    assert_eq!(
        client.len().await,
        Err(KvError::ActorCommunicationError("Mailbox full".to_string()))
    );
    mock.verify().await;
}

#[tokio::test]
async fn test_wrong_reply_type_is_reported() {
    let mut mock = MockActor::<i64>::new();
    mock.expect_call("value").return_ok("not a number");

    let client = CounterClient::new(mock.handle());
    assert!(matches!(
        client.value().await,
        Err(KvError::ActorCommunicationError(_))
    ));
}

#[tokio::test]
async fn test_invalid_key_never_reaches_the_actor() {
    let mock = MockActor::<Store>::new();
    let (_, operations) = kv_server::define().unwrap();
    let client = KvClient::new(mock.handle(), operations);

    assert!(matches!(
        client.put("", 3).await,
        Err(KvError::InvalidKey(_))
    ));
    assert_eq!(client.stop().await.unwrap(), ExitReason::Stopped);
}
