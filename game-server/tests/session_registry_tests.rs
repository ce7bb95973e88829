
use futures::future::join_all;
use game_server::session_registry::SessionRegistry;
use game_server::word_oracle::OracleError;
use std::sync::Arc;
use test_helpers::*;

fn registry() -> (SessionRegistry, Arc<ScriptedOracle>) {
    let oracle = Arc::new(ScriptedOracle::standard());
    (SessionRegistry::new(oracle.clone()), oracle)
}

#[tokio::test]
async fn test_creates_session_on_first_use() {
    let (registry, oracle) = registry();
    assert!(registry.is_empty());

    let session = registry.get_or_create("alice", test_day()).await.unwrap();
    let session = session.lock().await;

    assert_eq!(session.secret_word(), SECRET);
    assert_eq!(session.guess_count(), 0);
    assert_eq!(session.created_on(), test_day());
    assert_eq!(registry.len(), 1);
    assert_eq!(oracle.word_requests(), 1);
}

#[tokio::test]
async fn test_same_key_returns_same_session() {
    let (registry, oracle) = registry();

    let first = registry.get_or_create("alice", test_day()).await.unwrap();
    first.lock().await.submit_guess("slate", true);

    let second = registry.get_or_create("alice", test_day()).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.lock().await.guess_count(), 1);
    assert_eq!(oracle.word_requests(), 1);
}

#[tokio::test]
async fn test_concurrent_creation_yields_one_session() {
    let (registry, _oracle) = registry();
    let registry = Arc::new(registry);

    let handles = (0..32).map(|_| {
        let registry = registry.clone();
        tokio::spawn(async move { registry.get_or_create("alice", test_day()).await })
    });

    let sessions: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|result| result.unwrap().unwrap())
        .collect();

    assert_eq!(registry.len(), 1);
    assert!(sessions.iter().all(|s| Arc::ptr_eq(s, &sessions[0])));
}

#[tokio::test]
async fn test_different_keys_are_independent() {
    let (registry, _oracle) = registry();

    let alice = registry.get_or_create("alice", test_day()).await.unwrap();
    let bob = registry.get_or_create("bob", test_day()).await.unwrap();

    assert!(!Arc::ptr_eq(&alice, &bob));
    alice.lock().await.submit_guess("slate", true);
    assert_eq!(bob.lock().await.guess_count(), 0);
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn test_stale_session_is_replaced() {
    let (registry, _oracle) = registry();

    let old = registry.get_or_create("alice", previous_day()).await.unwrap();
    old.lock().await.submit_guess(SECRET, true);

    let fresh = registry.get_or_create("alice", test_day()).await.unwrap();
    assert!(!Arc::ptr_eq(&old, &fresh));

    let fresh = fresh.lock().await;
    assert_eq!(fresh.created_on(), test_day());
    assert!(!fresh.is_terminal());
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_evict_stale_and_remove() {
    let (registry, _oracle) = registry();

    registry.get_or_create("old-1", previous_day()).await.unwrap();
    registry.get_or_create("old-2", previous_day()).await.unwrap();
    registry.get_or_create("today", test_day()).await.unwrap();

    assert_eq!(registry.evict_stale(test_day()), 2);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.evict_stale(test_day()), 0);

    assert!(registry.remove("today"));
    assert!(!registry.remove("today"));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_oracle_outage_creates_nothing() {
    let (registry, oracle) = registry();
    oracle.set_unavailable(true);

    let result = registry.get_or_create("alice", test_day()).await;

    assert!(matches!(result, Err(OracleError::WordOracleUnavailable(_))));
    assert!(registry.is_empty());
}
