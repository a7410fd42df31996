use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::*;
use crate::logic::config::ServiceConfig;
use crate::logic::model::{ChurnLabel, PredictionResult};

fn prediction(probability: f64) -> PredictionResult {
    PredictionResult {
        label: if probability >= 0.5 { ChurnLabel::Churn } else { ChurnLabel::NotChurn },
        probability,
        margin: 0.0,
        threshold: 0.5,
        inference_time_us: 0,
    }
}

#[test]
fn test_three_predictions_in_call_order() {
    let mut history = SessionHistory::new();
    assert!(history.is_empty());

    for p in [0.81, 0.12, 0.55] {
        history.record(&prediction(p));
    }

    assert_eq!(history.len(), 3);
    assert_eq!(history.probabilities(), vec![0.81, 0.12, 0.55]);
    assert_eq!(history.entries()[1].label, ChurnLabel::NotChurn);
    assert!(history.entries()[0].recorded_at <= history.entries()[2].recorded_at);
}

#[test]
fn test_limit_drops_oldest() {
    let mut history = SessionHistory::with_limit(Some(2));
    for p in [0.1, 0.2, 0.3, 0.4] {
        history.record(&prediction(p));
    }
    assert_eq!(history.probabilities(), vec![0.3, 0.4]);
    assert_eq!(history.limit(), Some(2));
}

#[test]
fn test_unbounded_by_default() {
    let mut history = SessionHistory::new();
    for i in 0..500 {
        history.record(&prediction(i as f64 / 500.0));
    }
    assert_eq!(history.len(), 500);
    history.clear();
    assert!(history.is_empty());
}

#[test]
fn test_store_sessions_are_isolated() {
    let store = SessionStore::new(None);
    let a = store.create();
    let b = store.create();
    assert_ne!(a.id, b.id);
    assert_eq!(store.len(), 2);

    store.get(&a.id).unwrap().lock().record(&prediction(0.9));
    store.get(&a.id).unwrap().lock().record(&prediction(0.8));
    store.get(&b.id).unwrap().lock().record(&prediction(0.1));

    assert_eq!(store.get(&a.id).unwrap().lock().probabilities(), vec![0.9, 0.8]);
    assert_eq!(store.get(&b.id).unwrap().lock().probabilities(), vec![0.1]);
    assert_eq!(store.info(&a.id).unwrap().created_at, a.created_at);
}

#[test]
fn test_store_remove() {
    let store = SessionStore::default();
    let session = store.create();
    assert!(store.remove(&session.id));
    assert!(!store.remove(&session.id));
    assert!(store.get(&session.id).is_none());
    assert!(store.is_empty());
}

#[test]
fn test_store_applies_history_limit() {
    let store = SessionStore::new(Some(1));
    let session = store.create();
    let handle = store.get(&session.id).unwrap();
    handle.lock().record(&prediction(0.2));
    handle.lock().record(&prediction(0.7));
    assert_eq!(handle.lock().probabilities(), vec![0.7]);
}

#[test]
fn test_concurrent_appends_to_one_session() {
    let store = Arc::new(SessionStore::new(None));
    let id = store.create().id;

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..25 {
                    store.get(&id).unwrap().lock().record(&prediction(0.5));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(store.get(&id).unwrap().lock().len(), 200);
}

#[test]
fn test_idle_session_is_evicted() {
    let store = SessionStore::new(None).with_idle_ttl(Some(Duration::from_secs(60)));
    let session = store.create();

    assert_eq!(store.evict_idle(Instant::now()), 0);
    assert_eq!(store.len(), 1);

    assert_eq!(store.evict_idle(Instant::now() + Duration::from_secs(61)), 1);
    assert!(store.get(&session.id).is_none());
    assert!(store.is_empty());
}

#[test]
fn test_expired_session_is_gone_on_get() {
    let store = SessionStore::new(None).with_idle_ttl(Some(Duration::from_millis(10)));
    let session = store.create();
    thread::sleep(Duration::from_millis(40));

    assert!(store.info(&session.id).is_none());
    assert!(store.get(&session.id).is_none());
    assert!(store.is_empty());
}

#[test]
fn test_get_keeps_session_alive() {
    let ttl = Duration::from_secs(60);
    let store = SessionStore::new(None).with_idle_ttl(Some(ttl));
    let used = store.create();
    let idle = store.create();
    let before = Instant::now();

    thread::sleep(Duration::from_millis(5));
    assert!(store.get(&used.id).is_some());

    assert_eq!(store.evict_idle(before + ttl + Duration::from_millis(1)), 1);
    assert!(store.get(&used.id).is_some());
    assert!(store.get(&idle.id).is_none());
}

#[test]
fn test_create_sweeps_expired_sessions() {
    let store = SessionStore::new(None).with_idle_ttl(Some(Duration::from_millis(10)));
    for _ in 0..3 {
        store.create();
    }
    thread::sleep(Duration::from_millis(40));

    let fresh = store.create();
    assert_eq!(store.len(), 1);
    assert!(store.get(&fresh.id).is_some());
}

#[test]
fn test_capacity_evicts_least_recently_used() {
    let store = SessionStore::new(None).with_max_sessions(Some(2));
    let a = store.create();
    thread::sleep(Duration::from_millis(2));
    let b = store.create();
    thread::sleep(Duration::from_millis(2));
    assert!(store.get(&a.id).is_some());
    thread::sleep(Duration::from_millis(2));

    let c = store.create();
    assert_eq!(store.len(), 2);
    assert!(store.get(&a.id).is_some());
    assert!(store.get(&b.id).is_none());
    assert!(store.get(&c.id).is_some());
}

#[test]
fn test_store_from_config() {
    let config = ServiceConfig::default().with_sessions(None, Some(3));
    let store = SessionStore::from_config(&config);
    assert_eq!(store.idle_ttl(), None);
    assert_eq!(store.max_sessions(), Some(3));

    for _ in 0..10 {
        store.create();
    }
    assert_eq!(store.len(), 3);

    let store = SessionStore::new(None).with_max_sessions(Some(0));
    assert_eq!(store.max_sessions(), None);
}
