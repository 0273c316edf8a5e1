// tests/waiter.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use syncgraph::engine::SyncContext;
use syncgraph::exec::{Acceptor, WaitError, Waiter};

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[tokio::test]
async fn returns_first_accepted_observation() {
    init_tracing();
    let calls = counter();
    let c = Arc::clone(&calls);

    let mut waiter = Waiter::new(move || c.fetch_add(1, Ordering::SeqCst) + 1)
        .acceptor(|n: &usize| *n == 3)
        .max_attempts(10)
        .delay(Duration::from_millis(1));

    let got = with_timeout(waiter.wait(&SyncContext::new())).await;
    assert_eq!(got, Ok(3));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausts_after_max_attempts_without_match() {
    let calls = counter();
    let c = Arc::clone(&calls);

    let mut waiter = Waiter::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
        "CREATING"
    })
    .acceptor(|s: &&str| *s == "ACTIVE")
    .max_attempts(3)
    .delay(Duration::from_millis(1));

    let err = with_timeout(waiter.wait(&SyncContext::new()))
        .await
        .unwrap_err();

    assert_eq!(err, WaitError::Exhausted { attempts: 3 });
    assert!(err.is_exhausted());
    assert_eq!(err.to_string(), "exceeded wait attempts (3)");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn no_acceptors_means_never_satisfied() {
    let mut waiter = Waiter::new(|| 1u8)
        .max_attempts(2)
        .delay(Duration::from_millis(1));

    let err = waiter.wait(&SyncContext::new()).await.unwrap_err();
    assert_eq!(err.attempts(), 2);
}

#[tokio::test]
async fn any_acceptor_may_match() {
    let mut waiter = Waiter::new(|| "FAILED")
        .with_acceptors(vec![
            Acceptor::new(|s: &&str| *s == "ACTIVE"),
            Acceptor::new(|s: &&str| *s == "FAILED"),
        ])
        .delay(Duration::from_millis(1));

    assert_eq!(waiter.wait(&SyncContext::new()).await, Ok("FAILED"));
}

#[tokio::test]
async fn cancellation_during_action_stops_after_one_attempt() {
    init_tracing();
    let ctx = SyncContext::new();
    let calls = counter();

    let c = Arc::clone(&calls);
    let cancel = ctx.clone();
    let mut waiter = Waiter::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
        cancel.cancel();
        false
    })
    .acceptor(|done: &bool| *done)
    .max_attempts(50)
    // Long enough that only cancellation can end the wait in time.
    .delay(Duration::from_secs(60));

    let err = with_timeout(waiter.wait(&ctx)).await.unwrap_err();

    assert_eq!(err, WaitError::Cancelled { attempts: 1 });
    assert!(err.is_cancelled());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancellation_during_first_delay_returns_promptly() {
    init_tracing();
    let ctx = SyncContext::new();
    let calls = counter();

    let c = Arc::clone(&calls);
    let mut waiter = Waiter::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
        "CREATING"
    })
    .acceptor(|s: &&str| *s == "ACTIVE")
    .max_attempts(50)
    .delay(Duration::from_secs(60));

    let canceller = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ctx.cancel();
        })
    };

    let err = with_timeout(waiter.wait(&ctx)).await.unwrap_err();
    canceller.await.unwrap();

    assert_eq!(err, WaitError::Cancelled { attempts: 1 });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn already_cancelled_context_still_runs_action_once() {
    let ctx = SyncContext::new();
    ctx.cancel();

    let mut waiter = Waiter::new(|| "ACTIVE").acceptor(|s: &&str| *s == "ACTIVE");
    assert_eq!(waiter.wait(&ctx).await, Ok("ACTIVE"));

    let mut waiter = Waiter::new(|| "CREATING").acceptor(|s: &&str| *s == "ACTIVE");
    let err = waiter.wait(&ctx).await.unwrap_err();
    assert_eq!(err, WaitError::Cancelled { attempts: 1 });
}

#[tokio::test]
async fn child_context_follows_parent_cancellation() {
    let parent = SyncContext::new();
    let child = parent.child();

    let waiting = tokio::spawn(async move {
        let mut waiter = Waiter::new(|| 0)
            .acceptor(|n: &i32| *n == 1)
            .max_attempts(1000)
            .delay(Duration::from_millis(20));
        waiter.wait(&child).await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    parent.cancel();

    let result = with_timeout(waiting).await.unwrap();
    assert!(matches!(result, Err(WaitError::Cancelled { .. })));
}

#[test]
fn zero_max_attempts_is_raised_to_one() {
    let waiter = Waiter::new(|| ()).max_attempts(0);
    assert!(format!("{waiter:?}").contains("max_attempts: 1"));
}
