//! Contract tests for the retry policy
//!
//! Verified here:
//! - `max_attempts` counts total invocations, with a fixed delay between them
//! - success stops the loop immediately, whether `Unchanged` or `Updated`
//! - only the last failure is surfaced after exhaustion
//! - non-transient failures short-circuit without further attempts

use dyndns_core::{Error, Reconciliation, RetryPolicy};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn unchanged() -> Reconciliation {
    Reconciliation::Unchanged {
        ip: Ipv4Addr::new(10, 0, 0, 1),
    }
}

#[tokio::test]
async fn fails_twice_then_succeeds_within_budget() {
    let calls = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(3, Duration::from_millis(1));

    let counter = Arc::clone(&calls);
    let outcome = policy
        .run(move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(Error::network("transient outage"))
                } else {
                    Ok(unchanged())
                }
            }
        })
        .await;

    assert!(outcome.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhaustion_surfaces_only_the_last_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(3, Duration::from_millis(1));

    let counter = Arc::clone(&calls);
    let err = policy
        .run(move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                // Distinguishable failures per attempt; only the final one
                // may surface.
                Err::<Reconciliation, _>(Error::registry_server(500, format!("attempt {}", n + 1)))
            }
        })
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match err {
        Error::RegistryServer { message, .. } => assert_eq!(message, "attempt 3"),
        other => panic!("expected RegistryServer, got {:?}", other),
    }
}

#[tokio::test]
async fn success_stops_immediately() {
    let calls = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(5, Duration::from_millis(1));

    let counter = Arc::clone(&calls);
    let outcome = policy
        .run(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Reconciliation::Updated {
                    previous_ip: Ipv4Addr::new(1, 1, 1, 1),
                    new_ip: Ipv4Addr::new(2, 2, 2, 2),
                })
            }
        })
        .await;

    assert!(outcome.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_transient_failure_short_circuits() {
    for err_fn in [
        (|| Error::Unauthorized) as fn() -> Error,
        || Error::forbidden("myhome"),
        || Error::not_found("myhome"),
    ] {
        let calls = Arc::new(AtomicUsize::new(0));
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let counter = Arc::clone(&calls);
        let err = policy
            .run(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<Reconciliation, _>(err_fn())
                }
            })
            .await
            .unwrap_err();

        assert!(!err.is_transient());
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "non-transient failure must not be retried"
        );
    }
}

#[tokio::test]
async fn zero_attempt_budget_is_clamped_to_one() {
    let calls = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(0, Duration::ZERO);
    assert_eq!(policy.max_attempts(), 1);

    let counter = Arc::clone(&calls);
    let outcome = policy
        .run(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(unchanged())
            }
        })
        .await;

    assert!(outcome.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
