//! Retry attempt counting
//!
//! - A call failing `n` times with a retryable error is attempted
//!   `min(n, max_retries) + 1` times and succeeds iff `n <= max_retries`
//! - Rejected input (HTTP 400) is attempted exactly once

use proptest::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use wa_client::retry::with_retry;
use wa_client::{ClientError, RetryPolicy};

fn api_error(status: u16) -> ClientError {
    ClientError::Api {
        status,
        code: "API_ERROR".to_string(),
        message: "failed".to_string(),
    }
}

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

/// Run a call that fails `failures` times with `status` before succeeding
fn attempts(policy: RetryPolicy, failures: u32, status: u16) -> (u32, bool) {
    let counter = AtomicU32::new(0);
    let result = paused_runtime().block_on(async {
        let calls = &counter;
        with_retry(policy, move || async move {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            if call < failures {
                Err(api_error(status))
            } else {
                Ok(call)
            }
        })
        .await
    });
    (counter.load(Ordering::SeqCst), result.is_ok())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_retryable_failures_bounded_by_policy(
        failures in 0u32..8,
        max_retries in 0u32..5,
        status in prop_oneof![Just(500u16), Just(502), Just(503), Just(429)],
    ) {
        let policy = RetryPolicy::new(max_retries, Duration::from_secs(5));
        let (calls, succeeded) = attempts(policy, failures, status);

        prop_assert_eq!(calls, failures.min(max_retries) + 1);
        prop_assert_eq!(succeeded, failures <= max_retries);
    }

    #[test]
    fn prop_bad_request_attempted_once(failures in 1u32..8, max_retries in 0u32..5) {
        let policy = RetryPolicy::new(max_retries, Duration::from_secs(5));
        let (calls, succeeded) = attempts(policy, failures, 400);

        prop_assert_eq!(calls, 1);
        prop_assert!(!succeeded);
    }
}
