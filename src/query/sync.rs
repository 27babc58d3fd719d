//! Sync-watch state machine.
//!
//! After a manual sync trigger the backend finishes asynchronously; the
//! real completion signal is the sync-status resource, so we poll it on a
//! backoff schedule instead of guessing with a fixed delay. Phases move
//! `Idle -> Syncing -> Done | Failed`; `Idle` reported after `Syncing`
//! was observed also counts as completion, since some backends flip
//! straight back to idle. Transient probe failures are tolerated up to a
//! bound; exhausting the backoff schedule is a timeout, not an error.

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::sync::{SyncProbe, SyncState, SyncStatus};
use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPhase {
    Idle,
    Syncing,
    Done,
    Failed,
}

#[derive(Debug)]
pub enum SyncOutcome {
    Completed(SyncStatus),
    Failed(SyncStatus),
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    /// Total wait before the watch gives up
    pub max_wait: Duration,
    /// Consecutive probe failures tolerated before surfacing the error
    pub max_probe_failures: u32,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(10),
            max_wait: Duration::from_secs(120),
            max_probe_failures: 3,
        }
    }
}

/// Pure transition function, kept separate so the rules are testable
/// without any polling.
pub fn next_phase(current: WatchPhase, status: &SyncStatus) -> WatchPhase {
    match status.status {
        SyncState::Error => WatchPhase::Failed,
        SyncState::Done => WatchPhase::Done,
        _ if status.is_running() => WatchPhase::Syncing,
        SyncState::Idle => {
            // idle after we saw the run start means it finished
            if current == WatchPhase::Syncing {
                WatchPhase::Done
            } else {
                WatchPhase::Idle
            }
        }
        _ => current,
    }
}

/// Poll the sync status until the run completes, fails, or the backoff
/// schedule is exhausted.
pub async fn await_sync_completion(
    probe: &dyn SyncProbe,
    config: &WatchConfig,
    mut on_tick: impl FnMut(WatchPhase),
) -> Result<SyncOutcome, ApiError> {
    let mut policy: ExponentialBackoff = backoff::ExponentialBackoffBuilder::new()
        .with_initial_interval(config.initial_interval)
        .with_max_interval(config.max_interval)
        .with_max_elapsed_time(Some(config.max_wait))
        .build();

    let mut phase = WatchPhase::Idle;
    let mut probe_failures = 0u32;

    loop {
        match probe.probe().await {
            Ok(status) => {
                probe_failures = 0;
                phase = next_phase(phase, &status);
                debug!(?phase, "sync watch tick");
                on_tick(phase);

                match phase {
                    WatchPhase::Done => return Ok(SyncOutcome::Completed(status)),
                    WatchPhase::Failed => return Ok(SyncOutcome::Failed(status)),
                    WatchPhase::Idle | WatchPhase::Syncing => {}
                }
            }
            Err(e) => {
                probe_failures += 1;
                if probe_failures > config.max_probe_failures {
                    return Err(e);
                }
                warn!(error = %e, attempt = probe_failures, "sync status probe failed");
            }
        }

        match policy.next_backoff() {
            Some(delay) => tokio::time::sleep(delay).await,
            None => return Ok(SyncOutcome::TimedOut),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio_test::assert_ok;

    fn status(state: SyncState) -> SyncStatus {
        SyncStatus {
            status: state,
            last_sync: None,
            last_error: None,
            next_scheduled: None,
            in_progress: state == SyncState::Syncing,
        }
    }

    struct ScriptedProbe {
        responses: Mutex<VecDeque<Result<SyncStatus, ApiError>>>,
    }

    impl ScriptedProbe {
        fn new(responses: Vec<Result<SyncStatus, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl SyncProbe for ScriptedProbe {
        async fn probe(&self) -> Result<SyncStatus, ApiError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(status(SyncState::Syncing)))
        }
    }

    fn fast_config() -> WatchConfig {
        WatchConfig {
            initial_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(2),
            max_wait: Duration::from_millis(50),
            max_probe_failures: 2,
        }
    }

    #[test]
    fn test_phase_transitions() {
        // idle before the run starts stays idle
        assert_eq!(
            next_phase(WatchPhase::Idle, &status(SyncState::Idle)),
            WatchPhase::Idle
        );
        // observing the run
        assert_eq!(
            next_phase(WatchPhase::Idle, &status(SyncState::Syncing)),
            WatchPhase::Syncing
        );
        // idle after syncing means done
        assert_eq!(
            next_phase(WatchPhase::Syncing, &status(SyncState::Idle)),
            WatchPhase::Done
        );
        assert_eq!(
            next_phase(WatchPhase::Syncing, &status(SyncState::Error)),
            WatchPhase::Failed
        );
        assert_eq!(
            next_phase(WatchPhase::Idle, &status(SyncState::Done)),
            WatchPhase::Done
        );
    }

    #[tokio::test]
    async fn test_watch_completes_when_run_finishes() {
        let probe = ScriptedProbe::new(vec![
            Ok(status(SyncState::Syncing)),
            Ok(status(SyncState::Syncing)),
            Ok(status(SyncState::Idle)),
        ]);

        let outcome = await_sync_completion(&probe, &fast_config(), |_| {})
            .await
            .unwrap();
        assert!(matches!(outcome, SyncOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_watch_reports_backend_failure() {
        let probe = ScriptedProbe::new(vec![
            Ok(status(SyncState::Syncing)),
            Ok(status(SyncState::Error)),
        ]);

        let outcome = await_sync_completion(&probe, &fast_config(), |_| {})
            .await
            .unwrap();
        assert!(matches!(outcome, SyncOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_watch_tolerates_bounded_probe_failures() {
        let probe = ScriptedProbe::new(vec![
            Err(ApiError::from_response(StatusCode::BAD_GATEWAY, "")),
            Ok(status(SyncState::Syncing)),
            Ok(status(SyncState::Done)),
        ]);

        let outcome = assert_ok!(await_sync_completion(&probe, &fast_config(), |_| {}).await);
        assert!(matches!(outcome, SyncOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_watch_surfaces_persistent_probe_failure() {
        let failures = (0..4)
            .map(|_| Err(ApiError::from_response(StatusCode::BAD_GATEWAY, "")))
            .collect();
        let probe = ScriptedProbe::new(failures);

        let result = await_sync_completion(&probe, &fast_config(), |_| {}).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_watch_times_out_when_run_never_finishes() {
        // the scripted probe falls back to "syncing" forever
        let probe = ScriptedProbe::new(vec![]);

        let outcome = await_sync_completion(&probe, &fast_config(), |_| {})
            .await
            .unwrap();
        assert!(matches!(outcome, SyncOutcome::TimedOut));
    }
}
