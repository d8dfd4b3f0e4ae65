//! Coalescing reminder sync
//!
//! Bill edits request a schedule rebuild. At most one rebuild runs at a
//! time; requests that arrive while one is running collapse into a single
//! trailing rerun, started as soon as the current one finishes. A visible
//! request that gets coalesced waits for that rerun and reports its result.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};

use super::scheduler::{NotificationScheduler, SyncReport};

/// How a sync failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Background resync after an edit: failures are logged and swallowed
    Silent,
    /// User asked for it: failures are returned
    Visible,
}

/// What a sync request led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The sync this request asked for ran; for the caller that started the
    /// run this is the last rerun's report
    Completed(SyncReport),
    /// A sync was already running; it will run once more when done
    Coalesced,
    /// A silent sync failed; the error was logged
    Suppressed,
}

#[derive(Debug, Default)]
struct SyncState {
    running: bool,
    rerun: bool,
    /// Sequence number of the last run started
    started: u64,
    /// Sequence number of the last run whose result was published
    published: u64,
}

/// Result of one numbered run
#[derive(Debug, Clone)]
struct RunResult {
    run: u64,
    result: LedgerResult<SyncReport>,
}

/// Serializes and coalesces calls to a [`NotificationScheduler`]
pub struct ScheduleSync {
    scheduler: Arc<dyn NotificationScheduler>,
    state: Mutex<SyncState>,
    results: watch::Sender<Option<RunResult>>,
    runs: AtomicUsize,
}

impl ScheduleSync {
    pub fn new(scheduler: Arc<dyn NotificationScheduler>) -> Self {
        let (results, _) = watch::channel(None);
        Self {
            scheduler,
            state: Mutex::new(SyncState::default()),
            results,
            runs: AtomicUsize::new(0),
        }
    }

    /// Number of scheduler calls made so far
    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Whether a sync is currently in flight
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Request a schedule rebuild.
    ///
    /// If none is running, this call runs it and keeps running while reruns
    /// are pending. Otherwise it marks a rerun: a silent request returns
    /// [`SyncOutcome::Coalesced`] immediately, a visible one waits for the
    /// rerun and returns its report or error.
    pub async fn request(&self, mode: SyncMode) -> LedgerResult<SyncOutcome> {
        let waiting_for = {
            let mut state = self.lock();
            if state.running {
                state.rerun = true;
                debug!(?mode, "sync in flight, rerun queued");
                match mode {
                    SyncMode::Silent => return Ok(SyncOutcome::Coalesced),
                    SyncMode::Visible => Some((state.started + 1, self.results.subscribe())),
                }
            } else {
                state.running = true;
                state.started += 1;
                None
            }
        };

        if let Some((run, results)) = waiting_for {
            return self.wait_for_run(run, results).await.map(SyncOutcome::Completed);
        }

        let guard = RunGuard { sync: self };
        let mut result = self.run_once().await;
        while guard.take_rerun() {
            debug!("running queued sync");
            result = self.run_once().await;
        }
        drop(guard);

        match (result, mode) {
            (Ok(report), _) => Ok(SyncOutcome::Completed(report)),
            (Err(e), SyncMode::Visible) => Err(e),
            (Err(e), SyncMode::Silent) => {
                warn!(error = %e, "background reminder sync failed");
                Ok(SyncOutcome::Suppressed)
            }
        }
    }

    async fn wait_for_run(
        &self,
        run: u64,
        mut results: watch::Receiver<Option<RunResult>>,
    ) -> LedgerResult<SyncReport> {
        let published = results
            .wait_for(|r| r.as_ref().is_some_and(|r| r.run >= run))
            .await
            .map_err(|e| LedgerError::Sync(e.to_string()))?
            .clone();
        match published {
            Some(r) => r.result,
            None => Err(LedgerError::Sync("sync result missing".into())),
        }
    }

    async fn run_once(&self) -> LedgerResult<SyncReport> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let result = self.scheduler.sync_schedules().await;
        match &result {
            Ok(report) => info!(
                scheduled = report.scheduled,
                cancelled = report.cancelled,
                "reminders synced"
            ),
            Err(e) => debug!(error = %e, "reminder sync failed"),
        }
        self.publish(result.clone());
        result
    }

    fn publish(&self, result: LedgerResult<SyncReport>) {
        let run = {
            let mut state = self.lock();
            state.published = state.started;
            state.started
        };
        self.results.send_replace(Some(RunResult { run, result }));
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the running flag even if the request future is dropped mid-run
struct RunGuard<'a> {
    sync: &'a ScheduleSync,
}

impl RunGuard<'_> {
    /// Claim a pending rerun, numbering it under the same lock
    fn take_rerun(&self) -> bool {
        let mut state = self.sync.lock();
        let rerun = std::mem::take(&mut state.rerun);
        if rerun {
            state.started += 1;
        }
        rerun
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let abandoned = {
            let mut state = self.sync.lock();
            let last = state.started + u64::from(state.rerun);
            state.running = false;
            state.rerun = false;
            state.started = last;
            (state.published < last).then(|| {
                state.published = last;
                last
            })
        };
        // waiters on a run that never finished must not hang
        if let Some(run) = abandoned {
            self.sync.results.send_replace(Some(RunResult {
                run,
                result: Err(LedgerError::Sync("reminder sync was interrupted".into())),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    /// Scheduler whose calls block until the test hands out permits
    struct GatedScheduler {
        gate: Semaphore,
        started: AtomicUsize,
        /// Calls numbered from here on fail
        fail_from: Option<usize>,
    }

    impl GatedScheduler {
        fn new() -> Self {
            Self {
                gate: Semaphore::new(0),
                started: AtomicUsize::new(0),
                fail_from: None,
            }
        }

        fn failing_from(call: usize) -> Self {
            Self {
                fail_from: Some(call),
                ..Self::new()
            }
        }

        async fn wait_started(&self) {
            while self.started.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl NotificationScheduler for GatedScheduler {
        async fn sync_schedules(&self) -> LedgerResult<SyncReport> {
            let n = self.started.fetch_add(1, Ordering::SeqCst) + 1;
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| LedgerError::Sync(e.to_string()))?;
            permit.forget();
            if self.fail_from.is_some_and(|from| n >= from) {
                return Err(LedgerError::Sync(format!("call {} failed", n)));
            }
            Ok(SyncReport {
                scheduled: n,
                ..SyncReport::default()
            })
        }
    }

    struct FailingScheduler;

    #[async_trait]
    impl NotificationScheduler for FailingScheduler {
        async fn sync_schedules(&self) -> LedgerResult<SyncReport> {
            Err(LedgerError::Sync("scheduler offline".into()))
        }
    }

    #[tokio::test]
    async fn test_requests_during_run_collapse_into_one_rerun() {
        let scheduler = Arc::new(GatedScheduler::new());
        let sync = ScheduleSync::new(scheduler.clone());

        let first = sync.request(SyncMode::Visible);
        let others = async {
            while scheduler.started.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            let a = sync.request(SyncMode::Silent).await.unwrap();
            let b = sync.request(SyncMode::Silent).await.unwrap();
            scheduler.gate.add_permits(10);
            (a, b)
        };

        let (first, (a, b)) = tokio::join!(first, others);

        assert_eq!(a, SyncOutcome::Coalesced);
        assert_eq!(b, SyncOutcome::Coalesced);
        match first.unwrap() {
            SyncOutcome::Completed(report) => assert_eq!(report.scheduled, 2),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sync.run_count(), 2);
        assert_eq!(scheduler.started.load(Ordering::SeqCst), 2);
        assert!(!sync.is_running());
    }

    #[tokio::test]
    async fn test_sequential_requests_each_run() {
        let scheduler = Arc::new(GatedScheduler::new());
        scheduler.gate.add_permits(10);
        let sync = ScheduleSync::new(scheduler.clone());

        for _ in 0..3 {
            let outcome = sync.request(SyncMode::Visible).await.unwrap();
            assert!(matches!(outcome, SyncOutcome::Completed(_)));
        }
        assert_eq!(sync.run_count(), 3);
    }

    #[test_log::test(tokio::test)]
    async fn test_silent_failure_is_suppressed() {
        let sync = ScheduleSync::new(Arc::new(FailingScheduler));
        let outcome = sync.request(SyncMode::Silent).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Suppressed);
        assert!(!sync.is_running());
    }

    #[tokio::test]
    async fn test_visible_failure_is_returned() {
        let sync = ScheduleSync::new(Arc::new(FailingScheduler));
        let err = sync.request(SyncMode::Visible).await.unwrap_err();
        assert!(matches!(err, LedgerError::Sync(_)));

        // state is released so the next request runs again
        assert!(sync.request(SyncMode::Visible).await.is_err());
        assert_eq!(sync.run_count(), 2);
    }

    #[tokio::test]
    async fn test_visible_request_during_silent_run_gets_rerun_error() {
        let scheduler = Arc::new(GatedScheduler::failing_from(2));
        let sync = ScheduleSync::new(scheduler.clone());

        let background = sync.request(SyncMode::Silent);
        let user = async {
            scheduler.wait_started().await;
            scheduler.gate.add_permits(10);
            sync.request(SyncMode::Visible).await
        };

        let (background, user) = tokio::join!(background, user);

        assert_eq!(background.unwrap(), SyncOutcome::Suppressed);
        let err = user.unwrap_err();
        assert!(matches!(err, LedgerError::Sync(ref m) if m == "call 2 failed"));
        assert_eq!(sync.run_count(), 2);
        assert!(!sync.is_running());
    }

    #[tokio::test]
    async fn test_visible_request_during_run_gets_rerun_report() {
        let scheduler = Arc::new(GatedScheduler::new());
        let sync = ScheduleSync::new(scheduler.clone());

        let background = sync.request(SyncMode::Silent);
        let user = async {
            scheduler.wait_started().await;
            let queued = sync.request(SyncMode::Silent).await.unwrap();
            scheduler.gate.add_permits(10);
            (queued, sync.request(SyncMode::Visible).await)
        };

        let (background, (queued, user)) = tokio::join!(background, user);

        assert_eq!(queued, SyncOutcome::Coalesced);
        assert!(matches!(background.unwrap(), SyncOutcome::Completed(_)));
        match user.unwrap() {
            SyncOutcome::Completed(report) => assert_eq!(report.scheduled, 2),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sync.run_count(), 2);
    }

    #[tokio::test]
    async fn test_waiting_request_released_when_run_is_dropped() {
        let scheduler = Arc::new(GatedScheduler::new());
        let sync = ScheduleSync::new(scheduler.clone());

        let mut background = Box::pin(sync.request(SyncMode::Silent));
        tokio::select! {
            _ = &mut background => panic!("run should be blocked"),
            _ = scheduler.wait_started() => {}
        }

        let user = sync.request(SyncMode::Visible);
        tokio::pin!(user);
        tokio::select! {
            _ = &mut user => panic!("visible request should wait"),
            _ = tokio::task::yield_now() => {}
        }

        drop(background);
        let err = user.await.unwrap_err();
        assert!(matches!(err, LedgerError::Sync(_)));
        assert!(!sync.is_running());
    }
}
