//! Retry/refresh controller.
//!
//! Wraps a fetch source with the client-visible staleness policy: bounded
//! retries on transport failure, a watchdog refetch after an empty result,
//! manual retry with a cache-busting token, and last-writer-by-token
//! supersession of results that resolve out of order. One controller per
//! fetch subject; books and authors never share tokens or caches.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::FetchConfig;
use crate::models::{author::AuthorRecord, book::BookRecord};
use crate::notify::Notifier;
use crate::services::catalog::{CatalogService, DataSource, FetchOutcome};

/// Source of fetch cycles driven by a controller.
#[async_trait]
pub trait Fetch<T>: Send + Sync {
    async fn fetch(&self) -> FetchOutcome<T>;
}

#[async_trait]
impl Fetch<BookRecord> for CatalogService {
    async fn fetch(&self) -> FetchOutcome<BookRecord> {
        self.fetch_books().await
    }
}

#[async_trait]
impl Fetch<AuthorRecord> for CatalogService {
    async fn fetch(&self) -> FetchOutcome<AuthorRecord> {
        self.fetch_authors().await
    }
}

/// Retry/staleness policy for one fetch subject.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub watchdog_delay: Duration,
    pub cache_ttl: Duration,
}

impl From<&FetchConfig> for RefreshPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            watchdog_delay: Duration::from_millis(config.watchdog_delay_ms),
            cache_ttl: Duration::from_millis(config.cache_ttl_ms),
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

/// Observable state of one fetch subject.
#[derive(Debug)]
pub enum FetchPhase<T> {
    Idle,
    Loading,
    Ready(Arc<FetchOutcome<T>>),
}

impl<T> Clone for FetchPhase<T> {
    fn clone(&self) -> Self {
        match self {
            FetchPhase::Idle => FetchPhase::Idle,
            FetchPhase::Loading => FetchPhase::Loading,
            FetchPhase::Ready(outcome) => FetchPhase::Ready(outcome.clone()),
        }
    }
}

impl<T> FetchPhase<T> {
    pub fn outcome(&self) -> Option<Arc<FetchOutcome<T>>> {
        match self {
            FetchPhase::Ready(outcome) => Some(outcome.clone()),
            _ => None,
        }
    }
}

/// Highest result applied so far, with the token that produced it.
struct Applied<T> {
    token: u64,
    at: Instant,
    outcome: Arc<FetchOutcome<T>>,
}

struct Inner<T> {
    /// Current refetch token. Incrementing it is the only way to force a
    /// fresh cycle past the result cache.
    token: u64,
    applied: Option<Applied<T>>,
    watchdog: Option<JoinHandle<()>>,
    in_flight: Vec<JoinHandle<()>>,
    torn_down: bool,
}

struct Shared<T> {
    subject: &'static str,
    fetcher: Arc<dyn Fetch<T>>,
    notifier: Arc<dyn Notifier>,
    policy: RefreshPolicy,
    state: watch::Sender<FetchPhase<T>>,
    inner: Mutex<Inner<T>>,
}

pub struct RefreshController<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + Sync + 'static> RefreshController<T> {
    pub fn new(
        subject: &'static str,
        fetcher: Arc<dyn Fetch<T>>,
        notifier: Arc<dyn Notifier>,
        policy: RefreshPolicy,
    ) -> Self {
        let (state, _) = watch::channel(FetchPhase::Idle);
        Self {
            shared: Arc::new(Shared {
                subject,
                fetcher,
                notifier,
                policy,
                state,
                inner: Mutex::new(Inner {
                    token: 0,
                    applied: None,
                    watchdog: None,
                    in_flight: Vec::new(),
                    torn_down: false,
                }),
            }),
        }
    }

    /// Current phase without touching the store.
    pub fn current(&self) -> FetchPhase<T> {
        self.shared.state.borrow().clone()
    }

    /// Watch the subject's phase transitions.
    pub fn subscribe(&self) -> watch::Receiver<FetchPhase<T>> {
        self.shared.state.subscribe()
    }

    /// Current refetch token.
    pub fn token(&self) -> u64 {
        self.shared.inner.lock().unwrap().token
    }

    /// Records for the current token, from cache when fresh enough,
    /// otherwise via a full fetch cycle.
    pub async fn records(&self) -> Arc<FetchOutcome<T>> {
        let token = {
            let inner = self.shared.inner.lock().unwrap();
            if let Some(applied) = &inner.applied {
                if applied.token == inner.token
                    && applied.at.elapsed() < self.shared.policy.cache_ttl
                {
                    return applied.outcome.clone();
                }
            }
            inner.token
        };
        Shared::run_cycle(self.shared.clone(), token).await
    }

    /// Manual retry: bump the token and kick off a background cycle.
    /// Returns the new token.
    pub fn retry(&self) -> u64 {
        let token = self.shared.bump_token();
        self.shared.notifier.info(&format!(
            "Retrying connection to fetch {}...",
            self.shared.subject
        ));
        self.shared.clone().spawn_cycle(token);
        token
    }

    /// The consuming view regained focus; refetch without bumping the token.
    pub fn on_focus_regained(&self) {
        self.force_fresh("focus regained");
    }

    /// Connectivity came back; refetch without bumping the token.
    pub fn on_reconnect(&self) {
        self.force_fresh("connectivity regained");
    }

    fn force_fresh(&self, reason: &str) {
        tracing::debug!(
            subject = self.shared.subject,
            "forcing fresh fetch: {}",
            reason
        );
        let token = self.shared.inner.lock().unwrap().token;
        self.shared.clone().spawn_cycle(token);
    }

    /// Release the watchdog and any in-flight cycles. Nothing fires after
    /// this returns; called automatically on drop.
    pub fn teardown(&self) {
        self.shared.teardown();
    }
}

impl<T> Drop for RefreshController<T> {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl<T> Shared<T> {
    fn teardown(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.torn_down = true;
        if let Some(handle) = inner.watchdog.take() {
            handle.abort();
        }
        for handle in inner.in_flight.drain(..) {
            handle.abort();
        }
    }

    fn bump_token(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.token += 1;
        inner.token
    }
}

impl<T: Send + Sync + 'static> Shared<T> {
    fn spawn_cycle(self: Arc<Self>, token: u64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.torn_down {
            return;
        }
        inner.in_flight.retain(|handle| !handle.is_finished());
        let shared = self.clone();
        inner.in_flight.push(tokio::spawn(async move {
            let _ = Shared::run_cycle(shared, token).await;
        }));
    }

    async fn run_cycle(shared: Arc<Self>, token: u64) -> Arc<FetchOutcome<T>> {
        let stale_at_start = {
            let inner = shared.inner.lock().unwrap();
            inner.applied.as_ref().map_or(false, |a| token < a.token)
        };
        if !stale_at_start {
            shared.state.send_replace(FetchPhase::Loading);
        }

        let mut outcome = shared.fetcher.fetch().await;
        let mut attempt = 1;
        while outcome.source == DataSource::FallbackError
            && attempt < shared.policy.retry_attempts
        {
            tokio::time::sleep(shared.policy.retry_delay).await;
            attempt += 1;
            tracing::info!(
                subject = shared.subject,
                attempt,
                "retrying fetch after transport failure"
            );
            outcome = shared.fetcher.fetch().await;
        }

        shared.apply(token, outcome)
    }

    /// Apply a resolved cycle. Results for tokens older than the highest
    /// applied one are dropped; the caller gets the winning outcome back.
    fn apply(self: &Arc<Self>, token: u64, outcome: FetchOutcome<T>) -> Arc<FetchOutcome<T>> {
        let outcome = Arc::new(outcome);
        let mut inner = self.inner.lock().unwrap();
        if inner.torn_down {
            return outcome;
        }
        if let Some(applied) = &inner.applied {
            if token < applied.token {
                tracing::debug!(
                    subject = self.subject,
                    token,
                    applied_token = applied.token,
                    "discarding stale fetch result"
                );
                return applied.outcome.clone();
            }
        }

        let recovered = inner
            .applied
            .as_ref()
            .map_or(false, |a| a.outcome.degraded())
            && !outcome.degraded();

        inner.applied = Some(Applied {
            token,
            at: Instant::now(),
            outcome: outcome.clone(),
        });

        // any arriving result cancels a pending watchdog
        if let Some(handle) = inner.watchdog.take() {
            handle.abort();
        }
        if outcome.live_empty() {
            inner.watchdog = Some(self.schedule_watchdog());
        }
        drop(inner);

        self.state.send_replace(FetchPhase::Ready(outcome.clone()));
        if recovered {
            self.notifier
                .success(&format!("Loaded {} from the store", self.subject));
        }
        outcome
    }

    /// Single delayed refetch after an empty live result. Holds only a weak
    /// reference so a torn-down controller cannot be revived by its timer.
    fn schedule_watchdog(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let delay = self.policy.watchdog_delay;
        let subject = self.subject;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                tracing::info!(subject, "no records found, watchdog refetching");
                let token = shared.bump_token();
                let _ = Shared::run_cycle(shared, token).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn outcome(records: Vec<u32>, source: DataSource) -> FetchOutcome<u32> {
        FetchOutcome {
            records,
            source,
            fetched_at: Utc::now(),
        }
    }

    fn policy() -> RefreshPolicy {
        RefreshPolicy::default()
    }

    /// Returns the same classification on every call and counts calls.
    struct CountingFetcher {
        calls: AtomicUsize,
        source: DataSource,
    }

    impl CountingFetcher {
        fn new(source: DataSource) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                source,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetch<u32> for CountingFetcher {
        async fn fetch(&self) -> FetchOutcome<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.source {
                DataSource::Live => outcome(vec![1, 2], DataSource::Live),
                DataSource::FallbackEmpty => outcome(vec![9], DataSource::FallbackEmpty),
                DataSource::FallbackError => outcome(vec![9], DataSource::FallbackError),
            }
        }
    }

    fn controller(
        fetcher: Arc<dyn Fetch<u32>>,
        policy: RefreshPolicy,
    ) -> (RefreshController<u32>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (
            RefreshController::new("books", fetcher, notifier.clone(), policy),
            notifier,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_result_fetches_once() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::Live));
        let (controller, notifier) = controller(fetcher.clone(), policy());

        let result = controller.records().await;
        assert_eq!(result.records, vec![1, 2]);
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(notifier.count("info"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_retries_with_delay() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::FallbackError));
        let (controller, _) = controller(fetcher.clone(), policy());

        let result = controller.records().await;
        // 3 attempts, then the fallback outcome is applied as-is
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(result.source, DataSource::FallbackError);
        assert!(result.degraded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_schedules_watchdog_refetch() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::FallbackEmpty));
        let (controller, _) = controller(fetcher.clone(), policy());

        controller.records().await;
        assert_eq!(fetcher.calls(), 1);
        let token_before = controller.token();

        // watchdog fires once after 3s and bumps the token
        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(controller.token(), token_before + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_watchdog() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::FallbackEmpty));
        let (controller, _) = controller(fetcher.clone(), policy());

        controller.records().await;
        assert_eq!(fetcher.calls(), 1);

        drop(controller);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_result_cancels_watchdog() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::FallbackEmpty));
        let (controller, _) = controller(fetcher.clone(), policy());

        controller.records().await;
        // manual retry resolves before the watchdog deadline
        controller.retry();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let calls_after_retry = fetcher.calls();
        assert_eq!(calls_after_retry, 2);

        // the original watchdog was cancelled; only the retry's own
        // watchdog may fire later
        tokio::time::sleep(Duration::from_millis(2_950)).await;
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_retry_bumps_token_and_notifies() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::Live));
        let (controller, notifier) = controller(fetcher.clone(), policy());

        controller.records().await;
        let token = controller.retry();
        assert_eq!(token, 1);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(notifier.count("info"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_serves_unchanged_token() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::Live));
        let mut cached_policy = policy();
        cached_policy.cache_ttl = Duration::from_secs(60);
        let (controller, _) = controller(fetcher.clone(), cached_policy);

        controller.records().await;
        controller.records().await;
        assert_eq!(fetcher.calls(), 1);

        // bumping the token always forces a fresh cycle
        controller.retry();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_serves_cache() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::Live));
        let (controller, _) = controller(fetcher.clone(), policy());

        controller.records().await;
        controller.records().await;
        assert_eq!(fetcher.calls(), 2);
    }

    /// First call resolves slowly, later calls immediately, with
    /// distinguishable payloads.
    struct SlowFirstFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetch<u32> for SlowFirstFetcher {
        async fn fetch(&self) -> FetchOutcome<u32> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                tokio::time::sleep(Duration::from_secs(5)).await;
                outcome(vec![1], DataSource::Live)
            } else {
                outcome(vec![2], DataSource::Live)
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_does_not_overwrite_newer_token() {
        let fetcher = Arc::new(SlowFirstFetcher {
            calls: AtomicUsize::new(0),
        });
        let (controller, _) = controller(fetcher.clone(), policy());

        // token 1 cycle starts and parks on its slow fetch
        controller.retry();
        tokio::task::yield_now().await;

        // token 2 cycle starts and resolves first
        controller.retry();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let applied = controller.current().outcome().unwrap();
        assert_eq!(applied.records, vec![2]);

        // token 1's result arrives late and must be discarded
        tokio::time::sleep(Duration::from_secs(6)).await;
        let applied = controller.current().outcome().unwrap();
        assert_eq!(applied.records, vec![2]);
    }

    /// Transport failure on the first cycle, live data afterwards.
    struct FailThenLiveFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetch<u32> for FailThenLiveFetcher {
        async fn fetch(&self) -> FetchOutcome<u32> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                outcome(vec![9], DataSource::FallbackError)
            } else {
                outcome(vec![1], DataSource::Live)
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_emits_success_notification() {
        let fetcher = Arc::new(FailThenLiveFetcher {
            calls: AtomicUsize::new(0),
        });
        let mut single_attempt = policy();
        single_attempt.retry_attempts = 1;
        let (controller, notifier) = controller(fetcher, single_attempt);

        let degraded = controller.records().await;
        assert!(degraded.degraded());
        assert_eq!(notifier.count("success"), 0);

        let live = controller.records().await;
        assert!(!live.degraded());
        assert_eq!(notifier.count("success"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_regain_forces_fresh_cycle() {
        let fetcher = Arc::new(CountingFetcher::new(DataSource::Live));
        let mut cached_policy = policy();
        cached_policy.cache_ttl = Duration::from_secs(60);
        let (controller, _) = controller(fetcher.clone(), cached_policy);

        controller.records().await;
        controller.on_focus_regained();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetcher.calls(), 2);
        // token unchanged, the cycle just bypassed the cache
        assert_eq!(controller.token(), 0);
    }
}
