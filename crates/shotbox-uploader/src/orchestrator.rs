//! Sequential failover across prioritised backends.

use bytes::Bytes;
use shotbox_core::UploaderConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::adapter::BackendAdapter;
use crate::result::{AggregateFailure, FailureCause, OrchestratorError, UploadFailure, UploadSuccess};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Ceiling for a single backend attempt.
    pub attempt_timeout: Duration,
    /// Pause after a failed attempt before the next backend is tried.
    pub retry_delay: Duration,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl From<&UploaderConfig> for UploadPolicy {
    fn from(config: &UploaderConfig) -> Self {
        Self {
            attempt_timeout: config.attempt_timeout,
            retry_delay: config.retry_delay,
        }
    }
}

/// A captured blob waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub data: Bytes,
    pub filename: String,
}

impl UploadJob {
    pub fn new(data: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
        }
    }
}

/// Clears the busy flag on every exit path, including cancellation.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct UploadOrchestrator {
    adapters: Vec<Arc<dyn BackendAdapter>>,
    policy: UploadPolicy,
    busy: AtomicBool,
}

impl UploadOrchestrator {
    /// `adapters` is in priority order and must not be empty.
    pub fn new(
        adapters: Vec<Arc<dyn BackendAdapter>>,
        policy: UploadPolicy,
    ) -> Result<Self, OrchestratorError> {
        if adapters.is_empty() {
            return Err(OrchestratorError::NoBackends);
        }

        Ok(Self {
            adapters,
            policy,
            busy: AtomicBool::new(false),
        })
    }

    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Try each backend in order until one succeeds.
    ///
    /// A call made while another is in flight is rejected with
    /// [`OrchestratorError::Busy`] instead of queuing.
    #[tracing::instrument(
        skip(self, job),
        fields(filename = %job.filename, size_bytes = job.data.len())
    )]
    pub async fn upload(&self, job: &UploadJob) -> Result<UploadSuccess, OrchestratorError> {
        let _guard = match BusyGuard::acquire(&self.busy) {
            Some(guard) => guard,
            None => {
                tracing::warn!("Upload rejected: another upload is in progress");
                return Err(OrchestratorError::Busy);
            }
        };

        let mut failures: Vec<UploadFailure> = Vec::with_capacity(self.adapters.len());

        for (index, adapter) in self.adapters.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.policy.retry_delay).await;
            }

            let attempt = index + 1;
            let start = Instant::now();
            let outcome = match tokio::time::timeout(
                self.policy.attempt_timeout,
                adapter.submit(job.data.clone(), &job.filename),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(UploadFailure::new(adapter.name(), FailureCause::Timeout)),
            };
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(success) => {
                    tracing::info!(
                        backend = %adapter.name(),
                        attempt,
                        elapsed_ms,
                        location = %success.location,
                        "Upload attempt succeeded"
                    );
                    return Ok(success);
                }
                Err(failure) => {
                    tracing::warn!(
                        backend = %adapter.name(),
                        attempt,
                        elapsed_ms,
                        cause = %failure.cause,
                        "Upload attempt failed"
                    );
                    failures.push(failure);
                }
            }
        }

        tracing::error!(attempts = failures.len(), "All upload backends failed");
        Err(AggregateFailure { failures }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{job, Script, ScriptedAdapter};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn policy() -> UploadPolicy {
        UploadPolicy {
            attempt_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(1),
        }
    }

    fn assert_between(elapsed: Duration, secs: u64) {
        assert!(
            elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs + 1),
            "elapsed {:?}",
            elapsed
        );
    }

    fn orchestrator(adapters: Vec<Arc<dyn BackendAdapter>>) -> UploadOrchestrator {
        UploadOrchestrator::new(adapters, policy()).unwrap()
    }

    #[test]
    fn test_empty_backend_list_rejected() {
        assert!(matches!(
            UploadOrchestrator::new(Vec::new(), policy()),
            Err(OrchestratorError::NoBackends)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_wins() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator(vec![
            ScriptedAdapter::shared("a", Script::Succeed, &log),
            ScriptedAdapter::shared("b", Script::Succeed, &log),
        ]);

        let start = tokio::time::Instant::now();
        let success = orchestrator.upload(&job()).await.unwrap();

        assert_eq!(success.service_name, "a");
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failover_in_priority_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator(vec![
            ScriptedAdapter::shared("a", Script::Fail(FailureCause::HttpStatus(500)), &log),
            ScriptedAdapter::shared("b", Script::Fail(FailureCause::Transport("reset".into())), &log),
            ScriptedAdapter::shared("c", Script::Succeed, &log),
            ScriptedAdapter::shared("d", Script::Succeed, &log),
        ]);

        let start = tokio::time::Instant::now();
        let success = orchestrator.upload(&job()).await.unwrap();

        assert_eq!(success.service_name, "c");
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
        // one pause after each failure
        assert_between(start.elapsed(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_every_failure_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator(vec![
            ScriptedAdapter::shared("a", Script::Fail(FailureCause::HttpStatus(502)), &log),
            ScriptedAdapter::shared(
                "b",
                Script::Fail(FailureCause::MalformedResponse("no url".into())),
                &log,
            ),
            ScriptedAdapter::shared("c", Script::Fail(FailureCause::HttpStatus(429)), &log),
        ]);

        let start = tokio::time::Instant::now();
        let err = orchestrator.upload(&job()).await.unwrap_err();

        let OrchestratorError::Exhausted(aggregate) = err else {
            panic!("expected exhaustion");
        };
        let names: Vec<_> = aggregate
            .failures
            .iter()
            .map(|f| f.service_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(aggregate.failures[2].cause, FailureCause::HttpStatus(429));
        // no pause after the last failure
        assert_between(start.elapsed(), 2);
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_backend_times_out() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator(vec![
            ScriptedAdapter::shared("slow", Script::Hang, &log),
            ScriptedAdapter::shared("fast", Script::Succeed, &log),
        ]);

        let start = tokio::time::Instant::now();
        let success = orchestrator.upload(&job()).await.unwrap();

        assert_eq!(success.service_name, "fast");
        assert_between(start.elapsed(), 31);

        let only_slow = UploadOrchestrator::new(
            vec![ScriptedAdapter::shared("slow", Script::Hang, &log)],
            policy(),
        )
        .unwrap();
        let OrchestratorError::Exhausted(aggregate) = only_slow.upload(&job()).await.unwrap_err()
        else {
            panic!("expected exhaustion");
        };
        assert_eq!(aggregate.failures[0].cause, FailureCause::Timeout);
        assert_eq!(aggregate.failures[0].cause.to_string(), "timeout");
    }

    #[tokio::test]
    async fn test_concurrent_upload_is_rejected_while_busy() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::new(Notify::new());
        let orchestrator = orchestrator(vec![ScriptedAdapter::shared(
            "gated",
            Script::WaitFor(gate.clone()),
            &log,
        )]);

        let first_job = job();
        let second_job = job();
        let (first, second) = tokio::join!(orchestrator.upload(&first_job), async {
            let result = orchestrator.upload(&second_job).await;
            gate.notify_one();
            result
        });

        assert_eq!(first.unwrap().service_name, "gated");
        assert!(matches!(second, Err(OrchestratorError::Busy)));
        assert_eq!(*log.lock().unwrap(), vec!["gated"]);

        // released after settling
        assert!(!orchestrator.is_busy());
        gate.notify_one();
        assert!(orchestrator.upload(&job()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_flag_released_when_caller_gives_up() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = orchestrator(vec![ScriptedAdapter::shared("slow", Script::Hang, &log)]);

        let abandoned =
            tokio::time::timeout(Duration::from_secs(5), orchestrator.upload(&job())).await;
        assert!(abandoned.is_err());
        assert!(!orchestrator.is_busy());
    }

    #[test]
    fn test_policy_from_config() {
        let config = UploaderConfig::from_lookup(|key| match key {
            "UPLOAD_ATTEMPT_TIMEOUT_SECS" => Some("10".to_string()),
            "UPLOAD_RETRY_DELAY_MS" => Some("250".to_string()),
            _ => None,
        })
        .unwrap();

        let policy = UploadPolicy::from(&config);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(10));
        assert_eq!(policy.retry_delay, Duration::from_millis(250));
    }
}
