//! Scheduler service wrapper around tokio-cron-scheduler.
//!
//! Provides lifecycle management for the analyzer trigger with graceful
//! shutdown support and late-fire detection.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{SchedulerConfig, SchedulerError};

/// Validate a cron expression.
///
/// Checks that the expression is syntactically valid. The expression
/// should use 6-field format: second minute hour day-of-month month
/// day-of-week.
///
/// # Errors
///
/// Returns `SchedulerError::InvalidCron` if the expression is not valid.
pub fn validate_cron_expression(expr: &str) -> Result<(), SchedulerError> {
    // Creating a throwaway job exercises the underlying cron parser
    match Job::new_async(expr, |_uuid, _lock| Box::pin(async {})) {
        Ok(_) => Ok(()),
        Err(e) => Err(SchedulerError::InvalidCron(format!("'{}': {}", expr, e))),
    }
}

/// Service wrapper around JobScheduler for lifecycle management.
///
/// Provides start/stop functionality with graceful shutdown support via
/// CancellationToken propagation to jobs.
pub struct SchedulerService {
    scheduler: JobScheduler,
    config: SchedulerConfig,
    shutdown_token: CancellationToken,
    is_running: AtomicBool,
}

impl SchedulerService {
    /// Create a new scheduler service with the given configuration.
    ///
    /// The scheduler is created but not started. Call `start()` to begin
    /// executing scheduled jobs.
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        // Validate timezone configuration upfront
        let _ = config.parse_timezone()?;

        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            config,
            shutdown_token: CancellationToken::new(),
            is_running: AtomicBool::new(false),
        })
    }

    /// Start the scheduler.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::AlreadyRunning` if the scheduler is
    /// already started.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.scheduler.start().await?;
        info!("Scheduler started");

        Ok(())
    }

    /// Shutdown the scheduler gracefully.
    ///
    /// Signals all jobs to stop via the cancellation token, waits for
    /// the configured timeout, then stops the scheduler.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::NotRunning` if the scheduler is not
    /// started.
    pub async fn shutdown(&mut self) -> Result<(), SchedulerError> {
        if !self.is_running.load(Ordering::SeqCst) {
            return Err(SchedulerError::NotRunning);
        }

        info!("Initiating scheduler shutdown");

        self.shutdown_token.cancel();

        tokio::time::sleep(std::time::Duration::from_secs(
            self.config.shutdown_timeout_secs.min(5),
        ))
        .await;

        if let Err(e) = self.scheduler.shutdown().await {
            warn!("Error during scheduler shutdown: {}", e);
        }

        self.is_running.store(false, Ordering::SeqCst);
        info!("Scheduler shutdown complete");

        Ok(())
    }

    /// Get a clone of the shutdown token for job cancellation.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Check if the scheduler is currently running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Get the scheduler configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Add a cron job with timezone-aware scheduling and late-fire
    /// detection.
    ///
    /// The job receives a clone of the shutdown token for cancellation
    /// support. When `expected_period_secs` is set and a fire arrives
    /// more than that long (plus a small grace) after the previous one,
    /// a warning is logged; the run proceeds unmodified.
    ///
    /// # Errors
    ///
    /// Returns error if the cron expression is invalid or the timezone
    /// is not recognized.
    pub async fn add_cron_job<F, Fut>(
        &self,
        name: &str,
        cron_expr: &str,
        timezone: Option<&str>,
        expected_period_secs: Option<u64>,
        job_fn: F,
    ) -> Result<uuid::Uuid, SchedulerError>
    where
        F: Fn(CancellationToken) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let tz: Tz = match timezone {
            Some(tz_str) => tz_str
                .parse()
                .map_err(|_| SchedulerError::InvalidTimezone(tz_str.to_string()))?,
            None => self.config.parse_timezone()?,
        };

        validate_cron_expression(cron_expr)?;

        let job_name = name.to_string();
        let shutdown_token = self.shutdown_token.clone();
        let last_fire: Arc<Mutex<Option<DateTime<Utc>>>> = Arc::new(Mutex::new(None));

        let job = Job::new_async_tz(cron_expr, tz, move |_uuid, _lock| {
            let name = job_name.clone();
            let token = shutdown_token.clone();
            let job_fn = job_fn.clone();
            let last_fire = last_fire.clone();

            Box::pin(async move {
                let now = Utc::now();
                check_late_fire(&name, &last_fire, now, expected_period_secs);

                info!(job = %name, "Job started");
                let start = std::time::Instant::now();

                job_fn(token).await;

                let elapsed = start.elapsed();
                info!(job = %name, duration_ms = elapsed.as_millis(), "Job completed");
            })
        })
        .map_err(|e| SchedulerError::InvalidCron(e.to_string()))?;

        let uuid = self.scheduler.add(job).await?;
        info!(job = %name, uuid = %uuid, cron = %cron_expr, timezone = %tz.name(), "Job registered");

        Ok(uuid)
    }
}

/// Warn when a fire arrives well past the expected cadence. The stored
/// previous fire time is updated either way.
fn check_late_fire(
    name: &str,
    last_fire: &Mutex<Option<DateTime<Utc>>>,
    now: DateTime<Utc>,
    expected_period_secs: Option<u64>,
) {
    let mut guard = match last_fire.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let (Some(previous), Some(period)) = (*guard, expected_period_secs) {
        // Small grace on top of the period to absorb scheduler jitter
        let allowed = Duration::seconds(period as i64 + period as i64 / 10 + 5);
        let gap = now - previous;
        if gap > allowed {
            warn!(
                job = %name,
                gap_secs = gap.num_seconds(),
                expected_secs = period,
                "Trigger fired late"
            );
        }
    }
    *guard = Some(now);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_scheduler_new() {
        let config = SchedulerConfig::default();
        let scheduler = SchedulerService::new(config).await.unwrap();
        assert!(!scheduler.is_running());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_scheduler_start_stop() {
        let config = SchedulerConfig {
            shutdown_timeout_secs: 1,
            ..Default::default()
        };
        let mut scheduler = SchedulerService::new(config).await.unwrap();

        scheduler.start().await.unwrap();
        assert!(scheduler.is_running());

        let result = scheduler.start().await;
        assert!(matches!(result, Err(SchedulerError::AlreadyRunning)));

        scheduler.shutdown().await.unwrap();
        assert!(!scheduler.is_running());

        let result = scheduler.shutdown().await;
        assert!(matches!(result, Err(SchedulerError::NotRunning)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_token() {
        let config = SchedulerConfig {
            shutdown_timeout_secs: 1,
            ..Default::default()
        };
        let mut scheduler = SchedulerService::new(config).await.unwrap();

        let token = scheduler.shutdown_token();
        assert!(!token.is_cancelled());

        scheduler.start().await.unwrap();
        scheduler.shutdown().await.unwrap();

        assert!(token.is_cancelled());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_timezone_config() {
        let config = SchedulerConfig {
            default_timezone: "Invalid/Zone".to_string(),
            ..Default::default()
        };
        let result = SchedulerService::new(config).await;
        assert!(matches!(result, Err(SchedulerError::InvalidTimezone(_))));
    }

    #[test]
    fn test_validate_cron_expression_valid() {
        assert!(validate_cron_expression("1 0,15,30,45 * * * *").is_ok());
        assert!(validate_cron_expression("0 0 * * * *").is_ok());
        assert!(validate_cron_expression("*/10 * * * * *").is_ok());
    }

    #[test]
    fn test_validate_cron_expression_invalid() {
        assert!(validate_cron_expression("invalid").is_err());
        assert!(validate_cron_expression("").is_err());
        assert!(validate_cron_expression("* * *").is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_cron_job_valid_expression() {
        use std::sync::atomic::AtomicU32;

        let config = SchedulerConfig {
            shutdown_timeout_secs: 1,
            ..Default::default()
        };
        let mut scheduler = SchedulerService::new(config).await.unwrap();

        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let uuid = scheduler
            .add_cron_job(
                "test-job",
                "*/1 * * * * *",
                None,
                Some(1),
                move |_token| {
                    let c = counter_clone.clone();
                    async move {
                        c.fetch_add(1, Ordering::SeqCst);
                    }
                },
            )
            .await
            .unwrap();

        assert!(!uuid.is_nil());

        scheduler.start().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        scheduler.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_cron_job_invalid_expression() {
        let config = SchedulerConfig::default();
        let scheduler = SchedulerService::new(config).await.unwrap();

        let result = scheduler
            .add_cron_job("bad-job", "invalid-cron", None, None, |_token| async {})
            .await;

        assert!(matches!(result, Err(SchedulerError::InvalidCron(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_add_cron_job_invalid_timezone() {
        let config = SchedulerConfig::default();
        let scheduler = SchedulerService::new(config).await.unwrap();

        let result = scheduler
            .add_cron_job(
                "bad-tz-job",
                "0 0 * * * *",
                Some("Invalid/Timezone"),
                None,
                |_token| async {},
            )
            .await;

        assert!(matches!(result, Err(SchedulerError::InvalidTimezone(_))));
    }

    #[test]
    fn test_check_late_fire_first_fire_is_quiet() {
        let last_fire = Mutex::new(None);
        let now = Utc::now();
        check_late_fire("job", &last_fire, now, Some(900));
        assert_eq!(*last_fire.lock().unwrap(), Some(now));
    }

    #[test]
    fn test_check_late_fire_updates_previous() {
        let first = Utc::now();
        let last_fire = Mutex::new(Some(first));
        let second = first + Duration::seconds(2000);
        check_late_fire("job", &last_fire, second, Some(900));
        assert_eq!(*last_fire.lock().unwrap(), Some(second));
    }
}
