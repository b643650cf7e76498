//! Cron-driven job table with explicit lifecycle management.
//!
//! Jobs are registered by name with a cron expression and an async runner.
//! The runner closure is shared with the on-demand trigger path: both hold
//! the same per-job guard, so overlapping invocations serialize (manual
//! trigger) or skip (scheduled tick) instead of double-processing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use staysync_domain::Result as DomainResult;
use tokio_cron_scheduler::{Job, JobScheduler as CronScheduler};
use tracing::{debug, error, info, warn};

use super::error::{SchedulerError, SchedulerResult};

type JobFuture = Pin<Box<dyn Future<Output = DomainResult<String>> + Send>>;
type JobRunner = Arc<dyn Fn() -> JobFuture + Send + Sync>;

/// One named periodic job.
pub struct JobDefinition {
    name: &'static str,
    schedule: String,
    guard: Arc<tokio::sync::Mutex<()>>,
    runner: JobRunner,
}

impl JobDefinition {
    /// Define a job. `guard` is the run-in-progress flag shared with the
    /// job's manual trigger; `runner` returns a one-line summary for the log.
    pub fn new<F>(
        name: &'static str,
        schedule: impl Into<String>,
        guard: Arc<tokio::sync::Mutex<()>>,
        runner: F,
    ) -> Self
    where
        F: Fn() -> JobFuture + Send + Sync + 'static,
    {
        Self { name, schedule: schedule.into(), guard, runner: Arc::new(runner) }
    }
}

/// Configuration for the job scheduler.
#[derive(Debug, Clone)]
pub struct JobSchedulerConfig {
    /// Timeout applied to a single job execution.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
}

impl Default for JobSchedulerConfig {
    fn default() -> Self {
        Self {
            job_timeout: Duration::from_secs(300),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

/// Process-wide job scheduler with explicit start/stop lifecycle.
pub struct JobScheduler {
    scheduler: Option<CronScheduler>,
    jobs: Vec<JobDefinition>,
    config: JobSchedulerConfig,
}

impl JobScheduler {
    pub fn new(config: JobSchedulerConfig) -> Self {
        Self { scheduler: None, jobs: Vec::new(), config }
    }

    /// Add a job to the table. Only allowed before `start`.
    pub fn register(&mut self, job: JobDefinition) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.jobs.push(job);
        Ok(())
    }

    /// Start the scheduler and all registered jobs.
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let scheduler = self.build_scheduler().await?;

        let start_timeout = self.config.start_timeout;
        tokio::time::timeout(start_timeout, scheduler.start())
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: start_timeout.as_secs() })?
            .map_err(|source| SchedulerError::StartFailed(source.to_string()))?;

        self.scheduler = Some(scheduler);
        info!(jobs = self.jobs.len(), "job scheduler started");
        Ok(())
    }

    /// Stop the scheduler.
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let mut scheduler = self.scheduler.take().ok_or(SchedulerError::NotRunning)?;

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, scheduler.shutdown())
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: stop_timeout.as_secs() })?
            .map_err(|source| SchedulerError::StopFailed(source.to_string()))?;

        info!("job scheduler stopped");
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> SchedulerResult<CronScheduler> {
        let scheduler = CronScheduler::new()
            .await
            .map_err(|source| SchedulerError::CreationFailed(source.to_string()))?;

        for job in &self.jobs {
            let name = job.name;
            let guard = Arc::clone(&job.guard);
            let runner = Arc::clone(&job.runner);
            let job_timeout = self.config.job_timeout;

            let definition = Job::new_async(job.schedule.as_str(), move |_id, _lock| {
                let guard = Arc::clone(&guard);
                let runner = Arc::clone(&runner);

                Box::pin(async move {
                    // Overlap guard: skip the tick if a run is in progress.
                    let Ok(_permit) = guard.try_lock() else {
                        warn!(job = name, "previous run still in progress; skipping tick");
                        return;
                    };

                    let started = Instant::now();
                    match tokio::time::timeout(job_timeout, runner()).await {
                        Ok(Ok(summary)) => {
                            debug!(
                                job = name,
                                elapsed_ms = started.elapsed().as_millis() as u64,
                                %summary,
                                "job completed"
                            );
                        }
                        Ok(Err(err)) => {
                            error!(job = name, error = %err, "job failed");
                        }
                        Err(_) => {
                            warn!(
                                job = name,
                                timeout_secs = job_timeout.as_secs(),
                                "job timed out"
                            );
                        }
                    }
                })
            })
            .map_err(|source| SchedulerError::JobRegistrationFailed {
                name,
                message: source.to_string(),
            })?;

            scheduler.add(definition).await.map_err(|source| {
                SchedulerError::JobRegistrationFailed { name, message: source.to_string() }
            })?;

            debug!(job = name, schedule = %job.schedule, "job registered");
        }

        Ok(scheduler)
    }
}

impl Drop for JobScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("JobScheduler dropped while running");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_job(
        name: &'static str,
        schedule: &str,
        counter: Arc<AtomicUsize>,
    ) -> JobDefinition {
        JobDefinition::new(name, schedule, Arc::new(tokio::sync::Mutex::new(())), move || {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok("ran".to_string())
            })
        })
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn lifecycle_runs_registered_jobs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new(JobSchedulerConfig::default());
        scheduler
            .register(counting_job("every-second", "* * * * * *", Arc::clone(&counter)))
            .unwrap();

        scheduler.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        scheduler.stop().await.unwrap();

        assert!(counter.load(Ordering::SeqCst) >= 1);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn double_start_is_rejected() {
        let mut scheduler = JobScheduler::new(JobSchedulerConfig::default());

        scheduler.start().await.unwrap();
        let err = scheduler.start().await.unwrap_err();
        assert!(matches!(err, SchedulerError::AlreadyRunning));

        scheduler.stop().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stop_without_start_is_rejected() {
        let mut scheduler = JobScheduler::new(JobSchedulerConfig::default());

        let err = scheduler.stop().await.unwrap_err();
        assert!(matches!(err, SchedulerError::NotRunning));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn busy_guard_skips_the_tick() {
        let counter = Arc::new(AtomicUsize::new(0));
        let guard = Arc::new(tokio::sync::Mutex::new(()));
        let counter_clone = Arc::clone(&counter);

        let mut scheduler = JobScheduler::new(JobSchedulerConfig::default());
        scheduler
            .register(JobDefinition::new(
                "guarded",
                "* * * * * *",
                Arc::clone(&guard),
                move || {
                    let counter = Arc::clone(&counter_clone);
                    Box::pin(async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok("ran".to_string())
                    })
                },
            ))
            .unwrap();

        // Hold the guard for the whole window, as a manual trigger would.
        let held = guard.lock().await;
        scheduler.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        scheduler.stop().await.unwrap();
        drop(held);

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
