//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use staysync_core::reservations::ports::{
    CalendarSourceRepository as CalendarSourceRepositoryPort,
    NotificationEventRepository as NotificationEventRepositoryPort,
    ReservationRepository as ReservationRepositoryPort,
};
use staysync_core::{
    CalendarSyncService, EventProcessingService, MailboxSyncService, PlatformRegistry,
};
use staysync_domain::constants::AIRBNB_EMAIL_DOMAIN;
use staysync_domain::{Config, Result};
use staysync_infra::scheduling::{JobDefinition, JobScheduler, JobSchedulerConfig, SchedulerResult};
use staysync_infra::{
    DbManager, HttpFeedFetcher, ImapMailStore, SqliteCalendarSourceRepository,
    SqliteNotificationEventRepository, SqliteReservationRepository,
};
use tracing::info;

/// Shared run-in-progress guard per job; also held by the manual triggers.
pub type JobGuard = Arc<tokio::sync::Mutex<()>>;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,

    // Store ports
    pub reservations: Arc<dyn ReservationRepositoryPort>,
    pub sources: Arc<dyn CalendarSourceRepositoryPort>,
    pub events: Arc<dyn NotificationEventRepositoryPort>,

    // Services
    pub calendar_sync: Arc<CalendarSyncService>,
    pub mailbox_sync: Arc<MailboxSyncService>,
    pub event_processing: Arc<EventProcessingService>,

    // Per-job overlap guards
    pub calendar_guard: JobGuard,
    pub mailbox_guard: JobGuard,
    pub events_guard: JobGuard,
}

impl AppContext {
    /// Wire the full dependency graph from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let pool = db.pool().clone();
        let reservations: Arc<dyn ReservationRepositoryPort> =
            Arc::new(SqliteReservationRepository::new(pool.clone()));
        let sources: Arc<dyn CalendarSourceRepositoryPort> =
            Arc::new(SqliteCalendarSourceRepository::new(pool.clone()));
        let events: Arc<dyn NotificationEventRepositoryPort> =
            Arc::new(SqliteNotificationEventRepository::new(pool));

        let fetcher = HttpFeedFetcher::with_timeout(Duration::from_secs(
            config.calendar.fetch_timeout_seconds,
        ))?;
        let calendar_sync = Arc::new(CalendarSyncService::new(
            Arc::new(fetcher),
            PlatformRegistry::with_defaults(),
            sources.clone(),
            reservations.clone(),
        ));

        let mail_store = ImapMailStore::new(config.mailbox.clone());
        let mailbox_sync = Arc::new(MailboxSyncService::new(
            Arc::new(mail_store),
            events.clone(),
            AIRBNB_EMAIL_DOMAIN,
        ));

        let event_processing =
            Arc::new(EventProcessingService::new(events.clone(), reservations.clone()));

        info!("application context initialised");

        Ok(Self {
            config,
            db,
            reservations,
            sources,
            events,
            calendar_sync,
            mailbox_sync,
            event_processing,
            calendar_guard: Arc::new(tokio::sync::Mutex::new(())),
            mailbox_guard: Arc::new(tokio::sync::Mutex::new(())),
            events_guard: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// Build the job table for the enabled periodic jobs. The scheduled runs
    /// and the manual triggers share the same guards and service methods.
    pub fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let mut scheduler = JobScheduler::new(JobSchedulerConfig::default());

        if self.config.calendar.enabled {
            let service = self.calendar_sync.clone();
            scheduler.register(JobDefinition::new(
                "calendar-sync",
                self.config.calendar.schedule.clone(),
                self.calendar_guard.clone(),
                move || {
                    let service = service.clone();
                    Box::pin(async move {
                        let report = service.sync_all().await?;
                        Ok(format!(
                            "created={} updated={} errors={}",
                            report.created, report.updated, report.errors
                        ))
                    })
                },
            ))?;
        }

        if self.config.mailbox.enabled {
            let service = self.mailbox_sync.clone();
            scheduler.register(JobDefinition::new(
                "mailbox-poll",
                self.config.mailbox.schedule.clone(),
                self.mailbox_guard.clone(),
                move || {
                    let service = service.clone();
                    Box::pin(async move {
                        let report = service.poll().await?;
                        Ok(format!(
                            "stored={} duplicates={} ignored={} errors={}",
                            report.stored, report.duplicates, report.ignored, report.errors
                        ))
                    })
                },
            ))?;
        }

        if self.config.events.enabled {
            let service = self.event_processing.clone();
            scheduler.register(JobDefinition::new(
                "event-processing",
                self.config.events.schedule.clone(),
                self.events_guard.clone(),
                move || {
                    let service = service.clone();
                    Box::pin(async move {
                        let report = service.process_pending().await?;
                        Ok(format!(
                            "applied={} orphaned={} errors={}",
                            report.applied, report.orphaned, report.errors
                        ))
                    })
                },
            ))?;
        }

        Ok(scheduler)
    }
}
