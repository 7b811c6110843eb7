use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::db::repository;
use crate::error::AppError;
use crate::models::Assignment;
use crate::services::status_calculator::is_overdue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Overdue,
    DueWithin2Hours,
    DueWithin24Hours,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub assignment_id: String,
    pub title: String,
    pub kind: ReminderKind,
    pub deadline: DateTime<Utc>,
}

/// At most one reminder per assignment; the most urgent kind wins.
pub fn collect_reminders<Tz: TimeZone>(assignments: &[Assignment], now: &DateTime<Tz>) -> Vec<Reminder> {
    let now_utc = now.with_timezone(&Utc);
    assignments
        .iter()
        .filter(|a| !a.is_event() && !a.is_completed())
        .filter_map(|a| {
            let kind = if is_overdue(a, now) {
                ReminderKind::Overdue
            } else {
                let left = a.deadline - now_utc;
                if left <= chrono::Duration::hours(2) {
                    ReminderKind::DueWithin2Hours
                } else if left <= chrono::Duration::hours(24) {
                    ReminderKind::DueWithin24Hours
                } else {
                    return None;
                }
            };
            Some(Reminder {
                assignment_id: a.id.clone(),
                title: a.title.clone(),
                kind,
                deadline: a.deadline,
            })
        })
        .collect()
}

#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn deliver(&self, reminders: &[Reminder]) -> Result<(), AppError>;
}

/// Writes reminders to the log.
pub struct LogReminderSink;

#[async_trait]
impl ReminderSink for LogReminderSink {
    async fn deliver(&self, reminders: &[Reminder]) -> Result<(), AppError> {
        for r in reminders {
            match r.kind {
                ReminderKind::Overdue => warn!("Overdue: {} (was due {})", r.title, r.deadline),
                ReminderKind::DueWithin2Hours => warn!("Due within 2 hours: {} ({})", r.title, r.deadline),
                ReminderKind::DueWithin24Hours => info!("Due within 24 hours: {} ({})", r.title, r.deadline),
            }
        }
        Ok(())
    }
}

/// Remembers which reminders were already delivered. The 24h and 2h
/// reminders go out once per assignment; `Overdue` once per local day.
#[derive(Debug, Default)]
pub struct ReminderLog {
    sent: HashMap<(String, ReminderKind), NaiveDate>,
}

impl ReminderLog {
    /// Drops reminders already delivered and returns the rest.
    pub fn pending(&self, reminders: Vec<Reminder>, today: NaiveDate) -> Vec<Reminder> {
        reminders
            .into_iter()
            .filter(|r| match self.sent.get(&(r.assignment_id.clone(), r.kind)) {
                None => true,
                Some(day) => r.kind == ReminderKind::Overdue && *day != today,
            })
            .collect()
    }

    pub fn record(&mut self, reminders: &[Reminder], today: NaiveDate) {
        for r in reminders {
            self.sent.insert((r.assignment_id.clone(), r.kind), today);
        }
    }

    /// Forgets assignments that no longer need a reminder (completed,
    /// deleted or moved out of the window), so they can fire again later.
    pub fn retain_active(&mut self, active: &HashSet<String>) {
        self.sent.retain(|(id, _), _| active.contains(id));
    }
}

/// Periodically scans stored assignments for upcoming and missed deadlines.
pub struct ReminderScheduler {
    db: SqlitePool,
    sink: Arc<dyn ReminderSink>,
    interval: Duration,
    offset: FixedOffset,
    log: Mutex<ReminderLog>,
}

impl ReminderScheduler {
    pub fn new(
        db: SqlitePool,
        sink: Arc<dyn ReminderSink>,
        interval_secs: u64,
        offset: FixedOffset,
    ) -> Self {
        Self {
            db,
            sink,
            interval: Duration::from_secs(interval_secs),
            offset,
            log: Mutex::new(ReminderLog::default()),
        }
    }

    pub async fn start(self) {
        info!("Starting reminder scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            let now = Utc::now().with_timezone(&self.offset);
            match self.run_scan(&now).await {
                Ok(count) => info!("Reminder scan completed - {} reminders", count),
                Err(e) => warn!("Reminder scan failed: {:?}", e),
            }
        }
    }

    /// Returns how many reminders were delivered. Reminders are only marked
    /// as sent once the sink accepts them.
    pub async fn run_scan<Tz>(&self, now: &DateTime<Tz>) -> Result<usize, AppError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send + Sync,
    {
        let assignments = repository::fetch_assignments(&self.db).await?;
        let due = collect_reminders(&assignments, now);
        let today = now.date_naive();

        let mut log = self.log.lock().await;
        log.retain_active(&due.iter().map(|r| r.assignment_id.clone()).collect());

        let total = due.len();
        let pending = log.pending(due, today);
        if pending.len() < total {
            debug!("Skipping {} already delivered reminders", total - pending.len());
        }
        if pending.is_empty() {
            return Ok(0);
        }

        self.sink.deliver(&pending).await?;
        log.record(&pending, today);
        Ok(pending.len())
    }
}
