use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::archive::month::kst;
use crate::archive::repository::ArchiveRepository;
use crate::archive::ArchiveService;
use crate::player::PlayerRepository;
use crate::settlement::SettlementService;
use crate::shared::ADMIN_ID;

/// Wall-clock schedule for both engines, expressed in KST
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Hour of the daily settlement run
    pub settlement_hour: u32,
    /// Minute of the daily settlement run
    pub settlement_minute: u32,
    /// Day of month for the archive run (clamped to 1..=28)
    pub archive_day: u32,
    /// Hour of the archive run
    pub archive_hour: u32,
    /// Minute of the archive run
    pub archive_minute: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            settlement_hour: 0,
            settlement_minute: 5,
            archive_day: 1,
            archive_hour: 0,
            archive_minute: 30,
        }
    }
}

/// Next daily fire time at `hour:minute` KST, strictly after `now`
pub fn next_daily_run(now: DateTime<Utc>, hour: u32, minute: u32) -> DateTime<Utc> {
    let local = now.with_timezone(&kst()).naive_local();
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);

    let mut candidate = local.date().and_time(time);
    if candidate <= local {
        candidate = (local.date() + Days::new(1)).and_time(time);
    }

    to_utc(candidate)
}

/// Next monthly fire time at `day hour:minute` KST, strictly after `now`.
/// The day is clamped to 1..=28 so the schedule is valid in every month.
pub fn next_monthly_run(now: DateTime<Utc>, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    let day = day.clamp(1, 28);
    let local = now.with_timezone(&kst()).naive_local();
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);

    let (mut year, mut month) = (local.year(), local.month());
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            let candidate = date.and_time(time);
            if candidate > local {
                return to_utc(candidate);
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
}

fn to_utc(local: chrono::NaiveDateTime) -> DateTime<Utc> {
    // Fixed offsets are never ambiguous
    kst()
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

fn sleep_duration(next: DateTime<Utc>) -> Duration {
    (next - Utc::now()).to_std().unwrap_or(Duration::ZERO)
}

/// Starts the daily settlement background task.
///
/// Errors are logged and swallowed; a failed cycle is left for the next
/// scheduled tick or a manual re-run, with no internal retry.
#[instrument(skip(player_repository, config))]
pub async fn start_settlement_task(
    player_repository: Arc<dyn PlayerRepository>,
    config: ScheduleConfig,
) {
    info!(
        hour = config.settlement_hour,
        minute = config.settlement_minute,
        "Starting daily settlement background task"
    );

    let service = SettlementService::new(player_repository);

    loop {
        let next = next_daily_run(Utc::now(), config.settlement_hour, config.settlement_minute);
        tokio::time::sleep(sleep_duration(next)).await;

        match service.run_daily_settlement().await {
            Ok(outcome) => {
                info!(message = %outcome.message(), "Scheduled settlement completed");
            }
            Err(err) => {
                error!(error = %err, "Scheduled settlement failed");
            }
        }
    }
}

/// Starts the monthly archive background task.
///
/// A failed run additionally leaves an error notification in the
/// administrator's mailbox stating that no ranking data was reset.
#[instrument(skip(player_repository, archive_repository, config))]
pub async fn start_archive_task(
    player_repository: Arc<dyn PlayerRepository>,
    archive_repository: Arc<dyn ArchiveRepository>,
    config: ScheduleConfig,
) {
    info!(
        day = config.archive_day,
        hour = config.archive_hour,
        minute = config.archive_minute,
        "Starting monthly archive background task"
    );

    let service = ArchiveService::new(player_repository, archive_repository, ADMIN_ID);

    loop {
        let next = next_monthly_run(
            Utc::now(),
            config.archive_day,
            config.archive_hour,
            config.archive_minute,
        );
        tokio::time::sleep(sleep_duration(next)).await;

        match service.archive_monthly_ranking(false).await {
            Ok(outcome) => {
                info!(message = %outcome.message(), "Scheduled archive completed");
            }
            Err(err) => {
                error!(error = %err, "Scheduled archive failed");
                if let Err(notify_err) = service.record_failure(&err).await {
                    error!(error = %notify_err, "Failed to write archive error notification");
                }
            }
        }
    }
}
