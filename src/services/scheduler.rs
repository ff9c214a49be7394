use crate::error::{AppError, Result};
use crate::models::Job;
use crate::repository::JobRepository;
use crate::services::ExecutionService;
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::watch;

/// Parses a five-field crontab expression (minute hour day month weekday).
///
/// Weekdays follow crontab numbering, where both 0 and 7 are Sunday.
pub fn parse_schedule(expression: &str) -> Result<Schedule> {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(AppError::InvalidInput(format!(
            "Schedule '{}' must have 5 fields",
            expression
        )));
    }

    let weekday = convert_weekday(fields[4])?;
    let expanded = format!(
        "0 {} {} {} {} {}",
        fields[0], fields[1], fields[2], fields[3], weekday
    );
    Schedule::from_str(&expanded)
        .map_err(|e| AppError::InvalidInput(format!("Invalid schedule '{}': {}", expression, e)))
}

// The cron crate numbers weekdays 1-7 starting on Sunday.
fn convert_weekday(field: &str) -> Result<String> {
    let mut parts = Vec::new();
    for part in field.split(',') {
        let (base, step) = match part.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (part, None),
        };

        let converted = match base.split_once('-') {
            _ if base == "*" || base.chars().any(|c| c.is_ascii_alphabetic()) => base.to_string(),
            Some((start, end)) => {
                let start = weekday_number(start)?;
                let end = weekday_number(end)?;
                if end == 7 && start > 0 {
                    if step.is_some() {
                        return Err(AppError::InvalidInput(format!(
                            "Unsupported weekday range '{}'",
                            part
                        )));
                    }
                    format!("{}-7,1", start + 1)
                } else if end == 7 {
                    "1-7".to_string()
                } else {
                    format!("{}-{}", start + 1, end + 1)
                }
            }
            None => {
                let day = weekday_number(base)?;
                if day == 7 { "1".to_string() } else { (day + 1).to_string() }
            }
        };

        match step {
            Some(step) => parts.push(format!("{}/{}", converted, step)),
            None => parts.push(converted),
        }
    }
    Ok(parts.join(","))
}

fn weekday_number(value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .ok()
        .filter(|day| *day <= 7)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid weekday '{}'", value)))
}

/// Jobs with a fire time in `(from, to]`.
pub fn due_jobs(jobs: &[Job], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&Job> {
    jobs.iter()
        .filter(|job| job.is_scheduled())
        .filter(|job| match parse_schedule(&job.schedule) {
            Ok(schedule) => schedule.after(&from).next().is_some_and(|next| next <= to),
            Err(e) => {
                tracing::warn!("Skipping job {}: {}", job.job_id, e);
                false
            }
        })
        .collect()
}

pub struct Scheduler {
    jobs: JobRepository,
    executions: ExecutionService,
    interval: Duration,
}

impl Scheduler {
    pub fn new(jobs: JobRepository, executions: ExecutionService, interval: Duration) -> Self {
        Self {
            jobs,
            executions,
            interval,
        }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        let mut last_tick = Utc::now();
        tracing::info!("Scheduler started, interval {:?}", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Utc::now();
                    if let Err(e) = self.tick(last_tick, now).await {
                        tracing::error!("Scheduler tick failed: {}", e);
                    }
                    last_tick = now;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Scheduler stopped");
    }

    async fn tick(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<()> {
        let jobs = self.jobs.list().await?;
        let due = due_jobs(&jobs, from, to);
        tracing::debug!("Scheduler tick: {} of {} jobs due", due.len(), jobs.len());

        for job in due {
            tracing::info!("Starting scheduled {}", job);
            if let Err(e) = self.executions.execute_job(job.job_id, None).await {
                tracing::error!("Scheduled run of job {} failed: {}", job.job_id, e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn job(id: i64, schedule: &str) -> Job {
        Job {
            job_id: id,
            name: format!("job{}", id),
            inventory: "hosts.yml".to_string(),
            playbook: "site.yml".to_string(),
            schedule: schedule.to_string(),
            permission_id: None,
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn accepts_crontab_expressions() {
        assert!(parse_schedule("*/5 * * * *").is_ok());
        assert!(parse_schedule("0 3 * * 1-5").is_ok());
        assert!(parse_schedule("30 2 1 * 0").is_ok());
        assert!(parse_schedule("0 0 * * 5-7").is_ok());
        assert!(parse_schedule("0 0 * * MON-FRI").is_ok());
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert!(parse_schedule("").is_err());
        assert!(parse_schedule("* * * *").is_err());
        assert!(parse_schedule("61 * * * *").is_err());
        assert!(parse_schedule("0 0 * * 8").is_err());
    }

    #[test]
    fn sunday_is_zero_and_seven() {
        // 2026-10-18 is a Sunday
        let from = Utc.with_ymd_and_hms(2026, 10, 17, 23, 59, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 10, 18, 0, 1, 0).unwrap();
        let jobs = vec![job(1, "0 0 * * 0"), job(2, "0 0 * * 7"), job(3, "0 0 * * 1")];
        let due: Vec<i64> = due_jobs(&jobs, from, to).iter().map(|j| j.job_id).collect();
        assert_eq!(due, vec![1, 2]);
    }

    #[test]
    fn due_window_is_half_open() {
        let from = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 10).unwrap();
        let jobs = vec![job(1, "0 12 * * *"), job(2, "1 12 * * *"), job(3, ""), job(4, "bogus")];
        assert!(due_jobs(&jobs, from, to).is_empty());

        let from = Utc.with_ymd_and_hms(2026, 10, 14, 11, 59, 55).unwrap();
        let due: Vec<i64> = due_jobs(&jobs, from, to).iter().map(|j| j.job_id).collect();
        assert_eq!(due, vec![1]);
    }
}
