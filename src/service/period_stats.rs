use std::collections::HashSet;

use crate::error::ApiResult;
use crate::model::attendance::{DailyAttendanceRecord, DayStatus, PeriodStatistics};
use crate::service::day_aggregator::{self, is_weekend};
use crate::store::holidays;
use chrono::NaiveDate;
use sqlx::MySqlPool;

/// "7:45"-style rendering of a minute total.
pub fn format_hours_minutes(minutes: i64) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Working days in the inclusive range: weekends and holidays excluded.
pub fn working_days(start: NaiveDate, end: NaiveDate, holidays: &HashSet<NaiveDate>) -> u32 {
    let mut count = 0;
    let mut date = start;
    while date <= end {
        if !is_weekend(date) && !holidays.contains(&date) {
            count += 1;
        }
        date = date.succ_opt().expect("date overflow");
    }
    count
}

/// Fold aggregated day records into period statistics.
///
/// `on_time_percentage` is 100 when there are no present days: no data is
/// treated as no violations, not as failure.
pub fn summarize(records: &[DailyAttendanceRecord], total_days: u32) -> PeriodStatistics {
    let present: Vec<&DailyAttendanceRecord> = records
        .iter()
        .filter(|r| r.status == DayStatus::Present)
        .collect();
    let present_days = present.len() as u32;

    let on_time_percentage = if present_days == 0 {
        100.0
    } else {
        let on_time = present.iter().filter(|r| !r.late).count();
        on_time as f64 / present_days as f64 * 100.0
    };

    let average_minutes = if present_days == 0 {
        0
    } else {
        present.iter().map(|r| r.total_minutes).sum::<i64>() / present_days as i64
    };

    PeriodStatistics {
        present_days,
        total_days,
        average_hours: format_hours_minutes(average_minutes),
        on_time_percentage,
    }
}

/// Statistics for one employee over an inclusive date range.
pub async fn compute_stats(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<PeriodStatistics> {
    let records = day_aggregator::aggregate_range(pool, employee_id, start, end).await?;
    let holiday_dates: HashSet<NaiveDate> = holidays::in_range(pool, start, end)
        .await?
        .into_iter()
        .map(|(date, _)| date)
        .collect();
    Ok(summarize(&records, working_days(start, end, &holiday_dates)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn record(day: u32, status: DayStatus, total_minutes: i64, late: bool) -> DailyAttendanceRecord {
        DailyAttendanceRecord {
            employee_id: 1000,
            date: d(day),
            status,
            total_minutes,
            session_count: u32::from(status == DayStatus::Present),
            first_clock_in: None,
            last_clock_out: None,
            has_active_session: false,
            late,
        }
    }

    #[test]
    fn no_present_days_is_full_on_time_percentage() {
        let records = vec![
            record(3, DayStatus::Absent, 0, false),
            record(4, DayStatus::OnLeave, 0, false),
        ];
        let stats = summarize(&records, 2);
        assert_eq!(stats.present_days, 0);
        assert_eq!(stats.on_time_percentage, 100.0);
        assert_eq!(stats.average_hours, "0:00");
    }

    #[test]
    fn average_is_over_present_days_only() {
        let records = vec![
            record(3, DayStatus::Present, 480, false),
            record(4, DayStatus::Present, 450, true),
            record(5, DayStatus::Absent, 0, false),
        ];
        let stats = summarize(&records, 3);
        assert_eq!(stats.present_days, 2);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.average_hours, "7:45"); // (480 + 450) / 2 = 465
        assert_eq!(stats.on_time_percentage, 50.0);
    }

    #[test]
    fn working_days_skip_weekends_and_holidays() {
        // 2026-08-03 (Mon) .. 2026-08-09 (Sun), with one holiday midweek
        let holidays: HashSet<NaiveDate> = [d(5)].into_iter().collect();
        assert_eq!(working_days(d(3), d(9), &holidays), 4);
        assert_eq!(working_days(d(1), d(2), &HashSet::new()), 0); // Sat+Sun
    }

    #[test]
    fn hours_format_pads_minutes() {
        assert_eq!(format_hours_minutes(0), "0:00");
        assert_eq!(format_hours_minutes(65), "1:05");
        assert_eq!(format_hours_minutes(480), "8:00");
        assert_eq!(format_hours_minutes(605), "10:05");
    }
}
