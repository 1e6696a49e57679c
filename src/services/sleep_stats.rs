use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::database::models::Sleep;
use crate::services::content::ContentService;
use crate::services::error::ServiceResult;
use crate::services::user_info::UserInfoService;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SleepStats {
    pub sleep_count: usize,
    pub total_minutes: i64,
    pub average_minutes_per_day: f64,
    pub last_year_minutes: i64,
    pub last_year_average_minutes: f64,
    pub last_month_minutes: i64,
    pub last_month_average_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepChartDay {
    pub date: NaiveDate,
    pub minutes: i64,
}

/// First local instant of `date`; zones that skip midnight start later
fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let mut local = date.and_time(chrono::NaiveTime::MIN);
    for _ in 0..4 {
        if let Some(start) = tz.from_local_datetime(&local).earliest() {
            return start.with_timezone(&Utc);
        }
        local += Duration::minutes(30);
    }
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Minutes of `[start, end)` falling on each local calendar day. The
/// buckets sum to the interval's whole minutes.
pub fn split_by_day(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Vec<(NaiveDate, i64)> {
    let mut out = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let day = cursor.with_timezone(&tz).date_naive();
        let next_day = day.succ_opt().map(|d| start_of_day(d, tz)).unwrap_or(end);
        let segment_end = next_day.min(end).max(cursor + Duration::seconds(1));
        out.push((day, (segment_end - cursor).num_seconds()));
        cursor = segment_end;
    }

    // Round once on the totals so splitting never loses minutes
    let total_minutes = (end - start).num_minutes().max(0);
    let mut allocated = 0;
    let last = out.len().saturating_sub(1);
    out.into_iter()
        .enumerate()
        .map(|(i, (day, seconds))| {
            let minutes = if i == last { total_minutes - allocated } else { seconds / 60 };
            allocated += minutes;
            (day, minutes)
        })
        .collect()
}

/// Minutes asleep per local day, ascending
pub fn daily_minutes(sleeps: &[Sleep], tz: Tz) -> BTreeMap<NaiveDate, i64> {
    let mut days = BTreeMap::new();
    for sleep in sleeps {
        for (day, minutes) in split_by_day(sleep.sleep_start, sleep.sleep_end, tz) {
            *days.entry(day).or_insert(0) += minutes;
        }
    }
    days
}

fn average(total: i64, elapsed_days: i64, window: Option<i64>) -> f64 {
    let days = match window {
        Some(window) => elapsed_days.min(window),
        None => elapsed_days,
    };
    total as f64 / days.max(1) as f64
}

pub fn compute_stats(sleeps: &[Sleep], tz: Tz, now: DateTime<Utc>) -> SleepStats {
    let days = daily_minutes(sleeps, tz);
    let today = now.with_timezone(&tz).date_naive();
    let Some(first_day) = days.keys().next().copied() else {
        return SleepStats::default();
    };
    let elapsed_days = (today - first_day).num_days() + 1;

    let window_total = |window_days: i64| -> i64 {
        let from = today - Duration::days(window_days - 1);
        days.range(from..).filter(|(day, _)| **day <= today).map(|(_, m)| m).sum()
    };

    let total_minutes: i64 = days.values().sum();
    let last_year_minutes = window_total(365);
    let last_month_minutes = window_total(30);

    SleepStats {
        sleep_count: sleeps.len(),
        total_minutes,
        average_minutes_per_day: average(total_minutes, elapsed_days, None),
        last_year_minutes,
        last_year_average_minutes: average(last_year_minutes, elapsed_days, Some(365)),
        last_month_minutes,
        last_month_average_minutes: average(last_month_minutes, elapsed_days, Some(30)),
    }
}

pub fn chart(sleeps: &[Sleep], tz: Tz, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<SleepChartDay> {
    daily_minutes(sleeps, tz)
        .into_iter()
        .filter(|(date, _)| from.map_or(true, |f| *date >= f) && to.map_or(true, |t| *date <= t))
        .map(|(date, minutes)| SleepChartDay { date, minutes })
        .collect()
}

impl ContentService<Sleep> {
    async fn visible_with_zone(&self, progeny_id: i32, email: &str, users: &UserInfoService) -> ServiceResult<(Vec<Sleep>, Tz)> {
        let access = self.access().resolve(progeny_id, email).await?;
        let tz = users.time_zone_for(email, &access.progeny).await?;
        Ok((self.list_visible(&access, None).await?, tz))
    }

    pub async fn stats(&self, progeny_id: i32, email: &str, users: &UserInfoService) -> ServiceResult<SleepStats> {
        let (sleeps, tz) = self.visible_with_zone(progeny_id, email, users).await?;
        Ok(compute_stats(&sleeps, tz, Utc::now()))
    }

    pub async fn chart(
        &self,
        progeny_id: i32,
        email: &str,
        users: &UserInfoService,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ServiceResult<Vec<SleepChartDay>> {
        let (sleeps, tz) = self.visible_with_zone(progeny_id, email, users).await?;
        Ok(chart(&sleeps, tz, from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(tz: Tz, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        tz.with_ymd_and_hms(y, m, d, h, min, 0).single().unwrap().with_timezone(&Utc)
    }

    fn sleep(start: DateTime<Utc>, end: DateTime<Utc>) -> Sleep {
        Sleep { sleep_start: start, sleep_end: end, ..Default::default() }
    }

    #[test]
    fn splits_across_local_midnight() {
        let tz: Tz = "Europe/Copenhagen".parse().unwrap();
        let split = split_by_day(local(tz, 2024, 3, 1, 23, 0), local(tz, 2024, 3, 2, 1, 30), tz);
        assert_eq!(
            split,
            vec![
                (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 60),
                (NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), 90),
            ]
        );
    }

    #[test]
    fn day_buckets_follow_the_time_zone() {
        // 22:00-23:00 UTC is the next morning in Tokyo
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 22, 0, 0).unwrap();
        let split = split_by_day(start, start + Duration::hours(1), Tz::Asia__Tokyo);
        assert_eq!(split, vec![(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), 60)]);
    }

    #[test]
    fn buckets_sum_to_duration_over_several_days() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 17, 0).unwrap();
        let end = start + Duration::minutes(3 * 1440 + 7);
        let split = split_by_day(start, end, Tz::UTC);
        assert_eq!(split.len(), 4);
        assert_eq!(split.iter().map(|(_, m)| m).sum::<i64>(), 3 * 1440 + 7);
    }

    #[test]
    fn stats_average_over_elapsed_days() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let sleeps = vec![
            sleep(
                Utc.with_ymd_and_hms(2024, 6, 9, 20, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 6, 10, 6, 0, 0).unwrap(),
            ),
            sleep(
                Utc.with_ymd_and_hms(2023, 1, 1, 13, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2023, 1, 1, 15, 0, 0).unwrap(),
            ),
        ];
        let stats = compute_stats(&sleeps, Tz::UTC, now);
        assert_eq!(stats.sleep_count, 2);
        assert_eq!(stats.total_minutes, 600 + 120);
        assert_eq!(stats.last_month_minutes, 600);
        assert_eq!(stats.last_year_minutes, 600);
        assert!((stats.last_month_average_minutes - 20.0).abs() < 1e-9);

        let elapsed = (NaiveDate::from_ymd_opt(2024, 6, 10).unwrap() - NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()).num_days() + 1;
        assert!((stats.average_minutes_per_day - 720.0 / elapsed as f64).abs() < 1e-9);
    }

    #[test]
    fn steady_daily_sleep_averages_to_the_daily_amount() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 23, 0, 0).unwrap();
        let sleeps: Vec<Sleep> = (0..60)
            .map(|d| {
                let start = Utc.with_ymd_and_hms(2024, 6, 10, 13, 0, 0).unwrap() - Duration::days(d);
                sleep(start, start + Duration::hours(1))
            })
            .collect();
        let stats = compute_stats(&sleeps, Tz::UTC, now);
        assert_eq!(stats.last_month_minutes, 30 * 60);
        assert!((stats.last_month_average_minutes - 60.0).abs() < 1e-9);
        assert_eq!(stats.last_year_minutes, 60 * 60);
        assert!((stats.last_year_average_minutes - 60.0).abs() < 1e-9);
        assert!((stats.average_minutes_per_day - 60.0).abs() < 1e-9);
    }

    #[test]
    fn empty_history_yields_zero_stats() {
        assert_eq!(compute_stats(&[], Tz::UTC, Utc::now()), SleepStats::default());
    }

    #[test]
    fn chart_filters_by_range() {
        let sleeps = vec![sleep(
            Utc.with_ymd_and_hms(2024, 2, 1, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 2, 7, 0, 0).unwrap(),
        )];
        let days = chart(&sleeps, Tz::UTC, NaiveDate::from_ymd_opt(2024, 2, 2), None);
        assert_eq!(days, vec![SleepChartDay { date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(), minutes: 420 }]);
    }
}
