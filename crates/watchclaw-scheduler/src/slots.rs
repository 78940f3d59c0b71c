//! Fire-slot tracking — at most one run per (date, hour) slot.
//!
//! The trigger set is fixed daily fire hours plus an hourly fallback tick.
//! Both can land in the same hour; keying served slots on (date, hour)
//! deduplicates them, so however many ticks fall inside a slot, it fires
//! once. The next slot boundary resets eligibility.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

use watchclaw_core::config::ScheduleConfig;

/// One served-slot memory. Fire-hour membership is evaluated against the
/// config snapshot passed to each check, so schedule edits between ticks
/// take effect without restart.
#[derive(Debug, Default)]
pub struct SlotTracker {
    last_served: Option<(NaiveDate, u32)>,
}

impl SlotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_of(now: DateTime<Utc>) -> (NaiveDate, u32) {
        (now.date_naive(), now.hour())
    }

    /// Whether a run is due at `now` under `schedule`.
    pub fn due(&self, now: DateTime<Utc>, schedule: &ScheduleConfig) -> bool {
        let (date, hour) = Self::slot_of(now);
        if self.last_served == Some((date, hour)) {
            return false;
        }
        schedule.hourly_fallback || schedule.fire_hours.contains(&hour)
    }

    /// Mark the slot containing `now` as served. Called before the run
    /// starts, so a failing run does not re-fire within its slot.
    pub fn mark_served(&mut self, now: DateTime<Utc>) {
        self.last_served = Some(Self::slot_of(now));
    }

    /// Combined due-check + mark. Returns true when a run should start.
    pub fn check_and_mark(&mut self, now: DateTime<Utc>, schedule: &ScheduleConfig) -> bool {
        if self.due(now, schedule) {
            self.mark_served(now);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn schedule(fire_hours: Vec<u32>, hourly_fallback: bool) -> ScheduleConfig {
        ScheduleConfig {
            fire_hours,
            hourly_fallback,
            tick_interval_secs: 60,
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, s).unwrap()
    }

    #[test]
    fn test_one_run_per_slot() {
        // Two ticks landing at 09:00:05 and 09:00:45 → exactly one run.
        let sched = schedule(vec![9, 15, 21], false);
        let mut tracker = SlotTracker::new();
        assert!(tracker.check_and_mark(at(9, 0, 5), &sched));
        assert!(!tracker.check_and_mark(at(9, 0, 45), &sched));
    }

    #[test]
    fn test_fallback_and_fire_hour_coinciding_deduplicated() {
        // Hour 9 is both a configured fire hour and covered by the hourly
        // fallback — still a single run for the slot.
        let sched = schedule(vec![9], true);
        let mut tracker = SlotTracker::new();
        assert!(tracker.check_and_mark(at(9, 0, 0), &sched));
        assert!(!tracker.check_and_mark(at(9, 0, 30), &sched));
        assert!(!tracker.check_and_mark(at(9, 59, 59), &sched));
    }

    #[test]
    fn test_next_slot_resets_eligibility() {
        let sched = schedule(vec![], true);
        let mut tracker = SlotTracker::new();
        assert!(tracker.check_and_mark(at(9, 30, 0), &sched));
        assert!(tracker.check_and_mark(at(10, 0, 0), &sched));
    }

    #[test]
    fn test_no_fallback_skips_unconfigured_hours() {
        let sched = schedule(vec![9, 15, 21], false);
        let mut tracker = SlotTracker::new();
        assert!(!tracker.check_and_mark(at(10, 0, 0), &sched));
        assert!(!tracker.check_and_mark(at(14, 59, 59), &sched));
        assert!(tracker.check_and_mark(at(15, 0, 10), &sched));
    }

    #[test]
    fn test_same_hour_next_day_fires_again() {
        let sched = schedule(vec![9], false);
        let mut tracker = SlotTracker::new();
        let day1 = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap();
        assert!(tracker.check_and_mark(day1, &sched));
        assert!(tracker.check_and_mark(day2, &sched));
    }

    #[test]
    fn test_served_even_without_marking_due_hours() {
        // due() alone never mutates.
        let sched = schedule(vec![9], false);
        let tracker = SlotTracker::new();
        assert!(tracker.due(at(9, 0, 0), &sched));
        assert!(tracker.due(at(9, 0, 30), &sched));
    }
}
