use chrono::{DateTime, NaiveDate, TimeZone};

use crate::types::StatusState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeCounter {
    count_today: u32,
    day_marker: NaiveDate,
}

impl ChangeCounter {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            count_today: 0,
            day_marker: today,
        }
    }

    pub fn record(&mut self, today: NaiveDate) -> u32 {
        if today > self.day_marker {
            self.count_today = 0;
            self.day_marker = today;
        }
        self.count_today = self.count_today.saturating_add(1);
        self.count_today
    }

    pub fn count_today(&self) -> u32 {
        self.count_today
    }

    pub fn day_marker(&self) -> NaiveDate {
        self.day_marker
    }
}

#[derive(Debug, Clone)]
pub struct StatusTracker {
    state: StatusState,
    last_changed: Option<String>,
    counter: ChangeCounter,
    generation: u64,
}

impl StatusTracker {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: StatusState::Normal,
            last_changed: None,
            counter: ChangeCounter::new(today),
            generation: 0,
        }
    }

    pub fn external_change<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> u64
    where
        Tz::Offset: std::fmt::Display,
    {
        self.counter.record(now.date_naive());
        self.last_changed = Some(now.format("%a @ %H:%M").to_string());
        self.state = StatusState::ExternalChange;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Returns to normal only if no newer flag was raised since `generation`.
    pub fn revert(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state == StatusState::Normal {
            return false;
        }
        self.state = StatusState::Normal;
        true
    }

    pub fn state(&self) -> StatusState {
        self.state
    }

    pub fn last_changed(&self) -> &str {
        self.last_changed.as_deref().unwrap_or("never")
    }

    pub fn changes_today(&self) -> u32 {
        self.counter.count_today()
    }
}
