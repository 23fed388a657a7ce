use crate::error::Error;
use crate::history::SessionRecord;
use std::ops::RangeInclusive;

pub const FOCUS_MINUTES_RANGE: RangeInclusive<u32> = 1..=120;
pub const BREAK_MINUTES_RANGE: RangeInclusive<u32> = 1..=30;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// One checklist entry. Tasks live for the process lifetime only and are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub text: String,
    pub completed: bool,
}

/// Focus/break interval lengths in minutes, clamped to their valid ranges.
/// These are inputs re-supplied each session, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    focus_minutes: u32,
    break_minutes: u32,
}

impl Durations {
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        Self {
            focus_minutes: clamp_to(focus_minutes, FOCUS_MINUTES_RANGE),
            break_minutes: clamp_to(break_minutes, BREAK_MINUTES_RANGE),
        }
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn focus_secs(&self) -> u64 {
        self.focus_minutes as u64 * 60
    }

    pub fn adjust_focus(&mut self, delta: i32) {
        self.focus_minutes = adjust_within(self.focus_minutes, delta, FOCUS_MINUTES_RANGE);
    }

    pub fn adjust_break(&mut self, delta: i32) {
        self.break_minutes = adjust_within(self.break_minutes, delta, BREAK_MINUTES_RANGE);
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

fn clamp_to(value: u32, range: RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

fn adjust_within(value: u32, delta: i32, range: RangeInclusive<u32>) -> u32 {
    let adjusted = value.saturating_add_signed(delta);
    clamp_to(adjusted, range)
}

/// In-memory state for one interactive study session: the task checklist,
/// the configured durations, and the accumulated session log.
#[derive(Debug)]
pub struct Session {
    pub tasks: Vec<Task>,
    pub durations: Durations,
    /// Append-only log: records loaded from disk at startup plus records
    /// added this session, kept in date order.
    pub log: Vec<SessionRecord>,
}

impl Session {
    pub fn new(durations: Durations, log: Vec<SessionRecord>) -> Self {
        Self {
            tasks: Vec::new(),
            durations,
            log,
        }
    }

    /// Appends a task. Empty or whitespace-only text is a silent no-op.
    /// Returns whether a task was added.
    pub fn add_task(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.tasks.push(Task {
            text: text.to_string(),
            completed: false,
        });
        true
    }

    /// Marks the task at `index` completed. One-directional: a completed
    /// task stays completed.
    pub fn complete_task(&mut self, index: usize) -> Result<(), Error> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        task.completed = true;
        Ok(())
    }

    /// Appends a record for the currently configured focus duration and
    /// returns the full log for persisting.
    pub fn record_session(&mut self) -> &[SessionRecord] {
        self.log
            .push(SessionRecord::now(self.durations.focus_minutes()));
        &self.log
    }
}
