use chrono::{Datelike, Days, NaiveDate};
use serde::Deserialize;

use crate::error::CoreError;
use crate::models::{EventDraft, RepeatInfo, RepeatType};

/// End date used when a rule does not set one, so expansion is always finite.
pub fn default_repeat_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2050, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Configuration for recurrence expansion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Upper bound applied to rules without an explicit end date
    pub default_end_date: NaiveDate,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            default_end_date: default_repeat_end_date(),
        }
    }
}

/// Result of stepping `k` periods away from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Date(NaiveDate),
    /// The anchor day does not exist in the target month/year. Carries the
    /// first day of that period so termination can still be decided.
    Missing(NaiveDate),
    /// Stepped past what `NaiveDate` can represent.
    OutOfRange,
}

/// Lazy sequence of occurrence dates for one rule.
///
/// Every candidate is computed from the anchor and the step count, never
/// from the previously produced date, so a skipped month does not shift
/// later occurrences. Cloning restarts from the clone's position.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDate,
    repeat_type: RepeatType,
    interval: u32,
    end_date: NaiveDate,
    step: u64,
    done: bool,
}

impl Occurrences {
    fn candidate(&self, k: u64) -> Candidate {
        let span = k * u64::from(self.interval);
        match self.repeat_type {
            RepeatType::None => {
                if k == 0 {
                    Candidate::Date(self.anchor)
                } else {
                    Candidate::OutOfRange
                }
            }
            RepeatType::Daily => self.add_days(span),
            RepeatType::Weekly => match span.checked_mul(7) {
                Some(days) => self.add_days(days),
                None => Candidate::OutOfRange,
            },
            RepeatType::Monthly => {
                let months = i64::from(self.anchor.year()) * 12 + i64::from(self.anchor.month0());
                let Some(total) = i64::try_from(span).ok().and_then(|s| months.checked_add(s)) else {
                    return Candidate::OutOfRange;
                };
                let Ok(year) = i32::try_from(total.div_euclid(12)) else {
                    return Candidate::OutOfRange;
                };
                // rem_euclid(12) is always in 0..12
                let month = total.rem_euclid(12) as u32 + 1;
                Self::resolve(year, month, self.anchor.day())
            }
            RepeatType::Yearly => {
                let Some(year) = i64::try_from(span)
                    .ok()
                    .and_then(|s| i64::from(self.anchor.year()).checked_add(s))
                    .and_then(|y| i32::try_from(y).ok())
                else {
                    return Candidate::OutOfRange;
                };
                match NaiveDate::from_ymd_opt(year, self.anchor.month(), self.anchor.day()) {
                    Some(date) => Candidate::Date(date),
                    None => match NaiveDate::from_ymd_opt(year, 1, 1) {
                        Some(start) => Candidate::Missing(start),
                        None => Candidate::OutOfRange,
                    },
                }
            }
        }
    }

    fn add_days(&self, days: u64) -> Candidate {
        self.anchor
            .checked_add_days(Days::new(days))
            .map_or(Candidate::OutOfRange, Candidate::Date)
    }

    fn resolve(year: i32, month: u32, day: u32) -> Candidate {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => Candidate::Date(date),
            None => match NaiveDate::from_ymd_opt(year, month, 1) {
                Some(start) => Candidate::Missing(start),
                None => Candidate::OutOfRange,
            },
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while !self.done {
            let k = self.step;
            self.step += 1;

            match self.candidate(k) {
                // A standalone event is its own single occurrence, whatever the bound says.
                Candidate::Date(date) if self.repeat_type == RepeatType::None => return Some(date),
                Candidate::Date(date) if date > self.end_date => self.done = true,
                Candidate::Date(date) => return Some(date),
                Candidate::Missing(period_start) if period_start > self.end_date => self.done = true,
                Candidate::Missing(_) => continue,
                Candidate::OutOfRange => self.done = true,
            }
        }
        None
    }
}

/// RecurrenceExpander: turns a recurrence rule and an anchor into concrete dates.
///
/// Responsibilities:
/// 1. Validate the rule (a repeating rule needs a positive interval)
/// 2. Produce the occurrence dates between the anchor and the rule's end date
/// 3. Skip, never clamp, occurrences whose day does not exist in the target period
/// 4. Copy the anchor event onto each occurrence date
#[derive(Debug, Clone, Default)]
pub struct RecurrenceExpander {
    config: ExpansionConfig,
}

impl RecurrenceExpander {
    pub fn new(config: ExpansionConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ExpansionConfig::default())
    }

    /// Gets the current configuration.
    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    /// Builds the occurrence sequence for `rule` starting at `anchor`.
    ///
    /// # Arguments
    /// * `anchor` - First occurrence; always part of the output when it is within bounds
    /// * `rule` - Recurrence rule to step by
    ///
    /// # Returns
    /// * `Result<Occurrences, CoreError>` - Lazy date sequence or a configuration error
    ///
    /// # Behavior
    /// - `none` yields exactly the anchor date
    /// - `daily`/`weekly` step by `interval` days/weeks
    /// - `monthly`/`yearly` keep the anchor's day (and month) and skip periods lacking it
    /// - Stops at the first candidate past the end date, or the configured default
    pub fn occurrences(&self, anchor: NaiveDate, rule: &RepeatInfo) -> Result<Occurrences, CoreError> {
        if rule.is_repeating() && rule.interval == 0 {
            return Err(CoreError::InvalidRecurrence(format!(
                "{} rule needs an interval of at least 1",
                rule.repeat_type
            )));
        }

        Ok(Occurrences {
            anchor,
            repeat_type: rule.repeat_type,
            interval: rule.interval,
            end_date: rule.end_date.unwrap_or(self.config.default_end_date),
            step: 0,
            done: false,
        })
    }

    /// Expands a repeating draft into one draft per occurrence date.
    ///
    /// Each copy keeps every attribute of `anchor` except `date`. Passing a
    /// non-repeating draft is a caller error.
    pub fn expand(&self, anchor: &EventDraft) -> Result<Vec<EventDraft>, CoreError> {
        if !anchor.repeat.is_repeating() {
            return Err(CoreError::InvalidRecurrence(
                "cannot expand an event that does not repeat".to_string(),
            ));
        }

        let instances: Vec<EventDraft> = self
            .occurrences(anchor.date, &anchor.repeat)?
            .map(|date| EventDraft {
                date,
                ..anchor.clone()
            })
            .collect();

        tracing::debug!(
            title = %anchor.title,
            repeat = %anchor.repeat.repeat_type,
            instances = instances.len(),
            "Expanded recurring event"
        );
        Ok(instances)
    }

    /// Preview the first `count` occurrence dates of a rule.
    pub fn preview(&self, anchor: NaiveDate, rule: &RepeatInfo, count: usize) -> Result<Vec<NaiveDate>, CoreError> {
        Ok(self.occurrences(anchor, rule)?.take(count).collect())
    }
}
