//! Weekly opening-hours aggregation for the relay detail table.
//!
//! Upstream feeds send one row per opening interval, keyed by a schema.org
//! day URI. The table shows at most two columns (morning and afternoon), so
//! intervals are grouped per French weekday and back-to-back rows are merged
//! into a single span.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Display value for a closed day or a midnight sentinel time.
pub const CLOSED: &str = "Fermé";

const MIDNIGHT: &str = "00:00:00";

/// schema.org day identifiers in display order, with their French names.
pub const DAYS: [(&str, &str); 7] = [
    ("http://schema.org/Monday", "Lundi"),
    ("http://schema.org/Tuesday", "Mardi"),
    ("http://schema.org/Wednesday", "Mercredi"),
    ("http://schema.org/Thursday", "Jeudi"),
    ("http://schema.org/Friday", "Vendredi"),
    ("http://schema.org/Saturday", "Samedi"),
    ("http://schema.org/Sunday", "Dimanche"),
];

/// One raw opening interval, e.g. Monday `09:00:00`–`12:30:00`.
///
/// Times are zero-padded `HH:MM:SS` strings; ordering and merging compare
/// them lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHour {
    pub day_of_week: String,
    pub opens: String,
    pub closes: String,
}

/// The intervals kept for one weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedDay {
    pub main: Option<OpeningHour>,
    pub afternoon: Option<OpeningHour>,
    /// `true` when a second interval touched `main` and was folded into it.
    pub merged: bool,
    /// Intervals beyond the second one, which the two-column table cannot show.
    pub dropped: usize,
}

impl GroupedDay {
    /// Morning cell: `"HH:MM – HH:MM"`, or [`CLOSED`] without a main interval.
    #[must_use]
    pub fn morning_display(&self) -> String {
        match &self.main {
            Some(h) => span(h),
            None => CLOSED.to_string(),
        }
    }

    /// Afternoon cell: empty when merged or when there is no afternoon interval.
    #[must_use]
    pub fn afternoon_display(&self) -> String {
        if self.merged {
            return String::new();
        }
        match &self.afternoon {
            Some(h) => span(h),
            None => String::new(),
        }
    }

    fn has_split_afternoon(&self) -> bool {
        self.afternoon.is_some() && !self.merged
    }
}

/// One rendered row of the opening-hours table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursRow {
    pub day: &'static str,
    pub morning: String,
    pub afternoon: String,
}

/// Opening hours grouped by French day name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedHours {
    days: HashMap<String, GroupedDay>,
}

impl GroupedHours {
    #[must_use]
    pub fn get(&self, french_day: &str) -> Option<&GroupedDay> {
        self.days.get(french_day)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Whether the table needs a second time column at all.
    #[must_use]
    pub fn has_afternoon_column(&self) -> bool {
        self.days.values().any(GroupedDay::has_split_afternoon)
    }

    /// The seven weekday rows, Monday first. Days without data render as closed.
    #[must_use]
    pub fn rows(&self) -> Vec<HoursRow> {
        let closed = GroupedDay::default();
        DAYS.iter()
            .map(|(_, french)| {
                let day = self.days.get(*french).unwrap_or(&closed);
                HoursRow {
                    day: *french,
                    morning: day.morning_display(),
                    afternoon: day.afternoon_display(),
                }
            })
            .collect()
    }
}

/// Maps a schema.org day URI to its French name; unknown values pass through.
#[must_use]
pub fn day_of_week_to_french(day: &str) -> &str {
    DAYS.iter()
        .find(|(uri, _)| *uri == day)
        .map_or(day, |(_, french)| *french)
}

/// Formats a stored `HH:MM:SS` time as `HH:MM`.
///
/// Absent times and the `00:00:00` sentinel render as [`CLOSED`].
#[must_use]
pub fn format_hours(time: Option<&str>) -> String {
    match time {
        None | Some("" | MIDNIGHT) => CLOSED.to_string(),
        Some(t) => {
            let mut parts = t.split(':');
            let h = parts.next().unwrap_or_default();
            let m = parts.next().unwrap_or_default();
            format!("{h}:{m}")
        }
    }
}

fn span(h: &OpeningHour) -> String {
    format!(
        "{} – {}",
        format_hours(Some(&h.opens)),
        format_hours(Some(&h.closes))
    )
}

/// Groups raw intervals per French weekday, merging touching intervals.
///
/// Input is sorted by `(day_of_week, opens)`. Per day, the first interval
/// becomes `main`; a second one that opens at or before `main.closes`
/// extends `main` and marks the day merged, otherwise it becomes
/// `afternoon`. Anything after that is counted in `dropped`.
#[must_use]
pub fn group_by_day(hours: &[OpeningHour]) -> GroupedHours {
    let mut sorted = hours.to_vec();
    sorted.sort_by(|a, b| {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then_with(|| a.opens.cmp(&b.opens))
    });

    let mut days: HashMap<String, GroupedDay> = HashMap::new();
    for interval in sorted {
        let day = days
            .entry(day_of_week_to_french(&interval.day_of_week).to_string())
            .or_default();

        match day.main.as_mut() {
            None => day.main = Some(interval),
            Some(main) if day.afternoon.is_none() => {
                if interval.opens <= main.closes {
                    main.closes = interval.closes;
                    day.merged = true;
                } else {
                    day.afternoon = Some(interval);
                }
            }
            Some(_) => day.dropped += 1,
        }
    }

    GroupedHours { days }
}

#[cfg(test)]
#[path = "hours_test.rs"]
mod tests;
