//! Named date windows ("today", "this week", "this month") resolved against
//! an explicit reference date.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

use crate::model::attendance::RecordDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DateWindowKind {
    Today,
    ThisWeek,
    ThisMonth,
}

/// Concrete date predicate. Interval bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DateWindow {
    #[default]
    Any,
    Day {
        date: NaiveDate,
    },
    Week {
        start: NaiveDate,
        end: NaiveDate,
    },
    Month {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl DateWindow {
    pub fn resolve(kind: Option<DateWindowKind>, reference: NaiveDate) -> Self {
        match kind {
            None => DateWindow::Any,
            Some(DateWindowKind::Today) => DateWindow::Day { date: reference },
            Some(DateWindowKind::ThisWeek) => {
                let week = reference.week(Weekday::Mon);
                DateWindow::Week {
                    start: week.first_day(),
                    end: week.last_day(),
                }
            }
            Some(DateWindowKind::ThisMonth) => {
                let (start, end) = month_bounds(reference);
                DateWindow::Month { start, end }
            }
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, DateWindow::Any)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateWindow::Any => true,
            DateWindow::Day { date: day } => date == day,
            DateWindow::Week { start, end } | DateWindow::Month { start, end } => {
                start <= date && date <= end
            }
        }
    }

    /// Malformed record dates only pass the `Any` window.
    pub fn matches(&self, date: &RecordDate) -> bool {
        if self.is_any() {
            return true;
        }
        date.calendar_date().is_some_and(|d| self.contains(d))
    }
}

fn month_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = reference.with_day(1).unwrap_or(reference);
    let (year, month) = if reference.month() == 12 {
        (reference.year() + 1, 1)
    } else {
        (reference.year(), reference.month() + 1)
    };
    let end = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}
