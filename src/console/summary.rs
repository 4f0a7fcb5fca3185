use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

/// Present/absent tally over a set of records the caller already restricted
/// to the dates of interest.
///
/// Records with an unrecognized status count toward `total` and `unrecognized`
/// only, so `present + absent + unrecognized == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = 2)]
    pub present: usize,
    #[schema(example = 1)]
    pub absent: usize,
    #[schema(example = 0)]
    pub unrecognized: usize,
    #[schema(example = 3)]
    pub total: usize,
}

pub fn summarize<'a, I>(records: I) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    records
        .into_iter()
        .fold(AttendanceSummary::default(), |mut summary, record| {
            summary.total += 1;
            match record.status.known() {
                Some(AttendanceStatus::Present) => summary.present += 1,
                Some(AttendanceStatus::Absent) => summary.absent += 1,
                None => summary.unrecognized += 1,
            }
            summary
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({
    "date": "2024-06-10",
    "total_employees": 12,
    "today_records": 10,
    "present_today": 9,
    "absent_today": 1,
    "unrecognized_today": 0
}))]
pub struct DashboardStats {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub total_employees: usize,
    pub today_records: usize,
    pub present_today: usize,
    pub absent_today: usize,
    pub unrecognized_today: usize,
}

impl DashboardStats {
    pub fn new(date: NaiveDate, total_employees: usize, today: AttendanceSummary) -> Self {
        Self {
            date,
            total_employees,
            today_records: today.total,
            present_today: today.present,
            absent_today: today.absent,
            unrecognized_today: today.unrecognized,
        }
    }
}
