use crate::console::window::DateWindow;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;

/// Filters chosen on the attendance list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the employee name; empty means no constraint.
    pub employee_name_query: String,
    pub date_window: DateWindow,
}

impl FilterCriteria {
    pub fn new(employee_name_query: impl Into<String>, date_window: DateWindow) -> Self {
        Self {
            employee_name_query: employee_name_query.into(),
            date_window,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.employee_name_query.is_empty() || !self.date_window.is_any()
    }
}

/// Records matching both the name query and the date window, in input order.
pub fn filter_attendance<'a>(
    records: &'a [AttendanceRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a AttendanceRecord> {
    let needle = criteria.employee_name_query.to_lowercase();

    records
        .iter()
        .filter(|record| {
            let name_matches =
                needle.is_empty() || record.employee_name.to_lowercase().contains(&needle);
            name_matches && criteria.date_window.matches(&record.date)
        })
        .collect()
}

/// Employees whose name, code, email or department contains `query`, case-insensitively.
pub fn search_employees<'a>(employees: &'a [Employee], query: &str) -> Vec<&'a Employee> {
    let needle = query.to_lowercase();

    employees
        .iter()
        .filter(|e| {
            [&e.full_name, &e.employee_id, &e.email, &e.department]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
