use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{self, DomainError, State};

/// Grouping key for the generic report view. The "by employee" report is
/// just this view with its default grouping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Employee,
    Department,
    LeaveType,
    State,
    DateFrom,
    DateTo,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    /// Grouping column, defaults to employee
    #[param(example = "employee")]
    pub group_by: Option<GroupBy>,
    /// Filter by workflow state
    #[param(example = "validate_two")]
    pub state: Option<String>,
}

/// One joined leave row with the display names the report groups on.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub employee_name: String,
    pub department_name: String,
    pub leave_type_name: String,
    pub state: State,
    pub date_from: NaiveDate,
    pub date_to: Option<NaiveDate>,
    pub half_day: bool,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct ReportGroup {
    #[schema(example = "John Doe")]
    pub key: String,
    #[schema(example = 3)]
    pub request_count: u64,
    /// Sum of derived durations; never read from storage.
    #[schema(example = 7.5)]
    pub total_days: f64,
}

#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    pub group_by: String,
    pub groups: Vec<ReportGroup>,
}

fn group_key(row: &ReportRow, group_by: GroupBy) -> String {
    match group_by {
        GroupBy::Employee => row.employee_name.clone(),
        GroupBy::Department => row.department_name.clone(),
        GroupBy::LeaveType => row.leave_type_name.clone(),
        GroupBy::State => row.state.to_string(),
        GroupBy::DateFrom => row.date_from.to_string(),
        GroupBy::DateTo => row
            .date_to
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(none)".to_string()),
    }
}

/// Buckets rows by the requested key, counting requests and summing the
/// derived durations. Ordered by key for stable output.
pub fn group_requests(
    rows: &[ReportRow],
    group_by: GroupBy,
) -> Result<Vec<ReportGroup>, DomainError> {
    let mut buckets: BTreeMap<String, (u64, f64)> = BTreeMap::new();

    for row in rows {
        let days = domain::requested_days(row.date_from, row.date_to, row.half_day)?;
        let entry = buckets.entry(group_key(row, group_by)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += days;
    }

    Ok(buckets
        .into_iter()
        .map(|(key, (request_count, total_days))| ReportGroup {
            key,
            request_count,
            total_days,
        })
        .collect())
}

/* =========================
Grouped leave report
========================= */
/// for the grouped reporting table endpoint
#[utoipa::path(
    get,
    path = "/api/v1/reports/leave",
    params(ReportQuery),
    responses(
        (status = 200, description = "Grouped leave report", body = ReportResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reporting"
)]
pub async fn leave_report(
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let group_by = query.group_by.unwrap_or_default();

    let mut sql = String::from(
        r#"
        SELECT CONCAT(e.first_name, ' ', e.last_name) AS employee_name,
               d.name AS department_name,
               t.name AS leave_type_name,
               l.state, l.date_from, l.date_to, l.half_day
        FROM leave_requests l
        JOIN employees e ON e.id = l.employee_id
        JOIN departments d ON d.id = l.department_id
        JOIN leave_types t ON t.id = l.leave_type_id
        "#,
    );

    if query.state.is_some() {
        sql.push_str(" WHERE l.state = ?");
    }

    let mut data_q = sqlx::query_as::<_, ReportRow>(&sql);
    if let Some(state) = query.state.as_deref() {
        data_q = data_q.bind(state);
    }

    let rows = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch report rows");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let groups = group_requests(&rows, group_by).map_err(|e| {
        tracing::error!(error = %e, "Stored leave request has an invalid range");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(ReportResponse {
        group_by: group_by.to_string(),
        groups,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(
        employee: &str,
        leave_type: &str,
        state: State,
        from: NaiveDate,
        to: Option<NaiveDate>,
        half_day: bool,
    ) -> ReportRow {
        ReportRow {
            employee_name: employee.to_string(),
            department_name: "Engineering".to_string(),
            leave_type_name: leave_type.to_string(),
            state,
            date_from: from,
            date_to: to,
            half_day,
        }
    }

    fn sample_rows() -> Vec<ReportRow> {
        vec![
            // Mon-Fri, 5 business days
            row(
                "John Doe",
                "Annual",
                State::ValidateTwo,
                date(2024, 6, 3),
                Some(date(2024, 6, 7)),
                false,
            ),
            // half day
            row(
                "John Doe",
                "Sick",
                State::ToSubmit,
                date(2024, 6, 10),
                None,
                true,
            ),
            // single weekday
            row(
                "Jane Roe",
                "Annual",
                State::Refused,
                date(2024, 6, 4),
                Some(date(2024, 6, 4)),
                false,
            ),
        ]
    }

    #[test]
    fn test_groups_by_employee_with_derived_totals() {
        let groups = group_requests(&sample_rows(), GroupBy::Employee).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Jane Roe");
        assert_eq!(groups[0].request_count, 1);
        assert_eq!(groups[0].total_days, 1.0);
        assert_eq!(groups[1].key, "John Doe");
        assert_eq!(groups[1].request_count, 2);
        assert_eq!(groups[1].total_days, 5.5);
    }

    #[test]
    fn test_groups_by_leave_type() {
        let groups = group_requests(&sample_rows(), GroupBy::LeaveType).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Annual");
        assert_eq!(groups[0].request_count, 2);
        assert_eq!(groups[1].key, "Sick");
        assert_eq!(groups[1].total_days, 0.5);
    }

    #[test]
    fn test_groups_by_state_uses_db_strings() {
        let groups = group_requests(&sample_rows(), GroupBy::State).unwrap();

        let keys: Vec<_> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["refused", "to_submit", "validate_two"]);
    }

    #[test]
    fn test_half_day_rows_group_under_missing_date_to() {
        let groups = group_requests(&sample_rows(), GroupBy::DateTo).unwrap();
        assert!(groups.iter().any(|g| g.key == "(none)"));
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let groups = group_requests(&[], GroupBy::Employee).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_corrupt_range_propagates_error() {
        let rows = vec![row(
            "John Doe",
            "Annual",
            State::ToSubmit,
            date(2024, 6, 7),
            Some(date(2024, 6, 3)),
            false,
        )];

        assert!(group_requests(&rows, GroupBy::Employee).is_err());
    }
}
