use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Period, State};

/// Persisted leave request. Duration is never stored; it is derived from
/// the date range / half-day flag on every read.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: u64,
    pub reference: String,
    pub employee_id: u64,
    pub department_id: u64,
    pub leave_type_id: u64,
    pub date_from: NaiveDate,
    /// NULL for half-day requests.
    pub date_to: Option<NaiveDate>,
    pub half_day: bool,
    pub period: Option<Period>,
    pub description: Option<String>,
    pub attachment: Option<String>,
    pub state: State,
    pub created_at: Option<DateTime<Utc>>,
}
