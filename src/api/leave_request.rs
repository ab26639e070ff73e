use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    self, DomainError, LeaveAction, Period, State,
    transition::{self, apply},
    validation::{LeaveInput, validate},
};
use crate::model::leave_request::LeaveRequest;
use crate::model::leave_type::LeaveType;
use crate::utils::db_utils::{build_update_sql, execute_update};
use crate::utils::{department_cache, employee_filter};

const SELECT_LEAVE: &str = r#"
    SELECT id, reference, employee_id, department_id, leave_type_id,
           date_from, date_to, half_day, period, description, attachment,
           state, created_at
    FROM leave_requests
"#;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = 1000)]
    pub employee_id: u64,
    /// Filled from the employee's department when omitted.
    #[schema(example = 10)]
    pub department_id: Option<u64>,
    #[schema(example = 2)]
    pub leave_type_id: u64,
    #[schema(example = "2026-06-01", format = "date", value_type = String)]
    pub date_from: NaiveDate,
    #[schema(example = "2026-06-05", format = "date", value_type = String)]
    pub date_to: Option<NaiveDate>,
    #[schema(example = false)]
    pub half_day: Option<bool>,
    #[schema(example = "morning")]
    pub period: Option<Period>,
    #[schema(example = "Family trip")]
    pub description: Option<String>,
    /// Opaque file reference; required when the leave type mandates
    /// supporting documentation.
    pub attachment: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct UpdateLeave {
    pub leave_type_id: Option<u64>,
    #[schema(example = "2026-06-01", format = "date", value_type = String)]
    pub date_from: Option<NaiveDate>,
    #[schema(example = "2026-06-05", format = "date", value_type = String)]
    pub date_to: Option<NaiveDate>,
    pub half_day: Option<bool>,
    pub period: Option<Period>,
    pub description: Option<String>,
    pub attachment: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 1000)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = 10)]
    /// Filter by department ID
    pub department_id: Option<u64>,
    #[schema(example = 2)]
    /// Filter by leave type ID
    pub leave_type_id: Option<u64>,
    #[schema(example = "to_submit")]
    /// Filter by workflow state
    pub state: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "7f8de1a2-91a4-4a5e-8dbb-0d3e9c7a8b11")]
    pub reference: String,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 10)]
    pub department_id: u64,
    #[schema(example = 2)]
    pub leave_type_id: u64,
    #[schema(example = "2026-06-01", format = "date", value_type = String)]
    pub date_from: NaiveDate,
    #[schema(example = "2026-06-05", format = "date", value_type = String)]
    pub date_to: Option<NaiveDate>,
    pub half_day: bool,
    pub period: Option<Period>,
    pub description: Option<String>,
    pub attachment: Option<String>,
    pub state: State,
    #[schema(example = "Approved")]
    pub state_label: &'static str,
    /// Derived on every read, never stored.
    #[schema(example = 4.0)]
    pub requested_days: f64,
    /// UI guard: the approve action is hidden once fully approved.
    pub can_approve: bool,
    /// UI guard: the refuse action is hidden once refused.
    pub can_refuse: bool,
    #[schema(example = "Approve")]
    pub approve_label: &'static str,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DurationQuery {
    #[param(example = "2026-06-01", value_type = String)]
    #[schema(example = "2026-06-01", format = "date", value_type = String)]
    pub date_from: NaiveDate,
    #[param(example = "2026-06-05", value_type = String)]
    #[schema(example = "2026-06-05", format = "date", value_type = String)]
    pub date_to: Option<NaiveDate>,
    #[param(example = false)]
    pub half_day: Option<bool>,
}

fn domain_error_response(err: &DomainError) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "message": err.to_string()
    }))
}

fn to_response(row: LeaveRequest) -> actix_web::Result<LeaveResponse> {
    let requested_days =
        domain::requested_days(row.date_from, row.date_to, row.half_day).map_err(|e| {
            tracing::error!(leave_id = row.id, error = %e, "Stored leave request has an invalid range");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(LeaveResponse {
        id: row.id,
        reference: row.reference,
        employee_id: row.employee_id,
        department_id: row.department_id,
        leave_type_id: row.leave_type_id,
        date_from: row.date_from,
        date_to: row.date_to,
        half_day: row.half_day,
        period: row.period,
        description: row.description,
        attachment: row.attachment,
        state: row.state,
        state_label: row.state.label(),
        requested_days,
        can_approve: transition::can_approve(row.state),
        can_refuse: transition::can_refuse(row.state),
        approve_label: transition::approve_label(row.state),
        created_at: row.created_at,
    })
}

async fn fetch_leave(pool: &MySqlPool, leave_id: u64) -> actix_web::Result<Option<LeaveRequest>> {
    let sql = format!("{} WHERE id = ?", SELECT_LEAVE);

    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(leave_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })
}

async fn fetch_leave_type(
    pool: &MySqlPool,
    leave_type_id: u64,
) -> actix_web::Result<Option<LeaveType>> {
    sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, support_document FROM leave_types WHERE id = ?",
    )
    .bind(leave_type_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_type_id, "Failed to fetch leave type");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })
}

/// Resolves the employee's department, cache first, database second.
/// Returns None for employees that do not exist.
async fn resolve_department(
    pool: &MySqlPool,
    employee_id: u64,
) -> actix_web::Result<Option<u64>> {
    // Cuckoo filter: a definitive "no" skips the database entirely
    if !employee_filter::might_exist(employee_id) {
        return Ok(None);
    }

    if let Some(department_id) = department_cache::get(employee_id).await {
        return Ok(Some(department_id));
    }

    let department_id =
        sqlx::query_scalar::<_, u64>("SELECT department_id FROM employees WHERE id = ?")
            .bind(employee_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id, "Failed to resolve department");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    if let Some(department_id) = department_id {
        department_cache::mark(employee_id, department_id).await;
    }

    Ok(department_id)
}

/* =========================
Create leave request
========================= */
/// Swagger doc for create_leave endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "reference": "7f8de1a2-91a4-4a5e-8dbb-0d3e9c7a8b11",
            "state": "to_submit",
            "requested_days": 4.0
         })
        ),
        (status = 400, description = "Bad request")
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let half_day = payload.half_day.unwrap_or(false);

    // 1. the employee must exist; department falls back to theirs
    let employee_department = resolve_department(pool.get_ref(), payload.employee_id).await?;

    let Some(employee_department) = employee_department else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Employee not found"
        })));
    };

    let department_id = payload.department_id.unwrap_or(employee_department);

    // 2. the leave type decides whether an attachment is mandatory
    let Some(leave_type) = fetch_leave_type(pool.get_ref(), payload.leave_type_id).await? else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Invalid leave type"
        })));
    };

    // 3. validate dates / mode before anything touches the workflow
    let input = LeaveInput {
        date_from: payload.date_from,
        date_to: payload.date_to,
        half_day,
        period: payload.period,
        has_attachment: payload.attachment.is_some(),
    };

    if let Err(e) = validate(&input, Utc::now().date_naive(), leave_type.support_document) {
        return Ok(domain_error_response(&e));
    }

    // date_to is not collected for half-day requests
    let date_to = if half_day { None } else { payload.date_to };
    let period = if half_day { payload.period } else { None };

    let requested_days = domain::requested_days(payload.date_from, date_to, half_day)
        .map_err(|e| actix_web::error::ErrorBadRequest(e.to_string()))?;

    let reference = Uuid::new_v4().to_string();

    // 4. insert request
    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (reference, employee_id, department_id, leave_type_id,
             date_from, date_to, half_day, period, description, attachment, state)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&reference)
    .bind(payload.employee_id)
    .bind(department_id)
    .bind(payload.leave_type_id)
    .bind(payload.date_from)
    .bind(date_to)
    .bind(half_day)
    .bind(period.map(|p| p.to_string()))
    .bind(&payload.description)
    .bind(&payload.attachment)
    .bind(State::ToSubmit.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to create leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request submitted",
        "reference": reference,
        "state": State::ToSubmit,
        "requested_days": requested_days
    })))
}

/* =========================
Duration preview
========================= */
/// Called on every change of the date range / half-day toggle so the form
/// can display the requested units before submission.
#[utoipa::path(
    get,
    path = "/api/v1/leave/duration",
    params(DurationQuery),
    responses(
        (status = 200, description = "Requested duration in days", body = Object, example = json!({
            "requested_days": 4.0
        })),
        (status = 400, description = "Invalid date range")
    ),
    tag = "Leave"
)]
pub async fn duration_preview(
    query: web::Query<DurationQuery>,
) -> actix_web::Result<impl Responder> {
    match domain::requested_days(
        query.date_from,
        query.date_to,
        query.half_day.unwrap_or(false),
    ) {
        Ok(requested_days) => Ok(HttpResponse::Ok().json(json!({
            "requested_days": requested_days
        }))),
        Err(e) => Ok(domain_error_response(&e)),
    }
}

/* =========================
Approve leave
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved successfully", body = Object, example = json!({
            "title": "Time off approved",
            "body": "The time off request has been approved",
            "state": "validate_two"
        })),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    transition_leave(pool.get_ref(), path.into_inner(), LeaveAction::Approve).await
}

/* =========================
Refuse leave
========================= */
/// Swagger doc for refuse_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/refuse",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to refuse")
    ),
    responses(
        (status = 200, description = "Leave refused successfully", body = Object, example = json!({
            "title": "Time off refused",
            "body": "The time off request has been refused",
            "state": "refused"
        })),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn refuse_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    transition_leave(pool.get_ref(), path.into_inner(), LeaveAction::Refuse).await
}

/// Single-writer read-modify-write of one record's state. Re-applying an
/// action on a record already in the target state is a no-op, not an error.
async fn transition_leave(
    pool: &MySqlPool,
    leave_id: u64,
    action: LeaveAction,
) -> actix_web::Result<HttpResponse> {
    let Some(row) = fetch_leave(pool, leave_id).await? else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    };

    let outcome = apply(row.state, action);

    sqlx::query("UPDATE leave_requests SET state = ? WHERE id = ?")
        .bind(outcome.state.to_string())
        .bind(leave_id)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Leave transition failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    tracing::info!(leave_id, from = %row.state, to = %outcome.state, "Leave state updated");

    Ok(HttpResponse::Ok().json(json!({
        "title": outcome.notification.title,
        "body": outcome.notification.body,
        "state": outcome.state
    })))
}

/* =========================
Get one leave request
========================= */
/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    match fetch_leave(pool.get_ref(), leave_id).await? {
        Some(row) => Ok(HttpResponse::Ok().json(to_response(row)?)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        }))),
    }
}

/* =========================
List leave requests
========================= */
/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse)
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }

    if let Some(department_id) = query.department_id {
        where_sql.push_str(" AND department_id = ?");
        args.push(FilterValue::U64(department_id));
    }

    if let Some(leave_type_id) = query.leave_type_id {
        where_sql.push_str(" AND leave_type_id = ?");
        args.push(FilterValue::U64(leave_type_id));
    }

    if let Some(state) = query.state.as_deref() {
        where_sql.push_str(" AND state = ?");
        args.push(FilterValue::Str(state));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        "{} {} ORDER BY created_at DESC LIMIT ? OFFSET ?",
        SELECT_LEAVE, where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let rows = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let data = rows
        .into_iter()
        .map(to_response)
        .collect::<actix_web::Result<Vec<_>>>()?;

    // -------------------------
    // Response
    // -------------------------
    let response = LeaveListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Update leave request
========================= */
/// Swagger doc for update_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to update")
    ),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave request updated successfully", body = Object, example = json!({
            "message": "Leave request updated successfully"
        })),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeave>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let Some(row) = fetch_leave(pool.get_ref(), leave_id).await? else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    };

    // merge the patch onto the stored record, then re-validate the result
    let date_from = payload.date_from.unwrap_or(row.date_from);
    let half_day = payload.half_day.unwrap_or(row.half_day);
    let period = payload.period.or(row.period);
    let date_to = if half_day {
        None
    } else {
        payload.date_to.or(row.date_to)
    };
    let leave_type_id = payload.leave_type_id.unwrap_or(row.leave_type_id);
    let has_attachment = payload.attachment.is_some() || row.attachment.is_some();

    let Some(leave_type) = fetch_leave_type(pool.get_ref(), leave_type_id).await? else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Invalid leave type"
        })));
    };

    // edits may not move the start before the record's creation date
    let earliest_start = row
        .created_at
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| Utc::now().date_naive());

    let input = LeaveInput {
        date_from,
        date_to,
        half_day,
        period,
        has_attachment,
    };

    if let Err(e) = validate(&input, earliest_start, leave_type.support_document) {
        return Ok(domain_error_response(&e));
    }

    let mut fields = Map::new();
    fields.insert("leave_type_id".into(), json!(leave_type_id));
    fields.insert("date_from".into(), json!(date_from.to_string()));
    fields.insert(
        "date_to".into(),
        match date_to {
            Some(d) => json!(d.to_string()),
            None => Value::Null,
        },
    );
    fields.insert("half_day".into(), json!(half_day));
    fields.insert(
        "period".into(),
        match (half_day, period) {
            (true, Some(p)) => json!(p.to_string()),
            _ => Value::Null,
        },
    );

    if let Some(description) = &payload.description {
        fields.insert("description".into(), json!(description));
    }
    if let Some(attachment) = &payload.attachment {
        fields.insert("attachment".into(), json!(attachment));
    }

    let update = build_update_sql("leave_requests", &fields, "id", leave_id)?;

    execute_update(pool.get_ref(), update).await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to update leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request updated successfully"
    })))
}

/* =========================
Delete leave request (admin)
========================= */
/// Administrative delete; the workflow itself never removes records.
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
        .bind(leave_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Leave request not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            tracing::error!(error = %e, leave_id, "Failed to delete leave request");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
