use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::model::leave_type::LeaveType;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeaveType {
    #[schema(example = "Sick Leave")]
    pub name: String,
    /// Whether requests of this type must carry a supporting document.
    #[schema(example = true)]
    pub support_document: Option<bool>,
}

/// Create leave type
#[utoipa::path(
    post,
    path = "/api/v1/leave-types",
    request_body = CreateLeaveType,
    responses(
        (status = 200, description = "Leave type created", body = Object, example = json!({
            "message": "Leave type created",
            "id": 2
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "LeaveType"
)]
pub async fn create_leave_type(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveType>,
) -> actix_web::Result<impl Responder> {
    let result = sqlx::query("INSERT INTO leave_types (name, support_document) VALUES (?, ?)")
        .bind(&payload.name)
        .bind(payload.support_document.unwrap_or(false))
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create leave type");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave type created",
        "id": result.last_insert_id()
    })))
}

/// List leave types
#[utoipa::path(
    get,
    path = "/api/v1/leave-types",
    responses(
        (status = 200, description = "All leave types", body = [LeaveType])
    ),
    tag = "LeaveType"
)]
pub async fn list_leave_types(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let leave_types = sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, support_document FROM leave_types ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch leave types");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(leave_types))
}
