use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

use crate::model::department::Department;

/// List departments, for the request form's department select.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "All departments")
    ),
    tag = "Department"
)]
pub async fn list_departments(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let departments =
        sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
            .fetch_all(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch departments");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    Ok(HttpResponse::Ok().json(departments))
}
