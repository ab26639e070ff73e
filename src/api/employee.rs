use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::model::employee::Employee;
use crate::utils::{department_cache, employee_filter};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-3000", value_type = String)]
    pub employee_code: String,
    #[schema(example = "John", value_type = String)]
    pub first_name: String,
    #[schema(example = "Doe", value_type = String)]
    pub last_name: String,
    #[schema(example = "john@email.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = 1, value_type = u64)]
    pub department_id: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub department_id: Option<u64>,
    pub search: Option<String>,
}

// Helper enum for typed SQLx binding
#[derive(Debug)]
enum FilterValue {
    U64(u64),
    Str(String),
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(
    example = json!([{
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@company.com",
        "department_id": 10
    }])
)]
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 5)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created successfully", body = Object, example = json!({
            "message": "Employee created successfully",
            "id": 1
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> impl Responder {
    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (employee_code, first_name, last_name, email, department_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.employee_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(payload.department_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => {
            let employee_id = res.last_insert_id();

            // keep the existence filter and department cache in step with
            // the table so leave creation sees the new employee
            employee_filter::insert(employee_id);
            department_cache::mark(employee_id, payload.department_id).await;

            HttpResponse::Ok().json(json!({
                "message": "Employee created successfully",
                "id": employee_id
            }))
        }
        Err(e) => {
            error!(error = %e, "Failed to Create Employee");
            HttpResponse::InternalServerError().json(json!({
                "message": "Something went wrong, Contact with system admin"
            }))
        }
    }
}

// -------------------- Handler --------------------

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(
        ("page",  Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("department_id", Query, description = "Filter by department"),
        ("search", Query, description = "Search by name, email or code")
    ),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(department_id) = query.department_id {
        conditions.push("department_id = ?");
        bindings.push(FilterValue::U64(department_id));
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ? OR employee_code LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like.clone()));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM employees {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::Str(s) => count_query.bind(s.clone()),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT id, employee_code, first_name, last_name, email, department_id \
         FROM employees {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(v),
            FilterValue::Str(s) => data_query.bind(s),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id: u64 = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, first_name, last_name, email, department_id
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}
