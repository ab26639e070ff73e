use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::leave_request::{
    CreateLeave, DurationQuery, LeaveFilter, LeaveListResponse, LeaveResponse, UpdateLeave,
};
use crate::api::leave_type::CreateLeaveType;
use crate::api::report::{ReportGroup, ReportQuery, ReportResponse};
use crate::domain::{Notification, Period, State};
use crate::model::employee::Employee;
use crate::model::leave_type::LeaveType;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Time Off API",
        version = "1.0.0",
        description = r#"
## Time Off Administration

This API powers the employee time-off (leave request) administration of an HR suite.

### 🔹 Key Features
- **Leave Requests**
  - Create, update, list, and view requests; live duration preview in business days
- **Approval Workflow**
  - Two-stage validation chain with approve/refuse row actions and success notifications
- **Reporting**
  - Grouped views (by employee, department, leave type, state or date) over the same data
- **Lookups**
  - Leave types (with mandatory-document flag) and employee search for the request form

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
- Request duration is always derived from the date range, never stored

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::refuse_leave,
        crate::api::leave_request::duration_preview,

        crate::api::report::leave_report,

        crate::api::leave_type::create_leave_type,
        crate::api::leave_type::list_leave_types,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,

        crate::api::department::list_departments
    ),
    components(
        schemas(
            CreateLeave,
            UpdateLeave,
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            DurationQuery,
            State,
            Period,
            Notification,
            ReportQuery,
            ReportGroup,
            ReportResponse,
            CreateLeaveType,
            LeaveType,
            CreateEmployee,
            Employee,
            EmployeeListResponse
        )
    ),
    tags(
        (name = "Leave", description = "Leave request management APIs"),
        (name = "Reporting", description = "Grouped leave reporting APIs"),
        (name = "LeaveType", description = "Leave type lookup APIs"),
        (name = "Employee", description = "Employee lookup APIs"),
        (name = "Department", description = "Department lookup APIs"),
    )
)]
pub struct ApiDoc;
