use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::gate_pass::{GatePassRequest, GatePassResponse};
use crate::api::outside_work::{AssignRequest, Assignment, ExtendRequest};
use crate::api::overview::OverviewResponse;
use crate::api::verification::{VerifyRequest, VerifyResponse, VisitorRequest};
use crate::core::classifier::HourBucket;
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::event::{AttendanceEvent, RawEvent};
use crate::model::gate_pass::GatePass;
use crate::model::notice::Notice;
use crate::model::session::AttendanceSession;
use crate::model::settings::SystemSettings;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Terminal API",
        version = "1.0.0",
        description = r#"
## Attendance / Access-Control Terminal Service

Backend for a biometric/PIN/QR attendance kiosk and its admin dashboard.

### Key Features
- **Verification**: staff and visitor scan events with toggle-based action inference
- **Sessions**: entry/exit pairs reconstructed from the append-only event log
- **Roll Call**: present / field-duty / absent partition with hourly histogram
- **Gate Pass**: short departure/return tracking, gated by clocked-in state
- **Outside Work**: time-boxed field-duty assignment, recall and extension

### Response Format
- JSON-based RESTful responses

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::verification::verify,
        crate::api::verification::visitor,
        crate::api::verification::live_latest,

        crate::api::session::get_sessions,
        crate::api::session::get_logs,
        crate::api::session::get_visitor_logs,
        crate::api::session::purge_logs,
        crate::api::session::import_logs,
        crate::api::session::active_visitors,

        crate::api::gate_pass::process_gate_pass,
        crate::api::gate_pass::list_gate_passes,

        crate::api::overview::get_overview,

        crate::api::outside_work::assign,
        crate::api::outside_work::recall,
        crate::api::outside_work::extend,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::department::list_departments,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,

        crate::api::notice::list_notices,
        crate::api::notice::create_notice,
        crate::api::notice::update_notice,
        crate::api::notice::delete_notice,

        crate::api::settings::get_settings,
        crate::api::settings::update_settings
    ),
    components(
        schemas(
            VerifyRequest,
            VerifyResponse,
            VisitorRequest,
            GatePassRequest,
            GatePassResponse,
            GatePass,
            AttendanceEvent,
            RawEvent,
            AttendanceSession,
            OverviewResponse,
            HourBucket,
            AssignRequest,
            Assignment,
            ExtendRequest,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Employee,
            Department,
            Notice,
            SystemSettings
        )
    ),
    tags(
        (name = "Attendance", description = "Scan verification and session read models"),
        (name = "GatePass", description = "Departure/return gate tracking"),
        (name = "Overview", description = "Roll call and analytics"),
        (name = "OutsideWork", description = "Field-duty scheduling"),
        (name = "Registry", description = "Employees, departments, notices, settings"),
        (name = "Employee", description = "Employee registry APIs"),
    )
)]
pub struct ApiDoc;
