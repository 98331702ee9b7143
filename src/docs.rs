use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::attendance::{AttendanceRow, EmployeeHours};
use crate::api::chat::PostMessage;
use crate::api::dashboard::{AdminStats, EmployeeStats};
use crate::api::employee::{CreateEmployee, EmployeeDetail, UpdateEmployee};
use crate::api::presence::PresenceEntry;
use crate::model::chat_message::ChatMessage;
use crate::model::employee::Employee;
use crate::model::status::{EmployeeStatus, PresenceStatus, RecordStatus, WorkMode};
use crate::model::time_record::TimeRecord;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workdash API",
        version = "1.0.0",
        description = r#"
## Attendance & Presence Dashboard

This API powers a lightweight attendance dashboard for distributed teams.

### 🔹 Key Features
- **Attendance**
  - Daily check-in / check-out with worked-hours tracking
- **Presence**
  - Online/offline liveness with heartbeats and lazy staleness
- **Chat**
  - A small team message panel
- **Employees & Dashboard**
  - Directory management and aggregated statistics

### 🔐 Security
Endpoints are protected using **JWT Bearer authentication**. Listing all
records, managing employees and chart data require the **Admin** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today_records,
        crate::api::attendance::all_records,
        crate::api::attendance::employees_with_hours,

        crate::api::presence::mark_online,
        crate::api::presence::mark_offline,
        crate::api::presence::heartbeat,
        crate::api::presence::list_presence,

        crate::api::chat::post_message,
        crate::api::chat::list_messages,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::search_employees,

        crate::api::dashboard::stats,
        crate::api::dashboard::charts
    ),
    components(
        schemas(
            TimeRecord,
            AttendanceRow,
            EmployeeHours,
            PresenceEntry,
            ChatMessage,
            PostMessage,
            Employee,
            EmployeeDetail,
            CreateEmployee,
            UpdateEmployee,
            AdminStats,
            EmployeeStats,
            WorkMode,
            EmployeeStatus,
            RecordStatus,
            PresenceStatus
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Check-in/check-out session APIs"),
        (name = "Presence", description = "Liveness tracking APIs"),
        (name = "Chat", description = "Team chat APIs"),
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Dashboard", description = "Statistics APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
