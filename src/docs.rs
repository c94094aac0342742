use crate::api::balance::{AllocateBalances, BalanceQuery, TopUpBalance};
use crate::api::desired_months::{DesiredMonthsQuery, SubmitMonths, ValidateRange};
use crate::api::leave::{
    ActionPayload, LeaveFilter, LeaveListResponse, PreviewRequest, PreviewResponse, SubmitLeave,
    SubmitResponse,
};
use crate::engine::desired_months::DesiredMonthsCheck;
use crate::engine::validation::{CheckFailure, CheckResult, LeaveValidation};
use crate::model::desired_months::DesiredLeaveMonths;
use crate::model::leave_application::{LeaveApplication, LeaveStatus};
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_type::{LeaveType, StudyProgram};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Workflow API",
        version = "1.0.0",
        description = r#"
## Leave Request Workflow & Validation Engine

This API manages the full lifecycle of organizational leave requests.

### 🔹 Key Features
- **Leave Applications**
  - Submit requests with itemized pre-submission validation
  - Role-based approval chain (director stage, then HR stage)
  - End-date and resumption-date preview over the holiday calendar
- **Leave Balances**
  - Per-type yearly ledgers with reserve / commit / release semantics
- **Desired Leave Months**
  - One-time, locked choice of two preferred months for annual leave

### 🔐 Security
Endpoints require a **JWT Bearer token** issued by the identity provider.
Approval actions are gated by the actor's role and the application's stage.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::submit_leave,
        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::preview_dates,

        crate::api::balance::get_balances,
        crate::api::balance::allocate_balances,
        crate::api::balance::top_up_balance,

        crate::api::desired_months::get_desired_months,
        crate::api::desired_months::submit_desired_months,
        crate::api::desired_months::validate_desired_months
    ),
    components(
        schemas(
            SubmitLeave,
            ActionPayload,
            SubmitResponse,
            PreviewRequest,
            PreviewResponse,
            LeaveFilter,
            LeaveListResponse,
            LeaveApplication,
            LeaveStatus,
            LeaveType,
            StudyProgram,
            LeaveBalance,
            BalanceQuery,
            AllocateBalances,
            TopUpBalance,
            LeaveValidation,
            CheckResult,
            CheckFailure,
            DesiredLeaveMonths,
            DesiredMonthsQuery,
            DesiredMonthsCheck,
            SubmitMonths,
            ValidateRange
        )
    ),
    tags(
        (name = "Leave", description = "Leave application workflow APIs"),
        (name = "Balance", description = "Leave balance ledger APIs"),
        (name = "DesiredMonths", description = "Desired leave months APIs"),
    ),
    modifiers(&SecurityAddon)
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
