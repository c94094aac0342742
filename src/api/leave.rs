use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::engine::calendar::{self, HolidaySet, MAX_REQUEST_WORKING_DAYS};
use crate::engine::error::{LedgerError, WorkflowError};
use crate::engine::ledger;
use crate::engine::validation::{self, ExistingLeave, LeaveValidation, ValidationInput};
use crate::engine::workflow::{self, Decision, LedgerEffect, Stage};
use crate::model::desired_months::DesiredLeaveMonths;
use crate::model::leave_application::{LeaveApplication, LeaveStatus};
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_type::{LeaveType, LeaveTypeConfig, StudyProgram};
use crate::model::user::User;
use crate::utils::holiday_cache;

#[derive(Deserialize, ToSchema)]
pub struct SubmitLeave {
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    /// Number of working days requested, 1..=365. Ignored for study leave,
    /// whose duration comes from the program.
    #[schema(example = 5, minimum = 1, maximum = 365)]
    pub working_days: Option<u32>,
    #[schema(example = "Family visit")]
    pub reason: String,
    #[schema(example = "msc")]
    pub study_program: Option<StudyProgram>,
}

#[derive(Deserialize, ToSchema)]
pub struct ActionPayload {
    #[schema(example = "Approved, enjoy your leave")]
    pub comments: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SubmitResponse {
    pub application: LeaveApplication,
    pub warnings: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct PreviewRequest {
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = 5, minimum = 1, maximum = 365)]
    pub working_days: Option<u32>,
    #[schema(example = "msc")]
    pub study_program: Option<StudyProgram>,
}

#[derive(Serialize, ToSchema)]
pub struct PreviewResponse {
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "2026-03-09", format = "date", value_type = String)]
    pub resumption_date: NaiveDate,
    #[schema(example = 5)]
    pub working_days: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by applicant user ID (HR/Admin/Director only)
    #[schema(example = 1000)]
    pub user_id: Option<u64>,
    /// Filter by status
    #[schema(example = "pending_hr")]
    pub status: Option<String>,
    /// Filter by leave type
    #[schema(example = "annual")]
    pub leave_type: Option<String>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveApplication>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(FromRow)]
struct OverlapRow {
    application_number: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

fn internal_error<E: std::fmt::Display>(context: &'static str) -> impl Fn(E) -> actix_web::Error {
    move |e| {
        tracing::error!(error = %e, context);
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    }
}

async fn holidays_spanning(
    pool: &MySqlPool,
    start: NaiveDate,
    end_year: i32,
) -> actix_web::Result<HolidaySet> {
    holiday_cache::holidays_for_years(pool, start.year(), end_year)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load holiday calendar");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })
}

/// Resolve the dates of a request. For study leave the end date is derived
/// from the program duration; otherwise the caller's working-day count is
/// walked forward over the holiday calendar.
async fn resolve_dates(
    pool: &MySqlPool,
    leave_type: LeaveType,
    start_date: NaiveDate,
    working_days: Option<u32>,
    study_program: Option<StudyProgram>,
) -> actix_web::Result<Result<(NaiveDate, i64), HttpResponse>> {
    if leave_type == LeaveType::Study {
        let Some(program) = study_program else {
            return Ok(Err(HttpResponse::UnprocessableEntity().json(
                serde_json::json!({
                    "message": "A study program (bsc, msc or phd) is required for study leave"
                }),
            )));
        };
        let end = validation::study_end_date(start_date, program);
        // Duration is program-defined; store the inclusive calendar span.
        let days = (end - start_date).num_days() + 1;
        return Ok(Ok((end, days)));
    }

    // Bounded before the day-by-day walk; an unbounded count would be walked
    // at the caller's expense.
    let Some(working_days) = working_days.filter(|d| (1..=MAX_REQUEST_WORKING_DAYS).contains(d))
    else {
        return Ok(Err(HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!(
                "working_days must be between 1 and {}",
                MAX_REQUEST_WORKING_DAYS
            )
        }))));
    };

    // A capped request never walks past start year + 2.
    let holidays = holidays_spanning(pool, start_date, start_date.year() + 2).await?;
    let end = calendar::add_working_days(start_date, working_days, &holidays);
    Ok(Ok((end, working_days as i64)))
}

async fn fetch_balance_row(
    executor: &MySqlPool,
    user_id: u64,
    leave_type: LeaveType,
    year: i32,
) -> Result<Option<LeaveBalance>, sqlx::Error> {
    sqlx::query_as::<_, LeaveBalance>(
        r#"
        SELECT id, user_id, leave_type, year,
               allocated_days, used_days, pending_days, available_days
        FROM leave_balances
        WHERE user_id = ? AND leave_type = ? AND year = ?
        "#,
    )
    .bind(user_id)
    .bind(leave_type.to_string())
    .bind(year)
    .fetch_optional(executor)
    .await
}

async fn fetch_application(
    pool: &MySqlPool,
    id: u64,
) -> Result<Option<LeaveApplication>, sqlx::Error> {
    sqlx::query_as::<_, LeaveApplication>(
        r#"
        SELECT id, application_number, user_id, leave_type, start_date, end_date,
               working_days, reason, study_program, status, submitted_at,
               director_approved_by, director_approved_at, director_comments,
               hr_approved_by, hr_approved_at, hr_comments
        FROM leave_applications
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/* =========================
Submit leave application
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(content = SubmitLeave, content_type = "application/json"),
    responses(
        (status = 200, description = "Application created", body = SubmitResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation failed", body = LeaveValidation)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubmitLeave>,
) -> actix_web::Result<impl Responder> {
    let pool = pool.get_ref();
    let today = Utc::now().date_naive();

    if payload.reason.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "A reason is required"
        })));
    }

    let applicant = sqlx::query_as::<_, User>(
        r#"
        SELECT id, full_name, email, role, department_id, designation_id, is_active
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool)
    .await
    .map_err(internal_error("Failed to fetch applicant"))?;

    match applicant {
        Some(user) if user.is_active => {}
        _ => {
            return Ok(HttpResponse::Forbidden().json(serde_json::json!({
                "message": "Only active users may submit leave applications"
            })));
        }
    }

    let (end_date, working_days) = match resolve_dates(
        pool,
        payload.leave_type,
        payload.start_date,
        payload.working_days,
        payload.study_program,
    )
    .await?
    {
        Ok(resolved) => resolved,
        Err(response) => return Ok(response),
    };

    let year = payload.start_date.year();
    let config = LeaveTypeConfig::for_type(payload.leave_type);

    let balance = if config.is_balance_tracked() {
        fetch_balance_row(pool, auth.user_id, payload.leave_type, year)
            .await
            .map_err(internal_error("Failed to fetch leave balance"))?
    } else {
        None
    };

    let overlap_rows = sqlx::query_as::<_, OverlapRow>(
        r#"
        SELECT application_number, start_date, end_date
        FROM leave_applications
        WHERE user_id = ?
          AND status IN ('pending_director', 'pending_hr', 'approved')
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(pool)
    .await
    .map_err(internal_error("Failed to fetch existing applications"))?;
    let existing: Vec<ExistingLeave> = overlap_rows
        .into_iter()
        .map(|r| ExistingLeave {
            application_number: r.application_number,
            start_date: r.start_date,
            end_date: r.end_date,
        })
        .collect();

    let desired_months = sqlx::query_as::<_, DesiredLeaveMonths>(
        r#"
        SELECT id, user_id, month_one, month_two, submitted_at, is_locked
        FROM desired_leave_months
        WHERE user_id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool)
    .await
    .map_err(internal_error("Failed to fetch desired leave months"))?;

    let verdict = validation::validate(&ValidationInput {
        leave_type: payload.leave_type,
        study_program: payload.study_program,
        start_date: payload.start_date,
        end_date,
        working_days,
        today,
        balance: balance.as_ref(),
        existing: &existing,
        desired_months: desired_months.as_ref().map(|d| d.months()),
    });

    if !verdict.is_valid {
        tracing::debug!(
            user_id = auth.user_id,
            leave_type = %payload.leave_type,
            failed_checks = verdict.failures().len(),
            "Leave application failed validation"
        );
        return Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "message": "Leave application failed validation",
            "validation": verdict
        })));
    }

    let initial_status = workflow::initial_status(auth.role);
    let application_number = format!(
        "LA-{}-{}",
        year,
        &Uuid::new_v4().to_simple().to_string()[..6]
    );

    let mut tx = pool
        .begin()
        .await
        .map_err(internal_error("Failed to open transaction"))?;

    // The pre-validation overlap read ran outside this transaction, so a
    // racing submission may have inserted since. Re-check under lock; the
    // range lock on the user's rows also serializes racing inserts. Locked
    // before the balance row, the same order the approval path takes.
    let conflicting = sqlx::query_as::<_, OverlapRow>(
        r#"
        SELECT application_number, start_date, end_date
        FROM leave_applications
        WHERE user_id = ?
          AND status IN ('pending_director', 'pending_hr', 'approved')
          AND start_date <= ? AND end_date >= ?
        FOR UPDATE
        "#,
    )
    .bind(auth.user_id)
    .bind(end_date)
    .bind(payload.start_date)
    .fetch_optional(&mut *tx)
    .await
    .map_err(internal_error("Failed to re-check overlapping applications"))?;

    if let Some(existing) = conflicting {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": format!(
                "Dates overlap application {} ({} to {})",
                existing.application_number, existing.start_date, existing.end_date
            )
        })));
    }

    // Reserve under a row lock so two racing submissions cannot both take
    // the last available days.
    if config.is_balance_tracked() {
        let locked = sqlx::query_as::<_, LeaveBalance>(
            r#"
            SELECT id, user_id, leave_type, year,
                   allocated_days, used_days, pending_days, available_days
            FROM leave_balances
            WHERE user_id = ? AND leave_type = ? AND year = ?
            FOR UPDATE
            "#,
        )
        .bind(auth.user_id)
        .bind(payload.leave_type.to_string())
        .bind(year)
        .fetch_optional(&mut *tx)
        .await
        .map_err(internal_error("Failed to lock leave balance"))?;

        let Some(locked) = locked else {
            return Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "message": format!("No {} balance allocated for {}", payload.leave_type, year)
            })));
        };

        let reserved = match ledger::reserve(&locked, working_days) {
            Ok(b) => b,
            Err(LedgerError::InsufficientBalance { requested, available }) => {
                return Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "message": format!(
                        "Insufficient balance: {} day(s) requested, {} available",
                        requested, available
                    )
                })));
            }
            Err(e) => return Err(internal_error("Reservation failed")(e)),
        };

        sqlx::query(
            r#"
            UPDATE leave_balances
            SET allocated_days = ?, used_days = ?, pending_days = ?, available_days = ?
            WHERE id = ?
            "#,
        )
        .bind(reserved.allocated_days)
        .bind(reserved.used_days)
        .bind(reserved.pending_days)
        .bind(reserved.available_days)
        .bind(reserved.id)
        .execute(&mut *tx)
        .await
        .map_err(internal_error("Failed to write reservation"))?;
    }

    let insert = sqlx::query(
        r#"
        INSERT INTO leave_applications
            (application_number, user_id, leave_type, start_date, end_date,
             working_days, reason, study_program, status, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&application_number)
    .bind(auth.user_id)
    .bind(payload.leave_type.to_string())
    .bind(payload.start_date)
    .bind(end_date)
    .bind(working_days)
    .bind(payload.reason.trim())
    .bind(payload.study_program.map(|p| p.to_string()))
    .bind(initial_status.to_string())
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(internal_error("Failed to create leave application"))?;

    let application_id = insert.last_insert_id();

    tx.commit()
        .await
        .map_err(internal_error("Failed to commit submission"))?;

    tracing::info!(
        user_id = auth.user_id,
        username = %auth.username,
        application_number = %application_number,
        leave_type = %payload.leave_type,
        status = %initial_status,
        "Leave application submitted"
    );

    let application = fetch_application(pool, application_id)
        .await
        .map_err(internal_error("Failed to fetch created application"))?
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    Ok(HttpResponse::Ok().json(SubmitResponse {
        application,
        warnings: verdict.warnings,
    }))
}

/// Shared approve/reject path. The status change is a conditional UPDATE
/// keyed on the expected current status; zero rows affected means another
/// actor won the race and this attempt fails without side effects.
async fn act_on_application(
    auth: AuthUser,
    pool: &MySqlPool,
    application_id: u64,
    decision: Decision,
    comments: Option<String>,
) -> actix_web::Result<HttpResponse> {
    let Some(application) = fetch_application(pool, application_id)
        .await
        .map_err(internal_error("Failed to fetch leave application"))?
    else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave application not found"
        })));
    };

    let current: LeaveStatus = application.status.parse().map_err(|_| {
        tracing::error!(application_id, status = %application.status, "Unknown status in storage");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    let leave_type: LeaveType = application.leave_type.parse().map_err(|_| {
        tracing::error!(application_id, leave_type = %application.leave_type, "Unknown leave type in storage");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let outcome = match workflow::transition(current, auth.role, decision, comments.as_deref()) {
        Ok(outcome) => outcome,
        Err(WorkflowError::InvalidTransition { current }) => {
            return Ok(HttpResponse::Conflict().json(serde_json::json!({
                "message": format!("Application in status {} cannot accept this action", current)
            })));
        }
        Err(WorkflowError::Unauthorized { .. }) => {
            return Ok(HttpResponse::Forbidden().json(serde_json::json!({
                "message": "You are not authorized to act on this application"
            })));
        }
        Err(WorkflowError::CommentRequired) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "A rejection requires a comment"
            })));
        }
    };

    let mut tx = pool
        .begin()
        .await
        .map_err(internal_error("Failed to open transaction"))?;

    let stage_update = match outcome.stage {
        Stage::Director => {
            r#"
            UPDATE leave_applications
            SET status = ?, director_approved_by = ?, director_approved_at = ?, director_comments = ?
            WHERE id = ? AND status = ?
            "#
        }
        Stage::Hr => {
            r#"
            UPDATE leave_applications
            SET status = ?, hr_approved_by = ?, hr_approved_at = ?, hr_comments = ?
            WHERE id = ? AND status = ?
            "#
        }
    };

    let updated = sqlx::query(stage_update)
        .bind(outcome.next_status.to_string())
        .bind(auth.user_id)
        .bind(Utc::now())
        .bind(comments.as_deref().map(str::trim))
        .bind(application_id)
        .bind(current.to_string())
        .execute(&mut *tx)
        .await
        .map_err(internal_error("Failed to update application status"))?;

    if updated.rows_affected() == 0 {
        // Lost the race against a concurrent approver.
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": "Application was modified concurrently, please retry"
        })));
    }

    // Study leave holds no balance, so terminal transitions move no days.
    let balance_tracked = LeaveTypeConfig::for_type(leave_type).is_balance_tracked();
    if let (Some(effect), true) = (outcome.ledger_effect, balance_tracked) {
        let year = application.start_date.year();
        let locked = sqlx::query_as::<_, LeaveBalance>(
            r#"
            SELECT id, user_id, leave_type, year,
                   allocated_days, used_days, pending_days, available_days
            FROM leave_balances
            WHERE user_id = ? AND leave_type = ? AND year = ?
            FOR UPDATE
            "#,
        )
        .bind(application.user_id)
        .bind(leave_type.to_string())
        .bind(year)
        .fetch_optional(&mut *tx)
        .await
        .map_err(internal_error("Failed to lock leave balance"))?;

        let Some(locked) = locked else {
            tracing::error!(application_id, "Balance row missing for reserved application");
            return Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ));
        };

        let next = match effect {
            LedgerEffect::Commit => ledger::commit(&locked, application.working_days),
            LedgerEffect::Release => ledger::release(&locked, application.working_days),
        };
        let next = match next {
            Ok(b) => b,
            Err(LedgerError::ConcurrentModification(msg)) => {
                tracing::warn!(application_id, error = %msg, "Ledger conflict during transition");
                return Ok(HttpResponse::Conflict().json(serde_json::json!({
                    "message": "Balance was modified concurrently, please retry"
                })));
            }
            Err(e) => return Err(internal_error("Ledger operation failed")(e)),
        };

        sqlx::query(
            r#"
            UPDATE leave_balances
            SET allocated_days = ?, used_days = ?, pending_days = ?, available_days = ?
            WHERE id = ?
            "#,
        )
        .bind(next.allocated_days)
        .bind(next.used_days)
        .bind(next.pending_days)
        .bind(next.available_days)
        .bind(next.id)
        .execute(&mut *tx)
        .await
        .map_err(internal_error("Failed to write ledger update"))?;
    }

    tx.commit()
        .await
        .map_err(internal_error("Failed to commit transition"))?;

    tracing::info!(
        application_id,
        actor_id = auth.user_id,
        from = %current,
        to = %outcome.next_status,
        "Leave application transitioned"
    );

    let refreshed = fetch_application(pool, application_id)
        .await
        .map_err(internal_error("Failed to fetch updated application"))?
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    Ok(HttpResponse::Ok().json(refreshed))
}

/* =========================
Approve leave (Director / HR / Admin, stage-gated)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/approve",
    params(("id" = u64, Path, description = "ID of the leave application")),
    request_body(content = ActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Application advanced", body = LeaveApplication),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor lacks authority for this stage"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Invalid transition or concurrent modification")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ActionPayload>,
) -> actix_web::Result<impl Responder> {
    act_on_application(
        auth,
        pool.get_ref(),
        path.into_inner(),
        Decision::Approve,
        payload.into_inner().comments,
    )
    .await
}

/* =========================
Reject leave (Director / HR / Admin, stage-gated)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/reject",
    params(("id" = u64, Path, description = "ID of the leave application")),
    request_body(content = ActionPayload, content_type = "application/json"),
    responses(
        (status = 200, description = "Application rejected", body = LeaveApplication),
        (status = 400, description = "Rejection comment missing"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Actor lacks authority for this stage"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Invalid transition or concurrent modification")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ActionPayload>,
) -> actix_web::Result<impl Responder> {
    act_on_application(
        auth,
        pool.get_ref(),
        path.into_inner(),
        Decision::Reject,
        payload.into_inner().comments,
    )
    .await
}

/* =========================
Preview end / resumption dates
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave/preview",
    request_body(content = PreviewRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Computed dates", body = PreviewResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn preview_dates(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<PreviewRequest>,
) -> actix_web::Result<impl Responder> {
    let pool = pool.get_ref();

    let (end_date, working_days) = match resolve_dates(
        pool,
        payload.leave_type,
        payload.start_date,
        payload.working_days,
        payload.study_program,
    )
    .await?
    {
        Ok(resolved) => resolved,
        Err(response) => return Ok(response),
    };

    let holidays = holidays_spanning(pool, payload.start_date, end_date.year() + 1).await?;
    let resumption_date = calendar::next_resumption_day(end_date, &holidays);

    Ok(HttpResponse::Ok().json(PreviewResponse {
        end_date,
        resumption_date,
        working_days,
    }))
}

/* =========================
Get one application
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/{id}",
    params(("id" = u64, Path, description = "ID of the leave application")),
    responses(
        (status = 200, description = "Leave application found", body = LeaveApplication),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let application = fetch_application(pool.get_ref(), path.into_inner())
        .await
        .map_err(internal_error("Failed to fetch leave application"))?;

    match application {
        Some(app) if app.user_id == auth.user_id || auth.can_view_all() => {
            Ok(HttpResponse::Ok().json(app))
        }
        Some(_) => Ok(HttpResponse::Forbidden().json(serde_json::json!({
            "message": "You may only view your own applications"
        }))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave application not found"
        }))),
    }
}

/* =========================
List applications
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated application list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
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

    // Staff only see their own applications; approvers may filter freely.
    if auth.can_view_all() {
        if let Some(user_id) = query.user_id {
            where_sql.push_str(" AND user_id = ?");
            args.push(FilterValue::U64(user_id));
        }
    } else {
        where_sql.push_str(" AND user_id = ?");
        args.push(FilterValue::U64(auth.user_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    if let Some(leave_type) = query.leave_type.as_deref() {
        where_sql.push_str(" AND leave_type = ?");
        args.push(FilterValue::Str(leave_type));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_applications{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q
        .fetch_one(pool.get_ref())
        .await
        .map_err(internal_error("Failed to count leave applications"))?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, application_number, user_id, leave_type, start_date, end_date,
               working_days, reason, study_program, status, submitted_at,
               director_approved_by, director_approved_at, director_comments,
               hr_approved_by, hr_approved_at, hr_comments
        FROM leave_applications
        {}
        ORDER BY submitted_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveApplication>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let applications = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(internal_error("Failed to fetch leave applications"))?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: applications,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
