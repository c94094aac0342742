use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use strum::IntoEnumIterator;
use utoipa::{IntoParams, ToSchema};

use crate::engine::ledger;
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_type::{LeaveType, LeaveTypeConfig};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BalanceQuery {
    /// Balance year, defaults to the current year
    #[schema(example = 2026)]
    pub year: Option<i32>,
    /// Another user's balances (HR/Admin only)
    #[schema(example = 1000)]
    pub user_id: Option<u64>,
}

/* =========================
Balances for a user and year
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balance rows", body = [LeaveBalance]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Balance"
)]
pub async fn get_balances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = match query.user_id {
        Some(other) if other != auth.user_id => {
            auth.require_hr_or_admin()?;
            other
        }
        _ => auth.user_id,
    };
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let balances = sqlx::query_as::<_, LeaveBalance>(
        r#"
        SELECT id, user_id, leave_type, year,
               allocated_days, used_days, pending_days, available_days
        FROM leave_balances
        WHERE user_id = ? AND year = ?
        ORDER BY leave_type
        "#,
    )
    .bind(user_id)
    .bind(year)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, year, "Failed to fetch leave balances");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(balances))
}

#[derive(Deserialize, ToSchema)]
pub struct AllocateBalances {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct TopUpBalance {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 5)]
    pub days: i64,
}

/* =========================
Allocate yearly balances (HR/Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/balance/allocate",
    request_body(content = AllocateBalances, content_type = "application/json"),
    responses(
        (status = 200, description = "Balance rows created", body = [LeaveBalance]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Balance"
)]
pub async fn allocate_balances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AllocateBalances>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let pool = pool.get_ref();

    for leave_type in LeaveType::iter() {
        let config = LeaveTypeConfig::for_type(leave_type);
        if !config.is_balance_tracked() {
            continue;
        }
        // Idempotent on the (user_id, leave_type, year) unique key; rows
        // that already exist are left untouched.
        sqlx::query(
            r#"
            INSERT IGNORE INTO leave_balances
                (user_id, leave_type, year, allocated_days, used_days, pending_days, available_days)
            VALUES (?, ?, ?, ?, 0, 0, ?)
            "#,
        )
        .bind(payload.user_id)
        .bind(leave_type.to_string())
        .bind(payload.year)
        .bind(config.annual_days as i64)
        .bind(config.annual_days as i64)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_type = %leave_type, "Failed to allocate balance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    tracing::info!(
        actor_id = auth.user_id,
        user_id = payload.user_id,
        year = payload.year,
        "Yearly balances allocated"
    );

    let balances = sqlx::query_as::<_, LeaveBalance>(
        r#"
        SELECT id, user_id, leave_type, year,
               allocated_days, used_days, pending_days, available_days
        FROM leave_balances
        WHERE user_id = ? AND year = ?
        ORDER BY leave_type
        "#,
    )
    .bind(payload.user_id)
    .bind(payload.year)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch allocated balances");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(balances))
}

/* =========================
Top up a reapplicable balance (HR/Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/balance/topup",
    request_body(content = TopUpBalance, content_type = "application/json"),
    responses(
        (status = 200, description = "Balance topped up", body = LeaveBalance),
        (status = 400, description = "Leave type is not reapplicable"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Balance row not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Balance"
)]
pub async fn top_up_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<TopUpBalance>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let pool = pool.get_ref();

    let config = LeaveTypeConfig::for_type(payload.leave_type);
    if !config.reapplicable {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!("{} leave allotment cannot be topped up", payload.leave_type)
        })));
    }
    if payload.days < 1 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "days must be at least 1"
        })));
    }

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let locked = sqlx::query_as::<_, LeaveBalance>(
        r#"
        SELECT id, user_id, leave_type, year,
               allocated_days, used_days, pending_days, available_days
        FROM leave_balances
        WHERE user_id = ? AND leave_type = ? AND year = ?
        FOR UPDATE
        "#,
    )
    .bind(payload.user_id)
    .bind(payload.leave_type.to_string())
    .bind(payload.year)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to lock leave balance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(locked) = locked else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Balance row not found, allocate the year first"
        })));
    };

    let next = ledger::top_up(&locked, payload.days);

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
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to write top-up");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to commit top-up");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        actor_id = auth.user_id,
        user_id = payload.user_id,
        leave_type = %payload.leave_type,
        days = payload.days,
        "Balance topped up"
    );

    Ok(HttpResponse::Ok().json(next))
}
