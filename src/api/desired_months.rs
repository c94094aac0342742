use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::engine::desired_months::{self, DesiredMonthsCheck};
use crate::engine::error::DesiredMonthsError;
use crate::model::desired_months::DesiredLeaveMonths;

#[derive(Deserialize, ToSchema)]
pub struct SubmitMonths {
    /// Exactly two distinct months, 1..=12
    #[schema(example = json!([3, 7]))]
    pub preferred_months: Vec<u32>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DesiredMonthsQuery {
    /// Another user's record (HR/Admin only)
    #[schema(example = 1000)]
    pub user_id: Option<u64>,
}

#[derive(Deserialize, ToSchema)]
pub struct ValidateRange {
    #[schema(example = "2026-03-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-20", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

async fn fetch_record(
    pool: &MySqlPool,
    user_id: u64,
) -> Result<Option<DesiredLeaveMonths>, sqlx::Error> {
    sqlx::query_as::<_, DesiredLeaveMonths>(
        r#"
        SELECT id, user_id, month_one, month_two, submitted_at, is_locked
        FROM desired_leave_months
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/* =========================
Get desired months
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/desired-months",
    params(DesiredMonthsQuery),
    responses(
        (status = 200, description = "Record found", body = DesiredLeaveMonths),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No record submitted yet")
    ),
    security(("bearer_auth" = [])),
    tag = "DesiredMonths"
)]
pub async fn get_desired_months(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<DesiredMonthsQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = match query.user_id {
        Some(other) if other != auth.user_id => {
            auth.require_hr_or_admin()?;
            other
        }
        _ => auth.user_id,
    };

    let record = fetch_record(pool.get_ref(), user_id).await.map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to fetch desired months");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match record {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Desired leave months not submitted yet"
        }))),
    }
}

/* =========================
Submit desired months (one-time)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/desired-months",
    request_body(content = SubmitMonths, content_type = "application/json"),
    responses(
        (status = 200, description = "Months recorded", body = DesiredLeaveMonths),
        (status = 400, description = "Invalid month selection"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Already submitted")
    ),
    security(("bearer_auth" = [])),
    tag = "DesiredMonths"
)]
pub async fn submit_desired_months(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubmitMonths>,
) -> actix_web::Result<impl Responder> {
    let pool = pool.get_ref();

    let months = match desired_months::normalize_selection(&payload.preferred_months) {
        Ok(months) => months,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    // Insert-once; the unique key on user_id turns a second submission into
    // a duplicate-key error rather than an overwrite.
    let result = sqlx::query(
        r#"
        INSERT INTO desired_leave_months
            (user_id, month_one, month_two, submitted_at, is_locked)
        VALUES (?, ?, ?, ?, 1)
        "#,
    )
    .bind(auth.user_id)
    .bind(months[0])
    .bind(months[1])
    .bind(Utc::now())
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Ok(HttpResponse::Conflict().json(serde_json::json!({
                "message": DesiredMonthsError::AlreadySubmitted.to_string()
            })));
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = auth.user_id, "Failed to store desired months");
            return Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ));
        }
    }

    tracing::info!(
        user_id = auth.user_id,
        months = ?months,
        "Desired leave months locked"
    );

    let record = fetch_record(pool, auth.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch stored desired months");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    Ok(HttpResponse::Ok().json(record))
}

/* =========================
Validate a date range against desired months
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/desired-months/validate",
    request_body(content = ValidateRange, content_type = "application/json"),
    responses(
        (status = 200, description = "Validation outcome", body = DesiredMonthsCheck),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No record submitted yet")
    ),
    security(("bearer_auth" = [])),
    tag = "DesiredMonths"
)]
pub async fn validate_desired_months(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ValidateRange>,
) -> actix_web::Result<impl Responder> {
    let record = fetch_record(pool.get_ref(), auth.user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch desired months");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(record) = record else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Submit your desired leave months first"
        })));
    };

    let check =
        desired_months::validate_range(record.months(), payload.start_date, payload.end_date);
    Ok(HttpResponse::Ok().json(check))
}
