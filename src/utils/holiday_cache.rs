use anyhow::Result;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::calendar::HolidaySet;
use crate::model::holiday::PublicHoliday;

/// year => active holiday dates for that year
static HOLIDAY_CACHE: Lazy<Cache<i32, Arc<HolidaySet>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(32) // a handful of years at most
        .time_to_live(Duration::from_secs(3600)) // 1h TTL, admins edit holidays rarely
        .build()
});

async fn load_year(pool: &MySqlPool, year: i32) -> Result<Arc<HolidaySet>> {
    let rows = sqlx::query_as::<_, PublicHoliday>(
        r#"
        SELECT id, holiday_date, year, name, is_active
        FROM public_holidays
        WHERE year = ? AND is_active = 1
        "#,
    )
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(Arc::new(rows.into_iter().map(|h| h.holiday_date).collect()))
}

/// Active holidays for one year, cached.
pub async fn holidays_for_year(pool: &MySqlPool, year: i32) -> Result<Arc<HolidaySet>> {
    if let Some(set) = HOLIDAY_CACHE.get(&year).await {
        return Ok(set);
    }
    let set = load_year(pool, year).await?;
    HOLIDAY_CACHE.insert(year, set.clone()).await;
    Ok(set)
}

/// Union of the active holidays over `[start_year, end_year]`. Calendar
/// computations that may cross a year boundary need both years' sets.
pub async fn holidays_for_years(
    pool: &MySqlPool,
    start_year: i32,
    end_year: i32,
) -> Result<HolidaySet> {
    let mut union = HolidaySet::new();
    for year in start_year..=end_year {
        let set = holidays_for_year(pool, year).await?;
        union.extend(set.iter().copied());
    }
    Ok(union)
}

/// Pre-load the current and next year at startup.
pub async fn warmup_holiday_cache(pool: &MySqlPool, current_year: i32) -> Result<()> {
    let mut total = 0usize;
    for year in current_year..=current_year + 1 {
        let set = holidays_for_year(pool, year).await?;
        total += set.len();
    }
    tracing::info!(
        "Holiday cache warmup complete: {} active holidays for {}..={}",
        total,
        current_year,
        current_year + 1
    );
    Ok(())
}
