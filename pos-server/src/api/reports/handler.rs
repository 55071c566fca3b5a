//! Report API Handlers
//!
//! 时间范围: `period` + `date`，或 `start` / `end` 日期 (含 `end` 当天)。
//! 日期均按业务时区解释，统一转换为 `[start, end)` Unix millis。

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::core::ServerState;
use crate::reports;
use crate::utils::time;
use crate::utils::{AppError, AppResult};
use shared::models::{HourlySales, KitchenEfficiency, ProductAnalysis, ReportPeriod, SalesSummary};

/// Query params shared by the range reports
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub period: Option<ReportPeriod>,
    /// Anchor date for `period` (defaults to today)
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Query params for hourly sales
#[derive(Debug, Deserialize)]
pub struct HourlyQuery {
    pub date: Option<String>,
}

/// Resolve a range query to `[start, end)` millis; `None` when no bound was given
fn resolve_range(query: &RangeQuery, today: NaiveDate, tz: Tz) -> AppResult<Option<(i64, i64)>> {
    if let Some(period) = query.period {
        let anchor = match &query.date {
            Some(date) => time::parse_date(date)?,
            None => today,
        };
        let (start, end) = period.range(anchor);
        return Ok(Some((
            time::day_start_millis(start, tz),
            time::day_start_millis(end, tz),
        )));
    }

    match (&query.start, &query.end) {
        (Some(start), Some(end)) => {
            let start = time::parse_date(start)?;
            let end = time::parse_date(end)?;
            if end < start {
                return Err(AppError::validation(format!(
                    "end date {end} is before start date {start}"
                )));
            }
            Ok(Some((
                time::day_start_millis(start, tz),
                time::day_end_millis(end, tz),
            )))
        }
        (None, None) => match &query.date {
            Some(date) => {
                let date = time::parse_date(date)?;
                Ok(Some((time::day_start_millis(date, tz), time::day_end_millis(date, tz))))
            }
            None => Ok(None),
        },
        _ => Err(AppError::invalid_request("start and end must be given together")),
    }
}

/// Resolved range, falling back to today
fn range_or_today(query: &RangeQuery, tz: Tz) -> AppResult<(i64, i64)> {
    let today = time::today(tz);
    Ok(resolve_range(query, today, tz)?.unwrap_or_else(|| {
        (time::day_start_millis(today, tz), time::day_end_millis(today, tz))
    }))
}

/// GET /api/reports/sales - 销售汇总 (默认今天)
pub async fn sales(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<SalesSummary>> {
    let (start, end) = range_or_today(&query, state.config.timezone)?;
    let summary = reports::sales_summary(state.pool(), start, end).await?;
    Ok(Json(summary))
}

/// GET /api/reports/products - 畅销 / 滞销商品 (默认全部时间)
pub async fn products(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<ProductAnalysis>> {
    let tz = state.config.timezone;
    let range = resolve_range(&query, time::today(tz), tz)?;
    let analysis = reports::product_analysis(
        state.pool(),
        range.map(|(start, _)| start),
        range.map(|(_, end)| end),
    )
    .await?;
    Ok(Json(analysis))
}

/// GET /api/reports/hourly?date= - 按小时销售 (默认今天)
pub async fn hourly(
    State(state): State<ServerState>,
    Query(query): Query<HourlyQuery>,
) -> AppResult<Json<HourlySales>> {
    let tz = state.config.timezone;
    let date = match query.date {
        Some(date) => time::parse_date(&date)?,
        None => time::today(tz),
    };
    let hourly = reports::hourly_sales(state.pool(), date, tz).await?;
    Ok(Json(hourly))
}

/// GET /api/reports/kitchen - 出餐效率 (默认今天)
pub async fn kitchen(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<KitchenEfficiency>> {
    let (start, end) = range_or_today(&query, state.config.timezone)?;
    let efficiency = reports::kitchen_efficiency(state.pool(), start, end).await?;
    Ok(Json(efficiency))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_range() {
        let query = RangeQuery {
            period: Some(ReportPeriod::Weekly),
            date: Some("2024-05-16".into()),
            ..Default::default()
        };
        let (start, end) = resolve_range(&query, date(2024, 1, 1), chrono_tz::UTC)
            .unwrap()
            .unwrap();
        // Thursday 16 May belongs to the week starting Monday 13 May
        assert_eq!(start, time::day_start_millis(date(2024, 5, 13), chrono_tz::UTC));
        assert_eq!(end - start, 7 * DAY);
    }

    #[test]
    fn test_period_defaults_to_today() {
        let query = RangeQuery {
            period: Some(ReportPeriod::Daily),
            ..Default::default()
        };
        let today = date(2024, 3, 1);
        let (start, end) = resolve_range(&query, today, chrono_tz::UTC).unwrap().unwrap();
        assert_eq!(start, time::day_start_millis(today, chrono_tz::UTC));
        assert_eq!(end - start, DAY);
    }

    #[test]
    fn test_explicit_dates_include_end_day() {
        let query = RangeQuery {
            start: Some("2024-05-01".into()),
            end: Some("2024-05-03".into()),
            ..Default::default()
        };
        let (start, end) = resolve_range(&query, date(2024, 1, 1), chrono_tz::UTC)
            .unwrap()
            .unwrap();
        assert_eq!(end - start, 3 * DAY);
    }

    #[test]
    fn test_invalid_ranges() {
        let reversed = RangeQuery {
            start: Some("2024-05-03".into()),
            end: Some("2024-05-01".into()),
            ..Default::default()
        };
        assert!(resolve_range(&reversed, date(2024, 1, 1), chrono_tz::UTC).is_err());

        let half = RangeQuery {
            start: Some("2024-05-03".into()),
            ..Default::default()
        };
        assert!(resolve_range(&half, date(2024, 1, 1), chrono_tz::UTC).is_err());

        let bad_date = RangeQuery {
            date: Some("16/05/2024".into()),
            ..Default::default()
        };
        assert!(resolve_range(&bad_date, date(2024, 1, 1), chrono_tz::UTC).is_err());
    }

    #[test]
    fn test_no_bounds() {
        let query = RangeQuery::default();
        assert_eq!(resolve_range(&query, date(2024, 1, 1), chrono_tz::UTC).unwrap(), None);
    }
}
