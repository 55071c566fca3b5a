//! Report Models
//!
//! Read-only aggregates computed from orders; nothing here is stored.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reporting period anchored on a calendar date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ReportPeriod {
    /// Half-open date range `[start, end)` containing `date`
    ///
    /// Weeks start on Monday.
    pub fn range(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Daily => (date, date + Duration::days(1)),
            Self::Weekly => {
                let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
                (start, start + Duration::days(7))
            }
            Self::Monthly => {
                let start = date.with_day(1).unwrap_or(date);
                let end = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
                };
                (start, end.unwrap_or(start + Duration::days(31)))
            }
            Self::Yearly => {
                let start = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
                let end = NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
                    .unwrap_or(start + Duration::days(366));
                (start, end)
            }
        }
    }
}

/// Units sold of one menu item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSales {
    pub name: String,
    pub units: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Sales summary over a range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
    pub start: i64,
    pub end: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    pub order_count: i64,
    pub items_sold: i64,
    /// Best sellers by units, at most 10
    pub top_products: Vec<ProductSales>,
}

/// Best and worst sellers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub top_products: Vec<ProductSales>,
    pub bottom_products: Vec<ProductSales>,
}

/// Sales of one hour of the day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourBucket {
    /// "00" .. "23"
    pub hour: String,
    pub order_count: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub sales: Decimal,
}

/// Hourly sales of one local day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlySales {
    pub date: String,
    /// Always 24 buckets
    pub hours: Vec<HourBucket>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    /// Hour with the highest sales, `None` on a day without sales
    pub peak_hour: Option<String>,
}

/// Kitchen time of one order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitchenOrderTime {
    pub order_id: i64,
    pub table_number: i64,
    pub started_at: i64,
    pub finished_at: i64,
    pub minutes: f64,
}

/// Kitchen efficiency over a range
///
/// All figures are zero when no order has both kitchen timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenEfficiency {
    pub start: i64,
    pub end: i64,
    pub order_count: i64,
    pub average_minutes: f64,
    pub fastest_minutes: f64,
    pub slowest_minutes: f64,
    pub orders: Vec<KitchenOrderTime>,
}
