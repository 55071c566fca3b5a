//! Report aggregation over raw sale lines and kitchen stamps
//!
//! Money is summed as `Decimal` and rounded to 2 places (half away from
//! zero); minutes are rounded to 1 place.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{
    HourBucket, HourlySales, KitchenEfficiency, KitchenOrderTime, ProductAnalysis, ProductSales,
    SalesSummary,
};
use shared::util::minutes_between;

use crate::db::repository::report::{KitchenTimeRow, SaleLine};
use crate::utils::time::local_hour;

/// Number of products in a top / bottom ranking
pub const RANKING_SIZE: usize = 10;

fn money(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn round_minutes(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Units and revenue per product, best sellers first (ties by name)
fn product_totals(lines: &[SaleLine]) -> Vec<ProductSales> {
    let mut totals: HashMap<&str, (i64, Decimal)> = HashMap::new();
    for line in lines {
        let (Some(name), Some(price)) = (&line.name, line.price) else {
            continue;
        };
        let entry = totals.entry(name.as_str()).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += money(price);
    }

    let mut products: Vec<ProductSales> = totals
        .into_iter()
        .map(|(name, (units, revenue))| ProductSales {
            name: name.to_string(),
            units,
            revenue: round_money(revenue),
        })
        .collect();
    products.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.name.cmp(&b.name)));
    products
}

/// Totals, order count, units sold and top sellers
pub fn sales_summary(start: i64, end: i64, lines: &[SaleLine]) -> SalesSummary {
    let orders: HashSet<i64> = lines.iter().map(|l| l.order_id).collect();
    let total: Decimal = lines.iter().filter_map(|l| l.price).map(money).sum();
    let items_sold = lines.iter().filter(|l| l.name.is_some()).count() as i64;

    let mut top_products = product_totals(lines);
    top_products.truncate(RANKING_SIZE);

    SalesSummary {
        start,
        end,
        total_sales: round_money(total),
        order_count: orders.len() as i64,
        items_sold,
        top_products,
    }
}

/// Top and bottom sellers by units
pub fn product_analysis(start: Option<i64>, end: Option<i64>, lines: &[SaleLine]) -> ProductAnalysis {
    let ranked = product_totals(lines);

    let top_products: Vec<ProductSales> = ranked.iter().take(RANKING_SIZE).cloned().collect();
    let mut bottom_products = ranked;
    bottom_products.sort_by(|a, b| a.units.cmp(&b.units).then_with(|| a.name.cmp(&b.name)));
    bottom_products.truncate(RANKING_SIZE);

    ProductAnalysis {
        start,
        end,
        top_products,
        bottom_products,
    }
}

/// 24 hourly buckets of one local day with the peak hour
pub fn hourly_sales(date: NaiveDate, tz: Tz, lines: &[SaleLine]) -> HourlySales {
    let mut sales = [Decimal::ZERO; 24];
    let mut orders: [HashSet<i64>; 24] = std::array::from_fn(|_| HashSet::new());

    for line in lines {
        let Some(hour) = local_hour(line.created_at, tz) else {
            continue;
        };
        let hour = hour as usize;
        orders[hour].insert(line.order_id);
        if let Some(price) = line.price {
            sales[hour] += money(price);
        }
    }

    let hours: Vec<HourBucket> = (0..24)
        .map(|h| HourBucket {
            hour: format!("{h:02}"),
            order_count: orders[h].len() as i64,
            sales: round_money(sales[h]),
        })
        .collect();
    let total: Decimal = sales.iter().copied().sum();

    // Earliest hour wins a tie
    let peak_hour = hours
        .iter()
        .filter(|b| b.sales > Decimal::ZERO)
        .fold(None::<&HourBucket>, |best, b| match best {
            Some(top) if top.sales >= b.sales => Some(top),
            _ => Some(b),
        })
        .map(|b| b.hour.clone());

    HourlySales {
        date: date.format("%Y-%m-%d").to_string(),
        hours,
        total_sales: round_money(total),
        peak_hour,
    }
}

/// Average, fastest and slowest kitchen time
pub fn kitchen_efficiency(start: i64, end: i64, rows: &[KitchenTimeRow]) -> KitchenEfficiency {
    let orders: Vec<KitchenOrderTime> = rows
        .iter()
        .filter_map(|r| {
            minutes_between(r.started_at, r.finished_at).map(|minutes| KitchenOrderTime {
                order_id: r.order_id,
                table_number: r.table_number,
                started_at: r.started_at,
                finished_at: r.finished_at,
                minutes,
            })
        })
        .collect();

    if orders.is_empty() {
        return KitchenEfficiency {
            start,
            end,
            order_count: 0,
            average_minutes: 0.0,
            fastest_minutes: 0.0,
            slowest_minutes: 0.0,
            orders,
        };
    }

    // Exact durations for the average, not the rounded per-order figures
    let exact: Vec<f64> = orders
        .iter()
        .map(|o| (o.finished_at - o.started_at) as f64 / 60_000.0)
        .collect();
    let average = exact.iter().sum::<f64>() / exact.len() as f64;
    let fastest = exact.iter().copied().fold(f64::INFINITY, f64::min);
    let slowest = exact.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    KitchenEfficiency {
        start,
        end,
        order_count: orders.len() as i64,
        average_minutes: round_minutes(average),
        fastest_minutes: round_minutes(fastest),
        slowest_minutes: round_minutes(slowest),
        orders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const HOUR: i64 = 3_600_000;

    fn line(order_id: i64, created_at: i64, name: &str, price: f64) -> SaleLine {
        SaleLine {
            order_id,
            created_at,
            name: Some(name.to_string()),
            price: Some(price),
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sales_summary_counts_orders_and_units() {
        let lines = vec![
            line(1, 0, "Tacos", 50.1),
            line(1, 0, "Tacos", 50.1),
            line(2, 0, "Agua", 20.05),
            SaleLine {
                order_id: 3,
                created_at: 0,
                name: None,
                price: None,
            },
        ];
        let summary = sales_summary(0, 10, &lines);

        assert_eq!(summary.order_count, 3);
        assert_eq!(summary.items_sold, 3);
        assert_eq!(summary.total_sales, dec("120.25"));
        assert_eq!(summary.top_products[0].name, "Tacos");
        assert_eq!(summary.top_products[0].units, 2);
        assert_eq!(summary.top_products[0].revenue, dec("100.20"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = sales_summary(0, 10, &[]);
        assert_eq!(summary.total_sales, Decimal::ZERO);
        assert_eq!(summary.order_count, 0);
        assert!(summary.top_products.is_empty());
    }

    #[test]
    fn test_rankings_are_capped_and_ordered() {
        let mut lines = Vec::new();
        // Dish i sold i times
        for i in 1..=12 {
            for _ in 0..i {
                lines.push(line(i, 0, &format!("Dish {i:02}"), 10.0));
            }
        }
        let analysis = product_analysis(None, None, &lines);

        assert_eq!(analysis.top_products.len(), RANKING_SIZE);
        assert_eq!(analysis.top_products[0].name, "Dish 12");
        assert_eq!(analysis.bottom_products.len(), RANKING_SIZE);
        assert_eq!(analysis.bottom_products[0].name, "Dish 01");
        assert_eq!(analysis.bottom_products[0].units, 1);
    }

    #[test]
    fn test_hourly_buckets_and_peak() {
        let tz: Tz = "UTC".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 16).unwrap();
        let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis();

        let lines = vec![
            line(1, midnight + 13 * HOUR, "Tacos", 50.0),
            line(1, midnight + 13 * HOUR, "Agua", 20.0),
            line(2, midnight + 14 * HOUR, "Tacos", 50.0),
            line(3, midnight + 20 * HOUR, "Flan", 40.0),
        ];
        let hourly = hourly_sales(date, tz, &lines);

        assert_eq!(hourly.hours.len(), 24);
        assert_eq!(hourly.hours[13].hour, "13");
        assert_eq!(hourly.hours[13].order_count, 1);
        assert_eq!(hourly.hours[13].sales, dec("70"));
        assert_eq!(hourly.total_sales, dec("160"));
        assert_eq!(hourly.peak_hour.as_deref(), Some("13"));
        assert_eq!(hourly.date, "2024-05-16");
    }

    #[test]
    fn test_hourly_uses_business_timezone() {
        let tz: Tz = "America/Mexico_City".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 16).unwrap();
        // 18:00 UTC is 12:00 in Mexico City (UTC-6)
        let at = date.and_hms_opt(18, 0, 0).unwrap().and_utc().timestamp_millis();

        let hourly = hourly_sales(date, tz, &[line(1, at, "Tacos", 50.0)]);
        assert_eq!(hourly.peak_hour.as_deref(), Some("12"));
    }

    #[test]
    fn test_day_without_sales_has_no_peak() {
        let tz: Tz = "UTC".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 16).unwrap();
        let hourly = hourly_sales(date, tz, &[]);
        assert_eq!(hourly.peak_hour, None);
        assert!(hourly.hours.iter().all(|b| b.sales == Decimal::ZERO));
    }

    #[test]
    fn test_kitchen_efficiency() {
        let rows = vec![
            KitchenTimeRow {
                order_id: 1,
                table_number: 1,
                started_at: 0,
                finished_at: 10 * 60_000,
            },
            KitchenTimeRow {
                order_id: 2,
                table_number: 2,
                started_at: 0,
                finished_at: 25 * 60_000,
            },
        ];
        let eff = kitchen_efficiency(0, HOUR, &rows);

        assert_eq!(eff.order_count, 2);
        assert_eq!(eff.average_minutes, 17.5);
        assert_eq!(eff.fastest_minutes, 10.0);
        assert_eq!(eff.slowest_minutes, 25.0);
        assert_eq!(eff.orders[1].minutes, 25.0);
    }

    #[test]
    fn test_kitchen_efficiency_without_orders() {
        let eff = kitchen_efficiency(0, HOUR, &[]);
        assert_eq!(eff.order_count, 0);
        assert_eq!(eff.average_minutes, 0.0);
        assert!(eff.orders.is_empty());
    }
}
