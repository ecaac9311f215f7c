//! Concurrent-order load estimation tests.

use chrono::NaiveDate;
use irf_core::{estimate_loads, order::OrderInterval};

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(n as i64)
}

fn order(r: &str, vendor: &str, placed: u32, due: u32) -> OrderInterval {
    OrderInterval {
        order_ref: r.to_string(),
        vendor_id: vendor.to_string(),
        placed_at: day(placed),
        due_at: day(due),
    }
}

/// A vendor with a single order never has concurrent load.
#[test]
fn single_order_vendor_has_zero_load() {
    let orders = vec![order("a", "V1", 0, 10), order("b", "V2", 3, 4)];
    let est = estimate_loads(&orders);
    assert_eq!(est.per_order, vec![0, 0]);
    assert_eq!(est.per_vendor["V1"], 0);
    assert_eq!(est.per_vendor["V2"], 0);
}

/// Disjoint intervals never overlap.
#[test]
fn disjoint_intervals_have_zero_load() {
    let orders = vec![
        order("a", "V1", 0, 5),
        order("b", "V1", 10, 15),
        order("c", "V1", 20, 25),
        order("d", "V1", 30, 35),
    ];
    let est = estimate_loads(&orders);
    assert!(est.per_order.iter().all(|&l| l == 0), "{:?}", est.per_order);
}

/// N orders placed on the same day, all due later, see each other.
#[test]
fn same_day_orders_see_n_minus_one() {
    let n = 6;
    let orders: Vec<_> = (0..n)
        .map(|i| order(&format!("o{i}"), "V1", 2, 20 + i))
        .collect();
    let est = estimate_loads(&orders);
    assert!(
        est.per_order.iter().all(|&l| l == n as i64 - 1),
        "Expected every load to be {}, got {:?}",
        n - 1,
        est.per_order
    );
    assert_eq!(est.per_vendor["V1"], n as i64 - 1);
}

/// An order due on the day another is placed is already closed that day.
#[test]
fn due_on_placement_day_is_netted_out() {
    let orders = vec![order("a", "V1", 0, 5), order("b", "V1", 5, 9)];
    let est = estimate_loads(&orders);
    // Day 5: starts <= 5 = 2, ends <= 5 = 1 -> open 1 -> load 0.
    assert_eq!(est.per_order, vec![0, 0]);
}

/// Overlaps are counted per vendor only.
#[test]
fn overlap_counts_are_vendor_scoped() {
    let orders = vec![
        order("a", "V1", 0, 30),
        order("b", "V1", 5, 30),
        order("c", "V2", 6, 30),
        order("d", "V1", 10, 12),
    ];
    let est = estimate_loads(&orders);
    assert_eq!(est.per_order, vec![0, 1, 0, 2]);
    // V1 mean (0 + 1 + 2) / 3 = 1
    assert_eq!(est.per_vendor["V1"], 1);
    assert_eq!(est.per_vendor["V2"], 0);
}

/// Output preserves input order, whatever the date order.
#[test]
fn per_order_follows_input_order() {
    let orders = vec![
        order("late", "V1", 10, 40),
        order("early", "V1", 0, 40),
    ];
    let est = estimate_loads(&orders);
    assert_eq!(est.per_order, vec![1, 0]);
}

/// Vendor mean rounds halves up.
#[test]
fn vendor_mean_rounds_half_up() {
    // Loads 0 and 1 -> mean 0.5 -> 1.
    let orders = vec![order("a", "V1", 0, 10), order("b", "V1", 3, 10)];
    let est = estimate_loads(&orders);
    assert_eq!(est.per_order, vec![0, 1]);
    assert_eq!(est.per_vendor["V1"], 1);
}

#[test]
fn empty_input_yields_empty_estimate() {
    let est = estimate_loads(&[]);
    assert!(est.per_order.is_empty());
    assert!(est.per_vendor.is_empty());
}
