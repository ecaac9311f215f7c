//! Concurrent-order load estimation.
//!
//! For every order: how many other orders of the same vendor were open on
//! the day it was placed. Open count on a date `d` is
//! `(# starts <= d) - (# ends <= d)`, built from two independent cumulative
//! counters per distinct date inside the vendor group. An order due on the
//! same day another is placed is therefore already closed on that day, and
//! orders placed on the same day all see each other.
//!
//! The sweep must stay two-counter: interleaving starts and ends in a single
//! running total changes the same-day results.

use crate::{
    order::OrderInterval,
    types::VendorId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Historical mean concurrent load per vendor.
pub type VendorLoads = BTreeMap<VendorId, i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Delta {
    Start,
    End,
}

/// One `+1` / `-1` event on a vendor's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoadEvent {
    date: NaiveDate,
    delta: Delta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadEstimate {
    /// Concurrent load for each input order, in input order.
    pub per_order: Vec<i64>,
    /// Rounded mean of `per_order` per vendor.
    pub per_vendor: VendorLoads,
}

/// Run the event sweep over `orders`.
///
/// Callers wanting the historical `VendorLoad` table pass only the
/// delivered subset (see `OrderBook::closed_intervals`).
pub fn estimate_loads(orders: &[OrderInterval]) -> LoadEstimate {
    let mut timelines: HashMap<&str, Vec<LoadEvent>> = HashMap::new();
    for order in orders {
        let events = timelines.entry(order.vendor_id.as_str()).or_default();
        events.push(LoadEvent {
            date: order.placed_at,
            delta: Delta::Start,
        });
        events.push(LoadEvent {
            date: order.due_at,
            delta: Delta::End,
        });
    }

    let open_by_vendor: HashMap<&str, BTreeMap<NaiveDate, i64>> = timelines
        .into_iter()
        .map(|(vendor, mut events)| {
            events.sort_by_key(|e| (e.date, e.delta));
            (vendor, open_counts(&events))
        })
        .collect();

    let per_order: Vec<i64> = orders
        .iter()
        .map(|order| {
            let open = open_by_vendor
                .get(order.vendor_id.as_str())
                .and_then(|dates| dates.get(&order.placed_at))
                .copied()
                .unwrap_or(1);
            open - 1
        })
        .collect();

    let per_vendor = vendor_means(orders, &per_order);
    log::debug!(
        "Estimated concurrent load for {} orders across {} vendors",
        orders.len(),
        per_vendor.len()
    );

    LoadEstimate {
        per_order,
        per_vendor,
    }
}

/// Open count at each distinct date of a date-sorted vendor timeline.
fn open_counts(events: &[LoadEvent]) -> BTreeMap<NaiveDate, i64> {
    let mut counts = BTreeMap::new();
    let mut starts = 0i64;
    let mut ends = 0i64;
    let mut i = 0;
    while i < events.len() {
        let date = events[i].date;
        while i < events.len() && events[i].date == date {
            match events[i].delta {
                Delta::Start => starts += 1,
                Delta::End => ends += 1,
            }
            i += 1;
        }
        counts.insert(date, starts - ends);
    }
    counts
}

fn vendor_means(orders: &[OrderInterval], per_order: &[i64]) -> VendorLoads {
    let mut sums: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    for (order, load) in orders.iter().zip(per_order) {
        let entry = sums.entry(order.vendor_id.as_str()).or_default();
        entry.0 += load;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(vendor, (sum, count))| {
            let mean = sum as f64 / count as f64;
            (vendor.to_string(), round_half_up(mean))
        })
        .collect()
}

/// Nearest integer, halves rounded towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
