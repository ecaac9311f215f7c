//! Feature rows handed to the delay classifier.

use crate::{
    order::OpenOrder,
    types::{OrderRef, VendorId},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub order_ref: OrderRef,
    pub vendor_id: VendorId,
    pub material_group: Option<String>,
    pub net_value: f64,
    /// Calendar month the order was placed in (1-12).
    pub order_month: u32,
    /// Days between placement and the reference date.
    pub order_age_days: i64,
    /// Days between placement and due date; `None` without a due date.
    pub days_to_due: Option<i64>,
    /// Open orders currently held by the same vendor, this one included.
    pub vendor_open_orders: i64,
}

/// Derive classifier features for the open book as of `as_of`.
/// Output order follows `open`.
pub fn build_features(open: &[OpenOrder], as_of: NaiveDate) -> Vec<FeatureRow> {
    let mut per_vendor: HashMap<&str, i64> = HashMap::new();
    for order in open {
        *per_vendor.entry(order.vendor_id.as_str()).or_default() += 1;
    }

    open.iter()
        .map(|order| FeatureRow {
            order_ref: order.order_ref.clone(),
            vendor_id: order.vendor_id.clone(),
            material_group: order.material_group.clone(),
            net_value: order.net_value,
            order_month: order.placed_at.month(),
            order_age_days: (as_of - order.placed_at).num_days(),
            days_to_due: order.due_at.map(|due| (due - order.placed_at).num_days()),
            vendor_open_orders: per_vendor
                .get(order.vendor_id.as_str())
                .copied()
                .unwrap_or(0),
        })
        .collect()
}
