//! Vendor risk matrix: composite index per vendor.
//!
//! For each vendor present in the scored open orders:
//!   1. Counts and value sums by predicted label
//!   2. Mean classifier confidence
//!   3. Load ratio against the vendor's historical mean load
//!   4. raw = rate_on_time * mean_confidence * rate_value / load_ratio
//!   5. risk_index = (1 - raw) * 100
//!
//! Ranking is a stable sort on the rounded index, descending. Groups are
//! formed in ascending vendor id order, which is the tie-break order.

use crate::{
    config::RiskConfig,
    load::VendorLoads,
    prediction::{PredictionLabel, ScoredOrder},
    types::VendorId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRiskRow {
    pub rank: usize,
    pub vendor_name: Option<String>,
    pub vendor_id: VendorId,
    pub orders_on_time: i64,
    pub orders_late: i64,
    pub rate_on_time: f64,
    pub orders_total: i64,
    /// Historical mean load; 0 when the vendor has no delivered history.
    pub mean_load: i64,
    pub load_ratio: f64,
    pub value_total: f64,
    pub value_on_time: f64,
    pub value_late: f64,
    pub rate_value: f64,
    pub mean_confidence: f64,
    pub risk_index: f64,
}

#[derive(Debug, Default)]
struct VendorTally {
    vendor_name: Option<String>,
    on_time: i64,
    late: i64,
    confidence_sum: f64,
    value_total: f64,
    value_on_time: f64,
    value_late: f64,
}

impl VendorTally {
    fn add(&mut self, order: &ScoredOrder) {
        // First non-blank name seen for the vendor wins.
        if self.vendor_name.is_none() {
            self.vendor_name = order.vendor_name.clone();
        }
        match order.label {
            PredictionLabel::OnTime => {
                self.on_time += 1;
                self.value_on_time += order.net_value;
            }
            PredictionLabel::Late => {
                self.late += 1;
                self.value_late += order.net_value;
            }
        }
        self.confidence_sum += order.confidence;
        self.value_total += order.net_value;
    }

    fn total(&self) -> i64 {
        self.on_time + self.late
    }
}

/// Penalty for a vendor currently holding more orders than it historically
/// juggles. Always within `[1, config.max_load_ratio]`.
pub fn load_ratio(orders_total: i64, mean_load: Option<i64>, config: &RiskConfig) -> f64 {
    match mean_load {
        Some(load) if load > config.low_load_threshold => {
            (orders_total as f64 / load as f64).clamp(1.0, config.max_load_ratio)
        }
        _ => 1.0,
    }
}

/// Composite index before rounding. Higher means riskier.
pub fn risk_index(rate_on_time: f64, mean_confidence: f64, rate_value: f64, load_ratio: f64) -> f64 {
    let raw = rate_on_time * mean_confidence * rate_value / load_ratio;
    (1.0 - raw) * 100.0
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Build the ranked vendor matrix.
pub fn aggregate_risk(
    scored: &[ScoredOrder],
    vendor_loads: &VendorLoads,
    config: &RiskConfig,
) -> Vec<VendorRiskRow> {
    let mut tallies: BTreeMap<&str, VendorTally> = BTreeMap::new();
    for order in scored {
        tallies
            .entry(order.vendor_id.as_str())
            .or_default()
            .add(order);
    }

    let dp = config.display_decimals;
    let mut rows: Vec<VendorRiskRow> = tallies
        .into_iter()
        .map(|(vendor_id, t)| {
            let total = t.total();
            let rate_on_time = t.on_time as f64 / total as f64;
            let mean_confidence = t.confidence_sum / total as f64;
            let rate_value = if t.value_total == 0.0 {
                0.0
            } else {
                t.value_on_time / t.value_total
            };
            let mean_load = vendor_loads.get(vendor_id).copied();
            let ratio = load_ratio(total, mean_load, config);
            let index = risk_index(rate_on_time, mean_confidence, rate_value, ratio);

            VendorRiskRow {
                rank: 0,
                vendor_name: t.vendor_name,
                vendor_id: vendor_id.to_string(),
                orders_on_time: t.on_time,
                orders_late: t.late,
                rate_on_time: round_to(rate_on_time, dp),
                orders_total: total,
                mean_load: mean_load.filter(|&l| l >= 1).unwrap_or(0),
                load_ratio: round_to(ratio, dp),
                value_total: round_to(t.value_total, dp),
                value_on_time: round_to(t.value_on_time, dp),
                value_late: round_to(t.value_late, dp),
                rate_value: round_to(rate_value, dp),
                mean_confidence: round_to(mean_confidence, dp),
                risk_index: round_to(index, dp),
            }
        })
        .collect();

    // Stable: equal indices keep vendor id order.
    rows.sort_by(|a, b| b.risk_index.total_cmp(&a.risk_index));
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position + 1;
    }

    log::info!("Risk matrix built for {} vendors", rows.len());
    rows
}
