//! Delay predictions for open orders.
//!
//! The trained classifier lives outside this crate and is reached through
//! `PredictionSource`. Before it is called, the tolerance gate removes every
//! order that can no longer arrive on time: if the due date is not strictly
//! after `as_of + delivery_tolerance_days` (or there is no due date, no
//! tolerance, or the sum falls outside the calendar) the order is labelled
//! `Late` with the configured forced confidence.

use crate::{
    config::OpenOrderConfig,
    error::{IrfError, IrfResult},
    features::FeatureRow,
    order::OpenOrder,
    types::{OrderRef, VendorId},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionLabel {
    OnTime,
    Late,
}

impl PredictionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTime => "on_time",
            Self::Late => "late",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub order_ref: OrderRef,
    pub label: PredictionLabel,
    /// Classifier score for `label`, in [0, 1].
    pub confidence: f64,
}

/// The external delay classifier.
///
/// Must return exactly one result per input row, in row order. Any failure
/// fails the whole batch; the core never retries.
pub trait PredictionSource {
    fn name(&self) -> &str;

    fn predict(&self, rows: &[FeatureRow]) -> anyhow::Result<Vec<PredictionResult>>;
}

/// Predictions computed elsewhere and looked up by order reference.
#[derive(Debug, Clone, Default)]
pub struct StaticPredictions {
    by_ref: HashMap<OrderRef, PredictionResult>,
}

impl StaticPredictions {
    pub fn new(results: impl IntoIterator<Item = PredictionResult>) -> Self {
        Self {
            by_ref: results
                .into_iter()
                .map(|r| (r.order_ref.clone(), r))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_ref.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ref.is_empty()
    }
}

impl PredictionSource for StaticPredictions {
    fn name(&self) -> &str {
        "static"
    }

    fn predict(&self, rows: &[FeatureRow]) -> anyhow::Result<Vec<PredictionResult>> {
        rows.iter()
            .map(|row| {
                self.by_ref
                    .get(&row.order_ref)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("no prediction for order {}", row.order_ref))
            })
            .collect()
    }
}

/// A prediction joined back to its order; the aggregator's input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredOrder {
    pub order_ref: OrderRef,
    pub vendor_id: VendorId,
    pub vendor_name: Option<String>,
    pub net_value: f64,
    pub label: PredictionLabel,
    pub confidence: f64,
    /// True when the tolerance gate labelled the order without the classifier.
    pub forced: bool,
}

/// Whether the classifier may still judge this order.
pub fn within_tolerance(order: &OpenOrder, as_of: NaiveDate) -> bool {
    let deadline = order
        .delivery_tolerance_days
        .and_then(Duration::try_days)
        .and_then(|tolerance| as_of.checked_add_signed(tolerance));
    match (order.due_at, deadline) {
        (Some(due), Some(deadline)) => due > deadline,
        _ => false,
    }
}

/// Gate the open book, call the classifier on what remains and join results.
///
/// `open` and `features` must be index-aligned (as produced by
/// `build_features`). Classifier-judged orders come first, followed by the
/// forced ones, each group in input order.
pub fn predict_open_orders(
    source: &dyn PredictionSource,
    open: &[OpenOrder],
    features: &[FeatureRow],
    as_of: NaiveDate,
    config: &OpenOrderConfig,
) -> IrfResult<Vec<ScoredOrder>> {
    if open.is_empty() {
        return Err(IrfError::NoOpenOrders);
    }
    if open.len() != features.len() {
        return Err(IrfError::FeatureMismatch {
            orders: open.len(),
            features: features.len(),
        });
    }

    let (judged, forced): (Vec<usize>, Vec<usize>) =
        (0..open.len()).partition(|&i| within_tolerance(&open[i], as_of));

    log::info!(
        "Tolerance gate: {} orders to classifier '{}', {} forced late",
        judged.len(),
        source.name(),
        forced.len()
    );

    let mut scored = Vec::with_capacity(open.len());

    if !judged.is_empty() {
        let rows: Vec<FeatureRow> = judged.iter().map(|&i| features[i].clone()).collect();
        let results = source
            .predict(&rows)
            .map_err(IrfError::CollaboratorFailure)?;
        if results.len() != rows.len() {
            return Err(IrfError::PredictionMismatch {
                expected: rows.len(),
                actual: results.len(),
            });
        }
        for (index, (&i, result)) in judged.iter().zip(results).enumerate() {
            let order = &open[i];
            if result.order_ref != order.order_ref {
                return Err(IrfError::PredictionOrderMismatch {
                    index,
                    expected: order.order_ref.clone(),
                    actual: result.order_ref,
                });
            }
            scored.push(join(order, result.label, result.confidence, false));
        }
    }

    for &i in &forced {
        scored.push(join(
            &open[i],
            PredictionLabel::Late,
            config.forced_late_confidence,
            true,
        ));
    }

    Ok(scored)
}

fn join(order: &OpenOrder, label: PredictionLabel, confidence: f64, forced: bool) -> ScoredOrder {
    ScoredOrder {
        order_ref: order.order_ref.clone(),
        vendor_id: order.vendor_id.clone(),
        vendor_name: order.vendor_name.clone(),
        net_value: order.net_value,
        label,
        confidence,
        forced,
    }
}
