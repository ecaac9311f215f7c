//! End-to-end run: order book in, ranked vendor matrix out.
//!
//! ORDER (fixed):
//!   1. Delivered lines  -> concurrent load -> per-vendor mean load
//!   2. Open lines       -> features
//!   3. Features         -> tolerance gate -> classifier
//!   4. Scored orders    -> vendor risk matrix
//!
//! Each run is a fresh computation over the supplied book; nothing is kept
//! between runs.

use crate::{
    config::IrfConfig,
    error::{IrfError, IrfResult},
    features::build_features,
    load::{estimate_loads, VendorLoads},
    order::OrderBook,
    prediction::{predict_open_orders, PredictionSource, ScoredOrder},
    risk::{aggregate_risk, VendorRiskRow},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub as_of: NaiveDate,
    pub vendor_loads: VendorLoads,
    /// Rank-sorted vendor matrix.
    pub vendors: Vec<VendorRiskRow>,
    /// Every scored open order, classifier-judged first.
    pub orders: Vec<ScoredOrder>,
}

impl RiskReport {
    pub fn forced_late_count(&self) -> usize {
        self.orders.iter().filter(|o| o.forced).count()
    }
}

pub struct RiskPipeline {
    config: IrfConfig,
}

impl RiskPipeline {
    pub fn new(config: IrfConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        book: &OrderBook,
        source: &dyn PredictionSource,
        as_of: NaiveDate,
    ) -> IrfResult<RiskReport> {
        log::info!("Scoring order book of {} lines as of {as_of}", book.len());

        let closed = book.closed_intervals()?;
        if closed.is_empty() {
            return Err(IrfError::NoClosedOrders);
        }
        let vendor_loads = estimate_loads(&closed).per_vendor;
        log::info!(
            "Vendor load estimated from {} delivered lines ({} vendors)",
            closed.len(),
            vendor_loads.len()
        );

        let open = book.open_orders(self.config.open_orders.drop_zero_value)?;
        let features = build_features(&open, as_of);
        let orders = predict_open_orders(
            source,
            &open,
            &features,
            as_of,
            &self.config.open_orders,
        )?;

        let vendors = aggregate_risk(&orders, &vendor_loads, &self.config.risk);

        Ok(RiskReport {
            as_of,
            vendor_loads,
            vendors,
            orders,
        })
    }
}
