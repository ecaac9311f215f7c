//! Purchase-order lines as supplied by the tabular collaborator.
//!
//! Rows arrive already typed (dates parsed, numerics parsed). This module
//! only validates required fields and splits the book into the historically
//! delivered subset (load estimation) and the currently open subset
//! (prediction and scoring).

use crate::{
    error::{IrfError, IrfResult},
    types::{OrderRef, VendorId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One purchase-order line. Optional fields mirror columns that may be blank
/// in the source export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub po_number: String,
    #[serde(default)]
    pub item: u32,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub material_group: Option<String>,
    #[serde(default)]
    pub placed_at: Option<NaiveDate>,
    #[serde(default)]
    pub due_at: Option<NaiveDate>,
    #[serde(default)]
    pub net_value: Option<f64>,
    #[serde(default)]
    pub delivered_at: Option<NaiveDate>,
    #[serde(default)]
    pub goods_receipt_at: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_tolerance_days: Option<i64>,
}

impl OrderRow {
    pub fn order_ref(&self) -> OrderRef {
        format!("{}/{}", self.po_number, self.item)
    }

    /// A delivery date marks the line as historically closed.
    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }

    /// Lines without a goods receipt are still open.
    pub fn is_open(&self) -> bool {
        self.goods_receipt_at.is_none()
    }

    fn require_vendor(&self) -> IrfResult<VendorId> {
        self.vendor_id.clone().ok_or_else(|| IrfError::MissingColumn {
            record: self.order_ref(),
            field: "vendor_id",
        })
    }

    fn require_date(&self, value: Option<NaiveDate>, field: &'static str) -> IrfResult<NaiveDate> {
        value.ok_or_else(|| IrfError::NullDate {
            record: self.order_ref(),
            field,
        })
    }
}

/// Input record for the load estimator. Both dates are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInterval {
    pub order_ref: OrderRef,
    pub vendor_id: VendorId,
    pub placed_at: NaiveDate,
    pub due_at: NaiveDate,
}

impl TryFrom<&OrderRow> for OrderInterval {
    type Error = IrfError;

    fn try_from(row: &OrderRow) -> IrfResult<Self> {
        Ok(Self {
            order_ref: row.order_ref(),
            vendor_id: row.require_vendor()?,
            placed_at: row.require_date(row.placed_at, "placed_at")?,
            due_at: row.require_date(row.due_at, "due_at")?,
        })
    }
}

/// A validated open line ready for feature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub order_ref: OrderRef,
    pub vendor_id: VendorId,
    pub vendor_name: Option<String>,
    pub material_group: Option<String>,
    pub placed_at: NaiveDate,
    /// Open lines may lack a due date; the tolerance gate treats them as late.
    pub due_at: Option<NaiveDate>,
    pub net_value: f64,
    /// Blank tolerance means the order cannot be judged and is forced late.
    pub delivery_tolerance_days: Option<i64>,
}

impl TryFrom<&OrderRow> for OpenOrder {
    type Error = IrfError;

    fn try_from(row: &OrderRow) -> IrfResult<Self> {
        let net_value = row.net_value.ok_or_else(|| IrfError::MissingColumn {
            record: row.order_ref(),
            field: "net_value",
        })?;
        Ok(Self {
            order_ref: row.order_ref(),
            vendor_id: row.require_vendor()?,
            vendor_name: row.vendor_name.clone(),
            material_group: row.material_group.clone(),
            placed_at: row.require_date(row.placed_at, "placed_at")?,
            due_at: row.due_at,
            net_value,
            delivery_tolerance_days: row.delivery_tolerance_days,
        })
    }
}

/// The full export: delivered and open lines mixed together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    pub rows: Vec<OrderRow>,
}

impl OrderBook {
    pub fn new(rows: Vec<OrderRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Intervals for every historically delivered line.
    /// A delivered line with a missing date is an error, not a skip.
    pub fn closed_intervals(&self) -> IrfResult<Vec<OrderInterval>> {
        self.rows
            .iter()
            .filter(|r| r.is_delivered())
            .map(OrderInterval::try_from)
            .collect()
    }

    /// Lines still awaiting goods receipt, optionally without zero-value lines.
    pub fn open_orders(&self, drop_zero_value: bool) -> IrfResult<Vec<OpenOrder>> {
        let mut open = Vec::new();
        let mut dropped = 0usize;
        for row in self.rows.iter().filter(|r| r.is_open()) {
            let order = OpenOrder::try_from(row)?;
            if drop_zero_value && order.net_value == 0.0 {
                dropped += 1;
                continue;
            }
            open.push(order);
        }
        if dropped > 0 {
            log::debug!("Dropped {dropped} open lines with zero net value");
        }
        Ok(open)
    }
}
