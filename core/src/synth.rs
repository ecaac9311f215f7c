//! Synthetic order books for demos and tests.
//!
//! Same seed and parameters always produce the same book and the same
//! stand-in predictions. Vendor reliability drives both the delivered
//! history and the stand-in classifier, so unreliable vendors rank high.

use crate::{
    order::{OrderBook, OrderRow},
    prediction::{PredictionLabel, PredictionResult, StaticPredictions},
    rng::{RngBank, StreamRng, StreamSlot},
};
use chrono::{Duration, NaiveDate};

#[derive(Debug, Clone)]
pub struct SynthParams {
    pub vendors: usize,
    pub max_delivered_per_vendor: u64,
    pub max_open_per_vendor: u64,
    /// Share of open lines generated with a zero net value.
    pub zero_value_rate: f64,
    pub as_of: NaiveDate,
}

impl SynthParams {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            vendors: 12,
            max_delivered_per_vendor: 40,
            max_open_per_vendor: 15,
            zero_value_rate: 0.02,
            as_of,
        }
    }
}

#[derive(Debug, Clone)]
struct VendorProfile {
    vendor_id: String,
    vendor_name: String,
    reliability: f64,
    lead_days: i64,
}

pub struct SyntheticBook {
    pub book: OrderBook,
    pub predictions: StaticPredictions,
}

pub fn generate(seed: u64, params: &SynthParams) -> SyntheticBook {
    let bank = RngBank::new(seed);
    let mut vendor_rng = bank.for_stream(StreamSlot::Vendors);
    let mut delivered_rng = bank.for_stream(StreamSlot::DeliveredOrders);
    let mut open_rng = bank.for_stream(StreamSlot::OpenOrders);
    let mut prediction_rng = bank.for_stream(StreamSlot::Predictions);

    let vendors: Vec<VendorProfile> = (0..params.vendors)
        .map(|i| vendor_profile(i, &mut vendor_rng))
        .collect();

    let mut rows = Vec::new();
    let mut results = Vec::new();
    let mut po = 4_500_000_000u64;

    for vendor in &vendors {
        let delivered = 1 + delivered_rng.next_u64_below(params.max_delivered_per_vendor.max(1));
        for _ in 0..delivered {
            po += 1;
            rows.push(delivered_row(po, vendor, params.as_of, &mut delivered_rng));
        }

        let open = open_rng.next_u64_below(params.max_open_per_vendor + 1);
        for _ in 0..open {
            po += 1;
            let row = open_row(po, vendor, params, &mut open_rng);
            let label = if prediction_rng.chance(vendor.reliability) {
                PredictionLabel::OnTime
            } else {
                PredictionLabel::Late
            };
            results.push(PredictionResult {
                order_ref: row.order_ref(),
                label,
                confidence: prediction_rng.uniform(0.5, 1.0),
            });
            rows.push(row);
        }
    }

    log::debug!(
        "Synthetic book (seed {seed}): {} lines, {} vendors",
        rows.len(),
        vendors.len()
    );

    SyntheticBook {
        book: OrderBook::new(rows),
        predictions: StaticPredictions::new(results),
    }
}

fn vendor_profile(index: usize, rng: &mut StreamRng) -> VendorProfile {
    let stem = VENDOR_STEMS[rng.next_u64_below(VENDOR_STEMS.len() as u64) as usize];
    let suffix = VENDOR_SUFFIXES[rng.next_u64_below(VENDOR_SUFFIXES.len() as u64) as usize];
    VendorProfile {
        vendor_id: format!("{:010}", 100_000 + index),
        vendor_name: format!("{stem} {suffix}"),
        reliability: rng.uniform(0.35, 0.97),
        lead_days: 7 + rng.next_u64_below(84) as i64,
    }
}

fn delivered_row(po: u64, vendor: &VendorProfile, as_of: NaiveDate, rng: &mut StreamRng) -> OrderRow {
    let placed_at = as_of - Duration::days(30 + rng.next_u64_below(690) as i64);
    let due_at = placed_at + Duration::days(vendor.lead_days);
    let slip = if rng.chance(vendor.reliability) {
        -(rng.next_u64_below(5) as i64)
    } else {
        1 + rng.next_u64_below(30) as i64
    };
    let delivered_at = due_at + Duration::days(slip);
    OrderRow {
        po_number: po.to_string(),
        item: 10,
        vendor_id: Some(vendor.vendor_id.clone()),
        vendor_name: Some(vendor.vendor_name.clone()),
        material_group: Some(material_group(rng)),
        placed_at: Some(placed_at),
        due_at: Some(due_at),
        net_value: Some(round_cents(rng.pareto(150.0, 1.6))),
        delivered_at: Some(delivered_at),
        goods_receipt_at: Some(delivered_at),
        delivery_tolerance_days: Some(rng.next_u64_below(6) as i64),
    }
}

fn open_row(po: u64, vendor: &VendorProfile, params: &SynthParams, rng: &mut StreamRng) -> OrderRow {
    let placed_at = params.as_of - Duration::days(rng.next_u64_below(120) as i64);
    let due_at = placed_at + Duration::days(vendor.lead_days);
    let net_value = if rng.chance(params.zero_value_rate) {
        0.0
    } else {
        round_cents(rng.pareto(150.0, 1.6))
    };
    OrderRow {
        po_number: po.to_string(),
        item: 10,
        vendor_id: Some(vendor.vendor_id.clone()),
        vendor_name: Some(vendor.vendor_name.clone()),
        material_group: Some(material_group(rng)),
        placed_at: Some(placed_at),
        due_at: Some(due_at),
        net_value: Some(net_value),
        delivered_at: None,
        goods_receipt_at: None,
        delivery_tolerance_days: Some(rng.next_u64_below(6) as i64),
    }
}

fn material_group(rng: &mut StreamRng) -> String {
    MATERIAL_GROUPS[rng.next_u64_below(MATERIAL_GROUPS.len() as u64) as usize].to_string()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

const VENDOR_STEMS: &[&str] = &[
    "Atlas", "Boreal", "Cobalt", "Delta", "Ember", "Falcon", "Granite", "Harbor",
    "Ionic", "Juniper", "Keystone", "Lumen", "Meridian", "Northway", "Orion", "Pioneer",
];

const VENDOR_SUFFIXES: &[&str] = &[
    "Industrial", "Components", "Metals", "Logistics", "Supply", "Fasteners", "Machining",
];

const MATERIAL_GROUPS: &[&str] = &["M100", "M200", "M310", "M420", "S900"];
