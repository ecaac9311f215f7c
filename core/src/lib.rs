//! Vendor delivery-risk index (IRF).
//!
//! Two pure computations form the core:
//!   - `load::estimate_loads`   concurrent-order load per order and vendor
//!   - `risk::aggregate_risk`   ranked composite risk per vendor
//!
//! `pipeline::RiskPipeline` wires them to an order book and an external
//! delay classifier (`prediction::PredictionSource`).

pub mod config;
pub mod error;
pub mod features;
pub mod load;
pub mod order;
pub mod pipeline;
pub mod prediction;
pub mod risk;
pub mod rng;
pub mod store;
pub mod synth;
pub mod types;

pub use load::estimate_loads;
pub use risk::aggregate_risk;
