//! Shared primitive types used across the entire crate.

/// A supplier identifier (SAP vendor number). Not unique per order.
pub type VendorId = String;

/// Stable reference to one purchase-order line, e.g. `4500012345/10`.
pub type OrderRef = String;

/// The canonical run identifier.
pub type RunId = String;
