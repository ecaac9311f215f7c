use crate::error::{IrfError, IrfResult};
use serde::{Deserialize, Serialize};

// ── Risk matrix ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Vendors whose historical mean load is at or below this value get no
    /// load penalty.
    pub low_load_threshold: i64,
    /// Upper clamp for `orders_total / mean_load`.
    pub max_load_ratio: f64,
    /// Decimal places kept on every reported float.
    pub display_decimals: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            low_load_threshold: 2,
            max_load_ratio: 1.5,
            display_decimals: 2,
        }
    }
}

// ── Open-order preparation ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrderConfig {
    /// Drop open lines whose net value is exactly zero.
    pub drop_zero_value: bool,
    /// Confidence attached to orders forced `Late` by the tolerance gate.
    pub forced_late_confidence: f64,
}

impl Default for OpenOrderConfig {
    fn default() -> Self {
        Self {
            drop_zero_value: true,
            forced_late_confidence: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IrfConfig {
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub open_orders: OpenOrderConfig,
}

impl IrfConfig {
    /// Load from `<data_dir>/irf_config.json`.
    /// In tests, use `IrfConfig::default()`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/irf_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: IrfConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> IrfResult<()> {
        if !(self.risk.max_load_ratio >= 1.0) {
            return Err(IrfError::Config(format!(
                "risk.max_load_ratio must be >= 1.0, got {}",
                self.risk.max_load_ratio
            )));
        }
        if self.risk.low_load_threshold < 0 {
            return Err(IrfError::Config(format!(
                "risk.low_load_threshold must be non-negative, got {}",
                self.risk.low_load_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.open_orders.forced_late_confidence) {
            return Err(IrfError::Config(format!(
                "open_orders.forced_late_confidence must be in [0, 1], got {}",
                self.open_orders.forced_late_confidence
            )));
        }
        Ok(())
    }
}
