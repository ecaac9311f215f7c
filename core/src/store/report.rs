//! Store methods for finished risk reports.

use crate::{error::IrfResult, pipeline::RiskReport, risk::VendorRiskRow};
use rusqlite::params;

use super::IrfStore;

impl IrfStore {
    /// Persist vendor loads, the ranked matrix and every scored order of a
    /// run in one transaction.
    pub fn save_report(&self, run_id: &str, report: &RiskReport) -> IrfResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        for (vendor_id, mean_load) in &report.vendor_loads {
            tx.execute(
                "INSERT INTO vendor_load (run_id, vendor_id, mean_load) VALUES (?1, ?2, ?3)",
                params![run_id, vendor_id, mean_load],
            )?;
        }

        for row in &report.vendors {
            tx.execute(
                "INSERT INTO vendor_risk (
                    run_id, rank, vendor_id, vendor_name,
                    orders_on_time, orders_late, rate_on_time, orders_total,
                    mean_load, load_ratio, value_total, value_on_time, value_late,
                    rate_value, mean_confidence, risk_index
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    run_id,
                    row.rank as i64,
                    row.vendor_id,
                    row.vendor_name,
                    row.orders_on_time,
                    row.orders_late,
                    row.rate_on_time,
                    row.orders_total,
                    row.mean_load,
                    row.load_ratio,
                    row.value_total,
                    row.value_on_time,
                    row.value_late,
                    row.rate_value,
                    row.mean_confidence,
                    row.risk_index,
                ],
            )?;
        }

        for order in &report.orders {
            tx.execute(
                "INSERT INTO order_prediction (
                    run_id, order_ref, vendor_id, vendor_name,
                    net_value, label, confidence, forced
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    run_id,
                    order.order_ref,
                    order.vendor_id,
                    order.vendor_name,
                    order.net_value,
                    order.label.as_str(),
                    order.confidence,
                    if order.forced { 1i64 } else { 0i64 },
                ],
            )?;
        }

        tx.commit()?;
        log::debug!(
            "Saved run {run_id}: {} vendors, {} orders",
            report.vendors.len(),
            report.orders.len()
        );
        Ok(())
    }

    /// The ranked matrix of a run, rank ascending.
    pub fn vendor_rows(&self, run_id: &str) -> IrfResult<Vec<VendorRiskRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT rank, vendor_name, vendor_id, orders_on_time, orders_late,
                    rate_on_time, orders_total, mean_load, load_ratio,
                    value_total, value_on_time, value_late, rate_value,
                    mean_confidence, risk_index
             FROM vendor_risk WHERE run_id = ?1
             ORDER BY rank ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok(VendorRiskRow {
                    rank: row.get::<_, i64>(0)? as usize,
                    vendor_name: row.get(1)?,
                    vendor_id: row.get(2)?,
                    orders_on_time: row.get(3)?,
                    orders_late: row.get(4)?,
                    rate_on_time: row.get(5)?,
                    orders_total: row.get(6)?,
                    mean_load: row.get(7)?,
                    load_ratio: row.get(8)?,
                    value_total: row.get(9)?,
                    value_on_time: row.get(10)?,
                    value_late: row.get(11)?,
                    rate_value: row.get(12)?,
                    mean_confidence: row.get(13)?,
                    risk_index: row.get(14)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Historical mean load per vendor for a run, vendor id ascending.
    pub fn vendor_load_rows(&self, run_id: &str) -> IrfResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT vendor_id, mean_load FROM vendor_load
             WHERE run_id = ?1 ORDER BY vendor_id ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Test / summary helpers ────────────────────────────────────────

    /// Number of scored orders persisted for a run.
    pub fn order_prediction_count(&self, run_id: &str) -> IrfResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM order_prediction WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of orders the tolerance gate forced late in a run.
    pub fn forced_late_count(&self, run_id: &str) -> IrfResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM order_prediction WHERE run_id = ?1 AND forced = 1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
