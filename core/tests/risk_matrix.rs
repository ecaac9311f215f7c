//! Vendor risk matrix tests: formula, load ratio, ranking, determinism.

use irf_core::{
    aggregate_risk,
    config::RiskConfig,
    load::VendorLoads,
    prediction::{PredictionLabel, ScoredOrder},
    risk::load_ratio,
};

fn scored(r: &str, vendor: &str, name: Option<&str>, value: f64, label: PredictionLabel, conf: f64) -> ScoredOrder {
    ScoredOrder {
        order_ref: r.to_string(),
        vendor_id: vendor.to_string(),
        vendor_name: name.map(str::to_string),
        net_value: value,
        label,
        confidence: conf,
        forced: false,
    }
}

fn on_time(r: &str, vendor: &str, value: f64, conf: f64) -> ScoredOrder {
    scored(r, vendor, Some("Vendor"), value, PredictionLabel::OnTime, conf)
}

fn late(r: &str, vendor: &str, value: f64, conf: f64) -> ScoredOrder {
    scored(r, vendor, Some("Vendor"), value, PredictionLabel::Late, conf)
}

/// Worked example: three orders, two on time, no load history.
#[test]
fn worked_example_matches_formula() {
    let orders = vec![
        on_time("1", "V", 100.0, 0.9),
        on_time("2", "V", 200.0, 0.8),
        late("3", "V", 300.0, 0.6),
    ];
    let rows = aggregate_risk(&orders, &VendorLoads::new(), &RiskConfig::default());
    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    assert_eq!(row.rank, 1);
    assert_eq!(row.orders_on_time, 2);
    assert_eq!(row.orders_late, 1);
    assert_eq!(row.orders_total, 3);
    assert_eq!(row.value_total, 600.0);
    assert_eq!(row.value_on_time, 300.0);
    assert_eq!(row.value_late, 300.0);
    assert_eq!(row.rate_value, 0.5);
    assert_eq!(row.rate_on_time, 0.67);
    assert_eq!(row.mean_confidence, 0.77);
    assert_eq!(row.load_ratio, 1.0);
    assert_eq!(row.mean_load, 0);
    assert!(
        (74.43..=74.45).contains(&row.risk_index),
        "risk_index {} outside expected band",
        row.risk_index
    );
}

/// mean_load 5 with 12 open orders clamps to 1.5.
#[test]
fn load_ratio_clamps_high() {
    let config = RiskConfig::default();
    assert_eq!(load_ratio(12, Some(5), &config), 1.5);
    assert_eq!(load_ratio(4, Some(5), &config), 1.0);
    assert_eq!(load_ratio(6, Some(5), &config), 1.2);
}

/// No history or thin history means no load penalty.
#[test]
fn load_ratio_is_one_for_low_or_missing_load() {
    let config = RiskConfig::default();
    assert_eq!(load_ratio(50, None, &config), 1.0);
    assert_eq!(load_ratio(50, Some(2), &config), 1.0);
    assert_eq!(load_ratio(50, Some(0), &config), 1.0);
    assert_eq!(load_ratio(50, Some(-1), &config), 1.0);
}

/// An overloaded vendor scores riskier than the same vendor at its norm.
#[test]
fn overload_raises_risk() {
    let orders: Vec<_> = (0..12)
        .map(|i| on_time(&i.to_string(), "V", 100.0, 0.9))
        .collect();
    let config = RiskConfig::default();

    let mut normal = VendorLoads::new();
    normal.insert("V".into(), 12);
    let mut busy = VendorLoads::new();
    busy.insert("V".into(), 5);

    let at_norm = &aggregate_risk(&orders, &normal, &config)[0];
    let overloaded = &aggregate_risk(&orders, &busy, &config)[0];

    assert_eq!(at_norm.load_ratio, 1.0);
    assert_eq!(overloaded.load_ratio, 1.5);
    assert_eq!(overloaded.mean_load, 5);
    assert!(overloaded.risk_index > at_norm.risk_index);
    assert_eq!(at_norm.risk_index, 10.0);
    assert_eq!(overloaded.risk_index, 40.0);
}

/// Zero total value resolves rate_value to 0 (maximum risk), not NaN.
#[test]
fn zero_value_vendor_is_well_defined() {
    let orders = vec![on_time("1", "V", 0.0, 0.9), on_time("2", "V", 0.0, 0.7)];
    let row = &aggregate_risk(&orders, &VendorLoads::new(), &RiskConfig::default())[0];
    assert_eq!(row.rate_value, 0.0);
    assert_eq!(row.risk_index, 100.0);
    assert!(row.risk_index.is_finite());
}

/// Ranks are 1..K with risk non-increasing; load_ratio within bounds.
#[test]
fn ranks_are_a_permutation_sorted_by_risk() {
    let mut orders = Vec::new();
    for v in 0..9 {
        let vendor = format!("V{v}");
        for i in 0..(v + 1) {
            let r = format!("{vendor}-{i}");
            if i % 3 == v % 3 {
                orders.push(late(&r, &vendor, 50.0 + i as f64, 0.6));
            } else {
                orders.push(on_time(&r, &vendor, 100.0 * (i + 1) as f64, 0.95));
            }
        }
    }
    let mut loads = VendorLoads::new();
    loads.insert("V5".into(), 3);
    loads.insert("V8".into(), 4);

    let rows = aggregate_risk(&orders, &loads, &RiskConfig::default());
    assert_eq!(rows.len(), 9);

    let mut ranks: Vec<usize> = rows.iter().map(|r| r.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=9).collect::<Vec<_>>());

    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.rank, i + 1, "rows must be returned in rank order");
        assert!(
            (1.0..=1.5).contains(&row.load_ratio),
            "load_ratio out of range: {}",
            row.load_ratio
        );
    }
    for pair in rows.windows(2) {
        assert!(pair[0].risk_index >= pair[1].risk_index);
    }
}

/// Exact ties keep ascending vendor id order.
#[test]
fn ties_keep_vendor_order() {
    let orders = vec![
        on_time("1", "C", 100.0, 0.8),
        on_time("2", "A", 100.0, 0.8),
        on_time("3", "B", 100.0, 0.8),
    ];
    let rows = aggregate_risk(&orders, &VendorLoads::new(), &RiskConfig::default());
    let ids: Vec<&str> = rows.iter().map(|r| r.vendor_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert!(rows.iter().all(|r| r.risk_index == 20.0));
}

/// The first non-blank name seen for a vendor wins.
#[test]
fn vendor_name_is_first_non_blank() {
    let orders = vec![
        scored("1", "V", None, 10.0, PredictionLabel::OnTime, 0.9),
        scored("2", "V", Some("Acme"), 10.0, PredictionLabel::OnTime, 0.9),
        scored("3", "V", Some("Acme Renamed"), 10.0, PredictionLabel::OnTime, 0.9),
        scored("4", "W", Some("First"), 10.0, PredictionLabel::Late, 0.9),
        scored("5", "W", Some("Second"), 10.0, PredictionLabel::Late, 0.9),
        scored("6", "X", None, 10.0, PredictionLabel::Late, 0.9),
    ];
    let rows = aggregate_risk(&orders, &VendorLoads::new(), &RiskConfig::default());
    let name = |id: &str| {
        rows.iter()
            .find(|r| r.vendor_id == id)
            .unwrap()
            .vendor_name
            .clone()
    };
    assert_eq!(name("V").as_deref(), Some("Acme"));
    assert_eq!(name("W").as_deref(), Some("First"));
    assert_eq!(name("X"), None);
}

/// Same inputs, identical output.
#[test]
fn aggregation_is_deterministic() {
    let orders = vec![
        on_time("1", "V1", 120.5, 0.91),
        late("2", "V1", 80.0, 0.55),
        late("3", "V2", 999.99, 0.73),
        on_time("4", "V3", 10.0, 0.62),
    ];
    let mut loads = VendorLoads::new();
    loads.insert("V1".into(), 3);
    let config = RiskConfig::default();

    let a = aggregate_risk(&orders, &loads, &config);
    let b = aggregate_risk(&orders, &loads, &config);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn empty_predictions_give_empty_matrix() {
    let rows = aggregate_risk(&[], &VendorLoads::new(), &RiskConfig::default());
    assert!(rows.is_empty());
}
