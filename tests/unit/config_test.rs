//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use prometheus_waiting_list::config::{ResourceTypeConfig, WaitingListConfig};

#[test]
fn test_default_config_is_valid() {
    let config = WaitingListConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.offer_ttl(), Duration::from_secs(30 * 60));
    assert_eq!(config.max_conflict_retries, 3);
    assert_eq!(config.sweep_interval(), None);
}

#[test]
fn test_invalid_offer_ttl() {
    let invalid = WaitingListConfig::default().with_offer_ttl_secs(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_invalid_sweep_interval() {
    let invalid = WaitingListConfig::default().with_sweep_interval_secs(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_invalid_resource_type_ttl() {
    let invalid = WaitingListConfig::default().with_resource_type("vip", 0);
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("vip"));
}

#[test]
fn test_offer_ttl_for_resource_type() {
    let config = WaitingListConfig::default().with_resource_type("flash-sale", 120);
    assert_eq!(
        config.offer_ttl_for(Some("flash-sale")),
        Duration::from_secs(120)
    );
    assert_eq!(config.offer_ttl_for(Some("concert")), config.offer_ttl());
    assert_eq!(config.offer_ttl_for(None), config.offer_ttl());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "offer_ttl_secs": 600,
        "sweep_interval_secs": 30,
        "resource_overrides": {
            "vip": { "offer_ttl_secs": 300 }
        }
    }"#;

    let config = WaitingListConfig::from_json_str(json).unwrap();
    assert_eq!(config.offer_ttl_secs, 600);
    assert_eq!(config.max_conflict_retries, 3);
    assert_eq!(config.sweep_interval(), Some(Duration::from_secs(30)));
    assert_eq!(
        config.resource_overrides.get("vip"),
        Some(&ResourceTypeConfig { offer_ttl_secs: 300 })
    );
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(WaitingListConfig::from_json_str(r#"{"offer_ttl_secs": 0}"#).is_err());
    let err = WaitingListConfig::from_json_str("not json").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_config_from_lookup() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("WAITING_LIST_OFFER_TTL_SECS", "900"),
        ("WAITING_LIST_MAX_CONFLICT_RETRIES", " 5 "),
        ("WAITING_LIST_SWEEP_INTERVAL_SECS", "15"),
    ]);
    let config =
        WaitingListConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();

    assert_eq!(config.offer_ttl_secs, 900);
    assert_eq!(config.max_conflict_retries, 5);
    assert_eq!(config.sweep_interval_secs, Some(15));
}

#[test]
fn test_config_from_lookup_defaults_and_errors() {
    let config = WaitingListConfig::from_lookup(|_| None).unwrap();
    assert_eq!(config, WaitingListConfig::default());

    let err = WaitingListConfig::from_lookup(|key| {
        (key == "WAITING_LIST_OFFER_TTL_SECS").then(|| "soon".to_string())
    })
    .unwrap_err();
    assert!(err.contains("WAITING_LIST_OFFER_TTL_SECS"));
}
