use devents_domain::config::SubscriptionOverrides;
use serde_json::json;

#[test]
fn overrides_default_to_unset() {
    let overrides = SubscriptionOverrides::default();
    assert!(overrides.product().is_none());
    assert!(overrides.access_key_id().is_none());
    assert!(overrides.secret_access_key().is_none());
    assert!(overrides.region().is_none());
    assert!(overrides.bucket().is_none());
}

#[test]
fn overrides_deserialize_from_flat_keys() {
    let raw = json!({
        "product": "business",
        "gems_s3_access_key_id": "AKIA",
        "gems_s3_secret_access_key": "shh",
        "gems_s3_region": "us-east-1",
        "gems_s3_bucket": "custom-bucket"
    });

    let overrides: SubscriptionOverrides = serde_json::from_value(raw).expect("overrides deserialize");
    assert_eq!(overrides.product(), Some("business"));
    assert_eq!(overrides.access_key_id(), Some("AKIA"));
    assert_eq!(overrides.secret_access_key(), Some("shh"));
    assert_eq!(overrides.region(), Some("us-east-1"));
    assert_eq!(overrides.bucket(), Some("custom-bucket"));
}

#[test]
fn blank_values_count_as_unset() {
    let raw = json!({ "product": "", "gems_s3_bucket": "   " });
    let overrides: SubscriptionOverrides = serde_json::from_value(raw).expect("overrides deserialize");
    assert!(overrides.product().is_none());
    assert!(overrides.bucket().is_none());
}

#[test]
fn debug_redacts_secret() {
    let overrides = SubscriptionOverrides {
        gems_s3_secret_access_key: Some("top-secret".to_owned()),
        ..SubscriptionOverrides::default()
    };
    let rendered = format!("{overrides:?}");
    assert!(!rendered.contains("top-secret"));
    assert!(rendered.contains("***"));
}
