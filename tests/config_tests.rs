// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use framebooth::{Config, FacingMode};

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(
        config.mirror_front_capture, true,
        "Front captures should be mirror-corrected by default"
    );
    assert_eq!(
        config.default_facing,
        FacingMode::Front,
        "The selfie camera is the default"
    );
    assert!(
        config.upload_endpoint.is_none(),
        "No gallery endpoint unless configured"
    );
}

#[test]
fn test_config_share_strings() {
    let config = Config::default();
    assert!(!config.share_title.is_empty());
    assert!(!config.share_text.is_empty());
}

#[test]
fn test_config_round_trips_through_json() {
    let mut config = Config::default();
    config.upload_endpoint = Some("http://gallery.example/upload.php".to_string());
    config.default_facing = FacingMode::Back;

    let json = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_config_unknown_fields_fall_back_to_defaults() {
    // a partial file keeps working
    let parsed: Config = serde_json::from_str(r#"{"default_facing":"Back"}"#).unwrap();
    assert_eq!(parsed.default_facing, FacingMode::Back);
    assert!(parsed.mirror_front_capture);
}
