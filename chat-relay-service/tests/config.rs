//! Configuration loading tests.
//!
//! Kept in a single test fn: the assertions mutate process environment
//! variables and must run sequentially.

use chat_relay_service::config::RelayConfig;

#[test]
fn api_key_is_required_and_defaults_are_applied() {
    std::env::set_var("RELAY__PORT", "0");
    std::env::remove_var("GOOGLE_API_KEY");

    // Without the credential the service must refuse to start.
    assert!(RelayConfig::load().is_err());

    std::env::set_var("GOOGLE_API_KEY", "test-api-key");
    let config = RelayConfig::load().expect("Failed to load config");

    assert_eq!(config.listen.port, 0);
    assert_eq!(config.listen.socket_addr().to_string(), "0.0.0.0:0");
    assert_eq!(config.google.api_key, "test-api-key");
    assert_eq!(config.model.name, "gemini-2.0-flash");
    assert_eq!(
        config.model.system_instruction,
        "Respond in at most 150 characters."
    );
    assert_eq!(config.request_timeout.as_secs(), 30);

    // Environment overrides take effect.
    std::env::set_var("RELAY_TEXT_MODEL", "gemini-2.0-flash-lite");
    std::env::set_var("RELAY_REQUEST_TIMEOUT_SECS", "5");
    let config = RelayConfig::load().expect("Failed to load config");
    assert_eq!(config.model.name, "gemini-2.0-flash-lite");
    assert_eq!(config.request_timeout.as_secs(), 5);

    // A timeout that is not an integer is a startup error, not a silent
    // fallback to the default.
    std::env::set_var("RELAY_REQUEST_TIMEOUT_SECS", "soon");
    assert!(RelayConfig::load().is_err());

    std::env::remove_var("RELAY_TEXT_MODEL");
    std::env::remove_var("RELAY_REQUEST_TIMEOUT_SECS");
}
