//! Offline tests for vizpulse-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use vizpulse_core::{AppConfig, Environment, SocialChannel};
use vizpulse_db::{PoolConfig, SocialChannelRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`SocialChannelRow`] has all expected
/// fields with the correct types and maps onto the domain type.
#[test]
fn social_channel_row_has_expected_fields() {
    let row = SocialChannelRow {
        id: 3_i64,
        place_id: "ChIJ-florist".to_string(),
        network: "facebook".to_string(),
        enabled: false,
        followers: 1_500_i64,
        engagement_rate: 0.9_f64,
        posts_7d: 2_i32,
        streak_weeks: 1_i32,
        updated_at: chrono::Utc::now(),
    };

    let channel = SocialChannel::from(row);
    assert_eq!(channel.network, "facebook");
    assert!(!channel.enabled);
    assert_eq!(channel.followers, 1_500);
}
