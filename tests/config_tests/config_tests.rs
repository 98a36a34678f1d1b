//! Tests for Config
//!
//! These tests verify:
//! - Defaults and builder overrides
//! - Partial deserialization falls back to defaults field by field
//! - A full serde round trip, including a pinned server version

use atlas_client::{Config, Version};
use serde::de::value::{Error as ValueError, MapDeserializer};
use serde::Deserialize;

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.server_addr, "127.0.0.1:6379");
    assert_eq!(config.connect_timeout_ms, 5000);
    assert_eq!(config.read_timeout_ms, 0);
    assert_eq!(config.write_timeout_ms, 5000);
    assert_eq!(config.default_db, 0);
    assert_eq!(config.server_version, None);
    assert!(config.negotiate_version);
    assert_eq!(Config::builder().build(), config);
}

// =============================================================================
// Serde Tests
// =============================================================================

#[test]
fn test_partial_text_fields_keep_defaults() {
    let pairs = vec![("server_addr", "10.0.0.5:7000")];
    let de: MapDeserializer<'_, _, ValueError> = MapDeserializer::new(pairs.into_iter());
    let config = Config::deserialize(de).unwrap();

    assert_eq!(config, Config::builder().server_addr("10.0.0.5:7000").build());
}

#[test]
fn test_partial_numeric_fields_keep_defaults() {
    let pairs = vec![("default_db", 3u64), ("read_timeout_ms", 250u64)];
    let de: MapDeserializer<'_, _, ValueError> = MapDeserializer::new(pairs.into_iter());
    let config = Config::deserialize(de).unwrap();

    let expected = Config::builder().default_db(3).read_timeout_ms(250).build();
    assert_eq!(config, expected);
    assert_eq!(config.server_addr, "127.0.0.1:6379");
    assert!(config.negotiate_version);
}

#[test]
fn test_empty_map_is_default() {
    let pairs: Vec<(&str, u64)> = Vec::new();
    let de: MapDeserializer<'_, _, ValueError> = MapDeserializer::new(pairs.into_iter());

    assert_eq!(Config::deserialize(de).unwrap(), Config::default());
}

#[test]
fn test_wrong_field_type_is_rejected() {
    let pairs = vec![("default_db", "three")];
    let de: MapDeserializer<'_, _, ValueError> = MapDeserializer::new(pairs.into_iter());

    assert!(Config::deserialize(de).is_err());
}

#[test]
fn test_binary_round_trip_with_pinned_version() {
    let config = Config::builder()
        .server_addr("db.internal:6380")
        .connect_timeout_ms(1500)
        .default_db(7)
        .server_version(Version::new(6, 2, 14))
        .negotiate_version(false)
        .build();

    let encoded = bincode::serialize(&config).unwrap();
    let decoded: Config = bincode::deserialize(&encoded).unwrap();

    assert_eq!(decoded, config);
    assert_eq!(decoded.server_version, Some(Version::new(6, 2, 14)));
}
