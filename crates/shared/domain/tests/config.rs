use cwatch_domain::config::{ApiConfig, DatasetConfig, ProfilerConfig, ServerConfig};
use serde_json::json;
use std::path::PathBuf;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 3000);
    assert!(server.address.is_unspecified());

    assert_eq!(DatasetConfig::default().size, 10_000);

    let profiler = ProfilerConfig::default();
    assert!(profiler.enabled);
    assert_eq!(profiler.frequency, 1000);
    assert_eq!(profiler.output_dir, PathBuf::from("."));
    assert!(profiler.blocklist.iter().any(|lib| lib == "vdso"));
}

#[test]
fn api_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "127.0.0.1", "port": 8080 },
        "profiler": { "enabled": false, "output_dir": "/tmp/profiles" },
        "logging": { "filter": "cwatch=debug" }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.shutdown_timeout_secs, 10);
    assert_eq!(cfg.dataset.size, 10_000);
    assert!(!cfg.profiler.enabled);
    assert_eq!(cfg.profiler.output_dir, PathBuf::from("/tmp/profiles"));
    assert_eq!(cfg.logging.filter.as_deref(), Some("cwatch=debug"));
    assert!(cfg.logging.directory.is_none());
}

#[test]
fn api_config_mutation_does_not_leak_into_clones() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 4000;

    assert_eq!(original.server.port, 3000);
    assert_eq!(changed.server.port, 4000);
}
