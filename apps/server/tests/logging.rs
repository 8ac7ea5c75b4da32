use cwatch::domain::config::LoggingConfig;
use cwatch_logger::LoggerError;
use cwatch_server::init_logger;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn logging_section_drives_json_files_and_installs_once() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");
    let cfg = LoggingConfig {
        filter: Some("info".to_owned()),
        directory: Some(log_dir.clone()),
        json: true,
    };

    let logger = init_logger(&cfg)?;
    assert!(logger.writes_files());

    tracing::debug!("filtered out");
    tracing::info!(port = 3000, "Server started");

    let err = init_logger(&LoggingConfig::default()).expect_err("subscriber is already installed");
    assert!(matches!(err, LoggerError::Subscriber { .. }), "{err}");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            name.starts_with("cwatch-server") && name.ends_with(".log")
        })
        .expect("rolling file named after the binary");

    let contents = fs::read_to_string(&log_file)?;
    let records: Vec<serde_json::Value> =
        contents.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
    assert!(records.iter().all(|r| r["fields"]["message"] != "filtered out"));
    let started = records
        .iter()
        .find(|r| r["fields"]["message"] == "Server started")
        .expect("info record written");
    assert_eq!(started["fields"]["port"], 3000);

    Ok(())
}
