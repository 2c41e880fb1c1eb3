use super::*;
use std::io::Write;

#[test]
fn defaults_are_sensible() {
    let config = CoordinationConfig::default();
    assert_eq!(config.pool.workers, 4);
    assert_eq!(config.pool.deadline, None);
    assert_eq!(config.pipeline.capacity, 64);
    assert_eq!(config.pipeline.producers, 4);
    assert_eq!(config.ordering.acquire_timeout, Duration::from_secs(30));
}

#[test]
fn partial_file_keeps_other_defaults() {
    let config = CoordinationConfig::from_toml_str(
        r#"
        [pool]
        workers = 8
        deadline = "2s"
        "#,
    )
    .unwrap();
    assert_eq!(config.pool.workers, 8);
    assert_eq!(config.pool.deadline, Some(Duration::from_secs(2)));
    assert_eq!(config.pipeline, PipelineSettings::default());
    assert_eq!(config.ordering, OrderingSettings::default());
}

#[test]
fn humantime_durations_parse() {
    let config = CoordinationConfig::from_toml_str(
        r#"
        [ordering]
        acquire_timeout = "250ms"
        "#,
    )
    .unwrap();
    assert_eq!(
        config.ordering.acquire_timeout,
        Duration::from_millis(250)
    );
}

#[test]
fn malformed_file_is_a_parse_error() {
    let result = CoordinationConfig::from_toml_str("pool = 3");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[pipeline]\ncapacity = 16\nproducers = 2").unwrap();
    let config = CoordinationConfig::load(file.path()).unwrap();
    assert_eq!(config.pipeline.capacity, 16);
    assert_eq!(config.pipeline.producers, 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let result = CoordinationConfig::load(Path::new("/nonexistent/foreman.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
