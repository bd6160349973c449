use ncd_convert::config::{CompressionCodec, Config, LogFormat};

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../ncd-convert.toml.example")).unwrap();

    assert_eq!(config.convert.extension, "parquet");
    assert!(config.convert.source_dir.is_none());
    assert_eq!(config.writer.compression, CompressionCodec::Snappy);
    assert_eq!(config.writer.max_row_group_size, 1024 * 1024);
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
}
