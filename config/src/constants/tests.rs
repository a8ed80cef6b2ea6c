//! Tests for the centralized configuration values.

use super::*;

/// Ensures default configurations carry usable values.
///
/// # Examples
/// ```
/// use config::constants::ParserConfig;
/// let cfg = ParserConfig::default();
/// assert!(!cfg.region_begin_pattern.is_empty());
/// ```
#[test]
fn default_configs_are_valid() {
    let parser = ParserConfig::default();
    assert!(ParserConfig::new(parser.region_begin_pattern, parser.region_end_pattern).is_ok());

    let writer = WriterConfig::default();
    assert!(writer
        .clone()
        .with_region_formats(writer.region_begin_format, writer.region_end_format)
        .is_ok());
}

/// Validates the builders reject invalid values.
#[test]
fn builders_validate_inputs() {
    assert_eq!(
        ParserConfig::new("^begin$", r"(?P<Name>.*)").unwrap_err(),
        ConfigError::MissingNameGroup("^begin$".to_string())
    );
    assert_eq!(
        WriterConfig::default().with_indent(IndentStyle::Spaces(0)).unwrap_err(),
        ConfigError::InvalidIndentWidth(0)
    );
    assert_eq!(
        WriterConfig::default()
            .with_region_formats("begin", "end {0}")
            .unwrap_err(),
        ConfigError::MissingPlaceholder("begin".to_string())
    );
}

#[test]
fn named_group_short_syntax_is_accepted() {
    assert!(ParserConfig::new(r"^b (?<Name>.*)$", r"^e (?<Name>.*)$").is_ok());
}
