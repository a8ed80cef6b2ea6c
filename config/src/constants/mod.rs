//! Centralized configuration values shared by the parser and the writer.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

/// Name of the capture group that region directive patterns must define.
///
/// # Examples
/// ```
/// use config::constants::REGION_NAME_GROUP;
/// assert_eq!(REGION_NAME_GROUP, "Name");
/// ```
pub const REGION_NAME_GROUP: &str = "Name";

/// Placeholder replaced by the region name in comment directive formats.
pub const REGION_NAME_PLACEHOLDER: &str = "{0}";

/// Default pattern matching the text of a line comment that opens a region.
///
/// Matches the comment body (the text after `//`), e.g. ` $(Begin) Fields`.
pub const DEFAULT_REGION_BEGIN_PATTERN: &str = r"^\s*\$\(\s*Begin\s*\)\s*(?P<Name>.*?)\s*$";

/// Default pattern matching the text of a line comment that closes a region.
pub const DEFAULT_REGION_END_PATTERN: &str = r"^\s*\$\(\s*End\s*\)\s*(?P<Name>.*?)\s*$";

/// Default format used by the writer for comment directive region starts.
pub const DEFAULT_REGION_BEGIN_FORMAT: &str = "$(Begin) {0}";

/// Default format used by the writer for comment directive region ends.
pub const DEFAULT_REGION_END_FORMAT: &str = "$(End) {0}";

/// Default number of spaces per indentation level.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_INDENT_WIDTH;
/// assert_eq!(DEFAULT_INDENT_WIDTH, 4);
/// ```
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Bytes of stack space reserved when growing the stack for recursive
/// block parsing using the `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker` allocates a new segment.
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

/// How regions are written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionStyle {
    /// Keep whatever form the region was parsed from.
    #[default]
    Preserve,
    /// Always `#region Name` / `#endregion`.
    Directive,
    /// Always line comments built from the begin/end formats.
    CommentDirective,
}

/// Indentation unit used by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    /// Fixed number of spaces per level.
    Spaces(usize),
    /// One tab per level.
    Tabs,
}

impl IndentStyle {
    /// Returns the text of one indentation level.
    ///
    /// # Examples
    /// ```
    /// use config::constants::IndentStyle;
    /// assert_eq!(IndentStyle::Spaces(2).unit(), "  ");
    /// assert_eq!(IndentStyle::Tabs.unit(), "\t");
    /// ```
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(width) => " ".repeat(*width),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(DEFAULT_INDENT_WIDTH)
    }
}

/// Line terminator emitted by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Settings consumed by the parser.
///
/// # Examples
/// ```
/// use config::constants::ParserConfig;
/// let cfg = ParserConfig::new(r"^\s*begin (?P<Name>.*)$", r"^\s*end(?P<Name>.*)$")
///     .expect("valid config");
/// assert!(cfg.region_end_pattern.starts_with('^'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Pattern matched against line comment text to open a region.
    pub region_begin_pattern: String,
    /// Pattern matched against line comment text to close a region.
    pub region_end_pattern: String,
}

impl ParserConfig {
    /// Builds a parser configuration, requiring both patterns to define the
    /// `Name` capture group.
    pub fn new(
        region_begin_pattern: impl Into<String>,
        region_end_pattern: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let region_begin_pattern = region_begin_pattern.into();
        let region_end_pattern = region_end_pattern.into();
        for pattern in [&region_begin_pattern, &region_end_pattern] {
            if !has_name_group(pattern) {
                return Err(ConfigError::MissingNameGroup(pattern.clone()));
            }
        }
        Ok(Self {
            region_begin_pattern,
            region_end_pattern,
        })
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            region_begin_pattern: DEFAULT_REGION_BEGIN_PATTERN.to_string(),
            region_end_pattern: DEFAULT_REGION_END_PATTERN.to_string(),
        }
    }
}

/// Settings consumed by the writer.
///
/// # Examples
/// ```
/// use config::constants::{IndentStyle, RegionStyle, WriterConfig};
/// let cfg = WriterConfig::default()
///     .with_indent(IndentStyle::Tabs)
///     .expect("tabs are valid");
/// assert_eq!(cfg.region_style, RegionStyle::Preserve);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    pub indent: IndentStyle,
    pub region_style: RegionStyle,
    /// Format for comment directive region starts; `{0}` is the name.
    pub region_begin_format: String,
    /// Format for comment directive region ends; `{0}` is the name.
    pub region_end_format: String,
    pub line_ending: LineEnding,
}

impl WriterConfig {
    /// Replaces the indentation style, rejecting zero-width indents.
    pub fn with_indent(mut self, indent: IndentStyle) -> Result<Self, ConfigError> {
        if indent == IndentStyle::Spaces(0) {
            return Err(ConfigError::InvalidIndentWidth(0));
        }
        self.indent = indent;
        Ok(self)
    }

    /// Replaces both comment directive formats. Each must contain `{0}`.
    pub fn with_region_formats(
        mut self,
        begin: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let begin = begin.into();
        let end = end.into();
        for format in [&begin, &end] {
            if !format.contains(REGION_NAME_PLACEHOLDER) {
                return Err(ConfigError::MissingPlaceholder(format.clone()));
            }
        }
        self.region_begin_format = begin;
        self.region_end_format = end;
        Ok(self)
    }

    pub fn with_region_style(mut self, style: RegionStyle) -> Self {
        self.region_style = style;
        self
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: IndentStyle::default(),
            region_style: RegionStyle::default(),
            region_begin_format: DEFAULT_REGION_BEGIN_FORMAT.to_string(),
            region_end_format: DEFAULT_REGION_END_FORMAT.to_string(),
            line_ending: LineEnding::default(),
        }
    }
}

fn has_name_group(pattern: &str) -> bool {
    pattern.contains(&format!("(?P<{REGION_NAME_GROUP}>"))
        || pattern.contains(&format!("(?<{REGION_NAME_GROUP}>"))
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// A region pattern lacks the `Name` capture group.
    MissingNameGroup(String),
    /// A comment directive format lacks the `{0}` placeholder.
    MissingPlaceholder(String),
    /// Space indentation must be at least one column wide.
    InvalidIndentWidth(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingNameGroup(pattern) => {
                write!(f, "region pattern must define a `{REGION_NAME_GROUP}` group: {pattern}")
            }
            ConfigError::MissingPlaceholder(format) => {
                write!(f, "region format must contain `{REGION_NAME_PLACEHOLDER}`: {format}")
            }
            ConfigError::InvalidIndentWidth(value) => {
                write!(f, "indent width must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
