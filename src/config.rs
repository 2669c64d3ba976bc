//! Marshaling configuration
//!
//! A [`MarshalConfig`] is built once and then shared read-only by every
//! component for the duration of a write or read pass.

use crate::error::{ExcelError, Result};
use regex::Regex;

/// Default placeholder syntax: `[FieldName]`
pub const DEFAULT_PLACEHOLDER_PATTERN: &str = r"\[(.+)\]";

/// Default display format for date/time values
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-mm-dd HH:mm:ss";

/// Display format applied to integer values
pub const INTEGER_FORMAT: &str = "#0";

/// Configuration for record/sheet marshaling
#[derive(Debug, Clone)]
pub struct MarshalConfig {
    placeholder: Regex,
    date_format: String,
    auto_fit_column: bool,
    max_column_width: f64,
    picture_default_size: (f64, f64),
    width_pixels_base: f64,
    default_dpi: u32,
}

impl MarshalConfig {
    /// Start a builder seeded with the defaults
    pub fn builder() -> MarshalConfigBuilder {
        MarshalConfigBuilder::new()
    }

    /// Defaults overlaid with `EXCELBIND_*` environment variables
    ///
    /// Recognized: `EXCELBIND_DATE_FORMAT`, `EXCELBIND_AUTO_FIT_COLUMN`
    /// (`true`/`false`/`1`/`0`), `EXCELBIND_MAX_COLUMN_WIDTH`. Values that do
    /// not parse are ignored.
    pub fn from_env() -> Self {
        let mut config = MarshalConfig::default();

        if let Some(format) = std::env::var("EXCELBIND_DATE_FORMAT")
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            config.date_format = format;
        }

        if let Some(auto_fit) = std::env::var("EXCELBIND_AUTO_FIT_COLUMN")
            .ok()
            .and_then(|s| parse_flag(&s))
        {
            config.auto_fit_column = auto_fit;
        }

        if let Some(width) = std::env::var("EXCELBIND_MAX_COLUMN_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|w| *w > 0.0)
        {
            config.max_column_width = width;
        }

        config
    }

    /// Compiled placeholder pattern; always has exactly one capture group
    pub fn placeholder(&self) -> &Regex {
        &self.placeholder
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn auto_fit_column(&self) -> bool {
        self.auto_fit_column
    }

    pub fn max_column_width(&self) -> f64 {
        self.max_column_width
    }

    /// Column width and row height given to a cell that receives a picture
    pub fn picture_default_size(&self) -> (f64, f64) {
        self.picture_default_size
    }

    /// Pixels per column-width unit; zero or negative means "use the fallback"
    pub fn width_pixels_base(&self) -> f64 {
        self.width_pixels_base
    }

    pub fn default_dpi(&self) -> u32 {
        self.default_dpi
    }

    /// Copy of this config with column auto-fit switched on or off
    pub fn with_auto_fit(&self, auto_fit_column: bool) -> Self {
        MarshalConfig {
            auto_fit_column,
            ..self.clone()
        }
    }
}

impl Default for MarshalConfig {
    fn default() -> Self {
        MarshalConfig {
            placeholder: default_placeholder(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            auto_fit_column: false,
            max_column_width: 100.0,
            picture_default_size: (20.0, 50.0),
            width_pixels_base: 0.0,
            default_dpi: 72,
        }
    }
}

fn default_placeholder() -> Regex {
    Regex::new(DEFAULT_PLACEHOLDER_PATTERN).expect("default placeholder pattern compiles")
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Compile a placeholder pattern and check it has exactly one capture group
pub fn compile_placeholder(pattern: &str) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(ExcelError::InvalidConfig(
            "placeholder pattern must not be empty".to_string(),
        ));
    }
    let regex = Regex::new(pattern)?;
    // captures_len counts the implicit whole-match group
    if regex.captures_len() != 2 {
        return Err(ExcelError::InvalidConfig(format!(
            "placeholder pattern '{}' must have exactly one capture group, found {}",
            pattern,
            regex.captures_len() - 1
        )));
    }
    Ok(regex)
}

/// Builder for [`MarshalConfig`]
#[derive(Debug, Default)]
pub struct MarshalConfigBuilder {
    placeholder_pattern: Option<String>,
    date_format: Option<String>,
    auto_fit_column: Option<bool>,
    max_column_width: Option<f64>,
    picture_default_size: Option<(f64, f64)>,
    width_pixels_base: Option<f64>,
    default_dpi: Option<u32>,
}

impl MarshalConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder regex; must contain exactly one capture group
    pub fn placeholder_pattern(mut self, pattern: &str) -> Self {
        self.placeholder_pattern = Some(pattern.to_string());
        self
    }

    /// Display format for dates, e.g. `yyyy-mm-dd`
    pub fn date_format(mut self, format: &str) -> Self {
        self.date_format = Some(format.to_string());
        self
    }

    pub fn auto_fit_column(mut self, enabled: bool) -> Self {
        self.auto_fit_column = Some(enabled);
        self
    }

    pub fn max_column_width(mut self, width: f64) -> Self {
        self.max_column_width = Some(width);
        self
    }

    pub fn picture_default_size(mut self, width: f64, height: f64) -> Self {
        self.picture_default_size = Some((width, height));
        self
    }

    pub fn width_pixels_base(mut self, base: f64) -> Self {
        self.width_pixels_base = Some(base);
        self
    }

    pub fn default_dpi(mut self, dpi: u32) -> Self {
        self.default_dpi = Some(dpi);
        self
    }

    /// Build the config, compiling and checking the placeholder pattern
    pub fn build(self) -> Result<MarshalConfig> {
        let mut config = MarshalConfig::default();

        if let Some(pattern) = self.placeholder_pattern {
            config.placeholder = compile_placeholder(&pattern)?;
        }

        if let Some(format) = self.date_format {
            if format.is_empty() {
                return Err(ExcelError::InvalidConfig(
                    "date format must not be empty".to_string(),
                ));
            }
            config.date_format = format;
        }

        if let Some(width) = self.max_column_width {
            if width <= 0.0 {
                return Err(ExcelError::InvalidConfig(format!(
                    "max column width must be positive, got {}",
                    width
                )));
            }
            config.max_column_width = width;
        }

        if let Some(dpi) = self.default_dpi {
            if dpi == 0 {
                return Err(ExcelError::InvalidConfig(
                    "default DPI must be greater than 0".to_string(),
                ));
            }
            config.default_dpi = dpi;
        }

        if let Some(auto_fit) = self.auto_fit_column {
            config.auto_fit_column = auto_fit;
        }
        if let Some(size) = self.picture_default_size {
            config.picture_default_size = size;
        }
        if let Some(base) = self.width_pixels_base {
            config.width_pixels_base = base;
        }

        Ok(config)
    }
}
