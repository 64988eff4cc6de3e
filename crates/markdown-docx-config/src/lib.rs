//! Configuration primitives and loader for markdown-docx.
//!
//! Settings are resolved from a stack of `.markdown-docx.toml` layers:
//! override flag → working directory → git root → built-in defaults.
//! Each layer may set any subset of fields; later layers win field by field.
//! Relative paths resolve against the directory of the layer that set them.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".markdown-docx.toml";

const DEFAULT_BODY_FONT: &str = "Calibri";
const DEFAULT_BODY_SIZE_PT: f32 = 11.0;
const DEFAULT_CODE_FONT: &str = "Courier New";
const DEFAULT_CODE_SIZE_PT: f32 = 9.0;
const DEFAULT_CODE_SPACING_PT: f32 = 6.0;
const DEFAULT_RULE_SPACING_PT: f32 = 12.0;
const DEFAULT_MAX_HEADING_LEVEL: u8 = 4;
const DEFAULT_HEADER_FILL: &str = "003366";
const DEFAULT_HEADER_TEXT_COLOR: &str = "FFFFFF";
const DEFAULT_BORDER_COLOR: &str = "000000";

/// Highest heading level a word processor offers as a built-in style.
pub const MAX_STRUCTURAL_HEADING_LEVEL: u8 = 9;

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub conversion: ConversionSettings,
    pub style: StyleSettings,
    pub sources: ConfigSources,
}

/// Where to read markdown from and where to write the document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversionSettings {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Presentation choices applied by the document sink.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSettings {
    pub body_font: String,
    pub body_size_pt: f32,
    pub code_font: String,
    pub code_size_pt: f32,
    pub code_spacing_pt: f32,
    pub rule_spacing_pt: f32,
    /// Headings deeper than this render as bold body paragraphs.
    pub max_heading_level: u8,
    pub header_fill: HexColor,
    pub header_text_color: HexColor,
    pub border_color: HexColor,
    pub center_title: bool,
}

impl Default for StyleSettings {
    fn default() -> Self {
        StyleSettings {
            body_font: DEFAULT_BODY_FONT.to_owned(),
            body_size_pt: DEFAULT_BODY_SIZE_PT,
            code_font: DEFAULT_CODE_FONT.to_owned(),
            code_size_pt: DEFAULT_CODE_SIZE_PT,
            code_spacing_pt: DEFAULT_CODE_SPACING_PT,
            rule_spacing_pt: DEFAULT_RULE_SPACING_PT,
            max_heading_level: DEFAULT_MAX_HEADING_LEVEL,
            header_fill: HexColor(DEFAULT_HEADER_FILL.to_owned()),
            header_text_color: HexColor(DEFAULT_HEADER_TEXT_COLOR.to_owned()),
            border_color: HexColor(DEFAULT_BORDER_COLOR.to_owned()),
            center_title: true,
        }
    }
}

/// Six-digit RGB colour, stored upper-case without a leading `#`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexColor {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() == 6 && digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            Ok(HexColor(digits.to_ascii_uppercase()))
        } else {
            Err(format!("'{value}' is not a six-digit hex colour"))
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialized form of the converted document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// Single-file Word XML package.
    #[default]
    WordXml,
    /// The rendered document model as JSON.
    Json,
}

impl OutputFormat {
    pub const ALL: &'static [OutputFormat] = &[OutputFormat::WordXml, OutputFormat::Json];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::WordXml => "word-xml",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .iter()
            .copied()
            .find(|format| format.as_str() == value)
            .ok_or_else(|| format!("unknown output format '{value}'"))
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        for layer in &source_layers {
            log::debug!("applied configuration layer: {}", layer.describe());
        }

        let (conversion, style) = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            conversion,
            style,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let defaults = StyleSettings::default();

    let style = StylePartial {
        body_font: Some(Located::new(defaults.body_font, source.clone())),
        body_size_pt: Some(Located::new(defaults.body_size_pt, source.clone())),
        code_font: Some(Located::new(defaults.code_font, source.clone())),
        code_size_pt: Some(Located::new(defaults.code_size_pt, source.clone())),
        code_spacing_pt: Some(Located::new(defaults.code_spacing_pt, source.clone())),
        rule_spacing_pt: Some(Located::new(defaults.rule_spacing_pt, source.clone())),
        max_heading_level: Some(Located::new(
            i64::from(defaults.max_heading_level),
            source.clone(),
        )),
        header_fill: Some(Located::new(defaults.header_fill.to_string(), source.clone())),
        header_text_color: Some(Located::new(
            defaults.header_text_color.to_string(),
            source.clone(),
        )),
        border_color: Some(Located::new(defaults.border_color.to_string(), source.clone())),
        center_title: Some(Located::new(defaults.center_title, source.clone())),
    };

    let conversion = ConversionPartial {
        format: Some(Located::new(OutputFormat::default().as_str().to_owned(), source)),
        ..ConversionPartial::default()
    };

    PartialConfig {
        conversion: Some(conversion),
        style: Some(style),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    conversion: Option<ConversionPartial>,
    style: Option<StylePartial>,
}

impl PartialConfig {
    fn merge(&mut self, mut other: PartialConfig) {
        if let Some(other_conversion) = other.conversion.take() {
            match &mut self.conversion {
                Some(conversion) => conversion.merge(other_conversion),
                None => self.conversion = Some(other_conversion),
            }
        }

        if let Some(other_style) = other.style.take() {
            match &mut self.style {
                Some(style) => style.merge(other_style),
                None => self.style = Some(other_style),
            }
        }
    }

    fn finalize(self) -> Result<(ConversionSettings, StyleSettings), ConfigValidationErrors> {
        let mut errors = Vec::new();
        let defaults = StyleSettings::default();

        let conversion_partial = self.conversion.unwrap_or_default();
        let format = match conversion_partial.format {
            Some(located) => match located.value.parse::<OutputFormat>() {
                Ok(format) => format,
                Err(message) => {
                    errors.push(
                        ConfigValidationError::new(Some(located.source), message)
                            .with_context("conversion.format"),
                    );
                    OutputFormat::default()
                }
            },
            None => OutputFormat::default(),
        };
        let conversion = ConversionSettings {
            input: conversion_partial.input.as_ref().map(resolve_path),
            output: conversion_partial.output.as_ref().map(resolve_path),
            format,
        };

        let style_partial = self.style.unwrap_or_default();

        let body_size_pt = positive_size(
            style_partial.body_size_pt,
            defaults.body_size_pt,
            "style.body_size_pt",
            &mut errors,
        );
        let code_size_pt = positive_size(
            style_partial.code_size_pt,
            defaults.code_size_pt,
            "style.code_size_pt",
            &mut errors,
        );
        let code_spacing_pt = non_negative_spacing(
            style_partial.code_spacing_pt,
            defaults.code_spacing_pt,
            "style.code_spacing_pt",
            &mut errors,
        );
        let rule_spacing_pt = non_negative_spacing(
            style_partial.rule_spacing_pt,
            defaults.rule_spacing_pt,
            "style.rule_spacing_pt",
            &mut errors,
        );

        let max_heading_level = match style_partial.max_heading_level {
            Some(located) => {
                let range = 1..=i64::from(MAX_STRUCTURAL_HEADING_LEVEL);
                if range.contains(&located.value) {
                    located.value as u8
                } else {
                    errors.push(
                        ConfigValidationError::new(
                            Some(located.source),
                            format!(
                                "expected a level between 1 and {MAX_STRUCTURAL_HEADING_LEVEL}, found {}",
                                located.value
                            ),
                        )
                        .with_context("style.max_heading_level"),
                    );
                    defaults.max_heading_level
                }
            }
            None => defaults.max_heading_level,
        };

        let header_fill = color(
            style_partial.header_fill,
            defaults.header_fill.clone(),
            "style.header_fill",
            &mut errors,
        );
        let header_text_color = color(
            style_partial.header_text_color,
            defaults.header_text_color.clone(),
            "style.header_text_color",
            &mut errors,
        );
        let border_color = color(
            style_partial.border_color,
            defaults.border_color.clone(),
            "style.border_color",
            &mut errors,
        );

        let body_font = font(
            style_partial.body_font,
            defaults.body_font,
            "style.body_font",
            &mut errors,
        );
        let code_font = font(
            style_partial.code_font,
            defaults.code_font,
            "style.code_font",
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        let style = StyleSettings {
            body_font,
            body_size_pt,
            code_font,
            code_size_pt,
            code_spacing_pt,
            rule_spacing_pt,
            max_heading_level,
            header_fill,
            header_text_color,
            border_color,
            center_title: style_partial
                .center_title
                .map(|located| located.value)
                .unwrap_or(defaults.center_title),
        };

        Ok((conversion, style))
    }
}

fn positive_size(
    located: Option<Located<f32>>,
    fallback: f32,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> f32 {
    let Some(located) = located else {
        return fallback;
    };
    if located.value.is_finite() && located.value > 0.0 {
        located.value
    } else {
        errors.push(
            ConfigValidationError::new(
                Some(located.source),
                format!("font size must be positive, found {}", located.value),
            )
            .with_context(context),
        );
        fallback
    }
}

fn non_negative_spacing(
    located: Option<Located<f32>>,
    fallback: f32,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> f32 {
    let Some(located) = located else {
        return fallback;
    };
    if located.value.is_finite() && located.value >= 0.0 {
        located.value
    } else {
        errors.push(
            ConfigValidationError::new(
                Some(located.source),
                format!("spacing must not be negative, found {}", located.value),
            )
            .with_context(context),
        );
        fallback
    }
}

fn color(
    located: Option<Located<String>>,
    fallback: HexColor,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> HexColor {
    let Some(located) = located else {
        return fallback;
    };
    match located.value.parse::<HexColor>() {
        Ok(color) => color,
        Err(message) => {
            errors.push(ConfigValidationError::new(Some(located.source), message).with_context(context));
            fallback
        }
    }
}

fn font(
    located: Option<Located<String>>,
    fallback: String,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> String {
    let Some(located) = located else {
        return fallback;
    };
    let name = located.value.trim();
    if name.is_empty() {
        errors.push(
            ConfigValidationError::new(Some(located.source), "font name is empty".to_owned())
                .with_context(context),
        );
        fallback
    } else {
        name.to_owned()
    }
}

#[derive(Clone, Debug, Default)]
struct ConversionPartial {
    input: Option<Located<PathBuf>>,
    output: Option<Located<PathBuf>>,
    format: Option<Located<String>>,
}

impl ConversionPartial {
    fn merge(&mut self, other: ConversionPartial) {
        if other.input.is_some() {
            self.input = other.input;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
        if other.format.is_some() {
            self.format = other.format;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct StylePartial {
    body_font: Option<Located<String>>,
    body_size_pt: Option<Located<f32>>,
    code_font: Option<Located<String>>,
    code_size_pt: Option<Located<f32>>,
    code_spacing_pt: Option<Located<f32>>,
    rule_spacing_pt: Option<Located<f32>>,
    max_heading_level: Option<Located<i64>>,
    header_fill: Option<Located<String>>,
    header_text_color: Option<Located<String>>,
    border_color: Option<Located<String>>,
    center_title: Option<Located<bool>>,
}

impl StylePartial {
    fn merge(&mut self, other: StylePartial) {
        if other.body_font.is_some() {
            self.body_font = other.body_font;
        }
        if other.body_size_pt.is_some() {
            self.body_size_pt = other.body_size_pt;
        }
        if other.code_font.is_some() {
            self.code_font = other.code_font;
        }
        if other.code_size_pt.is_some() {
            self.code_size_pt = other.code_size_pt;
        }
        if other.code_spacing_pt.is_some() {
            self.code_spacing_pt = other.code_spacing_pt;
        }
        if other.rule_spacing_pt.is_some() {
            self.rule_spacing_pt = other.rule_spacing_pt;
        }
        if other.max_heading_level.is_some() {
            self.max_heading_level = other.max_heading_level;
        }
        if other.header_fill.is_some() {
            self.header_fill = other.header_fill;
        }
        if other.header_text_color.is_some() {
            self.header_text_color = other.header_text_color;
        }
        if other.border_color.is_some() {
            self.border_color = other.border_color;
        }
        if other.center_title.is_some() {
            self.center_title = other.center_title;
        }
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    conversion: Option<RawConversion>,
    #[serde(default)]
    style: Option<RawStyle>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        PartialConfig {
            conversion: self
                .conversion
                .map(|conversion| conversion.into_partial(source.clone())),
            style: self.style.map(|style| style.into_partial(source)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConversion {
    #[serde(default)]
    input: Option<PathBuf>,
    #[serde(default)]
    output: Option<PathBuf>,
    #[serde(default)]
    format: Option<String>,
}

impl RawConversion {
    fn into_partial(self, source: ConfigSource) -> ConversionPartial {
        ConversionPartial {
            input: self.input.map(|value| Located::new(value, source.clone())),
            output: self.output.map(|value| Located::new(value, source.clone())),
            format: self.format.map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStyle {
    #[serde(default)]
    body_font: Option<String>,
    #[serde(default)]
    body_size_pt: Option<f32>,
    #[serde(default)]
    code_font: Option<String>,
    #[serde(default)]
    code_size_pt: Option<f32>,
    #[serde(default)]
    code_spacing_pt: Option<f32>,
    #[serde(default)]
    rule_spacing_pt: Option<f32>,
    #[serde(default)]
    max_heading_level: Option<i64>,
    #[serde(default)]
    header_fill: Option<String>,
    #[serde(default)]
    header_text_color: Option<String>,
    #[serde(default)]
    border_color: Option<String>,
    #[serde(default)]
    center_title: Option<bool>,
}

impl RawStyle {
    fn into_partial(self, source: ConfigSource) -> StylePartial {
        let located_f32 = |value: f32| Located::new(value, source.clone());
        let located_string = |value: String| Located::new(value, source.clone());
        StylePartial {
            body_font: self.body_font.map(located_string),
            body_size_pt: self.body_size_pt.map(located_f32),
            code_font: self.code_font.map(located_string),
            code_size_pt: self.code_size_pt.map(located_f32),
            code_spacing_pt: self.code_spacing_pt.map(located_f32),
            rule_spacing_pt: self.rule_spacing_pt.map(located_f32),
            max_heading_level: self
                .max_heading_level
                .map(|value| Located::new(value, source.clone())),
            header_fill: self.header_fill.map(located_string),
            header_text_color: self.header_text_color.map(located_string),
            border_color: self.border_color.map(located_string),
            center_title: self
                .center_title
                .map(|value| Located::new(value, source.clone())),
        }
    }
}
