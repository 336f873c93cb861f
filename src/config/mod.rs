//! Widget configuration: defaults, layered merge, the `option` accessor.
//!
//! A widget's configuration is resolved once at attach time by folding
//! partial patches onto the built-in defaults, lowest priority first:
//!
//! | Layer                        | Source                                |
//! |------------------------------|---------------------------------------|
//! | built-in defaults            | this module                           |
//! | registered options blob      | `data-shareto-options` reference key  |
//! | attach-call options          | `AttachOptions.patch`                 |
//! | element `data-*` attributes  | the container element itself          |
//!
//! `width`/`height` replace shallowly; the `networks` and `data` sub-maps
//! merge entry-by-entry so a later layer overrides individual entries,
//! never the whole sub-map.

mod error;

pub use error::ConfigError;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::log;

/// Default popup width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default popup height in pixels.
pub const DEFAULT_HEIGHT: u32 = 500;

/// Built-in share URL templates.
fn default_networks() -> FxHashMap<String, String> {
    let mut networks = FxHashMap::default();
    networks.insert(
        "facebook".into(),
        "http://www.facebook.com/sharer.php?u={url}&picture={image}&title={title}&quote={description}".into(),
    );
    networks.insert(
        "twitter".into(),
        "https://twitter.com/share?url={url}&text={title}&hashtags={hashtags}".into(),
    );
    networks.insert(
        "linkedin".into(),
        "http://www.linkedin.com/shareArticle?url={url}&title={title}".into(),
    );
    networks.insert(
        "pinterest".into(),
        "https://pinterest.com/pin/create/bookmarklet/?media={image}&url={url}&is_video={is_video}&description={title}".into(),
    );
    networks
}

// ============================================================================
// ShareData
// ============================================================================

/// Static metadata overrides.
///
/// Any non-empty field here beats the value auto-discovered from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub hashtags: Option<String>,
    pub url: Option<String>,
}

impl ShareData {
    /// Merge another data layer field-by-field. Non-empty fields win.
    fn merge(&mut self, other: &ShareData) {
        merge_field(&mut self.title, &other.title);
        merge_field(&mut self.description, &other.description);
        merge_field(&mut self.image, &other.image);
        merge_field(&mut self.hashtags, &other.hashtags);
        merge_field(&mut self.url, &other.url);
    }
}

fn merge_field(slot: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value
        && !v.is_empty()
    {
        *slot = Some(v.clone());
    }
}

// ============================================================================
// ConfigPatch
// ============================================================================

/// Partial configuration, the unit of layering.
///
/// Deserialized from a registered JSON options blob, passed at attach time,
/// or derived from a container element's `data-*` attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Network identifier -> URL template, merged entry-wise.
    pub social_networks: FxHashMap<String, String>,
    /// Static metadata overrides, merged field-wise.
    pub data: ShareData,
}

impl ConfigPatch {
    /// Parse a JSON options blob, collecting any unknown fields.
    pub fn from_json(json: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let patch = serde_ignored::deserialize(&mut deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((patch, ignored))
    }

    /// Build a patch from a container element's `data-*` attributes
    /// (keys arrive with the `data-` prefix already stripped).
    ///
    /// Unrecognized keys are skipped: the container carries unrelated data
    /// attributes (the options reference key, framework attributes).
    pub fn from_data_attrs(attrs: &[(String, String)]) -> Self {
        let mut patch = Self::default();
        for (key, value) in attrs {
            match key.as_str() {
                "width" => patch.width = parse_dimension("width", value),
                "height" => patch.height = parse_dimension("height", value),
                "title" => patch.data.title = Some(value.clone()),
                "description" => patch.data.description = Some(value.clone()),
                "image" => patch.data.image = Some(value.clone()),
                "hashtags" => patch.data.hashtags = Some(value.clone()),
                "url" => patch.data.url = Some(value.clone()),
                _ => {}
            }
        }
        patch
    }
}

fn parse_dimension(name: &str, value: &str) -> Option<u32> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log!("warning"; "ignoring data-{name}=`{value}`: not an integer");
            None
        }
    }
}

// ============================================================================
// ShareConfig
// ============================================================================

/// Resolved per-widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Popup window width in pixels.
    pub width: u32,
    /// Popup window height in pixels.
    pub height: u32,
    /// Network identifier -> URL template.
    #[serde(rename = "socialNetworks")]
    pub networks: FxHashMap<String, String>,
    /// Static metadata overrides.
    pub data: ShareData,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            networks: default_networks(),
            data: ShareData::default(),
        }
    }
}

impl ShareConfig {
    /// Fold patch layers onto the defaults, lowest priority first.
    pub fn resolve<'a>(patches: impl IntoIterator<Item = &'a ConfigPatch>) -> Self {
        let mut config = Self::default();
        for patch in patches {
            config.apply(patch);
        }
        config
    }

    /// Apply one patch layer.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        for (network, template) in &patch.social_networks {
            self.networks.insert(network.clone(), template.clone());
        }
        self.data.merge(&patch.data);
    }

    /// URL template configured for a network, if any.
    pub fn template(&self, network: &str) -> Option<&str> {
        self.networks.get(network).map(String::as_str)
    }

    /// Warn about templates that are not parseable http(s) URLs.
    ///
    /// Warnings only: markup and configuration come from independently
    /// edited sources, so a bad entry must not take the widget down.
    pub fn warn_invalid_templates(&self) {
        for (network, template) in &self.networks {
            match url::Url::parse(template) {
                Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => {
                    log!(
                        "warning";
                        "share template for `{network}` has unsupported scheme `{}`",
                        parsed.scheme()
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    log!("warning"; "share template for `{network}` is not a valid url: {e}");
                }
            }
        }
    }

    /// Read a config field as a string (the `option` getter).
    pub fn get(&self, field: ConfigField) -> Option<String> {
        match field {
            ConfigField::Width => Some(self.width.to_string()),
            ConfigField::Height => Some(self.height.to_string()),
            ConfigField::Title => self.data.title.clone(),
            ConfigField::Description => self.data.description.clone(),
            ConfigField::Image => self.data.image.clone(),
            ConfigField::Hashtags => self.data.hashtags.clone(),
            ConfigField::Url => self.data.url.clone(),
        }
    }

    /// Update a config field from a string (the `option` setter).
    pub fn set(&mut self, field: ConfigField, value: &str) -> Result<(), ConfigError> {
        match field {
            ConfigField::Width => self.width = parse_set("width", value)?,
            ConfigField::Height => self.height = parse_set("height", value)?,
            ConfigField::Title => self.data.title = non_empty(value),
            ConfigField::Description => self.data.description = non_empty(value),
            ConfigField::Image => self.data.image = non_empty(value),
            ConfigField::Hashtags => self.data.hashtags = non_empty(value),
            ConfigField::Url => self.data.url = non_empty(value),
        }
        Ok(())
    }
}

fn parse_set(field: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ============================================================================
// ConfigField
// ============================================================================

/// The closed set of fields reachable through the `option` accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Width,
    Height,
    Title,
    Description,
    Image,
    Hashtags,
    Url,
}

impl FromStr for ConfigField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "width" => Ok(Self::Width),
            "height" => Ok(Self::Height),
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "image" => Ok(Self::Image),
            "hashtags" => Ok(Self::Hashtags),
            "url" => Ok(Self::Url),
            _ => Err(ConfigError::UnknownField(s.to_string())),
        }
    }
}

// ============================================================================
// tests
// ============================================================================
