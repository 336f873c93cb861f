//! Per-click share parameters gathered from page metadata.

use rustc_hash::FxHashMap;

use crate::config::ShareData;
use crate::page::Document;

/// Placeholder name -> value map used for template substitution.
///
/// Invariant: never holds empty values. Fields that resolve to nothing are
/// omitted entirely so their placeholders get stripped, not substituted
/// with empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams(FxHashMap<String, String>);

impl ShareParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, dropping `None` and empty values.
    pub fn insert(&mut self, key: &str, value: Option<String>) {
        if let Some(value) = value
            && !value.is_empty()
        {
            self.0.insert(key.to_string(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ShareParams {
    fn from(entries: [(&str, &str); N]) -> Self {
        let mut params = Self::new();
        for (key, value) in entries {
            params.insert(key, Some(value.to_string()));
        }
        params
    }
}

/// Gather share parameters for one click.
///
/// Auto-discovers page metadata and lets non-empty static overrides win:
///
/// | placeholder   | page source                     |
/// |---------------|---------------------------------|
/// | `title`       | document title                  |
/// | `description` | `meta[name=description]`        |
/// | `image`       | `meta[property=og:image]`       |
/// | `hashtags`    | `meta[name=keywords]`           |
/// | `url`         | `link[rel=canonical]`           |
pub fn gather_params(doc: &Document, overrides: &ShareData) -> ShareParams {
    let mut params = ShareParams::new();
    params.insert("title", pick(&overrides.title, || doc.title()));
    params.insert(
        "description",
        pick(&overrides.description, || doc.meta_named("description")),
    );
    params.insert(
        "image",
        pick(&overrides.image, || doc.meta_property("og:image")),
    );
    params.insert(
        "hashtags",
        pick(&overrides.hashtags, || doc.meta_named("keywords")),
    );
    params.insert("url", pick(&overrides.url, || doc.canonical()));
    params
}

/// A non-empty override beats the discovered value.
fn pick(overridden: &Option<String>, discover: impl FnOnce() -> Option<String>) -> Option<String> {
    match overridden {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => discover(),
    }
}

// ============================================================================
// tests
// ============================================================================
