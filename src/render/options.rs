//! Conversion options and configuration.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Schemes recognized by default in both link passes.
pub const DEFAULT_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "mailto", "bitcoin", "ed2k", "facetime", "feed", "geo", "irc",
    "irc6", "ircs", "magnet", "mms", "news", "nntp", "sip", "sips", "skype", "sms", "ssh", "tel",
    "telnet", "tftp", "xmpp", "dchub", "area", "areafix", "echomail", "faqserv", "fecho", "fs",
    "netmail",
];

/// Options for converting messages to HTML.
///
/// Loaded from JSON with [`ConvertOptions::from_json`]; missing keys take
/// their defaults, and so do values of the wrong shape (a string where the
/// attachment URL pair belongs leaves attachments as data URIs).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Emit `data-*` attributes instead of live links and sources
    #[serde(deserialize_with = "lenient")]
    pub data_mode: bool,

    /// Wrap origin, tearline and tagline in `<font color>`
    #[serde(deserialize_with = "lenient")]
    pub font_color: bool,

    /// Colors used when `font_color` is set
    #[serde(deserialize_with = "lenient")]
    pub colors: Colors,

    /// Prefix and suffix around the encoded attachment name; data URIs
    /// are used when unset
    #[serde(deserialize_with = "lenient")]
    pub file_url_parts: Option<(String, String)>,

    /// Prefixes prepended to emitted hrefs, by scheme; `*` is the fallback
    #[serde(deserialize_with = "lenient")]
    pub url_prefixes: HashMap<String, UrlPrefix>,

    /// Scheme allowlists of the link passes
    #[serde(deserialize_with = "lenient")]
    pub schemes: SchemeLists,
}

impl ConvertOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object.
    ///
    /// Fails only on malformed JSON or when the top level is not an object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Options(e.to_string()))
    }

    /// Enable or disable data mode.
    pub fn with_data_mode(mut self, enabled: bool) -> Self {
        self.data_mode = enabled;
        self
    }

    /// Enable or disable font colors.
    pub fn with_font_color(mut self, enabled: bool) -> Self {
        self.font_color = enabled;
        self
    }

    /// Set the control-line colors.
    pub fn with_colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    /// Serve attachments from `prefix + name + suffix`.
    pub fn with_file_url_parts(
        mut self,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        self.file_url_parts = Some((prefix.into(), suffix.into()));
        self
    }

    /// Set a URL prefix for a scheme (`*` for all others).
    pub fn with_url_prefix(mut self, scheme: impl Into<String>, prefix: UrlPrefix) -> Self {
        self.url_prefixes.insert(scheme.into(), prefix);
        self
    }

    /// Set the scheme allowlists.
    pub fn with_schemes(mut self, schemes: SchemeLists) -> Self {
        self.schemes = schemes;
        self
    }

    /// Prefix for an href of the given scheme.
    pub fn url_prefix(&self, scheme: &str, url: &str) -> String {
        self.url_prefixes
            .get(scheme)
            .or_else(|| self.url_prefixes.get("*"))
            .map(|prefix| prefix.apply(url))
            .unwrap_or_default()
    }

    /// Apply a partial update; fields left unset keep their value.
    ///
    /// Colors and URL prefixes merge key by key.
    pub fn merge(mut self, patch: OptionsPatch) -> Self {
        if let Some(data_mode) = patch.data_mode {
            self.data_mode = data_mode;
        }
        if let Some(font_color) = patch.font_color {
            self.font_color = font_color;
        }
        self.colors.merge(patch.colors);
        if let Some(parts) = patch.file_url_parts {
            self.file_url_parts = parts;
        }
        self.url_prefixes.extend(patch.url_prefixes);
        if let Some(schemes) = patch.schemes {
            self.schemes = schemes;
        }
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            data_mode: false,
            font_color: false,
            colors: Colors::default(),
            file_url_parts: None,
            url_prefixes: HashMap::new(),
            schemes: SchemeLists::default(),
        }
    }
}

/// Font colors of the control lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub origin: String,
    pub tearline: String,
    pub tagline: String,
}

impl Colors {
    fn merge(&mut self, patch: ColorsPatch) {
        if let Some(origin) = patch.origin {
            self.origin = origin;
        }
        if let Some(tearline) = patch.tearline {
            self.tearline = tearline;
        }
        if let Some(tagline) = patch.tagline {
            self.tagline = tagline;
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            origin: "#008080".to_string(),
            tearline: "#808000".to_string(),
            tagline: "#808080".to_string(),
        }
    }
}

/// Scheme allowlists for lone URLs and inline links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemeLists {
    /// Schemes linked when a URL appears in running text
    pub lone: Vec<String>,
    /// Schemes accepted in `[text](url)` and `![alt](url)`
    pub inline: Vec<String>,
}

impl SchemeLists {
    /// Use the same list for both passes.
    pub fn both(schemes: &[&str]) -> Self {
        let list: Vec<String> = schemes.iter().map(|s| s.to_string()).collect();
        Self {
            lone: list.clone(),
            inline: list,
        }
    }
}

impl Default for SchemeLists {
    fn default() -> Self {
        Self::both(DEFAULT_SCHEMES)
    }
}

/// A prefix prepended to hrefs: fixed, or computed from the URL.
#[derive(Clone)]
pub enum UrlPrefix {
    Static(String),
    Dynamic(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl UrlPrefix {
    /// Wrap a function computing the prefix from the URL.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        UrlPrefix::Dynamic(Arc::new(f))
    }

    /// Compute the prefix for a URL.
    pub fn apply(&self, url: &str) -> String {
        match self {
            UrlPrefix::Static(prefix) => prefix.clone(),
            UrlPrefix::Dynamic(f) => f(url),
        }
    }
}

impl fmt::Debug for UrlPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlPrefix::Static(prefix) => f.debug_tuple("Static").field(prefix).finish(),
            UrlPrefix::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for UrlPrefix {
    fn from(prefix: &str) -> Self {
        UrlPrefix::Static(prefix.to_string())
    }
}

impl From<String> for UrlPrefix {
    fn from(prefix: String) -> Self {
        UrlPrefix::Static(prefix)
    }
}

// Only static prefixes can come from configuration files.
impl<'de> Deserialize<'de> for UrlPrefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(UrlPrefix::Static)
    }
}

// A value of the wrong shape reads as the field's default.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        log::warn!("Ignoring option value of unexpected shape: {}", e);
        T::default()
    }))
}

// Present keys are always applied, falling back to the default on a bad shape.
fn lenient_some<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient(deserializer).map(Some)
}

/// Partial update of [`Colors`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColorsPatch {
    #[serde(deserialize_with = "lenient_some")]
    pub origin: Option<String>,
    #[serde(deserialize_with = "lenient_some")]
    pub tearline: Option<String>,
    #[serde(deserialize_with = "lenient_some")]
    pub tagline: Option<String>,
}

impl ColorsPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the origin line color.
    pub fn origin(mut self, color: impl Into<String>) -> Self {
        self.origin = Some(color.into());
        self
    }

    /// Set the tearline color.
    pub fn tearline(mut self, color: impl Into<String>) -> Self {
        self.tearline = Some(color.into());
        self
    }

    /// Set the tagline color.
    pub fn tagline(mut self, color: impl Into<String>) -> Self {
        self.tagline = Some(color.into());
        self
    }
}

impl From<Colors> for ColorsPatch {
    fn from(colors: Colors) -> Self {
        Self {
            origin: Some(colors.origin),
            tearline: Some(colors.tearline),
            tagline: Some(colors.tagline),
        }
    }
}

/// Partial update for [`ConvertOptions`].
///
/// Loaded from JSON, a value of the wrong shape turns its feature off:
/// `"file_url_parts": "nope"` switches attachments back to data URIs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptionsPatch {
    #[serde(deserialize_with = "lenient_some")]
    pub data_mode: Option<bool>,
    #[serde(deserialize_with = "lenient_some")]
    pub font_color: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub colors: ColorsPatch,
    /// `Some(None)` switches back to data URIs
    #[serde(deserialize_with = "lenient_some")]
    pub file_url_parts: Option<Option<(String, String)>>,
    /// Added to the current prefixes, replacing same-scheme entries
    #[serde(deserialize_with = "lenient")]
    pub url_prefixes: HashMap<String, UrlPrefix>,
    #[serde(deserialize_with = "lenient_some")]
    pub schemes: Option<SchemeLists>,
}

impl OptionsPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set data mode.
    pub fn data_mode(mut self, enabled: bool) -> Self {
        self.data_mode = Some(enabled);
        self
    }

    /// Set font colors on or off.
    pub fn font_color(mut self, enabled: bool) -> Self {
        self.font_color = Some(enabled);
        self
    }

    /// Update some or all of the colors.
    pub fn colors(mut self, colors: impl Into<ColorsPatch>) -> Self {
        self.colors = colors.into();
        self
    }

    /// Replace the attachment URL parts.
    pub fn file_url_parts(mut self, parts: Option<(String, String)>) -> Self {
        self.file_url_parts = Some(parts);
        self
    }

    /// Add or replace URL prefixes.
    pub fn url_prefixes(mut self, prefixes: HashMap<String, UrlPrefix>) -> Self {
        self.url_prefixes = prefixes;
        self
    }

    /// Add or replace the URL prefix of one scheme.
    pub fn url_prefix(mut self, scheme: impl Into<String>, prefix: UrlPrefix) -> Self {
        self.url_prefixes.insert(scheme.into(), prefix);
        self
    }

    /// Replace the scheme allowlists.
    pub fn schemes(mut self, schemes: SchemeLists) -> Self {
        self.schemes = Some(schemes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(!options.data_mode);
        assert!(!options.font_color);
        assert!(options.file_url_parts.is_none());
        assert!(options.schemes.lone.contains(&"netmail".to_string()));
        assert_eq!(options.schemes.lone, options.schemes.inline);
    }

    #[test]
    fn test_url_prefix_fallback() {
        let options = ConvertOptions::new()
            .with_url_prefix("area", UrlPrefix::from("/echo?"))
            .with_url_prefix("*", UrlPrefix::dynamic(|url| format!("/go?{}#", url.len())));

        assert_eq!(options.url_prefix("area", "area://X"), "/echo?");
        assert_eq!(options.url_prefix("http", "http://a"), "/go?8#");
        assert_eq!(ConvertOptions::new().url_prefix("http", "http://a"), "");
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let options = ConvertOptions::new()
            .with_font_color(true)
            .with_file_url_parts("/files/", "?raw");
        let merged = options.merge(OptionsPatch::new().data_mode(true));

        assert!(merged.data_mode);
        assert!(merged.font_color);
        assert_eq!(
            merged.file_url_parts,
            Some(("/files/".to_string(), "?raw".to_string()))
        );

        let cleared = merged.merge(OptionsPatch::new().file_url_parts(None));
        assert!(cleared.file_url_parts.is_none());
    }

    #[test]
    fn test_from_json() {
        let options = ConvertOptions::from_json(
            r##"{
                "data_mode": true,
                "colors": { "origin": "red" },
                "url_prefixes": { "*": "/out?" },
                "schemes": { "lone": ["http"] }
            }"##,
        )
        .unwrap();

        assert!(options.data_mode);
        assert_eq!(options.colors.origin, "red");
        assert_eq!(options.colors.tagline, "#808080");
        assert_eq!(options.url_prefix("ftp", "ftp://x"), "/out?");
        assert_eq!(options.schemes.lone, vec!["http".to_string()]);
        assert_eq!(options.schemes.inline, SchemeLists::default().inline);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            ConvertOptions::from_json("{\"data_mode\": "),
            Err(Error::Options(_))
        ));
        assert!(matches!(
            ConvertOptions::from_json("true"),
            Err(Error::Options(_))
        ));
    }

    #[test]
    fn test_from_json_wrong_shapes_disable() {
        let options = ConvertOptions::from_json(
            r##"{
                "data_mode": 1,
                "font_color": "yes",
                "file_url_parts": "nope",
                "url_prefixes": ["/out?"],
                "colors": { "origin": 5 }
            }"##,
        )
        .unwrap();

        assert!(!options.data_mode);
        assert!(!options.font_color);
        assert!(options.file_url_parts.is_none());
        assert!(options.url_prefixes.is_empty());
        assert_eq!(options.colors, Colors::default());
    }

    #[test]
    fn test_merge_colors_by_key() {
        let options = ConvertOptions::new().with_colors(Colors {
            origin: "red".into(),
            tearline: "red".into(),
            tagline: "red".into(),
        });
        let merged = options.merge(OptionsPatch::new().colors(ColorsPatch::new().tagline("blue")));

        assert_eq!(merged.colors.origin, "red");
        assert_eq!(merged.colors.tearline, "red");
        assert_eq!(merged.colors.tagline, "blue");
    }

    #[test]
    fn test_merge_url_prefixes_by_key() {
        let options = ConvertOptions::new()
            .with_url_prefix("*", UrlPrefix::from("/out?"))
            .with_url_prefix("area", UrlPrefix::from("/echo?"));
        let merged = options.merge(OptionsPatch::new().url_prefix("area", UrlPrefix::from("/gate?")));

        assert_eq!(merged.url_prefix("area", "area://X"), "/gate?");
        assert_eq!(merged.url_prefix("ftp", "ftp://x"), "/out?");
    }

    #[test]
    fn test_patch_from_json() {
        let patch: OptionsPatch = serde_json::from_str(
            r##"{ "colors": { "tagline": "blue" }, "file_url_parts": "nope", "data_mode": 1 }"##,
        )
        .unwrap();

        assert_eq!(patch.colors, ColorsPatch::new().tagline("blue"));
        assert_eq!(patch.file_url_parts, Some(None));
        assert_eq!(patch.data_mode, Some(false));
        assert!(patch.schemes.is_none());
        assert!(patch.url_prefixes.is_empty());
    }

    #[test]
    fn test_debug_hides_function() {
        let prefix = UrlPrefix::dynamic(|_| String::new());
        assert_eq!(format!("{:?}", prefix), "Dynamic(..)");
    }
}
