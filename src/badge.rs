//! Badge locator construction.
//!
//! A [`BadgeSpec`] is turned into the provider URL without any I/O:
//!
//! ```text
//! <root>/<label>-<message>-<color>.svg[?logo=<data uri>]
//! ```
//!
//! The provider has its own escaping rules inside the path (`_` renders as
//! a space, `__` as an underscore, `--` as a dash). Those are passed through
//! untouched so users can rely on them.

use crate::logos::LogoRegistry;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default badge provider root
pub const DEFAULT_PROVIDER_ROOT: &str = "https://img.shields.io/badge";

/// Characters left alone by a browser's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The editable fields of a badge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeSpec {
    pub label: String,
    pub message: String,
    /// Hex (with or without `#`) or a color name the provider understands
    pub color: String,
    /// Logo preset id; empty means no logo
    pub logo_id: String,
}

impl BadgeSpec {
    pub fn new(label: impl Into<String>, message: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
            color: color.into(),
            logo_id: String::new(),
        }
    }

    pub fn with_logo(mut self, logo_id: impl Into<String>) -> Self {
        self.logo_id = logo_id.into();
        self
    }

    /// Color as it appears in the locator: one leading `#` stripped.
    ///
    /// Anything else is passed through verbatim, including characters that
    /// are not valid in a path segment.
    pub fn color_segment(&self) -> &str {
        self.color.strip_prefix('#').unwrap_or(&self.color)
    }
}

/// A fully encoded badge URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn snippet(&self, kind: Snippet) -> String {
        kind.render(self)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Textual representations a locator can be copied as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snippet {
    Url,
    Markdown,
    Html,
}

impl Snippet {
    pub const ALL: [Snippet; 3] = [Snippet::Url, Snippet::Markdown, Snippet::Html];

    pub fn render(self, locator: &Locator) -> String {
        match self {
            Snippet::Url => locator.to_string(),
            Snippet::Markdown => format!("![Badge]({})", locator),
            Snippet::Html => format!("<img src=\"{}\" alt=\"Badge\" />", locator),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Snippet::Url => "URL",
            Snippet::Markdown => "Markdown",
            Snippet::Html => "HTML",
        }
    }
}

/// Builds locators against a configurable provider root.
#[derive(Debug, Clone)]
pub struct LocatorBuilder {
    root: String,
}

impl Default for LocatorBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER_ROOT)
    }
}

impl LocatorBuilder {
    pub fn new(root: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn build(&self, spec: &BadgeSpec, logos: &LogoRegistry) -> Locator {
        let mut url = format!(
            "{}/{}-{}-{}.svg",
            self.root,
            encode_text(&spec.label),
            encode_text(&spec.message),
            spec.color_segment()
        );

        if let Some(data_uri) = logos.data_uri(&spec.logo_id) {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("logo", &data_uri)
                .finish();
            url.push('?');
            url.push_str(&query);
        }

        Locator(url)
    }
}

/// Build a locator against the default provider root.
pub fn build(spec: &BadgeSpec, logos: &LogoRegistry) -> Locator {
    LocatorBuilder::default().build(spec, logos)
}

/// Replace whitespace runs with the `%20` token, then percent-encode the
/// whole field as a URI component (so the token itself becomes `%2520`).
fn encode_text(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                collapsed.push_str("%20");
            }
            in_space = true;
        } else {
            collapsed.push(ch);
            in_space = false;
        }
    }
    utf8_percent_encode(&collapsed, COMPONENT).to_string()
}
