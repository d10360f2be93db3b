//! Capability model for documented handlers and their serializers.
//!
//! The generator never invokes a handler. It only asks it questions: what is your
//! docstring, which handler methods do you have, which serializer describes your
//! payload. Every capability is optional and a missing answer is expressed as
//! `None`, which the generator turns into an empty or absent value.

use crate::docstring::trim_docstring;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// HTTP methods a route can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Uppercase wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Recognises an exact uppercase method token such as `GET`.
    ///
    /// Used on docstring annotation names, where `get -- ...` is an ordinary
    /// parameter and only `GET -- ...` overrides the summary.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            "TRACE" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    /// Whether requests with this method carry no body worth documenting
    pub fn is_bodyless(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        HttpMethod::from_token(&value.to_uppercase())
            .ok_or_else(|| format!("unknown HTTP method: {}", value))
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Ordered mapping from HTTP method to the handler method that serves it.
///
/// Declaration order is kept because it decides the order of operations in the
/// generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodMap {
    entries: Vec<(HttpMethod, String)>,
}

impl MethodMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `method` to `handler`, replacing an earlier mapping for the same method
    pub fn insert(&mut self, method: HttpMethod, handler: impl Into<String>) {
        let handler = handler.into();
        match self.entries.iter_mut().find(|(m, _)| *m == method) {
            Some(entry) => entry.1 = handler,
            None => self.entries.push((method, handler)),
        }
    }

    pub fn get(&self, method: HttpMethod) -> Option<&str> {
        self.entries
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, handler)| handler.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (HttpMethod, &str)> {
        self.entries.iter().map(|(m, h)| (*m, h.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(HttpMethod, S)> for MethodMap {
    fn from_iter<I: IntoIterator<Item = (HttpMethod, S)>>(iter: I) -> Self {
        let mut map = MethodMap::new();
        for (method, handler) in iter {
            map.insert(method, handler);
        }
        map
    }
}

struct MethodMapVisitor;

impl<'de> Visitor<'de> for MethodMapVisitor {
    type Value = MethodMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of HTTP method to handler name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MethodMap, A::Error> {
        let mut map = MethodMap::new();
        while let Some((method, handler)) = access.next_entry::<HttpMethod, String>()? {
            map.insert(method, handler);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for MethodMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MethodMapVisitor)
    }
}

/// Introspected attributes of one serializer field. Unset attributes are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Field {
    #[serde(default, rename = "type")]
    pub type_label: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub read_only: Option<bool>,
    #[serde(default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub max_length: Option<u64>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub help_text: Option<String>,
}

impl Field {
    pub fn new(type_label: impl Into<String>) -> Self {
        Self {
            type_label: Some(type_label.into()),
            ..Self::default()
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }
}

/// A payload description whose fields can be enumerated.
pub trait Serializer: Send + Sync {
    /// Class name, used as the model id and as `responseClass`
    fn name(&self) -> &str;

    /// Fields in declaration order
    fn get_fields(&self) -> Vec<(String, Field)>;
}

/// What kind of handler a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// A structured API view, documented by the generator
    #[default]
    Api,
    /// The view serving the documentation itself; never documented
    Documentation,
}

/// A documentable handler class.
pub trait ApiView: Send + Sync {
    /// Class name, e.g. `WidgetViewSet`
    fn name(&self) -> &str;

    /// Raw class docstring, if the class has one
    fn docstring(&self) -> Option<&str>;

    /// Docstring of the handler method `handler` (e.g. `list`).
    ///
    /// `None` when the method does not exist or has no docstring.
    fn handler_doc(&self, handler: &str) -> Option<String>;

    /// Whether the class defines the handler method `handler`
    fn has_handler(&self, handler: &str) -> bool;

    /// Serializer describing the payload, if the class exposes one
    fn serializer_class(&self) -> Option<Arc<dyn Serializer>> {
        None
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Api
    }
}

/// Human readable view name: `WidgetListView` becomes `Widget List`.
pub fn view_name(view: &dyn ApiView) -> String {
    let name = view.name();
    let name = name.strip_suffix("View").unwrap_or(name);
    let name = name.strip_suffix("ViewSet").unwrap_or(name);
    camelcase_to_spaces(name)
}

/// The class docstring with common indentation removed; empty when there is none.
pub fn view_description(view: &dyn ApiView) -> String {
    view.docstring().map(trim_docstring).unwrap_or_default()
}

fn camelcase_to_spaces(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let after_lower = chars[i - 1].is_lowercase();
            let before_lower = chars.get(i + 1).map_or(false, |n| !n.is_uppercase());
            if after_lower || before_lower {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out.trim().to_string()
}
