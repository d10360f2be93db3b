//! Route registry: the list of documentable endpoints of an application.
//!
//! The registry is filled once while the application declares its routes and is
//! read afterwards by the documentation generator. It is an ordinary value owned
//! by the application, so tests can build as many as they like.

use crate::view::{ApiView, MethodMap, ViewKind};
use log::debug;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Target a URL pattern dispatches to.
#[derive(Clone)]
pub enum Callback {
    /// A structured API view that can be introspected
    View(Arc<dyn ApiView>),
    /// Any other handler, known only by name
    Function(String),
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::View(view) => f.debug_tuple("View").field(&view.name()).finish(),
            Callback::Function(name) => f.debug_tuple("Function").field(name).finish(),
        }
    }
}

/// One entry of the application's URL table.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    /// Matching pattern, e.g. `^widgets/(?P<pk>[^/.]+)/$` or `widgets/<int:pk>/`
    pub regex: String,
    pub callback: Option<Callback>,
    pub name: Option<String>,
}

impl UrlPattern {
    pub fn new(regex: impl Into<String>, callback: Option<Callback>) -> Self {
        Self {
            regex: regex.into(),
            callback,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A documentable route.
#[derive(Clone)]
pub struct Endpoint {
    /// Normalized path template, e.g. `/widgets/{pk}/`
    pub path: String,
    /// The pattern the endpoint was registered from
    pub pattern: String,
    pub callback: Arc<dyn ApiView>,
    pub methods: MethodMap,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("path", &self.path)
            .field("pattern", &self.pattern)
            .field("callback", &self.callback.name())
            .field("methods", &self.methods)
            .finish()
    }
}

/// Ordered collection of documentable endpoints.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    endpoints: Vec<Endpoint>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pattern` served with `methods`.
    ///
    /// Patterns whose callback is missing, is not an API view, or is the
    /// documentation view itself are skipped. Returns whether an endpoint was
    /// added.
    pub fn register(&mut self, pattern: &UrlPattern, methods: MethodMap) -> bool {
        let Some(callback) = resolve_callback(pattern) else {
            debug!("Skipping undocumentable pattern: {}", pattern.regex);
            return false;
        };

        let path = normalize_path(&pattern.regex);
        debug!("Registering endpoint {} -> {}", path, callback.name());

        self.endpoints.push(Endpoint {
            path,
            pattern: pattern.regex.clone(),
            callback,
            methods,
        });
        true
    }

    /// All endpoints, or those whose path starts with `/` + `filter_path`.
    pub fn get_apis(&self, filter_path: Option<&str>) -> Vec<&Endpoint> {
        match filter_path {
            None => self.endpoints.iter().collect(),
            Some(prefix) => {
                let prefix = format!("/{}", prefix.trim_start_matches('/'));
                self.endpoints
                    .iter()
                    .filter(|endpoint| endpoint.path.starts_with(&prefix))
                    .collect()
            }
        }
    }

    /// Distinct placeholder-free paths with surrounding slashes stripped.
    ///
    /// These are the resource groupings of the documentation index.
    pub fn get_top_level_apis(&self) -> BTreeSet<String> {
        self.endpoints
            .iter()
            .map(|endpoint| endpoint.path.trim_matches('/'))
            .filter(|path| !path.contains('{'))
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Forgets every endpoint
    pub fn clear(&mut self) {
        self.endpoints.clear();
    }
}

fn resolve_callback(pattern: &UrlPattern) -> Option<Arc<dyn ApiView>> {
    match pattern.callback.as_ref()? {
        Callback::View(view) if view.kind() == ViewKind::Api => Some(Arc::clone(view)),
        _ => None,
    }
}

/// Turns a URL pattern into a path template with `{name}` placeholders.
pub fn normalize_path(pattern: &str) -> String {
    simplify_regex(&format!("/{}", pattern))
        .replace('<', "{")
        .replace('>', "}")
}

/// Reduces a URL regex to a readable path.
///
/// Named groups become `<name>`, other groups `<var>`, converter prefixes in
/// `<int:pk>` are dropped, and anchors, `?` and escapes are removed.
pub fn simplify_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                }
                i += 2;
            }
            '(' => {
                let end = closing_paren(&chars, i).unwrap_or(chars.len());
                let group: String = chars[i + 1..end].iter().collect();
                match group
                    .strip_prefix("?P<")
                    .and_then(|rest| rest.split_once('>'))
                {
                    Some((name, _)) => {
                        out.push('<');
                        out.push_str(name);
                        out.push('>');
                    }
                    None => out.push_str("<var>"),
                }
                i = end + 1;
            }
            '<' => {
                let end = chars[i..]
                    .iter()
                    .position(|&c| c == '>')
                    .map_or(chars.len(), |offset| i + offset);
                let inner: String = chars[i + 1..end].iter().collect();
                let name = inner.rsplit(':').next().unwrap_or_default();
                out.push('<');
                out.push_str(name);
                out.push('>');
                i = end + 1;
            }
            '^' | '$' | '?' => i += 1,
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    while out.contains("//") {
        out = out.replace("//", "/");
    }
    if !out.starts_with('/') {
        out.insert(0, '/');
    }
    out
}

/// Index of the `)` closing the group opened at `open`.
fn closing_paren(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::testing::StaticView;
    use crate::view::HttpMethod;

    fn view(name: &str) -> Callback {
        Callback::View(Arc::new(StaticView::new(name, Some("Docs."))))
    }

    fn get_only() -> MethodMap {
        [(HttpMethod::Get, "list")].into_iter().collect()
    }

    #[test]
    fn test_simplify_regex_named_groups() {
        assert_eq!(
            simplify_regex("^widgets/(?P<pk>[^/.]+)/$"),
            "/widgets/<pk>/"
        );
        assert_eq!(
            simplify_regex("^a/(?P<x>[0-9]+)/b/(?P<y>\\w+(\\.\\w+)?)$"),
            "/a/<x>/b/<y>"
        );
    }

    #[test]
    fn test_simplify_regex_unnamed_groups() {
        assert_eq!(simplify_regex("^files/([0-9]{4})/$"), "/files/<var>/");
    }

    #[test]
    fn test_simplify_regex_converters() {
        assert_eq!(simplify_regex("widgets/<int:pk>/"), "/widgets/<pk>/");
        assert_eq!(simplify_regex("widgets/<slug>/"), "/widgets/<slug>/");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("^items/(?P<id>[^/]+)/$"), "/items/{id}/");
        assert_eq!(normalize_path("^$"), "/");
        assert_eq!(normalize_path("/already/rooted"), "/already/rooted");
    }

    #[test]
    fn test_register_appends_endpoint() {
        let mut registry = RouteRegistry::new();
        let pattern = UrlPattern::new("^items/(?P<id>[^/]+)/$", Some(view("ItemDetail")));

        assert!(registry.register(&pattern, get_only()));
        assert_eq!(registry.len(), 1);

        let apis = registry.get_apis(None);
        assert_eq!(apis[0].path, "/items/{id}/");
        assert_eq!(apis[0].callback.name(), "ItemDetail");
        assert_eq!(apis[0].methods.get(HttpMethod::Get), Some("list"));
    }

    #[test]
    fn test_register_skips_undocumentable_patterns() {
        let mut registry = RouteRegistry::new();
        let docs_view = Callback::View(Arc::new(
            StaticView::new("SwaggerDocs", None).kind(ViewKind::Documentation),
        ));

        assert!(!registry.register(&UrlPattern::new("^none/$", None), get_only()));
        assert!(!registry.register(
            &UrlPattern::new("^plain/$", Some(Callback::Function("index".into()))),
            get_only()
        ));
        assert!(!registry.register(&UrlPattern::new("^docs/$", Some(docs_view)), get_only()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_apis_filters_by_prefix() {
        let mut registry = RouteRegistry::new();
        for pattern in ["^widgets/$", "^widgets/(?P<pk>[^/]+)/$", "^gadgets/$"] {
            registry.register(&UrlPattern::new(pattern, Some(view("V"))), get_only());
        }

        assert_eq!(registry.get_apis(None).len(), 3);
        assert_eq!(registry.get_apis(Some("widgets")).len(), 2);
        assert_eq!(registry.get_apis(Some("/widgets")).len(), 2);
        assert_eq!(registry.get_apis(Some("gadgets")).len(), 1);
        assert!(registry.get_apis(Some("nothing")).is_empty());
    }

    #[test]
    fn test_get_top_level_apis() {
        let mut registry = RouteRegistry::new();
        for pattern in [
            "^widgets/$",
            "^widgets/$",
            "^widgets/(?P<pk>[^/]+)/$",
            "^gadgets/recent/$",
        ] {
            registry.register(&UrlPattern::new(pattern, Some(view("V"))), get_only());
        }

        let top: Vec<_> = registry.get_top_level_apis().into_iter().collect();
        assert_eq!(top, vec!["gadgets/recent".to_string(), "widgets".to_string()]);
    }

    #[test]
    fn test_clear() {
        let mut registry = RouteRegistry::new();
        registry.register(&UrlPattern::new("^a/$", Some(view("A"))), get_only());
        registry.clear();
        assert!(registry.is_empty());
    }
}
