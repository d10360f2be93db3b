//! Viewset router that records every URL it produces in a [`RouteRegistry`].
//!
//! A viewset is registered once under a URL prefix and expanded into the
//! conventional list and detail routes, plus one route per extra action:
//!
//! | route          | pattern                                    | methods                                   |
//! |----------------|--------------------------------------------|-------------------------------------------|
//! | list           | `^{prefix}/$`                              | GET list, POST create                     |
//! | extra (list)   | `^{prefix}/{action}/$`                     | declared by the action                    |
//! | detail         | `^{prefix}/{lookup}/$`                     | GET retrieve, PUT update, PATCH partial_update, DELETE destroy |
//! | extra (detail) | `^{prefix}/{lookup}/{action}/$`            | declared by the action                    |
//!
//! Only methods whose handler exists on the viewset are bound. A route left
//! with no method produces neither a URL nor documentation.

use crate::registry::{Callback, RouteRegistry, UrlPattern};
use crate::view::{ApiView, HttpMethod, MethodMap};
use log::debug;
use std::sync::Arc;

const DEFAULT_LOOKUP_FIELD: &str = "pk";
const DEFAULT_LOOKUP_VALUE_REGEX: &str = "[^/.]+";

/// A custom action routed next to the standard ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraAction {
    /// Handler method name, also used as the URL segment
    pub name: String,
    pub methods: Vec<HttpMethod>,
    /// Routed under the lookup segment when true
    pub detail: bool,
}

impl ExtraAction {
    pub fn new(name: impl Into<String>, methods: Vec<HttpMethod>, detail: bool) -> Self {
        Self {
            name: name.into(),
            methods,
            detail,
        }
    }
}

/// A view exposing the standard collection actions
#[derive(Clone)]
pub struct ViewSet {
    pub view: Arc<dyn ApiView>,
    pub extra_actions: Vec<ExtraAction>,
    pub lookup_field: String,
    pub lookup_value_regex: String,
}

impl ViewSet {
    pub fn new(view: Arc<dyn ApiView>) -> Self {
        Self {
            view,
            extra_actions: Vec::new(),
            lookup_field: DEFAULT_LOOKUP_FIELD.to_string(),
            lookup_value_regex: DEFAULT_LOOKUP_VALUE_REGEX.to_string(),
        }
    }

    pub fn with_extra_action(mut self, action: ExtraAction) -> Self {
        self.extra_actions.push(action);
        self
    }

    pub fn with_lookup(mut self, field: impl Into<String>, value_regex: impl Into<String>) -> Self {
        self.lookup_field = field.into();
        self.lookup_value_regex = value_regex.into();
        self
    }

    fn lookup_regex(&self) -> String {
        format!("(?P<{}>{})", self.lookup_field, self.lookup_value_regex)
    }
}

struct Route {
    url: String,
    mapping: Vec<(HttpMethod, String)>,
    name: String,
}

/// Router expanding registered viewsets into URL patterns
pub struct SwaggerRouter {
    registry: Vec<(String, ViewSet, String)>,
    trailing_slash: bool,
}

impl SwaggerRouter {
    pub fn new() -> Self {
        Self {
            registry: Vec::new(),
            trailing_slash: true,
        }
    }

    pub fn with_trailing_slash(mut self, trailing_slash: bool) -> Self {
        self.trailing_slash = trailing_slash;
        self
    }

    /// Adds `viewset` under `prefix`.
    ///
    /// `basename` names the generated routes; it defaults to the lowercased
    /// view name without its `ViewSet` or `View` suffix.
    pub fn register(&mut self, prefix: impl Into<String>, viewset: ViewSet, basename: Option<&str>) {
        let basename = basename
            .map(str::to_string)
            .unwrap_or_else(|| default_basename(viewset.view.as_ref()));
        self.registry.push((prefix.into(), viewset, basename));
    }

    /// Builds the URL patterns of every registered viewset.
    ///
    /// Each produced pattern is also recorded in `routes` together with its
    /// method mapping.
    pub fn get_urls(&self, routes: &mut RouteRegistry) -> Vec<UrlPattern> {
        let trailing_slash = if self.trailing_slash { "/" } else { "" };
        let mut urls = Vec::new();

        for (prefix, viewset, basename) in &self.registry {
            for route in get_routes(prefix, viewset, basename, trailing_slash) {
                let mapping = get_method_map(viewset.view.as_ref(), &route.mapping);
                if mapping.is_empty() {
                    debug!("No handlers bound for {}, skipping", route.url);
                    continue;
                }

                let pattern = UrlPattern::new(route.url, Some(Callback::View(Arc::clone(&viewset.view))))
                    .with_name(route.name);
                routes.register(&pattern, mapping);
                urls.push(pattern);
            }
        }

        urls
    }
}

impl Default for SwaggerRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn default_basename(view: &dyn ApiView) -> String {
    let name = view.name();
    let name = name.strip_suffix("ViewSet").unwrap_or(name);
    let name = name.strip_suffix("View").unwrap_or(name);
    name.to_lowercase()
}

fn standard_mapping(pairs: &[(HttpMethod, &str)]) -> Vec<(HttpMethod, String)> {
    pairs.iter().map(|(m, h)| (*m, h.to_string())).collect()
}

fn extra_routes(
    viewset: &ViewSet,
    detail: bool,
    base: &str,
    basename: &str,
    trailing_slash: &str,
) -> Vec<Route> {
    viewset
        .extra_actions
        .iter()
        .filter(|action| action.detail == detail)
        .map(|action| Route {
            url: format!("{}/{}{}$", base, action.name, trailing_slash),
            mapping: action
                .methods
                .iter()
                .map(|method| (*method, action.name.clone()))
                .collect(),
            name: format!("{}-{}", basename, action.name.replace('_', "-")),
        })
        .collect()
}

fn get_routes(prefix: &str, viewset: &ViewSet, basename: &str, trailing_slash: &str) -> Vec<Route> {
    let list_base = format!("^{}", prefix);
    let detail_base = format!("^{}/{}", prefix, viewset.lookup_regex());

    let mut routes = vec![Route {
        url: format!("{}{}$", list_base, trailing_slash),
        mapping: standard_mapping(&[(HttpMethod::Get, "list"), (HttpMethod::Post, "create")]),
        name: format!("{}-list", basename),
    }];
    routes.extend(extra_routes(viewset, false, &list_base, basename, trailing_slash));

    routes.push(Route {
        url: format!("{}{}$", detail_base, trailing_slash),
        mapping: standard_mapping(&[
            (HttpMethod::Get, "retrieve"),
            (HttpMethod::Put, "update"),
            (HttpMethod::Patch, "partial_update"),
            (HttpMethod::Delete, "destroy"),
        ]),
        name: format!("{}-detail", basename),
    });
    routes.extend(extra_routes(viewset, true, &detail_base, basename, trailing_slash));

    routes
}

/// Keeps the mapping entries whose handler exists on `view`
fn get_method_map(view: &dyn ApiView, mapping: &[(HttpMethod, String)]) -> MethodMap {
    mapping
        .iter()
        .filter(|(_, handler)| view.has_handler(handler))
        .map(|(method, handler)| (*method, handler.as_str()))
        .collect()
}
