//! Declarative description of an application's routing table.
//!
//! A manifest lists serializers, views, explicit URL patterns and viewset
//! registrations. Loading one yields [`ApiView`] and [`Serializer`]
//! implementations that answer the generator's questions from the manifest.
//!
//! ```yaml
//! serializers:
//!   WidgetSerializer:
//!     - name: name
//!       type: string
//!       required: true
//!       max_length: 50
//! views:
//!   WidgetViewSet:
//!     doc: |
//!       Widgets.
//!     serializer: WidgetSerializer
//!     handlers:
//!       list: Lists widgets.
//!       create: ~
//! urls:
//!   - pattern: ^health/$
//!     view: HealthView
//!     methods: {get: get}
//! viewsets:
//!   - prefix: widgets
//!     viewset: WidgetViewSet
//! ```

use crate::error::{Error, Result};
use crate::registry::{Callback, RouteRegistry, UrlPattern};
use crate::router::{ExtraAction, SwaggerRouter, ViewSet};
use crate::view::{ApiView, Field, HttpMethod, MethodMap, Serializer, ViewKind};
use log::{debug, info};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed manifest file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Serializer name to ordered field list
    #[serde(default)]
    pub serializers: BTreeMap<String, Vec<FieldSpec>>,
    #[serde(default)]
    pub views: BTreeMap<String, ViewSpec>,
    #[serde(default)]
    pub urls: Vec<UrlSpec>,
    #[serde(default)]
    pub viewsets: Vec<ViewSetSpec>,
    #[serde(default = "default_trailing_slash")]
    pub trailing_slash: bool,
}

fn default_trailing_slash() -> bool {
    true
}

/// A named serializer field
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub field: Field,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub serializer: Option<String>,
    /// Handler method name to its docstring; `~` for an undocumented handler
    #[serde(default)]
    pub handlers: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub kind: ViewKind,
}

/// An explicit URL pattern
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlSpec {
    pub pattern: String,
    /// Name of the view; a pattern without one is a plain, undocumented handler
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub methods: MethodMap,
    #[serde(default)]
    pub name: Option<String>,
}

/// A router registration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSetSpec {
    pub prefix: String,
    pub viewset: String,
    #[serde(default)]
    pub basename: Option<String>,
    #[serde(default)]
    pub lookup_field: Option<String>,
    #[serde(default)]
    pub lookup_value_regex: Option<String>,
    #[serde(default)]
    pub extra_actions: Vec<ExtraActionSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraActionSpec {
    pub name: String,
    #[serde(default = "default_action_methods")]
    pub methods: Vec<HttpMethod>,
    #[serde(default)]
    pub detail: bool,
}

fn default_action_methods() -> Vec<HttpMethod> {
    vec![HttpMethod::Get]
}

/// Serializer backed by a manifest entry
#[derive(Debug)]
pub struct ManifestSerializer {
    name: String,
    fields: Vec<(String, Field)>,
}

impl Serializer for ManifestSerializer {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_fields(&self) -> Vec<(String, Field)> {
        self.fields.clone()
    }
}

/// View backed by a manifest entry
pub struct ManifestView {
    name: String,
    spec: ViewSpec,
    serializer: Option<Arc<dyn Serializer>>,
}

impl ApiView for ManifestView {
    fn name(&self) -> &str {
        &self.name
    }

    fn docstring(&self) -> Option<&str> {
        self.spec.doc.as_deref()
    }

    fn handler_doc(&self, handler: &str) -> Option<String> {
        self.spec.handlers.get(handler).cloned().flatten()
    }

    fn has_handler(&self, handler: &str) -> bool {
        self.spec.handlers.contains_key(handler)
    }

    fn serializer_class(&self) -> Option<Arc<dyn Serializer>> {
        self.serializer.clone()
    }

    fn kind(&self) -> ViewKind {
        self.spec.kind
    }
}

impl Manifest {
    /// Loads a manifest, choosing the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("Loading manifest: {}", path.display());
        let content = fs::read_to_string(path)?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
        let parsed = match extension {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            "json" => Self::from_json_str(&content),
            _ => return Err(Error::UnsupportedFormat(path.to_path_buf())),
        };

        parsed.map_err(|err| match err {
            Error::ManifestError { message, .. } => Error::ManifestError {
                file: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Instantiates every view, resolving serializer references.
    ///
    /// Views sharing a serializer name share one serializer instance.
    pub fn build_views(&self) -> Result<HashMap<String, Arc<ManifestView>>> {
        let serializers: HashMap<&str, Arc<dyn Serializer>> = self
            .serializers
            .iter()
            .map(|(name, fields)| {
                let serializer: Arc<dyn Serializer> = Arc::new(ManifestSerializer {
                    name: name.clone(),
                    fields: fields
                        .iter()
                        .map(|spec| (spec.name.clone(), spec.field.clone()))
                        .collect(),
                });
                (name.as_str(), serializer)
            })
            .collect();

        let mut views = HashMap::new();
        for (name, spec) in &self.views {
            let serializer = match spec.serializer.as_deref() {
                None => None,
                Some(wanted) => Some(serializers.get(wanted).cloned().ok_or_else(|| {
                    Error::UnknownSerializer {
                        view: name.clone(),
                        serializer: wanted.to_string(),
                    }
                })?),
            };

            let view = ManifestView {
                name: name.clone(),
                spec: spec.clone(),
                serializer,
            };
            views.insert(name.clone(), Arc::new(view));
        }

        Ok(views)
    }

    /// Declares the manifest's routes, recording them in `registry`.
    ///
    /// Returns the URL patterns in declaration order: explicit URLs first,
    /// then router-generated ones.
    pub fn register_into(&self, registry: &mut RouteRegistry) -> Result<Vec<UrlPattern>> {
        let views = self.build_views()?;
        let lookup = |name: &str| -> Result<Arc<dyn ApiView>> {
            views
                .get(name)
                .map(|view| Arc::clone(view) as Arc<dyn ApiView>)
                .ok_or_else(|| Error::UnknownView(name.to_string()))
        };

        let mut patterns = Vec::new();

        for url in &self.urls {
            let callback = match url.view.as_deref() {
                Some(name) => Callback::View(lookup(name)?),
                None => Callback::Function(url.pattern.clone()),
            };
            let mut pattern = UrlPattern::new(url.pattern.clone(), Some(callback));
            if let Some(name) = &url.name {
                pattern = pattern.with_name(name.clone());
            }
            registry.register(&pattern, url.methods.clone());
            patterns.push(pattern);
        }

        let mut router = SwaggerRouter::new().with_trailing_slash(self.trailing_slash);
        for spec in &self.viewsets {
            let mut viewset = ViewSet::new(lookup(&spec.viewset)?);
            if spec.lookup_field.is_some() || spec.lookup_value_regex.is_some() {
                let field = spec.lookup_field.clone().unwrap_or(viewset.lookup_field.clone());
                let value = spec
                    .lookup_value_regex
                    .clone()
                    .unwrap_or(viewset.lookup_value_regex.clone());
                viewset = viewset.with_lookup(field, value);
            }
            for action in &spec.extra_actions {
                viewset = viewset.with_extra_action(ExtraAction::new(
                    action.name.clone(),
                    action.methods.clone(),
                    action.detail,
                ));
            }
            router.register(spec.prefix.clone(), viewset, spec.basename.as_deref());
        }
        patterns.extend(router.get_urls(registry));

        info!(
            "Declared {} URL patterns, {} documentable",
            patterns.len(),
            registry.len()
        );
        Ok(patterns)
    }
}

/// Loads every manifest in `paths` into one registry.
pub fn load_registry(paths: &[PathBuf]) -> Result<RouteRegistry> {
    let mut registry = RouteRegistry::new();
    for path in paths {
        Manifest::from_path(path)?.register_into(&mut registry)?;
    }
    Ok(registry)
}
