//! Documentation generator.
//!
//! Reconciles the sources of truth a registered endpoint offers (its path
//! template, the class docstring, the handler method docstrings and the fields
//! of its serializer) into one [`Document`]. Generation never fails: anything an
//! endpoint does not provide degrades to an empty or absent value.

use crate::docstring::{
    first_line, first_sentence, parse_from_docstring, strip_params_from_docstring,
    to_break_markers, trim_docstring, LINE_BREAK,
};
use crate::document::{
    AllowableValues, ApiDoc, Document, Model, ModelProperty, Operation, ParamType, Parameter,
    PropertyValues, ValueType,
};
use crate::registry::Endpoint;
use crate::view::{view_description, view_name, ApiView, HttpMethod, Serializer};
use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds documentation for registered endpoints.
///
/// # Example
///
/// ```no_run
/// use rest_swagger::docgen::DocumentationGenerator;
/// use rest_swagger::registry::RouteRegistry;
///
/// let registry = RouteRegistry::new();
/// let apis = registry.get_apis(None);
/// let document = DocumentationGenerator::new().document(&apis);
/// println!("{} paths", document.paths.len());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentationGenerator;

impl DocumentationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Paths and models for `apis` in one document
    pub fn document(&self, apis: &[&Endpoint]) -> Document {
        Document {
            paths: self.generate(apis),
            models: self.get_models(apis),
        }
    }

    /// One documentation entry per endpoint, in the given order
    pub fn generate(&self, apis: &[&Endpoint]) -> Vec<ApiDoc> {
        debug!("Generating documentation for {} endpoints", apis.len());

        apis.iter()
            .map(|api| ApiDoc {
                description: get_description(api.callback.as_ref()),
                path: api.path.clone(),
                operations: self.get_operations(api),
            })
            .collect()
    }

    fn get_operations(&self, api: &Endpoint) -> Vec<Operation> {
        let view = api.callback.as_ref();

        api.methods
            .iter()
            .map(|(http_method, view_method)| {
                debug!("Documenting {} {} ({})", http_method, api.path, view_method);

                let parameters = self.get_parameters(api, http_method, view_method);
                Operation {
                    http_method,
                    summary: get_method_docs(view, http_method, view_method),
                    nickname: view_name(view).replace(' ', "_"),
                    notes: get_notes(view, view_method),
                    response_class: view.serializer_class().map(|s| s.name().to_string()),
                    parameters: (!parameters.is_empty()).then_some(parameters),
                }
            })
            .collect()
    }

    /// Parameters of `http_method` on `api`: path, then form or body, then query.
    pub fn get_parameters(
        &self,
        api: &Endpoint,
        http_method: HttpMethod,
        view_method: &str,
    ) -> Vec<Parameter> {
        let view = api.callback.as_ref();
        let mut params = build_path_parameters(&api.path);

        if !http_method.is_bodyless() {
            if let Some(serializer) = view.serializer_class() {
                let form_params = build_form_parameters(
                    serializer.as_ref(),
                    http_method == HttpMethod::Patch,
                );
                if form_params.is_empty() {
                    params.push(Parameter::body(serializer.name()));
                } else {
                    params.extend(form_params);
                }
            }
        }

        let docstring = combined_docstring(view, view_method);
        params.extend(build_query_parameters(parse_from_docstring(&docstring)));

        params
    }

    /// Models of every distinct serializer referenced by `apis`
    pub fn get_models(&self, apis: &[&Endpoint]) -> BTreeMap<String, Model> {
        get_serializer_set(apis)
            .into_iter()
            .map(|serializer| {
                let name = serializer.name().to_string();
                debug!("Building model {}", name);
                let model = Model {
                    id: name.clone(),
                    properties: get_serializer_fields(serializer.as_ref()),
                };
                (name, model)
            })
            .collect()
    }
}

/// First sentence of the class description
fn get_description(view: &dyn ApiView) -> String {
    first_sentence(&view_description(view))
}

fn method_docstring(view: &dyn ApiView, view_method: &str) -> Option<String> {
    view.handler_doc(view_method)
}

/// Class description followed by the handler method docstring
fn combined_docstring(view: &dyn ApiView, view_method: &str) -> String {
    let mut docstring = view_description(view);
    if let Some(method_docs) = method_docstring(view, view_method).filter(|d| !d.is_empty()) {
        docstring.push('\n');
        docstring.push_str(&method_docs);
    }
    docstring
}

/// Summary line: a `METHOD -- summary` annotation wins, then the handler
/// docstring, then the class description.
fn get_method_docs(view: &dyn ApiView, http_method: HttpMethod, view_method: &str) -> String {
    let docstring = combined_docstring(view, view_method);
    if let Some((_, description)) =
        parse_from_docstring(&docstring).find(|(name, _)| *name == http_method.as_str())
    {
        return description.to_string();
    }

    let docs = method_docstring(view, view_method).unwrap_or_else(|| get_description(view));
    first_line(&trim_docstring(&docs))
}

fn get_notes(view: &dyn ApiView, view_method: &str) -> String {
    let class_notes = notes_from(&view_description(view));
    let method_notes = method_docstring(view, view_method)
        .map(|docs| notes_from(&docs))
        .unwrap_or_default();

    match (class_notes.is_empty(), method_notes.is_empty()) {
        (_, true) => class_notes,
        (true, false) => method_notes,
        (false, false) => format!("{}{}{}", class_notes, LINE_BREAK, method_notes),
    }
}

fn notes_from(docstring: &str) -> String {
    to_break_markers(&strip_params_from_docstring(&trim_docstring(docstring)))
}

fn build_path_parameters(path: &str) -> Vec<Parameter> {
    let mut params = Vec::new();
    let mut rest = path;

    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        params.push(Parameter::path(&after[..end]));
        rest = &after[end + 1..];
    }

    params
}

fn build_form_parameters(serializer: &dyn Serializer, force_optional: bool) -> Vec<Parameter> {
    serializer
        .get_fields()
        .into_iter()
        .filter(|(_, field)| !field.is_read_only())
        .map(|(name, field)| {
            let allowable_values = (field.min_length.is_some() || field.max_length.is_some())
                .then(|| AllowableValues::range(field.min_length, field.max_length));

            Parameter {
                param_type: ParamType::Form,
                name,
                data_type: field.type_label.unwrap_or_default(),
                required: if force_optional {
                    Some(false)
                } else {
                    field.required
                },
                allowable_values,
                description: field.help_text,
                default_value: field.default,
            }
        })
        .collect()
}

fn build_query_parameters<'a>(params: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<Parameter> {
    params
        .filter(|(name, _)| HttpMethod::from_token(name).is_none())
        .map(|(name, description)| Parameter::query(name, description))
        .collect()
}

fn get_serializer_fields(serializer: &dyn Serializer) -> BTreeMap<String, ModelProperty> {
    serializer
        .get_fields()
        .into_iter()
        .map(|(name, field)| {
            let property = ModelProperty {
                property_type: field.type_label,
                required: field.required,
                allowable_values: PropertyValues {
                    min: field.min_length,
                    max: field.max_length,
                    default_value: field.default,
                    read_only: field.read_only,
                    value_type: ValueType::Range,
                },
            };
            (name, property)
        })
        .collect()
}

/// Distinct serializers of `apis`, compared by identity
fn get_serializer_set(apis: &[&Endpoint]) -> Vec<Arc<dyn Serializer>> {
    let mut serializers: Vec<Arc<dyn Serializer>> = Vec::new();

    for api in apis {
        if let Some(serializer) = api.callback.serializer_class() {
            let seen = serializers
                .iter()
                .any(|known| Arc::as_ptr(known) as *const () == Arc::as_ptr(&serializer) as *const ());
            if !seen {
                serializers.push(serializer);
            }
        }
    }

    serializers
}
