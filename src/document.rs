//! The generated documentation model.
//!
//! Field names follow the Swagger 1.x resource listing conventions
//! (`httpMethod`, `paramType`, `allowableValues`, ...).

use crate::view::HttpMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete generated documentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// One entry per endpoint, in registration order
    pub paths: Vec<ApiDoc>,
    /// Serializer models keyed by serializer name
    pub models: BTreeMap<String, Model>,
}

/// Documentation of one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDoc {
    pub path: String,
    pub description: String,
    pub operations: Vec<Operation>,
}

/// Documentation of one HTTP method on an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub http_method: HttpMethod,
    pub summary: String,
    pub nickname: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
}

/// Where a parameter is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Path,
    Body,
    Form,
    Query,
}

/// One documented input of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub param_type: ParamType,
    pub name: String,
    /// Type label; empty for untyped query parameters
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowable_values: Option<AllowableValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl Parameter {
    /// Required string parameter taken from the path template
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            param_type: ParamType::Path,
            name: name.into(),
            data_type: "string".to_string(),
            required: Some(true),
            allowable_values: None,
            description: None,
            default_value: None,
        }
    }

    /// Whole-payload parameter typed by a serializer
    pub fn body(serializer_name: &str) -> Self {
        Self {
            param_type: ParamType::Body,
            name: serializer_name.to_string(),
            data_type: serializer_name.to_string(),
            required: None,
            allowable_values: None,
            description: None,
            default_value: None,
        }
    }

    /// Untyped query parameter documented by an annotation line
    pub fn query(name: &str, description: &str) -> Self {
        Self {
            param_type: ParamType::Query,
            name: name.to_string(),
            data_type: String::new(),
            required: None,
            allowable_values: None,
            description: Some(description.to_string()),
            default_value: None,
        }
    }
}

/// Kind of constraint described by [`AllowableValues`] and [`PropertyValues`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    #[default]
    Range,
}

/// Closed length range of a form parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowableValues {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub value_type: ValueType,
}

impl AllowableValues {
    pub fn range(min: Option<u64>, max: Option<u64>) -> Self {
        Self {
            min,
            max,
            value_type: ValueType::Range,
        }
    }
}

/// Constraints of a model property. Every key is always written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValues {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub default_value: Option<serde_json::Value>,
    pub read_only: Option<bool>,
    pub value_type: ValueType,
}

/// Shape of a serializer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub properties: BTreeMap<String, ModelProperty>,
}

/// One field of a [`Model`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProperty {
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub required: Option<bool>,
    pub allowable_values: PropertyValues,
}
