use pretty_assertions::assert_eq;
use rest_swagger::{
    docgen::DocumentationGenerator,
    document::{Document, ParamType, Parameter},
    manifest::{load_registry, Manifest},
    registry::RouteRegistry,
    scanner::ManifestScanner,
    serializer::{serialize_json, serialize_yaml},
    view::HttpMethod,
};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn store_registry() -> RouteRegistry {
    let manifest = Manifest::from_path(&fixture("store.yaml")).expect("Failed to load fixture");
    let mut registry = RouteRegistry::new();
    manifest
        .register_into(&mut registry)
        .expect("Failed to register routes");
    registry
}

fn store_document() -> Document {
    let registry = store_registry();
    DocumentationGenerator::new().document(&registry.get_apis(None))
}

fn names(params: &[Parameter]) -> Vec<(ParamType, &str)> {
    params.iter().map(|p| (p.param_type, p.name.as_str())).collect()
}

#[test]
fn test_registry_excludes_undocumentable_routes() {
    let registry = store_registry();

    let paths: Vec<_> = registry
        .get_apis(None)
        .iter()
        .map(|api| api.path.clone())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/orders/",
            "/health/",
            "/products/",
            "/products/{pk}/",
            "/products/{pk}/discontinue/",
        ]
    );

    let top: Vec<_> = registry.get_top_level_apis().into_iter().collect();
    assert_eq!(top, vec!["health", "orders", "products"]);

    assert_eq!(registry.get_apis(Some("products")).len(), 3);
}

#[test]
fn test_product_list_operation() {
    let document = store_document();
    let products = &document.paths[2];

    assert_eq!(products.path, "/products/");
    assert_eq!(products.description, "Products on sale");

    let list = &products.operations[0];
    assert_eq!(list.http_method, HttpMethod::Get);
    assert_eq!(list.summary, "List products.");
    assert_eq!(list.nickname, "Product");
    assert_eq!(list.response_class.as_deref(), Some("ProductSerializer"));
    assert_eq!(
        list.notes,
        "Products on sale. Updated hourly.<br/><br/>Every product has a unique SKU.<br/>List products."
    );
    assert_eq!(
        names(list.parameters.as_ref().unwrap()),
        vec![(ParamType::Query, "category"), (ParamType::Query, "page")]
    );
}

#[test]
fn test_product_create_form_parameters() {
    let document = store_document();
    let create = &document.paths[2].operations[1];

    assert_eq!(create.http_method, HttpMethod::Post);
    assert_eq!(create.summary, "Products on sale");

    let params = create.parameters.as_ref().unwrap();
    assert_eq!(
        names(params),
        vec![
            (ParamType::Form, "title"),
            (ParamType::Form, "sku"),
            (ParamType::Form, "price"),
            (ParamType::Query, "category"),
        ]
    );

    let value = serde_json::to_value(&params[1]).unwrap();
    assert_eq!(
        value,
        json!({
            "paramType": "form",
            "name": "sku",
            "dataType": "string",
            "required": true,
            "allowableValues": {"min": 4, "max": 12, "valueType": "RANGE"}
        })
    );
    assert_eq!(params[0].description.as_deref(), Some("Product title"));
    assert_eq!(params[2].default_value, Some(json!(0)));
    assert_eq!(params[2].allowable_values, None);
}

#[test]
fn test_product_detail_operations() {
    let document = store_document();
    let detail = &document.paths[3];

    let methods: Vec<_> = detail.operations.iter().map(|op| op.http_method).collect();
    assert_eq!(
        methods,
        vec![HttpMethod::Get, HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete]
    );

    for op in &detail.operations {
        let params = op.parameters.as_ref().unwrap();
        assert_eq!(params[0], Parameter::path("pk"));
        if op.http_method.is_bodyless() {
            assert_eq!(params.len(), 2, "{} should only have path and query", op.http_method);
        }
    }

    let patch = &detail.operations[2];
    assert!(patch
        .parameters
        .as_ref()
        .unwrap()
        .iter()
        .filter(|p| p.param_type == ParamType::Form)
        .all(|p| p.required == Some(false)));
}

#[test]
fn test_extra_action_operation() {
    let document = store_document();
    let discontinue = &document.paths[4];

    assert_eq!(discontinue.operations.len(), 1);
    let op = &discontinue.operations[0];
    assert_eq!(op.http_method, HttpMethod::Post);
    assert_eq!(op.summary, "Mark the product as discontinued.");
    assert_eq!(op.parameters.as_ref().unwrap()[0], Parameter::path("pk"));
}

#[test]
fn test_orders_summary_override_and_body_parameter() {
    let document = store_document();
    let orders = &document.paths[0];

    assert_eq!(orders.description, "Orders");

    let get = &orders.operations[0];
    assert_eq!(get.summary, "Show recent orders.");
    assert_eq!(get.parameters, None);

    let post = &orders.operations[1];
    assert_eq!(post.summary, "Place an order");
    assert_eq!(
        post.parameters,
        Some(vec![Parameter::body("OrderSerializer")])
    );
}

#[test]
fn test_health_without_serializer() {
    let document = store_document();
    let health = &document.paths[1];

    let get = &health.operations[0];
    assert_eq!(get.summary, "Service health");
    assert_eq!(get.response_class, None);
    assert_eq!(get.parameters, None);
}

#[test]
fn test_models_section() {
    let document = store_document();

    let model_names: Vec<_> = document.models.keys().cloned().collect();
    assert_eq!(model_names, vec!["OrderSerializer", "ProductSerializer"]);
    assert!(document.models["OrderSerializer"].properties.is_empty());

    let product = serde_json::to_value(&document.models["ProductSerializer"]).unwrap();
    assert_eq!(product["id"], "ProductSerializer");
    assert_eq!(
        product["properties"]["id"],
        json!({
            "type": "integer",
            "required": null,
            "allowableValues": {
                "min": null,
                "max": null,
                "defaultValue": null,
                "readOnly": true,
                "valueType": "RANGE"
            }
        })
    );
    assert_eq!(product["properties"]["price"]["allowableValues"]["defaultValue"], 0);
}

#[test]
fn test_directory_of_manifests() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    for name in ["store.yaml", "accounts.json"] {
        std::fs::copy(fixture(name), temp_dir.path().join(name)).expect("Failed to copy fixture");
    }

    let scan = ManifestScanner::new(temp_dir.path().to_path_buf())
        .scan()
        .expect("Failed to scan directory");
    assert_eq!(scan.manifests.len(), 2);

    let registry = load_registry(&scan.manifests).expect("Failed to load manifests");
    assert_eq!(registry.len(), 7);

    let accounts = registry.get_apis(Some("accounts"));
    let paths: Vec<_> = accounts.iter().map(|api| api.path.as_str()).collect();
    assert_eq!(paths, vec!["/accounts/", "/accounts/{username}/"]);

    let document = DocumentationGenerator::new().document(&accounts);
    assert_eq!(document.models.len(), 1);
    assert!(document.models.contains_key("AccountSerializer"));
}

#[test]
fn test_serialized_output() {
    let document = store_document();

    let json = serialize_json(&document).expect("Failed to serialize to JSON");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["paths"][2]["operations"][0]["httpMethod"], "GET");
    assert!(parsed["paths"][1]["operations"][0].get("parameters").is_none());

    let yaml = serialize_yaml(&document).expect("Failed to serialize to YAML");
    assert!(yaml.contains("paths:"));
    assert!(yaml.contains("models:"));
    assert!(yaml.contains("ProductSerializer"));
}
