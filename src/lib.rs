//! REST Swagger - Swagger documentation from a REST application's routing table.
//!
//! The documentation is assembled from what the application already declares:
//! its URL patterns, the docstrings of its view classes and handler methods,
//! and the fields of the serializers those views expose.
//!
//! # Architecture
//!
//! 1. [`view`] - Capability traits a documentable view and serializer implement
//! 2. [`registry`] - Records documentable endpoints as routes are declared
//! 3. [`router`] - Expands viewsets into list/detail routes and registers them
//! 4. [`docstring`] - Dedenting and `name -- description` annotation parsing
//! 5. [`docgen`] - Builds the [`document::Document`] from registered endpoints
//! 6. [`manifest`] - Declarative YAML/JSON routing tables
//! 7. [`scanner`] - Finds manifest files
//! 8. [`serializer`] - Serializes documents to YAML or JSON
//!
//! # Example Usage
//!
//! ```
//! use rest_swagger::docgen::DocumentationGenerator;
//! use rest_swagger::manifest::Manifest;
//! use rest_swagger::registry::RouteRegistry;
//!
//! let manifest = Manifest::from_yaml_str(r#"
//! views:
//!   WidgetList:
//!     doc: "Widgets.\n\ncolour -- filter by colour"
//!     handlers: {list: ~}
//! urls:
//!   - {pattern: ^widgets/$, view: WidgetList, methods: {get: list}}
//! "#).unwrap();
//!
//! let mut registry = RouteRegistry::new();
//! manifest.register_into(&mut registry).unwrap();
//!
//! let document = DocumentationGenerator::new().document(&registry.get_apis(None));
//! assert_eq!(document.paths[0].description, "Widgets");
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod docgen;
pub mod docstring;
pub mod document;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod router;
pub mod scanner;
pub mod serializer;
pub mod view;
