//! AsyncAPI Docgen - AsyncAPI 3.0 documents from denormalized descriptors.
//!
//! This library turns per-operation "denormalized" descriptors - one record per
//! publish/subscribe operation, as collected by scanning annotated application
//! code - into a single, spec-compliant AsyncAPI 3.0 document with deduplicated
//! channels, cross-referenced operations and embedded messages, rendered as
//! YAML, JSON or (through the external AsyncAPI generator) HTML.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`descriptor`] - Input contract: the denormalized descriptor shapes
//! 2. [`document`] - AsyncAPI document model (2.x and 3.0 server shapes)
//! 3. [`transformer`] - Normalizes descriptors into `channels` and `operations`
//! 4. [`builder`] - Fluent builder for document-level metadata and servers
//! 5. [`serializer`] - Serializes the document to YAML or JSON
//! 6. [`generator`] - Renders the document to HTML via the AsyncAPI CLI
//!
//! # Example Usage
//!
//! ```
//! use asyncapi_docgen::{
//!     builder::AsyncApiDocumentBuilder,
//!     descriptor::{ChannelMeta, DescriptorOperations, MessageSpec, OperationDescriptor,
//!                  OperationRecord},
//!     document::Message,
//!     serializer::serialize_yaml,
//!     transformer::ChannelTransformer,
//! };
//!
//! let descriptors = vec![OperationDescriptor {
//!     root: ChannelMeta {
//!         name: "/rooms/{roomId}".to_string(),
//!         ..Default::default()
//!     },
//!     operations: DescriptorOperations {
//!         publish: Some(OperationRecord {
//!             message: Some(MessageSpec::Single(Message {
//!                 name: Some("RoomJoined".to_string()),
//!                 ..Default::default()
//!             })),
//!             ..Default::default()
//!         }),
//!         subscribe: None,
//!     },
//! }];
//!
//! // Normalize descriptors into channels and operations
//! let normalized = ChannelTransformer::normalize_channels(&descriptors).unwrap();
//!
//! // Build the document-level metadata and merge
//! let mut document = AsyncApiDocumentBuilder::new()
//!     .set_title("Chat API")
//!     .set_version("1.0.0")
//!     .build();
//! document.channels = normalized.channels;
//! document.operations = normalized.operations;
//!
//! // Serialize to YAML
//! let yaml = serialize_yaml(&document).unwrap();
//! assert!(yaml.contains("address: /rooms/{roomId}"));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI
//! application.

pub mod builder;
pub mod cli;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod generator;
pub mod serializer;
pub mod transformer;
