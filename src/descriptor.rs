//! Denormalized input descriptors.
//!
//! One descriptor is produced per scanned publish/subscribe unit by an
//! upstream scanning layer and fed to [`crate::transformer`]. The shapes here
//! mirror the wire contract: `{ root: {name, ...}, operations: {pub?, sub?} }`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{ExternalDocs, Message, Tag};

/// One denormalized publish/subscribe unit prior to normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Channel metadata shared by the operations below
    pub root: ChannelMeta,
    /// Up to two operation records, one per direction
    #[serde(default)]
    pub operations: DescriptorOperations,
}

/// Channel metadata carried on a descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelMeta {
    /// Channel address (e.g. a path-like string); empty means "skip"
    #[serde(default)]
    pub name: String,
    /// Channel description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Protocol-specific channel bindings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bindings: IndexMap<String, Value>,
    /// Address parameters (opaque parameter objects)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Value>,
}

/// Direction-keyed operation records of a descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DescriptorOperations {
    /// Outbound operation: the application sends messages
    #[serde(rename = "pub", skip_serializing_if = "Option::is_none")]
    pub publish: Option<OperationRecord>,
    /// Inbound operation: the application receives messages
    #[serde(rename = "sub", skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<OperationRecord>,
}

/// One scanned operation, before normalization
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Explicit operation id; used verbatim when present
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Operation summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Link to external documentation
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// Protocol-specific operation bindings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bindings: IndexMap<String, Value>,
    /// Message carried by this operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageSpec>,
}

/// Message spec of an operation record: a single message or a one-of set.
///
/// The variant is decided once at deserialization; the `oneOf` key
/// discriminates, so it must be tried first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageSpec {
    OneOf {
        #[serde(rename = "oneOf")]
        one_of: Vec<Message>,
    },
    Single(Message),
}

impl MessageSpec {
    /// All member messages, in declared order.
    pub fn members(&self) -> &[Message] {
        match self {
            MessageSpec::OneOf { one_of } => one_of.as_slice(),
            MessageSpec::Single(message) => std::slice::from_ref(message),
        }
    }
}
