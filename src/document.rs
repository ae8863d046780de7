//! AsyncAPI document model.
//!
//! Serde representations of the AsyncAPI 3.0 document structure, plus the 2.x
//! server shape that [`crate::builder`] converts on ingestion. Maps use
//! [`IndexMap`] so that repeated generation runs over the same input produce
//! byte-stable output (insertion order is preserved through serialization).
//!
//! Payload, header, binding and parameter schemas are carried as opaque
//! [`serde_json::Value`]s; this crate never interprets them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete AsyncAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncApiDocument {
    /// AsyncAPI specification version
    pub asyncapi: String,
    /// Document identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// API info
    pub info: Info,
    /// Servers the API is available on (3.0 shape, keyed by server name)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub servers: IndexMap<String, ServerV3>,
    /// Channels keyed by channel id
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub channels: IndexMap<String, Channel>,
    /// Operations keyed by operation id
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub operations: IndexMap<String, Operation>,
    /// Reusable components (security schemes)
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
    /// Document-level tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Link to external documentation
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// Default content type for message payloads
    #[serde(rename = "defaultContentType", skip_serializing_if = "Option::is_none")]
    pub default_content_type: Option<String>,
}

/// AsyncAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Terms of service URL
    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    /// Contact information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// License information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Contact information for the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub url: String,
    pub email: String,
}

/// License information for the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: String,
}

/// Tag object used at the document, operation and message level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Tag description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Link to external documentation for this tag
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
}

/// Link to an external documentation resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
}

/// JSON Reference object (`{"$ref": "#/..."}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// JSON pointer to the referenced object
    #[serde(rename = "$ref")]
    pub target: String,
}

impl Reference {
    /// Reference to a channel in the same document.
    pub fn channel(channel_id: &str) -> Self {
        Reference {
            target: format!("#/channels/{}", channel_id),
        }
    }

    /// Reference to a message embedded in a channel of the same document.
    pub fn channel_message(channel_id: &str, message_name: &str) -> Self {
        Reference {
            target: format!("#/channels/{}/messages/{}", channel_id, message_name),
        }
    }

    /// Reference to a named security scheme under components.
    pub fn security_scheme(name: &str) -> Self {
        Reference {
            target: format!("#/components/securitySchemes/{}", name),
        }
    }
}

/// AsyncAPI 3.0 Channel object
///
/// Messages are embedded directly under the channel; the 3.0 spec does not
/// allow `$ref` entries at this level, so the map values are always bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// The literal, unsanitized channel address
    pub address: String,
    /// Channel description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Messages available on this channel, keyed by sanitized message name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub messages: IndexMap<String, Message>,
    /// Address parameters (opaque parameter objects)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Value>,
    /// Protocol-specific channel bindings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bindings: IndexMap<String, Value>,
}

/// AsyncAPI 3.0 operation action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationAction {
    /// The application sends messages to the channel
    Send,
    /// The application receives messages from the channel
    Receive,
}

impl OperationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationAction::Send => "send",
            OperationAction::Receive => "receive",
        }
    }
}

/// AsyncAPI 3.0 Operation object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation direction
    pub action: OperationAction,
    /// Reference to the owning channel
    pub channel: Reference,
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
    /// References to messages embedded in the owning channel
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Reference>,
}

/// AsyncAPI Message object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Machine-readable message name; doubles as the dedup key per channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable message title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Message summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Message description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content type of the payload
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Header schema (opaque)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    /// Correlation id definition
    #[serde(rename = "correlationId", skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
    /// Payload schema (opaque)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Message tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Link to external documentation
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// Protocol-specific message bindings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bindings: IndexMap<String, Value>,
}

/// Correlation id definition for request/reply matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationId {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Runtime expression locating the correlation value
    pub location: String,
}

/// Server object in either the 2.x shape (`url`) or the 3.0 shape
/// (`host`/`pathname`).
///
/// The variant is fixed when the value is constructed or deserialized.
/// Untagged deserialization tries the 2.x shape first; `url` is its required
/// discriminating field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Server {
    V2(ServerV2),
    V3(ServerV3),
}

/// AsyncAPI 2.x Server object (input only, never stored)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerV2 {
    /// Server URL, optionally prefixed with a `scheme://`
    pub url: String,
    /// Protocol the server speaks (e.g. `ws`, `amqp`, `kafka`)
    pub protocol: String,
    /// Protocol version
    #[serde(rename = "protocolVersion", skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    /// Server description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL template variables
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, Value>,
    /// 2.x security requirements: single-key objects naming a scheme
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<IndexMap<String, Vec<String>>>,
    /// Protocol-specific server bindings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bindings: IndexMap<String, Value>,
}

/// AsyncAPI 3.0 Server object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerV3 {
    /// Host name, including port if any
    pub host: String,
    /// Path component of the server address, including the leading slash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    /// Protocol the server speaks
    pub protocol: String,
    /// Protocol version
    #[serde(rename = "protocolVersion", skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    /// Server description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// URL template variables
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, Value>,
    /// 3.0 security requirements: references into components
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<Reference>,
    /// Protocol-specific server bindings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bindings: IndexMap<String, Value>,
}

/// Components section (security schemes)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    /// Security scheme definitions keyed by scheme name
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecurityScheme>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.security_schemes.is_empty()
    }
}

/// Security scheme type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecuritySchemeType {
    UserPassword,
    ApiKey,
    #[serde(rename = "X509")]
    X509,
    SymmetricEncryption,
    AsymmetricEncryption,
    Http,
    Oauth2,
    OpenIdConnect,
}

/// Security scheme definition
///
/// All fields are optional so that caller-supplied overrides can be merged
/// over the per-helper defaults field by field (override wins).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub scheme_type: Option<SecuritySchemeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name of the header, query or cookie parameter (apiKey schemes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Location of the credential: `header`, `query` or `cookie`
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// HTTP authorization scheme (http schemes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    /// OAuth2 flow definitions (opaque)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<Value>,
    #[serde(rename = "openIdConnectUrl", skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,
}

impl SecurityScheme {
    /// Merge `self` over `defaults`: any field set on `self` wins, any field
    /// left unset falls back to the default.
    pub fn merged_over(self, defaults: SecurityScheme) -> SecurityScheme {
        SecurityScheme {
            scheme_type: self.scheme_type.or(defaults.scheme_type),
            description: self.description.or(defaults.description),
            name: self.name.or(defaults.name),
            location: self.location.or(defaults.location),
            scheme: self.scheme.or(defaults.scheme),
            bearer_format: self.bearer_format.or(defaults.bearer_format),
            flows: self.flows.or(defaults.flows),
            open_id_connect_url: self.open_id_connect_url.or(defaults.open_id_connect_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_pointers() {
        assert_eq!(Reference::channel("cats").target, "#/channels/cats");
        assert_eq!(
            Reference::channel_message("cats", "CreateCat").target,
            "#/channels/cats/messages/CreateCat"
        );
        assert_eq!(
            Reference::security_scheme("bearer").target,
            "#/components/securitySchemes/bearer"
        );
    }

    #[test]
    fn test_reference_serializes_as_dollar_ref() {
        let json = serde_json::to_value(Reference::channel("cats")).unwrap();
        assert_eq!(json, serde_json::json!({ "$ref": "#/channels/cats" }));
    }

    #[test]
    fn test_operation_action_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OperationAction::Send).unwrap(),
            "\"send\""
        );
        assert_eq!(
            serde_json::to_string(&OperationAction::Receive).unwrap(),
            "\"receive\""
        );
    }

    #[test]
    fn test_empty_channel_fields_are_omitted() {
        let channel = Channel {
            address: "/cats".to_string(),
            description: None,
            messages: IndexMap::new(),
            parameters: IndexMap::new(),
            bindings: IndexMap::new(),
        };

        let json = serde_json::to_value(&channel).unwrap();
        assert_eq!(json, serde_json::json!({ "address": "/cats" }));
    }

    #[test]
    fn test_server_deserializes_v2_when_url_present() {
        let json = r#"{ "url": "ws://example.com/socket", "protocol": "ws" }"#;
        let server: Server = serde_json::from_str(json).unwrap();

        match server {
            Server::V2(v2) => {
                assert_eq!(v2.url, "ws://example.com/socket");
                assert_eq!(v2.protocol, "ws");
            }
            Server::V3(_) => panic!("expected a 2.x server"),
        }
    }

    #[test]
    fn test_server_deserializes_v3_when_host_present() {
        let json = r#"{ "host": "example.com:443", "pathname": "/socket", "protocol": "ws" }"#;
        let server: Server = serde_json::from_str(json).unwrap();

        match server {
            Server::V3(v3) => {
                assert_eq!(v3.host, "example.com:443");
                assert_eq!(v3.pathname.as_deref(), Some("/socket"));
            }
            Server::V2(_) => panic!("expected a 3.0 server"),
        }
    }

    #[test]
    fn test_security_scheme_merge_override_wins() {
        let defaults = SecurityScheme {
            scheme_type: Some(SecuritySchemeType::Http),
            scheme: Some("bearer".to_string()),
            bearer_format: Some("JWT".to_string()),
            ..Default::default()
        };
        let overrides = SecurityScheme {
            bearer_format: Some("opaque".to_string()),
            description: Some("service tokens".to_string()),
            ..Default::default()
        };

        let merged = overrides.merged_over(defaults);
        assert_eq!(merged.scheme_type, Some(SecuritySchemeType::Http));
        assert_eq!(merged.scheme.as_deref(), Some("bearer"));
        assert_eq!(merged.bearer_format.as_deref(), Some("opaque"));
        assert_eq!(merged.description.as_deref(), Some("service tokens"));
    }
}
