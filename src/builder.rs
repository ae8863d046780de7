//! Fluent document builder.
//!
//! Accumulates document-level metadata (info, tags, servers, security
//! schemes) for an AsyncAPI document. Every setter consumes the builder and
//! returns it by value, so calls chain without shared mutable state.
//!
//! `channels` and `operations` are not produced here; the caller merges them
//! in from [`crate::transformer::ChannelTransformer::normalize_channels`].

use log::debug;
use serde_json::json;

use crate::document::{
    AsyncApiDocument, Components, Contact, ExternalDocs, Info, License, Reference,
    SecurityScheme, SecuritySchemeType, Server, ServerV2, ServerV3, Tag,
};

/// Builder for the document-level parts of an AsyncAPI document
pub struct AsyncApiDocumentBuilder {
    document: AsyncApiDocument,
}

impl AsyncApiDocumentBuilder {
    /// Create a builder with an empty 3.0 document base
    pub fn new() -> Self {
        debug!("Initializing AsyncApiDocumentBuilder");
        Self {
            document: AsyncApiDocument {
                asyncapi: "3.0.0".to_string(),
                id: None,
                info: Info {
                    title: String::new(),
                    version: "1.0.0".to_string(),
                    description: None,
                    terms_of_service: None,
                    contact: None,
                    license: None,
                },
                servers: Default::default(),
                channels: Default::default(),
                operations: Default::default(),
                components: Components::default(),
                tags: Vec::new(),
                external_docs: None,
                default_content_type: None,
            },
        }
    }

    /// Set the AsyncAPI specification version (defaults to `3.0.0`)
    pub fn set_asyncapi_version(mut self, version: impl Into<String>) -> Self {
        self.document.asyncapi = version.into();
        self
    }

    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        self.document.info.title = title.into();
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.document.info.description = Some(description.into());
        self
    }

    pub fn set_version(mut self, version: impl Into<String>) -> Self {
        self.document.info.version = version.into();
        self
    }

    pub fn set_terms_of_service(mut self, terms_of_service: impl Into<String>) -> Self {
        self.document.info.terms_of_service = Some(terms_of_service.into());
        self
    }

    pub fn set_contact(
        mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.document.info.contact = Some(Contact {
            name: name.into(),
            url: url.into(),
            email: email.into(),
        });
        self
    }

    pub fn set_license(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.document.info.license = Some(License {
            name: name.into(),
            url: url.into(),
        });
        self
    }

    pub fn set_external_doc(
        mut self,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        self.document.external_docs = Some(ExternalDocs {
            description: Some(description.into()),
            url: url.into(),
        });
        self
    }

    pub fn set_default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.document.default_content_type = Some(content_type.into());
        self
    }

    /// Add a document-level tag. An empty description is omitted from the
    /// output rather than emitted as an empty string.
    pub fn add_tag(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        external_docs: Option<ExternalDocs>,
    ) -> Self {
        let description = description.into();
        self.document.tags.push(Tag {
            name: name.into(),
            description: if description.is_empty() {
                None
            } else {
                Some(description)
            },
            external_docs,
        });
        self
    }

    /// Add a server under the given name.
    ///
    /// A 2.x-shaped server (the `url` variant) is converted to the 3.0
    /// host/pathname shape before storage; a 3.0-shaped server is stored
    /// unchanged. Adding a server under an existing name replaces it.
    pub fn add_server(mut self, name: impl Into<String>, server: Server) -> Self {
        let server = match server {
            Server::V2(v2) => {
                debug!("Converting 2.x server to 3.0 format");
                convert_server_to_v3(v2)
            }
            Server::V3(v3) => v3,
        };
        self.document.servers.insert(name.into(), server);
        self
    }

    pub fn add_servers(mut self, servers: impl IntoIterator<Item = (String, Server)>) -> Self {
        for (name, server) in servers {
            self = self.add_server(name, server);
        }
        self
    }

    /// Register a security scheme under the given name. A later scheme with
    /// the same name silently replaces the earlier one.
    pub fn add_security(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.document
            .components
            .security_schemes
            .insert(name.into(), scheme);
        self
    }

    /// Register an HTTP bearer scheme. Defaults to
    /// `{type: http, scheme: bearer, bearerFormat: JWT}`; any field set on
    /// `overrides` wins.
    pub fn add_bearer_auth(self, name: impl Into<String>, overrides: SecurityScheme) -> Self {
        let defaults = SecurityScheme {
            scheme_type: Some(SecuritySchemeType::Http),
            scheme: Some("bearer".to_string()),
            bearer_format: Some("JWT".to_string()),
            ..Default::default()
        };
        self.add_security(name, overrides.merged_over(defaults))
    }

    /// Register an OAuth2 scheme. Defaults to `{type: oauth2, flows: {}}`.
    pub fn add_oauth2(self, name: impl Into<String>, overrides: SecurityScheme) -> Self {
        let defaults = SecurityScheme {
            scheme_type: Some(SecuritySchemeType::Oauth2),
            flows: Some(json!({})),
            ..Default::default()
        };
        self.add_security(name, overrides.merged_over(defaults))
    }

    /// Register an API-key scheme. Defaults to a header parameter carrying
    /// the scheme's own name.
    pub fn add_api_key(self, name: impl Into<String>, overrides: SecurityScheme) -> Self {
        let name = name.into();
        let defaults = SecurityScheme {
            scheme_type: Some(SecuritySchemeType::ApiKey),
            location: Some("header".to_string()),
            name: Some(name.clone()),
            ..Default::default()
        };
        self.add_security(name, overrides.merged_over(defaults))
    }

    /// Register an HTTP basic scheme. Defaults to `{type: http, scheme: basic}`.
    pub fn add_basic_auth(self, name: impl Into<String>, overrides: SecurityScheme) -> Self {
        let defaults = SecurityScheme {
            scheme_type: Some(SecuritySchemeType::Http),
            scheme: Some("basic".to_string()),
            ..Default::default()
        };
        self.add_security(name, overrides.merged_over(defaults))
    }

    /// Register a cookie scheme carrying the session in `cookie_name`
    /// (conventionally `connect.sid`).
    pub fn add_cookie_auth(
        self,
        security_name: impl Into<String>,
        cookie_name: impl Into<String>,
        overrides: SecurityScheme,
    ) -> Self {
        let defaults = SecurityScheme {
            scheme_type: Some(SecuritySchemeType::ApiKey),
            location: Some("cookie".to_string()),
            name: Some(cookie_name.into()),
            ..Default::default()
        };
        self.add_security(security_name, overrides.merged_over(defaults))
    }

    /// Return the accumulated document. `channels` and `operations` are
    /// empty; the caller merges them in from the transformer output.
    pub fn build(self) -> AsyncApiDocument {
        debug!("Building document base");
        self.document
    }
}

impl Default for AsyncApiDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts an AsyncAPI 2.x server object to the 3.0 shape.
///
/// The url is split into `host` and `pathname`: a leading `scheme://` prefix
/// (alphabetic scheme, any case) is stripped, then everything from the first
/// `/` onward (inclusive) becomes the pathname. 2.x security entries are
/// single-key objects naming a scheme; each becomes a reference into
/// `#/components/securitySchemes`.
fn convert_server_to_v3(server: ServerV2) -> ServerV3 {
    let remainder = strip_scheme(&server.url);

    let (host, pathname) = match remainder.find('/') {
        Some(index) => (
            remainder[..index].to_string(),
            Some(remainder[index..].to_string()),
        ),
        None => (remainder.to_string(), None),
    };

    let security: Vec<Reference> = server
        .security
        .iter()
        .filter_map(|entry| entry.keys().next())
        .map(|scheme_name| Reference::security_scheme(scheme_name))
        .collect();

    ServerV3 {
        host,
        pathname,
        protocol: server.protocol,
        protocol_version: server.protocol_version,
        description: server.description,
        variables: server.variables,
        security,
        bindings: server.bindings,
    }
}

/// Strips a leading `scheme://` prefix when the scheme is non-empty and
/// purely alphabetic; otherwise returns the url unchanged.
fn strip_scheme(url: &str) -> &str {
    match url.split_once("://") {
        Some((scheme, rest))
            if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            rest
        }
        _ => url,
    }
}
