//! Serialization module for converting AsyncAPI documents to YAML or JSON format.
//!
//! This module provides functions to serialize AsyncAPI documents into standard formats
//! and write them to files or return them as strings.

use crate::document::AsyncApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes an AsyncAPI document to YAML format.
///
/// The output is formatted as standard YAML, suitable for consumption by
/// AsyncAPI tooling such as the HTML documentation generator.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &AsyncApiDocument) -> Result<String> {
    debug!("Serializing AsyncAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize AsyncAPI document to YAML")
}

/// Serializes an AsyncAPI document to JSON format with pretty printing.
///
/// The output is formatted with indentation for readability, making it suitable
/// for human review and version control.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &AsyncApiDocument) -> Result<String> {
    debug!("Serializing AsyncAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize AsyncAPI document to JSON")
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does. Parent
/// directories are created as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!(
        "Successfully wrote {} bytes to {}",
        content.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AsyncApiDocumentBuilder;
    use crate::descriptor::{ChannelMeta, DescriptorOperations, OperationDescriptor, OperationRecord};
    use crate::transformer::ChannelTransformer;
    use tempfile::TempDir;

    /// Helper function to create a minimal AsyncAPI document for testing
    fn create_test_document() -> AsyncApiDocument {
        AsyncApiDocumentBuilder::new()
            .set_title("Test API")
            .set_version("1.0.0")
            .set_description("A test API")
            .build()
    }

    #[test]
    fn test_serialize_yaml() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();

        assert!(yaml.contains("asyncapi:"));
        assert!(yaml.contains("3.0.0"));
        assert!(yaml.contains("info:"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("version: 1.0.0"));
        assert!(yaml.contains("description: A test API"));
    }

    #[test]
    fn test_serialize_json() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["asyncapi"], "3.0.0");
        assert_eq!(parsed["info"]["title"], "Test API");
        assert_eq!(parsed["info"]["description"], "A test API");
    }

    #[test]
    fn test_serialize_json_pretty_format() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("  "));
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();

        // No channels, operations, servers or components were added
        assert!(!yaml.contains("channels:"));
        assert!(!yaml.contains("operations:"));
        assert!(!yaml.contains("servers:"));
        assert!(!yaml.contains("components:"));
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.yaml");
        let content = "test content";

        write_to_file(content, &file_path).unwrap();

        assert!(file_path.exists());
        let read_content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(read_content, content);
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir
            .path()
            .join("subdir")
            .join("nested")
            .join("test.yaml");

        write_to_file("test content", &file_path).unwrap();

        assert!(file_path.exists());
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.yaml");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        let read_content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(read_content, "new content");
    }

    #[test]
    fn test_serialize_yaml_with_normalized_channels() {
        let descriptors = vec![OperationDescriptor {
            root: ChannelMeta {
                name: "/cats".to_string(),
                ..Default::default()
            },
            operations: DescriptorOperations {
                publish: Some(OperationRecord::default()),
                subscribe: None,
            },
        }];
        let normalized = ChannelTransformer::normalize_channels(&descriptors).unwrap();

        let mut doc = create_test_document();
        doc.channels = normalized.channels;
        doc.operations = normalized.operations;

        let yaml = serialize_yaml(&doc).unwrap();
        assert!(yaml.contains("channels:"));
        assert!(yaml.contains("_cats:"));
        assert!(yaml.contains("address: /cats"));
        assert!(yaml.contains("operations:"));
        assert!(yaml.contains("_cats_send:"));
        assert!(yaml.contains("action: send"));
        assert!(yaml.contains("$ref"));
    }

    #[test]
    fn test_roundtrip_yaml_serialization() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();

        let deserialized: AsyncApiDocument = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(deserialized, doc);
    }

    #[test]
    fn test_roundtrip_json_serialization() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        let deserialized: AsyncApiDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, doc);
    }
}
