use anyhow::Result;
use clap::{Parser, ValueEnum};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::builder::AsyncApiDocumentBuilder;
use crate::descriptor::OperationDescriptor;
use crate::document::{AsyncApiDocument, SecurityScheme, Server, Tag};
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::transformer::ChannelTransformer;

/// AsyncAPI Docgen - Generate AsyncAPI 3.0 documents from channel descriptors
#[derive(Parser, Debug)]
#[command(name = "asyncapi-docgen")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the descriptor file (JSON or YAML)
    #[arg(value_name = "DESCRIPTOR_FILE")]
    pub descriptor_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Override the document title from the descriptor file
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Override the document version from the descriptor file
    #[arg(long = "doc-version", value_name = "VERSION")]
    pub doc_version: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Descriptor file contents: document metadata plus the denormalized
/// operation descriptors collected by an upstream scanning layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationInput {
    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Document version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Document description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default content type for message payloads
    #[serde(rename = "defaultContentType", skip_serializing_if = "Option::is_none")]
    pub default_content_type: Option<String>,
    /// Servers keyed by name, in 2.x or 3.0 shape
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub servers: IndexMap<String, Server>,
    /// Document-level tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Security schemes keyed by name; 2.x server security entries reference
    /// these by name
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecurityScheme>,
    /// Denormalized per-operation descriptors
    #[serde(default)]
    pub descriptors: Vec<OperationDescriptor>,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.descriptor_path.exists() {
        anyhow::bail!(
            "Descriptor file does not exist: {}",
            args.descriptor_path.display()
        );
    }

    if !args.descriptor_path.is_file() {
        anyhow::bail!(
            "Descriptor path is not a file: {}",
            args.descriptor_path.display()
        );
    }

    info!("Descriptor file: {}", args.descriptor_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Read and deserialize a descriptor file, dispatching on its extension
pub fn read_input(path: &std::path::Path) -> crate::error::Result<GenerationInput> {
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let parsed = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| crate::error::Error::DescriptorError {
        file: path.to_path_buf(),
        message,
    })
}

/// Assemble the final document from the descriptor file contents
pub fn assemble_document(input: &GenerationInput) -> Result<AsyncApiDocument> {
    let mut builder = AsyncApiDocumentBuilder::new()
        .set_title(input.title.clone().unwrap_or_else(|| "Generated API".to_string()));

    if let Some(version) = &input.version {
        builder = builder.set_version(version.clone());
    }
    if let Some(description) = &input.description {
        builder = builder.set_description(description.clone());
    }
    if let Some(content_type) = &input.default_content_type {
        builder = builder.set_default_content_type(content_type.clone());
    }
    for tag in &input.tags {
        builder = builder.add_tag(
            tag.name.clone(),
            tag.description.clone().unwrap_or_default(),
            tag.external_docs.clone(),
        );
    }
    for (name, scheme) in &input.security_schemes {
        builder = builder.add_security(name.clone(), scheme.clone());
    }
    builder = builder.add_servers(
        input
            .servers
            .iter()
            .map(|(name, server)| (name.clone(), server.clone())),
    );

    let mut document = builder.build();

    let normalized = ChannelTransformer::normalize_channels(&input.descriptors)?;
    document.channels = normalized.channels;
    document.operations = normalized.operations;

    Ok(document)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting AsyncAPI document generation...");

    // Step 1: Read the descriptor file
    let input = read_input(&args.descriptor_path)?;
    info!("Read {} descriptors", input.descriptors.len());

    // Step 2: Assemble the document (builder + transformer)
    let mut document = assemble_document(&input)?;

    // Step 3: Apply command-line overrides
    if let Some(title) = &args.title {
        document.info.title = title.clone();
    }
    if let Some(version) = &args.doc_version {
        document.info.version = version.clone();
    }

    info!(
        "Document built: {} channels, {} operations, {} servers",
        document.channels.len(),
        document.operations.len(),
        document.servers.len()
    );

    // Step 4: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 5: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!(
            "Successfully wrote AsyncAPI document to {}",
            output_path.display()
        );
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    Ok(())
}
