//! HTML rendering via the external AsyncAPI generator.
//!
//! The document is handed to the AsyncAPI CLI (`asyncapi generate
//! fromTemplate`) as YAML inside a scoped temporary directory; the rendered
//! `index.html` is read back and the directory is removed when the
//! [`tempfile::TempDir`] guard drops, on success and error alike. Cleanup
//! errors are swallowed by the guard; generation errors propagate to the
//! caller.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

use crate::document::AsyncApiDocument;
use crate::serializer::serialize_yaml;

const DEFAULT_COMMAND: &str = "asyncapi";
const DEFAULT_TEMPLATE: &str = "@asyncapi/html-template";

/// Renders AsyncAPI documents to HTML through the external generator CLI
pub struct HtmlGenerator {
    /// Generator executable to invoke
    command: String,
    /// Generator template package
    template: String,
    /// `key=value` template parameters passed through to the generator
    template_params: Vec<(String, String)>,
}

impl HtmlGenerator {
    /// Create a generator using the AsyncAPI CLI and the single-file HTML
    /// template configuration.
    pub fn new() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            template_params: vec![("singleFile".to_string(), "true".to_string())],
        }
    }

    /// Use a different generator executable (e.g. an absolute path)
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Use a different generator template package
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Add a template parameter passed through to the generator
    pub fn with_template_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.template_params.push((key.into(), value.into()));
        self
    }

    /// Render the document to a single HTML page.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized, the generator
    /// cannot be invoked or exits unsuccessfully, or the expected
    /// `index.html` is missing from its output.
    pub fn generate(&self, document: &AsyncApiDocument) -> Result<String> {
        let yaml = serialize_yaml(document)?;

        // The guard removes the whole tree on drop, whatever exit path is taken
        let workdir = TempDir::new().context("Failed to create temporary directory")?;
        let spec_path = workdir.path().join("asyncapi.yaml");
        let output_dir = workdir.path().join("html");

        fs::write(&spec_path, yaml)
            .with_context(|| format!("Failed to write spec to {}", spec_path.display()))?;

        debug!(
            "Invoking '{}' with template '{}' in {}",
            self.command,
            self.template,
            workdir.path().display()
        );

        let mut command = Command::new(&self.command);
        command
            .arg("generate")
            .arg("fromTemplate")
            .arg(&spec_path)
            .arg(&self.template)
            .arg("--output")
            .arg(&output_dir)
            .arg("--force-write");
        for (key, value) in &self.template_params {
            command.arg("--param").arg(format!("{}={}", key, value));
        }

        let output = command
            .output()
            .with_context(|| format!("Failed to invoke generator command '{}'", self.command))?;

        if !output.status.success() {
            bail!(
                "Generator exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let html_path = output_dir.join("index.html");
        let html = fs::read_to_string(&html_path)
            .with_context(|| format!("Generator produced no {}", html_path.display()))?;

        info!("Rendered AsyncAPI document to {} bytes of HTML", html.len());
        Ok(html)
    }
}

impl Default for HtmlGenerator {
    fn default() -> Self {
        Self::new()
    }
}
