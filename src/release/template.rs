//! release::template
//!
//! Pluggable changelog rendering via handlebars.
//!
//! Templates receive one structured variable, `changelog_data`: the ordered
//! sequence of commit records assembled by the changelog builder. A default
//! template ships in `templates/default.hbs`.

use std::path::Path;

use handlebars::Handlebars;
use thiserror::Error;

use crate::core::types::CommitRecord;

const TEMPLATE_NAME: &str = "release";

/// Errors from template loading and rendering.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("cannot read release template `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid release template: {0}")]
    Parse(#[from] Box<handlebars::TemplateError>),

    #[error("release template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// A compiled release-notes template.
#[derive(Debug)]
pub struct ReleaseTemplate {
    registry: Handlebars<'static>,
}

impl ReleaseTemplate {
    /// Load and compile a template from a file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_template_string(&text)
    }

    /// Compile a template from a string.
    pub fn from_template_string(text: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, text)
            .map_err(Box::new)?;
        Ok(Self { registry })
    }

    /// Render the changelog into a release description.
    pub fn render(&self, changelog: &[CommitRecord]) -> Result<String, TemplateError> {
        let data = serde_json::json!({ "changelog_data": changelog });
        Ok(self.registry.render(TEMPLATE_NAME, &data)?)
    }
}
