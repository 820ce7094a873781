//! HTML rendering with handlebars templates compiled into the binary.

use std::sync::Arc;

use common::AppError;
use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

/// Landing page template name.
pub const HOME: &str = "home";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template failed to compile: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("template failed to render: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e.to_string())
    }
}

/// Compiled template registry. Cheap to clone; immutable after construction.
#[derive(Clone)]
pub struct Renderer {
    registry: Arc<Handlebars<'static>>,
}

impl Renderer {
    /// Compile every bundled template.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] if a template has a syntax error.
    pub fn new() -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(HOME, include_str!("../templates/home.hbs"))?;
        Ok(Self {
            registry: Arc::new(registry),
        })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, RenderError> {
        Ok(self.registry.render(name, data)?)
    }
}
