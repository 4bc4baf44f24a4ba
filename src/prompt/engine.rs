use crate::error::PromptError;
use tera::Tera;

/// Tera-backed template engine for the policy templates.
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Engine with no templates registered.
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Engine preloaded with `(name, source)` pairs.
    pub fn with_templates(templates: &[(&str, &str)]) -> Result<Self, PromptError> {
        let mut engine = Self::new();
        for (name, source) in templates {
            engine.add_template(name, source)?;
        }
        Ok(engine)
    }

    /// Register a template from a string, replacing any of the same name.
    pub fn add_template(&mut self, name: &str, content: &str) -> Result<(), PromptError> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| PromptError::Render(format!("template {name} does not parse: {e}")))
    }

    pub fn render(&self, template_name: &str, context: &tera::Context) -> Result<String, PromptError> {
        if !self.tera.get_template_names().any(|n| n == template_name) {
            return Err(PromptError::NotFound(template_name.to_string()));
        }
        self.tera
            .render(template_name, context)
            .map_err(|e| PromptError::Render(format!("{template_name}: {e}")))
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}
