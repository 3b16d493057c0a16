//! Prompt templates for the analysis stages
//!
//! Prompts are rendered with MiniJinja. Rendering is a pure function of its
//! inputs, so a fixed symbol, snapshot and history always produce the same
//! text.

mod user;

pub use user::*;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

/// A named MiniJinja template
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub source: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Render the template against `vars`
    ///
    /// Referencing a variable that `vars` does not provide is an error.
    pub fn render<S: Serialize>(&self, vars: S) -> Result<String, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template(self.name, self.source)?;
        env.get_template(self.name)?.render(vars)
    }
}
