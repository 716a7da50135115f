mod defaults;
mod engine;

pub use defaults::default_template;
pub use engine::{Context, TemplateEngine, TemplateError, MAX_PARTIAL_DEPTH};
