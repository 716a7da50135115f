use log::{debug, warn};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

use super::defaults::default_template;

/// Flat variable bindings for one render call.
pub type Context<'a> = BTreeMap<&'a str, String>;

/// Deepest chain of nested partials that is expanded; references below
/// it are left as written.
pub const MAX_PARTIAL_DEPTH: usize = 10;

static PARTIAL_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{>\s*([^\s}]+)\s*\}\}").expect("valid partial regex"));
static VARIABLE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^\s}]+)\s*\}\}").expect("valid variable regex"));

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("partials include each other in a cycle: {chain}")]
    PartialCycle { chain: String },
}

/// Loads templates from an optional directory (falling back to the
/// built-in set), expands `{{> partial }}` references and substitutes
/// `{{ variable }}` references.
///
/// Loaded text is cached per engine, so a template directory edited
/// during a build is not observed.
#[derive(Debug)]
pub struct TemplateEngine {
    template_dir: Option<PathBuf>,
    use_defaults: bool,
    templates: HashMap<String, String>,
    partials: HashMap<String, String>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TemplateEngine {
    pub fn new(template_dir: Option<PathBuf>) -> Self {
        Self {
            template_dir,
            use_defaults: true,
            templates: HashMap::new(),
            partials: HashMap::new(),
        }
    }

    /// Only consult the template directory; never fall back to built-ins.
    pub fn without_defaults(mut self) -> Self {
        self.use_defaults = false;
        self
    }

    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    pub fn has_template(&mut self, name: &str) -> Result<bool, TemplateError> {
        Ok(self.load_template(name)?.is_some())
    }

    /// Render the named template. A missing template renders as a visible
    /// `<!-- Template 'name' not found -->` comment rather than an error.
    pub fn render(&mut self, name: &str, context: &Context) -> Result<String, TemplateError> {
        match self.load_template(name)? {
            Some(template) => self.render_string(&template, context),
            None => {
                warn!("template '{}' not found", name);
                Ok(format!("<!-- Template '{}' not found -->", name))
            }
        }
    }

    /// Render inline template text with the same partial and variable rules
    /// as [`TemplateEngine::render`].
    pub fn render_string(&mut self, text: &str, context: &Context) -> Result<String, TemplateError> {
        let expanded = self.expand_partials(text, &mut Vec::new())?;
        Ok(substitute(&expanded, context))
    }

    fn load_template(&mut self, name: &str) -> Result<Option<String>, TemplateError> {
        if let Some(cached) = self.templates.get(name) {
            return Ok(Some(cached.clone()));
        }

        let loaded = match self.read_external(Path::new(name))? {
            Some(text) => Some(text),
            None => self.builtin(name),
        };

        if let Some(ref text) = loaded {
            self.templates.insert(name.to_string(), text.clone());
        }
        Ok(loaded)
    }

    // `styles` and `styles.html` both name partials/styles.html
    fn load_partial(&mut self, name: &str) -> Result<Option<String>, TemplateError> {
        if let Some(cached) = self.partials.get(name) {
            return Ok(Some(cached.clone()));
        }

        let file_name = if name.ends_with(".html") {
            name.to_string()
        } else {
            format!("{}.html", name)
        };

        let loaded = match self.read_external(&Path::new("partials").join(&file_name))? {
            Some(text) => Some(text),
            None => self.builtin(&format!("partials/{}", file_name)),
        };

        if let Some(ref text) = loaded {
            self.partials.insert(name.to_string(), text.clone());
        }
        Ok(loaded)
    }

    fn read_external(&self, relative: &Path) -> Result<Option<String>, TemplateError> {
        let Some(dir) = self.template_dir.as_ref() else {
            return Ok(None);
        };

        let path = dir.join(relative);
        if !path.is_file() {
            return Ok(None);
        }

        debug!("loading template file {}", path.display());
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| TemplateError::Io { path, source })
    }

    fn builtin(&self, key: &str) -> Option<String> {
        if self.use_defaults {
            default_template(key).map(str::to_string)
        } else {
            None
        }
    }

    fn expand_partials(
        &mut self,
        text: &str,
        chain: &mut Vec<String>,
    ) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in PARTIAL_REF.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let name = &caps[1];
            out.push_str(&text[last..whole.start()]);
            last = whole.end();

            let key = name.trim_end_matches(".html");
            if chain.iter().any(|active| active == key) {
                let mut cycle = chain.clone();
                cycle.push(key.to_string());
                return Err(TemplateError::PartialCycle {
                    chain: cycle.join(" -> "),
                });
            }

            if chain.len() >= MAX_PARTIAL_DEPTH {
                warn!(
                    "partial '{}' nested deeper than {} levels, left unexpanded",
                    name, MAX_PARTIAL_DEPTH
                );
                out.push_str(whole.as_str());
                continue;
            }

            match self.load_partial(name)? {
                Some(content) => {
                    chain.push(key.to_string());
                    let expanded = self.expand_partials(&content, chain)?;
                    chain.pop();
                    out.push_str(&expanded);
                }
                None => {
                    warn!("partial '{}' not found", name);
                    out.push_str(&format!("<!-- Partial '{}' not found -->", name));
                }
            }
        }

        out.push_str(&text[last..]);
        Ok(out)
    }
}

// Values are inserted as-is and never rescanned for references.
fn substitute(text: &str, context: &Context) -> String {
    VARIABLE_REF
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match context.get(name) {
                Some(value) => value.clone(),
                None => format!("{{{{ {} }}}}", name),
            }
        })
        .into_owned()
}
