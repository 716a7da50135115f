use anyhow::Context as _;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::template::{TemplateEngine, TemplateError};
use crate::tml::{self, Course};
use crate::validate::SchemaValidator;

use super::manifest::serialize_manifest;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("failed to render templates")]
    Template(#[from] TemplateError),

    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize course manifest")]
    Manifest(#[from] serde_yaml_ng::Error),
}

/// Files written by one build.
#[derive(Debug, Default)]
pub struct SiteSummary {
    pub index: PathBuf,
    pub manifest: PathBuf,
    /// one entry per lesson, in course order; colliding slugs repeat a path
    pub lessons: Vec<PathBuf>,
}

/// Turns a parsed [`Course`] into an index page, one page per lesson and
/// a `course.yaml` manifest.
pub struct SiteRenderer<'a> {
    pub(super) course: &'a Course,
    pub(super) engine: TemplateEngine,
    pub(super) rng: StdRng,
}

impl<'a> SiteRenderer<'a> {
    pub fn new(course: &'a Course, engine: TemplateEngine) -> Self {
        Self {
            course,
            engine,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fix the shuffle of matching options and ordering items.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn render_to(&mut self, out_dir: &Path) -> Result<SiteSummary, SiteError> {
        fs::create_dir_all(out_dir).map_err(|source| SiteError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let course = self.course;
        let index_html = self.render_index()?;
        let index = write_page(out_dir, "index.html", &index_html)?;

        let mut owners: HashMap<String, &str> = HashMap::new();
        let mut lessons = Vec::with_capacity(course.lesson_count());
        for lesson in course.lessons() {
            let file_name = lesson.file_name();
            if let Some(previous) = owners.insert(file_name.clone(), &lesson.title) {
                warn!(
                    "lesson '{}' overwrites lesson '{}' in {}",
                    lesson.title, previous, file_name
                );
            }

            let html = self.render_lesson(lesson)?;
            lessons.push(write_page(out_dir, &file_name, &html)?);
        }

        let manifest = write_page(out_dir, "course.yaml", &serialize_manifest(course)?)?;

        Ok(SiteSummary {
            index,
            manifest,
            lessons,
        })
    }
}

fn write_page(out_dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, SiteError> {
    let path = out_dir.join(file_name);
    fs::write(&path, content).map_err(|source| SiteError::Io {
        path: path.clone(),
        source,
    })?;
    info!("wrote {}", path.display());
    Ok(path)
}

#[derive(Debug, Default, Clone)]
pub struct BuildOptions {
    pub template_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

/// Parse `tml_path` and write its site into `out_dir`.
pub fn build(
    tml_path: &Path,
    out_dir: &Path,
    validator: Option<&dyn SchemaValidator>,
    options: &BuildOptions,
) -> anyhow::Result<SiteSummary> {
    let course = tml::parse(tml_path, validator)
        .with_context(|| format!("failed to parse course {}", tml_path.display()))?;

    let engine = TemplateEngine::new(options.template_dir.clone());
    let mut renderer = SiteRenderer::new(&course, engine);
    if let Some(seed) = options.seed {
        renderer = renderer.with_seed(seed);
    }

    renderer
        .render_to(out_dir)
        .with_context(|| format!("failed to generate site in {}", out_dir.display()))
}
