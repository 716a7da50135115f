mod index;
mod lesson;
mod manifest;
mod question;
mod renderer;
mod slides;

pub use manifest::serialize_manifest;
pub use renderer::{build, BuildOptions, SiteError, SiteRenderer, SiteSummary};
pub use slides::{plan_slides, PlannedSlide, SlideKind};
