use github_slugger::Slugger;
use regex::Regex;
use std::sync::LazyLock;

use crate::markdown::{escape_html, escape_js_string, safe_markdown};
use crate::slug::title_case;
use crate::template::{Context, TemplateError};
use crate::tml::{Activity, Assessment, Content, ContentFormat, Lesson};

use super::renderer::SiteRenderer;

static JS_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:javascript|js)\b[^\n]*\n(.*?)```").expect("valid js fence regex")
});

#[derive(Debug, Clone, Copy)]
pub enum SlideKind<'a> {
    Content(&'a Content),
    Activity(&'a Activity),
    Assessment(&'a Assessment),
    Completion,
}

impl SlideKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            SlideKind::Content(_) => "content",
            SlideKind::Activity(_) => "activity",
            SlideKind::Assessment(_) => "assessment",
            SlideKind::Completion => "completion",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannedSlide<'a> {
    /// DOM id, unique within the lesson page
    pub id: String,
    pub kind: SlideKind<'a>,
}

/// The slides of a lesson in page order: content blocks, then activities,
/// then assessments, then one completion slide.
pub fn plan_slides(lesson: &Lesson) -> Vec<PlannedSlide<'_>> {
    let mut slugger = Slugger::default();
    let mut slides = Vec::with_capacity(
        lesson.content.len() + lesson.activities.len() + lesson.assessments.len() + 1,
    );

    for (index, content) in lesson.content.iter().enumerate() {
        slides.push(PlannedSlide {
            id: slugger.slug(&format!("content {}", index + 1)),
            kind: SlideKind::Content(content),
        });
    }

    for (index, activity) in lesson.activities.iter().enumerate() {
        let label = or_numbered(&activity.id, "activity", index);
        slides.push(PlannedSlide {
            id: slugger.slug(&label),
            kind: SlideKind::Activity(activity),
        });
    }

    for (index, assessment) in lesson.assessments.iter().enumerate() {
        let label = or_numbered(&assessment.id, "assessment", index);
        slides.push(PlannedSlide {
            id: slugger.slug(&label),
            kind: SlideKind::Assessment(assessment),
        });
    }

    slides.push(PlannedSlide {
        id: slugger.slug("complete"),
        kind: SlideKind::Completion,
    });

    slides
}

fn or_numbered(id: &str, kind: &str, index: usize) -> String {
    if id.trim().is_empty() {
        format!("{} {}", kind, index + 1)
    } else {
        id.to_string()
    }
}

/// A reading activity whose expected text carries a JavaScript snippet.
#[derive(Debug, PartialEq)]
pub(super) struct WorkedExample {
    pub code: String,
    pub takeaways: String,
}

pub(super) fn worked_example(activity: &Activity) -> Option<WorkedExample> {
    if activity.normalized_type() != "reading" {
        return None;
    }

    let caps = JS_FENCE.captures(&activity.expected)?;
    let fence = caps.get(0)?;
    let rest = format!(
        "{}\n{}",
        &activity.expected[..fence.start()],
        &activity.expected[fence.end()..]
    );

    Some(WorkedExample {
        code: caps[1].trim_end().to_string(),
        takeaways: rest.trim().to_string(),
    })
}

fn slide_nav(slides: &[PlannedSlide], index: usize) -> String {
    let mut links = Vec::with_capacity(2);
    if let Some(previous) = index.checked_sub(1).and_then(|i| slides.get(i)) {
        links.push(format!(
            "<a class=\"btn\" href=\"#{}\">Previous</a>",
            escape_html(&previous.id)
        ));
    }
    if let Some(next) = slides.get(index + 1) {
        links.push(format!(
            "<a class=\"btn\" href=\"#{}\">Next</a>",
            escape_html(&next.id)
        ));
    }
    links.join(" ")
}

impl SiteRenderer<'_> {
    /// Render every slide of `lesson`, each knowing the final slide count.
    pub(super) fn render_slides(&mut self, lesson: &Lesson) -> Result<Vec<String>, TemplateError> {
        let slides = plan_slides(lesson);
        let total = slides.len().to_string();
        let mut rendered = Vec::with_capacity(slides.len());

        for (index, slide) in slides.iter().enumerate() {
            let body = self.render_slide_body(lesson, slide)?;
            let context = Context::from([
                ("slide_kind", slide.kind.name().to_string()),
                ("slide_id", escape_html(&slide.id)),
                ("slide_number", (index + 1).to_string()),
                ("slide_total", total.clone()),
                ("slide_body", body),
                ("slide_nav", slide_nav(&slides, index)),
            ]);
            rendered.push(self.engine.render("partials/slide.html", &context)?);
        }

        Ok(rendered)
    }

    fn render_slide_body(
        &mut self,
        lesson: &Lesson,
        slide: &PlannedSlide,
    ) -> Result<String, TemplateError> {
        match slide.kind {
            SlideKind::Content(content) => Ok(render_content(content)),
            SlideKind::Activity(activity) => self.render_activity(activity),
            SlideKind::Assessment(assessment) => {
                let key = if assessment.id.trim().is_empty() {
                    slide.id.as_str()
                } else {
                    assessment.id.as_str()
                };
                self.render_assessment(assessment, key)
            }
            SlideKind::Completion => {
                let context = Context::from([
                    ("lesson_title", escape_html(&lesson.title)),
                    ("course_js", escape_js_string(&self.course.id)),
                    ("lesson_js", escape_js_string(&lesson.key())),
                ]);
                self.engine.render("partials/completion.html", &context)
            }
        }
    }

    fn render_activity(&mut self, activity: &Activity) -> Result<String, TemplateError> {
        let est_html = if activity.est.is_empty() {
            String::new()
        } else {
            format!("<p class='small'>Estimated: {}</p>", escape_html(&activity.est))
        };

        if let Some(example) = worked_example(activity) {
            let takeaways_html = if example.takeaways.is_empty() {
                String::new()
            } else {
                format!(
                    "<div class=\"takeaways\">\n    <h3>Key Takeaways</h3>\n    {}\n  </div>",
                    safe_markdown(&example.takeaways)
                )
            };
            let context = Context::from([
                ("activity_id", escape_html(&activity.id)),
                ("est_html", est_html),
                ("explanation", safe_markdown(&activity.instructions)),
                ("code", escape_html(&example.code)),
                ("takeaways_html", takeaways_html),
            ]);
            return self.engine.render("partials/worked_example.html", &context);
        }

        let expected_html = if activity.expected.is_empty() {
            String::new()
        } else {
            format!(
                "<p><strong>Expected:</strong> {}</p>",
                escape_html(&activity.expected)
            )
        };
        let label = if activity.activity_type.trim().is_empty() {
            String::from("Activity")
        } else {
            title_case(activity.activity_type.trim())
        };

        let template = self.activity_template(activity)?;
        let context = Context::from([
            ("activity_id", escape_html(&activity.id)),
            ("activity_type", escape_html(&label)),
            ("instructions", safe_markdown(&activity.instructions)),
            ("expected_html", expected_html),
            ("est_html", est_html),
        ]);
        self.engine.render(&template, &context)
    }

    // partials/activity_<type>.html when one exists, else the generic layout
    fn activity_template(&mut self, activity: &Activity) -> Result<String, TemplateError> {
        let kind = activity.normalized_type();
        let usable = !kind.is_empty()
            && kind
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if usable {
            let name = format!("partials/activity_{}.html", kind);
            if self.engine.has_template(&name)? {
                return Ok(name);
            }
        }
        Ok(String::from("partials/activity.html"))
    }

    fn render_assessment(
        &mut self,
        assessment: &Assessment,
        key: &str,
    ) -> Result<String, TemplateError> {
        let questions = self.render_questions(assessment, key)?;
        let context = Context::from([
            ("assess_id", escape_html(key)),
            ("assess_js", escape_js_string(key)),
            ("course_js", escape_js_string(&self.course.id)),
            ("pass_score", assessment.pass_score.to_string()),
            ("questions", questions),
        ]);
        self.engine.render("partials/assessment.html", &context)
    }
}

fn render_content(content: &Content) -> String {
    match content.format {
        ContentFormat::Markdown => safe_markdown(&content.value),
        ContentFormat::Html => content.value.clone(),
        ContentFormat::Other(_) => format!("<pre>{}</pre>", escape_html(&content.value)),
    }
}
