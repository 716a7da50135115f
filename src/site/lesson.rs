use crate::markdown::escape_html;
use crate::template::{Context, TemplateError};
use crate::tml::Lesson;

use super::renderer::SiteRenderer;

impl SiteRenderer<'_> {
    pub(super) fn render_lesson(&mut self, lesson: &Lesson) -> Result<String, TemplateError> {
        let course = self.course;
        let slides = self.render_slides(lesson)?;

        let header = self.engine.render(
            "partials/lesson_header.html",
            &Context::from([
                ("course_title", escape_html(&course.title)),
                ("module_title", escape_html(&lesson.module_title)),
                ("lesson_title", escape_html(&lesson.title)),
            ]),
        )?;

        self.engine.render(
            "base.html",
            &Context::from([
                (
                    "title",
                    format!(
                        "{} — {}",
                        escape_html(&lesson.title),
                        escape_html(&course.title)
                    ),
                ),
                ("course_id", escape_html(&course.id)),
                ("total_lessons", course.lesson_count().to_string()),
                ("header_content", header),
                ("content", slides.join("\n")),
            ]),
        )
    }
}
