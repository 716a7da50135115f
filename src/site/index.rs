use crate::markdown::escape_html;
use crate::template::{Context, TemplateError};

use super::renderer::SiteRenderer;

fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        String::from("n/a")
    } else {
        escape_html(value)
    }
}

impl SiteRenderer<'_> {
    /// Course landing page: objectives and every module with its lessons.
    pub(super) fn render_index(&mut self) -> Result<String, TemplateError> {
        let course = self.course;

        let mut module_cards = Vec::with_capacity(course.modules.len());
        for module in &course.modules {
            let mut items = Vec::with_capacity(module.lessons.len());
            for lesson in &module.lessons {
                let context = Context::from([
                    ("lesson_file", escape_html(&lesson.file_name())),
                    ("lesson_title", escape_html(&lesson.title)),
                    ("duration", escape_html(&lesson.duration)),
                ]);
                items.push(self.engine.render("partials/lesson_item.html", &context)?);
            }

            let context = Context::from([
                ("mod_title", escape_html(&module.title)),
                ("lessons", items.join("\n")),
            ]);
            module_cards.push(self.engine.render("partials/module_card.html", &context)?);
        }

        let objectives = course
            .objectives
            .iter()
            .map(|objective| format!("<li>{}</li>", escape_html(objective)))
            .collect::<Vec<String>>()
            .join("\n");

        let header = self.engine.render(
            "partials/index_header.html",
            &Context::from([
                ("title", escape_html(&course.title)),
                ("level", or_not_available(&course.level)),
                ("duration", or_not_available(&course.duration)),
            ]),
        )?;

        let content = format!(
            "<div class=\"card\">\n  <h2>Objectives</h2>\n  <ul>{}</ul>\n</div>\n{}",
            objectives,
            module_cards.join("\n")
        );

        self.engine.render(
            "base.html",
            &Context::from([
                ("title", format!("{} — Course", escape_html(&course.title))),
                ("course_id", escape_html(&course.id)),
                ("total_lessons", course.lesson_count().to_string()),
                ("header_content", header),
                ("content", content),
            ]),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::template::TemplateEngine;
    use crate::tml::parse_str;

    use super::super::renderer::SiteRenderer;

    #[test]
    fn lists_modules_in_order_with_lesson_links() {
        let course = parse_str(
            r#"<course id="c1" title="Tools &amp; Tips" level="intro">
                <objective>Use &lt;kbd&gt; shortcuts</objective>
                <module title="Later" order="5"><lesson title="Wrap Up" duration="5m"/></module>
                <module title="Sooner" order="1"><lesson title="Getting Started"/></module>
            </course>"#,
        )
        .unwrap();

        let html = SiteRenderer::new(&course, TemplateEngine::default())
            .render_index()
            .unwrap();

        assert!(html.contains("<title>Tools &amp; Tips — Course</title>"));
        assert!(html.contains(r#"data-course-id="c1" data-total-lessons="2""#));
        assert!(html.contains("<li>Use &lt;kbd&gt; shortcuts</li>"));
        assert!(html.contains(r#"<span class="badge">Level: intro</span>"#));
        assert!(html.contains(r#"<span class="badge">Duration: n/a</span>"#));
        assert!(html.contains(
            r#"<li><a href="wrap-up.html">Wrap Up</a> <span class="small">5m</span></li>"#
        ));

        let sooner = html.find("<h2>Sooner</h2>").unwrap();
        let later = html.find("<h2>Later</h2>").unwrap();
        assert!(sooner < later);
        assert!(!html.contains("{{"));
    }
}
