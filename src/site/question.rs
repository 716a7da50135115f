use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::markdown::escape_html;
use crate::template::{Context, TemplateError};
use crate::tml::{Assessment, ChoiceSet, MatchPair, Question, QuestionKind};

use super::renderer::SiteRenderer;

/// Free-text answer box: prompt, textarea height, and what to prefill.
struct OpenAnswer<'q> {
    q_type: &'static str,
    rows: usize,
    prompt: &'q str,
    lang: &'q str,
    starter: &'q str,
    solution: Option<&'q str>,
}

fn or_instruction<'q>(prompt: &'q str, instruction: &'q str) -> &'q str {
    if prompt.is_empty() {
        instruction
    } else {
        prompt
    }
}

impl SiteRenderer<'_> {
    pub(super) fn render_questions(
        &mut self,
        assessment: &Assessment,
        key: &str,
    ) -> Result<String, TemplateError> {
        let mut html = String::new();
        for (index, question) in assessment.questions.iter().enumerate() {
            let number = index + 1;
            let name = format!("{}__q{}", key, number);
            html.push_str(&self.render_question(question, number, &name)?);
        }
        Ok(html)
    }

    fn render_question(
        &mut self,
        question: &Question,
        number: usize,
        name: &str,
    ) -> Result<String, TemplateError> {
        let points = question.points.to_string();
        let name = escape_html(name);

        match &question.kind {
            QuestionKind::Mcq(set) => self.choice_question("mcq", "radio", set, number, &points, &name),
            QuestionKind::Msq(set) => {
                self.choice_question("msq", "checkbox", set, number, &points, &name)
            }
            QuestionKind::TrueFalse(tf) => {
                let choices = format!(
                    "<label><input type=\"radio\" name=\"{0}\" value=\"true\"> True</label>\n  <label><input type=\"radio\" name=\"{0}\" value=\"false\"> False</label>",
                    name
                );
                let html = self.stemmed("truefalse", number, &points, &tf.statement, choices)?;
                Ok(html.replacen(
                    "data-type=\"truefalse\"",
                    &format!(
                        "data-type=\"truefalse\" data-answer=\"{}\"",
                        escape_html(&tf.answer)
                    ),
                    1,
                ))
            }
            QuestionKind::Short(open) => self.open_question(
                OpenAnswer {
                    q_type: "short",
                    rows: 4,
                    prompt: &open.prompt,
                    lang: "",
                    starter: "",
                    solution: open.solution.as_deref(),
                },
                number,
                &points,
                &name,
            ),
            QuestionKind::Long(open) => self.open_question(
                OpenAnswer {
                    q_type: "long",
                    rows: 8,
                    prompt: &open.prompt,
                    lang: "",
                    starter: "",
                    solution: open.solution.as_deref(),
                },
                number,
                &points,
                &name,
            ),
            QuestionKind::Code(task) => self.open_question(
                OpenAnswer {
                    q_type: "code",
                    rows: 10,
                    prompt: &task.prompt,
                    lang: &task.lang,
                    starter: &task.starter,
                    solution: task.solution.as_deref(),
                },
                number,
                &points,
                &name,
            ),
            QuestionKind::Matching { prompt, pairs } => {
                let rows = self.matching_rows(pairs, &name);
                let stem = or_instruction(prompt, "Match each item on the left with its partner.");
                self.stemmed("matching", number, &points, stem, rows)
            }
            QuestionKind::Ordering { prompt, items } => {
                let rows = self.ordering_rows(items, &name);
                let stem = or_instruction(prompt, "Number these items in the correct order.");
                self.stemmed("ordering", number, &points, stem, rows)
            }
            QuestionKind::Unsupported { type_name, raw } => Ok(format!(
                "<div class=\"q\" data-type=\"{0}\">\n  <div>Unsupported question type: {0}</div>\n  <pre hidden>{1}</pre>\n</div>",
                escape_html(type_name),
                escape_html(raw)
            )),
        }
    }

    fn choice_question(
        &mut self,
        q_type: &str,
        input_type: &str,
        set: &ChoiceSet,
        number: usize,
        points: &str,
        name: &str,
    ) -> Result<String, TemplateError> {
        // the client grader compares value against "true"
        let choices = set
            .choices
            .iter()
            .map(|choice| {
                format!(
                    "<label><input type=\"{}\" name=\"{}\" value=\"{}\"> {}</label>",
                    input_type,
                    name,
                    choice.correct,
                    escape_html(&choice.text)
                )
            })
            .collect::<Vec<String>>()
            .join("<br>");

        self.stemmed(q_type, number, points, &set.stem, choices)
    }

    // partials/question.html with an escaped stem and prebuilt inputs
    fn stemmed(
        &mut self,
        q_type: &str,
        number: usize,
        points: &str,
        stem: &str,
        choices: String,
    ) -> Result<String, TemplateError> {
        let context = Context::from([
            ("q_type", q_type.to_string()),
            ("q_index", number.to_string()),
            ("points", points.to_string()),
            ("stem", escape_html(stem)),
            ("choices", choices),
        ]);
        self.engine.render("partials/question.html", &context)
    }

    fn open_question(
        &mut self,
        answer: OpenAnswer,
        number: usize,
        points: &str,
        name: &str,
    ) -> Result<String, TemplateError> {
        let solution_html = match answer.solution {
            Some(solution) if answer.q_type == "code" => format!(
                "<div class=\"solution\" hidden><pre><code class=\"language-{}\">{}</code></pre></div>",
                escape_html(answer.lang),
                escape_html(solution)
            ),
            Some(solution) => format!(
                "<div class=\"solution\" hidden>{}</div>",
                escape_html(solution)
            ),
            None => String::new(),
        };

        let context = Context::from([
            ("q_type", answer.q_type.to_string()),
            ("q_index", number.to_string()),
            ("points", points.to_string()),
            ("prompt", escape_html(answer.prompt)),
            ("q_name", name.to_string()),
            ("rows", answer.rows.to_string()),
            ("lang", escape_html(answer.lang)),
            ("starter", escape_html(answer.starter)),
            ("solution_html", solution_html),
        ]);
        self.engine.render("partials/question_open.html", &context)
    }

    // every row offers the same options: all right-hand values, shuffled once
    fn matching_rows(&mut self, pairs: &[MatchPair], name: &str) -> String {
        let mut seen = HashSet::new();
        let mut options: Vec<&str> = pairs
            .iter()
            .map(|pair| pair.right.as_str())
            .filter(|right| seen.insert(*right))
            .collect();
        options.shuffle(&mut self.rng);

        let options_html = std::iter::once(String::from("<option value=\"\">Choose...</option>"))
            .chain(options.iter().map(|option| {
                let option = escape_html(option);
                format!("<option value=\"{0}\">{0}</option>", option)
            }))
            .collect::<Vec<String>>()
            .join("");

        pairs
            .iter()
            .enumerate()
            .map(|(index, pair)| {
                format!(
                    "<div class=\"match\"><span>{}</span> <select name=\"{}__{}\" data-answer=\"{}\">{}</select></div>",
                    escape_html(&pair.left),
                    name,
                    index + 1,
                    escape_html(&pair.right),
                    options_html
                )
            })
            .collect::<Vec<String>>()
            .join("\n  ")
    }

    // shown shuffled; data-correct holds the 1-based document position
    fn ordering_rows(&mut self, items: &[String], name: &str) -> String {
        let total = items.len();
        let mut positions: Vec<usize> = (0..total).collect();
        positions.shuffle(&mut self.rng);

        positions
            .into_iter()
            .map(|position| {
                format!(
                    "<div class=\"order\"><input type=\"number\" name=\"{}__{}\" min=\"1\" max=\"{}\" data-correct=\"{}\"> {}</div>",
                    name,
                    position + 1,
                    total,
                    position + 1,
                    escape_html(&items[position])
                )
            })
            .collect::<Vec<String>>()
            .join("\n  ")
    }
}

#[cfg(test)]
mod tests {
    use crate::template::TemplateEngine;
    use crate::tml::{parse_str, Course};

    use super::super::renderer::SiteRenderer;

    fn course(questions: &str) -> Course {
        parse_str(&format!(
            r#"<course id="c1" title="C"><module title="M"><lesson title="L">
                <assessment id="quiz1" passScore="50">{}</assessment>
            </lesson></module></course>"#,
            questions
        ))
        .unwrap()
    }

    fn render(course: &Course) -> String {
        let mut renderer = SiteRenderer::new(course, TemplateEngine::default()).with_seed(7);
        let assessment = &course.modules[0].lessons[0].assessments[0];
        renderer.render_questions(assessment, "quiz1").unwrap()
    }

    #[test]
    fn mcq_values_carry_truth() {
        let course = course(
            r#"<question type="mcq" points="2"><stem>Pick &lt;one&gt;</stem>
                <choice correct="true">yes</choice><choice>no</choice></question>"#,
        );
        let html = render(&course);
        assert!(html.contains(r#"data-type="mcq" data-points="2""#), "{html}");
        assert!(html.contains("Pick &lt;one&gt;"));
        assert!(html.contains(
            r#"<label><input type="radio" name="quiz1__q1" value="true"> yes</label><br><label><input type="radio" name="quiz1__q1" value="false"> no</label>"#
        ));
    }

    #[test]
    fn msq_uses_checkboxes() {
        let course = course(r#"<question type="msq"><stem>S</stem><choice correct="true">a</choice></question>"#);
        assert!(render(&course).contains(r#"<input type="checkbox" name="quiz1__q1" value="true">"#));
    }

    #[test]
    fn true_false_gets_answer_attribute() {
        let course = course(
            r#"<question type="truefalse"><statement>Sky is blue</statement><answer value="true"/></question>"#,
        );
        let html = render(&course);
        assert!(html.contains(r#"data-type="truefalse" data-answer="true" data-points="1""#), "{html}");
        assert!(html.contains(r#"value="false"> False</label>"#));
    }

    #[test]
    fn open_questions_size_their_answer_box() {
        let course = course(
            r#"<question type="short"><prompt>Why?</prompt><solution>Because</solution></question>
               <question type="long"><prompt>Explain</prompt></question>
               <question type="code" lang="js"><prompt>Write f</prompt><starter>let f = () =&gt; 1;</starter><solution>f()</solution></question>"#,
        );
        let html = render(&course);
        assert!(html.contains(r#"<textarea name="quiz1__q1" rows="4" data-lang="">"#), "{html}");
        assert!(html.contains(r#"<div class="solution" hidden>Because</div>"#));
        assert!(html.contains(r#"<textarea name="quiz1__q2" rows="8" data-lang="">"#));
        assert!(html.contains(
            r#"<textarea name="quiz1__q3" rows="10" data-lang="js">let f = () =&gt; 1;</textarea>"#
        ));
        assert!(html.contains(
            r#"<div class="solution" hidden><pre><code class="language-js">f()</code></pre></div>"#
        ));
    }

    #[test]
    fn matching_offers_every_right_value_to_every_row() {
        let course = course(
            r#"<question type="matching">
                <pair><left>cat</left><right>meow</right></pair>
                <pair><left>dog</left><right>woof</right></pair>
                <pair><left>cow</left><right>moo</right></pair>
            </question>"#,
        );
        let html = render(&course);

        let selects: Vec<&str> = html.split("<select").skip(1).collect();
        assert_eq!(selects.len(), 3);
        assert!(html.contains(r#"name="quiz1__q1__2" data-answer="woof""#));

        let options_of = |select: &str| {
            let inner = select.split("</select>").next().unwrap();
            inner[inner.find('>').unwrap()..].to_string()
        };
        let first_options = options_of(selects[0]);
        for select in &selects[1..] {
            assert_eq!(options_of(select), first_options);
        }
        for value in ["meow", "woof", "moo"] {
            assert!(first_options.contains(&format!("<option value=\"{value}\">{value}</option>")));
        }
    }

    #[test]
    fn ordering_marks_document_positions() {
        let course = course(
            r#"<question type="ordering"><item>first</item><item>second</item><item>third</item></question>"#,
        );
        let html = render(&course);
        assert!(html.contains("Number these items in the correct order."));
        for (position, item) in ["first", "second", "third"].iter().enumerate() {
            assert!(
                html.contains(&format!(
                    r#"max="3" data-correct="{}"> {}</div>"#,
                    position + 1,
                    item
                )),
                "{html}"
            );
        }
    }

    #[test]
    fn author_prompts_replace_the_default_instruction() {
        let course = course(
            r#"<question type="ordering"><prompt>Sort &lt;these&gt;</prompt><item>a</item></question>
               <question type="matching"><stem>Pair them</stem><pair left="x" right="y"/></question>"#,
        );
        let html = render(&course);
        assert!(html.contains("<strong>Q1.</strong> Sort &lt;these&gt;"), "{html}");
        assert!(html.contains("<strong>Q2.</strong> Pair them"));
        assert!(!html.contains("Number these items"));
        assert!(!html.contains("Match each item"));
    }

    #[test]
    fn unknown_types_render_a_marker() {
        let course = course(r#"<question type="hotspot"><area/></question>"#);
        let html = render(&course);
        assert!(html.contains("Unsupported question type: hotspot"));
        assert!(html.contains("&lt;question type=&quot;hotspot&quot;&gt;"));
    }
}
