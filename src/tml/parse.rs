use log::{debug, info, warn};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::validate::{SchemaValidator, ValidationOutcome};

use super::{
    course::{Activity, Assessment, Content, ContentFormat, Course, Lesson, Module},
    error::ParseError,
    question::{Question, QuestionKind},
    xml::{self, Element, Node},
};

/// Read, optionally schema-check, and parse the course document at `path`.
pub fn parse(path: &Path, validator: Option<&dyn SchemaValidator>) -> Result<Course, ParseError> {
    let document = path.display().to_string();

    if let Some(validator) = validator {
        match validator.validate(path) {
            ValidationOutcome::Valid => info!("{} passed schema validation", document),
            ValidationOutcome::Skipped(reason) => {
                warn!("schema validation of {} skipped: {}", document, reason)
            }
            ValidationOutcome::Invalid(message) => {
                return Err(ParseError::Validation { document, message });
            }
        }
    }

    let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&document, &source)
}

/// Parse a course document held in memory. No schema check is done.
pub fn parse_str(source: &str) -> Result<Course, ParseError> {
    parse_document("<inline document>", source)
}

fn parse_document(document: &str, source: &str) -> Result<Course, ParseError> {
    let root = xml::parse_document(source).map_err(|e| ParseError::MalformedXml {
        document: document.to_string(),
        line: e.line,
        column: e.column,
        message: e.message,
    })?;

    if root.name != "course" {
        warn!("{}: root element is <{}>, expected <course>", document, root.name);
    }

    let title = attr_or_empty(&root, "title");
    let location = format!("course '{}'", title);

    let objectives = root
        .children_named("objective")
        .map(Element::text)
        .filter(|objective| !objective.is_empty())
        .collect();

    let mut modules = root
        .children_named("module")
        .map(|module| parse_module(module, &location))
        .collect::<Result<Vec<Module>, ParseError>>()?;

    // stable: equal orders keep document order
    modules.sort_by_key(|module| module.order);

    let course = Course {
        id: attr_or_empty(&root, "id"),
        title,
        level: attr_or_empty(&root, "level"),
        duration: attr_or_empty(&root, "duration"),
        objectives,
        modules,
    };
    debug!(
        "parsed course '{}': {} modules, {} lessons",
        course.title,
        course.modules.len(),
        course.lesson_count()
    );

    Ok(course)
}

fn parse_module(el: &Element, location: &str) -> Result<Module, ParseError> {
    let title = required(el, location, "title")?.to_string();
    let order = number(el, location, "order", 0_i64, "an integer")?;
    let inner = format!("{} > module '{}'", location, title);

    let lessons = el
        .children_named("lesson")
        .map(|lesson| parse_lesson(lesson, &inner, &title))
        .collect::<Result<Vec<Lesson>, ParseError>>()?;

    Ok(Module {
        id: attr_or_empty(el, "id"),
        title,
        order,
        lessons,
    })
}

fn parse_lesson(el: &Element, location: &str, module_title: &str) -> Result<Lesson, ParseError> {
    let title = required(el, location, "title")?.to_string();
    let inner = format!("{} > lesson '{}'", location, title);

    let content = el.children_named("content").map(parse_content).collect();

    let activities = el
        .children_named("activity")
        .map(|activity| Activity {
            id: attr_or_empty(activity, "id"),
            activity_type: attr_or_empty(activity, "type"),
            est: attr_or_empty(activity, "est"),
            instructions: activity.child_text("instructions"),
            expected: activity.child_text("expected"),
        })
        .collect();

    let assessments = el
        .children_named("assessment")
        .map(|assessment| parse_assessment(assessment, &inner))
        .collect::<Result<Vec<Assessment>, ParseError>>()?;

    Ok(Lesson {
        id: attr_or_empty(el, "id"),
        title,
        duration: attr_or_empty(el, "duration"),
        content,
        activities,
        assessments,
        module_title: module_title.to_string(),
    })
}

fn parse_content(el: &Element) -> Content {
    let format = ContentFormat::from_tag(el.attr("format").unwrap_or("markdown"));

    // html written as child elements keeps its markup; CDATA or plain
    // text is taken as-is
    let has_markup = el
        .children
        .iter()
        .any(|node| matches!(node, Node::Element(_)));
    let value = if format == ContentFormat::Html && has_markup {
        el.inner_xml().trim().to_string()
    } else {
        el.text()
    };

    Content {
        format,
        lang: attr_or_empty(el, "lang"),
        value,
    }
}

fn parse_assessment(el: &Element, location: &str) -> Result<Assessment, ParseError> {
    let id = attr_or_empty(el, "id");
    let pass_score = number(el, location, "passScore", 0.0_f64, "a number")?;
    let inner = format!("{} > assessment '{}'", location, id);

    let questions = el
        .children_named("question")
        .map(|question| -> Result<Question, ParseError> {
            let type_name = question.attr("type").unwrap_or("mcq");
            Ok(Question {
                points: number(question, &inner, "points", 1.0_f64, "a number")?,
                kind: QuestionKind::from_element(type_name, question),
            })
        })
        .collect::<Result<Vec<Question>, ParseError>>()?;

    Ok(Assessment {
        id,
        assessment_type: el.attr("type").unwrap_or("quiz").to_string(),
        pass_score: pass_score.trunc() as i64,
        questions,
    })
}

fn attr_or_empty(el: &Element, name: &str) -> String {
    el.attr(name).unwrap_or_default().to_string()
}

fn describe_id(el: &Element) -> String {
    match el.attr("id") {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => String::from("(no id)"),
    }
}

fn required<'a>(el: &'a Element, location: &str, attribute: &str) -> Result<&'a str, ParseError> {
    el.attr(attribute).ok_or_else(|| {
        let names = el.attribute_names();
        ParseError::MissingAttribute {
            element: el.name.clone(),
            id: describe_id(el),
            location: location.to_string(),
            attribute: attribute.to_string(),
            present: if names.is_empty() {
                String::from("none")
            } else {
                names.join(", ")
            },
        }
    })
}

// absent or blank attributes take the default
fn number<T: FromStr>(
    el: &Element,
    location: &str,
    attribute: &str,
    default: T,
    expected: &str,
) -> Result<T, ParseError> {
    match el.attr(attribute).map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| ParseError::InvalidAttribute {
            element: el.name.clone(),
            id: describe_id(el),
            location: location.to_string(),
            attribute: attribute.to_string(),
            value: raw.to_string(),
            expected: expected.to_string(),
        }),
    }
}
