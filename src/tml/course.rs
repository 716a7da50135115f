use crate::slug::safe_filename;

use super::question::Question;

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    /// may be empty when the document omits it
    pub id: String,
    pub title: String,
    pub level: String,
    pub duration: String,
    pub objectives: Vec<String>,
    /// sorted by `order`, document order among equals
    pub modules: Vec<Module>,
}

impl Course {
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|module| module.lessons.iter())
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|module| module.lessons.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub order: i64,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub duration: String,
    pub content: Vec<Content>,
    pub activities: Vec<Activity>,
    pub assessments: Vec<Assessment>,
    /// title of the owning module
    pub module_title: String,
}

impl Lesson {
    /// Output file name. Lessons with the same title share it.
    pub fn file_name(&self) -> String {
        format!("{}.html", safe_filename(&self.title))
    }

    /// Identifier used for progress tracking: the id, or the title slug.
    pub fn key(&self) -> String {
        if self.id.is_empty() {
            safe_filename(&self.title)
        } else {
            self.id.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFormat {
    Markdown,
    Html,
    /// anything else, shown as preformatted text
    Other(String),
}

impl ContentFormat {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "markdown" => ContentFormat::Markdown,
            "html" => ContentFormat::Html,
            _ => ContentFormat::Other(tag.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub format: ContentFormat,
    pub lang: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: String,
    pub activity_type: String,
    pub est: String,
    pub instructions: String,
    pub expected: String,
}

impl Activity {
    pub fn normalized_type(&self) -> String {
        self.activity_type.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub id: String,
    pub assessment_type: String,
    pub pass_score: i64,
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str, title: &str) -> Lesson {
        Lesson {
            id: id.to_string(),
            title: title.to_string(),
            duration: String::new(),
            content: vec![],
            activities: vec![],
            assessments: vec![],
            module_title: String::from("M"),
        }
    }

    #[test]
    fn lesson_key_falls_back_to_slug() {
        assert_eq!(lesson("", "Hello World").key(), "hello-world");
        assert_eq!(lesson("l-1", "Hello World").key(), "l-1");
    }

    #[test]
    fn lesson_file_ignores_id() {
        assert_eq!(lesson("a", "Intro").file_name(), "intro.html");
        assert_eq!(lesson("b", "Intro").file_name(), "intro.html");
    }

    #[test]
    fn content_format_tags() {
        assert_eq!(ContentFormat::from_tag("Markdown"), ContentFormat::Markdown);
        assert_eq!(ContentFormat::from_tag("html"), ContentFormat::Html);
        assert_eq!(
            ContentFormat::from_tag("text"),
            ContentFormat::Other(String::from("text"))
        );
    }

    #[test]
    fn counts_lessons_across_modules() {
        let course = Course {
            id: String::from("c"),
            title: String::from("C"),
            level: String::new(),
            duration: String::new(),
            objectives: vec![],
            modules: vec![
                Module {
                    id: String::new(),
                    title: String::from("A"),
                    order: 0,
                    lessons: vec![lesson("", "x"), lesson("", "y")],
                },
                Module {
                    id: String::new(),
                    title: String::from("B"),
                    order: 1,
                    lessons: vec![lesson("", "z")],
                },
            ],
        };
        assert_eq!(course.lesson_count(), 3);
        assert_eq!(
            course.lessons().map(|l| l.title.as_str()).collect::<Vec<_>>(),
            vec!["x", "y", "z"]
        );
    }
}
