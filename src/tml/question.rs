use log::warn;

use super::xml::Element;

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub points: f64,
    pub kind: QuestionKind,
}

/// Question payload; which fields exist is decided by the `type` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Mcq(ChoiceSet),
    Msq(ChoiceSet),
    TrueFalse(TrueFalse),
    Short(OpenPrompt),
    Long(OpenPrompt),
    Code(CodeTask),
    Matching {
        /// may be empty
        prompt: String,
        pairs: Vec<MatchPair>,
    },
    Ordering {
        prompt: String,
        /// in their correct order
        items: Vec<String>,
    },
    /// a type this generator has no layout for, kept as source XML
    Unsupported { type_name: String, raw: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSet {
    pub stem: String,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrueFalse {
    pub statement: String,
    /// "true" or "false"
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenPrompt {
    pub prompt: String,
    pub solution: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeTask {
    pub prompt: String,
    pub lang: String,
    pub starter: String,
    pub tests: String,
    pub solution: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

impl Question {
    pub fn type_name(&self) -> &str {
        match &self.kind {
            QuestionKind::Mcq(_) => "mcq",
            QuestionKind::Msq(_) => "msq",
            QuestionKind::TrueFalse(_) => "truefalse",
            QuestionKind::Short(_) => "short",
            QuestionKind::Long(_) => "long",
            QuestionKind::Code(_) => "code",
            QuestionKind::Matching { .. } => "matching",
            QuestionKind::Ordering { .. } => "ordering",
            QuestionKind::Unsupported { type_name, .. } => type_name,
        }
    }
}

impl QuestionKind {
    pub(super) fn from_element(type_name: &str, el: &Element) -> Self {
        match type_name.trim().to_lowercase().as_str() {
            "mcq" => QuestionKind::Mcq(choice_set(el)),
            "msq" => QuestionKind::Msq(choice_set(el)),
            "truefalse" => QuestionKind::TrueFalse(true_false(el)),
            "short" => QuestionKind::Short(open_prompt(el)),
            "long" => QuestionKind::Long(open_prompt(el)),
            "code" => QuestionKind::Code(code_task(el)),
            "matching" => QuestionKind::Matching {
                prompt: prompt_or_stem(el),
                pairs: el.children_named("pair").map(match_pair).collect(),
            },
            "ordering" => QuestionKind::Ordering {
                prompt: prompt_or_stem(el),
                items: el.children_named("item").map(Element::text).collect(),
            },
            _ => {
                warn!("question type '{}' is not supported, keeping its source", type_name);
                QuestionKind::Unsupported {
                    type_name: type_name.to_string(),
                    raw: el.to_xml(),
                }
            }
        }
    }
}

fn choice_set(el: &Element) -> ChoiceSet {
    ChoiceSet {
        stem: el.child_text("stem"),
        choices: el
            .children_named("choice")
            .map(|choice| Choice {
                text: choice.text(),
                correct: choice
                    .attr("correct")
                    .is_some_and(|value| value.trim().eq_ignore_ascii_case("true")),
            })
            .collect(),
    }
}

fn true_false(el: &Element) -> TrueFalse {
    let answer = el
        .child("answer")
        .map(|answer| match answer.attr("value") {
            Some(value) => value.trim().to_lowercase(),
            None => answer.text().to_lowercase(),
        })
        .filter(|answer| !answer.is_empty())
        .unwrap_or_else(|| String::from("false"));

    TrueFalse {
        statement: el.child_text("statement"),
        answer,
    }
}

fn open_prompt(el: &Element) -> OpenPrompt {
    OpenPrompt {
        prompt: el.child_text("prompt"),
        solution: non_empty(el.child_text("solution")),
    }
}

fn code_task(el: &Element) -> CodeTask {
    let starter = el.child("starter");
    let lang = el
        .attr("lang")
        .or_else(|| starter.and_then(|s| s.attr("lang")))
        .unwrap_or_default();

    CodeTask {
        prompt: el.child_text("prompt"),
        lang: lang.trim().to_string(),
        starter: starter.map(code_text).unwrap_or_default(),
        tests: el.child("tests").map(code_text).unwrap_or_default(),
        solution: el.child("solution").map(code_text).and_then(non_empty),
    }
}

fn prompt_or_stem(el: &Element) -> String {
    match el.child_text("prompt") {
        prompt if prompt.is_empty() => el.child_text("stem"),
        prompt => prompt,
    }
}

fn match_pair(pair: &Element) -> MatchPair {
    let side = |name: &str| match pair.child(name) {
        Some(el) => el.text(),
        None => pair.attr(name).unwrap_or_default().trim().to_string(),
    };

    MatchPair {
        left: side("left"),
        right: side("right"),
    }
}

// keep indentation, drop surrounding blank lines
fn code_text(el: &Element) -> String {
    el.raw_text()
        .trim_start_matches(|c: char| c == '\n' || c == '\r')
        .trim_end()
        .to_string()
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
