mod course;
mod error;
mod parse;
mod question;
mod xml;

pub use course::{Activity, Assessment, Content, ContentFormat, Course, Lesson, Module};
pub use error::ParseError;
pub use parse::{parse, parse_str};
pub use question::{
    Choice, ChoiceSet, CodeTask, MatchPair, OpenPrompt, Question, QuestionKind, TrueFalse,
};
