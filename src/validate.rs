//! Optional schema check run before a course document is parsed.

use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    /// The document violates the schema; carries the validator's report.
    Invalid(String),
    /// No check was possible (no schema, no validator). Not an error.
    Skipped(String),
}

pub trait SchemaValidator {
    fn validate(&self, document: &Path) -> ValidationOutcome;
}

impl<F> SchemaValidator for F
where
    F: Fn(&Path) -> ValidationOutcome,
{
    fn validate(&self, document: &Path) -> ValidationOutcome {
        self(document)
    }
}

/// Validates against an XSD with the `xmllint` command line tool.
#[derive(Debug, Clone)]
pub struct Xmllint {
    schema: Option<PathBuf>,
    program: String,
}

impl Xmllint {
    pub fn new(schema: Option<PathBuf>) -> Self {
        Self {
            schema,
            program: String::from("xmllint"),
        }
    }

    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }
}

impl SchemaValidator for Xmllint {
    fn validate(&self, document: &Path) -> ValidationOutcome {
        let Some(schema) = self.schema.as_ref() else {
            return ValidationOutcome::Skipped(String::from("no schema configured"));
        };
        if !schema.is_file() {
            return ValidationOutcome::Skipped(format!("schema {} not found", schema.display()));
        }

        debug!(
            "running {} against {} with schema {}",
            self.program,
            document.display(),
            schema.display()
        );
        let result = Command::new(&self.program)
            .arg("--noout")
            .arg("--schema")
            .arg(schema)
            .arg(document)
            .output();

        match result {
            Ok(output) if output.status.success() => ValidationOutcome::Valid,
            Ok(output) => {
                let report = String::from_utf8_lossy(&output.stderr).trim().to_string();
                if report.is_empty() {
                    ValidationOutcome::Invalid(format!("{} exited with {}", self.program, output.status))
                } else {
                    ValidationOutcome::Invalid(report)
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                ValidationOutcome::Skipped(format!("{} is not installed", self.program))
            }
            Err(e) => ValidationOutcome::Skipped(format!("could not run {}: {}", self.program, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn no_schema_is_skipped() {
        let outcome = Xmllint::new(None).validate(Path::new("course.tml"));
        assert_eq!(outcome, ValidationOutcome::Skipped("no schema configured".into()));
    }

    #[test]
    fn missing_schema_file_is_skipped() {
        let outcome = Xmllint::new(Some(PathBuf::from("/definitely/not/here.xsd")))
            .validate(Path::new("course.tml"));
        assert!(matches!(outcome, ValidationOutcome::Skipped(msg) if msg.contains("not found")));
    }

    #[test]
    fn missing_tool_is_skipped() {
        let schema = NamedTempFile::new().unwrap();
        let outcome = Xmllint::new(Some(schema.path().to_path_buf()))
            .with_program("tml-site-no-such-validator")
            .validate(Path::new("course.tml"));
        assert_eq!(
            outcome,
            ValidationOutcome::Skipped("tml-site-no-such-validator is not installed".into())
        );
    }

    #[test]
    fn closures_are_validators() {
        let reject = |_: &Path| ValidationOutcome::Invalid(String::from("bad"));
        assert_eq!(
            reject.validate(Path::new("x")),
            ValidationOutcome::Invalid(String::from("bad"))
        );
    }
}
