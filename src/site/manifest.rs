use serde::Serialize;
use std::collections::BTreeMap;

use crate::tml::Course;

use super::slides::plan_slides;

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum CourseManifest<'a> {
    Text(&'a str),
    Count(usize),
    Objectives(&'a [String]),
    Lessons(Vec<LessonEntry<'a>>),
}

#[derive(Serialize, Debug)]
struct LessonEntry<'a> {
    title: &'a str,
    module: &'a str,
    file: String,
    slides: usize,
}

/// `course.yaml`: course metadata and the generated lesson pages.
pub fn serialize_manifest(course: &Course) -> Result<String, serde_yaml_ng::Error> {
    let lessons = course
        .lessons()
        .map(|lesson| LessonEntry {
            title: &lesson.title,
            module: &lesson.module_title,
            file: lesson.file_name(),
            slides: plan_slides(lesson).len(),
        })
        .collect();

    let mut map = BTreeMap::<&str, CourseManifest>::new();
    map.insert("id", CourseManifest::Text(&course.id));
    map.insert("title", CourseManifest::Text(&course.title));
    map.insert("level", CourseManifest::Text(&course.level));
    map.insert("duration", CourseManifest::Text(&course.duration));
    map.insert("objectives", CourseManifest::Objectives(&course.objectives));
    map.insert("total_lessons", CourseManifest::Count(course.lesson_count()));
    map.insert("lessons", CourseManifest::Lessons(lessons));

    serde_yaml_ng::to_string(&map)
}
