use std::fs;
use std::path::Path;

use tml_site::site::{build, BuildOptions, SiteSummary};
use tml_site::validate::{SchemaValidator, ValidationOutcome};

const COURSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<course id="js101" title="JavaScript Basics" level="beginner" duration="3h">
  <objective>Write small programs</objective>
  <module id="m2" title="Functions" order="2">
    <lesson id="fn" title="Functions">
      <content format="markdown"><![CDATA[Call `f()` to run it.

```html
<b>not bold</b>
```]]></content>
      <activity id="read1" type="reading">
        <instructions>Study the snippet.</instructions>
        <expected>```js
const add = (a, b) => a + b;
```
- arrow functions are expressions</expected>
      </activity>
      <assessment id="fnquiz" passScore="80">
        <question type="mcq" points="2">
          <stem>What does `return` do?</stem>
          <choice correct="true">Ends the function</choice>
          <choice>Loops</choice>
        </question>
        <question type="ordering">
          <prompt>Order the steps</prompt>
          <item>declare</item>
          <item>call</item>
        </question>
      </assessment>
    </lesson>
  </module>
  <module id="m1" title="Basics" order="1">
    <lesson id="intro" title="Hello &lt;script&gt;alert(1)&lt;/script&gt;" duration="10m">
      <content>Say **hi** to &lt;script&gt;alert(2)&lt;/script&gt;</content>
    </lesson>
    <lesson title="Nothing Here"/>
  </module>
</course>
"#;

fn write_course(dir: &Path, source: &str) -> std::path::PathBuf {
    let path = dir.join("course.tml");
    fs::write(&path, source).unwrap();
    path
}

fn generate(source: &str, template_dir: Option<&Path>) -> (tempfile::TempDir, SiteSummary) {
    let dir = tempfile::tempdir().unwrap();
    let tml = write_course(dir.path(), source);
    let options = BuildOptions {
        template_dir: template_dir.map(Path::to_path_buf),
        seed: Some(42),
    };
    let summary = build(&tml, &dir.path().join("site"), None, &options).unwrap();
    (dir, summary)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn writes_one_page_per_lesson_plus_index_and_manifest() {
    let (dir, summary) = generate(COURSE, None);
    let site = dir.path().join("site");

    assert_eq!(summary.lessons.len(), 3);
    assert_eq!(summary.index, site.join("index.html"));
    assert_eq!(summary.manifest, site.join("course.yaml"));

    let mut written: Vec<_> = fs::read_dir(&site)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            "course.yaml",
            "functions.html",
            "hello-script-alert-1-script.html",
            "index.html",
            "nothing-here.html",
        ]
    );
}

#[test]
fn index_lists_modules_by_order() {
    let (_dir, summary) = generate(COURSE, None);
    let index = read(&summary.index);

    let basics = index.find("<h2>Basics</h2>").unwrap();
    let functions = index.find("<h2>Functions</h2>").unwrap();
    assert!(basics < functions);
    assert!(index.contains(r#"data-total-lessons="3""#));
    assert!(index.contains("<li>Write small programs</li>"));
}

#[test]
fn author_text_is_escaped() {
    let (_dir, summary) = generate(COURSE, None);
    let index = read(&summary.index);
    let intro = read(&summary.lessons[0]);

    assert!(!index.contains("<script>alert(1)"));
    assert!(index.contains("Hello &lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!intro.contains("<script>alert(2)"));
    assert!(intro.contains("<strong>hi</strong>"));
}

#[test]
fn fenced_code_is_shown_not_interpreted() {
    let (_dir, summary) = generate(COURSE, None);
    let functions = read(&summary.lessons[2]);

    assert!(functions.contains("&lt;b&gt;not bold&lt;/b&gt;"));
    assert!(!functions.contains("<b>not bold</b>"));
    assert!(functions.contains("<code>f()</code>"));
}

#[test]
fn lesson_pages_number_their_slides() {
    let (_dir, summary) = generate(COURSE, None);

    let empty = read(&summary.lessons[1]);
    assert!(empty.contains("Slide 1 / 1"));

    let functions = read(&summary.lessons[2]);
    for number in 1..=4 {
        assert!(functions.contains(&format!("Slide {number} / 4")));
    }
    assert!(functions.contains("worked-example"));
    assert!(functions.contains("const add = (a, b) =&gt; a + b;"));
    assert!(functions.contains(r#"data-pass-score="80""#));
    assert!(functions.contains(r#"name="fnquiz__q1""#));
    assert!(functions.contains("<strong>Q2.</strong> Order the steps"));
}

#[test]
fn manifest_describes_the_lessons() {
    let (_dir, summary) = generate(COURSE, None);
    let manifest: serde_yaml_ng::Value = serde_yaml_ng::from_str(&read(&summary.manifest)).unwrap();

    assert_eq!(manifest["id"].as_str(), Some("js101"));
    assert_eq!(manifest["total_lessons"].as_u64(), Some(3));
    assert_eq!(manifest["lessons"][2]["file"].as_str(), Some("functions.html"));
    assert_eq!(manifest["lessons"][2]["slides"].as_u64(), Some(4));
}

#[test]
fn missing_lesson_title_is_reported_with_its_module() {
    let dir = tempfile::tempdir().unwrap();
    let tml = write_course(
        dir.path(),
        r#"<course title="C"><module title="Basics"><lesson duration="5m"/></module></course>"#,
    );

    let err = build(&tml, &dir.path().join("site"), None, &BuildOptions::default()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("(no id)"), "{message}");
    assert!(message.contains("module 'Basics'"), "{message}");
    assert!(!dir.path().join("site").exists());
}

#[test]
fn schema_rejection_stops_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let tml = write_course(dir.path(), COURSE);
    let reject = |_: &Path| ValidationOutcome::Invalid(String::from("bad element"));

    let err = build(
        &tml,
        &dir.path().join("site"),
        Some(&reject as &dyn SchemaValidator),
        &BuildOptions::default(),
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("bad element"));
    assert!(!dir.path().join("site").exists());
}

#[test]
fn lessons_sharing_a_title_share_a_file() {
    let (dir, summary) = generate(
        r#"<course title="C">
            <module title="A"><lesson title="Intro"><content>first</content></lesson></module>
            <module title="B"><lesson title="Intro"><content>second</content></lesson></module>
        </course>"#,
        None,
    );

    assert_eq!(summary.lessons.len(), 2);
    assert_eq!(summary.lessons[0], summary.lessons[1]);
    let page = read(&dir.path().join("site/intro.html"));
    assert!(page.contains("second"));
    assert!(!page.contains("first"));
}

#[test]
fn template_directory_overrides_builtins() {
    let templates = tempfile::tempdir().unwrap();
    fs::create_dir_all(templates.path().join("partials")).unwrap();
    fs::write(
        templates.path().join("partials/footer.html"),
        "<footer>Custom footer</footer>",
    )
    .unwrap();

    let (_dir, summary) = generate(COURSE, Some(templates.path()));

    assert!(read(&summary.index).contains("<footer>Custom footer</footer>"));
    assert!(read(&summary.lessons[0]).contains("<footer>Custom footer</footer>"));
}

#[test]
fn partial_cycles_fail_the_build() {
    let templates = tempfile::tempdir().unwrap();
    fs::create_dir_all(templates.path().join("partials")).unwrap();
    fs::write(templates.path().join("partials/header.html"), "{{> nav }}").unwrap();
    fs::write(templates.path().join("partials/nav.html"), "{{> header }}").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let tml = write_course(dir.path(), COURSE);
    let options = BuildOptions {
        template_dir: Some(templates.path().to_path_buf()),
        seed: None,
    };

    let err = build(&tml, &dir.path().join("site"), None, &options).unwrap_err();
    assert!(format!("{:#}", err).contains("header -> nav -> header"), "{err:#}");
}

#[test]
fn quotes_in_ids_stay_inside_script_strings() {
    let (_dir, summary) = generate(
        r#"<course id="x');alert(document.cookie);//" title="C">
            <module title="M"><lesson id="l" title="L"><assessment id="q'1"/></lesson></module>
        </course>"#,
        None,
    );
    let page = read(&summary.lessons[0]);

    let course_js = r"x\u0027\u0029\u003balert\u0028document.cookie\u0029\u003b\u002f\u002f";
    assert!(page.contains(&format!("markLessonComplete('{course_js}','l')")), "{page}");
    assert!(page.contains(&format!(r"checkQuiz('{course_js}','q\u00271')")));
    assert!(page.contains(r#"data-assessment="q&#x27;1""#));
    assert!(!page.contains("('x&#x27;"));
}
