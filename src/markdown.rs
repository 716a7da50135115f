//! The small markdown dialect course authors write lesson content in:
//! `#`/`##`/`###` headings, `**bold**`, `*italic*`, `` `code` ``, fenced
//! code blocks and `- ` list items. Everything else is a paragraph.
//!
//! All author text is HTML-escaped before any markup is introduced, so
//! the only tags in the output are the ones produced here.

use regex::Regex;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_+-]*)[^\n`]*\n(.*?)```").expect("valid fence regex")
});
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").expect("valid italic regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid inline code regex"));
static CODE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\x00CODEBLOCK(\d+)\x00$").expect("valid token regex"));

// NUL never reaches the output, so authors cannot spell a block token
const TOKEN_MARK: char = '\0';

// stands in for an unmatched `**` while italics are replaced
const DOUBLE_STAR_GUARD: &str = "\u{1}\u{1}";

struct CodeBlock {
    lang: String,
    body: String,
}

impl CodeBlock {
    fn to_html(&self) -> String {
        if self.lang.is_empty() {
            format!("<pre><code>{}</code></pre>", self.body)
        } else {
            format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                self.lang, self.body
            )
        }
    }
}

/// Escape `& < > " '` so `text` can be placed in element content or a
/// quoted attribute.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Escape `text` for a quoted JavaScript string inside an HTML attribute.
/// Everything but ASCII letters, digits, `_`, `-` and `.` becomes a
/// `\uXXXX` escape, so the result needs no further HTML escaping.
pub fn escape_js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units).iter() {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// Convert restricted markdown to HTML.
pub fn safe_markdown(text: &str) -> String {
    let mut blocks: Vec<CodeBlock> = Vec::new();

    // Code blocks leave the text before escaping; a token that survives
    // escaping unchanged marks where each one goes back.
    let text = text.replace(TOKEN_MARK, "");
    let tokenized = FENCE.replace_all(&text, |caps: &regex::Captures| {
        let body = caps[2].trim_end_matches('\n');
        blocks.push(CodeBlock {
            lang: caps[1].to_string(),
            body: escape_html(body),
        });
        format!("\n{0}CODEBLOCK{1}{0}\n", TOKEN_MARK, blocks.len() - 1)
    });

    let escaped = escape_html(&tokenized);
    let emphasised = apply_emphasis(&escaped);

    let mut lines: Vec<String> = Vec::new();
    for line in emphasised.lines() {
        let s = line.trim();
        if s.is_empty() {
            continue;
        }

        if let Some(block) = CODE_TOKEN
            .captures(s)
            .and_then(|caps| caps[1].parse::<usize>().ok())
            .and_then(|index| blocks.get(index))
        {
            lines.push(block.to_html());
            continue;
        }

        let html = if let Some(rest) = s.strip_prefix("### ") {
            format!("<h3>{}</h3>", rest)
        } else if let Some(rest) = s.strip_prefix("## ") {
            format!("<h2>{}</h2>", rest)
        } else if let Some(rest) = s.strip_prefix("# ") {
            format!("<h1>{}</h1>", rest)
        } else if let Some(rest) = s.strip_prefix("- ") {
            format!("<li>{}</li>", rest)
        } else {
            format!("<p>{}</p>", s)
        };

        lines.push(INLINE_CODE.replace_all(&html, "<code>${1}</code>").into_owned());
    }

    wrap_list_items(lines)
}

fn apply_emphasis(text: &str) -> String {
    let bold = BOLD.replace_all(text, "<strong>${1}</strong>");
    let guarded = bold.replace("**", DOUBLE_STAR_GUARD);
    let italic = ITALIC.replace_all(&guarded, "<em>${1}</em>");
    italic.replace(DOUBLE_STAR_GUARD, "**")
}

fn wrap_list_items(lines: Vec<String>) -> String {
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 2);
    let mut in_list = false;

    for line in lines {
        let is_item = line.starts_with("<li>");
        if is_item && !in_list {
            out.push(String::from("<ul>"));
            in_list = true;
        } else if !is_item && in_list {
            out.push(String::from("</ul>"));
            in_list = false;
        }
        out.push(line);
    }
    if in_list {
        out.push(String::from("</ul>"));
    }

    out.join("\n")
}
