//! Template Module
//!
//! A small template language for prompt labels. Literal text is copied as is;
//! actions between `{{` and `}}` print a value piped through style functions:
//!
//! ```text
//! {{ . }}                 the value itself
//! {{ .Name | bold }}      a field of a structured value, in bold
//! {{ "done" | green }}    a string literal, in green
//! ```
//!
//! Templates are compiled once against a [`FuncMap`] and rendered any number
//! of times against a `serde_json::Value`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crossterm::style::{style, Attribute, Color, Stylize};
use regex::Regex;
use serde_json::Value;

use crate::error::TemplateError;

/// Text printed for a field that does not exist
pub const NO_VALUE: &str = "<no value>";

/// A style transform usable after `|` in a template action
pub type StyleFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Named style functions available to templates
#[derive(Clone)]
pub struct FuncMap {
    funcs: HashMap<String, StyleFn>,
}

impl FuncMap {
    /// A map with no functions at all
    pub fn empty() -> Self {
        Self {
            funcs: HashMap::new(),
        }
    }

    /// Register (or replace) a function
    pub fn insert<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.funcs.insert(name.into(), Arc::new(func));
    }

    pub fn get(&self, name: &str) -> Option<&StyleFn> {
        self.funcs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Function names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FuncMap {
    /// Foreground colors, `bg`-prefixed background colors and text attributes
    fn default() -> Self {
        const COLORS: [(&str, Color); 8] = [
            ("black", Color::Black),
            ("red", Color::DarkRed),
            ("green", Color::DarkGreen),
            ("yellow", Color::DarkYellow),
            ("blue", Color::DarkBlue),
            ("magenta", Color::DarkMagenta),
            ("cyan", Color::DarkCyan),
            ("white", Color::Grey),
        ];
        const ATTRIBUTES: [(&str, Attribute); 4] = [
            ("bold", Attribute::Bold),
            ("faint", Attribute::Dim),
            ("italic", Attribute::Italic),
            ("underline", Attribute::Underlined),
        ];

        let mut funcs = Self::empty();
        for (name, color) in COLORS {
            funcs.insert(name, move |text: &str| fg(text, color));

            let mut chars = name.chars();
            let bg_name = match chars.next() {
                Some(first) => format!("bg{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => continue,
            };
            funcs.insert(bg_name, move |text: &str| bg(text, color));
        }
        for (name, attribute) in ATTRIBUTES {
            funcs.insert(name, move |text: &str| styled(text, attribute));
        }
        funcs
    }
}

impl fmt::Debug for FuncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncMap")
            .field("funcs", &self.names())
            .finish()
    }
}

/// Color `text` with a foreground color
pub fn fg(text: &str, color: Color) -> String {
    style(text).with(color).to_string()
}

/// Color `text` with a background color
pub fn bg(text: &str, color: Color) -> String {
    style(text).on(color).to_string()
}

/// Apply a text attribute such as bold
pub fn styled(text: &str, attribute: Attribute) -> String {
    style(text).attribute(attribute).to_string()
}

/// What an action prints before piping
#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    /// `.` or `.Field.Sub`; an empty path is the value itself
    Path(Vec<String>),
    Literal(String),
}

#[derive(Clone)]
struct Stage {
    name: String,
    func: StyleFn,
}

#[derive(Clone)]
enum Segment {
    Text(String),
    Action { operand: Operand, stages: Vec<Stage> },
}

/// A compiled template
#[derive(Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

fn action_regex() -> &'static Regex {
    static ACTION: OnceLock<Regex> = OnceLock::new();
    // Quoted literals are consumed whole so a "}}" inside one does not close the action
    ACTION.get_or_init(|| {
        Regex::new(r#"(?s)\{\{((?:"(?:[^"\\]|\\.)*"|[^"])*?)\}\}"#)
            .expect("action pattern is valid")
    })
}

impl Template {
    /// Compile `source` against `funcs`
    pub fn compile(source: &str, funcs: &FuncMap) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in action_regex().captures_iter(source) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_text(&mut segments, &source[last..whole.start()])?;
            segments.push(parse_action(body.as_str(), funcs)?);
            last = whole.end();
        }
        push_text(&mut segments, &source[last..])?;

        Ok(Self { segments })
    }

    /// Render against `value`
    pub fn render(&self, value: &Value) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Action { operand, stages } => {
                    let mut text = match operand {
                        Operand::Literal(literal) => literal.clone(),
                        Operand::Path(path) => lookup(value, path),
                    };
                    for stage in stages {
                        text = (stage.func)(&text);
                    }
                    out.push_str(&text);
                }
            }
        }
        out
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => list.entry(text),
                Segment::Action { operand, stages } => {
                    let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
                    list.entry(&(operand, names))
                }
            };
        }
        list.finish()
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) -> Result<(), TemplateError> {
    if text.contains("{{") {
        return Err(TemplateError::new("unclosed action"));
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
    Ok(())
}

fn parse_action(body: &str, funcs: &FuncMap) -> Result<Segment, TemplateError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(TemplateError::new("missing value for command"));
    }

    let (operand, mut rest) = parse_operand(body)?;
    let mut stages = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let after_pipe = rest
            .strip_prefix('|')
            .ok_or_else(|| TemplateError::new(format!("unexpected {:?} in command", rest)))?
            .trim_start();
        let end = after_pipe
            .find(|c: char| c.is_whitespace() || c == '|')
            .unwrap_or(after_pipe.len());
        let name = &after_pipe[..end];
        if name.is_empty() {
            return Err(TemplateError::new("missing function name after '|'"));
        }
        let func = funcs
            .get(name)
            .ok_or_else(|| TemplateError::new(format!("function {:?} not defined", name)))?;
        stages.push(Stage {
            name: name.to_string(),
            func: Arc::clone(func),
        });
        rest = &after_pipe[end..];
    }

    Ok(Segment::Action { operand, stages })
}

/// Split the leading operand off an action body
fn parse_operand(body: &str) -> Result<(Operand, &str), TemplateError> {
    if let Some(quoted) = body.strip_prefix('"') {
        let mut literal = String::new();
        let mut chars = quoted.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Ok((Operand::Literal(literal), &quoted[i + 1..])),
                '\\' => match chars.next() {
                    Some((_, 'n')) => literal.push('\n'),
                    Some((_, 't')) => literal.push('\t'),
                    Some((_, escaped)) => literal.push(escaped),
                    None => break,
                },
                other => literal.push(other),
            }
        }
        return Err(TemplateError::new("unterminated quoted string"));
    }

    if body.starts_with('.') {
        let end = body
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(body.len());
        let raw = &body[..end];
        let path = if raw == "." {
            Vec::new()
        } else {
            let fields: Vec<String> = raw[1..].split('.').map(str::to_string).collect();
            if fields.iter().any(String::is_empty) {
                return Err(TemplateError::new(format!("bad field reference {:?}", raw)));
            }
            fields
        };
        return Ok((Operand::Path(path), &body[end..]));
    }

    let word = body.split_whitespace().next().unwrap_or(body);
    Err(TemplateError::new(format!("unexpected operand {:?}", word)))
}

/// Resolve a dotted path and print the result
fn lookup(value: &Value, path: &[String]) -> String {
    let mut current = value;
    for field in path {
        match current.get(field) {
            Some(next) => current = next,
            None => return NO_VALUE.to_string(),
        }
    }
    value_to_text(current)
}

/// Print a value the way it should appear in a prompt
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => NO_VALUE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn plain_funcs() -> FuncMap {
        let mut funcs = FuncMap::empty();
        funcs.insert("upper", |text: &str| text.to_uppercase());
        funcs.insert("wrap", |text: &str| format!("[{}]", text));
        funcs
    }

    #[test]
    fn test_render_value_and_text() {
        let template = Template::compile("? {{ . }}: ", &plain_funcs()).unwrap();
        assert_eq!(template.render(&json!("Name")), "? Name: ");
    }

    #[test]
    fn test_pipeline_applies_in_order() {
        let template = Template::compile("{{ . | upper | wrap }}", &plain_funcs()).unwrap();
        assert_eq!(template.render(&json!("abc")), "[ABC]");
    }

    #[test]
    fn test_field_access() {
        let template = Template::compile("{{ .User.Name }} ({{ .Age }})", &plain_funcs()).unwrap();
        let value = json!({"User": {"Name": "ada"}, "Age": 36});
        assert_eq!(template.render(&value), "ada (36)");
        assert_eq!(template.render(&json!("flat")), "<no value> (<no value>)");
    }

    #[test]
    fn test_string_literal() {
        let template = Template::compile(r#"{{ "a \"b\" | c" | wrap }}"#, &plain_funcs()).unwrap();
        assert_eq!(template.render(&Value::Null), r#"[a "b" | c]"#);
    }

    #[test]
    fn test_closing_braces_inside_literal() {
        let template = Template::compile(r#"<{{ "}}" | wrap }}> {{ . }}"#, &plain_funcs()).unwrap();
        assert_eq!(template.render(&json!("x")), "<[}}]> x");
    }

    #[test]
    fn test_compile_errors() {
        let funcs = plain_funcs();
        let cases = [
            "{{ . | nope }}",
            "{{ }}",
            "{{ . ",
            "{{ name }}",
            r#"{{ "open }}"#,
            "{{ . | }}",
            "{{ . upper }}",
            "{{ .a..b }}",
        ];
        for source in cases {
            assert!(
                Template::compile(source, &funcs).is_err(),
                "expected {:?} to fail",
                source
            );
        }
    }

    #[test]
    fn test_unknown_function_is_named() {
        let err = Template::compile("{{ . | sparkle }}", &plain_funcs()).unwrap_err();
        assert!(err.to_string().contains("sparkle"));
    }

    #[test]
    fn test_default_funcs_present() {
        let funcs = FuncMap::default();
        for name in ["red", "bgRed", "cyan", "bgWhite", "bold", "faint", "italic", "underline"] {
            assert!(funcs.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_styled_output_wraps_text() {
        let funcs = FuncMap::default();
        let template = Template::compile("{{ . | bold }}", &funcs).unwrap();
        let rendered = template.render(&json!("label"));
        assert!(rendered.contains("label"));
        assert!(rendered.contains("\x1b[1m"));
    }

    #[test]
    fn test_compiling_twice_renders_identically() {
        let funcs = FuncMap::default();
        let source = "{{ . | red | bold }} {{ \"x\" | faint }}";
        let first = Template::compile(source, &funcs).unwrap();
        let second = Template::compile(source, &funcs).unwrap();
        let value = json!("same");
        assert_eq!(first.render(&value), second.render(&value));
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!("s")), "s");
        assert_eq!(value_to_text(&json!(3)), "3");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&Value::Null), NO_VALUE);
    }
}
