//! Minimal template pass used for every Terraform fragment.
//!
//! Tags are written `{{ ... }}` and must fit on one line:
//!
//! - `{{ path }}` interpolates a context value, escaped for use inside an
//!   HCL string literal;
//! - `{{ property "key" path }}` renders `key = "value"`, or nothing at all
//!   when the value is blank;
//! - `{{ if path }}` ... `{{ end }}` keeps its body when the value is a
//!   non-empty string or `true`.
//!
//! A tag that is alone on its line is "standalone". Standalone `if`/`end`
//! tags and blank standalone properties remove their whole line, so the
//! output never carries empty placeholder lines.

use std::collections::BTreeMap;

use crate::config::{BaseSettings, keys};
use crate::error::RenderError;

/// A value that can be referenced from a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    /// String value.
    Text(String),
    /// Boolean value.
    Flag(bool),
}

impl TemplateValue {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Flag(flag) => *flag,
        }
    }
}

/// Named values available to a template, addressed by dotted path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, TemplateValue>,
}

impl TemplateContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Adds a string value.
    #[must_use]
    pub fn with_text(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.values
            .insert(path.into(), TemplateValue::Text(value.into()));
        self
    }

    /// Adds a boolean value.
    #[must_use]
    pub fn with_flag(mut self, path: impl Into<String>, value: bool) -> Self {
        self.values.insert(path.into(), TemplateValue::Flag(value));
        self
    }

    /// Adds every settings field under `prefix`, using the wire key names
    /// (`config.api_key`, `config.type`, ...).
    #[must_use]
    pub fn with_settings(self, prefix: &str, settings: &BaseSettings) -> Self {
        let field = |key: &str| format!("{prefix}.{key}");
        self.with_text(field(keys::API_KEY), settings.api_key.as_str())
            .with_text(field(keys::DATASET), settings.dataset.as_str())
            .with_text(field(keys::TYPE), settings.provider_type.as_str())
            .with_text(field(keys::URL), settings.url.as_str())
            .with_flag(field(keys::TRACK_DEPLOYMENTS), settings.track_deployments)
    }

    fn lookup(&self, path: &str) -> Result<&TemplateValue, RenderError> {
        self.values
            .get(path)
            .ok_or_else(|| RenderError::UnknownVariable {
                path: path.to_owned(),
            })
    }
}

/// Placement of a tag within its line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Layout {
    Inline,
    Standalone { indent: String, line_ending: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Variable {
        path: String,
        layout: Layout,
    },
    Property {
        key: String,
        path: String,
        layout: Layout,
    },
    If {
        path: String,
        body: Vec<Node>,
    },
}

#[derive(Debug)]
enum Tag {
    Variable(String),
    Property { key: String, path: String },
    If(String),
    End,
}

#[derive(Debug, PartialEq, Eq)]
enum Arg {
    Word(String),
    Quoted(String),
}

/// A parsed template, ready to render against any [`TemplateContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

struct OpenBlock {
    path: String,
    offset: usize,
    body: Vec<Node>,
}

impl Template {
    /// Parses `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] for unterminated tags, unknown directives,
    /// malformed arguments and unbalanced `if`/`end` pairs.
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut root = Vec::new();
        let mut open: Vec<OpenBlock> = Vec::new();
        let mut offset = 0;

        for line in source.split_inclusive('\n') {
            for (token, token_offset) in tokenize_line(line, offset)? {
                let body = open.last_mut().map_or(&mut root, |block| &mut block.body);
                match token {
                    Token::Text(text) => body.push(Node::Text(text)),
                    Token::Tag { tag, layout } => match tag {
                        Tag::Variable(path) => body.push(Node::Variable { path, layout }),
                        Tag::Property { key, path } => {
                            body.push(Node::Property { key, path, layout });
                        }
                        Tag::If(path) => open.push(OpenBlock {
                            path,
                            offset: token_offset,
                            body: Vec::new(),
                        }),
                        Tag::End => {
                            let block = open.pop().ok_or(RenderError::UnexpectedEnd {
                                offset: token_offset,
                            })?;
                            let node = Node::If {
                                path: block.path,
                                body: block.body,
                            };
                            open.last_mut()
                                .map_or(&mut root, |parent| &mut parent.body)
                                .push(node);
                        }
                    },
                }
            }
            offset += line.len();
        }

        match open.pop() {
            Some(block) => Err(RenderError::UnclosedBlock {
                offset: block.offset,
            }),
            None => Ok(Self { nodes: root }),
        }
    }

    /// Renders the template against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownVariable`] when a tag references a path
    /// that `context` does not define. Paths inside an `if` block whose
    /// condition is false are not checked.
    pub fn render(&self, context: &TemplateContext) -> Result<String, RenderError> {
        let mut out = String::new();
        render_nodes(&self.nodes, context, &mut out)?;
        Ok(out)
    }
}

/// Parses and renders `source` in one step.
///
/// # Errors
///
/// Returns any [`RenderError`] from [`Template::parse`] or
/// [`Template::render`].
///
/// # Examples
///
/// ```rust
/// use honeycomb_plugin::render::{TemplateContext, render_template};
///
/// let source = "provider {\n  {{ property \"api_key\" key }}\n}\n";
/// let blank = TemplateContext::new().with_text("key", "");
/// assert_eq!(render_template(source, &blank)?, "provider {\n}\n");
///
/// let set = TemplateContext::new().with_text("key", "abc");
/// assert_eq!(render_template(source, &set)?, "provider {\n  api_key = \"abc\"\n}\n");
/// # Ok::<_, honeycomb_plugin::error::RenderError>(())
/// ```
pub fn render_template(source: &str, context: &TemplateContext) -> Result<String, RenderError> {
    Template::parse(source)?.render(context)
}

fn render_nodes(
    nodes: &[Node],
    context: &TemplateContext,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable { path, layout } => {
                let rendered = match context.lookup(path)? {
                    TemplateValue::Text(text) => escape_hcl(text),
                    TemplateValue::Flag(flag) => flag.to_string(),
                };
                emit(out, layout, &rendered);
            }
            Node::Property { key, path, layout } => match context.lookup(path)? {
                TemplateValue::Text(text) if text.is_empty() => {}
                TemplateValue::Text(text) => {
                    emit(out, layout, &format!("{key} = \"{}\"", escape_hcl(text)));
                }
                TemplateValue::Flag(flag) => emit(out, layout, &format!("{key} = {flag}")),
            },
            Node::If { path, body } => {
                if context.lookup(path)?.is_truthy() {
                    render_nodes(body, context, out)?;
                }
            }
        }
    }
    Ok(())
}

fn emit(out: &mut String, layout: &Layout, rendered: &str) {
    match layout {
        Layout::Inline => out.push_str(rendered),
        Layout::Standalone {
            indent,
            line_ending,
        } => {
            out.push_str(indent);
            out.push_str(rendered);
            out.push_str(line_ending);
        }
    }
}

/// Escapes `value` for use inside a double-quoted HCL string.
#[must_use]
pub fn escape_hcl(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                escaped.push(ch);
                escaped.push(ch);
            }
            other => escaped.push(other),
        }
    }
    escaped
}

enum Token {
    Text(String),
    Tag { tag: Tag, layout: Layout },
}

fn tokenize_line(line: &str, line_offset: usize) -> Result<Vec<(Token, usize)>, RenderError> {
    if let Some(body) = standalone_body(line) {
        let offset = line_offset + (line.len() - line.trim_start().len());
        let layout = Layout::Standalone {
            indent: line
                .chars()
                .take_while(|ch| matches!(ch, ' ' | '\t'))
                .collect(),
            line_ending: line_ending(line).to_owned(),
        };
        let tag = parse_tag(body, offset)?;
        return Ok(vec![(Token::Tag { tag, layout }, offset)]);
    }

    let mut tokens = Vec::new();
    let mut rest = line;
    let mut offset = line_offset;
    while let Some((text, after_open)) = rest.split_once("{{") {
        if !text.is_empty() {
            tokens.push((Token::Text(text.to_owned()), offset));
        }
        let tag_offset = offset + text.len();
        let (body, after_close) = after_open
            .split_once("}}")
            .ok_or(RenderError::UnterminatedTag { offset: tag_offset })?;
        let tag = parse_tag(body, tag_offset)?;
        tokens.push((
            Token::Tag {
                tag,
                layout: Layout::Inline,
            },
            tag_offset,
        ));
        offset = tag_offset + body.len() + 4;
        rest = after_close;
    }
    if !rest.is_empty() {
        tokens.push((Token::Text(rest.to_owned()), offset));
    }
    Ok(tokens)
}

fn standalone_body(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let body = trimmed.strip_prefix("{{")?.strip_suffix("}}")?;
    if body.contains("{{") || body.contains("}}") {
        return None;
    }
    Some(body)
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

fn parse_tag(body: &str, offset: usize) -> Result<Tag, RenderError> {
    let args = split_args(body, offset)?;
    match args.as_slice() {
        [Arg::Word(name), rest @ ..] if name == "if" => match rest {
            [Arg::Word(path)] if is_path(path) => Ok(Tag::If(path.clone())),
            _ => Err(invalid("if", offset, "expected a single variable")),
        },
        [Arg::Word(name), rest @ ..] if name == "end" => {
            if rest.is_empty() {
                Ok(Tag::End)
            } else {
                Err(invalid("end", offset, "takes no arguments"))
            }
        }
        [Arg::Word(name), rest @ ..] if name == "property" => match rest {
            [Arg::Quoted(key), Arg::Word(path)] if !key.is_empty() && is_path(path) => {
                Ok(Tag::Property {
                    key: key.clone(),
                    path: path.clone(),
                })
            }
            _ => Err(invalid(
                "property",
                offset,
                "expected a quoted key followed by a variable",
            )),
        },
        [Arg::Word(path)] if is_path(path) => Ok(Tag::Variable(path.clone())),
        [Arg::Word(name) | Arg::Quoted(name), ..] => Err(RenderError::UnknownDirective {
            name: name.clone(),
            offset,
        }),
        [] => Err(invalid("tag", offset, "tag is empty")),
    }
}

fn invalid(directive: &'static str, offset: usize, message: &str) -> RenderError {
    RenderError::InvalidArguments {
        directive,
        offset,
        message: message.to_owned(),
    }
}

fn split_args(body: &str, offset: usize) -> Result<Vec<Arg>, RenderError> {
    let mut args = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == '"' {
            chars.next();
            args.push(Arg::Quoted(read_quoted(&mut chars, offset)?));
        } else {
            let mut word = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() || next == '"' {
                    break;
                }
                word.push(next);
                chars.next();
            }
            args.push(Arg::Word(word));
        }
    }
    Ok(args)
}

fn read_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    offset: usize,
) -> Result<String, RenderError> {
    let mut value = String::new();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => return Ok(value),
            '\\' => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => break,
            },
            other => value.push(other),
        }
    }
    Err(invalid("string", offset, "unterminated quoted string"))
}

fn is_path(word: &str) -> bool {
    !word.is_empty()
        && word.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Template, TemplateContext, escape_hcl, render_template};
    use crate::error::RenderError;

    fn context() -> TemplateContext {
        TemplateContext::new()
            .with_text("name", "api")
            .with_text("blank", "")
            .with_flag("on", true)
            .with_flag("off", false)
    }

    fn render(source: &str) -> Result<String, RenderError> {
        render_template(source, &context())
    }

    #[test]
    fn interpolates_inline_variables() {
        assert_eq!(render("id = \"{{ name }}-{{name}}\"\n"), Ok("id = \"api-api\"\n".into()));
    }

    #[test]
    fn blank_standalone_property_drops_the_line() {
        let source = "a {\n    {{ property \"api_key\" blank }}\n}\n";
        assert_eq!(render(source), Ok("a {\n}\n".into()));
    }

    #[test]
    fn set_standalone_property_keeps_indentation() {
        let source = "a {\n    {{ property \"api_key\" name }}\n}\n";
        assert_eq!(render(source), Ok("a {\n    api_key = \"api\"\n}\n".into()));
    }

    #[test]
    fn flag_properties_render_bare_booleans() {
        assert_eq!(
            render("{{ property \"enabled\" off }}\n"),
            Ok("enabled = false\n".into())
        );
    }

    #[rstest]
    #[case("on", "kept\n")]
    #[case("off", "")]
    #[case("name", "kept\n")]
    #[case("blank", "")]
    fn if_blocks_follow_truthiness(#[case] subject: &str, #[case] expected: &str) {
        let source = format!("{{{{ if {subject} }}}}\nkept\n{{{{ end }}}}\n");
        assert_eq!(render(&source), Ok(expected.to_owned()));
    }

    #[test]
    fn nested_blocks_render_inner_content() {
        let source = "{{ if on }}\nouter\n  {{ if name }}\n  inner {{ name }}\n  {{ end }}\n{{ end }}\n";
        assert_eq!(render(source), Ok("outer\n  inner api\n".into()));
    }

    #[test]
    fn skipped_blocks_do_not_resolve_variables() {
        assert_eq!(render("{{ if off }}\n{{ missing }}\n{{ end }}\n"), Ok(String::new()));
    }

    #[test]
    fn inline_if_keeps_surrounding_text() {
        assert_eq!(render("a{{ if on }}b{{ end }}c"), Ok("abc".into()));
    }

    #[rstest]
    #[case("x {{ name", RenderError::UnterminatedTag { offset: 2 })]
    #[case("{{ end }}\n", RenderError::UnexpectedEnd { offset: 0 })]
    #[case("ok\n{{ if on }}\n", RenderError::UnclosedBlock { offset: 3 })]
    #[case("{{ missing }}", RenderError::UnknownVariable { path: "missing".into() })]
    #[case("{{ upper name }}", RenderError::UnknownDirective { name: "upper".into(), offset: 0 })]
    fn reports_template_errors(#[case] source: &str, #[case] expected: RenderError) {
        assert_eq!(render(source), Err(expected));
    }

    #[rstest]
    #[case("{{ property api_key name }}")]
    #[case("{{ property \"api_key\" }}")]
    #[case("{{ if }}")]
    #[case("{{ end now }}")]
    #[case("{{ }}")]
    #[case("{{ property \"api_key name }}")]
    fn rejects_malformed_arguments(#[case] source: &str) {
        assert!(matches!(
            Template::parse(source),
            Err(RenderError::InvalidArguments { .. })
        ));
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("a\"b", "a\\\"b")]
    #[case("back\\slash", "back\\\\slash")]
    #[case("line\nbreak", "line\\nbreak")]
    #[case("${var.x}", "$${var.x}")]
    #[case("100%{x}", "100%%{x}")]
    #[case("cost $5", "cost $5")]
    fn escapes_hcl_strings(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_hcl(input), expected);
    }

    #[test]
    fn property_values_are_escaped() {
        let ctx = TemplateContext::new().with_text("key", "a\"b");
        assert_eq!(
            render_template("{{ property \"api_key\" key }}", &ctx),
            Ok("api_key = \"a\\\"b\"".into())
        );
    }
}
