//! Template syntax: `{{path}}`, `{{#each path}}`, `{{#if path}}`/`{{else}}`, `{{#unless path}}`, `{{! comment }}`.
//! Block tags alone on a line consume the whole line.

use crate::error::RenderError;
use regex::Regex;
use std::sync::LazyLock;

static PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(@index|@first|@last|this|(this\.)?[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*)$")
        .expect("path pattern")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Each,
    If,
    Unless,
}

impl BlockKind {
    fn keyword(self) -> &'static str {
        match self {
            BlockKind::Each => "each",
            BlockKind::If => "if",
            BlockKind::Unless => "unless",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "each" => Some(BlockKind::Each),
            "if" => Some(BlockKind::If),
            "unless" => Some(BlockKind::Unless),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Var {
        path: String,
    },
    Each {
        path: String,
        body: Vec<Node>,
    },
    /// `#if` and `#unless`; `negate` is set for `#unless`.
    Cond {
        path: String,
        negate: bool,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// A parsed template. Syntax is checked once here so rendering only fails on context mismatches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug)]
enum Tag {
    Var(String),
    Open(BlockKind, String),
    Close(BlockKind),
    Else,
    Comment,
}

impl Tag {
    fn is_standalone_kind(&self) -> bool {
        !matches!(self, Tag::Var(_))
    }
}

#[derive(Debug)]
enum Token {
    Text(String),
    Tag { tag: Tag, line: usize },
}

impl Template {
    pub fn parse(name: &str, source: &str) -> Result<Self, RenderError> {
        let syntax = |line: usize, message: String| RenderError::Syntax {
            template: name.to_string(),
            line,
            message,
        };
        let mut tokens = tokenize(source).map_err(|(line, msg)| syntax(line, msg))?;
        trim_standalone(&mut tokens);

        // Each frame: (open block, its path, line, then-nodes, else-nodes, seen else)
        struct Frame {
            kind: BlockKind,
            path: String,
            line: usize,
            then: Vec<Node>,
            otherwise: Vec<Node>,
            in_else: bool,
        }
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        fn current<'a>(root: &'a mut Vec<Node>, stack: &'a mut [Frame]) -> &'a mut Vec<Node> {
            match stack.last_mut() {
                Some(f) if f.in_else => &mut f.otherwise,
                Some(f) => &mut f.then,
                None => root,
            }
        }

        for token in tokens {
            match token {
                Token::Text(t) => {
                    if !t.is_empty() {
                        current(&mut root, &mut stack).push(Node::Text(t));
                    }
                }
                Token::Tag { tag, line } => match tag {
                    Tag::Comment => {}
                    Tag::Var(path) => current(&mut root, &mut stack).push(Node::Var { path }),
                    Tag::Open(kind, path) => stack.push(Frame {
                        kind,
                        path,
                        line,
                        then: Vec::new(),
                        otherwise: Vec::new(),
                        in_else: false,
                    }),
                    Tag::Else => match stack.last_mut() {
                        Some(f) if f.kind != BlockKind::Each && !f.in_else => f.in_else = true,
                        _ => return Err(syntax(line, "unexpected {{else}}".into())),
                    },
                    Tag::Close(kind) => {
                        let frame = match stack.pop() {
                            Some(f) if f.kind == kind => f,
                            Some(f) => {
                                return Err(syntax(
                                    line,
                                    format!(
                                        "{{{{/{}}}}} closes {{{{#{}}}}} opened on line {}",
                                        kind.keyword(),
                                        f.kind.keyword(),
                                        f.line
                                    ),
                                ))
                            }
                            None => {
                                return Err(syntax(
                                    line,
                                    format!("unmatched {{{{/{}}}}}", kind.keyword()),
                                ))
                            }
                        };
                        let node = match frame.kind {
                            BlockKind::Each => Node::Each {
                                path: frame.path,
                                body: frame.then,
                            },
                            BlockKind::If | BlockKind::Unless => Node::Cond {
                                path: frame.path,
                                negate: frame.kind == BlockKind::Unless,
                                then: frame.then,
                                otherwise: frame.otherwise,
                            },
                        };
                        current(&mut root, &mut stack).push(node);
                    }
                },
            }
        }

        if let Some(f) = stack.last() {
            return Err(syntax(
                f.line,
                format!("{{{{#{} {}}}}} is never closed", f.kind.keyword(), f.path),
            ));
        }
        Ok(Template {
            name: name.to_string(),
            nodes: root,
        })
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, (usize, String)> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;
    while let Some(start) = rest.find("{{") {
        let text = &rest[..start];
        line += text.matches('\n').count();
        tokens.push(Token::Text(text.to_string()));
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| (line, "unclosed tag".to_string()))?;
        let inner = &after[..end];
        tokens.push(Token::Tag {
            tag: classify(inner.trim()).map_err(|m| (line, m))?,
            line,
        });
        line += inner.matches('\n').count();
        rest = &after[end + 2..];
    }
    tokens.push(Token::Text(rest.to_string()));
    Ok(tokens)
}

fn classify(inner: &str) -> Result<Tag, String> {
    let check_path = |p: &str| {
        if PATH.is_match(p) {
            Ok(p.to_string())
        } else {
            Err(format!("invalid path '{}'", p))
        }
    };
    if inner.starts_with('!') {
        return Ok(Tag::Comment);
    }
    if inner == "else" {
        return Ok(Tag::Else);
    }
    if let Some(open) = inner.strip_prefix('#') {
        let (kw, path) = open.split_once(char::is_whitespace).unwrap_or((open, ""));
        let kind = BlockKind::from_keyword(kw).ok_or_else(|| format!("unknown block '#{}'", kw))?;
        return Ok(Tag::Open(kind, check_path(path.trim())?));
    }
    if let Some(close) = inner.strip_prefix('/') {
        let kind = BlockKind::from_keyword(close.trim())
            .ok_or_else(|| format!("unknown block '/{}'", close.trim()))?;
        return Ok(Tag::Close(kind));
    }
    Ok(Tag::Var(check_path(inner)?))
}

/// Drop the indentation before and the line break after every block tag that sits alone on its line.
fn trim_standalone(tokens: &mut [Token]) {
    let last = tokens.len().saturating_sub(1);
    let standalone: Vec<usize> = (0..tokens.len())
        .filter(|&i| match &tokens[i] {
            Token::Tag { tag, .. } if tag.is_standalone_kind() => {
                let before = match i.checked_sub(1).map(|p| &tokens[p]) {
                    Some(Token::Text(t)) => match t.rfind('\n') {
                        Some(nl) => is_blank(&t[nl + 1..]),
                        None => i == 1 && is_blank(t),
                    },
                    _ => false,
                };
                let after = match tokens.get(i + 1) {
                    Some(Token::Text(t)) => match t.find('\n') {
                        Some(nl) => is_blank(&t[..nl]),
                        None => i + 1 == last && is_blank(t),
                    },
                    _ => false,
                };
                before && after
            }
            _ => false,
        })
        .collect();

    for i in standalone {
        if let Token::Text(t) = &mut tokens[i - 1] {
            let kept = t.trim_end_matches([' ', '\t']).len();
            t.truncate(kept);
        }
        if let Some(Token::Text(t)) = tokens.get_mut(i + 1) {
            let lead = t.len() - t.trim_start_matches([' ', '\t']).len();
            let cut = if t[lead..].starts_with("\r\n") {
                lead + 2
            } else if t[lead..].starts_with('\n') {
                lead + 1
            } else {
                lead
            };
            t.replace_range(..cut, "");
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t' || c == '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_blocks() {
        let t = Template::parse("t", "{{#each fields}}{{#if required}}{{name}}{{else}}-{{/if}}{{/each}}").unwrap();
        assert_eq!(
            t.nodes,
            vec![Node::Each {
                path: "fields".into(),
                body: vec![Node::Cond {
                    path: "required".into(),
                    negate: false,
                    then: vec![Node::Var { path: "name".into() }],
                    otherwise: vec![Node::Text("-".into())],
                }],
            }]
        );
    }

    #[test]
    fn standalone_tags_consume_their_line() {
        let t = Template::parse("t", "a\n  {{#if x}}\nb\n  {{/if}}\nc\n").unwrap();
        assert_eq!(
            t.nodes,
            vec![
                Node::Text("a\n".into()),
                Node::Cond {
                    path: "x".into(),
                    negate: false,
                    then: vec![Node::Text("b\n".into())],
                    otherwise: vec![],
                },
                Node::Text("c\n".into()),
            ]
        );
    }

    #[test]
    fn inline_tags_keep_surrounding_text() {
        let t = Template::parse("t", "x {{#if a}}y{{/if}} z").unwrap();
        assert_eq!(t.nodes[0], Node::Text("x ".into()));
        assert_eq!(t.nodes[2], Node::Text(" z".into()));
    }

    #[test]
    fn reports_syntax_errors_with_line() {
        let err = Template::parse("t", "ok\n{{#each items}}\n{{/if}}").unwrap_err();
        assert!(matches!(err, RenderError::Syntax { line: 3, .. }), "{err:?}");

        let err = Template::parse("t", "a\nb {{name").unwrap_err();
        assert!(matches!(err, RenderError::Syntax { line: 2, .. }), "{err:?}");

        assert!(Template::parse("t", "{{#if a}}").is_err());
        assert!(Template::parse("t", "{{#each a}}{{else}}{{/each}}").is_err());
        assert!(Template::parse("t", "{{#with a}}{{/with}}").is_err());
        assert!(Template::parse("t", "{{ bad path! }}").is_err());
    }
}
