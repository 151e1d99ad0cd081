//! Pure rendering of a parsed template against a JSON context.

use crate::error::RenderError;
use crate::template::parser::{Node, Template};
use serde_json::Value;
use std::borrow::Cow;

struct Scope<'a> {
    value: &'a Value,
    /// (index, len) when this scope is an `#each` item.
    item: Option<(usize, usize)>,
}

/// Render `template` with `context`. Same inputs always give the same text; a path the
/// context does not provide is an error rather than an empty substitution.
pub fn render(template: &Template, context: &Value) -> Result<String, RenderError> {
    let mut out = String::new();
    let mut scopes = vec![Scope {
        value: context,
        item: None,
    }];
    render_nodes(template, &template.nodes, &mut scopes, &mut out)?;
    Ok(out)
}

fn render_nodes<'c>(
    template: &Template,
    nodes: &[Node],
    scopes: &mut Vec<Scope<'c>>,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Var { path } => {
                let value = lookup(template, scopes, path)?;
                match &*value {
                    Value::String(s) => out.push_str(s),
                    Value::Number(n) => out.push_str(&n.to_string()),
                    Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
                    _ => {
                        return Err(RenderError::NotScalar {
                            template: template.name.clone(),
                            path: path.clone(),
                        })
                    }
                }
            }
            Node::Each { path, body } => {
                let items = match lookup(template, scopes, path)? {
                    Cow::Borrowed(Value::Array(items)) => items,
                    Cow::Borrowed(Value::Null) => continue,
                    _ => {
                        return Err(RenderError::NotIterable {
                            template: template.name.clone(),
                            path: path.clone(),
                        })
                    }
                };
                let len = items.len();
                for (i, item) in items.iter().enumerate() {
                    scopes.push(Scope {
                        value: item,
                        item: Some((i, len)),
                    });
                    let res = render_nodes(template, body, scopes, out);
                    scopes.pop();
                    res?;
                }
            }
            Node::Cond {
                path,
                negate,
                then,
                otherwise,
            } => {
                let value = lookup(template, scopes, path)?;
                let truthy = is_truthy(&value);
                let branch = if truthy != *negate { then } else { otherwise };
                render_nodes(template, branch, scopes, out)?;
            }
        }
    }
    Ok(())
}

fn lookup<'a>(
    template: &Template,
    scopes: &[Scope<'a>],
    path: &str,
) -> Result<Cow<'a, Value>, RenderError> {
    let missing = || RenderError::MissingField {
        template: template.name.clone(),
        path: path.to_string(),
    };
    let innermost = scopes.last().ok_or_else(missing)?;

    if let Some(var) = path.strip_prefix('@') {
        let (i, len) = scopes.iter().rev().find_map(|s| s.item).ok_or_else(missing)?;
        let v = match var {
            "index" => Value::from(i),
            "first" => Value::Bool(i == 0),
            "last" => Value::Bool(i + 1 == len),
            _ => return Err(missing()),
        };
        return Ok(Cow::Owned(v));
    }

    let mut segments = path.split('.').peekable();
    let mut current = if segments.peek() == Some(&"this") {
        segments.next();
        innermost.value
    } else {
        let head = segments.next().unwrap_or_default();
        scopes
            .iter()
            .rev()
            .find_map(|s| s.value.as_object().and_then(|o| o.get(head)))
            .ok_or_else(missing)?
    };
    for seg in segments {
        current = current.get(seg).ok_or_else(missing)?;
    }
    Ok(Cow::Borrowed(current))
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(source: &str, ctx: Value) -> Result<String, RenderError> {
        render(&Template::parse("t", source).unwrap(), &ctx)
    }

    #[test]
    fn interpolates_scalars_and_paths() {
        let ctx = json!({"name": "Book", "count": 2, "ok": true, "names": {"kebab": "book"}});
        assert_eq!(run("{{name}}/{{names.kebab}}/{{count}}/{{ok}}", ctx).unwrap(), "Book/book/2/true");
    }

    #[test]
    fn iterates_with_loop_variables_and_outer_scope() {
        let ctx = json!({"model": "Book", "fields": [{"name": "title"}, {"name": "author"}]});
        let out = run("{{#each fields}}{{model}}.{{name}}{{#unless @last}}, {{/unless}}{{/each}}", ctx).unwrap();
        assert_eq!(out, "Book.title, Book.author");
    }

    #[test]
    fn each_over_scalars_uses_this() {
        let out = run("{{#each tags}}[{{@index}}:{{this}}]{{/each}}", json!({"tags": ["a", "b"]})).unwrap();
        assert_eq!(out, "[0:a][1:b]");
    }

    #[test]
    fn conditionals_follow_truthiness() {
        let src = "{{#if items}}some{{else}}none{{/if}}";
        assert_eq!(run(src, json!({"items": []})).unwrap(), "none");
        assert_eq!(run(src, json!({"items": [1]})).unwrap(), "some");
        assert_eq!(run(src, json!({"items": null})).unwrap(), "none");
    }

    #[test]
    fn conditionals_on_loop_variables() {
        let src = "{{#each xs}}{{#if @first}}<{{/if}}{{this}}{{#unless @last}},{{/unless}}{{/each}}";
        assert_eq!(run(src, json!({"xs": ["a", "b", "c"]})).unwrap(), "<a,b,c");
    }

    #[test]
    fn missing_field_is_an_error() {
        let err = run("{{name}} {{plural}}", json!({"name": "Book"})).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingField {
                template: "t".into(),
                path: "plural".into()
            }
        );
        assert!(run("{{#if nope}}x{{/if}}", json!({})).is_err());
        assert!(run("{{names.nope}}", json!({"names": {}})).is_err());
        assert!(run("{{@index}}", json!({})).is_err());
    }

    #[test]
    fn non_scalars_are_rejected() {
        assert!(matches!(run("{{x}}", json!({"x": null})), Err(RenderError::NotScalar { .. })));
        assert!(matches!(run("{{x}}", json!({"x": [1]})), Err(RenderError::NotScalar { .. })));
        assert!(matches!(
            run("{{#each x}}{{/each}}", json!({"x": "s"})),
            Err(RenderError::NotIterable { .. })
        ));
    }

    #[test]
    fn rendering_is_pure() {
        let t = Template::parse("t", "{{#each f}}{{name}}{{/each}}").unwrap();
        let ctx = json!({"f": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(render(&t, &ctx).unwrap(), render(&t, &ctx).unwrap());
    }
}
