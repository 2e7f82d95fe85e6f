//! Post-save file surgery.
//!
//! The external editor rewrites the saved file between serialization and
//! post-processing (boolean differences leave editor style attributes
//! behind, and path-ified text no longer needs the embedded @font-face), so
//! these operations work on the on-disk text. Each is a small value object;
//! the panel applies them in registration order.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostProcessError {
    #[error("post-process target id {id:?} not found in saved file")]
    MissingElement { id: String },
    #[error("unterminated <{tag}> element for id {id:?}")]
    Unterminated { tag: String, id: String },
}

/// One deferred cleanup applied to the saved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOp {
    /// Drop the `style` attribute the editor left on the element with `id`.
    StripStyleAttr { id: String },
    /// Remove the element with `id` (and its subtree) entirely.
    RemoveElementById { id: String },
}

pub fn apply_post_ops(svg: &str, ops: &[PostOp]) -> Result<String, PostProcessError> {
    let mut text = svg.to_string();
    for op in ops {
        text = match op {
            PostOp::StripStyleAttr { id } => strip_style_attr(&text, id)?,
            PostOp::RemoveElementById { id } => remove_element(&text, id)?,
        };
    }
    Ok(text)
}

fn opening_tag_range(text: &str, id: &str) -> Option<(usize, usize)> {
    // Attribute values are XML-escaped, so '>' cannot occur inside a tag.
    let pattern = format!("<[A-Za-z][^>]*\\bid=\"{}\"[^>]*>", regex::escape(id));
    let re = Regex::new(&pattern).ok()?;
    let m = re.find(text)?;
    Some((m.start(), m.end()))
}

fn strip_style_attr(text: &str, id: &str) -> Result<String, PostProcessError> {
    let (start, end) = opening_tag_range(text, id).ok_or_else(|| PostProcessError::MissingElement {
        id: id.to_string(),
    })?;
    let style_re = Regex::new(r#"\s+style="[^"]*""#).unwrap();
    let cleaned = style_re.replace_all(&text[start..end], "").into_owned();
    Ok(format!("{}{}{}", &text[..start], cleaned, &text[end..]))
}

fn remove_element(text: &str, id: &str) -> Result<String, PostProcessError> {
    let (start, end) = opening_tag_range(text, id).ok_or_else(|| PostProcessError::MissingElement {
        id: id.to_string(),
    })?;
    let tag_text = &text[start..end];

    if tag_text.ends_with("/>") {
        return Ok(format!("{}{}", &text[..start], &text[end..]));
    }

    let tag: String = tag_text[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':')
        .collect();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    // Scan forward for the matching close, allowing same-tag nesting.
    let mut depth = 1usize;
    let mut cursor = end;
    while depth > 0 {
        let rest = &text[cursor..];
        let next_close = rest.find(&close).ok_or_else(|| PostProcessError::Unterminated {
            tag: tag.clone(),
            id: id.to_string(),
        })?;
        let next_open = rest
            .find(&open)
            .filter(|&p| p < next_close)
            .filter(|&p| {
                // "<g" must not match "<gz...>"; require a delimiter after the name.
                rest[p + open.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
            });
        match next_open {
            Some(p) => {
                let tag_end = rest[p..].find('>').map(|o| p + o + 1).unwrap_or(rest.len());
                if rest[p..tag_end].ends_with("/>") {
                    cursor += tag_end;
                } else {
                    depth += 1;
                    cursor += tag_end;
                }
            }
            None => {
                depth -= 1;
                cursor += next_close + close.len();
            }
        }
    }

    Ok(format!("{}{}", &text[..start], &text[cursor..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_targeted_style() {
        let svg = r#"<svg><path id="jack_bg_0" style="fill:none" d="M 0 0"/><path id="other" style="kept" d="M 1 1"/></svg>"#;
        let out = apply_post_ops(
            svg,
            &[PostOp::StripStyleAttr {
                id: "jack_bg_0".to_string(),
            }],
        )
        .unwrap();
        assert!(out.contains(r#"<path id="jack_bg_0" d="M 0 0"/>"#));
        assert!(out.contains(r#"style="kept""#));
    }

    #[test]
    fn removes_element_with_content() {
        let svg = "<svg><defs><style id=\"font-style\">@font-face { }</style></defs><g id=\"stencil\"/></svg>";
        let out = apply_post_ops(
            svg,
            &[PostOp::RemoveElementById {
                id: "font-style".to_string(),
            }],
        )
        .unwrap();
        assert_eq!(out, "<svg><defs></defs><g id=\"stencil\"/></svg>");
    }

    #[test]
    fn removes_nested_groups() {
        let svg = "<svg><g id=\"debug\"><g><circle/></g></g><g id=\"keep\"/></svg>";
        let out = apply_post_ops(
            svg,
            &[PostOp::RemoveElementById {
                id: "debug".to_string(),
            }],
        )
        .unwrap();
        assert_eq!(out, "<svg><g id=\"keep\"/></svg>");
    }

    #[test]
    fn removes_self_closing_element() {
        let svg = "<svg><rect id=\"gone\" width=\"1\"/><rect/></svg>";
        let out = remove_element(svg, "gone").unwrap();
        assert_eq!(out, "<svg><rect/></svg>");
    }

    #[test]
    fn missing_target_is_an_error() {
        let err = apply_post_ops(
            "<svg/>",
            &[PostOp::StripStyleAttr {
                id: "nope".to_string(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, PostProcessError::MissingElement { .. }));
    }
}
