//! Path expression parsing and resolution
//!
//! Grammar: `['$'] segment ('.' segment)*` where a segment is a key name,
//! one or more `[n]` integer indices, or a key name followed by indices.
//! An empty expression (or a bare `$`) selects the root.

use serde_json::Value;

use super::ExtractError;

/// One navigation step through a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Segment {
    /// Key lookup into a keyed structure.
    Key(String),
    /// Integer index into a sequence.
    Index(usize),
}

/// Parses a path expression into navigation segments.
pub(super) fn parse(path: &str) -> Result<Vec<Segment>, ExtractError> {
    let invalid = |reason: &str| ExtractError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = path.trim();
    let rest = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    let mut key = String::new();
    let mut bracket: Option<String> = None;
    // After a `]` only `.`, `[`, or the end of the expression may follow.
    let mut after_index = false;
    let mut expect_segment = true;

    for ch in rest.chars() {
        if let Some(buf) = bracket.as_mut() {
            if ch == ']' {
                let index: usize = buf
                    .parse()
                    .map_err(|_| invalid(&format!("'{buf}' is not an array index")))?;
                segments.push(Segment::Index(index));
                bracket = None;
                after_index = true;
                expect_segment = false;
            } else {
                buf.push(ch);
            }
            continue;
        }

        match ch {
            '[' => {
                if !key.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                }
                bracket = Some(String::new());
                after_index = false;
                expect_segment = false;
            }
            '.' => {
                if key.is_empty() && !after_index {
                    return Err(invalid("empty segment"));
                }
                if !key.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                }
                after_index = false;
                expect_segment = true;
            }
            _ => {
                if after_index {
                    return Err(invalid("expected '.' or '[' after an index"));
                }
                key.push(ch);
                expect_segment = false;
            }
        }
    }

    if bracket.is_some() {
        return Err(invalid("unterminated '['"));
    }
    if expect_segment {
        return Err(invalid("trailing '.'"));
    }
    if !key.is_empty() {
        segments.push(Segment::Key(key));
    }
    Ok(segments)
}

/// Walks the segments from `root`, returning the selected node or `None`
/// when any step selects nothing (missing key, index out of bounds, or a
/// lookup against a node of the wrong shape).
pub(super) fn resolve<'a>(root: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = match segment {
            Segment::Key(key) => current.get(key.as_str())?,
            Segment::Index(index) => current.get(*index)?,
        };
    }
    Some(current)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_dot_and_bracket_mix() {
        let segments = parse("$.items[0].name").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Key("items".to_string()),
                Segment::Index(0),
                Segment::Key("name".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_leading_index() {
        let segments = parse("[2].id").unwrap();
        assert_eq!(
            segments,
            vec![Segment::Index(2), Segment::Key("id".to_string())]
        );
    }

    #[test]
    fn test_parse_chained_indices() {
        let segments = parse("grid[1][3]").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Key("grid".to_string()),
                Segment::Index(1),
                Segment::Index(3),
            ]
        );
    }

    #[test]
    fn test_parse_root_expressions() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("$").unwrap().is_empty());
        assert!(parse("  $  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["a..b", ".a.", "a[", "a[]", "a[-1]", "a[*]", "[0]x", "a[0"] {
            assert!(parse(bad).is_err(), "path={bad}");
        }
    }

    #[test]
    fn test_resolve_shape_mismatch_is_none() {
        let doc: Value = serde_json::from_str(r#"{"a":[10,20]}"#).unwrap();
        // Key lookup into an array, index into an object: both select nothing.
        assert!(resolve(&doc, &parse("a.b").unwrap()).is_none());
        assert!(resolve(&doc, &parse("[0]").unwrap()).is_none());
        assert_eq!(
            resolve(&doc, &parse("a[1]").unwrap()),
            Some(&Value::from(20))
        );
    }
}
