//! Dotted paths into JSON documents: `data[0].name`, `pagination.total`,
//! `data.len()`.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    Field(String),
    Index(usize),
    Len,
}

/// Split a path into tokens. Panics on malformed brackets; this is test code.
pub fn tokenize_path(path: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        if segment == "len()" {
            tokens.push(PathToken::Len);
            continue;
        }
        let (field, mut rest) = match segment.find('[') {
            Some(pos) => segment.split_at(pos),
            None => (segment, ""),
        };
        if !field.is_empty() {
            tokens.push(PathToken::Field(field.to_string()));
        }
        while let Some(inner) = rest.strip_prefix('[') {
            let end = inner
                .find(']')
                .unwrap_or_else(|| panic!("unclosed bracket in JSON path `{path}`"));
            let index = inner[..end]
                .parse()
                .unwrap_or_else(|_| panic!("non-numeric index in JSON path `{path}`"));
            tokens.push(PathToken::Index(index));
            rest = &inner[end + 1..];
        }
    }
    tokens
}

/// Resolve a path; missing fields and indices resolve to `null`.
pub fn resolve_path(root: &Value, path: &str) -> Value {
    let mut current = root.clone();
    for token in tokenize_path(path) {
        current = match token {
            PathToken::Field(name) => current.get(&name).cloned().unwrap_or(Value::Null),
            PathToken::Index(i) => current.get(i).cloned().unwrap_or(Value::Null),
            PathToken::Len => match &current {
                Value::Array(a) => a.len().into(),
                Value::Object(o) => o.len().into(),
                Value::String(s) => s.len().into(),
                other => panic!("len() of non-collection in `{path}`: {other}"),
            },
        };
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tokenizes_fields_indices_and_len() {
        assert_eq!(
            tokenize_path("data[1].tags[0]"),
            vec![
                PathToken::Field("data".into()),
                PathToken::Index(1),
                PathToken::Field("tags".into()),
                PathToken::Index(0),
            ]
        );
        assert_eq!(tokenize_path("data.len()").last(), Some(&PathToken::Len));
    }

    #[test]
    fn resolves_nested_values() {
        let doc = json!({ "data": [{ "name": "Mug" }], "pagination": { "total": 1 } });
        assert_eq!(resolve_path(&doc, "data[0].name"), "Mug");
        assert_eq!(resolve_path(&doc, "pagination.total"), 1);
        assert_eq!(resolve_path(&doc, "data.len()"), 1);
        assert_eq!(resolve_path(&doc, "data[5].name"), Value::Null);
    }
}
