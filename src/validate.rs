//! Shape validation for untrusted search payloads.
//!
//! The search endpoint is outside our control, so the decoded body is walked
//! by hand instead of being handed to `serde` directly. Every offending
//! location is reported, not just the first one, and nothing is returned
//! unless the whole document conforms.

use std::fmt;

use serde_json::{Map, Value};

use crate::openlibrary::parse::{Book, SearchResponse};

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A located description of why the payload did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: &[PathSegment], expected: &str, found: Option<&Value>) -> ValidationIssue {
        ValidationIssue {
            path: path.to_vec(),
            message: format!("expected {}, found {}", expected, describe(found)),
        }
    }

    /// The path rendered as `docs[1].title`, or `(root)` for the document itself.
    pub fn location(&self) -> String {
        if self.path.is_empty() {
            return "(root)".to_owned();
        }
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(i) => out.push_str(&format!("[{}]", i)),
            }
        }
        out
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.message)
    }
}

/// Non-empty list of issues from a single `validate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssues {
    issues: Vec<ValidationIssue>,
}

impl ValidationIssues {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "response failed validation with {} issue(s):", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationIssues {}

fn describe(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Checks `raw` against the search response shape.
///
/// Unknown keys on the response and on each book are kept in `extra` and
/// never type-checked.
pub fn validate(raw: &Value) -> Result<SearchResponse, ValidationIssues> {
    let mut issues = Vec::new();
    let response = response(raw, &mut issues);
    match response {
        Some(response) if issues.is_empty() => Ok(response),
        _ => Err(ValidationIssues { issues }),
    }
}

fn response(raw: &Value, issues: &mut Vec<ValidationIssue>) -> Option<SearchResponse> {
    let Some(object) = raw.as_object() else {
        issues.push(ValidationIssue::new(&[], "object", Some(raw)));
        return None;
    };

    let num_found = match object.get("num_found") {
        Some(value) => match value.as_u64() {
            Some(n) => Some(n),
            None => {
                issues.push(ValidationIssue::new(
                    &["num_found".into()],
                    "non-negative integer",
                    Some(value),
                ));
                None
            }
        },
        None => {
            issues.push(ValidationIssue::new(
                &["num_found".into()],
                "non-negative integer",
                None,
            ));
            None
        }
    };

    let docs = match object.get("docs") {
        Some(Value::Array(items)) => {
            let books = items
                .iter()
                .enumerate()
                .map(|(i, item)| book(item, &["docs".into(), i.into()], issues))
                .collect::<Vec<_>>();
            books.into_iter().collect::<Option<Vec<_>>>()
        }
        other => {
            issues.push(ValidationIssue::new(&["docs".into()], "array", other));
            None
        }
    };

    Some(SearchResponse {
        num_found: num_found?,
        docs: docs?,
        extra: passthrough(object, &["num_found", "docs"]),
    })
}

fn book(raw: &Value, path: &[PathSegment], issues: &mut Vec<ValidationIssue>) -> Option<Book> {
    let Some(object) = raw.as_object() else {
        issues.push(ValidationIssue::new(path, "object", Some(raw)));
        return None;
    };
    let at = |key: &str| {
        let mut p = path.to_vec();
        p.push(key.into());
        p
    };

    let title = match object.get("title") {
        Some(Value::String(title)) => Some(title.clone()),
        other => {
            issues.push(ValidationIssue::new(&at("title"), "string", other));
            None
        }
    };

    let author_name = match object.get("author_name") {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(names)) => {
            let mut ok = true;
            let mut authors = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                match name {
                    Value::String(name) => authors.push(name.clone()),
                    other => {
                        let mut p = at("author_name");
                        p.push(i.into());
                        issues.push(ValidationIssue::new(&p, "string", Some(other)));
                        ok = false;
                    }
                }
            }
            ok.then_some(authors)
        }
        other => {
            issues.push(ValidationIssue::new(&at("author_name"), "array or null", other));
            None
        }
    };

    let cover_edition_key = match object.get("cover_edition_key") {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(key)) => Some(Some(key.clone())),
        other => {
            issues.push(ValidationIssue::new(
                &at("cover_edition_key"),
                "string or null",
                other,
            ));
            None
        }
    };

    Some(Book {
        title: title?,
        author_name: author_name?,
        cover_edition_key: cover_edition_key?,
        extra: passthrough(object, &["title", "author_name", "cover_edition_key"]),
    })
}

fn passthrough(object: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    object
        .iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn paths(err: &ValidationIssues) -> Vec<String> {
        err.issues().iter().map(ValidationIssue::location).collect()
    }

    #[test]
    fn accepts_foundation_payload() {
        let raw = json!({
            "num_found": 2,
            "docs": [
                {"title": "Foundation", "author_name": ["Isaac Asimov"]},
                {"title": "Foundation's Edge"}
            ]
        });
        let response = validate(&raw).unwrap();
        assert_eq!(response.num_found, 2);
        assert_eq!(response.docs.len(), 2);
        assert_eq!(response.docs[0].title, "Foundation");
        assert_eq!(response.docs[0].author_name, vec!["Isaac Asimov"]);
        assert_eq!(response.docs[1].title, "Foundation's Edge");
        assert!(response.docs[1].author_name.is_empty());
        assert_eq!(response.docs[1].cover_edition_key, None);
    }

    #[test]
    fn missing_num_found_is_one_issue() {
        let err = validate(&json!({"docs": []})).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.issues()[0].path, vec![PathSegment::Key("num_found".into())]);
        assert_eq!(err.issues()[0].message, "expected non-negative integer, found missing");
    }

    #[test]
    fn missing_docs_names_docs() {
        let err = validate(&json!({"num_found": 0})).unwrap_err();
        assert_eq!(paths(&err), vec!["docs"]);
    }

    #[test]
    fn root_must_be_object() {
        let err = validate(&json!([1, 2])).unwrap_err();
        assert!(err.issues()[0].path.is_empty());
        assert_eq!(err.to_string().lines().nth(1), Some("  (root): expected object, found array"));
    }

    #[test]
    fn collects_every_offending_location() {
        let raw = json!({
            "num_found": -3,
            "docs": [
                {"title": 7},
                "not a book",
                {"title": "ok", "author_name": ["a", 1], "cover_edition_key": 5},
                {"author_name": "Asimov"}
            ]
        });
        let err = validate(&raw).unwrap_err();
        assert_eq!(
            paths(&err),
            vec![
                "num_found",
                "docs[0].title",
                "docs[1]",
                "docs[2].author_name[1]",
                "docs[2].cover_edition_key",
                "docs[3].title",
                "docs[3].author_name",
            ]
        );
        assert_eq!(err.issues()[0].message, "expected non-negative integer, found number");
        assert_eq!(err.issues()[6].message, "expected array or null, found string");
    }

    #[test]
    fn docs_must_be_array() {
        let err = validate(&json!({"num_found": 1, "docs": {"title": "x"}})).unwrap_err();
        assert_eq!(err.to_string().lines().nth(1), Some("  docs: expected array, found object"));
    }

    #[test]
    fn fractional_num_found_is_rejected() {
        let err = validate(&json!({"num_found": 1.5, "docs": []})).unwrap_err();
        assert_eq!(paths(&err), vec!["num_found"]);
    }

    #[test]
    fn null_absent_and_empty_authors_normalize_alike() {
        for authors in [json!(null), json!([])] {
            let raw = json!({"num_found": 1, "docs": [{"title": "t", "author_name": authors}]});
            let response = validate(&raw).unwrap();
            assert!(response.docs[0].author_name.is_empty());
            let again = validate(&serde_json::to_value(&response).unwrap()).unwrap();
            assert_eq!(again, response);
        }
        let raw = json!({"num_found": 1, "docs": [{"title": "t", "cover_edition_key": null}]});
        assert_eq!(validate(&raw).unwrap().docs[0].cover_edition_key, None);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let raw = json!({
            "num_found": 120,
            "start": 0,
            "numFoundExact": true,
            "docs": [{
                "title": "Foundation",
                "cover_edition_key": "OL24274306M",
                "first_publish_year": 1951,
                "key": "/works/OL46125W"
            }]
        });
        let response = validate(&raw).unwrap();
        assert_eq!(response.num_found, 120);
        assert_eq!(response.extra.get("start"), Some(&json!(0)));
        assert!(!response.extra.contains_key("docs"));
        assert_eq!(response.docs[0].extra.get("first_publish_year"), Some(&json!(1951)));
        assert_eq!(response.docs[0].cover_edition_key.as_deref(), Some("OL24274306M"));

        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(validate(&encoded).unwrap(), response);
    }

    #[test]
    fn preserves_docs_order() {
        let titles = ["c", "a", "b", "a"];
        let docs = titles.iter().map(|t| json!({"title": t})).collect::<Vec<_>>();
        let response = validate(&json!({"num_found": 99, "docs": docs})).unwrap();
        let got = response.docs.iter().map(|b| b.title.as_str()).collect::<Vec<_>>();
        assert_eq!(got, titles);
        assert_eq!(response.num_found, 99);
    }
}
