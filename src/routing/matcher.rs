//! URL template matching.
//!
//! # Responsibilities
//! - Compile `{name}` templates into anchored matchers
//! - Match a concrete path against a template and extract placeholder values
//! - Pick the best template for a path out of a whole route table
//! - Normalize concrete paths (`/users/42` → `/users/{int}`)
//!
//! # Design Decisions
//! - Literal text is regex-escaped; placeholders capture one non-empty segment
//! - Query string and fragment are never part of a match
//! - Best-match order: exact key, template scan (table order), normalized form
//! - Duplicate placeholder names in one template: the last occurrence wins

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use uuid::Uuid;

/// Sentinel segment for integer path components.
pub const INT_SEGMENT: &str = "{int}";

/// Sentinel segment for UUID path components.
pub const UUID_SEGMENT: &str = "{uuid}";

/// A compiled URL template.
#[derive(Clone)]
pub struct Matcher {
    template: String,
    regex: Regex,
    names: Vec<String>,
}

impl Matcher {
    /// Compile a template such as `/users/{id}/posts/{post}`.
    ///
    /// Literals are escaped, so this only fails when the compiled expression
    /// exceeds the regex size limit.
    pub fn new(template: &str) -> Result<Self, regex::Error> {
        let path = with_leading_slash(clean_path(template));
        let (pattern, names) = compile(&path);
        Ok(Self {
            template: template.to_string(),
            regex: Regex::new(&pattern)?,
            names,
        })
    }

    /// The template this matcher was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in declaration order.
    pub fn placeholders(&self) -> &[String] {
        &self.names
    }

    /// True if the template contains no placeholder.
    pub fn is_literal(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(&with_leading_slash(clean_path(path)))
    }

    /// Placeholder values for `path`, or an empty map if it does not match.
    pub fn extract(&self, path: &str) -> HashMap<String, String> {
        let path = with_leading_slash(clean_path(path));
        let mut params = HashMap::new();
        if let Some(caps) = self.regex.captures(&path) {
            for (name, value) in self.names.iter().zip(caps.iter().skip(1)) {
                if let Some(value) = value {
                    params.insert(name.clone(), value.as_str().to_string());
                }
            }
        }
        params
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("template", &self.template)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// Translate a template into an anchored regex plus its placeholder names.
fn compile(path: &str) -> (String, Vec<String>) {
    let mut pattern = String::from("^");
    let mut names = Vec::new();
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if close > 0 => {
                pattern.push_str(&regex::escape(&rest[..open]));
                pattern.push_str("([^/]+)");
                names.push(after[..close].to_string());
                rest = &after[close + 1..];
            }
            _ => {
                // `{}` or an unterminated brace is literal text.
                pattern.push_str(&regex::escape(&rest[..=open]));
                rest = after;
            }
        }
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    let mut seen = std::collections::HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            tracing::warn!(template = %path, placeholder = %name, "Duplicate placeholder; last value wins");
        }
    }
    (pattern, names)
}

/// Strip the query string and fragment.
pub fn clean_path(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Prefix `path` with `/` when it lacks one.
pub(crate) fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Compile `template` and test `path` against it.
pub fn matches(path: &str, template: &str) -> bool {
    Matcher::new(template).is_ok_and(|m| m.is_match(path))
}

/// Extract placeholder values of `template` from `path`.
pub fn extract(path: &str, template: &str) -> HashMap<String, String> {
    Matcher::new(template)
        .map(|m| m.extract(path))
        .unwrap_or_default()
}

/// Rewrite integer segments to `{int}` and UUID segments to `{uuid}`.
pub fn normalize(url: &str) -> String {
    let path = clean_path(url);
    let mut normalized = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        normalized.push('/');
        if segment.parse::<i32>().is_ok() {
            normalized.push_str(INT_SEGMENT);
        } else if is_uuid(segment) {
            normalized.push_str(UUID_SEGMENT);
        } else {
            normalized.push_str(segment);
        }
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

fn is_uuid(segment: &str) -> bool {
    segment.len() == 36 && Uuid::try_parse(segment).is_ok()
}

/// Anything that can be searched for a best template.
pub trait TemplateSet {
    fn contains_template(&self, template: &str) -> bool;

    /// Templates in scan order.
    fn templates(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Test `path` against one stored template.
    fn template_matches(&self, template: &str, path: &str) -> bool {
        matches(path, template)
    }
}

impl<V> TemplateSet for std::collections::BTreeMap<String, V> {
    fn contains_template(&self, template: &str) -> bool {
        self.contains_key(template)
    }

    fn templates(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.keys().map(String::as_str))
    }
}

impl<V> TemplateSet for HashMap<String, V> {
    fn contains_template(&self, template: &str) -> bool {
        self.contains_key(template)
    }

    fn templates(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.keys().map(String::as_str))
    }
}

/// Find the template in `table` that best serves `path`.
pub fn find_best_template<'a, T: TemplateSet + ?Sized>(table: &'a T, path: &str) -> Option<&'a str> {
    let path = clean_path(path);

    if table.contains_template(path) {
        return table.templates().find(|t| *t == path);
    }

    if let Some(template) = table.templates().find(|t| table.template_matches(t, path)) {
        return Some(template);
    }

    let normalized = normalize(path);
    table.templates().find(|t| normalize(t) == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_extract_recovers_substitutions() {
        let template = "/shops/{shop}/items/{item}";
        let cases = [("acme", "42"), ("a.b+c", "x(y)"), ("%20", "$^|")];
        for (shop, item) in cases {
            let path = format!("/shops/{shop}/items/{item}");
            assert!(matches(&path, template), "{path}");
            let params = extract(&path, template);
            assert_eq!(params.len(), 2);
            assert_eq!(params["shop"], shop);
            assert_eq!(params["item"], item);
        }
    }

    #[test]
    fn test_literals_are_escaped() {
        assert!(matches("/file.txt", "/file.txt"));
        assert!(!matches("/fileXtxt", "/file.txt"));
        assert!(matches("/a+b", "/a+b"));
        assert!(matches("/v1/(legacy)", "/v1/(legacy)"));
    }

    #[test]
    fn test_placeholder_inside_segment() {
        let params = extract("/report-2024.pdf", "/report-{year}.pdf");
        assert_eq!(params["year"], "2024");
    }

    #[test]
    fn test_segment_count_mismatch() {
        assert!(!matches("/users/1/extra", "/users/{id}"));
        assert!(extract("/users/1/extra", "/users/{id}").is_empty());
        assert!(extract("/users", "/users/{id}").is_empty());
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert!(matches("/users/7?tab=posts#top", "/users/{id}"));
        assert_eq!(extract("/users/7?tab=posts", "/users/{id}")["id"], "7");
        assert!(matches("users/7", "users/{id}"));
    }

    #[test]
    fn test_empty_braces_are_literal() {
        let matcher = Matcher::new("/raw/{}").unwrap();
        assert!(matcher.is_literal());
        assert!(matcher.is_match("/raw/{}"));
    }

    #[test]
    fn test_duplicate_placeholder_last_wins() {
        let params = extract("/a/1/2", "/a/{x}/{x}");
        assert_eq!(params["x"], "2");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/users/123/profile"), "/users/{int}/profile");
        assert_eq!(
            normalize("/orders/550e8400-e29b-41d4-a716-446655440000"),
            "/orders/{uuid}"
        );
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("//a//b/?q=1"), "/a/b");
        assert_eq!(normalize("/n/99999999999"), "/n/99999999999");
    }

    #[test]
    fn test_exact_beats_pattern() {
        let mut table = BTreeMap::new();
        table.insert("/{x}".to_string(), ());
        table.insert("/fixed".to_string(), ());

        assert_eq!(find_best_template(&table, "/fixed"), Some("/fixed"));
        assert_eq!(find_best_template(&table, "/other"), Some("/{x}"));
    }

    #[test]
    fn test_normalized_fallback() {
        let mut table = BTreeMap::new();
        table.insert("/items/42".to_string(), ());

        assert_eq!(find_best_template(&table, "/items/7"), Some("/items/42"));
        assert_eq!(find_best_template(&table, "/items/seven"), None);
    }

    #[test]
    fn test_no_match() {
        let table: HashMap<String, ()> = HashMap::new();
        assert_eq!(find_best_template(&table, "/anything"), None);
    }
}
