//! Canonical package record.
//!
//! Every backend maps its own wire shape into `PackageRecord`; nothing else in
//! the workspace constructs one from raw data.

use serde::{Deserialize, Serialize};

/// Version reported when a backend omits it
pub const UNKNOWN_VERSION: &str = "unknown";

/// Package metadata as returned by a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default)]
    pub maintainers: Vec<Maintainer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<Downloads>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
}

/// Package author, either a bare string or a person object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Person {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

/// Package maintainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintainer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Download counts, only reported by registry searches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Downloads {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly: Option<u64>,
}

/// Registry search score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Missing from some registries; treated as zero
    #[serde(rename = "final", default)]
    pub final_score: f64,
    #[serde(default)]
    pub detail: ScoreDetail,
}

/// Per-dimension breakdown of a search score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetail {
    #[serde(default)]
    pub quality: f64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub maintenance: f64,
}

impl PackageRecord {
    /// Create a record with only the required fields set
    pub fn new(name: String, version: String) -> Self {
        Self {
            name,
            version,
            description: None,
            keywords: Vec::new(),
            author: None,
            maintainers: Vec::new(),
            homepage: None,
            repository: None,
            license: None,
            published_at: None,
            downloads: None,
            score: None,
        }
    }

    /// Check if this package has a specific keyword
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

impl Author {
    /// Display name of the author
    pub fn name(&self) -> &str {
        match self {
            Author::Name(name) => name,
            Author::Person { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_no_optional_fields() {
        let record = PackageRecord::new("react".to_string(), "18.2.0".to_string());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["name"], "react");
        assert_eq!(json["version"], "18.2.0");
        assert_eq!(json["keywords"], serde_json::json!([]));
        assert!(json.get("downloads").is_none());
        assert!(json.get("score").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_published_at_is_camel_case() {
        let mut record = PackageRecord::new("vue".to_string(), "3.0.0".to_string());
        record.published_at = Some("2020-09-18T00:00:00.000Z".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["publishedAt"], "2020-09-18T00:00:00.000Z");
    }

    #[test]
    fn test_author_shapes() {
        let bare: Author = serde_json::from_str(r#""Evan You""#).unwrap();
        assert_eq!(bare, Author::Name("Evan You".to_string()));

        let person: Author =
            serde_json::from_str(r#"{"name":"Evan You","email":"evan@vuejs.org"}"#).unwrap();
        assert_eq!(person.name(), "Evan You");
        assert!(matches!(person, Author::Person { email: Some(_), .. }));
    }

    #[test]
    fn test_score_final_field_name() {
        let score: Score = serde_json::from_str(
            r#"{"final":0.9,"detail":{"quality":0.8,"popularity":0.7,"maintenance":1.0}}"#,
        )
        .unwrap();
        assert_eq!(score.final_score, 0.9);
        assert_eq!(score.detail.maintenance, 1.0);

        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["final"], 0.9);
    }

    #[test]
    fn test_score_without_final_defaults_to_zero() {
        let score: Score = serde_json::from_str(r#"{"detail":{"popularity":0.4}}"#).unwrap();
        assert_eq!(score.final_score, 0.0);
        assert_eq!(score.detail.popularity, 0.4);
    }

    #[test]
    fn test_keywords() {
        let mut record = PackageRecord::new("test".to_string(), "1.0.0".to_string());
        record.keywords = vec!["web".to_string(), "framework".to_string()];

        assert!(record.has_keyword("web"));
        assert!(!record.has_keyword("database"));
    }
}
