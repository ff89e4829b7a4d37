//! Mapping of backend-shaped records into the canonical [`PackageRecord`].
//!
//! Pure functions, one per source shape. A record without a usable name is
//! dropped (`None`); every other missing field becomes absent or empty.

use scout_core::types::{Author, Downloads, Maintainer, PackageRecord, UNKNOWN_VERSION};
use serde_json::Value;
use tracing::warn;

use crate::api::{
    ApiSearchObject, CliSearchRecord, RawAuthor, RawKeywords, RawLicense, RawMaintainer,
    RawRepository,
};

/// Map one element of `npm search --json` output
pub fn from_cli_record(record: CliSearchRecord) -> Option<PackageRecord> {
    let mut package = PackageRecord::new(required_name(record.name)?, version_or_unknown(record.version));
    let links = record.links.unwrap_or_default();

    package.description = non_empty(record.description);
    package.keywords = keywords(record.keywords);
    package.author = record.author.and_then(author);
    package.maintainers = maintainers(record.maintainers);
    package.homepage = non_empty(record.homepage).or_else(|| non_empty(links.homepage));
    package.repository = record
        .repository
        .and_then(repository)
        .or_else(|| non_empty(links.repository));
    package.license = record.license.and_then(license);
    package.published_at = non_empty(record.date);
    // The CLI never reports downloads or score

    Some(package)
}

/// Map one tab-delimited text line already split into trimmed fields
///
/// Field order is `name`, `version`, `description`; fewer than three fields
/// is not a record.
pub fn from_text_fields(fields: &[&str]) -> Option<PackageRecord> {
    let [name, version, description, ..] = fields else {
        return None;
    };

    let mut package = PackageRecord::new(
        required_name(Some(name.to_string()))?,
        version_or_unknown(Some(version.to_string())),
    );
    package.description = non_empty(Some(description.to_string()));

    Some(package)
}

/// Decode and map one raw entry of a registry search response
///
/// An entry whose fields have the wrong types is logged and dropped; it never
/// fails the rest of the page.
pub fn from_api_value(value: Value) -> Option<PackageRecord> {
    match serde_json::from_value::<ApiSearchObject>(value) {
        Ok(object) => from_api_object(object),
        Err(e) => {
            warn!("Skipping malformed registry entry: {}", e);
            None
        }
    }
}

/// Map one entry of a registry search response
pub fn from_api_object(object: ApiSearchObject) -> Option<PackageRecord> {
    let source = object.package?;
    let links = source.links.unwrap_or_default();

    let mut package = PackageRecord::new(required_name(source.name)?, version_or_unknown(source.version));
    package.description = non_empty(source.description);
    package.keywords = keywords(source.keywords);
    package.author = source.author.and_then(author);
    package.maintainers = maintainers(source.maintainers);
    package.homepage = non_empty(links.homepage);
    package.repository = non_empty(links.repository);
    package.license = source.license.and_then(license);
    package.published_at = non_empty(source.date);
    package.downloads = object.downloads.map(|downloads| Downloads {
        weekly: downloads.weekly,
        monthly: downloads.monthly,
    });
    package.score = object.score;

    Some(package)
}

fn required_name(name: Option<String>) -> Option<String> {
    non_empty(name)
}

fn version_or_unknown(version: Option<String>) -> String {
    non_empty(version).unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn keywords(raw: Option<RawKeywords>) -> Vec<String> {
    let list = match raw {
        Some(RawKeywords::List(list)) => list,
        Some(RawKeywords::Single(joined)) => joined.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };

    list.into_iter().filter_map(|k| non_empty(Some(k))).collect()
}

fn author(raw: RawAuthor) -> Option<Author> {
    match raw {
        RawAuthor::Name(name) => non_empty(Some(name)).map(Author::Name),
        RawAuthor::Person { name, username, email } => {
            let name = non_empty(name).or_else(|| non_empty(username))?;
            Some(Author::Person {
                name,
                email: non_empty(email),
            })
        }
    }
}

fn maintainers(raw: Option<Vec<RawMaintainer>>) -> Vec<Maintainer> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|m| {
            let name = non_empty(m.name).or_else(|| non_empty(m.username))?;
            Some(Maintainer {
                name,
                email: non_empty(m.email),
            })
        })
        .collect()
}

fn repository(raw: RawRepository) -> Option<String> {
    match raw {
        RawRepository::Url(url) => non_empty(Some(url)),
        RawRepository::Detailed { url, .. } => non_empty(url),
    }
}

fn license(raw: RawLicense) -> Option<String> {
    match raw {
        RawLicense::Spdx(id) => non_empty(Some(id)),
        RawLicense::Legacy { license_type } => non_empty(license_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiSearchResponse;

    fn cli_record(json: &str) -> CliSearchRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_cli_record_minimal() {
        let record = from_cli_record(cli_record(
            r#"{"name":"react","version":"18.2.0","description":"React is a JavaScript library"}"#,
        ))
        .unwrap();

        assert_eq!(record.name, "react");
        assert_eq!(record.version, "18.2.0");
        assert_eq!(record.description.as_deref(), Some("React is a JavaScript library"));
        assert!(record.keywords.is_empty());
        assert!(record.maintainers.is_empty());
        assert_eq!(record.downloads, None);
        assert_eq!(record.score, None);
    }

    #[test]
    fn test_cli_record_modern_npm_shape() {
        let record = from_cli_record(cli_record(
            r#"{
                "name": "lodash",
                "version": "4.17.21",
                "keywords": ["modules", "stdlib", "util"],
                "date": "2021-02-20T15:42:16.891Z",
                "links": {
                    "npm": "https://www.npmjs.com/package/lodash",
                    "homepage": "https://lodash.com/",
                    "repository": "git+https://github.com/lodash/lodash.git"
                },
                "author": {"name": "John-David Dalton", "email": "john.david.dalton@gmail.com"},
                "publisher": {"username": "bnjmnt4n"},
                "maintainers": [{"username": "mathias", "email": "mathias@qiwi.be"}]
            }"#,
        ))
        .unwrap();

        assert_eq!(record.homepage.as_deref(), Some("https://lodash.com/"));
        assert_eq!(
            record.repository.as_deref(),
            Some("git+https://github.com/lodash/lodash.git")
        );
        assert_eq!(record.published_at.as_deref(), Some("2021-02-20T15:42:16.891Z"));
        assert_eq!(record.maintainers[0].name, "mathias");
        assert_eq!(record.author.as_ref().map(Author::name), Some("John-David Dalton"));
        assert!(record.has_keyword("stdlib"));
    }

    #[test]
    fn test_cli_record_repository_object_and_missing_version() {
        let record = from_cli_record(cli_record(
            r#"{"name":"left-pad","repository":{"type":"git","url":"git://github.com/stevemao/left-pad.git"},"license":{"type":"WTFPL"}}"#,
        ))
        .unwrap();

        assert_eq!(record.version, "unknown");
        assert_eq!(record.repository.as_deref(), Some("git://github.com/stevemao/left-pad.git"));
        assert_eq!(record.license.as_deref(), Some("WTFPL"));
    }

    #[test]
    fn test_cli_record_without_name_is_dropped() {
        assert!(from_cli_record(cli_record(r#"{"version":"1.0.0"}"#)).is_none());
        assert!(from_cli_record(cli_record(r#"{"name":"  "}"#)).is_none());
    }

    #[test]
    fn test_text_fields() {
        let record = from_text_fields(&["lodash", "4.17.21", "Utility library"]).unwrap();
        assert_eq!(record.name, "lodash");
        assert_eq!(record.version, "4.17.21");
        assert_eq!(record.description.as_deref(), Some("Utility library"));

        let record = from_text_fields(&["pkg", "", "", "extra"]).unwrap();
        assert_eq!(record.version, "unknown");
        assert_eq!(record.description, None);

        assert!(from_text_fields(&["lodash", "4.17.21"]).is_none());
    }

    #[test]
    fn test_api_object_minimal() {
        let response: ApiSearchResponse = serde_json::from_str(
            r#"{"objects":[{"package":{"name":"vue","version":"3.0.0"}}],"total":1}"#,
        )
        .unwrap();
        let value = response.objects.unwrap().remove(0);

        let record = from_api_value(value).unwrap();
        assert_eq!(record.name, "vue");
        assert_eq!(record.version, "3.0.0");
        assert_eq!(record, PackageRecord::new("vue".to_string(), "3.0.0".to_string()));
    }

    #[test]
    fn test_api_object_full() {
        let object: ApiSearchObject = serde_json::from_str(
            r#"{
                "package": {
                    "name": "express",
                    "version": "4.18.2",
                    "description": "Fast, unopinionated, minimalist web framework",
                    "keywords": ["express", "framework"],
                    "author": {"name": "TJ Holowaychuk", "email": "tj@vision-media.ca"},
                    "maintainers": [{"username": "wesleytodd", "email": "wes@wesleytodd.com"}],
                    "license": "MIT",
                    "date": "2022-10-08T20:17:49.016Z",
                    "links": {
                        "homepage": "http://expressjs.com/",
                        "repository": "https://github.com/expressjs/express"
                    }
                },
                "downloads": {"weekly": 29000000, "monthly": 120000000},
                "score": {"final": 0.92, "detail": {"quality": 0.9, "popularity": 0.95, "maintenance": 0.88}}
            }"#,
        )
        .unwrap();

        let record = from_api_object(object).unwrap();
        assert_eq!(record.homepage.as_deref(), Some("http://expressjs.com/"));
        assert_eq!(record.repository.as_deref(), Some("https://github.com/expressjs/express"));
        assert_eq!(record.license.as_deref(), Some("MIT"));
        assert_eq!(record.published_at.as_deref(), Some("2022-10-08T20:17:49.016Z"));
        assert_eq!(record.maintainers[0].name, "wesleytodd");

        let downloads = record.downloads.unwrap();
        assert_eq!(downloads.weekly, Some(29_000_000));
        assert_eq!(downloads.monthly, Some(120_000_000));

        let score = record.score.unwrap();
        assert_eq!(score.final_score, 0.92);
        assert_eq!(score.detail.popularity, 0.95);
    }

    #[test]
    fn test_api_object_without_package_is_dropped() {
        assert!(from_api_object(ApiSearchObject::default()).is_none());
    }

    #[test]
    fn test_api_value_with_wrong_field_types_is_dropped() {
        let value = serde_json::json!({
            "package": {"name": "odd", "version": "1.0.0"},
            "downloads": "many"
        });
        assert!(from_api_value(value).is_none());

        assert!(from_api_value(serde_json::json!("not an object")).is_none());
    }

    #[test]
    fn test_api_value_score_without_final() {
        let value = serde_json::json!({
            "package": {"name": "partial", "version": "0.1.0"},
            "score": {"detail": {"quality": 0.5}}
        });

        let score = from_api_value(value).unwrap().score.unwrap();
        assert_eq!(score.final_score, 0.0);
        assert_eq!(score.detail.quality, 0.5);
    }

    #[test]
    fn test_keywords_single_string() {
        let record = from_cli_record(cli_record(r#"{"name":"x","keywords":"a, b,,c"}"#)).unwrap();
        assert_eq!(record.keywords, vec!["a", "b", "c"]);
    }
}
