//! Parsed-but-unvalidated manifest records

use crate::error::ManifestError;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// A manifest as read from `manifest.yml`, before any presence checks
///
/// Every field is optional here; [`validate_fields`](super::validate_fields) decides which
/// absences are fatal. Scalar text fields also accept YAML numbers and booleans
/// (`keira_version: 1.2`), which are kept in their textual form.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawManifest {
    /// Display name
    #[serde(default, deserialize_with = "scalar")]
    pub name: Option<String>,
    /// Targeted firmware version (apps only)
    #[serde(default, deserialize_with = "scalar")]
    pub keira_version: Option<String>,
    /// Long description or `@file`
    #[serde(default, deserialize_with = "scalar")]
    pub description: Option<String>,
    /// One-line description or `@file`
    #[serde(default, deserialize_with = "scalar")]
    pub short_description: Option<String>,
    /// Changelog or `@file`
    #[serde(default, deserialize_with = "scalar")]
    pub changelog: Option<String>,
    /// Author
    #[serde(default, deserialize_with = "scalar")]
    pub author: Option<String>,
    /// Icon path or URL
    #[serde(default, deserialize_with = "scalar")]
    pub icon: Option<String>,
    /// Screenshot paths or URLs
    #[serde(default)]
    pub screenshots: Option<Vec<String>>,
    /// Source repository block
    #[serde(default)]
    pub sources: Option<RawSources>,
    /// Execution file block (apps)
    #[serde(default)]
    pub executionfile: Option<RawAsset>,
    /// Mod file blocks (mods)
    #[serde(default)]
    pub modfiles: Option<Vec<RawAsset>>,
}

/// `sources:` block
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawSources {
    /// Fetch mechanism name
    #[serde(rename = "type", default, deserialize_with = "scalar")]
    pub type_name: Option<String>,
    /// `location:` block
    #[serde(default)]
    pub location: Option<RawOrigin>,
}

/// `location: {origin: ...}` block
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawOrigin {
    /// URL
    #[serde(default, deserialize_with = "scalar")]
    pub origin: Option<String>,
}

/// `{type, location}` asset block
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawAsset {
    /// Fetch mechanism name
    #[serde(rename = "type", default, deserialize_with = "scalar")]
    pub type_name: Option<String>,
    /// Either a bare URL/path or an `{origin}` block
    #[serde(default)]
    pub location: Option<RawLocation>,
}

/// Asset location in either of its accepted spellings
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawLocation {
    /// `location: https://...`
    Plain(String),
    /// `location: {origin: https://...}`
    Origin {
        /// URL or path
        origin: String,
    },
}

impl RawLocation {
    /// The URL or path, whichever spelling was used
    pub fn into_string(self) -> String {
        match self {
            RawLocation::Plain(s) => s,
            RawLocation::Origin { origin } => origin,
        }
    }
}

impl RawManifest {
    /// Parse manifest text; `path` is only used for error reporting
    ///
    /// The document must be a YAML mapping. Empty documents, lists and bare scalars are
    /// rejected before any field is looked at.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let to_error = |source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(to_error)?;
        if !value.is_mapping() {
            return Err(to_error(<serde_yaml::Error as serde::de::Error>::custom(
                "manifest must be a mapping of fields",
            )));
        }
        serde_yaml::from_value(value).map_err(to_error)
    }
}

/// Accept a YAML string, number or boolean as text; `null` counts as absent
fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar value, found {other:?}"
        ))),
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<RawManifest, ManifestError> {
        RawManifest::parse(content, Path::new("apps/demo/manifest.yml"))
    }

    #[test]
    fn parses_full_app_manifest() {
        let raw = parse(
            r#"
name: Snake
keira_version: 0.3
description: "@README.md"
short_description: Classic snake
changelog: First release
author: Lilka Team
icon: icon.png
screenshots:
  - shots/1.png
  - https://example.com/2.png
sources:
  type: git
  location:
    origin: https://github.com/lilka-dev/snake
executionfile:
  type: wget
  location: https://example.com/snake.bin
"#,
        )
        .unwrap();

        assert_eq!(raw.name.as_deref(), Some("Snake"));
        assert_eq!(raw.keira_version.as_deref(), Some("0.3"));
        assert_eq!(raw.description.as_deref(), Some("@README.md"));
        assert_eq!(raw.screenshots.as_ref().unwrap().len(), 2);
        let sources = raw.sources.unwrap();
        assert_eq!(sources.type_name.as_deref(), Some("git"));
        assert_eq!(
            sources.location.unwrap().origin.as_deref(),
            Some("https://github.com/lilka-dev/snake")
        );
        assert_eq!(
            raw.executionfile.unwrap().location,
            Some(RawLocation::Plain("https://example.com/snake.bin".to_string()))
        );
    }

    #[test]
    fn asset_location_accepts_origin_block() {
        let raw = parse(
            r#"
modfiles:
  - type: wget
    location:
      origin: https://example.com/a.lua
  - location: b.lua
"#,
        )
        .unwrap();
        let modfiles = raw.modfiles.unwrap();
        assert_eq!(
            modfiles[0].location.clone().unwrap().into_string(),
            "https://example.com/a.lua"
        );
        assert_eq!(modfiles[1].type_name, None);
        assert_eq!(modfiles[1].location.clone().unwrap().into_string(), "b.lua");
    }

    #[test]
    fn null_fields_are_absent() {
        let raw = parse("name:\nauthor: ~\n").unwrap();
        assert_eq!(raw.name, None);
        assert_eq!(raw.author, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = parse("name: X\ncategory: games\n").unwrap();
        assert_eq!(raw.name.as_deref(), Some("X"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = parse("name: [unterminated\n").unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn non_mapping_and_empty_documents_are_parse_errors() {
        assert!(matches!(
            parse("- just\n- a list\n").unwrap_err(),
            ManifestError::Parse { .. }
        ));
        assert!(matches!(
            parse("   \n").unwrap_err(),
            ManifestError::Parse { .. }
        ));
    }

    #[test]
    fn nested_mapping_in_scalar_field_is_rejected() {
        assert!(parse("name:\n  first: a\n").is_err());
    }
}
