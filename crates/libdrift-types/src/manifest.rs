use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dependency manifest dialects libdrift understands.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    /// `pom.xml`: namespaced `<dependency>` elements with `artifactId`/`version` children.
    Maven,
    /// `ivy.xml`: `<dependency name=".." rev=".."/>` elements.
    Ivy,
}

impl ManifestFormat {
    pub const ALL: [ManifestFormat; 2] = [ManifestFormat::Maven, ManifestFormat::Ivy];

    pub fn as_str(self) -> &'static str {
        match self {
            ManifestFormat::Maven => "maven",
            ManifestFormat::Ivy => "ivy",
        }
    }

    /// Conventional file name, used when naming counterpart manifests in notifications.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ManifestFormat::Maven => "pom.xml",
            ManifestFormat::Ivy => "ivy.xml",
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownFormatTag(pub String);

impl fmt::Display for UnknownFormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown manifest format: {} (expected 'maven' or 'ivy')",
            self.0
        )
    }
}

impl std::error::Error for UnknownFormatTag {}

impl FromStr for ManifestFormat {
    type Err = UnknownFormatTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maven" | "pom" => Ok(ManifestFormat::Maven),
            "ivy" => Ok(ManifestFormat::Ivy),
            _ => Err(UnknownFormatTag(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_case_insensitively() {
        assert_eq!("Maven".parse::<ManifestFormat>(), Ok(ManifestFormat::Maven));
        assert_eq!("pom".parse::<ManifestFormat>(), Ok(ManifestFormat::Maven));
        assert_eq!(" ivy ".parse::<ManifestFormat>(), Ok(ManifestFormat::Ivy));
        assert!("gradle".parse::<ManifestFormat>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&ManifestFormat::Ivy).expect("serialize");
        assert_eq!(json, "\"ivy\"");
    }
}
