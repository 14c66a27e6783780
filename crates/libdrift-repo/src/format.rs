use libdrift_types::{ManifestFormat, RepoPath};

/// Detect the manifest format from its file name.
///
/// `pom.xml` and `*.pom` are Maven, `ivy.xml` and `ivy-*.xml` are Ivy. Matching ignores
/// ASCII case. Anything else is unknown.
pub fn detect_format(path: &RepoPath) -> Option<ManifestFormat> {
    let name = path.file_name()?.to_ascii_lowercase();

    if name == "pom.xml" || (name.len() > ".pom".len() && name.ends_with(".pom")) {
        return Some(ManifestFormat::Maven);
    }
    if name == "ivy.xml" || (name.starts_with("ivy-") && name.ends_with(".xml")) {
        return Some(ManifestFormat::Ivy);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(p: &str) -> Option<ManifestFormat> {
        detect_format(&RepoPath::new(p))
    }

    #[test]
    fn recognizes_maven_names() {
        assert_eq!(detect("pom.xml"), Some(ManifestFormat::Maven));
        assert_eq!(detect("server/POM.xml"), Some(ManifestFormat::Maven));
        assert_eq!(detect("dist/common-3.0.5.pom"), Some(ManifestFormat::Maven));
    }

    #[test]
    fn recognizes_ivy_names() {
        assert_eq!(detect("ivy.xml"), Some(ManifestFormat::Ivy));
        assert_eq!(detect("../server/ivy-release.xml"), Some(ManifestFormat::Ivy));
    }

    #[test]
    fn other_names_are_unknown() {
        for p in ["build.gradle", "settings.xml", "ivysettings.xml", ".pom", "pom.xml.bak", "."] {
            assert_eq!(detect(p), None, "{p}");
        }
    }
}
