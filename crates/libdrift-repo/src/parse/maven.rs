use super::{
    Entities, MalformedManifest, Structure, check_attributes, declare, malformed, resolve_reference,
};
use libdrift_domain::model::{LibraryFilter, VersionMapping};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

/// Namespace every Maven 4.0.0 POM element lives in.
pub const MAVEN_POM_NS: &[u8] = b"http://maven.apache.org/POM/4.0.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    ArtifactId,
    Version,
}

/// A `<dependency>` element still open.
#[derive(Debug)]
struct Pending {
    depth: usize,
    artifact_id: Option<String>,
    version: Option<String>,
}

/// Text collected for a direct `<artifactId>` / `<version>` child.
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

pub(super) fn parse(
    text: &str,
    filter: &LibraryFilter<'_>,
) -> Result<VersionMapping, MalformedManifest> {
    let mut reader = NsReader::from_str(text);
    let mut doc = Structure::default();
    let mut pending: Vec<Pending> = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut entities = Entities::default();
    let mut out = VersionMapping::new();

    loop {
        let (ns, event) = match reader.read_resolved_event() {
            Ok(pair) => pair,
            Err(err) => {
                return Err(MalformedManifest::new(format!(
                    "{err} (at byte {})",
                    reader.error_position()
                )));
            }
        };
        let in_pom_ns = matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == MAVEN_POM_NS);

        match event {
            Event::Start(e) => {
                check_attributes(&e)?;
                let depth = doc.open()?;
                if !in_pom_ns {
                    continue;
                }
                let local = e.local_name();
                let field = match local.as_ref() {
                    b"dependency" => {
                        pending.push(Pending {
                            depth,
                            artifact_id: None,
                            version: None,
                        });
                        None
                    }
                    b"artifactId" => Some(Field::ArtifactId),
                    b"version" => Some(Field::Version),
                    _ => None,
                };
                let direct_child = pending.last().is_some_and(|p| p.depth + 1 == depth);
                if let Some(field) = field
                    && direct_child
                    && capture.is_none()
                {
                    capture = Some(Capture {
                        field,
                        depth,
                        text: String::new(),
                    });
                }
            }
            // `<version/>` and `<dependency/>` declare nothing.
            Event::Empty(e) => {
                check_attributes(&e)?;
                doc.open()?;
                doc.close()?;
            }
            Event::End(_) => {
                let depth = doc.depth();
                if capture.as_ref().is_some_and(|c| c.depth == depth)
                    && let Some(c) = capture.take()
                    && let Some(p) = pending.last_mut()
                {
                    match c.field {
                        Field::ArtifactId => p.artifact_id = Some(c.text),
                        Field::Version => p.version = Some(c.text),
                    }
                }
                if pending.last().is_some_and(|p| p.depth == depth)
                    && let Some(p) = pending.pop()
                {
                    declare(
                        &mut out,
                        filter,
                        p.artifact_id.as_deref(),
                        p.version.as_deref(),
                    );
                }
                doc.close()?;
            }
            Event::Text(t) => {
                let s = t.decode().map_err(malformed)?;
                append(&doc, &mut capture, &s)?;
            }
            Event::CData(t) => {
                let s = t.decode().map_err(malformed)?;
                append(&doc, &mut capture, &s)?;
            }
            Event::GeneralRef(r) => {
                let s = resolve_reference(&r, &entities)?;
                append(&doc, &mut capture, &s)?;
            }
            Event::DocType(d) => {
                entities = Entities::from_doctype(&d.decode().map_err(malformed)?)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    doc.finish()?;
    Ok(out)
}

fn append(doc: &Structure, capture: &mut Option<Capture>, s: &str) -> Result<(), MalformedManifest> {
    doc.text(s)?;
    if let Some(c) = capture.as_mut()
        && c.depth == doc.depth()
    {
        c.text.push_str(s);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libdrift_domain::model::TrackedLibraries;

    fn parse_pom(xml: &str) -> VersionMapping {
        let tracked = TrackedLibraries::new(["common", "csm", "fire-rating"]);
        parse(xml, &LibraryFilter::new(&tracked)).expect("parse pom")
    }

    fn version<'a>(m: &'a VersionMapping, lib: &str) -> Option<&'a str> {
        m.get(lib).map(|v| v.as_str())
    }

    #[test]
    fn default_namespace_and_prefix_agree() {
        let default_ns = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
            <dependencies>
                <dependency>
                    <groupId>com.example</groupId>
                    <artifactId>common</artifactId>
                    <version>3.0.5</version>
                </dependency>
            </dependencies>
        </project>"#;
        let prefixed = r#"<m:project xmlns:m="http://maven.apache.org/POM/4.0.0">
            <m:dependencies>
                <m:dependency>
                    <m:artifactId>common</m:artifactId>
                    <m:version>3.0.5</m:version>
                </m:dependency>
            </m:dependencies>
        </m:project>"#;

        let a = parse_pom(default_ns);
        let b = parse_pom(prefixed);
        assert_eq!(version(&a, "common"), Some("3.0.5"));
        assert_eq!(a, b);
    }

    #[test]
    fn other_or_missing_namespace_yields_nothing() {
        let other = r#"<project xmlns="http://example.com/not-maven">
            <dependencies><dependency>
                <artifactId>common</artifactId><version>1.0</version>
            </dependency></dependencies>
        </project>"#;
        let none = r#"<project><dependencies><dependency>
            <artifactId>common</artifactId><version>1.0</version>
        </dependency></dependencies></project>"#;

        assert!(parse_pom(other).is_empty());
        assert!(parse_pom(none).is_empty());
    }

    #[test]
    fn managed_and_plugin_dependencies_count() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
            <dependencyManagement><dependencies>
                <dependency><artifactId>csm</artifactId><version>1.0.0</version></dependency>
            </dependencies></dependencyManagement>
            <build><plugins><plugin>
                <artifactId>some-plugin</artifactId>
                <version>9.9</version>
                <dependencies>
                    <dependency><artifactId>fire-rating</artifactId><version>4.2.0</version></dependency>
                </dependencies>
            </plugin></plugins></build>
        </project>"#;
        let m = parse_pom(xml);
        assert_eq!(version(&m, "csm"), Some("1.0.0"));
        assert_eq!(version(&m, "fire-rating"), Some("4.2.0"));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn only_direct_children_are_read() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><dependencies>
            <dependency>
                <artifactId>common</artifactId>
                <version>3.0.5</version>
                <exclusions><exclusion>
                    <artifactId>csm</artifactId>
                    <version>0.1</version>
                </exclusion></exclusions>
            </dependency>
        </dependencies></project>"#;
        let m = parse_pom(xml);
        assert_eq!(version(&m, "common"), Some("3.0.5"));
        assert!(!m.contains("csm"));
    }

    #[test]
    fn missing_or_empty_version_is_skipped() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><dependencies>
            <dependency><artifactId>common</artifactId></dependency>
            <dependency><artifactId>csm</artifactId><version/></dependency>
            <dependency><artifactId>fire-rating</artifactId><version>  </version></dependency>
        </dependencies></project>"#;
        assert!(parse_pom(xml).is_empty());
    }

    #[test]
    fn values_are_trimmed_and_unescaped() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><dependencies>
            <dependency>
                <artifactId>
                    common
                </artifactId>
                <version> 3.&#48;.5 </version>
            </dependency>
            <dependency>
                <artifactId>csm</artifactId>
                <version><![CDATA[1.0.0]]></version>
            </dependency>
        </dependencies></project>"#;
        let m = parse_pom(xml);
        assert_eq!(version(&m, "common"), Some("3.0.5"));
        assert_eq!(version(&m, "csm"), Some("1.0.0"));
    }

    #[test]
    fn last_declaration_wins() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><dependencies>
            <dependency><artifactId>common</artifactId><version>1.0</version></dependency>
            <dependency><artifactId>common</artifactId><version>2.0</version></dependency>
        </dependencies></project>"#;
        assert_eq!(version(&parse_pom(xml), "common"), Some("2.0"));
    }

    #[test]
    fn untracked_artifacts_are_ignored() {
        let xml = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><dependencies>
            <dependency><artifactId>junit</artifactId><version>4.13</version></dependency>
        </dependencies></project>"#;
        assert!(parse_pom(xml).is_empty());
    }

    #[test]
    fn mismatched_tags_fail() {
        let tracked = TrackedLibraries::new(["common"]);
        let err = parse(
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0"><dependencies></project>"#,
            &LibraryFilter::new(&tracked),
        )
        .expect_err("mismatched");
        assert!(!err.reason.is_empty());
    }
}
