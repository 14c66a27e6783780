use super::{
    Entities, MalformedManifest, Structure, attribute, check_attributes, declare, malformed,
    resolve_reference,
};
use libdrift_domain::model::{LibraryFilter, VersionMapping};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

pub(super) fn parse(
    text: &str,
    filter: &LibraryFilter<'_>,
) -> Result<VersionMapping, MalformedManifest> {
    let mut reader = NsReader::from_str(text);
    let mut doc = Structure::default();
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
        let unbound = matches!(ns, ResolveResult::Unbound);

        match event {
            Event::Start(e) => {
                check_attributes(&e)?;
                doc.open()?;
                if unbound {
                    dependency(&e, filter, &entities, &mut out)?;
                }
            }
            Event::Empty(e) => {
                check_attributes(&e)?;
                doc.open()?;
                if unbound {
                    dependency(&e, filter, &entities, &mut out)?;
                }
                doc.close()?;
            }
            Event::End(_) => doc.close()?,
            Event::Text(t) => doc.text(&t.decode().map_err(malformed)?)?,
            Event::CData(t) => doc.text(&t.decode().map_err(malformed)?)?,
            Event::GeneralRef(r) => doc.text(&resolve_reference(&r, &entities)?)?,
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

/// `<dependency org=".." name=".." rev=".."/>`; anything else is ignored.
fn dependency(
    e: &BytesStart<'_>,
    filter: &LibraryFilter<'_>,
    entities: &Entities,
    out: &mut VersionMapping,
) -> Result<(), MalformedManifest> {
    if e.local_name().as_ref() != b"dependency" {
        return Ok(());
    }
    let name = attribute(e, b"name", entities)?;
    let rev = attribute(e, b"rev", entities)?;
    declare(out, filter, name.as_deref(), rev.as_deref());
    Ok(())
}
