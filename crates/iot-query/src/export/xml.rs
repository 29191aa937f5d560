use super::Exporter;
use crate::error::{QueryError, QueryResult};
use crate::results::ResultSet;
use iot_core::Cell;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

const ROOT: &str = "results";
const ITEM: &str = "item";
const FALLBACK_KEY: &str = "key";

/// XML document with a `<results>` root.
///
/// Each query becomes an element named after it holding one `<item>` per
/// row; each column is a child element with the value's text. Names that are
/// not valid XML element names are written as `<key name="...">`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExporter;

impl Exporter for XmlExporter {
    fn extension(&self) -> &'static str {
        "xml"
    }

    fn convert(&self, results: &ResultSet) -> QueryResult<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        write(&mut writer, Event::Start(BytesStart::new(ROOT)))?;

        for (name, rows) in results.iter() {
            if rows.is_empty() {
                write(&mut writer, Event::Empty(element(name)))?;
                continue;
            }
            write(&mut writer, Event::Start(element(name)))?;
            for row in rows {
                write(&mut writer, Event::Start(BytesStart::new(ITEM)))?;
                for (column, value) in row.iter() {
                    write_value(&mut writer, column, value)?;
                }
                write(&mut writer, Event::End(BytesEnd::new(ITEM)))?;
            }
            write(&mut writer, Event::End(end_element(name)))?;
        }

        write(&mut writer, Event::End(BytesEnd::new(ROOT)))?;

        String::from_utf8(writer.into_inner().into_inner()).map_err(|e| QueryError::Serialize {
            format: "xml",
            message: e.to_string(),
        })
    }
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> QueryResult<()> {
    writer
        .write_event(event)
        .map_err(|e| QueryError::Serialize {
            format: "xml",
            message: e.to_string(),
        })
}

fn write_value(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    column: &str,
    value: &Cell,
) -> QueryResult<()> {
    if value.is_null() {
        return write(writer, Event::Empty(element(column)));
    }
    write(writer, Event::Start(element(column)))?;
    write(writer, Event::Text(BytesText::new(&value.to_string())))?;
    write(writer, Event::End(end_element(column)))
}

fn element(name: &str) -> BytesStart<'_> {
    if is_valid_name(name) {
        BytesStart::new(name)
    } else {
        BytesStart::new(FALLBACK_KEY).with_attributes([("name", name)])
    }
}

fn end_element(name: &str) -> BytesEnd<'_> {
    if is_valid_name(name) {
        BytesEnd::new(name)
    } else {
        BytesEnd::new(FALLBACK_KEY)
    }
}

/// Conservative XML element name check: ASCII letter or `_` first, then
/// letters, digits, `_`, `-` or `.`, and no reserved `xml` prefix.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.to_ascii_lowercase().starts_with("xml")
}
