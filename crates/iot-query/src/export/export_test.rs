use super::*;
use iot_core::{Cell, FieldMap};
use rust_decimal::Decimal;
use std::str::FromStr;

fn decimal_results() -> ResultSet {
    let mut results = ResultSet::new();
    results.insert(
        "q",
        vec![FieldMap::new().with("v", Decimal::from_str("75.5").unwrap())],
    );
    results
}

fn sample() -> ResultSet {
    let mut results = ResultSet::new();
    results.insert(
        "devices_no_events",
        vec![
            FieldMap::new()
                .with("location_name", "Floor 2")
                .with("device_name", "Hall <Thermostat> & Co"),
            FieldMap::new()
                .with("location_name", "Cabin")
                .with("device_name", Cell::Null),
        ],
    );
    results.insert("leak_locations", vec![]);
    results
}

#[test]
fn test_json_coerces_decimal_to_float() {
    let json = JsonExporter.convert(&decimal_results()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, serde_json::json!({"q": [{"v": 75.5}]}));
}

#[test]
fn test_json_is_pretty_printed_in_query_order() {
    let json = JsonExporter.convert(&sample()).unwrap();
    assert!(json.starts_with("{\n  \"devices_no_events\": [\n    {\n"));
    let first = json.find("devices_no_events").unwrap();
    let second = json.find("leak_locations").unwrap();
    assert!(first < second);
    assert!(json.contains("\"device_name\": null"));
}

#[test]
fn test_xml_document_structure() {
    let xml = XmlExporter.convert(&sample()).unwrap();
    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<results>
  <devices_no_events>
    <item>
      <location_name>Floor 2</location_name>
      <device_name>Hall &lt;Thermostat&gt; &amp; Co</device_name>
    </item>
    <item>
      <location_name>Cabin</location_name>
      <device_name/>
    </item>
  </devices_no_events>
  <leak_locations/>
</results>"#;
    assert_eq!(xml, expected);
}

#[test]
fn test_xml_keeps_decimal_text_exact() {
    let xml = XmlExporter.convert(&decimal_results()).unwrap();
    assert!(xml.contains("<v>75.5</v>"));
}

#[test]
fn test_xml_invalid_names_use_key_element() {
    let mut results = ResultSet::new();
    results.insert(
        "1st query",
        vec![FieldMap::new().with("count(*)", 3i64)],
    );
    let xml = XmlExporter.convert(&results).unwrap();
    assert!(xml.contains(r#"<key name="1st query">"#));
    assert!(xml.contains(r#"<key name="count(*)">3</key>"#));
}

#[test]
fn test_export_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out").join("results.json");

    JsonExporter.export(&decimal_results(), &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, serde_json::json!({"q": [{"v": 75.5}]}));
}

#[test]
fn test_export_to_unwritable_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = XmlExporter
        .export(&sample(), &blocker.join("results.xml"))
        .unwrap_err();
    assert!(matches!(err, QueryError::Io { .. }));
}

#[test]
fn test_format_selection() {
    assert_eq!(ExportFormat::from_str("JSON").unwrap(), ExportFormat::Json);
    assert!(ExportFormat::from_str("csv").is_err());
    assert_eq!(ExportFormat::Json.exporter().extension(), "json");
    assert_eq!(ExportFormat::Xml.exporter().extension(), "xml");
}
