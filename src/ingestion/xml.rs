//! XML ingestion implementation.
//!
//! Two document shapes are recognized:
//!
//! - **Repeated rows**: the root holds two or more element children and the first child's tag
//!   repeats, e.g. `<rows><row id="1"><name>Ada</name></row><row .../></rows>`. The first child's
//!   attribute names followed by its child element names form the schema; every element child of
//!   the root becomes one record. A first child with neither attributes nor child elements
//!   (`<items><item>a</item><item>b</item></items>`) yields a single column named after the tag.
//! - **Single record**: anything else. The root's own attributes and child elements form one
//!   record.

use roxmltree::{Document, Node};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{CellValue, Schema, Table};

use super::capping::normalize_headers;

/// Ingest XML bytes into a [`Table`], keeping at most `max_rows` records.
pub fn ingest_xml_from_bytes(bytes: &[u8], max_rows: usize) -> IngestionResult<Table> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IngestionError::malformed("xml", format!("input is not valid utf-8: {e}")))?;
    ingest_xml_from_str(text, max_rows)
}

/// Ingest XML from an in-memory string into a [`Table`].
pub fn ingest_xml_from_str(input: &str, max_rows: usize) -> IngestionResult<Table> {
    let doc = Document::parse(input)?;
    let root = doc.root_element();

    let children: Vec<Node<'_, '_>> = root.children().filter(Node::is_element).collect();
    let repeated = match children.first() {
        Some(first) if children.len() >= 2 => {
            let tag = first.tag_name().name();
            children.iter().filter(|c| c.tag_name().name() == tag).count() > 1
        }
        _ => false,
    };

    if repeated {
        Ok(rows_from_repeated_children(&children, max_rows))
    } else {
        Ok(single_record(root))
    }
}

fn rows_from_repeated_children(children: &[Node<'_, '_>], max_rows: usize) -> Table {
    let first = children[0];
    let fields = field_names(first);

    if fields.is_empty() {
        let name = first.tag_name().name().to_owned();
        let rows = children
            .iter()
            .take(max_rows)
            .map(|child| vec![CellValue::from_raw(&element_text(*child))])
            .collect();
        return Table::new(Schema::new([name]), rows);
    }

    let rows = children
        .iter()
        .take(max_rows)
        .map(|child| fields.iter().map(|f| field_value(*child, f)).collect())
        .collect();

    Table::new(Schema::new(normalize_headers(&fields)), rows)
}

fn single_record(root: Node<'_, '_>) -> Table {
    let fields = field_names(root);
    if fields.is_empty() {
        let text = element_text(root);
        if text.trim().is_empty() {
            return Table::default();
        }
        let name = root.tag_name().name().to_owned();
        return Table::new(Schema::new([name]), vec![vec![CellValue::from_raw(&text)]]);
    }

    let row = fields.iter().map(|f| field_value(root, f)).collect();
    Table::new(Schema::new(normalize_headers(&fields)), vec![row])
}

/// Attribute names, then distinct child element names, in document order.
fn field_names(node: Node<'_, '_>) -> Vec<String> {
    let mut names: Vec<String> = node.attributes().map(|a| a.name().to_owned()).collect();
    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }
    names
}

/// Value of `field` on `node`: the first child element with that name wins, then the attribute.
fn field_value(node: Node<'_, '_>, field: &str) -> CellValue {
    if let Some(child) = node
        .children()
        .find(|c| c.is_element() && c.tag_name().name() == field)
    {
        return CellValue::from_raw(&element_text(child));
    }
    node.attribute(field).map_or(CellValue::Null, CellValue::from_raw)
}

fn element_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ingest_xml_from_str;
    use crate::types::{CellValue, Schema};

    #[test]
    fn repeated_children_become_records() {
        let xml = r#"<people>
            <person id="1"><name>Ada</name><score>98.5</score></person>
            <person id="2"><name>Grace</name></person>
        </people>"#;
        let t = ingest_xml_from_str(xml, 100).unwrap();
        assert_eq!(t.schema, Schema::new(["id", "name", "score"]));
        assert_eq!(t.row_count(), 2);
        assert_eq!(
            t.rows[1],
            vec![
                CellValue::Text("2".into()),
                CellValue::Text("Grace".into()),
                CellValue::Null
            ]
        );
    }

    #[test]
    fn text_only_children_use_tag_as_column() {
        let t = ingest_xml_from_str("<items><item>a</item><item>b</item></items>", 100).unwrap();
        assert_eq!(t.schema, Schema::new(["item"]));
        assert_eq!(t.rows[1], vec![CellValue::Text("b".into())]);
    }

    #[test]
    fn non_repeated_root_is_a_single_record() {
        let xml = r#"<config version="3"><host>localhost</host><port>8080</port></config>"#;
        let t = ingest_xml_from_str(xml, 100).unwrap();
        assert_eq!(t.schema, Schema::new(["version", "host", "port"]));
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.rows[0][2], CellValue::Text("8080".into()));
    }

    #[test]
    fn row_cap_applies() {
        let t = ingest_xml_from_str("<r><i>1</i><i>2</i><i>3</i></r>", 2).unwrap();
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn malformed_xml_errors() {
        let err = ingest_xml_from_str("<a><b></a>", 100).unwrap_err();
        assert!(err.to_string().contains("xml error"));
    }
}
