//! XML extractor
//!
//! Each `<row>` element anywhere below the document root becomes one
//! record. Field values come from the row's direct children:
//!
//! ```xml
//! <cars>
//!   <row><model>Tesla</model><year>2021</year><price>35000</price><fuel>Electric</fuel></row>
//!   <row><car_model>Audi</car_model><year_of_manufacture>2019</year_of_manufacture></row>
//! </cars>
//! ```
//!
//! `model`/`car_model` and `year`/`year_of_manufacture` are alternative
//! names for the same field; the first one with text wins. A missing child
//! is never an error, but a document that is not well-formed is.

use super::{SourceFormat, coerce, read_sources};
use crate::error::{ExtractError, Result};
use crate::etl::Extractor;
use crate::record::{Record, RecordSet};
use crate::storage::{DirectoryListing, FileDiscovery};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::path::{Path, PathBuf};

const ROW: &str = "row";
const MODEL_KEYS: [&str; 2] = ["model", "car_model"];
const YEAR_KEYS: [&str; 2] = ["year", "year_of_manufacture"];

/// Extract records from an XML file or a directory of `.xml` files
///
/// # Example
/// ```no_run
/// use car_extract::sources::XmlExtractor;
///
/// let records = XmlExtractor::new("listings.xml").read_all()?;
/// for record in &records {
///     println!("{:?} {:?}", record.car_model(), record.price);
/// }
/// # Ok::<(), car_extract::ExtractError>(())
/// ```
pub struct XmlExtractor<D = DirectoryListing> {
    path: PathBuf,
    discovery: D,
}

impl XmlExtractor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_discovery(path, DirectoryListing)
    }
}

impl<D: FileDiscovery> XmlExtractor<D> {
    /// Use a custom directory listing
    pub fn with_discovery(path: impl AsRef<Path>, discovery: D) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            discovery,
        }
    }

    /// Read all XML sources into one record set
    pub fn read_all(&self) -> Result<RecordSet> {
        read_sources(&self.path, SourceFormat::Xml, &self.discovery, parse_xml)
    }
}

impl<D: FileDiscovery> Extractor for XmlExtractor<D> {
    type Item = Record;

    async fn extract(&self) -> eyre::Result<Vec<Self::Item>> {
        Ok(self.read_all()?.into_records())
    }
}

/// Extract records from an XML file or directory
pub fn extract_from_xml(path: impl AsRef<Path>) -> Result<RecordSet> {
    XmlExtractor::new(path).read_all()
}

/// Parsed element: name, leading text and child elements
///
/// Only the text before the first child is kept, which is all a field
/// lookup ever reads.
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Text of the first direct child called `name`; `""` if it has none
    fn child_text(&self, name: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|child| child.name == name)
            .map(|child| child.text.as_str())
    }

    /// Try each name in turn, keeping the first lookup with text
    fn first_text(&self, names: &[&str]) -> Option<&str> {
        let mut found = None;
        for name in names {
            found = self.child_text(name);
            if found.is_some_and(|text| !text.is_empty()) {
                break;
            }
        }
        found
    }

    /// Descendants named `name`, in document order, excluding `self`
    fn descendants<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.descendants(name, out);
        }
    }
}

fn parse_xml(path: &Path, bytes: &[u8]) -> Result<RecordSet> {
    let root = parse_document(bytes)
        .map_err(|reason| ExtractError::parse(SourceFormat::Xml, path, reason))?;

    let mut rows = Vec::new();
    root.descendants(ROW, &mut rows);

    Ok(rows.into_iter().map(record_from_row).collect())
}

fn record_from_row(row: &Element) -> Record {
    let car_model = row.first_text(&MODEL_KEYS);
    let year = row.first_text(&YEAR_KEYS);
    let price = row.child_text("price");
    let fuel = row.child_text("fuel");

    Record {
        car_model: Some(car_model.unwrap_or_default().to_string()),
        year_of_manufacture: year.and_then(coerce::digits_to_year),
        price: price.and_then(coerce::decimal_to_price),
        fuel: Some(fuel.unwrap_or_default().to_string()),
    }
}

/// Build the element tree, rejecting anything that is not well-formed
fn parse_document(bytes: &[u8]) -> std::result::Result<Element, String> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().check_end_names = true;

    let mut buf = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("{} at position {}", e, reader.error_position()))?;

        match event {
            Event::Start(start) => {
                let name = start_tag(&start)?;
                ensure_single_root(&open, &root, &name)?;
                open.push(Element::new(name));
            }
            Event::Empty(start) => {
                let name = start_tag(&start)?;
                ensure_single_root(&open, &root, &name)?;
                close(Element::new(name), &mut open, &mut root);
            }
            Event::End(end) => {
                let element = open.pop().ok_or_else(|| {
                    format!(
                        "Unexpected closing tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    )
                })?;
                close(element, &mut open, &mut root);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                check_chars(&text)?;
                append_text(&mut open, &text)?;
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data).map_err(|e| e.to_string())?;
                check_chars(text)?;
                append_text(&mut open, text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = open.last() {
        return Err(format!("Unclosed element <{}>", unclosed.name));
    }
    root.ok_or_else(|| "No element found".to_string())
}

/// Validate a start tag and its attributes, returning the element name
fn start_tag(start: &BytesStart) -> std::result::Result<String, String> {
    let name = xml_name(start.name().as_ref())?;

    // Checked attributes reject unquoted values and duplicate keys
    for attr in start.attributes().with_checks(true) {
        let attr = attr.map_err(|e| format!("Bad attribute in <{}>: {}", name, e))?;
        xml_name(attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| format!("Bad attribute value in <{}>: {}", name, e))?;
        check_chars(&value)?;
    }

    Ok(name)
}

fn xml_name(raw: &[u8]) -> std::result::Result<String, String> {
    let name = std::str::from_utf8(raw).map_err(|e| format!("Invalid name: {}", e))?;

    let mut chars = name.chars();
    let valid = chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char);
    if !valid {
        return Err(format!("Invalid name {:?}", name));
    }
    Ok(name.to_string())
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Reject characters XML 1.0 does not allow, literal or referenced
fn check_chars(text: &str) -> std::result::Result<(), String> {
    let allowed = |c: char| {
        matches!(c, '\t' | '\n' | '\r' | ' '..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
            || c >= '\u{10000}'
    };
    match text.chars().find(|&c| !allowed(c)) {
        Some(c) => Err(format!("Invalid character U+{:04X}", c as u32)),
        None => Ok(()),
    }
}

fn ensure_single_root(
    open: &[Element],
    root: &Option<Element>,
    name: &str,
) -> std::result::Result<(), String> {
    if open.is_empty() && root.is_some() {
        return Err(format!("Junk after document element: <{}>", name));
    }
    Ok(())
}

fn close(element: Element, open: &mut [Element], root: &mut Option<Element>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn append_text(open: &mut [Element], text: &str) -> std::result::Result<(), String> {
    match open.last_mut() {
        Some(current) => {
            if current.children.is_empty() {
                current.text.push_str(text);
            }
            Ok(())
        }
        None if text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty() => {
            Ok(())
        }
        None => Err("Text outside the document element".to_string()),
    }
}
