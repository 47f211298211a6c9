//! Pull named fields out of a trial record XML document.
//!
//! Single streaming pass. Every element whose local name is in the target
//! set gets one entry in its bucket, reserved when its start tag is read so
//! outer elements stay ahead of nested ones. The entry is the concatenation
//! of all descendant text and CDATA pieces, each trimmed, empty pieces
//! dropped.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::types::{bucket_key, FieldBucket, ParseError, DEFAULT_TAGS};

/// Extracts a fixed set of tags into a [`FieldBucket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExtractor {
    tags: Vec<String>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TAGS)
    }
}

/// An element still open while scanning.
struct OpenElement {
    name: String,
    capture: Option<Capture>,
}

/// Where a matching element's text ends up.
struct Capture {
    slot: usize,
    index: usize,
    text: String,
}

impl FieldExtractor {
    pub fn new<S: AsRef<str>>(tags: &[S]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    fn matches(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Scan `xml` and bucket the text of every matching element.
    pub fn extract(&self, xml: &str) -> Result<FieldBucket, ParseError> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut bucket = FieldBucket::new();
        let mut open: Vec<OpenElement> = Vec::new();
        let mut saw_element = false;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| ParseError::Syntax {
                    position: reader.error_position() as u64,
                    message: e.to_string(),
                })?;

            match event {
                Event::Start(e) => {
                    saw_element = true;
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    let capture = self.reserve(&mut bucket, &name);
                    open.push(OpenElement { name, capture });
                }
                Event::Empty(e) => {
                    saw_element = true;
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    // Reserved entry is already the empty string.
                    self.reserve(&mut bucket, &name);
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    let Some(element) = open.pop() else {
                        return Err(ParseError::Syntax {
                            position: reader.buffer_position() as u64,
                            message: format!("unexpected closing tag </{name}>"),
                        });
                    };
                    if element.name != name {
                        return Err(ParseError::Syntax {
                            position: reader.buffer_position() as u64,
                            message: format!(
                                "expected </{}>, found </{name}>",
                                element.name
                            ),
                        });
                    }
                    if let Some(capture) = element.capture {
                        bucket.set_at(capture.slot, capture.index, capture.text);
                    }
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| ParseError::Escape {
                        position: reader.buffer_position() as u64,
                        message: err.to_string(),
                    })?;
                    append_piece(&mut open, &text);
                }
                Event::CData(e) => {
                    let raw = e.into_inner();
                    append_piece(&mut open, &String::from_utf8_lossy(&raw));
                }
                Event::Eof => break,
                // Comments, declarations, processing instructions and
                // doctypes carry no field text.
                _ => {}
            }
            buf.clear();
        }

        if let Some(element) = open.pop() {
            return Err(ParseError::Unclosed { tag: element.name });
        }
        if !saw_element {
            return Err(ParseError::NoRootElement);
        }

        tracing::debug!(
            keys = bucket.len(),
            values = bucket.total_values(),
            "extracted trial fields"
        );
        Ok(bucket)
    }

    /// Reserve an empty entry for a matching element in document order.
    fn reserve(&self, bucket: &mut FieldBucket, name: &str) -> Option<Capture> {
        if !self.matches(name) {
            return None;
        }
        let key = bucket_key(name);
        let slot = bucket.slot(&key);
        let index = bucket.push_at(slot, String::new());
        tracing::trace!(tag = name, key = %key, index, "matched field element");
        Some(Capture {
            slot,
            index,
            text: String::new(),
        })
    }
}

fn append_piece(open: &mut [OpenElement], raw: &str) {
    let piece = raw.trim();
    if piece.is_empty() {
        return;
    }
    for capture in open.iter_mut().filter_map(|o| o.capture.as_mut()) {
        capture.text.push_str(piece);
    }
}

/// Extract the default tag set from `xml`.
pub fn extract_fields(xml: &str) -> Result<FieldBucket, ParseError> {
    FieldExtractor::default().extract(xml)
}
