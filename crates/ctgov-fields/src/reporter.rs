//! Plain-text report of a field bucket: one `key: v1, v2` line per key.

use std::io::{self, Write};

use crate::types::FieldBucket;

/// Separator between values on one line.
pub const VALUE_SEPARATOR: &str = ", ";

/// Format one report line.
pub fn format_line(key: &str, values: &[String]) -> String {
    format!("{key}: {}", values.join(VALUE_SEPARATOR))
}

/// All report lines in key insertion order.
pub fn render(bucket: &FieldBucket) -> Vec<String> {
    bucket
        .iter()
        .map(|(key, values)| format_line(key, values))
        .collect()
}

/// Write the report, one newline-terminated line per key. An empty bucket
/// writes nothing.
pub fn write_report<W: Write>(bucket: &FieldBucket, mut out: W) -> io::Result<()> {
    for line in render(bucket) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract_fields;

    #[test]
    fn test_format_line() {
        let values = vec!["Boston".to_string(), "Denver".to_string()];
        assert_eq!(format_line("ctCity", &values), "ctCity: Boston, Denver");
        assert_eq!(format_line("ctZip", &[String::new()]), "ctZip: ");
    }

    #[test]
    fn test_report_follows_first_insertion_order() {
        let xml = "<s><city>A</city><name>N</name><city>B</city><zip/></s>";
        let bucket = extract_fields(xml).unwrap();

        let mut out = Vec::new();
        write_report(&bucket, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ctCity: A, B\nctName: N\nctZip: \n"
        );
    }

    #[test]
    fn test_empty_bucket_prints_nothing() {
        let mut out = Vec::new();
        write_report(&FieldBucket::new(), &mut out).unwrap();
        assert!(out.is_empty());
        assert!(render(&FieldBucket::new()).is_empty());
    }
}
