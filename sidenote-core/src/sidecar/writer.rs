//! Sidecar serialization.
//!
//! The whole file is built in memory so the caller can write it with a
//! single filesystem call; content stripping must never start after a
//! partial write.

use super::{KeepMode, Record, BANNER};
use chrono::Local;

/// Serialize a sidecar file for `doc_name`.
///
/// `records` must already be sorted ascending by position, with 0-based
/// positions; the writer emits them 1-based per the file format.
pub fn serialize(doc_name: &str, mode: KeepMode, records: &[Record]) -> Vec<u8> {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = Vec::with_capacity(
        BANNER.len() + doc_name.len() + 64 + records.iter().map(|r| r.len() + 16).sum::<usize>(),
    );
    out.extend_from_slice(BANNER.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(doc_name.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(timestamp.to_string().as_bytes());
    out.push(b'\n');
    out.extend_from_slice(mode.as_str().as_bytes());
    out.push(b'\n');
    for record in records {
        debug_assert!(!record.is_empty(), "degenerate record reached the writer");
        out.extend_from_slice(format!("{},{}\n", record.position + 1, record.len()).as_bytes());
        out.extend_from_slice(record.content.as_bytes());
        out.push(b'\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_layout() {
        let records = vec![
            Record {
                position: 4,
                content: "quick ".to_string(),
            },
            Record {
                position: 20,
                content: "two\nlines".to_string(),
            },
        ];
        let bytes = serialize("fable.txt", KeepMode::Out, &records);
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(BANNER));
        assert_eq!(lines.next(), Some("fable.txt"));
        let stamp = lines.next().unwrap();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(lines.next(), Some("OUT"));
        // Blocks are 1-based and length-delimited, newlines preserved.
        let body = text.splitn(5, '\n').nth(4).unwrap();
        assert_eq!(body, "5,6\nquick \n21,9\ntwo\nlines\n");
    }

    #[test]
    fn test_serialize_no_records_is_header_only() {
        let bytes = serialize("a.txt", KeepMode::In, &[]);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with("IN\n"));
    }
}
