//! Sidecar parsing.
//!
//! Parsing is strict and happens entirely before the document is touched:
//! a bad banner, a short header, or a truncated block fails the whole
//! load and leaves the buffer exactly as it was.

use super::{KeepMode, Record, SidecarError, SidecarResult, BANNER};

/// A fully parsed sidecar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarFile {
    pub doc_name: String,
    pub mode: KeepMode,
    pub records: Vec<Record>,
}

/// Parse sidecar bytes into records.
pub fn parse(bytes: &[u8]) -> SidecarResult<SidecarFile> {
    let mut cursor = Cursor { bytes, offset: 0 };

    let banner = cursor.header_line()?;
    if banner != BANNER.as_bytes() {
        return Err(SidecarError::InvalidBanner);
    }
    let doc_name = std::str::from_utf8(cursor.header_line()?)
        .map_err(|_| SidecarError::InvalidUtf8)?
        .to_string();
    // Line 3 is the save timestamp; presence is all that matters.
    cursor.header_line()?;
    let mode = match cursor.header_line()? {
        b"IN" => KeepMode::In,
        b"OUT" => KeepMode::Out,
        other => {
            return Err(SidecarError::InvalidMode(
                String::from_utf8_lossy(other).into_owned(),
            ))
        }
    };

    let mut records = Vec::new();
    while !cursor.at_end() {
        records.push(cursor.record()?);
    }

    Ok(SidecarFile {
        doc_name,
        mode,
        records,
    })
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn at_end(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Next newline-terminated line, without the terminator.
    fn line(&mut self) -> Option<&'a [u8]> {
        let rest = &self.bytes[self.offset..];
        let nl = rest.iter().position(|&b| b == b'\n')?;
        self.offset += nl + 1;
        Some(&rest[..nl])
    }

    fn header_line(&mut self) -> SidecarResult<&'a [u8]> {
        self.line().ok_or(SidecarError::TruncatedHeader)
    }

    /// One `<position>,<length>` block plus its content.
    fn record(&mut self) -> SidecarResult<Record> {
        let header = self
            .line()
            .ok_or_else(|| SidecarError::InvalidRecordHeader(String::new()))?;
        let header = std::str::from_utf8(header).map_err(|_| SidecarError::InvalidUtf8)?;
        let (position, length) = header
            .split_once(',')
            .and_then(|(p, l)| Some((p.parse::<usize>().ok()?, l.parse::<usize>().ok()?)))
            .ok_or_else(|| SidecarError::InvalidRecordHeader(header.to_string()))?;
        if position == 0 {
            // Positions are 1-based in the file.
            return Err(SidecarError::InvalidRecordHeader(header.to_string()));
        }
        if length > self.remaining() {
            return Err(SidecarError::TruncatedContent {
                declared: length,
                available: self.remaining(),
            });
        }
        let content = &self.bytes[self.offset..self.offset + length];
        self.offset += length;
        let content = std::str::from_utf8(content)
            .map_err(|_| SidecarError::InvalidUtf8)?
            .to_string();
        match self.bytes.get(self.offset) {
            Some(b'\n') => self.offset += 1,
            _ => return Err(SidecarError::MissingSeparator),
        }
        Ok(Record {
            position: position - 1,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(mode: &str, body: &str) -> Vec<u8> {
        format!("{BANNER}\nfable.txt\n2026-08-29 10:30:00\n{mode}\n{body}").into_bytes()
    }

    #[test]
    fn test_parse_round_of_blocks() {
        let bytes = sample("OUT", "5,6\nquick \n21,9\ntwo\nlines\n");
        let file = parse(&bytes).unwrap();
        assert_eq!(file.doc_name, "fable.txt");
        assert_eq!(file.mode, KeepMode::Out);
        assert_eq!(
            file.records,
            vec![
                Record {
                    position: 4,
                    content: "quick ".to_string()
                },
                Record {
                    position: 20,
                    content: "two\nlines".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_header_only() {
        let file = parse(&sample("IN", "")).unwrap();
        assert_eq!(file.mode, KeepMode::In);
        assert!(file.records.is_empty());
    }

    #[test]
    fn test_parse_rejects_wrong_banner() {
        let bytes = b"made by hand\nfable.txt\n2026-08-29 10:30:00\nIN\n";
        assert!(matches!(parse(bytes), Err(SidecarError::InvalidBanner)));
    }

    #[test]
    fn test_parse_rejects_short_header() {
        let bytes = format!("{BANNER}\nfable.txt\n").into_bytes();
        assert!(matches!(parse(&bytes), Err(SidecarError::TruncatedHeader)));
    }

    #[test]
    fn test_parse_rejects_bad_mode() {
        let bytes = sample("SIDEWAYS", "");
        match parse(&bytes) {
            Err(SidecarError::InvalidMode(mode)) => assert_eq!(mode, "SIDEWAYS"),
            other => panic!("expected InvalidMode, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_overlong_length() {
        let bytes = sample("OUT", "5,600\nquick \n");
        match parse(&bytes) {
            Err(SidecarError::TruncatedContent {
                declared: 600,
                available,
            }) => assert!(available < 600),
            other => panic!("expected TruncatedContent, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let bytes = sample("OUT", "5,6\nquick X");
        assert!(matches!(parse(&bytes), Err(SidecarError::MissingSeparator)));
    }

    #[test]
    fn test_parse_rejects_garbled_record_header() {
        let bytes = sample("OUT", "five,6\nquick \n");
        assert!(matches!(
            parse(&bytes),
            Err(SidecarError::InvalidRecordHeader(_))
        ));
    }

    #[test]
    fn test_parse_rejects_zero_position() {
        let bytes = sample("OUT", "0,6\nquick \n");
        assert!(matches!(
            parse(&bytes),
            Err(SidecarError::InvalidRecordHeader(_))
        ));
    }

    #[test]
    fn test_content_length_is_bytes_not_lines() {
        // Declared length carries the reader across embedded newlines and
        // even across text that looks like a record header.
        let bytes = sample("OUT", "1,8\n3,4\nxyz\n\n");
        let file = parse(&bytes).unwrap();
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.records[0].content, "3,4\nxyz\n");
    }
}
