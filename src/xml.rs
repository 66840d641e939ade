//! # Streaming Export Tokenizer
//!
//! A forward-only pull tokenizer over the export's tag-delimited structure.
//! The export can be tens of gigabytes, so nothing here materializes a
//! document: the reader holds one token at a time and hands out events
//! borrowed from its internal buffers.
//!
//! The token language is deliberately the subset the export format uses:
//! start tags (attributes are ignored), end tags, self-closing tags (which
//! yield a `Start` followed by a synthesized `End`), character data with the
//! five predefined entities plus numeric references, and skippable
//! declarations, processing instructions, and comments.
//!
//! Any malformed construct is a fatal [`Error::Parse`] carrying the line and
//! byte offset where the token began; there is no recovery.

use std::io::BufRead;

use crate::error::{Error, Result};

/// A location in the input stream, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// 1-based line number.
    pub line: u64,
    /// Absolute byte offset from the start of the stream.
    pub offset: u64,
}

/// One parse event.
#[derive(Debug, PartialEq)]
pub enum Event<'a> {
    /// An element opened. Attributes, if any, are not reported.
    Start(&'a str),
    /// An element closed.
    End(&'a str),
    /// A run of character data, entity references already decoded.
    Text(&'a str),
    /// End of the stream.
    Eof,
}

enum TagKind {
    Start,
    End,
    Skip,
}

/// Pull tokenizer over a buffered byte stream.
pub struct Reader<R> {
    input: R,
    /// Raw bytes of the token being scanned.
    raw: Vec<u8>,
    /// Decoded character data of the last `Text` event.
    text: String,
    /// Name of the last `Start`/`End` event.
    name: String,
    /// A self-closing tag still owes an `End` for `name`.
    pending_end: bool,
    /// The last content scan stopped at a `<` that has not been read yet.
    at_tag: bool,
    line: u64,
    offset: u64,
}

impl<R: BufRead> Reader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            raw: Vec::new(),
            text: String::new(),
            name: String::new(),
            pending_end: false,
            at_tag: false,
            line: 1,
            offset: 0,
        }
    }

    /// Current position; call before [`Reader::next_event`] to get the
    /// position at which the next token starts.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            offset: self.offset,
        }
    }

    /// Advance to the next event.
    pub fn next_event(&mut self) -> Result<Event<'_>> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(Event::End(&self.name));
        }
        loop {
            if self.at_tag {
                self.at_tag = false;
                match self.read_tag()? {
                    TagKind::Start => return Ok(Event::Start(&self.name)),
                    TagKind::End => return Ok(Event::End(&self.name)),
                    TagKind::Skip => continue,
                }
            }

            self.raw.clear();
            let read = self.input.read_until(b'<', &mut self.raw)?;
            if read == 0 {
                return Ok(Event::Eof);
            }
            self.offset += read as u64;
            self.line += count_newlines(&self.raw);
            let reached_tag = self.raw.last() == Some(&b'<');
            if reached_tag {
                self.raw.pop();
                self.at_tag = true;
            }
            if !self.raw.is_empty() {
                self.decode_text()?;
                return Ok(Event::Text(&self.text));
            }
            if !reached_tag {
                return Ok(Event::Eof);
            }
        }
    }

    /// Scan one tag. `self.raw` receives the tag content without the
    /// surrounding angle brackets; `self.name` receives the element name
    /// for `Start`/`End` results.
    fn read_tag(&mut self) -> Result<TagKind> {
        let start = self.position();
        self.raw.clear();
        let read = self.input.read_until(b'>', &mut self.raw)?;
        if read == 0 || self.raw.last() != Some(&b'>') {
            return Err(parse_error_at(start, "unterminated tag"));
        }
        self.offset += read as u64;
        self.line += count_newlines(&self.raw);
        self.raw.pop();
        if self.raw.is_empty() {
            return Err(parse_error_at(start, "empty tag"));
        }

        match self.raw[0] {
            b'?' | b'!' => {
                if self.raw.starts_with(b"!--") {
                    self.skip_comment_tail(start)?;
                }
                Ok(TagKind::Skip)
            }
            b'/' => {
                let (from, to) = trimmed_range(&self.raw, 1);
                if from == to {
                    return Err(parse_error_at(start, "missing name in closing tag"));
                }
                self.take_name(from, to, start)?;
                Ok(TagKind::End)
            }
            _ => {
                let self_closing = self.raw.ends_with(b"/");
                let body_end = self.raw.len() - usize::from(self_closing);
                let name_end = self.raw[..body_end]
                    .iter()
                    .position(|b| b.is_ascii_whitespace())
                    .unwrap_or(body_end);
                if name_end == 0 {
                    return Err(parse_error_at(start, "missing element name"));
                }
                self.take_name(0, name_end, start)?;
                self.pending_end = self_closing;
                Ok(TagKind::Start)
            }
        }
    }

    /// A comment's text may contain `>`, so the first `read_until` can stop
    /// short; keep reading until the buffer ends with the comment's `--`.
    fn skip_comment_tail(&mut self, start: Position) -> Result<()> {
        while !(self.raw.len() >= 5 && self.raw.ends_with(b"--")) {
            self.raw.push(b'>');
            let read = self.input.read_until(b'>', &mut self.raw)?;
            if read == 0 || self.raw.last() != Some(&b'>') {
                return Err(parse_error_at(start, "unterminated comment"));
            }
            self.offset += read as u64;
            self.line += count_newlines(&self.raw[self.raw.len() - read..]);
            self.raw.pop();
        }
        Ok(())
    }

    fn take_name(&mut self, from: usize, to: usize, start: Position) -> Result<()> {
        let name = std::str::from_utf8(&self.raw[from..to])
            .map_err(|_| parse_error_at(start, "element name is not valid UTF-8"))?;
        self.name.clear();
        self.name.push_str(name);
        Ok(())
    }

    /// Decode `self.raw` (a character-data run) into `self.text`.
    fn decode_text(&mut self) -> Result<()> {
        let raw = std::mem::take(&mut self.raw);
        let run = match std::str::from_utf8(&raw) {
            Ok(run) => run,
            Err(_) => return Err(self.parse_error("character data is not valid UTF-8")),
        };
        self.text.clear();
        let mut rest = run;
        while let Some(amp) = rest.find('&') {
            self.text.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let semi = match after.find(';') {
                Some(semi) => semi,
                None => return Err(self.parse_error("unterminated entity reference")),
            };
            let entity = &after[..semi];
            let decoded = match entity {
                "lt" => '<',
                "gt" => '>',
                "amp" => '&',
                "quot" => '"',
                "apos" => '\'',
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else if let Some(dec) = entity.strip_prefix('#') {
                        dec.parse::<u32>().ok()
                    } else {
                        None
                    };
                    match code.and_then(char::from_u32) {
                        Some(decoded) => decoded,
                        None => {
                            return Err(self.parse_error(&format!(
                                "unknown entity reference '&{};'",
                                entity
                            )))
                        }
                    }
                }
            };
            self.text.push(decoded);
            rest = &after[semi + 1..];
        }
        self.text.push_str(rest);
        self.raw = raw;
        Ok(())
    }

    fn parse_error(&self, message: &str) -> Error {
        Error::Parse {
            message: message.to_string(),
            line: self.line,
            offset: self.offset,
        }
    }
}

fn parse_error_at(position: Position, message: &str) -> Error {
    Error::Parse {
        message: message.to_string(),
        line: position.line,
        offset: position.offset,
    }
}

fn count_newlines(bytes: &[u8]) -> u64 {
    bytes.iter().filter(|&&b| b == b'\n').count() as u64
}

/// Range of `raw[start..]` with ASCII whitespace trimmed from both ends.
fn trimmed_range(raw: &[u8], start: usize) -> (usize, usize) {
    let mut from = start;
    let mut to = raw.len();
    while from < to && raw[from].is_ascii_whitespace() {
        from += 1;
    }
    while to > from && raw[to - 1].is_ascii_whitespace() {
        to -= 1;
    }
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collect all events as owned strings for easy comparison.
    fn events(input: &str) -> Result<Vec<String>> {
        let mut reader = Reader::new(input.as_bytes());
        let mut out = Vec::new();
        loop {
            match reader.next_event()? {
                Event::Start(name) => out.push(format!("start:{}", name)),
                Event::End(name) => out.push(format!("end:{}", name)),
                Event::Text(text) => out.push(format!("text:{}", text)),
                Event::Eof => return Ok(out),
            }
        }
    }

    #[test]
    fn test_simple_document() {
        let got = events("<a><b>hi</b></a>").unwrap();
        assert_eq!(
            got,
            vec!["start:a", "start:b", "text:hi", "end:b", "end:a"]
        );
    }

    #[test]
    fn test_attributes_ignored() {
        let got = events(r#"<text xml:space="preserve">x</text>"#).unwrap();
        assert_eq!(got, vec!["start:text", "text:x", "end:text"]);
    }

    #[test]
    fn test_self_closing_tag() {
        let got = events("<r><minor/></r>").unwrap();
        assert_eq!(got, vec!["start:r", "start:minor", "end:minor", "end:r"]);

        let got = events("<r><minor /></r>").unwrap();
        assert_eq!(got, vec!["start:r", "start:minor", "end:minor", "end:r"]);
    }

    #[test]
    fn test_declaration_and_comment_skipped() {
        let got = events("<?xml version=\"1.0\"?><!-- note --><a>x</a>").unwrap();
        assert_eq!(got, vec!["start:a", "text:x", "end:a"]);
    }

    #[test]
    fn test_comment_containing_gt() {
        let got = events("<!-- a > b --><a/>").unwrap();
        assert_eq!(got, vec!["start:a", "end:a"]);
    }

    #[test]
    fn test_entities_decoded() {
        let got = events("<a>&lt;x&gt; &amp; &quot;y&quot; &apos;z&apos;</a>").unwrap();
        assert_eq!(got, vec!["start:a", "text:<x> & \"y\" 'z'", "end:a"]);
    }

    #[test]
    fn test_numeric_entities() {
        let got = events("<a>&#65;&#x42;</a>").unwrap();
        assert_eq!(got, vec!["start:a", "text:AB", "end:a"]);
    }

    #[test]
    fn test_unknown_entity_is_fatal() {
        let err = events("<a>&bogus;</a>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("&bogus;"));
    }

    #[test]
    fn test_unterminated_entity_is_fatal() {
        let err = events("<a>x &amp y</a>").unwrap_err();
        assert!(err.to_string().contains("unterminated entity"));
    }

    #[test]
    fn test_unterminated_tag_is_fatal() {
        let err = events("<a><b").unwrap_err();
        assert!(err.to_string().contains("unterminated tag"));
    }

    #[test]
    fn test_text_split_around_children() {
        let got = events("<a>x<b/>y</a>").unwrap();
        assert_eq!(
            got,
            vec!["start:a", "text:x", "start:b", "end:b", "text:y", "end:a"]
        );
    }

    #[test]
    fn test_position_tracks_lines() {
        let input = "<a>\n<b>\nhi</b>\n</a>";
        let mut reader = Reader::new(input.as_bytes());
        // <a>
        reader.next_event().unwrap();
        assert_eq!(reader.position().line, 1);
        // text "\n"
        reader.next_event().unwrap();
        assert_eq!(reader.position().line, 2);
    }

    #[test]
    fn test_eof_after_whitespace() {
        let got = events("<a/>\n").unwrap();
        assert_eq!(got, vec!["start:a", "end:a", "text:\n"]);
    }
}
