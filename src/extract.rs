//! # Revision Extraction
//!
//! The extraction state machine that turns the tokenizer's flat event
//! stream back into revision records, one at a time.
//!
//! The export nests elements as `mediawiki > page > revision >
//! contributor`, and the same tag name means different things at different
//! depths: an `<id>` directly under a page is the page id, under a revision
//! the revision id, under a contributor the contributor id. Instead of
//! building a document tree, the extractor keeps a stack of element kinds
//! and dispatches on **(kind, stack depth)** when an element closes — the
//! handful of recognized names map to an [`Element`] value, everything else
//! is pushed as [`Element::Unknown`] and matches no rule.
//!
//! The extractor owns all in-progress state (the record under
//! construction, the current page context, the run counters), so it can be
//! driven from any event source in tests.

use crate::blacklist::Blacklist;
use crate::error::{Error, Result};
use crate::record::{PageContext, RevisionRecord, Stats};
use crate::xml::{Event, Position};

/// Element kinds the extraction rules care about.
///
/// `page`, `mediawiki`, `contributor` and friends deliberately map to
/// `Unknown`: their presence affects depth, which is all the dispatch
/// needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Comment,
    Id,
    Ip,
    Minor,
    Revision,
    Text,
    Timestamp,
    Title,
    Username,
    Unknown,
}

impl Element {
    fn from_name(name: &str) -> Element {
        match name {
            "comment" => Element::Comment,
            "id" => Element::Id,
            "ip" => Element::Ip,
            "minor" => Element::Minor,
            "revision" => Element::Revision,
            "text" => Element::Text,
            "timestamp" => Element::Timestamp,
            "title" => Element::Title,
            "username" => Element::Username,
            _ => Element::Unknown,
        }
    }
}

// Stack depths at which the recognized elements carry meaning. The depth
// includes the element itself: mediawiki=1, page=2, page children=3,
// revision children=4, contributor children=5.
const DEPTH_PAGE_CHILD: usize = 3;
const DEPTH_REVISION_CHILD: usize = 4;
const DEPTH_CONTRIBUTOR_CHILD: usize = 5;

/// What a handled event produced.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Nothing of interest; keep feeding events.
    Nothing,
    /// A page's title just closed; the new page context is active.
    NewPage,
    /// A revision closed on a non-blacklisted page.
    Completed(RevisionRecord),
}

/// Streaming extraction state machine.
pub struct Extractor<'a> {
    blacklist: &'a Blacklist,
    stack: Vec<Element>,
    scratch: String,
    record: RevisionRecord,
    page: PageContext,
    stats: Stats,
}

impl<'a> Extractor<'a> {
    pub fn new(blacklist: &'a Blacklist) -> Self {
        Self {
            blacklist,
            stack: Vec::new(),
            scratch: String::new(),
            record: RevisionRecord::default(),
            page: PageContext::default(),
            stats: Stats::default(),
        }
    }

    /// Run counters so far.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Title of the page currently being processed.
    pub fn page_title(&self) -> &str {
        &self.page.title
    }

    /// Whether the current page is blacklisted.
    pub fn page_skipped(&self) -> bool {
        self.page.skip
    }

    /// Current element nesting depth; non-zero at end of input means the
    /// stream was truncated.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Feed one event. `position` is the position at which the event's
    /// token started, used for diagnostics on structural errors.
    pub fn handle(&mut self, event: Event<'_>, position: Position) -> Result<Outcome> {
        match event {
            Event::Start(name) => {
                self.scratch.clear();
                let element = Element::from_name(name);
                self.stack.push(element);
                if element == Element::Revision && self.stack.len() == DEPTH_PAGE_CHILD {
                    // A fresh revision; drop anything left from the last one.
                    self.record = RevisionRecord::default();
                }
                Ok(Outcome::Nothing)
            }
            Event::Text(text) => {
                self.scratch.push_str(text);
                Ok(Outcome::Nothing)
            }
            Event::End(name) => self.handle_end(name, position),
            Event::Eof => Ok(Outcome::Nothing),
        }
    }

    fn handle_end(&mut self, name: &str, position: Position) -> Result<Outcome> {
        let element = match self.stack.last() {
            Some(element) => *element,
            None => {
                return Err(structural_error(
                    position,
                    format!("closing tag '</{}>' with no open element", name),
                ))
            }
        };
        if element != Element::from_name(name) {
            return Err(structural_error(
                position,
                format!("mismatched closing tag '</{}>'", name),
            ));
        }
        let depth = self.stack.len();
        self.stack.pop();

        let outcome = match (element, depth) {
            (Element::Comment, DEPTH_REVISION_CHILD) => {
                self.record.comment = std::mem::take(&mut self.scratch);
                Outcome::Nothing
            }
            (Element::Id, DEPTH_PAGE_CHILD) => {
                self.page.page_id = std::mem::take(&mut self.scratch);
                Outcome::Nothing
            }
            (Element::Id, DEPTH_REVISION_CHILD) => {
                self.record.revision_id = std::mem::take(&mut self.scratch);
                Outcome::Nothing
            }
            (Element::Id, DEPTH_CONTRIBUTOR_CHILD) => {
                self.record.contributor_id = std::mem::take(&mut self.scratch);
                Outcome::Nothing
            }
            // The export also emits <ip> nested one level deeper for some
            // historical dumps; both shapes carry the anonymous author.
            (Element::Ip, DEPTH_CONTRIBUTOR_CHILD) | (Element::Ip, 6) => {
                self.record.ip = std::mem::take(&mut self.scratch);
                Outcome::Nothing
            }
            (Element::Minor, DEPTH_REVISION_CHILD) => {
                self.record.is_minor = true;
                Outcome::Nothing
            }
            (Element::Text, DEPTH_REVISION_CHILD) => {
                self.record.text = std::mem::take(&mut self.scratch);
                Outcome::Nothing
            }
            (Element::Timestamp, DEPTH_REVISION_CHILD) => {
                self.record.timestamp = std::mem::take(&mut self.scratch);
                Outcome::Nothing
            }
            (Element::Username, DEPTH_CONTRIBUTOR_CHILD) => {
                self.record.username = std::mem::take(&mut self.scratch);
                Outcome::Nothing
            }
            (Element::Title, DEPTH_PAGE_CHILD) => self.close_title(),
            (Element::Revision, DEPTH_PAGE_CHILD) => self.close_revision(),
            _ => Outcome::Nothing,
        };
        self.scratch.clear();
        Ok(outcome)
    }

    /// A page's title closed: split the namespace prefix, consult the
    /// blacklist, and reset the page context.
    fn close_title(&mut self) -> Outcome {
        self.stats.pages_seen += 1;
        let full = std::mem::take(&mut self.scratch);
        self.page.skip = false;
        match full.find(':') {
            Some(colon) => {
                self.page.namespace = full[..colon].to_string();
                self.page.title = full[colon + 1..].to_string();
                if self.blacklist.contains(&self.page.namespace) {
                    self.page.skip = true;
                    self.stats.ignored_pages += 1;
                }
            }
            None => {
                self.page.namespace.clear();
                self.page.title = full;
            }
        }
        Outcome::NewPage
    }

    /// A revision closed directly under its page: either complete the
    /// record or discard it if the page is blacklisted.
    fn close_revision(&mut self) -> Outcome {
        if self.page.skip {
            self.stats.ignored_revisions += 1;
            return Outcome::Nothing;
        }
        self.stats.revisions_read += 1;
        let mut record = std::mem::take(&mut self.record);
        record.page_id = self.page.page_id.clone();
        record.title = self.page.title.clone();
        record.title_namespace = self.page.namespace.clone();
        Outcome::Completed(record)
    }
}

fn structural_error(position: Position, message: String) -> Error {
    Error::Parse {
        message,
        line: position.line,
        offset: position.offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Reader;

    fn drive(xml: &str, blacklist: &Blacklist) -> Result<(Vec<RevisionRecord>, Stats)> {
        let mut reader = Reader::new(xml.as_bytes());
        let mut extractor = Extractor::new(blacklist);
        let mut records = Vec::new();
        loop {
            let position = reader.position();
            let event = reader.next_event()?;
            if event == Event::Eof {
                break;
            }
            if let Outcome::Completed(record) = extractor.handle(event, position)? {
                records.push(record);
            }
        }
        let stats = extractor.stats();
        Ok((records, stats))
    }

    const SINGLE_PAGE: &str = r#"<mediawiki>
  <page>
    <title>Example</title>
    <ns>0</ns>
    <id>5</id>
    <revision>
      <id>10</id>
      <timestamp>2009-12-01T12:09:31Z</timestamp>
      <contributor>
        <username>Alice</username>
        <id>7</id>
      </contributor>
      <minor/>
      <comment>tweak</comment>
      <text xml:space="preserve">hello world</text>
    </revision>
  </page>
</mediawiki>"#;

    #[test]
    fn test_extracts_all_fields() {
        let blacklist = Blacklist::empty();
        let (records, stats) = drive(SINGLE_PAGE, &blacklist).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.page_id, "5");
        assert_eq!(record.revision_id, "10");
        assert_eq!(record.contributor_id, "7");
        assert_eq!(record.title, "Example");
        assert_eq!(record.title_namespace, "");
        assert_eq!(record.username, "Alice");
        assert_eq!(record.ip, "");
        assert_eq!(record.timestamp, "2009-12-01T12:09:31Z");
        assert_eq!(record.comment, "tweak");
        assert_eq!(record.text, "hello world");
        assert!(record.is_minor);
        assert_eq!(stats.pages_seen, 1);
        assert_eq!(stats.revisions_read, 1);
    }

    #[test]
    fn test_anonymous_contributor() {
        let xml = r#"<mediawiki><page>
            <title>T</title><id>1</id>
            <revision>
              <id>2</id>
              <timestamp>2009-12-01T12:09:31Z</timestamp>
              <contributor><ip>192.0.2.1</ip></contributor>
              <text>x</text>
            </revision>
        </page></mediawiki>"#;
        let blacklist = Blacklist::empty();
        let (records, _) = drive(xml, &blacklist).unwrap();
        assert_eq!(records[0].ip, "192.0.2.1");
        assert_eq!(records[0].username, "");
        assert!(records[0].is_anonymous());
    }

    #[test]
    fn test_namespace_split() {
        let xml = r#"<mediawiki><page>
            <title>Talk:Foo</title><id>1</id>
            <revision><id>2</id><timestamp>2009-12-01T12:09:31Z</timestamp><text>x</text></revision>
        </page></mediawiki>"#;
        let blacklist = Blacklist::empty();
        let (records, _) = drive(xml, &blacklist).unwrap();
        assert_eq!(records[0].title_namespace, "Talk");
        assert_eq!(records[0].title, "Foo");
    }

    #[test]
    fn test_blacklisted_page_discards_revisions() {
        let xml = r#"<mediawiki>
          <page>
            <title>Talk:Foo</title><id>1</id>
            <revision><id>2</id><timestamp>2009-12-01T12:09:31Z</timestamp><text>x</text></revision>
            <revision><id>3</id><timestamp>2009-12-01T12:09:32Z</timestamp><text>y</text></revision>
          </page>
          <page>
            <title>Bar</title><id>4</id>
            <revision><id>5</id><timestamp>2009-12-01T12:09:33Z</timestamp><text>z</text></revision>
          </page>
        </mediawiki>"#;
        let mut blacklist = Blacklist::empty();
        blacklist.insert("Talk");
        let (records, stats) = drive(xml, &blacklist).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Bar");
        assert_eq!(stats.ignored_pages, 1);
        assert_eq!(stats.ignored_revisions, 2);
        assert_eq!(stats.revisions_read, 1);
        assert_eq!(stats.pages_seen, 2);
    }

    #[test]
    fn test_record_reset_between_revisions() {
        let xml = r#"<mediawiki><page>
            <title>T</title><id>1</id>
            <revision>
              <id>2</id><timestamp>2009-12-01T12:09:31Z</timestamp>
              <minor/><comment>first</comment><text>a</text>
            </revision>
            <revision>
              <id>3</id><timestamp>2009-12-01T12:09:32Z</timestamp>
              <text>b</text>
            </revision>
        </page></mediawiki>"#;
        let blacklist = Blacklist::empty();
        let (records, _) = drive(xml, &blacklist).unwrap();
        assert_eq!(records.len(), 2);
        // Nothing leaks from the first revision into the second.
        assert!(!records[1].is_minor);
        assert_eq!(records[1].comment, "");
        assert_eq!(records[1].text, "b");
    }

    #[test]
    fn test_page_id_precedes_revisions() {
        // The id directly under <page> must not be confused with the
        // revision or contributor ids.
        let xml = r#"<mediawiki><page>
            <title>T</title><id>99</id>
            <revision>
              <id>100</id><timestamp>2009-12-01T12:09:31Z</timestamp>
              <contributor><id>101</id></contributor>
              <text>x</text>
            </revision>
        </page></mediawiki>"#;
        let blacklist = Blacklist::empty();
        let (records, _) = drive(xml, &blacklist).unwrap();
        assert_eq!(records[0].page_id, "99");
        assert_eq!(records[0].revision_id, "100");
        assert_eq!(records[0].contributor_id, "101");
    }

    #[test]
    fn test_mismatched_closing_tag_is_fatal() {
        let xml = "<mediawiki><page><title>T</revision>";
        let blacklist = Blacklist::empty();
        let err = drive(xml, &blacklist).unwrap_err();
        assert!(err.to_string().contains("mismatched closing tag"));
    }

    #[test]
    fn test_stray_closing_tag_is_fatal() {
        let xml = "</page>";
        let blacklist = Blacklist::empty();
        let err = drive(xml, &blacklist).unwrap_err();
        assert!(err.to_string().contains("no open element"));
    }
}
