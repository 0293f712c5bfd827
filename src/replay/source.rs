//! Historical event sources for the replay driver.
//!
//! A source yields a total order of timestamped [`MarketEvent`]s. The book
//! never sees a source; the driver pulls from one and pushes into the book.
//!
//! # Implementing Custom Sources
//!
//! ```
//! use replay_book::replay::HistoricalDataSource;
//! use replay_book::error::SourceError;
//! use replay_book::types::MarketEvent;
//!
//! struct Empty;
//!
//! impl HistoricalDataSource for Empty {
//!     fn next_event(&mut self) -> Option<Result<MarketEvent, SourceError>> {
//!         None
//!     }
//!
//!     fn cursor(&self) -> u64 {
//!         0
//!     }
//!
//!     fn seek(&mut self, cursor: u64) -> Result<(), SourceError> {
//!         if cursor == 0 { Ok(()) } else { Err(SourceError::SeekUnsupported { cursor }) }
//!     }
//! }
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::error::SourceError;
use crate::types::{price, Action, MarketEvent, Side};

// ============================================================================
// Source Trait
// ============================================================================

/// A replayable feed of market events.
///
/// `cursor` counts records consumed so far, including records that failed
/// to decode, so a driver that skips bad records still makes progress.
pub trait HistoricalDataSource {
    /// Next record, `None` at end of data
    fn next_event(&mut self) -> Option<Result<MarketEvent, SourceError>>;

    /// Records consumed so far
    fn cursor(&self) -> u64;

    /// Reposition so the next record returned is the one at `cursor`
    fn seek(&mut self, cursor: u64) -> Result<(), SourceError>;

    /// Estimated total record count, for progress reporting
    fn len_hint(&self) -> Option<u64> {
        None
    }
}

impl<S: HistoricalDataSource + ?Sized> HistoricalDataSource for Box<S> {
    fn next_event(&mut self) -> Option<Result<MarketEvent, SourceError>> {
        (**self).next_event()
    }

    fn cursor(&self) -> u64 {
        (**self).cursor()
    }

    fn seek(&mut self, cursor: u64) -> Result<(), SourceError> {
        (**self).seek(cursor)
    }

    fn len_hint(&self) -> Option<u64> {
        (**self).len_hint()
    }
}

// ============================================================================
// In-Memory Source
// ============================================================================

/// In-memory source with full seek support.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    events: Vec<MarketEvent>,
    position: usize,
}

impl VecSource {
    pub fn new(events: Vec<MarketEvent>) -> Self {
        Self {
            events,
            position: 0,
        }
    }

    /// Events not yet yielded
    pub fn remaining(&self) -> usize {
        self.events.len() - self.position
    }

    pub fn events(&self) -> &[MarketEvent] {
        &self.events
    }
}

impl FromIterator<MarketEvent> for VecSource {
    fn from_iter<I: IntoIterator<Item = MarketEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl HistoricalDataSource for VecSource {
    fn next_event(&mut self) -> Option<Result<MarketEvent, SourceError>> {
        let event = self.events.get(self.position)?.clone();
        self.position += 1;
        Some(Ok(event))
    }

    fn cursor(&self) -> u64 {
        self.position as u64
    }

    fn seek(&mut self, cursor: u64) -> Result<(), SourceError> {
        let position = usize::try_from(cursor)
            .ok()
            .filter(|&p| p <= self.events.len())
            .ok_or(SourceError::SeekUnsupported { cursor })?;
        self.position = position;
        Ok(())
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.events.len() as u64)
    }
}

// ============================================================================
// JSON Lines Source
// ============================================================================

/// Price as it appears on the wire: decimal text or a JSON number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Text(String),
    Number(f64),
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    action: Action,
    #[serde(alias = "id")]
    order_id: u64,
    side: Side,
    price: RawPrice,
    #[serde(alias = "qty", alias = "quantity")]
    size: u64,
    #[serde(default, alias = "ts")]
    timestamp: u64,
}

/// Newline-delimited JSON feed.
///
/// One record per line:
///
/// ```text
/// {"action":"add","order_id":1,"side":"bid","price":"100.25","size":10,"timestamp":1}
/// {"action":"T","id":1,"side":"b","price":100.25,"qty":4,"ts":2}
/// ```
///
/// Blank lines and lines starting with `#` are ignored. Prices are
/// converted to fixed-point ticks here. Seeking is forward-only.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    reader: R,
    buf: Vec<u8>,
    line: u64,
    cursor: u64,
    len_hint: Option<u64>,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            cursor: 0,
            len_hint: None,
        }
    }

    /// Set the expected record count, for progress reporting.
    pub fn with_len_hint(mut self, records: u64) -> Self {
        self.len_hint = Some(records);
        self
    }

    /// Lines read so far, including blanks and comments
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a `.jsonl` file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> HistoricalDataSource for JsonLinesSource<R> {
    fn next_event(&mut self) -> Option<Result<MarketEvent, SourceError>> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(err.into())),
            }
            self.line += 1;

            // Undecodable bytes are a bad record, not a broken stream
            let text = match std::str::from_utf8(&self.buf) {
                Ok(text) => text.trim(),
                Err(err) => {
                    self.cursor += 1;
                    return Some(Err(SourceError::Parse {
                        line: self.line,
                        msg: format!("invalid utf-8: {}", err),
                    }));
                }
            };
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            self.cursor += 1;
            return Some(parse_record(self.line, text));
        }
    }

    fn cursor(&self) -> u64 {
        self.cursor
    }

    fn seek(&mut self, cursor: u64) -> Result<(), SourceError> {
        if cursor < self.cursor {
            return Err(SourceError::SeekUnsupported { cursor });
        }
        while self.cursor < cursor {
            match self.next_event() {
                None => return Err(SourceError::SeekUnsupported { cursor }),
                Some(Err(SourceError::Io(err))) => return Err(SourceError::Io(err)),
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn len_hint(&self) -> Option<u64> {
        self.len_hint
    }
}

fn parse_record(line: u64, text: &str) -> Result<MarketEvent, SourceError> {
    let raw: RawEvent = serde_json::from_str(text).map_err(|err| SourceError::Parse {
        line,
        msg: err.to_string(),
    })?;

    let ticks = match &raw.price {
        RawPrice::Text(s) => price::to_fixed(s),
        RawPrice::Number(n) => price::from_f64(*n),
    };
    let ticks = ticks.ok_or_else(|| SourceError::InvalidPrice {
        line,
        value: match raw.price {
            RawPrice::Text(s) => s,
            RawPrice::Number(n) => n.to_string(),
        },
    })?;

    Ok(MarketEvent::new(
        raw.action,
        raw.order_id,
        raw.side,
        ticks,
        raw.size,
        raw.timestamp,
    ))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn jsonl(text: &str) -> JsonLinesSource<Cursor<Vec<u8>>> {
        JsonLinesSource::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn test_jsonl_invalid_utf8_line_is_a_parse_error() {
        let mut bytes = b"{\"action\":\"add\",\"order_id\":1,\"side\":\"bid\",\"price\":1,\"size\":1}\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe garbage\n");
        bytes.extend_from_slice(b"{\"action\":\"add\",\"order_id\":2,\"side\":\"bid\",\"price\":1,\"size\":1}\n");
        let mut source = JsonLinesSource::new(Cursor::new(bytes));

        assert_eq!(source.next_event().unwrap().unwrap().order_id, 1);
        match source.next_event() {
            Some(Err(SourceError::Parse { line, msg })) => {
                assert_eq!(line, 2);
                assert!(msg.contains("utf-8"), "{}", msg);
            }
            other => panic!("unexpected record {:?}", other),
        }
        assert_eq!(source.next_event().unwrap().unwrap().order_id, 2);
        assert!(source.next_event().is_none());
        assert_eq!(source.line(), 3);
        assert_eq!(source.cursor(), 3);
    }

    #[test]
    fn test_vec_source_iterates_and_seeks() {
        let mut source: VecSource = (0..3)
            .map(|i| MarketEvent::add(i, Side::Bid, 100, 1, i))
            .collect();
        assert_eq!(source.len_hint(), Some(3));

        let first = source.next_event().unwrap().unwrap();
        assert_eq!(first.order_id, 0);
        assert_eq!(source.cursor(), 1);
        assert_eq!(source.remaining(), 2);

        source.seek(0).unwrap();
        assert_eq!(source.next_event().unwrap().unwrap().order_id, 0);

        source.seek(3).unwrap();
        assert!(source.next_event().is_none());

        assert!(matches!(
            source.seek(4),
            Err(SourceError::SeekUnsupported { cursor: 4 })
        ));
    }

    #[test]
    fn test_jsonl_parses_text_and_number_prices() {
        let mut source = jsonl(
            "{\"action\":\"add\",\"order_id\":1,\"side\":\"bid\",\"price\":\"100.25\",\"size\":10,\"timestamp\":5}\n\
             \n\
             # comment\n\
             {\"action\":\"T\",\"id\":1,\"side\":\"b\",\"price\":100.25,\"qty\":4,\"ts\":6}\n",
        );

        let add = source.next_event().unwrap().unwrap();
        assert_eq!(add, MarketEvent::add(1, Side::Bid, 10_025_000_000, 10, 5));

        let trade = source.next_event().unwrap().unwrap();
        assert_eq!(trade, MarketEvent::trade(1, Side::Bid, 10_025_000_000, 4, 6));

        assert!(source.next_event().is_none());
        assert_eq!(source.cursor(), 2);
        assert_eq!(source.line(), 4);
    }

    #[test]
    fn test_jsonl_reports_bad_records_and_continues() {
        let mut source = jsonl(
            "{\"action\":\"add\",\"order_id\":1}\n\
             {\"action\":\"add\",\"order_id\":2,\"side\":\"ask\",\"price\":\"-1\",\"size\":1}\n\
             {\"action\":\"cancel\",\"order_id\":3,\"side\":\"ask\",\"price\":\"1\",\"size\":1}\n",
        );

        assert!(matches!(
            source.next_event(),
            Some(Err(SourceError::Parse { line: 1, .. }))
        ));
        match source.next_event() {
            Some(Err(SourceError::InvalidPrice { line, value })) => {
                assert_eq!(line, 2);
                assert_eq!(value, "-1");
            }
            other => panic!("unexpected record {:?}", other),
        }
        let remove = source.next_event().unwrap().unwrap();
        assert_eq!(remove.action, Action::Remove);
        assert_eq!(source.cursor(), 3);
    }

    #[test]
    fn test_jsonl_seek_is_forward_only() {
        let mut source = jsonl(
            "{\"action\":\"add\",\"order_id\":1,\"side\":\"bid\",\"price\":1,\"size\":1}\n\
             {\"action\":\"add\",\"order_id\":2,\"side\":\"bid\",\"price\":1,\"size\":1}\n",
        )
        .with_len_hint(2);
        assert_eq!(source.len_hint(), Some(2));

        source.seek(1).unwrap();
        assert_eq!(source.next_event().unwrap().unwrap().order_id, 2);

        assert!(matches!(
            source.seek(0),
            Err(SourceError::SeekUnsupported { cursor: 0 })
        ));
        assert!(matches!(
            source.seek(5),
            Err(SourceError::SeekUnsupported { cursor: 5 })
        ));
    }
}
