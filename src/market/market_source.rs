use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::market::market_snapshot::MarketSnapshot;

/// Pull-based feed of market snapshots, one per tick.
pub trait SnapshotSource {
    /// `Ok(None)` once the feed is exhausted.
    fn next_snapshot(&mut self) -> Result<Option<MarketSnapshot>>;
}

/// Snapshots recorded as one JSON object per line. Blank lines are skipped.
pub struct JsonLinesSource<R> {
    lines: io::Lines<R>,
    line_number: usize,
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open snapshot file {}", path.display()))?;

        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> SnapshotSource for JsonLinesSource<R> {
    fn next_snapshot(&mut self) -> Result<Option<MarketSnapshot>> {
        for line in self.lines.by_ref() {
            self.line_number += 1;

            let line = line.with_context(|| format!("failed to read line {}", self.line_number))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let snapshot = serde_json::from_str(line)
                .with_context(|| format!("invalid snapshot on line {}", self.line_number))?;
            return Ok(Some(snapshot));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::Price;

    const FEED: &str = concat!(
        r#"{"timestamp":0,"order_depth":{"SUDOWOODO":"#,
        r#"{"buy_orders":{"9998":5},"sell_orders":{"10002":-5}}},"#,
        r#""positions":{"SUDOWOODO":3}}"#,
        "\n\n",
        r#"{"timestamp":100,"order_depth":{}}"#,
        "\n",
    );

    #[test]
    fn reads_snapshots_and_skips_blank_lines() {
        let mut source = JsonLinesSource::new(FEED.as_bytes());

        let first = source.next_snapshot().unwrap().unwrap();
        assert_eq!(first.timestamp, 0);
        assert_eq!(
            first.book("SUDOWOODO").and_then(|book| book.best_ask()),
            Some(Price::new(10002))
        );
        assert_eq!(first.position("SUDOWOODO").net(), 3);

        let second = source.next_snapshot().unwrap().unwrap();
        assert_eq!(second.timestamp, 100);
        assert!(second.is_empty());

        assert!(source.next_snapshot().unwrap().is_none());
    }

    #[test]
    fn malformed_line_names_its_position() {
        let mut source = JsonLinesSource::new("\n{not json}\n".as_bytes());

        let error = source.next_snapshot().unwrap_err();
        assert!(format!("{error:#}").contains("line 2"));
    }
}
