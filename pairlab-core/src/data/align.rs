//! Two-instrument time alignment.
//!
//! Walks two single-instrument series in timestamp order. Rows present on
//! both sides become a `PairBar`; a row present on only one side is a gap,
//! reported and dropped. Gaps are never filled.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Leg, PairBar, PerLeg, Quote};

use super::{parse_number, parse_timestamp, DataError, TIMESTAMP_FORMAT};

/// One row of a single-instrument bar file.
#[derive(Debug, Clone, PartialEq)]
pub struct LegBar {
    pub timestamp: NaiveDateTime,
    pub quote: Quote,
}

/// A timestamp that only one leg has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub timestamp: NaiveDateTime,
    /// The leg with no bar at `timestamp`.
    pub missing: Leg,
}

#[derive(Debug, Clone, Default)]
pub struct Alignment {
    pub bars: Vec<PairBar>,
    pub gaps: Vec<Gap>,
}

/// Merge two series sorted by timestamp into one aligned series.
pub fn align_pair(a: &[LegBar], b: &[LegBar]) -> Alignment {
    let mut out = Alignment::default();
    let (mut ia, mut ib) = (0, 0);

    while ia < a.len() && ib < b.len() {
        let (ta, tb) = (a[ia].timestamp, b[ib].timestamp);
        if ta < tb {
            out.gaps.push(Gap {
                timestamp: ta,
                missing: Leg::B,
            });
            ia += 1;
        } else if tb < ta {
            out.gaps.push(Gap {
                timestamp: tb,
                missing: Leg::A,
            });
            ib += 1;
        } else {
            out.bars.push(PairBar::new(ta, a[ia].quote, b[ib].quote));
            ia += 1;
            ib += 1;
        }
    }

    for gap in &out.gaps {
        warn!(timestamp = %gap.timestamp, missing = %gap.missing, "bar missing from one leg");
    }

    out
}

/// Read a single-instrument file with `timestamp,open,high,low,close`
/// columns. Other columns are ignored.
pub fn read_leg_csv(path: &Path) -> Result<Vec<LegBar>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_leg(file)
}

pub fn read_leg<R: Read>(reader: R) -> Result<Vec<LegBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    };
    let (ts, open, high, low, close) = (
        col("timestamp")?,
        col("open")?,
        col("high")?,
        col("low")?,
        col("close")?,
    );

    let mut bars = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        let get = |i: usize| record.get(i).unwrap_or("");
        let num = |i: usize, name: &str| parse_number(row, name, get(i));

        bars.push(LegBar {
            timestamp: parse_timestamp(row, get(ts))?,
            quote: Quote::new(
                num(open, "open")?,
                num(high, "high")?,
                num(low, "low")?,
                num(close, "close")?,
            ),
        });
    }
    Ok(bars)
}

/// Write an aligned series in the feed format read by [`super::read_aligned`].
pub fn write_aligned_csv(
    path: &Path,
    bars: &[PairBar],
    instruments: &PerLeg<String>,
) -> Result<(), DataError> {
    let file = File::create(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_aligned(file, bars, instruments)
}

pub fn write_aligned<W: Write>(
    writer: W,
    bars: &[PairBar],
    instruments: &PerLeg<String>,
) -> Result<(), DataError> {
    const FIELDS: [&str; 5] = ["open", "close", "high", "low", "mid"];

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["timestamp".to_string()];
    for leg in Leg::BOTH {
        header.extend(FIELDS.iter().map(|f| format!("{}_{f}", instruments[leg])));
    }
    wtr.write_record(&header)?;

    for bar in bars {
        let mut row = vec![bar.timestamp.format(TIMESTAMP_FORMAT).to_string()];
        for leg in Leg::BOTH {
            let q = &bar.quotes[leg];
            row.extend(
                [q.open, q.close, q.high, q.low, q.mid()]
                    .iter()
                    .map(|p| p.to_string()),
            );
        }
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::read_aligned;
    use crate::domain::PriceBasis;
    use chrono::NaiveDate;

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(14, minute, 0)
            .unwrap()
    }

    fn leg(minutes: &[u32], price: f64) -> Vec<LegBar> {
        minutes
            .iter()
            .map(|&m| LegBar {
                timestamp: ts(m),
                quote: Quote::new(price, price + 1.0, price - 1.0, price),
            })
            .collect()
    }

    #[test]
    fn matching_timestamps_pair_up() {
        let out = align_pair(&leg(&[30, 31, 32], 260.0), &leg(&[30, 31, 32], 410.0));
        assert_eq!(out.bars.len(), 3);
        assert!(out.gaps.is_empty());
        assert_eq!(out.bars[2].timestamp, ts(32));
        assert_eq!(out.bars[0].quotes.b.close, 410.0);
    }

    #[test]
    fn gaps_reported_on_both_sides() {
        let out = align_pair(&leg(&[30, 31, 33], 260.0), &leg(&[30, 32, 33], 410.0));
        let stamps: Vec<_> = out.bars.iter().map(|b| b.timestamp).collect();
        assert_eq!(stamps, vec![ts(30), ts(33)]);
        assert_eq!(
            out.gaps,
            vec![
                Gap {
                    timestamp: ts(31),
                    missing: Leg::B
                },
                Gap {
                    timestamp: ts(32),
                    missing: Leg::A
                },
            ]
        );
    }

    #[test]
    fn trailing_rows_of_longer_side_dropped() {
        let out = align_pair(&leg(&[30, 31, 32, 33], 260.0), &leg(&[30, 31], 410.0));
        assert_eq!(out.bars.len(), 2);
    }

    #[test]
    fn reads_leg_file_ignoring_extra_columns() {
        let csv = "\
open,high,low,close,volume,vwap,timestamp,transactions,otc
260.1,261.0,259.5,260.8,12000,260.4,2024-01-02 14:30:00,95,
260.8,261.2,260.0,261.0,9000,260.7,2024-01-02 14:31:00,80,
";
        let bars = read_leg(csv.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].quote.open, 260.1);
        assert_eq!(bars[1].timestamp, ts(31));
    }

    #[test]
    fn written_feed_reads_back() {
        let aligned = align_pair(&leg(&[30, 31], 260.0), &leg(&[30, 31], 410.0));
        let instruments = PerLeg::new("visa".to_string(), "mastercard".to_string());

        let mut buf = Vec::new();
        write_aligned(&mut buf, &aligned.bars, &instruments).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("timestamp,visa_open,visa_close,visa_high,visa_low,visa_mid"));

        let bars = read_aligned(buf.as_slice(), &instruments).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].price(Leg::B, PriceBasis::Mid), 410.0);
    }
}
