//! Aligned pair feed reader.
//!
//! Columns: `timestamp`, then `{prefix}_{field}` per instrument. Each leg
//! needs `open` and `close`, plus either `high` and `low` or a precomputed
//! `mid`. When only `mid` is present the quote's high and low are set to it,
//! so the derived mid is unchanged.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Leg, PairBar, PerLeg, Quote};

use super::{parse_number, parse_timestamp, DataError};

/// Read an aligned feed file.
pub fn read_aligned_csv(
    path: &Path,
    instruments: &PerLeg<String>,
) -> Result<Vec<PairBar>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_aligned(file, instruments)
}

/// Read an aligned feed from any reader.
///
/// Fails on missing columns, unparseable fields, non-positive prices, and
/// timestamps that are not strictly increasing.
pub fn read_aligned<R: Read>(
    reader: R,
    instruments: &PerLeg<String>,
) -> Result<Vec<PairBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let ts_col = column(&headers, "timestamp")?;
    let layout = PerLeg::from_fn(|leg| LegColumns::locate(&headers, &instruments[leg]));
    let layout = PerLeg::new(layout.a?, layout.b?);

    let mut bars: Vec<PairBar> = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        let timestamp = parse_timestamp(row, field(&record, ts_col))?;
        if let Some(prev) = bars.last() {
            if timestamp <= prev.timestamp {
                return Err(DataError::NonIncreasingTimestamp {
                    row,
                    timestamp: timestamp.to_string(),
                });
            }
        }

        let mut quotes = PerLeg::new(Quote::flat(0.0), Quote::flat(0.0));
        for leg in Leg::BOTH {
            let quote = layout[leg].quote(&headers, &record, row)?;
            if !quote.is_sane() {
                return Err(DataError::InvalidPrice {
                    row,
                    instrument: instruments[leg].clone(),
                });
            }
            quotes[leg] = quote;
        }

        bars.push(PairBar { timestamp, quotes });
    }

    Ok(bars)
}

/// Column indices of one instrument's fields.
#[derive(Debug, Clone, Copy)]
struct LegColumns {
    open: usize,
    close: usize,
    range: RangeColumns,
}

#[derive(Debug, Clone, Copy)]
enum RangeColumns {
    HighLow { high: usize, low: usize },
    Mid(usize),
}

impl LegColumns {
    fn locate(headers: &StringRecord, prefix: &str) -> Result<Self, DataError> {
        let name = |f: &str| format!("{prefix}_{f}");
        let open = column(headers, &name("open"))?;
        let close = column(headers, &name("close"))?;

        let high = column(headers, &name("high")).ok();
        let low = column(headers, &name("low")).ok();
        let range = match (high, low) {
            (Some(high), Some(low)) => RangeColumns::HighLow { high, low },
            _ => RangeColumns::Mid(column(headers, &name("mid")).map_err(|_| {
                DataError::MissingColumn(format!(
                    "{prefix}_mid (or both {prefix}_high and {prefix}_low)"
                ))
            })?),
        };

        Ok(Self { open, close, range })
    }

    fn quote(
        &self,
        headers: &StringRecord,
        record: &StringRecord,
        row: usize,
    ) -> Result<Quote, DataError> {
        let num = |col: usize| parse_number(row, field(headers, col), field(record, col));

        let open = num(self.open)?;
        let close = num(self.close)?;
        let (high, low) = match self.range {
            RangeColumns::HighLow { high, low } => (num(high)?, num(low)?),
            RangeColumns::Mid(mid) => {
                let mid = num(mid)?;
                (mid, mid)
            }
        };
        Ok(Quote::new(open, high, low, close))
    }
}

fn column(headers: &StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}
