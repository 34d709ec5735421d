use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};
use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace};

use crate::record::Record;

/// Header names every upload must carry (matched case-insensitively).
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "exercise",
    "difficulty",
    "no_of_hint",
    "percent_hint",
    "percent_wrong",
    "total",
    "wrong",
    "right",
    "hint",
    "not_understood",
];

/// Malformed upload. The message is shown to the user verbatim.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("CSV contains no rows")]
    NoRows,

    #[error("CSV is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("CSV could not be read: {0}")]
    Csv(#[from] csv::Error),
}

/// Column positions resolved from the header line.
struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, ParseError> {
        let mut index = HashMap::new();
        for (position, name) in header.iter().enumerate() {
            // first occurrence wins on duplicated headers
            index.entry(name.trim().to_lowercase()).or_insert(position);
        }

        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !index.contains_key(**name))
            .map(|name| name.to_string())
            .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(Self { index })
        } else {
            Err(ParseError::MissingColumns(missing))
        }
    }

    fn cell<'r>(&self, row: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.index.get(name).and_then(|&position| row.get(position))
    }

    fn text(&self, row: &StringRecord, name: &str) -> String {
        self.cell(row, name).unwrap_or_default().to_string()
    }

    fn number(&self, row: &StringRecord, name: &str) -> f64 {
        self.cell(row, name).map(parse_number).unwrap_or(0.0)
    }

    fn record(&self, row: &StringRecord) -> Record {
        Record {
            exercise: self.text(row, "exercise"),
            difficulty: self.number(row, "difficulty"),
            no_of_hint: self.number(row, "no_of_hint"),
            percent_hint: self.number(row, "percent_hint"),
            percent_wrong: self.number(row, "percent_wrong"),
            total: self.number(row, "total"),
            wrong: self.number(row, "wrong"),
            right: self.number(row, "right"),
            hint: self.number(row, "hint"),
            not_understood: self.number(row, "not_understood"),
        }
    }
}

/// Parse a numeric cell, accepting either `.` or `,` as decimal separator.
/// Anything unparsable (including an empty cell) becomes `NaN`.
pub fn parse_number(cell: &str) -> f64 {
    cell.trim()
        .replace(',', ".")
        .parse::<f64>()
        .unwrap_or(f64::NAN)
}

/// Parse an uploaded CSV text into records, in input order.
///
/// The dialect is deliberately plain: comma separated, no quoting, blank
/// lines ignored, short rows padded with defaults.
pub fn parse(text: &str) -> Result<Vec<Record>, ParseError> {
    // \n, \r\n and bare \r all end a line; the empty pieces are dropped below
    let lines = text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>();

    if lines.len() < 2 {
        return Err(ParseError::NoRows);
    }

    let cleaned = lines.iter().join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(cleaned.as_bytes());

    let header = reader.headers()?.clone();
    let columns = Columns::from_header(&header)?;

    let mut records = Vec::with_capacity(lines.len() - 1);
    for (line_no, row) in reader.records().enumerate() {
        let row = row?;
        if row.len() != header.len() {
            trace!(
                line = line_no + 2,
                cells = row.len(),
                expected = header.len(),
                "row length differs from header"
            );
        }
        records.push(columns.record(&row));
    }

    debug!(rows = records.len(), "parsed csv upload");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const HEADER: &str =
        "exercise,difficulty,no_of_hint,percent_hint,percent_wrong,total,wrong,right,hint,not_understood";

    #[test]
    fn parses_rows_in_order() {
        let text = format!("{HEADER}\nex1,1,0,0,0,25,15,5,0,0\nex2,2,3,10,20,40,8,30,2,1\n");
        let records = parse(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].exercise, "ex1");
        assert_eq!(records[0].total, 25.0);
        assert_eq!(records[1].exercise, "ex2");
        assert_eq!(records[1].no_of_hint, 3.0);
        assert_eq!(records[1].not_understood, 1.0);
    }

    #[test]
    fn header_is_case_insensitive_and_order_free() {
        let text = "NOT_UNDERSTOOD, Hint ,right,wrong,total,percent_wrong,percent_hint,no_of_hint,difficulty,Exercise\n\
                    4,3,2,1,20,0.5,0.25,7,3,abc";
        let records = parse(text).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.exercise, "abc");
        assert_eq!(r.difficulty, 3.0);
        assert_eq!(r.no_of_hint, 7.0);
        assert_eq!(r.percent_hint, 0.25);
        assert_eq!(r.percent_wrong, 0.5);
        assert_eq!(r.total, 20.0);
        assert_eq!(r.wrong, 1.0);
        assert_eq!(r.right, 2.0);
        assert_eq!(r.hint, 3.0);
        assert_eq!(r.not_understood, 4.0);
    }

    #[test]
    fn blank_lines_and_crlf_are_ignored() {
        let text = format!("\r\n{HEADER}\r\n\r\n   \r\nex1,1,0,0,0,25,15,5,0,0\r\n\r\n");
        let records = parse(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].exercise, "ex1");
    }

    #[test]
    fn bare_carriage_returns_split_lines() {
        let text = format!("{HEADER}\rex1,1,0,0,0,25,15,5,0,0\rex2,2,0,0,0,25,15,5,0,0\r");
        let records = parse(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].exercise, "ex2");
        assert_eq!(records[1].difficulty, 2.0);
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert_matches!(parse(""), Err(ParseError::NoRows));
        assert_matches!(parse("\n  \n"), Err(ParseError::NoRows));
    }

    #[test]
    fn header_only_has_no_rows() {
        let err = parse(HEADER).unwrap_err();
        assert_matches!(err, ParseError::NoRows);
        assert_eq!(err.to_string(), "CSV contains no rows");
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let text = "exercise,difficulty,no_of_hint,percent_hint,percent_wrong\nex1,1,0,0,0";
        let err = parse(text).unwrap_err();
        assert_matches!(&err, ParseError::MissingColumns(missing) if missing.len() == 5);
        assert_eq!(
            err.to_string(),
            "CSV is missing required columns: total, wrong, right, hint, not_understood"
        );
    }

    #[test]
    fn short_rows_default_to_zero_and_empty() {
        let text = format!("{HEADER}\nex1,2,1");
        let records = parse(&text).unwrap();
        let r = &records[0];
        assert_eq!(r.exercise, "ex1");
        assert_eq!(r.difficulty, 2.0);
        assert_eq!(r.no_of_hint, 1.0);
        assert_eq!(r.percent_hint, 0.0);
        assert_eq!(r.not_understood, 0.0);
    }

    #[test]
    fn unparsable_cells_become_nan() {
        let text = format!("{HEADER}\nex1,one,0,0,0,lots,,5,0,0");
        let r = &parse(&text).unwrap()[0];
        assert!(r.difficulty.is_nan());
        assert!(r.total.is_nan());
        assert!(r.wrong.is_nan());
        assert_eq!(r.right, 5.0);
    }

    #[test]
    fn decimal_comma_is_accepted() {
        assert_eq!(parse_number("0,25"), 0.25);
        assert_eq!(parse_number("12.5"), 12.5);
        assert!(parse_number("x").is_nan());
        assert!(parse_number("").is_nan());
    }

    #[test]
    fn parsing_is_repeatable() {
        let text = format!("{HEADER}\nex1,1,0,0,0,25,15,5,0,0");
        assert_eq!(parse(&text).unwrap(), parse(&text).unwrap());
    }
}
