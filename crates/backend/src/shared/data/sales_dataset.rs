use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};
use contracts::dashboards::d100_sales_overview::SalesRecord;
use serde::Deserialize;
use std::fmt;
use std::io::Cursor;

use super::error::DatasetError;

/// Header names of the five required columns
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub region: String,
    pub product: String,
    pub revenue: String,
    pub units_sold: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            region: "Rayon".to_string(),
            product: "Produit".to_string(),
            revenue: "CA TTC (€)".to_string(),
            units_sold: "Nb Articles Vendus".to_string(),
        }
    }
}

/// A single cell as read from CSV or a workbook
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    /// Spreadsheet date serial (days since 1899-12-30)
    DateSerial(f64),
}

impl CellValue {
    fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) | CellValue::DateSerial(n) => write!(f, "{}", n),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(v) => CellValue::Number(*v),
            Data::Int(v) => CellValue::Number(*v as f64),
            Data::Bool(v) => CellValue::Text(v.to_string()),
            Data::DateTime(v) => CellValue::DateSerial(v.as_f64()),
            Data::DateTimeIso(v) | Data::DurationIso(v) => CellValue::Text(v.clone()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Header plus data rows, before any typing
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// 1-based sheet row of the header, used in error messages
    pub header_row: usize,
}

/// Read a CSV file. The delimiter is `;` when the header uses it
/// (French Excel exports), `,` otherwise.
pub fn read_csv(bytes: &[u8]) -> Result<RawTable, DatasetError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(detect_delimiter(bytes))
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|v| {
                    if v.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(v.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable {
        headers,
        rows,
        header_row: 1,
    })
}

fn detect_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = header.iter().filter(|b| **b == b';').count();
    let commas = header.iter().filter(|b| **b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Read a workbook (xlsx, xlsm, xls, ods) from memory.
/// Uses the named sheet, or the first one.
pub fn read_workbook(bytes: Vec<u8>, sheet: Option<&str>) -> Result<RawTable, DatasetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(DatasetError::SheetNotFound(name.to_string()));
            }
            workbook.worksheet_range(name)?
        }
        None => workbook.worksheet_range_at(0).ok_or(DatasetError::EmptySheet)??,
    };

    let header_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(|c| CellValue::from(c).to_string()).collect(),
        None => return Err(DatasetError::EmptySheet),
    };
    let rows = rows
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    Ok(RawTable {
        headers,
        rows,
        header_row,
    })
}

/// Convert raw rows into validated records.
///
/// Fully empty rows are skipped; any other malformed row fails the load.
pub fn parse_records(
    table: &RawTable,
    columns: &ColumnNames,
) -> Result<Vec<SalesRecord>, DatasetError> {
    let date_idx = column_index(&table.headers, &columns.date)?;
    let region_idx = column_index(&table.headers, &columns.region)?;
    let product_idx = column_index(&table.headers, &columns.product)?;
    let revenue_idx = column_index(&table.headers, &columns.revenue)?;
    let units_idx = column_index(&table.headers, &columns.units_sold)?;

    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;

    for (i, row) in table.rows.iter().enumerate() {
        if row.iter().all(CellValue::is_empty) {
            skipped += 1;
            continue;
        }

        let row_no = table.header_row + i + 1;
        let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY_CELL);

        let date = parse_date(cell(date_idx)).ok_or_else(|| DatasetError::InvalidDate {
            row: row_no,
            value: cell(date_idx).to_string(),
        })?;

        let revenue = parse_amount(cell(revenue_idx), row_no, &columns.revenue)?;
        let units = parse_amount(cell(units_idx), row_no, &columns.units_sold)?;
        if units.fract() != 0.0 {
            return Err(DatasetError::InvalidNumber {
                row: row_no,
                column: columns.units_sold.clone(),
                value: cell(units_idx).to_string(),
            });
        }

        records.push(SalesRecord {
            date,
            region: cell(region_idx).to_string(),
            product: cell(product_idx).to_string(),
            revenue,
            units_sold: units as u64,
        });
    }

    tracing::debug!(
        "Parsed {} sales records ({} empty rows skipped)",
        records.len(),
        skipped
    );

    Ok(records)
}

fn column_index(headers: &[String], name: &str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
}

fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Text(s) => parse_date_text(s),
        CellValue::DateSerial(serial) | CellValue::Number(serial) => date_from_serial(*serial),
        CellValue::Empty => None,
    }
}

/// Accepts `DD/MM/YYYY` and `YYYY-MM-DD`, with an optional time part
fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let date_part = s.trim().split([' ', 'T']).next()?;
    NaiveDate::parse_from_str(date_part, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y-%m-%d"))
        .ok()
}

fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = Duration::try_days(serial.trunc() as i64)?;
    epoch.checked_add_signed(days)
}

fn parse_amount(cell: &CellValue, row: usize, column: &str) -> Result<f64, DatasetError> {
    let invalid = || DatasetError::InvalidNumber {
        row,
        column: column.to_string(),
        value: cell.to_string(),
    };

    let value = match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_number_text(s).ok_or_else(invalid)?,
        CellValue::Empty | CellValue::DateSerial(_) => return Err(invalid()),
    };

    if !value.is_finite() {
        return Err(invalid());
    }
    if value < 0.0 {
        return Err(DatasetError::NegativeValue {
            row,
            column: column.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Parses amounts written with either decimal convention.
///
/// When both `,` and `.` appear, the last one is the decimal separator
/// and the other groups thousands ("1.234,56", "1,234.56"). A separator
/// repeated with no other kind present groups thousands ("1,234,567").
/// A single `,` or `.` is always decimal, so "1,234" is 1.234.
/// Thousands groups must be three digits wide.
fn parse_number_text(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();
    let (sign, body) = match cleaned.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", cleaned.as_str()),
    };

    let (decimal, group) = match (body.rfind('.'), body.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => (Some('.'), Some(',')),
        (Some(_), Some(_)) => (Some(','), Some('.')),
        (Some(_), None) if body.matches('.').count() > 1 => (None, Some('.')),
        (None, Some(_)) if body.matches(',').count() > 1 => (None, Some(',')),
        (Some(_), None) => (Some('.'), None),
        (None, Some(_)) => (Some(','), None),
        (None, None) => (None, None),
    };

    let (int_part, frac_part) = match decimal {
        Some(d) => {
            let (int_part, frac_part) = body.split_once(d)?;
            if frac_part.contains(d) || group.is_some_and(|g| frac_part.contains(g)) {
                return None;
            }
            (int_part, Some(frac_part))
        }
        None => (body, None),
    };

    let digits = match group {
        Some(g) => {
            let mut chunks = int_part.split(g);
            let first = chunks.next()?;
            if first.is_empty() || first.len() > 3 {
                return None;
            }
            let mut digits = first.to_string();
            for chunk in chunks {
                if chunk.len() != 3 {
                    return None;
                }
                digits.push_str(chunk);
            }
            digits
        }
        None => int_part.to_string(),
    };

    let normalized = match frac_part {
        Some(frac) => format!("{}{}.{}", sign, digits, frac),
        None => format!("{}{}", sign, digits),
    };
    normalized.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Date,Rayon,Produit,CA TTC (€),Nb Articles Vendus\n\
        01/01/2024,Frais,Lait,100.5,2\n\
        02/01/2024,Epicerie,Riz,200,3\n";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_csv_records() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        let records = parse_records(&table, &ColumnNames::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            SalesRecord {
                date: date(2024, 1, 1),
                region: "Frais".to_string(),
                product: "Lait".to_string(),
                revenue: 100.5,
                units_sold: 2,
            }
        );
        assert_eq!(records[1].date, date(2024, 1, 2));
        assert_eq!(records[1].units_sold, 3);
    }

    #[test]
    fn test_semicolon_csv_with_bom_and_french_numbers() {
        let text = "\u{FEFF}Date;Rayon;Produit;CA TTC (€);Nb Articles Vendus\n\
            15/03/2024;Frais;Beurre;1 234,50 €;7\n";
        let table = read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.headers[0], "Date");

        let records = parse_records(&table, &ColumnNames::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revenue, 1234.5);
        assert_eq!(records[0].date, date(2024, 3, 15));
    }

    #[test]
    fn test_headers_match_case_insensitively() {
        let text = " date ,RAYON,produit,ca ttc (€),nb articles vendus\n01/02/2024,A,X,1,1\n";
        let table = read_csv(text.as_bytes()).unwrap();
        let records = parse_records(&table, &ColumnNames::default()).unwrap();
        assert_eq!(records[0].date, date(2024, 2, 1));
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let text = format!("{}{}", SAMPLE, ",,,,\n");
        let table = read_csv(text.as_bytes()).unwrap();
        let records = parse_records(&table, &ColumnNames::default()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_column() {
        let text = "Date,Rayon,Produit,CA TTC (€)\n01/01/2024,A,X,1\n";
        let table = read_csv(text.as_bytes()).unwrap();
        let err = parse_records(&table, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "Nb Articles Vendus"));
    }

    #[test]
    fn test_invalid_date_reports_sheet_row() {
        let text = format!("{}{}", SAMPLE, "31/02/2024,A,X,1,1\n");
        let table = read_csv(text.as_bytes()).unwrap();
        let err = parse_records(&table, &ColumnNames::default()).unwrap_err();
        match err {
            DatasetError::InvalidDate { row, value } => {
                assert_eq!(row, 4);
                assert_eq!(value, "31/02/2024");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_revenue_is_rejected() {
        let text = "Date,Rayon,Produit,CA TTC (€),Nb Articles Vendus\n01/01/2024,A,X,-5,1\n";
        let table = read_csv(text.as_bytes()).unwrap();
        let err = parse_records(&table, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, DatasetError::NegativeValue { row: 2, .. }));
    }

    #[test]
    fn test_fractional_units_are_rejected() {
        let text = "Date,Rayon,Produit,CA TTC (€),Nb Articles Vendus\n01/01/2024,A,X,5,1.5\n";
        let table = read_csv(text.as_bytes()).unwrap();
        let err = parse_records(&table, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidNumber { row: 2, .. }));
    }

    #[test]
    fn test_workbook_cells() {
        // 45292 = 2024-01-01
        let table = RawTable {
            headers: default_headers(),
            rows: vec![
                vec![
                    CellValue::DateSerial(45292.0),
                    CellValue::Text("Frais".into()),
                    CellValue::Text("Lait".into()),
                    CellValue::Number(99.9),
                    CellValue::Number(4.0),
                ],
                vec![
                    CellValue::Text("2024-01-02 00:00:00".into()),
                    CellValue::Text("Frais".into()),
                    CellValue::Text("Lait".into()),
                    CellValue::Number(10.0),
                    CellValue::Number(1.0),
                ],
            ],
            header_row: 3,
        };

        let records = parse_records(&table, &ColumnNames::default()).unwrap();
        assert_eq!(records[0].date, date(2024, 1, 1));
        assert_eq!(records[0].units_sold, 4);
        assert_eq!(records[1].date, date(2024, 1, 2));
    }

    #[test]
    fn test_short_row_reports_missing_value() {
        let table = RawTable {
            headers: default_headers(),
            rows: vec![vec![
                CellValue::Text("01/01/2024".into()),
                CellValue::Text("Frais".into()),
            ]],
            header_row: 1,
        };
        let err = parse_records(&table, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidNumber { row: 2, .. }));
    }

    #[test]
    fn test_huge_date_serial_is_invalid_date() {
        let table = RawTable {
            headers: default_headers(),
            rows: vec![vec![
                CellValue::Number(1e18),
                CellValue::Text("Frais".into()),
                CellValue::Text("Lait".into()),
                CellValue::Number(1.0),
                CellValue::Number(1.0),
            ]],
            header_row: 1,
        };
        let err = parse_records(&table, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidDate { row: 2, .. }));
    }

    #[test]
    fn test_number_separators() {
        assert_eq!(parse_number_text("1 234,50 €"), Some(1234.5));
        assert_eq!(parse_number_text("1.234,56"), Some(1234.56));
        assert_eq!(parse_number_text("1,234.56"), Some(1234.56));
        assert_eq!(parse_number_text("1,234,567"), Some(1234567.0));
        assert_eq!(parse_number_text("1.234.567"), Some(1234567.0));
        assert_eq!(parse_number_text("12,5"), Some(12.5));
        // A lone separator is decimal
        assert_eq!(parse_number_text("1,234"), Some(1.234));
        assert_eq!(parse_number_text("-5"), Some(-5.0));
    }

    #[test]
    fn test_malformed_number_groups_are_rejected() {
        assert_eq!(parse_number_text("1.2.3,4"), None);
        assert_eq!(parse_number_text("12,34,5"), None);
        assert_eq!(parse_number_text("1,234.5,6"), None);
        assert_eq!(parse_number_text("1234,567.8"), None);
        assert_eq!(parse_number_text(""), None);

        let text = "Date,Rayon,Produit,CA TTC (€),Nb Articles Vendus\n01/01/2024,A,X,\"1.2.3,4\",1\n";
        let table = read_csv(text.as_bytes()).unwrap();
        let err = parse_records(&table, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidNumber { row: 2, .. }));
    }

    #[test]
    fn test_read_workbook_rejects_garbage() {
        assert!(read_workbook(b"not a workbook".to_vec(), None).is_err());
    }

    fn default_headers() -> Vec<String> {
        let c = ColumnNames::default();
        vec![c.date, c.region, c.product, c.revenue, c.units_sold]
    }
}
