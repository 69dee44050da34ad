// Primitives for reading the survey sheet from delimited text.

use csv::StringRecord;

use crate::recon::{io_common::value_from_text, *};

pub fn read_csv_sheet(path: &str) -> ReconResult<RawSheet> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    sheet_from_records(rdr.into_records())
}

/// Assembles the raw sheet from parsed records. Short records are padded
/// with empty cells so that every row has the width of the widest one.
fn sheet_from_records<R: std::io::Read>(
    records: csv::StringRecordsIntoIter<R>,
) -> ReconResult<RawSheet> {
    let mut rows: Vec<Vec<RawValue>> = Vec::new();
    for (idx, record) in records.enumerate() {
        let lineno = idx + 1;
        let record: StringRecord = record.context(CsvLineSnafu { lineno })?;
        debug!("sheet_from_records: {:?} {:?}", lineno, record);
        rows.push(record.iter().map(value_from_text).collect());
    }
    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, RawValue::Empty);
    }
    Ok(RawSheet { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records_of(data: &str) -> csv::StringRecordsIntoIter<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes())
            .into_records()
    }

    #[test]
    fn rows_are_parsed_and_padded() {
        let data = "\
,4.1.,5.1.
,1.kl.,1.kl.
,,Matemātika
Rīgas 1. vidusskola,20,18
Cēsu vidusskola,12
";
        let sheet = sheet_from_records(records_of(data)).unwrap();
        assert_eq!(sheet.rows.len(), 5);
        assert_eq!(sheet.rows[0][1], RawValue::Text("4.1.".to_string()));
        assert_eq!(sheet.rows[3][1], RawValue::Number(20.0));
        // The short last row is padded to the sheet width.
        assert_eq!(sheet.rows[4].len(), 3);
        assert_eq!(sheet.rows[4][2], RawValue::Empty);
    }

    #[test]
    fn parsed_sheet_feeds_the_engine() {
        let data = "\
,4.1.,5.1.
,1.kl.,1.kl.
,,Matemātika
Rīgas 1. vidusskola,20,18
";
        let sheet = sheet_from_records(records_of(data)).unwrap();
        let selection = Selection {
            subject: "Matemātika".to_string(),
            resource_type: ResourceType::Textbooks,
        };
        let table = run_balance_stats(&sheet, &selection).unwrap();
        assert_eq!(table.cells[1][0], BalanceCell::Known(-2.0));
    }
}
