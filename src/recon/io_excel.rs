// Primitives for reading the survey sheet from an Excel workbook.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::recon::{io_common::value_from_cell, *};

pub fn read_excel_sheet(path: &str, worksheet_name: Option<&str>) -> ReconResult<RawSheet> {
    let wrange = get_range(path, worksheet_name)?;
    let rows: Vec<Vec<RawValue>> = wrange
        .rows()
        .map(|row| row.iter().map(value_from_cell).collect())
        .collect();
    Ok(RawSheet { rows })
}

fn get_range(
    path: &str,
    worksheet_name: Option<&str>,
) -> ReconResult<calamine::Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        // No worksheet name provided: the survey lives in the first one.
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}
