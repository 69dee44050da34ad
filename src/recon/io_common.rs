use std::path::Path;

use resource_balance::RawValue;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

/// Classifies one field of a delimited file. Numeric-looking fields become
/// numbers so that counts behave the same whether the sheet came from a
/// delimited export or from a workbook.
pub fn value_from_text(field: &str) -> RawValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        RawValue::Empty
    } else if let Ok(x) = trimmed.parse::<f64>() {
        RawValue::Number(x)
    } else {
        RawValue::Text(field.to_string())
    }
}

/// Classifies one cell of a calamine worksheet.
pub fn value_from_cell(cell: &calamine::DataType) -> RawValue {
    match cell {
        calamine::DataType::String(s) if s.trim().is_empty() => RawValue::Empty,
        calamine::DataType::String(s) => RawValue::Text(s.clone()),
        calamine::DataType::Float(x) => RawValue::Number(*x),
        calamine::DataType::Int(i) => RawValue::Number(*i as f64),
        calamine::DataType::Bool(b) => RawValue::Number(if *b { 1.0 } else { 0.0 }),
        calamine::DataType::DateTime(x) => RawValue::Number(*x),
        calamine::DataType::Error(_) => RawValue::Empty,
        calamine::DataType::Empty => RawValue::Empty,
    }
}
