pub mod builder;
mod config;
pub mod manual;

use log::{debug, info};

use std::collections::{HashMap, HashSet};

pub use crate::config::*;

// **** Private structures ****

/// One retained data column, classified by the three header rows.
#[derive(Eq, PartialEq, Debug, Clone)]
struct ColumnDescriptor {
    code: String,
    class_level: String,
    subject: String,
}

impl ColumnDescriptor {
    fn is_student(&self) -> bool {
        self.code.starts_with(STUDENT_CODE_PREFIX)
    }

    /// Resource columns belong to the selected family (or the shared
    /// cross-family prefix) and must carry the selected subject.
    fn is_resource(&self, selection: &Selection) -> bool {
        (self.code.starts_with(selection.resource_type.code_prefix())
            || self.code.starts_with(SHARED_RESOURCE_CODE_PREFIX))
            && self.subject == selection.subject
    }

    /// The merged high-school category matches any of its source levels;
    /// every other category matches its own label exactly.
    fn matches_level(&self, target: &str) -> bool {
        if target == MERGED_CLASS_LEVEL {
            MERGED_SOURCE_LEVELS.contains(&self.class_level.as_str())
        } else {
            self.class_level == target
        }
    }
}

/// Accumulation state for one side (students or resources) of one cell.
#[derive(PartialEq, Debug, Clone, Copy)]
struct Accumulator {
    sum: f64,
    found: bool,
    unknown: bool,
}

impl Accumulator {
    const EMPTY: Accumulator = Accumulator {
        sum: 0.0,
        found: false,
        unknown: false,
    };

    /// Folds one matching source value into the accumulator.
    ///
    /// A value that does not coerce to a number marks the accumulator as
    /// unknown without stopping the fold: later valid values are still
    /// summed.
    fn observe(self, value: &RawValue) -> Accumulator {
        match coerce_number(value) {
            Some(x) => Accumulator {
                sum: self.sum + x,
                found: true,
                unknown: self.unknown,
            },
            None => Accumulator {
                sum: self.sum,
                found: true,
                unknown: true,
            },
        }
    }

    fn cell(&self) -> BalanceCell {
        if !self.found || self.unknown {
            BalanceCell::Unknown
        } else {
            BalanceCell::Known(self.sum)
        }
    }
}

fn coerce_number(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Number(x) if x.is_nan() => None,
        RawValue::Number(x) => Some(*x),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        RawValue::Empty => None,
    }
}

/// The textual label of a header or school-name cell.
///
/// Whole floats keep one decimal ("4.0") so that codes entered as numbers
/// still carry their "4." prefix, the way spreadsheet tools print them.
fn label_of(value: &RawValue) -> String {
    match value {
        RawValue::Text(s) => s.trim().to_string(),
        RawValue::Number(x) if x.is_nan() => String::new(),
        RawValue::Number(x) if x.fract() == 0.0 => format!("{:.1}", x),
        RawValue::Number(x) => format!("{}", x),
        RawValue::Empty => String::new(),
    }
}

/// The sheet after header decomposition and column filtering. Downstream
/// stages index values by descriptor position, never by raw sheet position.
#[derive(PartialEq, Debug, Clone)]
struct DecomposedSheet {
    columns: Vec<ColumnDescriptor>,
    schools: Vec<String>,
    /// One row per school, one value per entry of `columns`.
    values: Vec<Vec<RawValue>>,
}

fn decompose(sheet: &RawSheet) -> Result<DecomposedSheet, BalanceErrors> {
    let rows = &sheet.rows;
    if rows.len() < 4 {
        return Err(BalanceErrors::MissingRows { rows: rows.len() });
    }
    let width = rows[0].len();
    if width == 0 {
        return Err(BalanceErrors::NoColumns);
    }
    if let Some(bad) = rows.iter().position(|r| r.len() != width) {
        return Err(BalanceErrors::RaggedRow { row: bad });
    }

    let codes: Vec<String> = rows[0].iter().map(label_of).collect();
    let class_levels: Vec<String> = rows[1].iter().map(label_of).collect();
    let subjects: Vec<String> = rows[2].iter().map(label_of).collect();

    // Column 0 (school names) is always retained. Other columns are dropped
    // when they are note columns or belong to an excluded subject.
    let mut retained: Vec<usize> = Vec::new();
    for i in 1..width {
        if class_levels[i] == NOTES_CLASS_LEVEL {
            continue;
        }
        if EXCLUDED_SUBJECTS.contains(&subjects[i].as_str()) {
            continue;
        }
        retained.push(i);
    }

    let columns: Vec<ColumnDescriptor> = retained
        .iter()
        .map(|&i| ColumnDescriptor {
            code: codes[i].clone(),
            class_level: class_levels[i].clone(),
            subject: subjects[i].clone(),
        })
        .collect();

    let mut schools: Vec<String> = Vec::new();
    let mut values: Vec<Vec<RawValue>> = Vec::new();
    for row in rows[3..].iter() {
        schools.push(label_of(&row[0]));
        values.push(retained.iter().map(|&i| row[i].clone()).collect());
    }

    debug!(
        "decompose: {} of {} columns retained, {} schools",
        columns.len(),
        width - 1,
        schools.len()
    );
    Ok(DecomposedSheet {
        columns,
        schools,
        values,
    })
}

fn discovered_subjects(columns: &[ColumnDescriptor]) -> Vec<String> {
    let set: HashSet<&str> = columns
        .iter()
        .map(|c| c.subject.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    let mut subjects: Vec<String> = set.iter().map(|s| s.to_string()).collect();
    subjects.sort();
    subjects
}

/// The subject labels that can be selected for a report, in presentation
/// order.
pub fn available_subjects(sheet: &RawSheet) -> Result<Vec<String>, BalanceErrors> {
    let decomposed = decompose(sheet)?;
    let subjects = discovered_subjects(&decomposed.columns);
    if subjects.is_empty() {
        return Err(BalanceErrors::NoSubjects);
    }
    Ok(subjects)
}

/// The class levels reported on for this selection, in column order.
fn canonical_class_levels(
    columns: &[ColumnDescriptor],
    selection: &Selection,
) -> Result<Vec<String>, BalanceErrors> {
    let mut raw: HashSet<String> = HashSet::new();
    for column in columns.iter().filter(|c| c.is_resource(selection)) {
        raw.insert(column.class_level.clone());
    }
    // The advanced course never reaches the report.
    raw.remove(ADVANCED_COURSE_LEVEL);

    let mut merged: HashSet<String> = HashSet::new();
    for class_level in raw {
        if MERGED_SOURCE_LEVELS.contains(&class_level.as_str()) {
            merged.insert(MERGED_CLASS_LEVEL.to_string());
        } else {
            merged.insert(class_level);
        }
    }
    let mut levels: Vec<String> = merged.into_iter().collect();
    levels.sort();
    if levels.is_empty() {
        return Err(BalanceErrors::NoClassLevels {
            subject: selection.subject.clone(),
        });
    }
    debug!("canonical_class_levels: {:?}", levels);
    Ok(levels)
}

/// Computes the balance matrix and the raw resource-count matrix, one row
/// per school and one column per canonical class level.
///
/// A balance cell is only known when both sides were found and fully
/// numeric; a resource-count cell only depends on the resource side, so a
/// school can have a known resource count next to an unknown balance.
fn aggregate(
    decomposed: &DecomposedSheet,
    selection: &Selection,
    levels: &[String],
) -> (Vec<Vec<BalanceCell>>, Vec<Vec<BalanceCell>>) {
    let mut balance: Vec<Vec<BalanceCell>> = Vec::new();
    let mut resources: Vec<Vec<BalanceCell>> = Vec::new();
    for row in decomposed.values.iter() {
        let mut balance_row: Vec<BalanceCell> = Vec::new();
        let mut resource_row: Vec<BalanceCell> = Vec::new();
        for target in levels {
            let mut students = Accumulator::EMPTY;
            let mut resource = Accumulator::EMPTY;
            for (column, value) in decomposed.columns.iter().zip(row.iter()) {
                if !column.matches_level(target) {
                    continue;
                }
                if column.is_student() {
                    students = students.observe(value);
                }
                if column.is_resource(selection) {
                    resource = resource.observe(value);
                }
            }
            resource_row.push(resource.cell());
            balance_row.push(match (students.cell(), resource.cell()) {
                (BalanceCell::Known(s), BalanceCell::Known(r)) => BalanceCell::Known(r - s),
                _ => BalanceCell::Unknown,
            });
        }
        balance.push(balance_row);
        resources.push(resource_row);
    }
    (balance, resources)
}

/// Drops the class levels whose resource count is unknown or zero for every
/// school. Such a level carries no resource data for the current selection
/// and would only add noise to the report.
fn prune_degenerate(
    levels: &mut Vec<String>,
    balance: &[Vec<BalanceCell>],
    resources: &[Vec<BalanceCell>],
) -> Vec<Vec<BalanceCell>> {
    let kept: Vec<usize> = (0..levels.len())
        .filter(|&j| {
            resources
                .iter()
                .any(|row| matches!(row[j], BalanceCell::Known(x) if x != 0.0))
        })
        .collect();
    if kept.len() < levels.len() {
        debug!(
            "prune_degenerate: keeping {} of {} class levels",
            kept.len(),
            levels.len()
        );
    }
    *levels = kept.iter().map(|&j| levels[j].clone()).collect();
    balance
        .iter()
        .map(|row| kept.iter().map(|&j| row[j]).collect())
        .collect()
}

/// Disambiguates duplicated labels with an occurrence suffix, second
/// occurrence onwards.
fn ensure_unique(labels: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let count = counts.entry(label.as_str()).or_insert(0);
            *count += 1;
            if *count > 1 {
                format!("{}_{}", label, count)
            } else {
                label.clone()
            }
        })
        .collect()
}

/// The color-scale normalizer: the largest absolute known value, with a
/// floor of 1 so that an all-zero or all-unknown table still has a scale.
fn max_absolute(cells: &[Vec<BalanceCell>]) -> f64 {
    let max = cells
        .iter()
        .flatten()
        .filter_map(|cell| match cell {
            BalanceCell::Known(x) => Some(x.abs()),
            BalanceCell::Unknown => None,
        })
        .fold(0.0_f64, f64::max);
    if max == 0.0 {
        1.0
    } else {
        max
    }
}

/// Adds the totals column and the totals row. Unknown cells count as zero.
/// The totals row sums the totals column as well, so the grand total sits
/// at the intersection, and is placed first in the row order.
fn add_totals(
    schools: &[String],
    levels: &[String],
    balance: &[Vec<BalanceCell>],
) -> (Vec<String>, Vec<String>, Vec<Vec<BalanceCell>>) {
    let mut body: Vec<Vec<BalanceCell>> = Vec::new();
    for row in balance.iter() {
        let total: f64 = row.iter().map(BalanceCell::or_zero).sum();
        let mut cells = row.clone();
        cells.push(BalanceCell::Known(total));
        body.push(cells);
    }

    let width = levels.len() + 1;
    let totals_row: Vec<BalanceCell> = (0..width)
        .map(|j| BalanceCell::Known(body.iter().map(|row| row[j].or_zero()).sum()))
        .collect();

    let mut row_labels: Vec<String> = vec![TOTAL_LABEL.to_string()];
    row_labels.extend(schools.iter().cloned());
    let mut column_labels: Vec<String> = levels.to_vec();
    column_labels.push(TOTAL_LABEL.to_string());

    let mut cells: Vec<Vec<BalanceCell>> = vec![totals_row];
    cells.extend(body);
    (row_labels, column_labels, cells)
}

fn scale_intensity(value: f64, max_abs: f64) -> u8 {
    let ratio = (value.abs() / max_abs).sqrt();
    (255.0 - ratio * 155.0) as u8
}

fn style_matrix(
    row_labels: &[String],
    column_labels: &[String],
    cells: &[Vec<BalanceCell>],
    max_abs: f64,
) -> Vec<Vec<CellStyle>> {
    let mut styles: Vec<Vec<CellStyle>> = Vec::new();
    for (r, row) in cells.iter().enumerate() {
        let mut style_row: Vec<CellStyle> = Vec::new();
        for (c, cell) in row.iter().enumerate() {
            let style = if row_labels[r] == TOTAL_LABEL || column_labels[c] == TOTAL_LABEL {
                CellStyle::Totals
            } else {
                match cell {
                    BalanceCell::Unknown => CellStyle::Attention,
                    BalanceCell::Known(x) if *x > 0.0 => {
                        CellStyle::Surplus(scale_intensity(*x, max_abs))
                    }
                    BalanceCell::Known(x) if *x < 0.0 => {
                        CellStyle::Deficit(scale_intensity(*x, max_abs))
                    }
                    BalanceCell::Known(_) => CellStyle::Plain,
                }
            };
            style_row.push(style);
        }
        styles.push(style_row);
    }
    styles
}

/// Runs the full reconciliation for the given sheet and selection.
///
/// Arguments:
/// * `sheet` the raw survey sheet, headers included
/// * `selection` the subject and resource type to report on
///
/// The computation is deterministic and rebuilt from scratch on every
/// call; nothing is cached between selections.
pub fn run_balance_stats(
    sheet: &RawSheet,
    selection: &Selection,
) -> Result<BalanceTable, BalanceErrors> {
    info!(
        "run_balance_stats: {} rows, subject {:?}, resource type {:?}",
        sheet.rows.len(),
        selection.subject,
        selection.resource_type
    );

    let decomposed = decompose(sheet)?;
    if discovered_subjects(&decomposed.columns).is_empty() {
        return Err(BalanceErrors::NoSubjects);
    }

    let mut levels = canonical_class_levels(&decomposed.columns, selection)?;
    let (mut balance, resources) = aggregate(&decomposed, selection, &levels);
    balance = prune_degenerate(&mut levels, &balance, &resources);

    let schools = ensure_unique(&decomposed.schools);
    let levels = ensure_unique(&levels);

    // The scale is fixed before the totals are added: totals may exceed any
    // single cell and would otherwise flatten the gradient.
    let max_abs = max_absolute(&balance);

    let (row_labels, column_labels, cells) = add_totals(&schools, &levels, &balance);
    let styles = style_matrix(&row_labels, &column_labels, &cells, max_abs);

    info!(
        "run_balance_stats: {} schools, {} class levels, max_abs {}",
        row_labels.len() - 1,
        column_labels.len() - 1,
        max_abs
    );
    Ok(BalanceTable {
        row_labels,
        column_labels,
        cells,
        styles,
        max_abs,
    })
}
