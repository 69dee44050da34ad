// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One cell of the survey sheet, as produced by the file readers.
///
/// Spreadsheet content is kept in its raw shape: the engine decides per
/// stage whether a cell is a label or a count, and what a blank means.
#[derive(PartialEq, Debug, Clone)]
pub enum RawValue {
    /// A numeric cell. NaN is treated the same as a missing value.
    Number(f64),
    /// A textual cell. May still coerce to a number during aggregation.
    Text(String),
    /// An empty cell.
    Empty,
}

/// The raw survey sheet.
///
/// Row 0 carries the column codes, row 1 the class-level labels, row 2 the
/// subject labels. Every following row is one school: column 0 is the
/// school name, the remaining columns are counts.
#[derive(PartialEq, Debug, Clone)]
pub struct RawSheet {
    pub rows: Vec<Vec<RawValue>>,
}

/// The resource family to report on. Each family owns a column code prefix
/// in the survey sheet.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ResourceType {
    Textbooks,
    Workbooks,
}

impl ResourceType {
    /// The column code prefix that carries the counts for this family.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            ResourceType::Textbooks => "5.",
            ResourceType::Workbooks => "6.",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Textbooks => "Textbooks",
            ResourceType::Workbooks => "Workbooks",
        }
    }
}

/// The user-facing parameters of one report run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Selection {
    /// One of the subject labels discovered in the sheet.
    pub subject: String,
    pub resource_type: ResourceType,
}

// ******** Output data structures *********

/// One cell of the computed table.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum BalanceCell {
    /// A surplus (positive) or deficit (negative) of resources.
    Known(f64),
    /// The cell could not be established from the source data.
    Unknown,
}

impl BalanceCell {
    pub fn is_unknown(&self) -> bool {
        matches!(self, BalanceCell::Unknown)
    }

    /// The numeric value, with unknown cells contributing zero. Used for
    /// totals, where missing data is excluded rather than propagated.
    pub fn or_zero(&self) -> f64 {
        match self {
            BalanceCell::Known(x) => *x,
            BalanceCell::Unknown => 0.0,
        }
    }

    /// The display form of the cell: a signed rounded integer or the
    /// `Unknown` marker.
    pub fn display_text(&self) -> String {
        match self {
            BalanceCell::Known(x) => format!("{:+}", x.round() as i64),
            BalanceCell::Unknown => "Unknown".to_string(),
        }
    }
}

/// The rendering directive for one cell. The intensity channel of the
/// surplus and deficit variants is in `100..=255`, 255 meaning a value
/// close to zero on the shared color scale.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CellStyle {
    /// The totals row and totals column band.
    Totals,
    /// A cell whose value is unknown.
    Attention,
    /// A positive balance.
    Surplus(u8),
    /// A negative balance.
    Deficit(u8),
    /// An exact zero, no emphasis.
    Plain,
}

/// The summary table handed to the rendering side.
///
/// The first row is the totals row and the last column is the totals
/// column; `max_abs` is the normalizer of the color scale, computed over
/// the table before the totals were added (at least 1).
#[derive(PartialEq, Debug, Clone)]
pub struct BalanceTable {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<BalanceCell>>,
    pub styles: Vec<Vec<CellStyle>>,
    pub max_abs: f64,
}

/// Errors that prevent a report from being computed at all. Per-cell data
/// problems are not errors: they degrade to [BalanceCell::Unknown].
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BalanceErrors {
    /// The sheet is missing the three header rows or any data row.
    MissingRows { rows: usize },
    /// The sheet has no columns at all.
    NoColumns,
    /// A row whose width differs from the header row.
    RaggedRow { row: usize },
    /// No non-empty subject label anywhere in the sheet.
    NoSubjects,
    /// The subject and resource type selection matched no class level.
    NoClassLevels { subject: String },
}

impl BalanceErrors {
    /// Structural errors concern the shape of the file; the others mean the
    /// file is well-formed but carries nothing to report on.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BalanceErrors::MissingRows { .. }
                | BalanceErrors::NoColumns
                | BalanceErrors::RaggedRow { .. }
        )
    }
}

impl Error for BalanceErrors {}

impl Display for BalanceErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceErrors::MissingRows { rows } => {
                write!(
                    f,
                    "the sheet has {} rows, at least 3 header rows and one data row are required",
                    rows
                )
            }
            BalanceErrors::NoColumns => write!(f, "the sheet has no columns"),
            BalanceErrors::RaggedRow { row } => {
                write!(f, "row {} has a different width than the header rows", row)
            }
            BalanceErrors::NoSubjects => {
                write!(f, "no subject information found in the sheet")
            }
            BalanceErrors::NoClassLevels { subject } => {
                write!(
                    f,
                    "no class level data found for subject {:?} and the chosen resource type",
                    subject
                )
            }
        }
    }
}

// ********* Reporting taxonomy **********

// The fixed labels of the survey format. They follow the wording of the
// national survey sheets and are not configurable.

/// Class-level marker of free-text note columns, which carry no counts.
pub const NOTES_CLASS_LEVEL: &str = "Piezīmes";

/// Subjects whose columns are dropped before any processing.
pub const EXCLUDED_SUBJECTS: [&str; 2] = [
    "Tiek izmantoti maksas digitālie mācību līdzekļi",
    "Tiek iegādāti citi mācību materiāli praktisko darbu īstenošanai",
];

/// The advanced course is surveyed but never reported on.
pub const ADVANCED_COURSE_LEVEL: &str = "Padziļinātais kurss";

/// Class levels folded into the single high-school reporting category.
pub const MERGED_SOURCE_LEVELS: [&str; 3] = ["Pamatkurss", "10.kl.", "11.kl."];

/// The high-school reporting category replacing [MERGED_SOURCE_LEVELS].
pub const MERGED_CLASS_LEVEL: &str = "Pamatkurss (10./11.)";

/// Student-count columns carry this code prefix for every resource type.
pub const STUDENT_CODE_PREFIX: &str = "4.";

/// Columns under this code prefix count as resources for every resource
/// type selection.
pub const SHARED_RESOURCE_CODE_PREFIX: &str = "11.";

/// Label of the totals row and totals column.
pub const TOTAL_LABEL: &str = "Total";
