use crate::recon::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "municipality")]
    pub municipality: Option<String>,
    #[serde(rename = "schoolYear")]
    pub school_year: Option<String>,
}

/// The header block of the summary JSON handed to the rendering side.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SummaryHeader {
    pub report: String,
    pub municipality: Option<String>,
    #[serde(rename = "schoolYear")]
    pub school_year: Option<String>,
    pub subject: String,
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(rename = "maxAbs")]
    pub max_abs: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SheetSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub subject: Option<String>,
    #[serde(rename = "resourceType")]
    pub resource_type: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "sheetSource")]
    pub sheet_source: SheetSource,
    pub selection: Option<SelectionConfig>,
}

pub fn read_config(path: &str) -> ReconResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> ReconResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
