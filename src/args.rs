use clap::Parser;

/// Builds the school resource surplus/deficit summary table from a survey sheet.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON report configuration describing the sheet source,
    /// the selection and the output settings. Command-line options override its values.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing a previously computed summary in JSON
    /// format. If provided, skolrec will check that the computed summary matches the
    /// reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON
    /// format to the given location. Setting this option overrides the output directory
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The survey sheet to read. Setting this option overrides the sheet
    /// source that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or excel.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// The subject to report on. Defaults to the first subject discovered in the sheet.
    #[clap(short, long, value_parser)]
    pub subject: Option<String>,

    /// (default textbooks) The resource type to report on: textbooks or workbooks.
    #[clap(long, value_parser)]
    pub resource_type: Option<String>,

    /// When reading an Excel file, indicates the name of the worksheet to use. Defaults
    /// to the only worksheet of the workbook.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, lists the subjects available in the input and exits.
    #[clap(long, takes_value = false)]
    pub list_subjects: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
