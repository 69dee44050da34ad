use log::{debug, info, warn};

use resource_balance::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::recon::config_reader::*;
use crate::recon::io_common::simplify_file_name;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;

#[derive(Debug, Snafu)]
pub enum ReconError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in workbook {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading record {lineno}"))]
    CsvLine { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Input provider {provider} is not supported"))]
    UnknownProvider { provider: String },
    #[snafu(display(""))]
    MissingParentDir {},
    #[snafu(display("{source}"))]
    Balance { source: BalanceErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReconResult<T> = Result<T, ReconError>;

fn read_sheet(source: &SheetSource, path: &Path) -> ReconResult<RawSheet> {
    let p = path.display().to_string();
    info!(
        "Attempting to read sheet {:?} with provider {:?}",
        p, source.provider
    );
    let sheet = match source.provider.as_str() {
        "csv" => io_csv::read_csv_sheet(&p),
        "excel" | "xlsx" => {
            io_excel::read_excel_sheet(&p, source.excel_worksheet_name.as_deref())
        }
        x => UnknownProviderSnafu { provider: x }.fail(),
    }?;
    debug!("read_sheet: {} rows", sheet.rows.len());
    Ok(sheet)
}

/// The effective configuration of this run: the configuration file when one
/// was given, with command-line options layered on top.
fn assemble_config(args: &Args) -> ReconResult<ReportConfig> {
    let mut config = match args.config.clone() {
        Some(path) => read_config(&path)?,
        None => {
            let input = match args.input.clone() {
                Some(p) => p,
                None => whatever!("either --config or --input must be provided"),
            };
            ReportConfig {
                output_settings: OutputSettings {
                    report_name: simplify_file_name(input.as_str()),
                    output_directory: None,
                    municipality: None,
                    school_year: None,
                },
                sheet_source: SheetSource {
                    provider: "csv".to_string(),
                    file_path: input,
                    excel_worksheet_name: None,
                },
                selection: None,
            }
        }
    };
    if let Some(input) = args.input.clone() {
        config.sheet_source.file_path = input;
    }
    if let Some(input_type) = args.input_type.clone() {
        config.sheet_source.provider = input_type;
    }
    if let Some(worksheet) = args.excel_worksheet_name.clone() {
        config.sheet_source.excel_worksheet_name = Some(worksheet);
    }
    Ok(config)
}

fn validate_selection(
    subject: Option<String>,
    resource_type: Option<String>,
    subjects: &[String],
) -> ReconResult<Selection> {
    let subject = match subject {
        Some(s) => {
            if !subjects.iter().any(|x| *x == s) {
                whatever!(
                    "Subject {:?} is not present in the sheet. Available subjects: {:?}",
                    s,
                    subjects
                )
            }
            s
        }
        // The interactive dashboards preselect the first subject.
        None => subjects[0].clone(),
    };
    let resource_type = match resource_type.as_deref() {
        None | Some("textbooks") | Some("Textbooks") => ResourceType::Textbooks,
        Some("workbooks") | Some("Workbooks") => ResourceType::Workbooks,
        Some(x) => {
            whatever!(
                "Unknown resource type {:?}: expected textbooks or workbooks",
                x
            )
        }
    };
    Ok(Selection {
        subject,
        resource_type,
    })
}

/// The CSS fragment attached to each cell for the rendering side.
fn style_css(style: &CellStyle) -> String {
    match style {
        CellStyle::Totals => "background-color: #D3D3D3; font-weight: bold;".to_string(),
        CellStyle::Attention => "background-color: yellow;".to_string(),
        CellStyle::Surplus(i) => format!("background-color: rgb({}, 255, {});", i, i),
        CellStyle::Deficit(i) => format!("background-color: rgb(255, {}, {});", i, i),
        CellStyle::Plain => String::new(),
    }
}

fn table_to_json(table: &BalanceTable) -> JSValue {
    let mut rows: Vec<JSValue> = Vec::new();
    for (r, label) in table.row_labels.iter().enumerate() {
        let mut cells: Vec<JSValue> = Vec::new();
        for (c, cell) in table.cells[r].iter().enumerate() {
            cells.push(json!({
                "text": cell.display_text(),
                "style": style_css(&table.styles[r][c]),
            }));
        }
        rows.push(json!({"label": label, "cells": cells}));
    }
    json!({"columnLabels": table.column_labels, "rows": rows})
}

fn build_summary_js(
    config: &ReportConfig,
    selection: &Selection,
    table: &BalanceTable,
) -> JSValue {
    let header = SummaryHeader {
        report: config.output_settings.report_name.clone(),
        municipality: config.output_settings.municipality.clone(),
        school_year: config.output_settings.school_year.clone(),
        subject: selection.subject.clone(),
        resource_type: selection.resource_type.label().to_string(),
        max_abs: table.max_abs.to_string(),
    };
    json!({
        "config": header,
        "table": table_to_json(table) })
}

fn write_summary(args: &Args, config: &ReportConfig, pretty: &str) -> ReconResult<()> {
    let target: Option<PathBuf> = match args.out.clone() {
        Some(s) if s == "stdout" => None,
        Some(s) => Some(PathBuf::from(s)),
        None => config
            .output_settings
            .output_directory
            .clone()
            .map(|dir| Path::new(&dir).join(format!("{}.json", config.output_settings.report_name))),
    };
    match target {
        None => {
            println!("{}", pretty);
        }
        Some(path) => {
            let p = path.display().to_string();
            fs::write(&path, pretty).context(WritingSummarySnafu { path: p.clone() })?;
            info!("Summary written to {:?}", p);
        }
    }
    Ok(())
}

pub fn run_report(args: &Args) -> ReconResult<()> {
    let config = assemble_config(args)?;
    info!("config: {:?}", config);

    // A file path from the configuration is relative to the configuration
    // file itself; a path from the command line is taken as given.
    let sheet_path: PathBuf = match (&args.config, &args.input) {
        (Some(config_path), None) => Path::new(config_path)
            .parent()
            .context(MissingParentDirSnafu {})?
            .join(&config.sheet_source.file_path),
        _ => PathBuf::from(config.sheet_source.file_path.clone()),
    };
    let sheet = read_sheet(&config.sheet_source, &sheet_path)?;

    let subjects = available_subjects(&sheet).context(BalanceSnafu {})?;
    if args.list_subjects {
        let js = json!({ "subjects": subjects });
        let pretty = serde_json::to_string_pretty(&js).context(ParsingJsonSnafu {})?;
        println!("{}", pretty);
        return Ok(());
    }

    let config_selection = config.selection.clone().unwrap_or_default();
    let selection = validate_selection(
        args.subject.clone().or(config_selection.subject),
        args.resource_type.clone().or(config_selection.resource_type),
        &subjects,
    )?;
    info!("selection: {:?}", selection);

    let table = run_balance_stats(&sheet, &selection).context(BalanceSnafu {})?;

    let result_js = build_summary_js(&config, &selection, &table);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(args, &config, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = args.reference.clone() {
        let summary_ref = read_summary(&summary_p)?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_balance::builder::SheetBuilder;

    fn sample_table() -> (Selection, BalanceTable) {
        let mut builder = SheetBuilder::new()
            .codes(&["", "4.1.", "5.1."])
            .class_levels(&["", "1.kl.", "1.kl."])
            .subjects(&["", "", "Matemātika"]);
        builder
            .add_school_counts("Rīgas 1. vidusskola", &[Some(20.0), Some(18.0)])
            .unwrap();
        let sheet = builder.build().unwrap();
        let selection = Selection {
            subject: "Matemātika".to_string(),
            resource_type: ResourceType::Textbooks,
        };
        let table = run_balance_stats(&sheet, &selection).unwrap();
        (selection, table)
    }

    #[test]
    fn selection_defaults() {
        let subjects = vec!["Fizika".to_string(), "Matemātika".to_string()];
        let selection = validate_selection(None, None, &subjects).unwrap();
        assert_eq!(selection.subject, "Fizika");
        assert_eq!(selection.resource_type, ResourceType::Textbooks);

        let selection = validate_selection(
            Some("Matemātika".to_string()),
            Some("workbooks".to_string()),
            &subjects,
        )
        .unwrap();
        assert_eq!(selection.subject, "Matemātika");
        assert_eq!(selection.resource_type, ResourceType::Workbooks);

        assert!(validate_selection(Some("Vēsture".to_string()), None, &subjects).is_err());
        assert!(
            validate_selection(None, Some("licenses".to_string()), &subjects).is_err()
        );
    }

    #[test]
    fn cell_styles_render_to_css() {
        assert_eq!(
            style_css(&CellStyle::Totals),
            "background-color: #D3D3D3; font-weight: bold;"
        );
        assert_eq!(style_css(&CellStyle::Attention), "background-color: yellow;");
        assert_eq!(
            style_css(&CellStyle::Surplus(177)),
            "background-color: rgb(177, 255, 177);"
        );
        assert_eq!(
            style_css(&CellStyle::Deficit(100)),
            "background-color: rgb(255, 100, 100);"
        );
        assert_eq!(style_css(&CellStyle::Plain), "");
    }

    #[test]
    fn summary_json_shape() {
        let (selection, table) = sample_table();
        let config = ReportConfig {
            output_settings: OutputSettings {
                report_name: "test".to_string(),
                output_directory: None,
                municipality: Some("Dobeles novads".to_string()),
                school_year: None,
            },
            sheet_source: SheetSource {
                provider: "csv".to_string(),
                file_path: "survey.csv".to_string(),
                excel_worksheet_name: None,
            },
            selection: None,
        };

        let js = build_summary_js(&config, &selection, &table);
        assert_eq!(js["config"]["subject"], "Matemātika");
        assert_eq!(js["config"]["resourceType"], "Textbooks");
        assert_eq!(js["table"]["columnLabels"][0], "1.kl.");
        assert_eq!(js["table"]["rows"][0]["label"], "Total");
        // 18 - 20 on the only school row.
        assert_eq!(js["table"]["rows"][1]["cells"][0]["text"], "-2");
        assert_eq!(
            js["table"]["rows"][0]["cells"][0]["style"],
            "background-color: #D3D3D3; font-weight: bold;"
        );
    }
}
