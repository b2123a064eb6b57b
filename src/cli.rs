//! Command-line argument parsing for the sheet tool
//!
//! Supports:
//! - Loading one CSV/TSV file into a sheet
//! - Find and replace-all across its cells
//! - Choosing header mode and fit mode for the layout summary
//! - Writing the result back to the file

use clap::Parser;
use std::path::PathBuf;

use crate::layout::FitMode;
use crate::search::SearchOptions;

/// Grid view and search/replace for delimited text files
#[derive(Parser, Debug)]
#[command(
    name = "csvgrid",
    version,
    about = "Grid view and search/replace for CSV/TSV files"
)]
pub struct CliArgs {
    /// CSV or TSV file to load
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Search the cells for PATTERN
    #[arg(short = 'f', long, value_name = "PATTERN")]
    pub find: Option<String>,

    /// Replace every match with TEXT (requires --find)
    #[arg(short = 'r', long, value_name = "TEXT")]
    pub replace: Option<String>,

    /// Treat PATTERN as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Match regardless of case
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Only match whole words
    #[arg(short = 'w', long)]
    pub whole_word: bool,

    /// Use the first row as column titles
    #[arg(long)]
    pub header: bool,

    /// Column fit mode: all-equal-default, all-equal-fit or fit-cells
    #[arg(long, value_name = "MODE")]
    pub fit: Option<String>,

    /// Write the replaced text back to FILE
    #[arg(long)]
    pub write: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// What the binary should do once the file is loaded
#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    /// Print the grid dimensions and column widths
    Summary,
    /// List matches
    Find { query: String },
    /// Replace every match, optionally saving the file
    Replace {
        query: String,
        replacement: String,
        write: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    pub mode: RunMode,
    pub options: SearchOptions,
    pub header: bool,
    pub fit_mode: Option<FitMode>,
    pub json: bool,
}

impl CliArgs {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            regex: self.regex,
            case_sensitive: !self.ignore_case,
            whole_word: self.whole_word,
        }
    }

    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        let options = self.search_options();

        let fit_mode = match self.fit.as_deref() {
            Some(name) => Some(
                FitMode::from_name(name).ok_or_else(|| format!("Unknown fit mode: {}", name))?,
            ),
            None => None,
        };

        let mode = match (self.find, self.replace) {
            (None, None) => RunMode::Summary,
            (None, Some(_)) => return Err("--replace requires --find".to_string()),
            (Some(query), None) => RunMode::Find { query },
            (Some(query), Some(replacement)) => RunMode::Replace {
                query,
                replacement,
                write: self.write,
            },
        };

        if self.write && !matches!(mode, RunMode::Replace { .. }) {
            return Err("--write requires --replace".to_string());
        }

        Ok(RunConfig {
            file: self.file,
            mode,
            options,
            header: self.header,
            fit_mode,
            json: self.json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<RunConfig, String> {
        let args = CliArgs::try_parse_from(args).map_err(|e| e.to_string())?;
        args.into_config()
    }

    #[test]
    fn test_file_only_gives_summary() {
        let config = parse(&["csvgrid", "data.csv"]).unwrap();
        assert_eq!(config.mode, RunMode::Summary);
        assert_eq!(config.file, PathBuf::from("data.csv"));
        assert!(config.options.case_sensitive);
        assert_eq!(config.fit_mode, None);
    }

    #[test]
    fn test_missing_file_is_rejected() {
        assert!(CliArgs::try_parse_from(["csvgrid"]).is_err());
    }

    #[test]
    fn test_find_with_flags() {
        let config = parse(&[
            "csvgrid",
            "data.tsv",
            "--find",
            "a.c",
            "--regex",
            "-i",
            "--whole-word",
            "--json",
        ])
        .unwrap();
        assert_eq!(
            config.mode,
            RunMode::Find {
                query: "a.c".to_string()
            }
        );
        assert_eq!(
            config.options,
            SearchOptions {
                regex: true,
                case_sensitive: false,
                whole_word: true,
            }
        );
        assert!(config.json);
    }

    #[test]
    fn test_replace_and_write() {
        let config = parse(&["csvgrid", "x.csv", "-f", "a", "-r", "b", "--write"]).unwrap();
        assert_eq!(
            config.mode,
            RunMode::Replace {
                query: "a".to_string(),
                replacement: "b".to_string(),
                write: true,
            }
        );
    }

    #[test]
    fn test_invalid_combinations() {
        assert!(parse(&["csvgrid", "x.csv", "--replace", "b"]).is_err());
        assert!(parse(&["csvgrid", "x.csv", "--find", "a", "--write"]).is_err());
        assert!(parse(&["csvgrid", "x.csv", "--fit", "stretch"]).is_err());
    }

    #[test]
    fn test_fit_mode_and_header() {
        let config = parse(&["csvgrid", "x.csv", "--fit", "fit", "--header"]).unwrap();
        assert_eq!(config.fit_mode, Some(FitMode::AllEqualFit));
        assert!(config.header);
    }
}
