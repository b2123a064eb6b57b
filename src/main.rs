use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use csvgrid::cli::{CliArgs, RunConfig, RunMode};
use csvgrid::config::SheetConfig;
use csvgrid::grid::{GridView, MemoryGrid};
use csvgrid::messages::{SearchMsg, SheetMsg};
use csvgrid::search::SearchMatch;
use csvgrid::sheet::{DocumentContext, SheetEditor, TextDocument};
use csvgrid::update::update;
use csvgrid::util::{check_input_file, display_name};
use csvgrid::Msg;

type Editor = SheetEditor<MemoryGrid, TextDocument>;

#[derive(Serialize)]
struct Summary {
    file: String,
    rows: usize,
    columns: usize,
    delimiter: String,
    header: bool,
    fit_mode: &'static str,
    titles: Vec<Option<String>>,
    widths: Vec<f32>,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct FindReport<'a> {
    query: &'a str,
    matches: &'a [SearchMatch],
}

#[derive(Serialize)]
struct ReplaceReport<'a> {
    query: &'a str,
    replacement: &'a str,
    matches: usize,
    replaced: usize,
    written: bool,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let run = args.into_config().map_err(anyhow::Error::msg)?;

    csvgrid::tracing::init();

    let mut config = SheetConfig::load();
    if run.header {
        config.header_row = true;
    }

    let name = display_name(&run.file);
    let kind = check_input_file(&run.file).map_err(|e| anyhow::anyhow!(e.describe(&name)))?;
    tracing::debug!(?kind, "input accepted");

    let document = TextDocument::from_file(run.file.clone())
        .with_context(|| format!("Failed to read {}", run.file.display()))?;
    let mut editor: Editor = SheetEditor::new(document, &config);
    update(&mut editor, Msg::Sheet(SheetMsg::Ready));
    if !editor.is_ready() {
        bail!("Failed to load {}", name);
    }
    for warning in editor.warnings() {
        tracing::warn!("{}: {}", name, warning);
    }
    if let Some(mode) = run.fit_mode {
        editor.set_fit_mode(mode);
    }

    match &run.mode {
        RunMode::Summary => print_summary(&editor, &run, &name)?,
        RunMode::Find { query } => {
            start_search(&mut editor, &run, query);
            print_matches(&editor, &run, query)?;
        }
        RunMode::Replace {
            query,
            replacement,
            write,
        } => {
            let matches = start_search(&mut editor, &run, query);
            let replaced = editor
                .replace_all(replacement)
                .with_context(|| format!("Failed to replace {:?}", query))?;
            update(&mut editor, Msg::Search(SearchMsg::End));

            let written = *write && editor.document().is_modified;
            if written {
                editor
                    .document_mut()
                    .save()
                    .with_context(|| format!("Failed to write {}", run.file.display()))?;
            }

            if run.json {
                let report = ReplaceReport {
                    query,
                    replacement,
                    matches,
                    replaced,
                    written,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if *write {
                println!("{} replacement(s) written to {}", replaced, name);
            } else {
                print!("{}", editor.document().text());
            }
        }
    }

    Ok(())
}

/// Start the search session and return the match count
fn start_search(editor: &mut Editor, run: &RunConfig, query: &str) -> usize {
    update(
        editor,
        Msg::Search(SearchMsg::Start {
            query: query.to_string(),
            options: run.options,
        }),
    );
    editor.search().matches_count()
}

fn print_matches(editor: &Editor, run: &RunConfig, query: &str) -> Result<()> {
    let matches = editor.search().matches();
    if run.json {
        let report = FindReport { query, matches };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for m in matches {
        // 1-based row/column like a spreadsheet status bar
        println!("{}:{}:{}: {}", m.row + 1, m.col + 1, m.position, m.text);
    }
    println!("{} match(es)", matches.len());
    Ok(())
}

fn print_summary(editor: &Editor, run: &RunConfig, name: &str) -> Result<()> {
    let Some(view) = editor.view() else {
        bail!("No grid for {}", name);
    };
    let delimiter = editor.separators().delimiter_or_default().char();
    let summary = Summary {
        file: name.to_string(),
        rows: view.row_count(),
        columns: view.column_count(),
        delimiter: if delimiter == '\t' {
            "\\t".to_string()
        } else {
            delimiter.to_string()
        },
        header: editor.header_mode(),
        fit_mode: editor.fit_mode().name(),
        titles: editor.columns().titles().to_vec(),
        widths: view.column_widths(),
        warnings: editor.warnings().iter().map(|w| w.to_string()).collect(),
    };

    if run.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{}: {} rows x {} columns, delimiter '{}'",
        summary.file, summary.rows, summary.columns, summary.delimiter
    );
    println!("fit mode: {}", summary.fit_mode);
    for (col, width) in summary.widths.iter().enumerate() {
        let title = summary
            .titles
            .get(col)
            .cloned()
            .flatten()
            .unwrap_or_else(|| csvgrid::csv::column_to_letters(col));
        println!("  {:<16} {:>7.1}", title, width);
    }
    for warning in &summary.warnings {
        println!("warning: {}", warning);
    }
    Ok(())
}
