//! Replace text in a PDF
//!
//! Usage:
//!   pdf_retext input.pdf --edit "ACME Corp=Globex Inc"
//!   pdf_retext input.pdf -o out.pdf --edits edits.json --scale 3
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for details.

use pdf_retext::edit::{parse_edit_list, parse_edit_pair};
use pdf_retext::{replace_text_with_config, Edit, MatchOutcome, ReplaceConfig, ReplaceReport};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "Usage: pdf_retext <input.pdf> [-o <output.pdf>] (--edit FIND=REPLACE)... \
[--edits edits.json] [--scale N] [--min-font-size N] [-v]";

struct CliConfig {
    input: PathBuf,
    output: PathBuf,
    edits: Vec<Edit>,
    replace: ReplaceConfig,
    verbose: bool,
}

impl CliConfig {
    fn from_args(args: &[String]) -> Result<Self, String> {
        let mut input = None;
        let mut output = None;
        let mut edits = Vec::new();
        let mut replace = ReplaceConfig::default();
        let mut verbose = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "-o" | "--output" => {
                    output = Some(PathBuf::from(value(args, &mut i)?));
                },
                "--edit" => {
                    let edit = parse_edit_pair(value(args, &mut i)?).map_err(|e| e.to_string())?;
                    edits.push(edit);
                },
                "--edits" => {
                    let path = value(args, &mut i)?;
                    let json = fs::read_to_string(path)
                        .map_err(|e| format!("cannot read {}: {}", path, e))?;
                    edits.extend(parse_edit_list(&json).map_err(|e| e.to_string())?);
                },
                "--scale" => {
                    replace = replace.with_render_scale(number(args, &mut i)?);
                },
                "--min-font-size" => {
                    replace = replace.with_min_font_size(number(args, &mut i)?);
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                arg if arg.starts_with('-') => {
                    return Err(format!("unknown option '{}'", arg));
                },
                arg => {
                    if input.is_some() {
                        return Err(format!("unexpected argument '{}'", arg));
                    }
                    input = Some(PathBuf::from(arg));
                },
            }
            i += 1;
        }

        let input = input.ok_or("missing input file")?;
        let output = output.unwrap_or_else(|| default_output(&input));
        Ok(Self {
            input,
            output,
            edits,
            replace,
            verbose,
        })
    }
}

fn value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn number(args: &[String], i: &mut usize) -> Result<f32, String> {
    let raw = value(args, i)?;
    raw.parse()
        .map_err(|_| format!("'{}' is not a number", raw))
}

/// `report.pdf` becomes `report-edited.pdf` next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}-edited.pdf", stem))
}

fn print_details(report: &ReplaceReport, edits: &[Edit]) {
    for page in &report.pages {
        if page.skipped {
            println!("  page {}: skipped (not renderable)", page.page + 1);
            continue;
        }
        for (edit_index, outcome) in &page.outcomes {
            let find = edits.get(*edit_index).map(|e| e.find.as_str()).unwrap_or("?");
            let status = match outcome {
                MatchOutcome::Mutated {
                    font, font_size, ..
                } => format!("replaced ({:?}, {:.1}pt)", font, font_size),
                MatchOutcome::RejectedRotated { .. } => "rejected: rotated text".to_string(),
                MatchOutcome::RejectedDegenerate { .. } => "rejected: empty box".to_string(),
                MatchOutcome::RejectedTooSmall { font_size, .. } => {
                    format!("rejected: would need {:.1}pt", font_size)
                },
                MatchOutcome::NoMatch => continue,
            };
            println!("  page {}: '{}' {}", page.page + 1, find, status);
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match CliConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        },
    };
    if config.edits.is_empty() {
        eprintln!("Error: no edits given");
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }

    let input = match fs::read(&config.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        },
    };

    let (output, report) = match replace_text_with_config(&input, &config.edits, &config.replace) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = fs::write(&config.output, output) {
        eprintln!("Error writing {}: {}", config.output.display(), e);
        return ExitCode::FAILURE;
    }

    if config.verbose {
        print_details(&report, &config.edits);
    }
    println!(
        "{} replaced, {} rejected, {} pages skipped -> {}",
        report.mutated_count(),
        report.rejected_count(),
        report.skipped_pages().len(),
        config.output.display()
    );
    ExitCode::SUCCESS
}
