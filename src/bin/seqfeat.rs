//! Seqfeat CLI - Command-line interface for Seqfeat
//!
//! Commands:
//! - transform: Extract a feature CSV from a capture file
//! - validate: Check a capture file record by record
//! - schema: Print input/output schema information
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use seqfeat::pipeline::SeqfeatProcessor;
use seqfeat::reader::split_lines;
use seqfeat::types::{FeatureTable, SymbolPolicy};
use seqfeat::{ExtractError, FeatureExtractor, PRODUCER_NAME, SEQFEAT_VERSION};

/// Seqfeat - Featurize labeled symbol-sequence captures
#[derive(Parser)]
#[command(name = "seqfeat")]
#[command(version = SEQFEAT_VERSION)]
#[command(about = "Extract digit-proportion feature tables from capture files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a feature CSV from a capture file
    Transform {
        /// Input capture file path (use - for stdin)
        #[arg(short, long, default_value = seqfeat::DEFAULT_INPUT_PATH)]
        input: PathBuf,

        /// Output CSV path (use - for stdout)
        #[arg(short, long, default_value = seqfeat::DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Reject symbol tokens outside "0".."7" instead of folding them
        /// into the catch-all bucket
        #[arg(long)]
        strict: bool,

        /// Print a run summary to stderr after writing the output
        #[arg(long)]
        summary: bool,
    },

    /// Check a capture file record by record
    Validate {
        /// Input capture file path (use - for stdin)
        #[arg(short, long, default_value = seqfeat::DEFAULT_INPUT_PATH)]
        input: PathBuf,

        /// Also reject symbol tokens outside "0".."7"
        #[arg(long)]
        strict: bool,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Capture file to check
        #[arg(short, long, default_value = seqfeat::DEFAULT_INPUT_PATH)]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaType {
    /// Input capture record format
    Input,
    /// Output feature table layout
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SeqfeatCliError> {
    match cli.command {
        Commands::Transform {
            input,
            output,
            strict,
            summary,
        } => cmd_transform(&input, &output, policy_for(strict), summary),

        Commands::Validate {
            input,
            strict,
            json,
        } => cmd_validate(&input, policy_for(strict), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),

        Commands::Doctor { input, json } => cmd_doctor(&input, json),
    }
}

fn policy_for(strict: bool) -> SymbolPolicy {
    if strict {
        SymbolPolicy::Strict
    } else {
        SymbolPolicy::CatchAll
    }
}

fn cmd_transform(
    input: &Path,
    output: &Path,
    policy: SymbolPolicy,
    summary: bool,
) -> Result<(), SeqfeatCliError> {
    let processor = SeqfeatProcessor::new(policy);

    let run_summary = match (
        input.to_string_lossy() == "-",
        output.to_string_lossy() == "-",
    ) {
        (true, true) => {
            let stdout = io::stdout();
            processor.process_lines_to_writer(read_stdin_lines()?, stdout.lock())?
        }
        (true, false) => {
            let file = fs::File::create(output)?;
            processor.process_lines_to_writer(read_stdin_lines()?, file)?
        }
        (false, true) => {
            let stdout = io::stdout();
            processor.process_to_writer(input, stdout.lock())?
        }
        (false, false) => processor.process_file(input, output)?,
    };

    if summary {
        eprintln!("{}", serde_json::to_string(&run_summary)?);
    }

    Ok(())
}

fn cmd_validate(input: &Path, policy: SymbolPolicy, json: bool) -> Result<(), SeqfeatCliError> {
    let lines = if input.to_string_lossy() == "-" {
        read_stdin_lines()?
    } else {
        fs::read_to_string(input).map(|s| split_lines(&s))?
    };

    let extractor = FeatureExtractor::new(policy);
    let mut errors: Vec<ValidationErrorDetail> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if let Err(e) = extractor.extract_line(i + 1, line) {
            errors.push(ValidationErrorDetail {
                line: i + 1,
                error: e.to_string(),
            });
        }
    }

    let report = ValidationReport {
        policy: policy.as_str().to_string(),
        total_records: lines.len(),
        valid_records: lines.len() - errors.len(),
        invalid_records: errors.len(),
        computed_at_utc: chrono::Utc::now().to_rfc3339(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Policy:          {}", report.policy);
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - line {}: {}", err.line, err.error);
            }
        }
    }

    if report.invalid_records > 0 {
        Err(SeqfeatCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), SeqfeatCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", input_json_schema());
            } else {
                println!("Input: capture file, one record per line");
                println!();
                println!("  <label> <sym_1> <sym_2> ... <sym_n>");
                println!();
                println!("- label: integer, copied to the output verbatim");
                println!("- sym_i: symbol code; \"0\"..\"6\" count into their own bucket,");
                println!("  anything else folds into bucket 7 (default policy)");
                println!("- tokens are separated by single spaces");
                println!("- a record must carry at least one symbol token");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", output_json_schema());
            } else {
                println!("Output: feature CSV, one row per input record");
                println!();
                println!("Columns, in order:");
                for column in FeatureTable::columns() {
                    if column.is_empty() {
                        println!("  - (unnamed): 0-based row index");
                    } else if column == "label" {
                        println!("  - label: integer record label");
                    } else {
                        println!("  - {column}: bucket proportion, rounded to 3 decimals");
                    }
                }
                println!();
                println!("Each row's eight proportions sum to 1.0 up to rounding.");
            }
        }
    }

    Ok(())
}

fn cmd_doctor(input: &Path, json: bool) -> Result<(), SeqfeatCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "seqfeat_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Seqfeat version {}", SEQFEAT_VERSION),
    });

    checks.push(DoctorCheck {
        name: "output_schema".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} output columns", FeatureTable::columns().len()),
    });

    if input.to_string_lossy() == "-" {
        checks.push(DoctorCheck {
            name: "capture_file".to_string(),
            status: CheckStatus::Ok,
            message: "Reading from stdin".to_string(),
        });
    } else if input.exists() {
        match fs::read_to_string(input) {
            Ok(contents) => {
                checks.push(DoctorCheck {
                    name: "capture_file".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "{} readable ({} records)",
                        input.display(),
                        split_lines(&contents).len()
                    ),
                });
            }
            Err(e) => {
                checks.push(DoctorCheck {
                    name: "capture_file".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read {}: {}", input.display(), e),
                });
            }
        }
    } else {
        checks.push(DoctorCheck {
            name: "capture_file".to_string(),
            status: CheckStatus::Warning,
            message: format!("{} does not exist", input.display()),
        });
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (streaming input ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: SEQFEAT_VERSION.to_string(),
        computed_at_utc: chrono::Utc::now().to_rfc3339(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Seqfeat Doctor Report");
        println!("=====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(SeqfeatCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_stdin_lines() -> Result<Vec<String>, SeqfeatCliError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(split_lines(&buffer))
}

fn input_json_schema() -> String {
    serde_json::json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "seqfeat.capture.v1",
        "description": "One record per line: integer label, then symbol codes",
        "type": "object",
        "properties": {
            "label": { "type": "integer" },
            "symbols": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1
            }
        },
        "required": ["label", "symbols"]
    })
    .to_string()
}

fn output_json_schema() -> String {
    let proportion_columns: Vec<serde_json::Value> = FeatureTable::columns()
        .iter()
        .filter(|c| c.ends_with("_Proportion"))
        .map(|c| serde_json::json!({ "name": c, "type": "number" }))
        .collect();

    serde_json::json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "seqfeat.features.v1",
        "description": "Feature CSV: row index, eight proportions, label",
        "columns": {
            "index": { "type": "integer", "description": "0-based row index" },
            "proportions": proportion_columns,
            "label": { "type": "integer" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum SeqfeatCliError {
    Io(io::Error),
    Extract(ExtractError),
    Json(serde_json::Error),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for SeqfeatCliError {
    fn from(e: io::Error) -> Self {
        SeqfeatCliError::Io(e)
    }
}

impl From<ExtractError> for SeqfeatCliError {
    fn from(e: ExtractError) -> Self {
        SeqfeatCliError::Extract(e)
    }
}

impl From<serde_json::Error> for SeqfeatCliError {
    fn from(e: serde_json::Error) -> Self {
        SeqfeatCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SeqfeatCliError> for CliError {
    fn from(e: SeqfeatCliError) -> Self {
        match e {
            SeqfeatCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            SeqfeatCliError::Extract(e) => CliError {
                code: "EXTRACT_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'seqfeat validate' to locate malformed records".to_string()),
            },
            SeqfeatCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            SeqfeatCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix the listed records and retry".to_string()),
            },
            SeqfeatCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    policy: String,
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    computed_at_utc: String,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    line: usize,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    computed_at_utc: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
