//! Vitals CLI - Command-line interface for the vital trend engine
//!
//! Commands:
//! - analyze: run trend, range, and shift analysis over a history file
//! - vitals: list the supported vital types and their metadata
//! - schema: print an example input document

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use chrono::NaiveDate;
use vital_trend::report::TrendReportEncoder;
use vital_trend::types::{DailyVitalsSummary, Demographics, Sex, TrendPeriod, VitalType};
use vital_trend::{catalog, ENGINE_VERSION};

/// Vitals - on-device analysis of vital-sign trends and baseline shifts
#[derive(Parser)]
#[command(name = "vitals")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Analyze daily vital-sign summaries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run trend, range, and shift analysis over a history file
    Analyze {
        /// Input file path: JSON array of daily summaries (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Vital type id (e.g. heart_rate, spo2)
        #[arg(long)]
        vital: String,

        /// Trend period
        #[arg(long, default_value = "month")]
        period: String,

        /// Reference day (YYYY-MM-DD); defaults to the newest record date
        #[arg(long)]
        today: Option<String>,

        /// Age in years, for age-banded generic ranges
        #[arg(long)]
        age: Option<u32>,

        /// Sex, for generic range lookup
        #[arg(long, value_enum)]
        sex: Option<SexArg>,

        /// Output format; defaults to pretty on a terminal
        #[arg(long)]
        output_format: Option<OutputFormat>,
    },

    /// List the supported vital types and their metadata
    Vitals,

    /// Print an example input document
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum SexArg {
    Female,
    Male,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            vital,
            period,
            today,
            age,
            sex,
            output_format,
        } => cmd_analyze(input, vital, period, today, age, sex, output_format),
        Commands::Vitals => cmd_vitals(),
        Commands::Schema => cmd_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_analyze(
    input: PathBuf,
    vital: String,
    period: String,
    today: Option<String>,
    age: Option<u32>,
    sex: Option<SexArg>,
    output_format: Option<OutputFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_input(&input)?;
    let history: Vec<DailyVitalsSummary> = serde_json::from_str(&raw)?;

    let vital = VitalType::from_str(&vital)?;
    let period = TrendPeriod::from_str(&period)?;

    let today = match today {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")?,
        None => history
            .iter()
            .filter(|s| s.vital == vital)
            .map(|s| s.date)
            .max()
            .ok_or("history contains no records for the requested vital")?,
    };

    let demographics = Demographics {
        age_years: age,
        sex: sex.map(|s| match s {
            SexArg::Female => Sex::Female,
            SexArg::Male => Sex::Male,
        }),
    };

    let encoder = TrendReportEncoder::new();
    let report = encoder.evaluate(&history, vital, period, &demographics, today);

    // Pretty on a terminal, compact when piped
    let pretty = match output_format {
        Some(OutputFormat::Json) => false,
        Some(OutputFormat::JsonPretty) => true,
        None => atty::is(atty::Stream::Stdout),
    };

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{json}")?;
    Ok(())
}

fn cmd_vitals() -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for vital in VitalType::ALL {
        let range = catalog::generic_range(vital, &Demographics::adult());
        writeln!(
            out,
            "{:<18} {:<28} {:<12} adult range {} - {}",
            vital.as_str(),
            catalog::display_name(vital),
            catalog::unit(vital),
            catalog::format_value(vital, range.low),
            catalog::format_value(vital, range.high),
        )?;
    }
    Ok(())
}

fn cmd_schema() -> Result<(), Box<dyn std::error::Error>> {
    let example = vec![
        DailyVitalsSummary::single(
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            VitalType::HeartRate,
            72.0,
        ),
        DailyVitalsSummary::aggregate(
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            VitalType::HeartRate,
            3,
            66.0,
            78.0,
            71.0,
            Some(6.1),
        )?,
    ];

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", serde_json::to_string_pretty(&example)?)?;
    Ok(())
}

fn read_input(path: &Path) -> Result<String, io::Error> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}
