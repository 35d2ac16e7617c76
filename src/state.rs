use anyhow::{Context, Error};
use clap::Parser;
use log::LevelFilter;

use std::path::PathBuf;

use crate::concat_writer::OutputFormat;

/// Convert .csv to .txt for use with ffmpeg -f concat
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Table of clips with a header row: file, start, stop, description
    pub input: Option<PathBuf>,

    /// Output file to write ffmpeg timestamps to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds of fuzz to add to each end of every clip (defaults to 0)
    #[arg(short, long, allow_negative_numbers = true)]
    pub fuzz: Option<i64>,

    /// Field delimiter of the input table
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Concat)]
    pub format: OutputFormat,

    /// Log every clip as it is read
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn configure(self) -> Result<Opt, Error> {
        let input = self.input.context("No input file provided")?;
        let output = self
            .output
            .context("No output file provided, use -o/--output")?;
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| {
                format!(
                    "Delimiter '{}' must be a single ASCII character",
                    self.delimiter
                )
            })?;
        let log_level = match (self.verbose, self.quiet) {
            (true, _) => LevelFilter::Debug,
            (false, true) => LevelFilter::Error,
            (false, false) => LevelFilter::Info,
        };

        Ok(Opt {
            fuzz: self.fuzz.unwrap_or(0),
            format: self.format,
            input,
            output,
            delimiter,
            log_level,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Opt {
    pub input: PathBuf,
    pub output: PathBuf,
    pub fuzz: i64,
    pub delimiter: u8,
    pub format: OutputFormat,
    pub log_level: LevelFilter,
}

pub struct Logger;

impl Logger {
    // a second init (e.g. across tests) keeps the first logger
    pub fn init(level: LevelFilter) {
        if log::set_logger(&Logger).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            match record.level() {
                log::Level::Error | log::Level::Warn => eprintln!("{}", record.args()),
                _ => println!("{}", record.args()),
            };
        }
    }

    fn flush(&self) {}
}
