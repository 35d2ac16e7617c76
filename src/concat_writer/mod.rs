// ffmpeg concat demuxer script
// https://ffmpeg.org/ffmpeg-formats.html#concat-1
// https://trac.ffmpeg.org/wiki/Concatenate

pub mod row;

use anyhow::{anyhow, Context, Error};
use csv::ReaderBuilder;

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use crate::{
    concat_writer::row::Row,
    state::Opt,
    timestamp::{concat_block, Timestamp},
};

#[derive(Debug, Clone, Copy, PartialEq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// file/inpoint/outpoint blocks for `ffmpeg -f concat`
    #[default]
    Concat,
    /// JSON array of clips with their offsets
    Json,
}

impl From<OutputFormat> for &str {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Concat => "concat",
            OutputFormat::Json => "json",
        }
    }
}

pub fn read_file(opt: &Opt) -> Result<Vec<Timestamp>, Error> {
    let file = File::open(&opt.input)
        .with_context(|| format!("Could not open input file {}", opt.input.display()))?;
    let ts_list = read_timestamps(file, opt.fuzz, opt.delimiter)
        .with_context(|| format!("Could not read clips from {}", opt.input.display()))?;
    log::info!(
        "Read {} clip(s) from {}",
        ts_list.len(),
        opt.input.display()
    );
    Ok(ts_list)
}

/// Read clip rows (after a header row) into timestamps, filling blank file names down
/// from the row above.
pub fn read_timestamps<R: Read>(
    mut source: R,
    fuzz: i64,
    delimiter: u8,
) -> Result<Vec<Timestamp>, Error> {
    let mut text = String::new();
    source.read_to_string(&mut text)?;
    if let Some(line) = blank_line(&text) {
        return Err(anyhow!("Malformed row at line {line}: blank line has no fields"));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut ts_list: Vec<Timestamp> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row: Row = record
            .deserialize(None)
            .with_context(|| format!("Malformed row at line {line}"))?;

        let file = match (row.has_file(), ts_list.last()) {
            (true, _) => row.file.as_str(),
            (false, Some(prev)) => prev.file.as_str(),
            (false, None) => {
                return Err(anyhow!(
                    "First row at line {line} must name a file, later rows may leave it blank"
                ))
            }
        };
        let ts = Timestamp::new(file, &row.start, &row.stop, &row.description, fuzz);
        log::debug!("line {line}: {} {} -> {}", ts.file, ts.start, ts.stop);
        ts_list.push(ts);
    }
    Ok(ts_list)
}

/// Render every clip in order. Nothing is returned unless every timestamp parses.
pub fn render(ts_list: &[Timestamp], format: OutputFormat) -> Result<String, Error> {
    let mut out = String::new();
    for (i, ts) in ts_list.iter().enumerate() {
        let (inpoint, outpoint) = ts
            .offsets()
            .with_context(|| format!("Could not render clip {} ({})", i + 1, ts.file))?;
        if inpoint >= outpoint {
            log::warn!(
                "Clip {} ({}) has inpoint {inpoint} at or after outpoint {outpoint}",
                i + 1,
                ts.file
            );
        }
        if format == OutputFormat::Concat {
            out.push_str(&concat_block(&ts.file, inpoint, outpoint));
        }
    }

    if format == OutputFormat::Json {
        out = serde_json::to_string_pretty(ts_list)?;
        out.push('\n');
    }
    Ok(out)
}

// csv skips empty lines, but a row with no fields is still malformed
fn blank_line(text: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut line_start = true;
    let mut line = 1;
    for c in text.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\n' if in_quotes => line += 1,
            '\n' if line_start => return Some(line),
            '\n' => {
                line += 1;
                line_start = true;
                continue;
            }
            '\r' => continue,
            _ => {}
        }
        line_start = false;
    }
    None
}

pub fn write_file(opt: &Opt, ts_list: &[Timestamp]) -> Result<(), Error> {
    let script = render(ts_list, opt.format)?;
    let mut file = ConcatFile::create(&opt.output)?;
    file.write_script(&script)?;
    log::info!(
        "Wrote {} clip(s) as {} to {}",
        ts_list.len(),
        <&str>::from(opt.format),
        opt.output.display()
    );
    Ok(())
}

#[derive(Debug)]
pub struct ConcatFile {
    file: BufWriter<File>,
    path: PathBuf,
}

impl ConcatFile {
    pub fn create(path: &Path) -> Result<Self, Error> {
        let file = File::create(path)
            .with_context(|| format!("Could not create output file {}", path.display()))?;
        Ok(ConcatFile {
            file: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn write_script(&mut self, script: &str) -> Result<(), Error> {
        self.file
            .write_all(script.as_bytes())
            .and_then(|_| self.file.flush())
            .with_context(|| format!("Could not write to {}", self.path.display()))
    }
}
