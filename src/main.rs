//! motion-replay
//!
//! Replays a recorded accelerometer trace through the motion pipeline and
//! prints one JSON activity record per emitted report.
//!
//! Input: one sample per line as `x,y,z` (commas or whitespace), `#` starts
//! a comment. Reads stdin when no file is given.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use motion_sensing::classifier::DebouncePolicy;
use motion_sensing::tracing_setup::{init_subscriber, Verbosity};
use motion_sensing::{MotionPipeline, PipelineConfig, RawSample};

#[derive(Debug, Parser)]
#[command(name = "motion-replay", version, about = "Replay accelerometer samples through the activity pipeline")]
struct Cli {
    /// Sample file (`x,y,z` per line). Reads stdin when omitted.
    input: Option<PathBuf>,

    /// TOML pipeline configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only commit an activity change after the debounce counter agrees.
    #[arg(long)]
    gated: bool,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,

    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet), cli.no_color)?;

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if cli.gated {
        config.classifier.policy = DebouncePolicy::Gated;
    }
    let mut pipeline = MotionPipeline::try_new(config)?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let mut out = BufWriter::new(io::stdout().lock());
    let mut reports = 0u64;

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("reading samples")?;
        let Some(sample) = parse_line(&line).with_context(|| format!("line {}", index + 1))? else {
            continue;
        };
        if let Some(report) = pipeline.ingest(&sample) {
            serde_json::to_writer(&mut out, &report)?;
            writeln!(out)?;
            reports += 1;
        }
    }
    out.flush()?;

    info!(
        samples = pipeline.total_samples(),
        reports,
        steps = pipeline.step_count(),
        activity = %pipeline.activity(),
        "replay finished"
    );
    Ok(())
}

/// Parse one input line. Blank and comment lines yield `None`.
fn parse_line(line: &str) -> Result<Option<RawSample>> {
    let content = line.split('#').next().unwrap_or("").trim();
    if content.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = content
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect();
    if fields.len() != 3 {
        bail!("expected 3 axes, found {}", fields.len());
    }

    let mut axes = [0.0f64; 3];
    for (axis, field) in axes.iter_mut().zip(&fields) {
        *axis = field
            .parse()
            .with_context(|| format!("invalid number '{field}'"))?;
    }
    Ok(Some(RawSample::from(axes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_and_space_separated() {
        assert_eq!(
            parse_line("0.1, 0.2, 9.8").unwrap(),
            Some(RawSample::new(0.1, 0.2, 9.8))
        );
        assert_eq!(
            parse_line("1 2\t3").unwrap(),
            Some(RawSample::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # walking starts").unwrap(), None);
        assert_eq!(
            parse_line("0,0,13 # heel strike").unwrap(),
            Some(RawSample::new(0.0, 0.0, 13.0))
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("1,2").is_err());
        assert!(parse_line("1,2,three").is_err());
        assert!(parse_line("1,2,3,4").is_err());
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["motion-replay", "--gated", "-v", "trace.csv"]);
        assert!(cli.gated);
        assert!(cli.verbose);
        assert_eq!(cli.input, Some(PathBuf::from("trace.csv")));
    }
}
