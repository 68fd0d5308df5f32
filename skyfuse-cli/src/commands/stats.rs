//! Stats command - summarize a track file.

use std::fmt::Write as _;
use std::path::PathBuf;

use skyfuse::track::{ParsedTrack, TrackStats};

use super::common::{format_duration, format_time};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the stats command.
pub struct StatsArgs {
    pub file: PathBuf,
}

/// Run the stats command.
pub fn run(args: StatsArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("stats");

    let track = runner.load_track(&args.file)?;
    let stats = TrackStats::from_samples(&track.samples);

    println!("Track: {}", args.file.display());
    print!("{}", render_stats(&stats, &track));
    Ok(())
}

/// Human-readable track statistics.
pub fn render_stats(stats: &TrackStats, track: &ParsedTrack) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "  Samples:   {}", stats.sample_count);
    if track.dropped_rows > 0 {
        let _ = writeln!(out, "  Dropped:   {} rows", track.dropped_rows);
    }
    if let Some(start) = stats.start_millis {
        let _ = writeln!(out, "  Start:     {}", format_time(start));
    }
    if let Some(end) = stats.end_millis {
        let _ = writeln!(out, "  End:       {}", format_time(end));
    }
    if let Some(duration) = stats.duration_secs() {
        let _ = writeln!(out, "  Duration:  {}", format_duration(duration));
    }
    let _ = writeln!(out, "  Altitude:  {} m", stats.altitude);
    match &stats.bounds {
        Some(bounds) => {
            let _ = writeln!(
                out,
                "  Bounds:    {:.5},{:.5} .. {:.5},{:.5}",
                bounds.south, bounds.west, bounds.north, bounds.east
            );
        }
        None => {
            let _ = writeln!(out, "  Bounds:    -");
        }
    }
    if !track.is_complete() {
        let _ = writeln!(out, "  Status:    incomplete (read stopped early)");
    }

    out
}
