//! Replay command - classify a recorded track through the flight computer.
//!
//! Every fused sample is published on a [`LocationUpdates`] hub that a
//! running [`FlightComputer`] is subscribed to, the same path live samples
//! take. Publishing is paced in batches no larger than the phase change
//! buffer so every transition is collected.

use std::fmt::Write as _;
use std::path::PathBuf;

use skyfuse::flight::{
    ClassificationPolicy, FlightComputer, FlightPhase, LocationUpdates, PhaseChange,
};
use skyfuse::measurement::FusedLocation;
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::common::{format_duration, format_time, resolve_policy, PolicyArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub file: PathBuf,
    pub policy: Option<PolicyArg>,
    pub debug: bool,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("replay");

    let config = runner.config();
    let policy = resolve_policy(args.policy, config);
    let track = runner.load_track(&args.file)?;

    let runtime = runner.runtime()?;
    let report = runtime.block_on(replay(
        &track.samples,
        policy,
        config.replay.channel_capacity,
    ));

    println!("Track: {}", args.file.display());
    print!("{}", render_report(&report));
    Ok(())
}

/// Outcome of replaying one track.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub policy: ClassificationPolicy,
    pub samples: usize,
    pub classified: u64,
    pub transitions: Vec<PhaseChange>,
    pub final_phase: FlightPhase,
    pub summary: PhaseSummary,
}

/// Publish `samples` into a running flight computer and collect its phase changes.
pub async fn replay(
    samples: &[FusedLocation],
    policy: ClassificationPolicy,
    channel_capacity: usize,
) -> ReplayReport {
    let capacity = channel_capacity.max(1);
    let updates = LocationUpdates::new();
    let mut computer = FlightComputer::builder()
        .policy(policy)
        .change_capacity(capacity)
        .build();
    let mut changes = computer.subscribe_changes();
    let mut transitions = Vec::new();

    computer.start(&updates);

    // One sample causes at most one change, so a batch never overflows the change buffer
    let mut published = 0u64;
    for chunk in samples.chunks(capacity) {
        for sample in chunk {
            updates.publish(*sample);
        }
        published += chunk.len() as u64;
        wait_for_applied(&computer, published).await;
        drain_changes(&mut changes, &mut transitions);
    }

    // Closing the hub ends the receive loop once the backlog is consumed
    drop(updates);
    computer.join().await;
    drain_changes(&mut changes, &mut transitions);

    let summary = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => {
            PhaseSummary::from_transitions(first.millis, last.millis, &transitions)
        }
        _ => PhaseSummary::default(),
    };

    tracing::info!(
        samples = samples.len(),
        classified = computer.samples_applied(),
        transitions = transitions.len(),
        final_phase = %computer.phase(),
        "Replay finished"
    );

    ReplayReport {
        policy,
        samples: samples.len(),
        classified: computer.samples_applied(),
        transitions,
        final_phase: computer.phase(),
        summary,
    }
}

async fn wait_for_applied(computer: &FlightComputer, published: u64) {
    while computer.is_running() && computer.samples_applied() < published {
        tokio::task::yield_now().await;
    }
}

fn drain_changes(rx: &mut broadcast::Receiver<PhaseChange>, out: &mut Vec<PhaseChange>) {
    loop {
        match rx.try_recv() {
            Ok(change) => out.push(change),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Phase change receiver lagged");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

/// Time spent in each phase, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseSummary {
    millis: [i64; FlightPhase::ALL.len()],
}

impl PhaseSummary {
    /// Rebuild the timeline from phase changes.
    ///
    /// The track starts in `Unknown`; each phase lasts until the next change
    /// and the last one until `end_millis`. Out-of-order timestamps never
    /// produce negative durations.
    pub fn from_transitions(start_millis: i64, end_millis: i64, changes: &[PhaseChange]) -> Self {
        let mut summary = Self::default();
        let mut current = FlightPhase::Unknown;
        let mut since = start_millis;

        for change in changes {
            summary.add(current, change.millis - since);
            current = change.to;
            since = change.millis;
        }
        summary.add(current, end_millis - since);

        summary
    }

    fn add(&mut self, phase: FlightPhase, millis: i64) {
        self.millis[u8::from(phase) as usize] += millis.max(0);
    }

    /// Seconds spent in `phase`.
    pub fn seconds(&self, phase: FlightPhase) -> f64 {
        self.millis[u8::from(phase) as usize] as f64 / 1000.0
    }

    /// Phases with a non-zero duration, in declaration order.
    pub fn phases(&self) -> impl Iterator<Item = (FlightPhase, f64)> + '_ {
        FlightPhase::ALL
            .into_iter()
            .map(|phase| (phase, self.seconds(phase)))
            .filter(|(_, secs)| *secs > 0.0)
    }
}

/// Human-readable replay report.
pub fn render_report(report: &ReplayReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Replayed {} samples ({} classified, policy: {})",
        report.samples, report.classified, report.policy
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Phase transitions ({}):", report.transitions.len());
    for change in &report.transitions {
        let _ = writeln!(
            out,
            "  {}  {} -> {}",
            format_time(change.millis),
            change.from,
            change.to
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Time in phase:");
    for (phase, secs) in report.summary.phases() {
        let _ = writeln!(out, "  {:<10} {}", phase.to_string(), format_duration(secs));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Final phase: {}", report.final_phase);
    out
}
