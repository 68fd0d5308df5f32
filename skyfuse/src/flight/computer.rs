//! Flight computer: live phase classification over a sample subscription.
//!
//! # States
//!
//! ```text
//!            start(source)
//!  Stopped ─────────────────► Running
//!     ▲                          │
//!     └──────── stop() ──────────┘
//! ```
//!
//! While running, a background task receives every published sample,
//! classifies it, stores the phase and forwards the sample to the landing
//! detector. Samples queue per subscriber, so none are skipped when the
//! task falls behind. `stop()` waits for the task to exit before stopping
//! the landing detector. The stored phase survives until the next sample.
//!
//! # Usage
//!
//! ```ignore
//! use skyfuse::flight::{FlightComputer, LocationUpdates};
//!
//! let updates = LocationUpdates::default();
//! let mut computer = FlightComputer::new();
//! computer.start(&updates);
//!
//! updates.publish(sample);
//! println!("{}", computer.phase_label());
//!
//! computer.stop().await;
//! ```

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::classifier::{ClassificationPolicy, FlightPhaseClassifier};
use super::phase::FlightPhase;
use super::provider::{
    AerodynamicStateProvider, LandingDetector, LocationBroadcaster, NoAerodynamics,
    NoopLandingDetector, DEFAULT_CHANNEL_CAPACITY,
};
use crate::measurement::FusedLocation;

/// A change of the current flight phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// Timestamp of the sample that caused the change (epoch ms).
    pub millis: i64,
    pub from: FlightPhase,
    pub to: FlightPhase,
}

/// State shared between the computer handle and its receive task.
struct Shared {
    classifier: FlightPhaseClassifier,
    aerodynamics: Arc<dyn AerodynamicStateProvider>,
    landing: Arc<dyn LandingDetector>,
    phase: AtomicU8,
    applied: AtomicU64,
    changes: broadcast::Sender<PhaseChange>,
}

impl Shared {
    fn apply(&self, location: &FusedLocation) -> FlightPhase {
        let aerodynamics = self.aerodynamics.cached_predicted_state(location.millis);
        let phase = self
            .classifier
            .classify_location(location, aerodynamics.as_ref());

        let previous = FlightPhase::from_u8(self.phase.swap(phase.into(), Ordering::AcqRel));
        if previous != phase {
            tracing::debug!(
                millis = location.millis,
                from = %previous,
                to = %phase,
                "Flight phase changed"
            );
            // No subscribers is fine
            let _ = self.changes.send(PhaseChange {
                millis: location.millis,
                from: previous,
                to: phase,
            });
        }

        self.landing.update(location);
        self.applied.fetch_add(1, Ordering::Release);
        phase
    }
}

/// Builder-style configuration for [`FlightComputer`].
pub struct FlightComputerBuilder {
    policy: ClassificationPolicy,
    aerodynamics: Arc<dyn AerodynamicStateProvider>,
    landing: Arc<dyn LandingDetector>,
    change_capacity: usize,
}

impl Default for FlightComputerBuilder {
    fn default() -> Self {
        Self {
            policy: ClassificationPolicy::default(),
            aerodynamics: Arc::new(NoAerodynamics),
            landing: Arc::new(NoopLandingDetector),
            change_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl FlightComputerBuilder {
    pub fn policy(mut self, policy: ClassificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn aerodynamics(mut self, provider: Arc<dyn AerodynamicStateProvider>) -> Self {
        self.aerodynamics = provider;
        self
    }

    pub fn landing_detector(mut self, detector: Arc<dyn LandingDetector>) -> Self {
        self.landing = detector;
        self
    }

    /// Capacity of the phase change channel.
    pub fn change_capacity(mut self, capacity: usize) -> Self {
        self.change_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> FlightComputer {
        let (changes, _rx) = broadcast::channel(self.change_capacity);
        FlightComputer {
            shared: Arc::new(Shared {
                classifier: FlightPhaseClassifier::with_policy(self.policy),
                aerodynamics: self.aerodynamics,
                landing: self.landing,
                phase: AtomicU8::new(FlightPhase::Unknown.into()),
                applied: AtomicU64::new(0),
                changes,
            }),
            cancellation: None,
            task: None,
        }
    }
}

/// Classifies live samples and holds the current flight phase.
pub struct FlightComputer {
    shared: Arc<Shared>,
    cancellation: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl FlightComputer {
    /// Computer with the canopy-only policy and no collaborators.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> FlightComputerBuilder {
        FlightComputerBuilder::default()
    }

    /// Subscribe to `source` and start classifying in a background task.
    ///
    /// Must be called from within a tokio runtime. Calling `start` while
    /// already running is a no-op.
    pub fn start(&mut self, source: &dyn LocationBroadcaster) {
        if self.is_running() {
            tracing::warn!("Flight computer already running");
            return;
        }

        let mut rx = source.subscribe();
        let cancellation = CancellationToken::new();
        let token = cancellation.clone();
        let shared = Arc::clone(&self.shared);

        shared.landing.start();
        tracing::info!(policy = %shared.classifier.policy(), "Flight computer started");

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        break;
                    }
                    received = rx.recv() => {
                        match received {
                            Some(location) => {
                                shared.apply(&location);
                            }
                            None => {
                                tracing::debug!("Location source closed");
                                break;
                            }
                        }
                    }
                }
            }
        });

        self.cancellation = Some(cancellation);
        self.task = Some(task);
    }

    /// Unsubscribe and stop the landing detector. The current phase is kept.
    ///
    /// Waits for the receive task to exit, so a sample being applied when
    /// `stop` is called finishes before the landing detector is stopped.
    /// Samples still queued are discarded.
    pub async fn stop(&mut self) {
        let Some(cancellation) = self.cancellation.take() else {
            return;
        };
        cancellation.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Flight computer task failed");
            }
        }
        self.shared.landing.stop();
        tracing::info!(
            phase = %self.phase(),
            samples = self.samples_applied(),
            "Flight computer stopped"
        );
    }

    /// Wait until the source closes, then stop.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Flight computer task failed");
            }
        }
        self.stop().await;
    }

    /// Classify one sample synchronously.
    ///
    /// Same effect as a received sample: stores the phase and forwards the
    /// sample to the landing detector.
    pub fn apply(&self, location: &FusedLocation) -> FlightPhase {
        self.shared.apply(location)
    }

    /// Whether the receive task is alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Current phase. May trail the newest published sample.
    pub fn phase(&self) -> FlightPhase {
        FlightPhase::from_u8(self.shared.phase.load(Ordering::Acquire))
    }

    /// Human readable label for the current phase; empty for `Unknown`.
    pub fn phase_label(&self) -> &'static str {
        self.phase().label()
    }

    /// Number of samples classified so far.
    pub fn samples_applied(&self) -> u64 {
        self.shared.applied.load(Ordering::Acquire)
    }

    /// Subscribe to phase changes.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<PhaseChange> {
        self.shared.changes.subscribe()
    }

    pub fn policy(&self) -> ClassificationPolicy {
        self.shared.classifier.policy()
    }
}

impl Default for FlightComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FlightComputer {
    fn drop(&mut self) {
        if let Some(cancellation) = self.cancellation.take() {
            cancellation.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::provider::{FixedAerodynamics, LocationUpdates};
    use crate::measurement::AerodynamicState;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingDetector {
        started: AtomicUsize,
        stopped: AtomicUsize,
        seen: Mutex<Vec<i64>>,
    }

    impl LandingDetector for RecordingDetector {
        fn start(&self) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn update(&self, location: &FusedLocation) {
            self.seen.lock().unwrap().push(location.millis);
        }

        fn stop(&self) {
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sample(millis: i64, ground_speed: f64, climb: f64) -> FusedLocation {
        FusedLocation {
            millis,
            latitude: 47.0,
            longitude: 8.0,
            altitude: 2000.0,
            climb,
            vel_north: ground_speed,
            vel_east: 0.0,
        }
    }

    async fn wait_for(computer: &FlightComputer, applied: u64) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while computer.samples_applied() < applied {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("samples should be applied");
    }

    #[test]
    fn test_initial_state() {
        let computer = FlightComputer::new();

        assert!(!computer.is_running());
        assert_eq!(computer.phase(), FlightPhase::Unknown);
        assert_eq!(computer.phase_label(), "");
        assert_eq!(computer.policy(), ClassificationPolicy::CanopyOnly);
    }

    #[test]
    fn test_apply_updates_phase_and_forwards() {
        let detector = Arc::new(RecordingDetector::default());
        let computer = FlightComputer::builder()
            .landing_detector(detector.clone())
            .build();

        assert_eq!(computer.apply(&sample(1, 40.0, 0.0)), FlightPhase::Plane);
        assert_eq!(computer.phase_label(), "Plane");
        assert_eq!(computer.apply(&sample(2, 0.0, 1.0)), FlightPhase::Ground);

        assert_eq!(*detector.seen.lock().unwrap(), vec![1, 2]);
        assert_eq!(computer.samples_applied(), 2);
    }

    #[test]
    fn test_aerodynamics_queried_for_canopy() {
        let computer = FlightComputer::builder()
            .aerodynamics(Arc::new(FixedAerodynamics(AerodynamicState::new(
                0.01, 0.01, 0,
            ))))
            .build();

        // Too fast for the basic canopy envelope, sustained pair says canopy
        assert_eq!(computer.apply(&sample(1, 30.0, -3.0)), FlightPhase::Canopy);
    }

    #[test]
    fn test_phase_changes_broadcast() {
        let computer = FlightComputer::new();
        let mut changes = computer.subscribe_changes();

        computer.apply(&sample(1, 40.0, 0.0));
        computer.apply(&sample(2, 40.0, 0.0));
        computer.apply(&sample(3, 10.0, -25.0));

        let first = changes.try_recv().expect("first change");
        assert_eq!(
            first,
            PhaseChange {
                millis: 1,
                from: FlightPhase::Unknown,
                to: FlightPhase::Plane
            }
        );
        let second = changes.try_recv().expect("second change");
        assert_eq!(second.to, FlightPhase::Freefall);
        assert!(changes.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_start_classifies_published_samples() {
        let detector = Arc::new(RecordingDetector::default());
        let updates = LocationUpdates::new();
        let mut computer = FlightComputer::builder()
            .landing_detector(detector.clone())
            .build();

        computer.start(&updates);
        assert!(computer.is_running());
        assert_eq!(detector.started.load(Ordering::SeqCst), 1);

        updates.publish(sample(1, 40.0, 0.0));
        updates.publish(sample(2, 10.0, -25.0));
        wait_for(&computer, 2).await;

        assert_eq!(computer.phase(), FlightPhase::Freefall);
        assert_eq!(*detector.seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_stop_keeps_phase_and_unsubscribes() {
        let detector = Arc::new(RecordingDetector::default());
        let updates = LocationUpdates::new();
        let mut computer = FlightComputer::builder()
            .landing_detector(detector.clone())
            .build();

        computer.start(&updates);
        updates.publish(sample(1, 10.0, -5.0));
        wait_for(&computer, 1).await;

        computer.stop().await;
        assert!(!computer.is_running());
        assert_eq!(computer.phase(), FlightPhase::Canopy);
        assert_eq!(detector.stopped.load(Ordering::SeqCst), 1);
        assert_eq!(updates.subscriber_count(), 0);

        assert_eq!(updates.publish(sample(2, 40.0, 0.0)), 0);
        assert_eq!(computer.phase(), FlightPhase::Canopy);
        assert_eq!(computer.samples_applied(), 1);
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let updates = LocationUpdates::new();
        let mut computer = FlightComputer::new();

        computer.start(&updates);
        computer.stop().await;
        computer.start(&updates);
        assert!(computer.is_running());
        assert_eq!(updates.subscriber_count(), 1);

        updates.publish(sample(1, 0.0, 1.0));
        wait_for(&computer, 1).await;
        assert_eq!(computer.phase(), FlightPhase::Ground);
        computer.stop().await;
    }

    #[tokio::test]
    async fn test_join_returns_when_source_closes() {
        let updates = LocationUpdates::new();
        let mut computer = FlightComputer::new();
        computer.start(&updates);

        updates.publish(sample(1, 40.0, 0.0));
        drop(updates);

        tokio::time::timeout(Duration::from_secs(5), computer.join())
            .await
            .expect("join completes");

        assert!(!computer.is_running());
        assert_eq!(computer.phase(), FlightPhase::Plane);
    }

    #[tokio::test]
    async fn test_backlog_published_before_task_runs_is_applied() {
        let detector = Arc::new(RecordingDetector::default());
        let updates = LocationUpdates::new();
        let mut computer = FlightComputer::builder()
            .landing_detector(detector.clone())
            .change_capacity(1)
            .build();

        // Current-thread runtime: the task cannot run until this test yields
        computer.start(&updates);
        for millis in 0..1000 {
            assert_eq!(updates.publish(sample(millis, 40.0, 0.0)), 1);
        }
        drop(updates);

        tokio::time::timeout(Duration::from_secs(5), computer.join())
            .await
            .expect("join completes");

        assert_eq!(computer.samples_applied(), 1000);
        let expected: Vec<i64> = (0..1000).collect();
        assert_eq!(*detector.seen.lock().unwrap(), expected);
    }

    /// Records detector callbacks in order; `update` blocks for a while.
    #[derive(Default)]
    struct SlowDetector {
        events: Mutex<Vec<&'static str>>,
    }

    impl LandingDetector for SlowDetector {
        fn start(&self) {
            self.events.lock().unwrap().push("start");
        }

        fn update(&self, _location: &FusedLocation) {
            self.events.lock().unwrap().push("update-begin");
            std::thread::sleep(Duration::from_millis(50));
            self.events.lock().unwrap().push("update-end");
        }

        fn stop(&self) {
            self.events.lock().unwrap().push("stop");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_waits_for_in_flight_update() {
        let detector = Arc::new(SlowDetector::default());
        let updates = LocationUpdates::new();
        let mut computer = FlightComputer::builder()
            .landing_detector(detector.clone())
            .build();

        computer.start(&updates);
        updates.publish(sample(1, 10.0, -5.0));

        tokio::time::timeout(Duration::from_secs(5), async {
            while !detector.events.lock().unwrap().contains(&"update-begin") {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("update started");

        computer.stop().await;

        assert!(!computer.is_running());
        assert_eq!(
            *detector.events.lock().unwrap(),
            vec!["start", "update-begin", "update-end", "stop"]
        );
        assert_eq!(computer.samples_applied(), 1);
    }
}
