//! Collaborator traits for the flight computer.
//!
//! - [`LocationBroadcaster`] - Subscription API for fused samples (push)
//! - [`LocationUpdates`] - Fan-out hub implementing it
//! - [`AerodynamicStateProvider`] - Cached lift/drag state from a motion estimator
//! - [`LandingDetector`] - Receives every sample the computer classifies

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::measurement::{AerodynamicState, FusedLocation};

/// Default capacity of the phase change broadcast channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Trait for subscribing to fused location samples (push API).
///
/// Every subscriber receives every sample published after it subscribed,
/// in publish order. The receiver yields `None` once the source is gone.
pub trait LocationBroadcaster: Send + Sync {
    /// Subscribe to location updates.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<FusedLocation>;
}

/// Source of the aerodynamic state predicted by an external motion estimator.
///
/// Implementations may memoize near-simultaneous calls.
pub trait AerodynamicStateProvider: Send + Sync {
    /// Predicted state at `now_millis`, or `None` if the estimator has none.
    fn cached_predicted_state(&self, now_millis: i64) -> Option<AerodynamicState>;
}

/// Landing detection collaborator.
///
/// The flight computer forwards every sample it classifies while running,
/// in order. Time-window logic (debouncing, hysteresis) belongs here rather
/// than in the classifier.
pub trait LandingDetector: Send + Sync {
    fn start(&self);
    fn update(&self, location: &FusedLocation);
    fn stop(&self);
}

/// Fan-out hub for fused location samples.
///
/// Each subscriber owns an unbounded queue, so a slow consumer never loses
/// samples; it only falls behind. Cloning shares the subscriber list.
/// Subscribers see the end of the stream once the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct LocationUpdates {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<FusedLocation>>>>,
}

impl LocationUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a sample to all subscribers.
    ///
    /// Returns the number of subscribers that received it (0 if none).
    /// Subscribers whose receiver was dropped are removed.
    pub fn publish(&self, location: FusedLocation) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|tx| tx.send(location).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

impl LocationBroadcaster for LocationUpdates {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<FusedLocation> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }
}

impl<T: LocationBroadcaster + ?Sized> LocationBroadcaster for Arc<T> {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<FusedLocation> {
        (**self).subscribe()
    }
}

/// Provider for setups without a motion estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAerodynamics;

impl AerodynamicStateProvider for NoAerodynamics {
    fn cached_predicted_state(&self, _now_millis: i64) -> Option<AerodynamicState> {
        None
    }
}

/// Provider that always returns the same state.
#[derive(Debug, Clone, Copy)]
pub struct FixedAerodynamics(pub AerodynamicState);

impl AerodynamicStateProvider for FixedAerodynamics {
    fn cached_predicted_state(&self, _now_millis: i64) -> Option<AerodynamicState> {
        Some(self.0)
    }
}

/// Landing detector that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLandingDetector;

impl LandingDetector for NoopLandingDetector {
    fn start(&self) {}
    fn update(&self, _location: &FusedLocation) {}
    fn stop(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(millis: i64) -> FusedLocation {
        FusedLocation {
            millis,
            latitude: 47.0,
            longitude: 8.0,
            altitude: 1000.0,
            climb: 0.0,
            vel_north: 0.0,
            vel_east: 0.0,
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let updates = LocationUpdates::default();

        assert_eq!(updates.publish(sample(1)), 0);
        assert_eq!(updates.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribe_receives_in_order() {
        let updates = LocationUpdates::new();
        let mut rx = updates.subscribe();

        assert_eq!(updates.publish(sample(1)), 1);
        updates.publish(sample(2));

        assert_eq!(rx.try_recv().expect("first").millis, 1);
        assert_eq!(rx.try_recv().expect("second").millis, 2);
    }

    #[test]
    fn test_arc_wrapped() {
        let updates = Arc::new(LocationUpdates::new());
        let mut rx = LocationBroadcaster::subscribe(&updates);

        updates.publish(sample(7));

        assert_eq!(rx.try_recv().expect("sample").millis, 7);
    }

    #[test]
    fn test_unread_backlog_is_kept() {
        let updates = LocationUpdates::new();
        let mut rx = updates.subscribe();

        for millis in 0..10_000 {
            assert_eq!(updates.publish(sample(millis)), 1);
        }

        for millis in 0..10_000 {
            assert_eq!(rx.try_recv().expect("queued sample").millis, millis);
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_each_subscriber_gets_every_sample() {
        let updates = LocationUpdates::new();
        let mut first = updates.subscribe();
        let mut second = updates.subscribe();

        assert_eq!(updates.publish(sample(1)), 2);

        assert_eq!(first.try_recv().expect("first").millis, 1);
        assert_eq!(second.try_recv().expect("second").millis, 1);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let updates = LocationUpdates::new();
        let rx = updates.subscribe();
        let mut kept = updates.subscribe();
        assert_eq!(updates.subscriber_count(), 2);

        drop(rx);

        assert_eq!(updates.subscriber_count(), 1);
        assert_eq!(updates.publish(sample(5)), 1);
        assert_eq!(kept.try_recv().expect("sample").millis, 5);
    }

    #[test]
    fn test_stream_ends_when_last_clone_dropped() {
        let updates = LocationUpdates::new();
        let clone = updates.clone();
        let mut rx = updates.subscribe();

        clone.publish(sample(1));
        drop(updates);
        assert_eq!(rx.try_recv().expect("still open").millis, 1);

        drop(clone);
        assert_eq!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        );
    }

    #[test]
    fn test_aerodynamic_providers() {
        assert!(NoAerodynamics.cached_predicted_state(0).is_none());

        let state = AerodynamicState::new(0.1, 0.2, 5);
        assert_eq!(FixedAerodynamics(state).cached_predicted_state(99), Some(state));
    }
}
