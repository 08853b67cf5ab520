//! Progress listener trait.

use crate::TripProgressSnapshot;

/// Receives trip progress as it is published.
///
/// Any number of listeners may be subscribed to a
/// [`TripProgressTracker`][crate::TripProgressTracker]; each is called in
/// subscription order.  Closures taking `&TripProgressSnapshot` implement
/// this trait directly.
pub trait TripProgressListener: Send {
    /// A new snapshot was produced by `update_progress`.
    fn on_progress(&mut self, _snapshot: &TripProgressSnapshot) {}

    /// The waypoint list was replaced or cleared.  `active` is the number
    /// of waypoints that are not skipped.
    fn on_waypoints_changed(&mut self, _active: usize) {}
}

impl<F> TripProgressListener for F
where
    F: FnMut(&TripProgressSnapshot) + Send,
{
    fn on_progress(&mut self, snapshot: &TripProgressSnapshot) {
        self(snapshot)
    }
}
