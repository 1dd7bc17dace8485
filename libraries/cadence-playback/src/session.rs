//! Audio session notifications from the host platform

use serde::{Deserialize, Serialize};

/// Why the audio route changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteChangeReason {
    /// A new output (e.g. headphones) became available
    DeviceConnected,

    /// The active output went away
    DeviceDisconnected,

    Other,
}

/// Session-level event delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Another audio source took over (call, alarm, ...)
    InterruptionBegan,

    /// The interruption is over
    InterruptionEnded {
        /// Host hint that playback may resume
        should_resume: bool,
    },

    RouteChanged(RouteChangeReason),
}
