//! Probe status transition table.
//!
//! Every status change, whether raised inside the tick update or requested
//! by the driver, goes through [`transition`]. A `None` result means the
//! transition is not allowed from the current status.

use std::fmt;

use rubblerats_core::enums::ProbeStatus;

/// Event that may move a probe to a new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Driver assigned a goal.
    TargetAssigned,
    /// Driver dropped the goal.
    TargetCleared,
    /// move-to-target arrived within reach distance.
    TargetReached,
    /// Battery fell below the low threshold for the first time.
    BatteryCritical,
    /// Retrace ran out of breadcrumbs and arrived at base.
    RetraceComplete,
    /// CO2, microphone and thermal all crossed their thresholds.
    CoordinatedAlert,
    /// Driver freeze.
    Pause,
    /// Driver unfreeze back to the status the probe was paused from.
    Resume { restore: ProbeStatus },
    /// Driver sets a reserved status directly.
    Dispatch(ProbeStatus),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::TargetAssigned => f.write_str("target assigned"),
            Trigger::TargetCleared => f.write_str("target cleared"),
            Trigger::TargetReached => f.write_str("target reached"),
            Trigger::BatteryCritical => f.write_str("battery critical"),
            Trigger::RetraceComplete => f.write_str("retrace complete"),
            Trigger::CoordinatedAlert => f.write_str("coordinated alert"),
            Trigger::Pause => f.write_str("pause"),
            Trigger::Resume { restore } => write!(f, "resume to {restore:?}"),
            Trigger::Dispatch(status) => write!(f, "dispatch to {status:?}"),
        }
    }
}

/// Compute the status that follows `from` on `trigger`.
pub fn transition(from: ProbeStatus, trigger: Trigger) -> Option<ProbeStatus> {
    use ProbeStatus::*;

    match (from, trigger) {
        // Detection and driver freeze win over everything.
        (_, Trigger::CoordinatedAlert) | (_, Trigger::Pause) => Some(Paused),

        // Paused probes only leave through resume; goal edits are held
        // until then.
        (Paused, Trigger::Resume { restore }) => Some(match restore {
            Paused => Idle,
            other => other,
        }),
        (_, Trigger::Resume { .. }) => None,
        (Paused, Trigger::TargetAssigned | Trigger::TargetCleared) => Some(Paused),
        (Paused, _) => None,

        // Retracing owns its own target and ends only at base.
        (Retracing, Trigger::RetraceComplete) => Some(Idle),
        (Retracing, Trigger::TargetReached) => Some(Retracing),
        (Retracing, _) => None,
        (_, Trigger::RetraceComplete) => None,

        (_, Trigger::BatteryCritical) => Some(Retracing),

        (Idle | Scanning | Moving, Trigger::TargetAssigned) => Some(Moving),
        (status, Trigger::TargetAssigned) => Some(status),

        (Moving, Trigger::TargetCleared | Trigger::TargetReached) => Some(Idle),
        (status, Trigger::TargetCleared | Trigger::TargetReached) => Some(status),

        (_, Trigger::Dispatch(status)) if status.is_dispatchable() => Some(status),
        (_, Trigger::Dispatch(_)) => None,
    }
}
