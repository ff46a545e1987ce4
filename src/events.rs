use serde::Serialize;

use crate::state::CustomerId;

/// One state transition, recorded in the order it happened. The log is
/// append-only and exists for presentation layers (timelines, replays);
/// the engine never reads it back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SimEvent {
    CustomerArrived {
        at: u64,
        customer: CustomerId,
        queued: usize,
    },
    ServiceStarted {
        at: u64,
        customer: CustomerId,
        box_id: usize,
    },
    ServiceFinished {
        at: u64,
        customer: CustomerId,
        box_id: usize,
    },
    CustomerAbandoned {
        at: u64,
        customer: CustomerId,
    },
    ForcedTermination {
        at: u64,
        completed: usize,
    },
}

impl SimEvent {
    pub fn at(&self) -> u64 {
        match self {
            SimEvent::CustomerArrived { at, .. }
            | SimEvent::ServiceStarted { at, .. }
            | SimEvent::ServiceFinished { at, .. }
            | SimEvent::CustomerAbandoned { at, .. }
            | SimEvent::ForcedTermination { at, .. } => *at,
        }
    }
}
