pub type CustomerId = usize;

/// Where a customer is in their lifecycle. Timestamps only exist on the
/// variants they belong to, so states like "served without an end time"
/// cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomerPhase {
    Waiting,
    InService { started_at: u64, box_id: usize },
    Served { started_at: u64, finished_at: u64 },
    Abandoned { abandoned_at: u64 },
}

#[derive(Clone, Debug)]
pub struct Customer {
    pub id: CustomerId,
    pub arrived_at: u64,
    pub phase: CustomerPhase,
}

impl Customer {
    pub fn new(id: CustomerId, arrived_at: u64) -> Self {
        Self {
            id,
            arrived_at,
            phase: CustomerPhase::Waiting,
        }
    }

    /// Seconds spent in the queue before service began or the customer
    /// gave up. Zero while still waiting.
    pub fn wait_secs(&self) -> u64 {
        match self.phase {
            CustomerPhase::Waiting => 0,
            CustomerPhase::InService { started_at, .. }
            | CustomerPhase::Served { started_at, .. } => started_at - self.arrived_at,
            CustomerPhase::Abandoned { abandoned_at } => abandoned_at - self.arrived_at,
        }
    }

    /// Duration of a completed service. Zero unless served.
    pub fn service_secs(&self) -> u64 {
        match self.phase {
            CustomerPhase::Served {
                started_at,
                finished_at,
            } => finished_at - started_at,
            _ => 0,
        }
    }
}

/// An in-progress service: which customer and when it is due to finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Service {
    pub customer: CustomerId,
    pub finishes_at: u64,
}

/// A service position. Occupied iff `serving` is set, which carries both
/// the customer and the scheduled completion time.
#[derive(Clone, Debug)]
pub struct BoxState {
    pub id: usize,
    pub serving: Option<Service>,
}

impl BoxState {
    pub fn new(id: usize) -> Self {
        Self { id, serving: None }
    }

    pub fn is_free(&self) -> bool {
        self.serving.is_none()
    }
}
