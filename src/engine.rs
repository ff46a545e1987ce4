use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::events::SimEvent;
use crate::models::SimConfig;
use crate::state::{BoxState, Customer, CustomerId, CustomerPhase, Service};
use crate::stats::{self, Statistics};

pub struct SimulationEngine {
    config: SimConfig,
    clock: u64,
    customers: Vec<Customer>,
    queue: VecDeque<CustomerId>,
    boxes: Vec<BoxState>,
    served: Vec<CustomerId>,
    abandoned: Vec<CustomerId>,
    events: Vec<SimEvent>,
    rng: StdRng,
    service_dist: Normal<f64>,
    forced: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub finished_at: u64,
    pub overtime_secs: u64,
    pub forced: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub boxes: u32,
    pub summary: RunSummary,
    pub statistics: Statistics,
    pub still_queued: usize,
    pub still_in_service: usize,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Result<Self> {
        validate_config(&config)?;
        let service_dist = Normal::new(
            config.service.mean_secs as f64,
            config.service.stddev_secs as f64,
        )
        .map_err(|_| Error::InvalidServiceSpread(config.service.stddev_secs as f64))?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let boxes = (0..config.boxes as usize).map(BoxState::new).collect();

        Ok(Self {
            config,
            clock: 0,
            customers: Vec::new(),
            queue: VecDeque::new(),
            boxes,
            served: Vec::new(),
            abandoned: Vec::new(),
            events: Vec::new(),
            rng,
            service_dist,
            forced: false,
        })
    }

    /// Advances the simulation by one second: arrival sampling, then
    /// completions (with immediate reassignment from the queue head), then
    /// abandonment. Arrivals and abandonment only happen while the clock
    /// is inside the operating window.
    pub fn tick(&mut self) {
        let now = self.clock;
        let in_window = now < self.config.window_secs;

        if in_window && self.rng.gen::<f64>() < self.config.arrival_probability {
            self.admit_customer();
        }
        self.finish_due_services(now);
        if in_window {
            self.abandon_overdue(now);
        }

        self.clock = now + 1;
    }

    /// Drives a full run: the operating window, then overtime completions
    /// until everything drains, capped at `overtime_cap_secs` past close.
    /// At the cap everyone left is force-completed as served at the
    /// current clock, with queued customers assumed to take the mean
    /// service time.
    pub fn run(&mut self) -> RunSummary {
        while self.clock < self.config.window_secs {
            self.tick();
        }

        let cap = self.config.window_secs + self.config.overtime_cap_secs;
        while !self.is_drained() {
            if self.clock >= cap {
                self.force_drain();
                break;
            }
            self.tick();
        }

        RunSummary {
            finished_at: self.clock,
            overtime_secs: self.clock - self.config.window_secs,
            forced: self.forced,
        }
    }

    /// Creates a customer arriving at the current clock and routes them:
    /// lowest-id free box if one exists, otherwise the back of the queue.
    pub fn admit_customer(&mut self) -> CustomerId {
        let now = self.clock;
        let id = self.customers.len();
        self.customers.push(Customer::new(id, now));

        match self.first_free_box() {
            Some(box_id) => self.start_service(id, box_id, now),
            None => self.queue.push_back(id),
        }
        self.events.push(SimEvent::CustomerArrived {
            at: now,
            customer: id,
            queued: self.queue.len(),
        });

        id
    }

    fn first_free_box(&self) -> Option<usize> {
        self.boxes.iter().find(|slot| slot.is_free()).map(|slot| slot.id)
    }

    fn start_service(&mut self, id: CustomerId, box_id: usize, now: u64) {
        let duration = self.sample_service_secs();
        self.customers[id].phase = CustomerPhase::InService {
            started_at: now,
            box_id,
        };
        self.boxes[box_id].serving = Some(Service {
            customer: id,
            finishes_at: now + duration,
        });
        self.events.push(SimEvent::ServiceStarted {
            at: now,
            customer: id,
            box_id,
        });
    }

    fn sample_service_secs(&mut self) -> u64 {
        let sampled = self.service_dist.sample(&mut self.rng) as i64;
        sampled.max(self.config.service.floor_secs as i64) as u64
    }

    fn finish_due_services(&mut self, now: u64) {
        for box_id in 0..self.boxes.len() {
            let service = match self.boxes[box_id].serving {
                Some(service) if service.finishes_at <= now => service,
                _ => continue,
            };

            let id = service.customer;
            if let CustomerPhase::InService { started_at, .. } = self.customers[id].phase {
                self.customers[id].phase = CustomerPhase::Served {
                    started_at,
                    finished_at: now,
                };
            }
            self.served.push(id);
            self.events.push(SimEvent::ServiceFinished {
                at: now,
                customer: id,
                box_id,
            });
            self.boxes[box_id].serving = None;

            // the freed box picks up the queue head within the same tick
            if let Some(next) = self.queue.pop_front() {
                self.start_service(next, box_id, now);
            }
        }
    }

    fn abandon_overdue(&mut self, now: u64) {
        let max_wait = self.config.max_wait_secs;
        let customers = &mut self.customers;
        let abandoned = &mut self.abandoned;
        let events = &mut self.events;
        self.queue.retain(|&id| {
            if now - customers[id].arrived_at < max_wait {
                return true;
            }
            customers[id].phase = CustomerPhase::Abandoned { abandoned_at: now };
            abandoned.push(id);
            events.push(SimEvent::CustomerAbandoned { at: now, customer: id });
            false
        });
    }

    fn force_drain(&mut self) {
        let now = self.clock;
        let assumed_secs = self.config.service.mean_secs;
        let mut completed = 0;

        while let Some(id) = self.queue.pop_front() {
            self.customers[id].phase = CustomerPhase::Served {
                started_at: now,
                finished_at: now + assumed_secs,
            };
            self.served.push(id);
            completed += 1;
        }
        for box_id in 0..self.boxes.len() {
            if let Some(service) = self.boxes[box_id].serving.take() {
                let id = service.customer;
                if let CustomerPhase::InService { started_at, .. } = self.customers[id].phase {
                    self.customers[id].phase = CustomerPhase::Served {
                        started_at,
                        finished_at: now,
                    };
                }
                self.served.push(id);
                completed += 1;
            }
        }

        self.forced = true;
        self.events.push(SimEvent::ForcedTermination { at: now, completed });
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn boxes(&self) -> &[BoxState] {
        &self.boxes
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Customers still queued, in arrival order.
    pub fn waiting(&self) -> impl Iterator<Item = &Customer> {
        self.queue.iter().map(|&id| &self.customers[id])
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn created_count(&self) -> usize {
        self.customers.len()
    }

    pub fn served_count(&self) -> usize {
        self.served.len()
    }

    pub fn abandoned_count(&self) -> usize {
        self.abandoned.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.boxes.iter().filter(|slot| !slot.is_free()).count()
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.boxes.iter().all(BoxState::is_free)
    }

    pub fn was_forced(&self) -> bool {
        self.forced
    }

    pub fn statistics(&self) -> Statistics {
        stats::aggregate(
            &self.customers,
            &self.served,
            &self.abandoned,
            self.config.boxes,
            &self.config.costs,
        )
    }
}

pub fn run_simulation(config: &SimConfig) -> Result<RunReport> {
    let mut engine = SimulationEngine::new(config.clone())?;
    let summary = engine.run();
    Ok(RunReport {
        boxes: config.boxes,
        summary,
        statistics: engine.statistics(),
        still_queued: engine.queue_len(),
        still_in_service: engine.occupied_count(),
    })
}

fn validate_config(config: &SimConfig) -> Result<()> {
    if config.boxes == 0 {
        return Err(Error::InvalidBoxCount);
    }
    if !config.arrival_probability.is_finite()
        || !(0.0..=1.0).contains(&config.arrival_probability)
    {
        return Err(Error::InvalidArrivalProbability(config.arrival_probability));
    }
    if config.window_secs == 0 {
        return Err(Error::InvalidWindow);
    }
    if config.service.mean_secs == 0 {
        return Err(Error::InvalidServiceMean);
    }
    if config.service.floor_secs > config.service.mean_secs {
        return Err(Error::InvalidServiceFloor);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceTimeConfig;

    fn quiet_config(boxes: u32) -> SimConfig {
        let mut config = SimConfig::with_boxes(boxes);
        config.arrival_probability = 0.0;
        config
    }

    fn fixed_service(mean_secs: u64) -> ServiceTimeConfig {
        ServiceTimeConfig {
            mean_secs,
            stddev_secs: 0,
            floor_secs: 30.min(mean_secs),
        }
    }

    #[test]
    fn zero_boxes_fails_at_construction() {
        let config = SimConfig::with_boxes(0);
        assert!(matches!(
            SimulationEngine::new(config),
            Err(Error::InvalidBoxCount)
        ));
    }

    #[test]
    fn out_of_range_probability_fails_at_construction() {
        let mut config = SimConfig::with_boxes(1);
        config.arrival_probability = 1.5;
        assert!(matches!(
            SimulationEngine::new(config),
            Err(Error::InvalidArrivalProbability(_))
        ));
    }

    #[test]
    fn no_arrivals_means_boxes_cost_only() {
        let config = quiet_config(1);
        let mut engine = SimulationEngine::new(config).unwrap();
        let summary = engine.run();

        let stats = engine.statistics();
        assert_eq!(stats.created, 0);
        assert_eq!(stats.served, 0);
        assert_eq!(stats.abandoned, 0);
        assert_eq!(stats.total_cost, 1_000);
        assert!(!summary.forced);
        assert_eq!(summary.finished_at, 14_400);
        assert_eq!(summary.overtime_secs, 0);
    }

    #[test]
    fn single_customer_at_floor_is_served_after_floor_secs() {
        let mut config = quiet_config(1);
        config.service = fixed_service(30);
        let mut engine = SimulationEngine::new(config).unwrap();

        let id = engine.admit_customer();
        assert!(!engine.boxes()[0].is_free());
        for _ in 0..=30 {
            engine.tick();
        }

        assert_eq!(
            engine.customers()[id].phase,
            CustomerPhase::Served {
                started_at: 0,
                finished_at: 30
            }
        );
        assert!(engine.boxes()[0].is_free());
        assert_eq!(engine.served_count(), 1);
    }

    #[test]
    fn second_customer_waits_for_the_first() {
        let mut config = quiet_config(1);
        config.service = fixed_service(100);
        let mut engine = SimulationEngine::new(config).unwrap();

        let first = engine.admit_customer();
        engine.tick();
        let second = engine.admit_customer();
        while !engine.is_drained() {
            engine.tick();
        }

        let first_finish = match engine.customers()[first].phase {
            CustomerPhase::Served { finished_at, .. } => finished_at,
            other => panic!("first customer not served: {:?}", other),
        };
        let second_start = match engine.customers()[second].phase {
            CustomerPhase::Served { started_at, .. } => started_at,
            other => panic!("second customer not served: {:?}", other),
        };
        assert_eq!(first_finish, 100);
        assert!(second_start >= first_finish);
    }

    #[test]
    fn queued_customer_abandons_at_threshold_inside_window() {
        let mut config = quiet_config(1);
        config.service = fixed_service(10_000);
        let mut engine = SimulationEngine::new(config).unwrap();

        engine.admit_customer();
        while engine.clock() < 1_801 {
            engine.tick();
        }
        let second = engine.admit_customer();
        while engine.clock() <= 1_801 + 1_800 {
            engine.tick();
        }

        assert_eq!(
            engine.customers()[second].phase,
            CustomerPhase::Abandoned { abandoned_at: 3_601 }
        );
        assert_eq!(engine.queue_len(), 0);
        assert_eq!(engine.abandoned_count(), 1);
    }

    #[test]
    fn no_abandonment_once_window_has_closed() {
        let mut config = quiet_config(1);
        config.window_secs = 10;
        config.service = fixed_service(5_000);
        let mut engine = SimulationEngine::new(config).unwrap();

        engine.admit_customer();
        engine.tick();
        let second = engine.admit_customer();
        while engine.clock() < 4_000 {
            engine.tick();
        }

        // waited far past the threshold, but the window closed at t=10
        assert_eq!(engine.customers()[second].phase, CustomerPhase::Waiting);
        assert_eq!(engine.queue_len(), 1);
        assert_eq!(engine.abandoned_count(), 0);
    }

    #[test]
    fn queue_is_strict_fifo() {
        let mut config = quiet_config(1);
        config.service = fixed_service(50);
        let mut engine = SimulationEngine::new(config).unwrap();

        for _ in 0..4 {
            engine.admit_customer();
            engine.tick();
        }
        while !engine.is_drained() {
            engine.tick();
        }

        let mut starts = Vec::new();
        for customer in engine.customers() {
            match customer.phase {
                CustomerPhase::Served { started_at, .. } => starts.push(started_at),
                other => panic!("customer {} not served: {:?}", customer.id, other),
            }
        }
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn overtime_cap_forces_remaining_customers_served() {
        let mut config = quiet_config(1);
        config.window_secs = 10;
        config.overtime_cap_secs = 5;
        config.service = ServiceTimeConfig {
            mean_secs: 10_000,
            stddev_secs: 0,
            floor_secs: 30,
        };
        let mut engine = SimulationEngine::new(config).unwrap();

        let first = engine.admit_customer();
        let second = engine.admit_customer();
        let summary = engine.run();

        assert!(summary.forced);
        assert!(engine.was_forced());
        assert_eq!(summary.finished_at, 15);
        assert!(engine.is_drained());
        assert_eq!(engine.served_count(), 2);
        assert_eq!(
            engine.customers()[first].phase,
            CustomerPhase::Served {
                started_at: 0,
                finished_at: 15
            }
        );
        assert_eq!(
            engine.customers()[second].phase,
            CustomerPhase::Served {
                started_at: 15,
                finished_at: 15 + 10_000
            }
        );
        assert!(engine
            .events()
            .iter()
            .any(|event| matches!(event, SimEvent::ForcedTermination { at: 15, completed: 2 })));
    }

    #[test]
    fn arrivals_only_happen_inside_the_window() {
        let mut config = SimConfig::with_boxes(2);
        config.window_secs = 5;
        config.arrival_probability = 1.0;
        config.service = fixed_service(3);
        config.seed = Some(7);
        let mut engine = SimulationEngine::new(config).unwrap();
        engine.run();

        assert_eq!(engine.created_count(), 5);
        for event in engine.events() {
            if let SimEvent::CustomerArrived { at, .. } = event {
                assert!(*at < 5);
            }
        }
    }

    #[test]
    fn terminal_counts_never_exceed_created_and_drain_to_equal() {
        let mut config = SimConfig::with_boxes(2);
        config.window_secs = 3_000;
        config.seed = Some(1234);
        let mut engine = SimulationEngine::new(config).unwrap();

        while engine.clock() < engine.config().window_secs {
            engine.tick();
            assert!(engine.served_count() + engine.abandoned_count() <= engine.created_count());
        }
        let summary = engine.run();

        assert!(!summary.forced);
        assert_eq!(
            engine.served_count() + engine.abandoned_count(),
            engine.created_count()
        );
    }

    #[test]
    fn abandonments_respect_threshold_and_window() {
        let mut config = SimConfig::with_boxes(1);
        config.window_secs = 5_000;
        config.arrival_probability = 0.05;
        config.seed = Some(99);
        let mut engine = SimulationEngine::new(config).unwrap();
        engine.run();

        for customer in engine.customers() {
            if let CustomerPhase::Abandoned { abandoned_at } = customer.phase {
                assert!(abandoned_at - customer.arrived_at >= 1_800);
                assert!(abandoned_at < 5_000);
            }
        }
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let mut config = SimConfig::with_boxes(2);
        config.window_secs = 2_000;
        config.seed = Some(42);

        let mut first = SimulationEngine::new(config.clone()).unwrap();
        let mut second = SimulationEngine::new(config).unwrap();
        let summary_a = first.run();
        let summary_b = second.run();

        assert_eq!(summary_a, summary_b);
        assert_eq!(first.statistics(), second.statistics());
        assert_eq!(first.events(), second.events());
    }

    #[test]
    fn statistics_are_available_mid_run() {
        let mut config = quiet_config(1);
        config.service = fixed_service(100);
        let mut engine = SimulationEngine::new(config).unwrap();

        engine.admit_customer();
        engine.tick();
        let stats = engine.statistics();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.served, 0);
    }
}
