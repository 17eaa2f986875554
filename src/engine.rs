use tracing::{debug, info, trace};

use crate::dists::{DurationSource, SeededSource};
use crate::error::{Error, Result};
use crate::events::{Event, EventClock};
use crate::metrics::{Metrics, MetricsAccumulator};
use crate::models::SimConfig;
use crate::state::{Customer, CustomerRecord, RunMetadata, SimulationResult, Station};

/// Upper bound on the customer list reserved up front; larger runs grow it on demand.
const PREALLOCATED_CUSTOMERS: usize = 1 << 16;

/// One run of the single-server station.
///
/// Arrivals are generated one ahead: the next customer is drawn when the
/// current one arrives, so the pending-event set never holds more than one
/// arrival and one departure.
pub struct SimulationEngine {
    num_customers: usize,
    source: Box<dyn DurationSource>,
    clock: EventClock,
    station: Station,
    metrics: MetricsAccumulator,
    customers: Vec<Customer>,
    next_customer: Option<Customer>,
}

impl SimulationEngine {
    pub fn new(num_customers: usize, source: Box<dyn DurationSource>) -> Result<Self> {
        if num_customers == 0 {
            return Err(Error::CustomersZero);
        }

        Ok(Self {
            num_customers,
            source,
            clock: EventClock::new(),
            station: Station::new(),
            metrics: MetricsAccumulator::new(),
            customers: Vec::with_capacity(num_customers.min(PREALLOCATED_CUSTOMERS)),
            next_customer: None,
        })
    }

    pub fn run(mut self) -> Result<(Metrics, Vec<CustomerRecord>)> {
        info!(customers = self.num_customers, "starting simulation");

        let service = self.draw_service()?;
        self.next_customer = Some(Customer::new(0, 0.0, service));
        self.clock.schedule_arrival(0.0);

        while let Some(scheduled) = self.clock.advance() {
            trace!(time = scheduled.time, event = ?scheduled.event, "dispatching event");
            match scheduled.event {
                Event::Arrival => self.handle_arrival()?,
                Event::Departure => self.handle_departure()?,
            }
        }

        if self.metrics.departed() != self.num_customers || self.station.is_busy() {
            return Err(Error::InconsistentState(format!(
                "run ended with {} of {} customers departed",
                self.metrics.departed(),
                self.num_customers
            )));
        }

        let elapsed = self.clock.time();
        let metrics = self.metrics.finalize(self.num_customers, elapsed);
        let records = self
            .customers
            .iter()
            .map(Customer::record)
            .collect::<Result<Vec<_>>>()?;

        info!(
            elapsed,
            average_waiting_time = metrics.average_waiting_time,
            server_utilization = metrics.server_utilization,
            max_queue_length = metrics.max_queue_length,
            "simulation finished"
        );
        Ok((metrics, records))
    }

    fn handle_arrival(&mut self) -> Result<()> {
        let customer = self.next_customer.take().ok_or_else(|| {
            Error::InconsistentState(format!(
                "arrival at {} with no customer scheduled",
                self.clock.time()
            ))
        })?;
        let id = customer.id;
        self.customers.push(customer);
        self.station.arrive(id, &mut self.customers, &mut self.clock)?;

        // The seed customer counts, so exactly `num_customers` are created.
        if self.customers.len() < self.num_customers {
            let now = self.clock.time();
            let gap = self.draw_interarrival()?;
            let service = self.draw_service()?;
            let next = Customer::new(self.customers.len(), now + gap, service);
            debug!(
                customer = next.id,
                arrival_time = next.arrival_time,
                service_duration = next.service_duration,
                "scheduled next arrival"
            );
            self.clock.schedule_arrival(next.arrival_time);
            self.next_customer = Some(next);
        } else {
            self.clock.clear_arrival();
        }

        self.metrics.sample_queue(self.station.queue_len());
        Ok(())
    }

    fn handle_departure(&mut self) -> Result<()> {
        let departed = self.station.depart(&mut self.customers, &mut self.clock)?;
        let customer = &self.customers[departed];
        trace!(
            customer = departed,
            waiting_time = ?customer.waiting_time(),
            "customer departed"
        );
        self.metrics.record_departure(customer)
    }

    fn draw_interarrival(&mut self) -> Result<f64> {
        checked("interarrival", self.source.next_interarrival())
    }

    fn draw_service(&mut self) -> Result<f64> {
        checked("service", self.source.next_service())
    }
}

fn checked(stream: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidDuration { stream, value })
    }
}

/// Runs `num_customers` through the station with durations from `source`.
pub fn simulate(
    num_customers: usize,
    source: Box<dyn DurationSource>,
) -> Result<(Metrics, Vec<CustomerRecord>)> {
    SimulationEngine::new(num_customers, source)?.run()
}

/// Runs a configured simulation. A missing seed runs with seed 0.
pub fn run_simulation(config: &SimConfig) -> Result<SimulationResult> {
    validate_config(config)?;
    let seed = config.seed.unwrap_or(0);
    let source = SeededSource::from_config(config, seed)?;
    let (metrics, customers) = simulate(config.customers, Box::new(source))?;

    Ok(SimulationResult {
        metadata: RunMetadata {
            customers: config.customers,
            seed,
            interarrival: config.interarrival.to_string(),
            service: config.service.to_string(),
        },
        metrics,
        customers,
    })
}

pub fn validate_config(config: &SimConfig) -> Result<()> {
    if config.customers == 0 {
        return Err(Error::CustomersZero);
    }
    config.interarrival.validate("interarrival")?;
    config.service.validate("service")?;
    Ok(())
}
