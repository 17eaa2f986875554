use serde::Serialize;
use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::events::EventClock;
use crate::metrics::Metrics;

#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    pub id: usize,
    pub arrival_time: f64,
    pub service_duration: f64,
    service_start: Option<f64>,
    departure_time: Option<f64>,
}

impl Customer {
    pub fn new(id: usize, arrival_time: f64, service_duration: f64) -> Self {
        Self {
            id,
            arrival_time,
            service_duration,
            service_start: None,
            departure_time: None,
        }
    }

    pub fn service_start(&self) -> Option<f64> {
        self.service_start
    }

    pub fn departure_time(&self) -> Option<f64> {
        self.departure_time
    }

    pub fn waiting_time(&self) -> Option<f64> {
        self.service_start.map(|start| start - self.arrival_time)
    }

    pub fn time_in_system(&self) -> Option<f64> {
        self.waiting_time().map(|waiting| waiting + self.service_duration)
    }

    /// Puts the customer at the counter and returns its departure time.
    pub(crate) fn start_service(&mut self, now: f64) -> Result<f64> {
        if self.service_start.is_some() {
            return Err(Error::InconsistentState(format!(
                "customer {} started service twice",
                self.id
            )));
        }
        if now < self.arrival_time {
            return Err(Error::InconsistentState(format!(
                "customer {} served at {} before arriving at {}",
                self.id, now, self.arrival_time
            )));
        }
        let departure = now + self.service_duration;
        self.service_start = Some(now);
        self.departure_time = Some(departure);
        Ok(departure)
    }

    pub fn record(&self) -> Result<CustomerRecord> {
        match (self.service_start, self.departure_time) {
            (Some(start), Some(departure_time)) => {
                let waiting_time = start - self.arrival_time;
                Ok(CustomerRecord {
                    id: self.id,
                    arrival_time: self.arrival_time,
                    service_time: self.service_duration,
                    waiting_time,
                    departure_time,
                    time_in_system: waiting_time + self.service_duration,
                })
            }
            _ => Err(Error::InconsistentState(format!(
                "customer {} never reached the server",
                self.id
            ))),
        }
    }
}

/// Exported view of a departed customer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub id: usize,
    pub arrival_time: f64,
    pub service_time: f64,
    pub waiting_time: f64,
    pub departure_time: f64,
    pub time_in_system: f64,
}

/// Server slot and FIFO wait line. Both hold customer ids; the records stay
/// in the run's customer list.
#[derive(Clone, Debug, Default)]
pub struct Station {
    in_service: Option<usize>,
    wait_queue: VecDeque<usize>,
}

impl Station {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_service.is_some()
    }

    pub fn in_service(&self) -> Option<usize> {
        self.in_service
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn arrive(
        &mut self,
        id: usize,
        customers: &mut [Customer],
        clock: &mut EventClock,
    ) -> Result<()> {
        if self.is_busy() {
            self.wait_queue.push_back(id);
        } else {
            self.begin(id, customers, clock)?;
        }
        self.check_invariants()
    }

    /// Releases the customer at the counter and pulls the head of the line
    /// forward. Returns the id of the departed customer.
    pub fn depart(&mut self, customers: &mut [Customer], clock: &mut EventClock) -> Result<usize> {
        let departed = self.in_service.take().ok_or_else(|| {
            Error::InconsistentState(format!(
                "departure at {} with no customer in service",
                clock.time()
            ))
        })?;

        match self.wait_queue.pop_front() {
            Some(next) => self.begin(next, customers, clock)?,
            None => clock.clear_departure(),
        }
        self.check_invariants()?;
        Ok(departed)
    }

    pub fn check_invariants(&self) -> Result<()> {
        if !self.is_busy() && !self.wait_queue.is_empty() {
            return Err(Error::InconsistentState(format!(
                "{} customers waiting while the server is idle",
                self.wait_queue.len()
            )));
        }
        Ok(())
    }

    fn begin(&mut self, id: usize, customers: &mut [Customer], clock: &mut EventClock) -> Result<()> {
        let customer = customers
            .get_mut(id)
            .ok_or_else(|| Error::InconsistentState(format!("unknown customer {}", id)))?;
        let departure = customer.start_service(clock.time())?;
        self.in_service = Some(id);
        clock.schedule_departure(departure);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunMetadata {
    pub customers: usize,
    pub seed: u64,
    pub interarrival: String,
    pub service: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    pub metadata: RunMetadata,
    pub metrics: Metrics,
    pub customers: Vec<CustomerRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers() -> Vec<Customer> {
        vec![
            Customer::new(0, 0.0, 4.0),
            Customer::new(1, 1.0, 2.0),
            Customer::new(2, 2.0, 3.0),
        ]
    }

    #[test]
    fn idle_arrival_starts_service_and_schedules_departure() {
        let mut customers = customers();
        let mut clock = EventClock::new();
        let mut station = Station::new();

        station.arrive(0, &mut customers, &mut clock).unwrap();

        assert!(station.is_busy());
        assert_eq!(station.queue_len(), 0);
        assert_eq!(customers[0].service_start(), Some(0.0));
        assert_eq!(customers[0].departure_time(), Some(4.0));
        assert_eq!(clock.next_departure(), Some(4.0));
    }

    #[test]
    fn busy_arrival_waits_without_timestamps() {
        let mut customers = customers();
        let mut clock = EventClock::new();
        let mut station = Station::new();

        station.arrive(0, &mut customers, &mut clock).unwrap();
        station.arrive(1, &mut customers, &mut clock).unwrap();

        assert_eq!(station.queue_len(), 1);
        assert_eq!(station.in_service(), Some(0));
        assert_eq!(customers[1].service_start(), None);
        assert_eq!(customers[1].departure_time(), None);
    }

    #[test]
    fn departure_serves_head_of_line_first() {
        let mut customers = customers();
        let mut clock = EventClock::new();
        let mut station = Station::new();
        station.arrive(0, &mut customers, &mut clock).unwrap();
        station.arrive(1, &mut customers, &mut clock).unwrap();
        station.arrive(2, &mut customers, &mut clock).unwrap();

        let event = clock.advance().unwrap();
        assert_eq!(event.time, 4.0);
        let departed = station.depart(&mut customers, &mut clock).unwrap();

        assert_eq!(departed, 0);
        assert_eq!(station.in_service(), Some(1));
        assert_eq!(customers[1].service_start(), Some(4.0));
        assert_eq!(customers[1].waiting_time(), Some(3.0));
        assert_eq!(clock.next_departure(), Some(6.0));
        assert_eq!(customers[2].service_start(), None);
    }

    #[test]
    fn last_departure_idles_server() {
        let mut customers = customers();
        let mut clock = EventClock::new();
        let mut station = Station::new();
        station.arrive(0, &mut customers, &mut clock).unwrap();

        clock.advance().unwrap();
        station.depart(&mut customers, &mut clock).unwrap();

        assert!(!station.is_busy());
        assert!(!clock.has_pending());
    }

    #[test]
    fn departure_without_customer_is_inconsistent() {
        let mut customers = customers();
        let mut clock = EventClock::new();
        let mut station = Station::new();

        let err = station.depart(&mut customers, &mut clock).unwrap_err();
        assert!(matches!(err, Error::InconsistentState(_)));
    }

    #[test]
    fn customer_cannot_start_twice() {
        let mut customer = Customer::new(5, 0.0, 1.0);
        customer.start_service(0.0).unwrap();
        assert!(customer.start_service(1.0).is_err());
    }

    #[test]
    fn record_requires_completed_service() {
        let mut customer = Customer::new(1, 2.0, 3.0);
        assert!(customer.record().is_err());

        customer.start_service(4.5).unwrap();
        let record = customer.record().unwrap();
        assert_eq!(record.waiting_time, 2.5);
        assert_eq!(record.departure_time, 7.5);
        assert_eq!(record.time_in_system, 5.5);
        assert_eq!(record.service_time, 3.0);
    }
}
