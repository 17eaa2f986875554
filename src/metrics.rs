use serde::Serialize;

use crate::error::{Error, Result};
use crate::state::Customer;

/// Running totals over departed customers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsAccumulator {
    total_waiting_time: f64,
    total_busy_time: f64,
    max_queue_length: usize,
    departed: usize,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_queue(&mut self, queue_len: usize) {
        self.max_queue_length = self.max_queue_length.max(queue_len);
    }

    pub fn max_queue_length(&self) -> usize {
        self.max_queue_length
    }

    pub fn departed(&self) -> usize {
        self.departed
    }

    pub fn record_departure(&mut self, customer: &Customer) -> Result<()> {
        let waiting = customer.waiting_time().ok_or_else(|| {
            Error::InconsistentState(format!(
                "customer {} departed without being served",
                customer.id
            ))
        })?;
        self.total_waiting_time += waiting;
        self.total_busy_time += customer.service_duration;
        self.departed += 1;
        Ok(())
    }

    pub fn finalize(&self, customers: usize, elapsed: f64) -> Metrics {
        let average = |total: f64| {
            if customers == 0 {
                0.0
            } else {
                total / customers as f64
            }
        };
        // Each time in system is waiting plus service.
        let total_system_time = self.total_waiting_time + self.total_busy_time;
        let server_utilization = if elapsed > 0.0 {
            self.total_busy_time / elapsed * 100.0
        } else {
            0.0
        };

        Metrics {
            total_waiting_time: self.total_waiting_time,
            total_system_time,
            total_busy_time: self.total_busy_time,
            max_queue_length: self.max_queue_length,
            average_waiting_time: average(self.total_waiting_time),
            average_system_time: average(total_system_time),
            server_utilization,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    pub total_waiting_time: f64,
    pub total_system_time: f64,
    pub total_busy_time: f64,
    pub max_queue_length: usize,
    pub average_waiting_time: f64,
    pub average_system_time: f64,
    /// Percentage of elapsed logical time the server was busy.
    pub server_utilization: f64,
}

impl Metrics {
    /// Named numeric fields, in a fixed order, for exporters.
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("total_waiting_time", self.total_waiting_time),
            ("total_system_time", self.total_system_time),
            ("total_busy_time", self.total_busy_time),
            ("max_queue_length", self.max_queue_length as f64),
            ("average_waiting_time", self.average_waiting_time),
            ("average_system_time", self.average_system_time),
            ("server_utilization", self.server_utilization),
        ]
    }
}
