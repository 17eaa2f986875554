use std::fmt::Write;

use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::models::SimConfig;
use crate::state::{RunMetadata, SimulationResult};

pub trait Formatter {
    fn write(&self, result: &SimulationResult) -> Result<String>;
}

pub struct HumanFormatter;
pub struct SummaryFormatter;
pub struct JsonFormatter;

impl Formatter for HumanFormatter {
    fn write(&self, result: &SimulationResult) -> Result<String> {
        let mut out = String::new();
        write_metadata(&mut out, &result.metadata);
        out.push_str("Customers:\n");
        for customer in &result.customers {
            let _ = writeln!(
                out,
                "Customer {}: arrival {:.2}, service {:.2}, wait {:.2}, departure {:.2}, system {:.2}",
                customer.id,
                customer.arrival_time,
                customer.service_time,
                customer.waiting_time,
                customer.departure_time,
                customer.time_in_system
            );
        }
        write_key_metrics(&mut out, &result.metrics);
        Ok(out)
    }
}

impl Formatter for SummaryFormatter {
    fn write(&self, result: &SimulationResult) -> Result<String> {
        let mut out = String::new();
        write_metadata(&mut out, &result.metadata);
        write_key_metrics(&mut out, &result.metrics);
        Ok(out)
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, result: &SimulationResult) -> Result<String> {
        let mut out = serde_json::to_string_pretty(result)
            .map_err(|err| Error::Export(format!("failed to encode JSON: {}", err)))?;
        out.push('\n');
        Ok(out)
    }
}

pub fn format_config(config: &SimConfig) -> String {
    let seed = match config.seed {
        Some(seed) => seed.to_string(),
        None => "random".to_string(),
    };
    format!(
        "Customers: {}\nSeed: {}\nInter-arrival: {}\nService: {}\n",
        config.customers, seed, config.interarrival, config.service
    )
}

/// Headline metrics as printed to the terminal and `summary.txt`.
pub fn key_metrics(metrics: &Metrics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Average Waiting Time: {:.2} minutes",
        metrics.average_waiting_time
    );
    let _ = writeln!(
        out,
        "Average System Time: {:.2} minutes",
        metrics.average_system_time
    );
    let _ = writeln!(out, "Server Utilization: {:.2}%", metrics.server_utilization);
    let _ = writeln!(
        out,
        "Maximum Queue Length: {} customers",
        metrics.max_queue_length
    );
    out
}

fn write_metadata(out: &mut String, metadata: &RunMetadata) {
    out.push_str("Metadata:\n");
    let _ = writeln!(out, "customers: {}", metadata.customers);
    let _ = writeln!(out, "seed: {}", metadata.seed);
    let _ = writeln!(out, "interarrival: {}", metadata.interarrival);
    let _ = writeln!(out, "service: {}", metadata.service);
}

fn write_key_metrics(out: &mut String, metrics: &Metrics) {
    out.push_str("Summary:\n");
    out.push_str(&key_metrics(metrics));
}
