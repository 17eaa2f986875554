use chrono::Local;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::output::key_metrics;
use crate::state::{CustomerRecord, SimulationResult};

pub const METRICS_FILE: &str = "metrics.json";
pub const CUSTOMERS_FILE: &str = "customer_data.csv";
pub const SUMMARY_FILE: &str = "summary.txt";

const CSV_HEADER: &str = "id,arrival_time,service_time,waiting_time,departure_time,time_in_system";

/// `base/simulation_YYYYmmdd_HHMMSS`, stamped with local time.
pub fn timestamped_dir(base: &Path) -> PathBuf {
    base.join(format!("simulation_{}", Local::now().format("%Y%m%d_%H%M%S")))
}

pub fn save_results(result: &SimulationResult, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| io_error("create", dir, err))?;

    let metrics_path = dir.join(METRICS_FILE);
    let mut metrics_json = serde_json::to_string_pretty(&result.metrics)
        .map_err(|err| Error::Export(format!("failed to encode metrics: {}", err)))?;
    metrics_json.push('\n');
    fs::write(&metrics_path, metrics_json).map_err(|err| io_error("write", &metrics_path, err))?;

    write_customers(&dir.join(CUSTOMERS_FILE), &result.customers)?;

    let summary_path = dir.join(SUMMARY_FILE);
    fs::write(&summary_path, summary_text(result))
        .map_err(|err| io_error("write", &summary_path, err))?;

    Ok(())
}

fn write_customers(path: &Path, customers: &[CustomerRecord]) -> Result<()> {
    let file = File::create(path).map_err(|err| io_error("create", path, err))?;
    let mut writer = BufWriter::new(file);

    let mut write_all = || -> std::io::Result<()> {
        writeln!(writer, "{}", CSV_HEADER)?;
        for c in customers {
            writeln!(
                writer,
                "{},{},{},{},{},{}",
                c.id,
                c.arrival_time,
                c.service_time,
                c.waiting_time,
                c.departure_time,
                c.time_in_system
            )?;
        }
        writer.flush()
    };
    write_all().map_err(|err| io_error("write", path, err))
}

fn summary_text(result: &SimulationResult) -> String {
    let metadata = &result.metadata;
    let mut out = String::new();
    out.push_str("Bank Queue Simulation Results\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");
    out.push_str(&format!("Number of customers: {}\n", metadata.customers));
    out.push_str(&format!("Random seed: {}\n", metadata.seed));
    out.push_str(&format!("Inter-arrival: {}\n", metadata.interarrival));
    out.push_str(&format!("Service: {}\n", metadata.service));
    out.push_str(&format!(
        "Simulation time: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str("Key Metrics:\n");
    out.push_str(&"-".repeat(20));
    out.push('\n');
    out.push_str(&key_metrics(&result.metrics));
    out
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> Error {
    Error::Export(format!("failed to {} '{}': {}", action, path.display(), err))
}
