use std::env;
use std::path::Path;
use std::process::Command;
use std::thread;

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::runmeta::git;

/// Identity and reproducibility record for one training run.
///
/// Collected once at startup and saved next to the run's outputs so a
/// result can be traced back to the exact code, machine, and seed that
/// produced it. All environment-dependent fields are `Option` and filled
/// best-effort; collection itself never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Random UUID minted for this run.
    pub run_id: String,
    /// Collection time, RFC 3339 in UTC.
    pub timestamp: String,
    pub host: Option<String>,
    pub user: Option<String>,
    /// Operating system the run executes on, e.g. "linux".
    pub os: String,
    /// CPU architecture, e.g. "x86_64".
    pub arch: String,
    /// Logical CPUs available to the process, if the host reports it.
    pub cpu_count: Option<usize>,
    pub git_commit: Option<String>,
    pub git_branch: Option<String>,
    pub git_dirty: bool,
    /// Name of the first GPU reported by `nvidia-smi`, if any.
    pub gpu_name: Option<String>,
    /// Number of GPUs reported by `nvidia-smi`; zero when unavailable.
    pub gpu_count: usize,
    /// NVIDIA driver version, if `nvidia-smi` is present.
    pub driver_version: Option<String>,
    /// RNG seed the run was started with, when one was fixed.
    pub seed: Option<u64>,
}

impl RunMetadata {
    /// Gather everything observable about the current process and host.
    pub fn collect(seed: Option<u64>) -> RunMetadata {
        let (gpu_name, gpu_count, driver_version) = query_nvidia_smi();
        RunMetadata {
            run_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            host: hostname(),
            user: username(),
            os: env::consts::OS.to_string(),
            arch: env::consts::ARCH.to_string(),
            cpu_count: thread::available_parallelism().ok().map(|n| n.get()),
            git_commit: git::commit(),
            git_branch: git::branch(),
            git_dirty: git::is_dirty(),
            gpu_name,
            gpu_count,
            driver_version,
            seed,
        }
    }

    /// Serializes the record to pretty-printed JSON at `path`.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a record from a JSON file previously written by
    /// `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> std::io::Result<RunMetadata> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

fn hostname() -> Option<String> {
    if let Ok(name) = env::var("HOSTNAME") {
        if !name.is_empty() {
            return Some(name);
        }
    }
    if let Ok(name) = env::var("COMPUTERNAME") {
        if !name.is_empty() {
            return Some(name);
        }
    }
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn username() -> Option<String> {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .ok()
        .filter(|s| !s.is_empty())
}

/// One `nvidia-smi` call answering name, count, and driver version at once.
/// The tool prints one `name, driver_version` line per GPU.
fn query_nvidia_smi() -> (Option<String>, usize, Option<String>) {
    let out = match Command::new("nvidia-smi")
        .args(["--query-gpu=name,driver_version", "--format=csv,noheader"])
        .output()
    {
        Ok(out) if out.status.success() => out,
        _ => return (None, 0, None),
    };

    let text = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return (None, 0, None);
    }

    let mut fields = lines[0].splitn(2, ',');
    let gpu_name = fields
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let driver = fields
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    (gpu_name, lines.len(), driver)
}
