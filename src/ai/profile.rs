use std::collections::BTreeMap;

use serde::Serialize;
use sysinfo::{Networks, System};

use crate::backend::cpu::CpuCollector;
use crate::backend::disk::DiskCollector;
use crate::backend::memory::MemoryCollector;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Static description of the machine sent along with every question.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemProfile {
    pub os: String,
    pub os_release: String,
    pub os_version: String,
    pub platform: String,
    pub architecture: String,
    pub hostname: String,
    pub cpu: CpuProfile,
    pub memory: MemoryProfile,
    pub disk: Vec<DiskProfile>,
    pub network: BTreeMap<String, NetworkProfile>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CpuProfile {
    pub model: String,
    pub count_logical: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_average: Option<[f64; 3]>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryProfile {
    pub total_ram_gb: f64,
    pub swap_total_gb: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiskProfile {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent_used: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkProfile {
    pub mac_address: String,
    pub total_received_bytes: u64,
    pub total_transmitted_bytes: u64,
}

impl SystemProfile {
    pub fn collect() -> Self {
        let cpu = CpuCollector::new();
        let memory = MemoryCollector::new().collect();
        let disk = DiskCollector::new()
            .collect()
            .into_iter()
            .map(|p| DiskProfile {
                total_gb: to_gb(p.total),
                used_gb: to_gb(p.used),
                free_gb: to_gb(p.total.saturating_sub(p.used)),
                percent_used: percent(p.used, p.total),
                device: p.device,
                mountpoint: p.mount_point,
                fstype: p.file_system,
            })
            .collect();

        let networks = Networks::new_with_refreshed_list();
        let network = networks
            .list()
            .iter()
            .map(|(name, data)| {
                (
                    name.clone(),
                    NetworkProfile {
                        mac_address: data.mac_address().to_string(),
                        total_received_bytes: data.total_received(),
                        total_transmitted_bytes: data.total_transmitted(),
                    },
                )
            })
            .collect();

        Self {
            os: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_release: System::kernel_version().unwrap_or_default(),
            os_version: System::os_version().unwrap_or_default(),
            platform: System::long_os_version().unwrap_or_default(),
            architecture: std::env::consts::ARCH.to_string(),
            hostname: System::host_name().unwrap_or_default(),
            cpu: CpuProfile {
                model: cpu.model_name.clone(),
                count_logical: cpu.core_count,
                load_average: load_average(),
            },
            memory: MemoryProfile {
                total_ram_gb: to_gb(memory.total),
                swap_total_gb: to_gb(memory.swap_total),
            },
            disk,
            network,
        }
    }

    /// Compact JSON, as embedded in prompts.
    pub fn to_prompt_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("Cannot serialize system profile: {}", e);
            String::from("{}")
        })
    }
}

#[cfg(unix)]
fn load_average() -> Option<[f64; 3]> {
    let load = System::load_average();
    Some([load.one, load.five, load.fifteen])
}

#[cfg(not(unix))]
fn load_average() -> Option<[f64; 3]> {
    None
}

fn to_gb(bytes: u64) -> f64 {
    (bytes as f64 / GIB * 100.0).round() / 100.0
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}
