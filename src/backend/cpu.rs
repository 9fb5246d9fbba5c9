use std::thread;

use sysinfo::System;

use crate::model::CpuInfo;

pub struct CpuCollector {
    sys: System,
    pub core_count: usize,
    pub model_name: String,
}

impl CpuCollector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        let core_count = sys.cpus().len();
        let model_name = sys
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "Unknown CPU".to_string());
        Self {
            sys,
            core_count,
            model_name,
        }
    }

    /// Usage is a delta between two refreshes; wait long enough after the
    /// first one that the next `collect` reports a real figure.
    pub fn prime(&mut self) {
        self.sys.refresh_cpu_usage();
        thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    }

    pub fn collect(&mut self) -> CpuInfo {
        self.sys.refresh_cpu_all();

        let per_core_percent: Vec<f64> = self
            .sys
            .cpus()
            .iter()
            .map(|c| c.cpu_usage() as f64)
            .collect();
        let frequency_mhz = self
            .sys
            .cpus()
            .first()
            .map(|c| c.frequency() as f64)
            .unwrap_or(0.0);

        CpuInfo {
            total_percent: self.sys.global_cpu_usage() as f64,
            per_core_percent,
            core_count: self.core_count,
            model_name: self.model_name.clone(),
            frequency_mhz,
            uptime_secs: System::uptime(),
        }
    }
}
