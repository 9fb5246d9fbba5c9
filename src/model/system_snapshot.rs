use super::ProcessInfo;

#[derive(Debug, Clone, Default)]
pub struct CpuInfo {
    pub total_percent: f64,
    pub per_core_percent: Vec<f64>,
    pub core_count: usize,
    pub model_name: String,
    pub frequency_mhz: f64,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

impl MemoryInfo {
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f64 / self.total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiskPartition {
    pub device: String,
    pub mount_point: String,
    pub file_system: String,
    pub total: u64,
    pub used: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskPartition>,
    pub processes: Vec<ProcessInfo>,
    pub process_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_percent_handles_empty_total() {
        assert_eq!(MemoryInfo::default().used_percent(), 0.0);
        let mem = MemoryInfo {
            total: 8,
            used: 2,
            ..Default::default()
        };
        assert_eq!(mem.used_percent(), 25.0);
    }
}
