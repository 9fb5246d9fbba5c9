use sysinfo::Disks;

use crate::model::DiskPartition;

pub struct DiskCollector;

impl DiskCollector {
    pub fn new() -> Self {
        Self
    }

    /// Mounted partitions with their capacity. The list is rebuilt every
    /// call so hot-plugged drives show up.
    pub fn collect(&self) -> Vec<DiskPartition> {
        let disks = Disks::new_with_refreshed_list();
        let mut partitions: Vec<DiskPartition> = disks
            .list()
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                DiskPartition {
                    device: disk.name().to_string_lossy().to_string(),
                    mount_point: disk.mount_point().display().to_string(),
                    file_system: disk.file_system().to_string_lossy().to_string(),
                    total,
                    used: total.saturating_sub(disk.available_space()),
                }
            })
            .collect();
        partitions.sort_by(|a, b| a.mount_point.cmp(&b.mount_point));
        partitions
    }
}
