use sysinfo::System;

use crate::model::MemoryInfo;

pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    pub fn collect(&mut self) -> MemoryInfo {
        self.sys.refresh_memory();
        MemoryInfo {
            total: self.sys.total_memory(),
            used: self.sys.used_memory(),
            available: self.sys.available_memory(),
            swap_total: self.sys.total_swap(),
            swap_used: self.sys.used_swap(),
        }
    }
}
