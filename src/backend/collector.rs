use crate::backend::cpu::CpuCollector;
use crate::backend::disk::DiskCollector;
use crate::backend::memory::MemoryCollector;
use crate::backend::process::ProcessCollector;
use crate::model::SystemSnapshot;
use std::io;
use std::thread;
use std::time::Duration;

/// Periodic telemetry on a background thread. Snapshots arrive on the
/// receiver returned by [`Collector::new`]; dropping it stops the thread.
pub struct Collector {
    tx: flume::Sender<SystemSnapshot>,
    interval: Duration,
}

impl Collector {
    pub fn new(interval: Duration) -> (Self, flume::Receiver<SystemSnapshot>) {
        let (tx, rx) = flume::bounded(2);
        (Self { tx, interval }, rx)
    }

    pub fn start(self) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("collector".into())
            .spawn(move || {
                self.run();
            })
    }

    fn run(self) {
        let mut cpu_collector = CpuCollector::new();
        let mut memory_collector = MemoryCollector::new();
        let disk_collector = DiskCollector::new();
        let mut process_collector = ProcessCollector::new();

        // Initial collection to prime deltas
        cpu_collector.prime();
        let _ = process_collector.collect();

        loop {
            let cpu = cpu_collector.collect();
            let memory = memory_collector.collect();
            let disks = disk_collector.collect();
            let processes = process_collector.collect();
            let process_count = processes.len();

            let snapshot = SystemSnapshot {
                cpu,
                memory,
                disks,
                processes,
                process_count,
            };

            if self.tx.send(snapshot).is_err() {
                log::info!("Collector channel closed, shutting down");
                break;
            }

            thread::sleep(self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_snapshots_until_receiver_is_dropped() {
        let (collector, rx) = Collector::new(Duration::from_millis(10));
        let handle = collector.start().unwrap();

        let snapshot = rx.recv_timeout(Duration::from_secs(30)).unwrap();
        assert!(snapshot.memory.total > 0);
        assert_eq!(snapshot.process_count, snapshot.processes.len());
        assert!(snapshot.processes.iter().any(|p| p.pid == std::process::id() as i32));

        drop(rx);
        handle.join().unwrap();
    }
}
