use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Duration;

use sysinfo::{ProcessesToUpdate, System};

use crate::model::{PriorityLevel, ProcessInfo};

pub struct ProcessCollector {
    sys: System,
}

impl ProcessCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    /// CPU percentages are relative to the previous call, so the first
    /// collection reports zero for every process.
    pub fn collect(&mut self) -> Vec<ProcessInfo> {
        self.sys.refresh_memory();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let total_memory = self.sys.total_memory();

        self.sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let memory_bytes = process.memory();
                ProcessInfo {
                    pid: pid.as_u32() as i32,
                    name: process.name().to_string_lossy().to_string(),
                    cpu_percent: process.cpu_usage() as f64,
                    memory_bytes,
                    memory_percent: if total_memory > 0 {
                        memory_bytes as f64 / total_memory as f64 * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Cpu,
    Memory,
    Pid,
    Name,
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(SortColumn::Cpu),
            "memory" | "mem" => Ok(SortColumn::Memory),
            "pid" => Ok(SortColumn::Pid),
            "name" => Ok(SortColumn::Name),
            other => Err(format!("Unknown sort column '{}' (cpu, memory, pid, name)", other)),
        }
    }
}

pub fn sort_processes(processes: &mut [ProcessInfo], column: SortColumn, ascending: bool) {
    processes.sort_by(|a, b| {
        let ord = match column {
            SortColumn::Cpu => a.cpu_percent.partial_cmp(&b.cpu_percent).unwrap_or(Ordering::Equal),
            SortColumn::Memory => a.memory_bytes.cmp(&b.memory_bytes),
            SortColumn::Pid => a.pid.cmp(&b.pid),
            SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        // Ties fall back to PID so output is stable between refreshes.
        let ord = ord.then_with(|| a.pid.cmp(&b.pid));
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("no process with PID {0}")]
    NotFound(i32),
    #[error("permission denied for PID {0}")]
    PermissionDenied(i32),
    #[error("PID {0} did not exit within {1:?}")]
    Timeout(i32, Duration),
    #[error("PID {0} ({1}) is a critical system process")]
    Critical(i32, String),
    #[cfg(not(unix))]
    #[error("not supported on this platform")]
    Unsupported,
    #[error("PID {pid}: {source}")]
    Os {
        pid: i32,
        #[source]
        source: std::io::Error,
    },
}

/// Ask `pid` to exit and wait for it to go away. Critical processes are
/// refused unless `force` is set.
pub fn terminate(pid: i32, timeout: Duration, force: bool) -> bool {
    let result = check_pid(pid).and_then(|()| {
        if !force && is_critical_process(pid) {
            Err(ProcessError::Critical(pid, process_comm(pid)))
        } else {
            terminate_and_wait(pid, timeout)
        }
    });

    match result {
        Ok(()) => {
            log::info!("Terminated PID {}", pid);
            true
        }
        Err(e) => {
            log::warn!("Failed to terminate PID {}: {}", pid, e);
            false
        }
    }
}

pub fn set_priority(pid: i32, level: PriorityLevel) -> bool {
    match check_pid(pid).and_then(|()| apply_priority(pid, level)) {
        Ok(()) => {
            log::info!("Set PID {} priority to {} (nice {})", pid, level, level.nice());
            true
        }
        Err(e) => {
            log::warn!("Failed to set PID {} priority to {}: {}", pid, level, e);
            false
        }
    }
}

/// Zero and negative ids address process groups, never a single process.
fn check_pid(pid: i32) -> Result<(), ProcessError> {
    if pid <= 0 {
        return Err(ProcessError::NotFound(pid));
    }
    Ok(())
}

#[cfg(unix)]
fn terminate_and_wait(pid: i32, timeout: Duration) -> Result<(), ProcessError> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;
    use std::time::Instant;

    signal::kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(|e| errno_error(pid, e))?;

    let deadline = Instant::now() + timeout;
    while is_alive(pid) {
        if Instant::now() >= deadline {
            return Err(ProcessError::Timeout(pid, timeout));
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    Ok(())
}

#[cfg(not(unix))]
fn terminate_and_wait(pid: i32, _timeout: Duration) -> Result<(), ProcessError> {
    use sysinfo::Pid;

    let mut sys = System::new();
    let target = Pid::from_u32(pid as u32);
    sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
    let process = sys.process(target).ok_or(ProcessError::NotFound(pid))?;
    if process.kill() {
        Ok(())
    } else {
        Err(ProcessError::PermissionDenied(pid))
    }
}

#[cfg(unix)]
fn is_alive(pid: i32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal;
    use nix::unistd::Pid;

    match signal::kill(Pid::from_raw(pid), None) {
        Ok(()) => !is_zombie(pid),
        Err(Errno::ESRCH) => false,
        Err(_) => true,
    }
}

/// A zombie has exited and only waits for its parent to reap it.
#[cfg(unix)]
fn is_zombie(pid: i32) -> bool {
    std::fs::read_to_string(format!("/proc/{}/stat", pid))
        .ok()
        .and_then(|stat| {
            let comm_end = stat.rfind(')')?;
            stat.get(comm_end + 2..)?
                .split_whitespace()
                .next()
                .map(|state| state == "Z")
        })
        .unwrap_or(false)
}

#[cfg(unix)]
fn errno_error(pid: i32, errno: nix::errno::Errno) -> ProcessError {
    use nix::errno::Errno;

    match errno {
        Errno::ESRCH => ProcessError::NotFound(pid),
        Errno::EPERM | Errno::EACCES => ProcessError::PermissionDenied(pid),
        other => ProcessError::Os {
            pid,
            source: std::io::Error::from(other),
        },
    }
}

#[cfg(unix)]
fn apply_priority(pid: i32, level: PriorityLevel) -> Result<(), ProcessError> {
    let result = unsafe { libc::setpriority(libc::PRIO_PROCESS, pid as libc::id_t, level.nice()) };
    if result == 0 {
        Ok(())
    } else {
        Err(errno_error(pid, nix::errno::Errno::last()))
    }
}

#[cfg(not(unix))]
fn apply_priority(_pid: i32, _level: PriorityLevel) -> Result<(), ProcessError> {
    Err(ProcessError::Unsupported)
}

fn process_comm(pid: i32) -> String {
    std::fs::read_to_string(format!("/proc/{}/comm", pid))
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}

pub fn is_critical_process(pid: i32) -> bool {
    if pid <= 2 {
        return true; // PID 1 (init/systemd), PID 2 (kthreadd)
    }
    is_critical_name(&process_comm(pid))
}

fn is_critical_name(comm: &str) -> bool {
    matches!(
        comm,
        "systemd" | "init" | "kthreadd" | "Xorg" | "Xwayland"
        | "kwin_wayland" | "kwin_x11" | "plasmashell" | "sddm"
        | "dbus-daemon" | "polkitd" | "systemd-logind" | "gnome-shell"
        | "pipewire" | "wireplumber" | "csrss.exe" | "wininit.exe"
        | "winlogon.exe" | "lsass.exe" | "services.exe"
    )
}
