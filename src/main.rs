mod ai;
mod backend;
mod config;
mod model;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::ai::{ChatSession, GeminiTransport, SystemProfile};
use crate::backend::cpu::CpuCollector;
use crate::backend::disk::DiskCollector;
use crate::backend::memory::MemoryCollector;
use crate::backend::process::{self, ProcessCollector, SortColumn};
use crate::backend::startup::{KeyValueSource, PathCache, PlatformSource, StartupManager};
use crate::backend::Collector;
use crate::config::Config;
use crate::model::{PriorityLevel, StartupScope, SystemSnapshot};

#[derive(Parser)]
#[command(name = "sysky", version, about = "System monitor, process and startup manager with an AI assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show CPU, memory and disk usage once.
    Stats,
    /// Print a usage line on every refresh.
    Monitor {
        /// Stop after this many refreshes.
        #[arg(long)]
        count: Option<usize>,
    },
    /// List running processes.
    Ps {
        #[arg(long)]
        sort: Option<SortColumn>,
        #[arg(long)]
        ascending: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Terminate a process and wait for it to exit.
    Kill {
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        pid: i32,
        /// Allow terminating critical system processes.
        #[arg(long)]
        force: bool,
    },
    /// Change a process's priority (high, above_normal, normal, below_normal, idle).
    Priority {
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        pid: i32,
        level: PriorityLevel,
    },
    /// Manage programs launched at login.
    Startup {
        #[command(subcommand)]
        action: StartupAction,
    },
    /// Ask the assistant a question, or start an interactive chat.
    Chat { prompt: Vec<String> },
    /// Show the configuration, or write the defaults with --init.
    Config {
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum StartupAction {
    List,
    Enable {
        name: String,
        /// Executable path; defaults to the last known path for NAME.
        #[arg(long)]
        path: Option<String>,
        #[arg(long, default_value = "user")]
        scope: StartupScope,
    },
    Disable {
        name: String,
    },
    /// Interactive session; paths of disabled entries are remembered until exit.
    Shell,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load();

    let result = match cli.command {
        Command::Stats => {
            print_stats();
            Ok(())
        }
        Command::Monitor { count } => run_monitor(&config, count),
        Command::Ps {
            sort,
            ascending,
            limit,
        } => {
            print_processes(&config, sort, ascending, limit);
            Ok(())
        }
        Command::Kill { pid, force } => {
            let timeout = Duration::from_millis(config.terminate_timeout_ms);
            if process::terminate(pid, timeout, force) {
                println!("Process {} terminated.", pid);
                Ok(())
            } else {
                Err(format!("Failed to terminate process {}.", pid))
            }
        }
        Command::Priority { pid, level } => {
            if process::set_priority(pid, level) {
                println!("Priority of process {} changed to {}.", pid, level);
                Ok(())
            } else {
                Err(format!("Failed to change priority of process {}.", pid))
            }
        }
        Command::Startup { action } => run_startup(action),
        Command::Chat { prompt } => run_chat(&config, &prompt.join(" ")),
        Command::Config { init } => show_config(&config, init),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

fn print_stats() {
    let mut cpu_collector = CpuCollector::new();
    cpu_collector.prime();
    let snapshot = SystemSnapshot {
        cpu: cpu_collector.collect(),
        memory: MemoryCollector::new().collect(),
        disks: DiskCollector::new().collect(),
        ..Default::default()
    };

    println!(
        "CPU:    {:.1}% ({} cores, {})",
        snapshot.cpu.total_percent, snapshot.cpu.core_count, snapshot.cpu.model_name
    );
    println!(
        "Memory: {} / {} ({:.1}%)",
        format_gb(snapshot.memory.used),
        format_gb(snapshot.memory.total),
        snapshot.memory.used_percent()
    );
    println!(
        "Swap:   {} / {}",
        format_gb(snapshot.memory.swap_used),
        format_gb(snapshot.memory.swap_total)
    );
    println!("Disks:");
    for disk in &snapshot.disks {
        println!(
            "  {:<24} {:>10} / {:<10} {:<6} {}",
            disk.mount_point,
            format_gb(disk.used),
            format_gb(disk.total),
            disk.file_system,
            disk.device
        );
    }
}

fn run_monitor(config: &Config, count: Option<usize>) -> Result<(), String> {
    let (collector, rx) = Collector::new(Duration::from_millis(config.refresh_interval_ms));
    let handle = collector
        .start()
        .map_err(|e| format!("Failed to spawn collector thread: {}", e))?;

    for (i, snapshot) in rx.iter().enumerate() {
        let top = snapshot
            .processes
            .iter()
            .max_by(|a, b| a.cpu_percent.total_cmp(&b.cpu_percent))
            .map(|p| format!("{} ({:.1}%)", p.name, p.cpu_percent))
            .unwrap_or_default();
        println!(
            "cpu {:5.1}%  mem {:5.1}%  procs {:4}  top {}",
            snapshot.cpu.total_percent,
            snapshot.memory.used_percent(),
            snapshot.process_count,
            top
        );
        if count.map(|c| i + 1 >= c).unwrap_or(false) {
            break;
        }
    }

    drop(rx);
    handle
        .join()
        .map_err(|_| "Collector thread panicked".to_string())
}

fn print_processes(config: &Config, sort: Option<SortColumn>, ascending: bool, limit: Option<usize>) {
    let column = sort.unwrap_or_else(|| {
        config.sort_column.parse().unwrap_or_else(|e| {
            log::warn!("{}", e);
            SortColumn::Cpu
        })
    });
    let ascending = ascending || config.sort_ascending;
    let limit = limit.unwrap_or(config.process_limit);

    let mut collector = ProcessCollector::new();
    let _ = collector.collect();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    let mut processes = collector.collect();
    process::sort_processes(&mut processes, column, ascending);

    println!("{:>8}  {:>6}  {:>6}  NAME", "PID", "CPU%", "MEM%");
    for p in processes.iter().take(limit) {
        println!(
            "{:>8}  {:>6.1}  {:>6.1}  {}",
            p.pid, p.cpu_percent, p.memory_percent, p.name
        );
    }
}

fn run_startup(action: StartupAction) -> Result<(), String> {
    let mut manager = StartupManager::new(PlatformSource::new(), PathCache::new());

    match action {
        StartupAction::List => {
            print_startup_entries(&manager);
            Ok(())
        }
        StartupAction::Enable { name, path, scope } => {
            if manager.enable(&name, path.as_deref(), scope) {
                println!("'{}' has been enabled at startup.", name);
                Ok(())
            } else {
                Err(format!("Failed to enable '{}' at startup.", name))
            }
        }
        StartupAction::Disable { name } => {
            println!("{}", disable_entry(&mut manager, &name)?);
            Ok(())
        }
        StartupAction::Shell => run_startup_shell(&mut manager),
    }
}

/// A `false` from `disable` is only a success if the entry now lists as
/// disabled.
fn disable_entry<S: KeyValueSource>(manager: &mut StartupManager<S>, name: &str) -> Result<String, String> {
    if manager.disable(name) {
        return Ok(format!("'{}' has been disabled from startup.", name));
    }
    let marked = manager
        .list()
        .iter()
        .any(|entry| entry.name == name && !entry.is_enabled());
    if marked {
        Ok(format!("'{}' was not registered; it is now marked disabled.", name))
    } else {
        Err(format!("Failed to disable '{}' at startup.", name))
    }
}

fn print_startup_entries<S: KeyValueSource>(manager: &StartupManager<S>) {
    let mut entries = manager.list();
    if entries.is_empty() {
        println!("No startup programs found");
        return;
    }
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    println!("{:<9} {:<8} {:<32} PATH", "STATUS", "SCOPE", "NAME");
    for entry in &entries {
        println!(
            "{:<9} {:<8} {:<32} {}",
            entry.status.to_string(),
            entry.scope.to_string(),
            entry.name,
            entry.display_path()
        );
    }
}

const SHELL_HELP: &str = "Commands:
  list                                  show startup programs
  enable <name> [path] [--machine]      register and enable
  disable <name>                        unregister and disable (path is remembered)
  help                                  show this help
  quit                                  leave the shell
Quote names or paths that contain spaces.";

fn run_startup_shell<S: KeyValueSource>(manager: &mut StartupManager<S>) -> Result<(), String> {
    println!("{}", SHELL_HELP);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("startup> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let line = match lines.next() {
            Some(line) => line.map_err(|e| e.to_string())?,
            None => break,
        };
        let args = split_args(&line);
        let Some((command, rest)) = args.split_first() else {
            continue;
        };

        match command.as_str() {
            "list" | "ls" => print_startup_entries(manager),
            "enable" => {
                let scope = if rest.iter().any(|a| a == "--machine") {
                    StartupScope::Machine
                } else {
                    StartupScope::User
                };
                let positional: Vec<&String> = rest.iter().filter(|a| *a != "--machine").collect();
                match positional.as_slice() {
                    [name] | [name, _] => {
                        let path = positional.get(1).map(|p| p.as_str());
                        if manager.enable(name, path, scope) {
                            println!("'{}' has been enabled at startup.", name);
                        } else {
                            println!("Failed to enable '{}' at startup.", name);
                        }
                    }
                    _ => println!("usage: enable <name> [path] [--machine]"),
                }
            }
            "disable" => match rest {
                [name] => match disable_entry(manager, name) {
                    Ok(msg) | Err(msg) => println!("{}", msg),
                },
                _ => println!("usage: disable <name>"),
            },
            "help" | "?" => println!("{}", SHELL_HELP),
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. Type help.", other),
        }
    }
    Ok(())
}

fn run_chat(config: &Config, prompt: &str) -> Result<(), String> {
    let transport = GeminiTransport::new(&config.ai).map_err(|e| e.to_string())?;
    let profile = SystemProfile::collect();
    let mut session = ChatSession::new(transport, &profile);

    if !prompt.trim().is_empty() {
        println!("{}", session.send(prompt));
        return Ok(());
    }

    if let Some(greeting) = session.greeting() {
        println!("SysSKY: {}", greeting);
    }
    println!("(/reset clears the conversation, /history shows it, /quit leaves)");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("You: ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let line = match lines.next() {
            Some(line) => line.map_err(|e| e.to_string())?,
            None => break,
        };
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => print!("{}", session.history_for_display()),
            "/reset" => {
                session.reset();
                if let Some(greeting) = session.greeting() {
                    println!("SysSKY: {}", greeting);
                }
            }
            question => println!("SysSKY: {}", session.send(question)),
        }
    }
    Ok(())
}

fn show_config(config: &Config, init: bool) -> Result<(), String> {
    if init {
        let path = Config::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut shown = config.clone();
    if shown.ai.api_key.is_some() {
        shown.ai.api_key = Some("********".into());
    }
    let data = serde_json::to_string_pretty(&shown).map_err(|e| e.to_string())?;
    println!("# {}", config::config_path().display());
    println!("{}", data);
    Ok(())
}

fn format_gb(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

/// Whitespace-separated words; double quotes group words containing spaces.
fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}
