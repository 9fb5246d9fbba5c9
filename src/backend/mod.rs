mod collector;
pub mod cpu;
pub mod disk;
pub mod memory;
pub mod process;
pub mod startup;

pub use collector::Collector;
