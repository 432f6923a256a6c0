pub mod command;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod inventory;
pub mod logger;
pub mod machine;
pub mod preflight;
pub mod resolver;
pub mod theme;
pub mod ui;
pub mod workflow;

pub use error::VirtdeckError;
pub use machine::{Address, MachineRecord, MachineState, PrimaryAction, SecondaryAction};

pub type Result<T> = std::result::Result<T, VirtdeckError>;

// Convenience re-exports for the dashboard seams
pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use console::{Console, Notice, TerminalConsole};
pub use dashboard::{Dashboard, Key, ViewState};
pub use gateway::{Diagnostic, Hypervisor, VirshGateway};
pub use inventory::{Snapshot, build_snapshot};
pub use resolver::{AddressResolver, HostResolver};
