pub mod args;
pub mod control;

pub use args::{Cli, CliCommand, StartArgs, StopArgs};
pub use control::{handle_start_command, handle_status_command, handle_stop_command};
