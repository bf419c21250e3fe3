mod env;
mod hook;
mod service;

pub use env::{cmd_env, cmd_paths};
pub use hook::cmd_hook;
pub use service::{ServiceArgs, cmd_remove, cmd_serve, cmd_start, cmd_status, cmd_stop};
