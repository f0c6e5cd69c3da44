pub mod cli_app;
pub mod command_logic;
pub mod config;
pub mod constants;
pub mod errors;
pub mod external_api;
pub mod logging;
pub mod settings;
pub mod utils;

pub use command_logic::bootstrap_config::ensure_default_config;
pub use command_logic::setup::{run_setup, SetupContext, SetupSummary};
pub use errors::SetupError;
