pub mod bootstrap_config;
pub mod install_bundle;
pub mod setup;
