use clap::Parser;
use std::io;

use hp_py_sleep_setup::cli_app::{handle_config, install_interrupt_handler, ConfigCli};
use hp_py_sleep_setup::logging::init_tracing;

fn main() {
    ConfigCli::parse();
    init_tracing();
    install_interrupt_handler();

    std::process::exit(handle_config(io::stdout()));
}
