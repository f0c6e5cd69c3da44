use clap::Parser;
use std::io;

use hp_py_sleep_setup::cli_app::{handle_setup, install_interrupt_handler, SetupCli};
use hp_py_sleep_setup::logging::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    SetupCli::parse();
    init_tracing();
    install_interrupt_handler();

    let stdin = io::stdin();
    let exit_code = handle_setup(stdin.lock(), io::stdout()).await;
    std::process::exit(exit_code);
}
