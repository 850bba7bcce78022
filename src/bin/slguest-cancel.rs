//! Cancels a SoftLayer virtual guest.

use std::io::{self, Write};
use std::process;

use clap::Parser;

use slguest::app::run_cancel;
use slguest::cli::CancelCli;
use slguest::logging;

#[tokio::main]
async fn main() {
    let cli = CancelCli::parse();
    if let Err(err) = logging::init(cli.verbose) {
        writeln!(io::stderr(), "failed to initialise logging: {err}").ok();
    }

    let code = run_cancel(cli, &mut io::stdout(), &mut io::stderr()).await;
    process::exit(code);
}
