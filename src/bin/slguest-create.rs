//! Orders a SoftLayer virtual guest and prints its connection details.

use std::io::{self, Write};
use std::process;

use clap::Parser;

use slguest::app::run_create;
use slguest::cli::CreateCli;
use slguest::logging;

#[tokio::main]
async fn main() {
    let cli = CreateCli::parse();
    if let Err(err) = logging::init(cli.verbose) {
        writeln!(io::stderr(), "failed to initialise logging: {err}").ok();
    }

    let code = run_create(cli, &mut io::stdout(), &mut io::stderr()).await;
    process::exit(code);
}
