//! Build script for generating the `slguest-create` and `slguest-cancel`
//! man pages.
//!
//! The packaging pipeline expects the man pages to be available from the
//! build output directory, so we generate them using clap-mangen here.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Command, CommandFactory};
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
#[expect(dead_code, reason = "only the command definitions are needed here")]
mod cli;

use cli::{CancelCli, CreateCli};

fn render(out_dir: &Path, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = format!("{}.1", command.get_name());
    let mut buffer = Vec::new();
    Man::new(command).render(&mut buffer)?;

    let mut file = File::create(out_dir.join(file_name))?;
    file.write_all(&buffer)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "cargo:rerun-if-changed=build.rs")?;
    writeln!(stdout, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir =
        PathBuf::from(env::var_os("OUT_DIR").ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR was not set")
        })?);

    render(&out_dir, CreateCli::command())?;
    render(&out_dir, CancelCli::command())?;

    Ok(())
}
