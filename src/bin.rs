use anyhow::anyhow;
use clap::Parser;

use chip8_host::{
    cli::{self, Args},
    logger,
};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.log_level)?;

    let report = cli::run(&args)?;
    print!("{}", report.screen);

    match report.fault {
        Some(e) => Err(anyhow!(e).context(format!("stopped after {} frames", report.frames))),
        None => Ok(()),
    }
}
