#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]

//! Groups CD-box snoRNAs into families sharing the same D-box interaction region.
mod cli;

use log::{error, info};
use snofam::{family, table, Error, Result, SnoType};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use structopt::StructOpt;

fn main() {
    let opt = cli::Opt::from_args();
    opt.set_logging();

    let start = Instant::now();
    if opt.verbose {
        info!("Started grouping {}", opt.input.display());
    }

    if let Err(e) = run(&opt) {
        error!("{}", e);
        std::process::exit(1);
    }

    if opt.verbose {
        info!(
            "Successfully finished in {} seconds",
            start.elapsed().as_secs()
        );
    }
}

fn run(opt: &cli::Opt) -> Result<()> {
    if opt.sno_type == SnoType::Haca {
        return Err(Error::NotImplemented(String::from(
            "HACA snoRNA families are not supported yet",
        )));
    }

    let rows = table::read_rows(&opt.input)?;
    let families = family::group_families(&rows, opt.sno_type, &opt.group_options())?;

    let out: Box<dyn Write> = match opt.output {
        Some(ref path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    families.write(out)
}
