use anyhow::{self};
use clap::Parser;
use concat_gen::state::{Cli, Logger};

fn main() -> Result<(), anyhow::Error> {
    let opt = Cli::parse().configure()?;
    Logger::init(opt.log_level);
    concat_gen::run(&opt)
}
