use clap::Parser;
use ndispers::{
    console::{run, Args, PartialArgs},
    error::NdResult,
};
use std::io;

fn main() -> NdResult<()> {
    env_logger::init();
    //parse and validate CLI arguments
    let args = Args::try_from(PartialArgs::parse())?;
    run(&args, &mut io::stdout().lock())
}
