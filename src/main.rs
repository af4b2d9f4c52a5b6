use std::{io, path::PathBuf, process};

use clap::Parser;
use mmu::ReplacementPolicy;
use virtual_memory::{config, Config};

#[derive(Parser, Debug)]
#[command(name = "virtual_memory")]
#[command(about = "Translates logical addresses through a TLB and page table, checking each against an oracle")]
struct Args {
    /// Logical address stream, one decimal address per record
    #[arg(long, default_value = config::DEFAULT_ADDRESSES)]
    addresses: PathBuf,

    /// Expected results ("Virtual address: V Physical address: P Value: X")
    #[arg(long, default_value = config::DEFAULT_ORACLE)]
    oracle: PathBuf,

    /// Flat image holding every page of the address space
    #[arg(long, default_value = config::DEFAULT_BACKING_STORE)]
    backing_store: PathBuf,

    /// Physical frames available (256 disables replacement)
    #[arg(long, default_value_t = mmu::DEFAULT_FRAMES)]
    frames: usize,

    /// Page replacement policy once all frames are in use (fifo or lru)
    #[arg(long, default_value_t = ReplacementPolicy::Fifo)]
    policy: ReplacementPolicy,

    /// Number of records to translate
    #[arg(long, default_value_t = config::DEFAULT_COUNT)]
    count: usize,

    /// Only print the summary
    #[arg(long, short)]
    quiet: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            addresses: args.addresses,
            oracle: args.oracle,
            backing_store: args.backing_store,
            frames: args.frames,
            policy: args.policy,
            count: args.count,
            trace: !args.quiet,
        }
    }
}

fn main() {
    env_logger::init();
    let config = Config::from(Args::parse());

    let stdout = io::stdout();
    match virtual_memory::run(&config, &mut stdout.lock()) {
        Ok(report) if report.passed() => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            let code = e.exit_code();
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            process::exit(code);
        }
    }
}
