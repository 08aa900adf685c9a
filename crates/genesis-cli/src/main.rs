// Genesis block generator - CLI

mod cli;

use clap::Parser;
use genesis_core::{GenesisBlock, HashBackends, Result};

use crate::cli::{announce_found_genesis, print_block_info, Cli};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?.resolve()?;

    // No X-family backends ship with this binary
    let genesis = GenesisBlock::build(config, &HashBackends::new())?;

    if !cli.json {
        print_block_info(&genesis.report(None));
    }

    let result = genesis.mine()?;
    let report = genesis.report(Some(&result));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(solution) = &report.solution {
        announce_found_genesis(solution);
    }

    Ok(())
}
