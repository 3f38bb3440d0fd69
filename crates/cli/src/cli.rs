// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::telemetry::setup_tracing;
use crate::{deploy, verify};
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use nftm_config::validation::ValidUrl;
use nftm_config::{load_config, AppConfig};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "nftm")]
#[command(about = "Deploy the NFT marketplace contracts and keep the front end in sync", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `nftm -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    pub async fn execute(self) -> Result<()> {
        setup_tracing(self.log_level());

        let config = self.load_config()?;
        info!("Config loaded from: {:?}", config.config_file());

        match self.command {
            Commands::Deploy {
                network,
                tags,
                update_front_end,
                rpc_url,
            } => deploy::execute(&config, &network, tags, update_front_end, rpc_url).await?,
            Commands::Verify { network, contract } => {
                verify::execute(&config, &network, &contract).await?
            }
        }

        Ok(())
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        load_config(self.config.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy the contracts and run the follow up tasks
    Deploy {
        /// Network to deploy to as named in the config
        #[arg(short, long, default_value = "hardhat")]
        network: String,

        /// Only run tasks carrying one of these tags. Eg. `--tags all` or `--tags frontend`
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Write addresses and abis to the front end. Same as setting `UPDATE_FRONT_END`
        #[arg(long)]
        update_front_end: bool,

        /// Override the network's rpc url
        #[arg(long)]
        rpc_url: Option<ValidUrl>,
    },

    /// Verify a saved deployment on the block explorer
    Verify {
        /// Network the contract was deployed to
        #[arg(short, long)]
        network: String,

        /// Contract name eg. `NFTMarketplace`
        #[arg(long)]
        contract: String,
    },
}
