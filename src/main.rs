use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use alloy_primitives::U256;
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use menucall::config::{self, Config};
use menucall::infrastructure::{ArtifactScanner, GasSettings, ProviderConfig, RpcEngine, Wallet};
use menucall::session::{Client, Driver, DriverOptions};
use menucall::ui::{Prompt, ScriptedPrompt, TerminalPrompt};

/// 1 ether in wei
const FUNDING: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Parser)]
#[command(
    name = "menucall",
    version,
    about = "Walk the menus a contract emits as event logs"
)]
struct Args {
    /// Config file (defaults to $MENUCALL_CONFIG or ~/.config/menucall/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Node endpoint: http(s)://, ws(s):// or an IPC path
    #[arg(long)]
    rpc: Option<String>,

    /// Directory holding compiled artifacts
    #[arg(long, value_name = "DIR")]
    build_dir: Option<PathBuf>,

    /// Entry contract
    #[arg(long)]
    contract: Option<String>,

    /// Entry function
    #[arg(long)]
    function: Option<String>,

    /// Hex private key of the session wallet (random when omitted)
    #[arg(long, value_name = "HEX")]
    private_key: Option<String>,

    /// Do not credit the wallet through anvil_setBalance
    #[arg(long)]
    no_fund: bool,

    /// Send non-view functions as transactions
    #[arg(long)]
    transact: bool,

    /// Answer prompts from this list instead of the terminal (repeatable)
    #[arg(long = "pick", value_name = "CHOICE")]
    picks: Vec<String>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(rpc) = &self.rpc {
            config.rpc = rpc.clone();
        }
        if let Some(dir) = &self.build_dir {
            config.build_dir = dir.clone();
        }
        if let Some(contract) = &self.contract {
            config.contract = contract.clone();
        }
        if let Some(function) = &self.function {
            config.function = function.clone();
        }
        if let Some(key) = &self.private_key {
            config.private_key = Some(key.clone());
        }
        if self.no_fund {
            config.fund_wallet = false;
        }
        if self.transact {
            config.transact = true;
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("MENUCALL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    args.apply(&mut config);

    let registry = ArtifactScanner::scan(&config.build_dir);
    for err in &registry.scan_errors {
        tracing::warn!(%err, "artifact skipped");
    }
    tracing::info!(
        contracts = registry.len(),
        files = registry.scanned_files,
        ms = registry.scan_ms as u64,
        dir = %config.build_dir.display(),
        "artifacts loaded"
    );
    if registry.is_empty() {
        anyhow::bail!("no contract artifacts found in {}", config.build_dir.display());
    }

    let mut gas = GasSettings::default();
    if let Some(limit) = config.gas_limit {
        gas.gas_limit = limit;
    }
    gas.gas_price = config.gas_price.map(u128::from);
    let engine = RpcEngine::connect(ProviderConfig::from_url(&config.rpc), gas).await?;

    let wallet = match &config.private_key {
        Some(key) => Wallet::from_private_key(key)?,
        None => Wallet::random(),
    };

    let mut client = Client::new(registry, Box::new(engine), wallet);
    tracing::info!(
        endpoint = %client.engine().endpoint_name(),
        wallet = %client.wallet().address(),
        "session ready"
    );
    if config.fund_wallet {
        client.fund_wallet(U256::from(FUNDING)).await?;
    }
    for spec in &config.instances {
        client.bind(&spec.name, spec.parsed_address()?)?;
    }
    for name in config.deploy_list() {
        client
            .deploy(&name)
            .await
            .with_context(|| format!("failed to deploy {name}"))?;
    }

    let prompt: Box<dyn Prompt> = if args.picks.is_empty() {
        Box::new(TerminalPrompt::new())
    } else {
        Box::new(ScriptedPrompt::new(args.picks.clone()))
    };
    let options = DriverOptions {
        transact_mutating: config.transact,
    };

    let mut driver = Driver::new(client, prompt, io::stdout()).with_options(options);
    driver.run(&config.contract, &config.function).await?;
    Ok(())
}
