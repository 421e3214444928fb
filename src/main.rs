use clap::{
    Parser,
    Subcommand,
    ValueEnum,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use contract_bindings::{
    ContractAddress,
    SorobanRpcTransport,
    TransactionSigner,
};
use deployments::{
    DEPLOYMENTS_ROOT,
    DappKind,
    NetworkEnv,
};
use soroban_dapps::{
    client::{
        self,
        AppController,
    },
    config::{
        ProfileOverrides,
        resolve_profile,
    },
    wallets::{
        KeystoreBridge,
        find_wallet,
        list_wallets,
        prompt_and_unlock,
        resolve_wallet_dir,
    },
};
use serde::Serialize;
use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

const LOG_FILE: &str = "soroban-dapps.log";

#[derive(Parser, Debug)]
#[command(
    name = "soroban-dapps",
    about = "Claim POAPs and play the betting game on Soroban from the terminal",
    version
)]
struct Cli {
    /// Use Stellar testnet (default)
    #[arg(long, global = true, conflicts_with_all = ["futurenet", "local"])]
    testnet: bool,

    /// Use Stellar futurenet
    #[arg(long, global = true, conflicts_with_all = ["testnet", "local"])]
    futurenet: bool,

    /// Use a local standalone network
    #[arg(long, global = true, conflicts_with_all = ["testnet", "futurenet"])]
    local: bool,

    /// Override the Soroban RPC URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Override the contract id (C...)
    #[arg(long, global = true)]
    contract_id: Option<String>,

    /// Keystore directory (defaults to ~/.config/soroban-dapps/wallets)
    #[arg(long, global = true)]
    wallet_dir: Option<String>,

    /// Where the UI writes its log file
    #[arg(long, global = true, default_value = "logs")]
    log_dir: String,

    /// Root of the recorded deployments
    #[arg(long, global = true, default_value = DEPLOYMENTS_ROOT)]
    deployments_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the POAP event dapp
    Poap,
    /// Open the game betting dapp
    Game,
    /// Inspect or record contract deployments
    Network {
        #[command(subcommand)]
        action: NetworkAction,
    },
    /// Inspect local wallets
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
}

#[derive(Subcommand, Debug)]
enum NetworkAction {
    /// Print the endpoint and contract a dapp would use
    Show {
        #[arg(long, value_enum)]
        dapp: DappArg,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record the contract id for a dapp on the selected network
    Set {
        #[arg(long, value_enum)]
        dapp: DappArg,
    },
}

#[derive(Subcommand, Debug)]
enum WalletAction {
    /// List keystore files in the wallet directory
    List,
    /// Unlock a wallet and print its public key
    Address { name: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DappArg {
    Poap,
    Game,
}

impl From<DappArg> for DappKind {
    fn from(arg: DappArg) -> Self {
        match arg {
            DappArg::Poap => DappKind::Poap,
            DappArg::Game => DappKind::Game,
        }
    }
}

impl Cli {
    fn network(&self) -> NetworkEnv {
        if self.futurenet {
            NetworkEnv::Futurenet
        } else if self.local {
            NetworkEnv::Local
        } else {
            NetworkEnv::Testnet
        }
    }

    fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            rpc_url: self.rpc_url.clone(),
            contract_id: self.contract_id.clone(),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The TUI owns the terminal, so its logs go to a daily file.
fn init_file_logging(log_dir: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let appender = rolling::daily(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    guard
}

fn init_stderr_logging() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_dapp(cli: &Cli, dapp: DappKind) -> Result<()> {
    let _guard = init_file_logging(&cli.log_dir);
    let env = cli.network();
    tracing::info!(%dapp, %env, "starting soroban-dapps");
    deployments::ensure_structure(&cli.deployments_dir).map_err(|e| eyre!(e))?;

    let profile = resolve_profile(&cli.deployments_dir, env, dapp, &cli.overrides())?;
    let transport = SorobanRpcTransport::new(profile.rpc_url.clone())
        .map_err(|e| eyre!(e))
        .wrap_err("creating RPC client failed")?;
    tracing::info!(
        rpc = transport.url(),
        contract = %profile.contract_id,
        "using network profile"
    );
    let wallet_dir = resolve_wallet_dir(cli.wallet_dir.as_deref())?;
    let bridge = KeystoreBridge::new(wallet_dir);

    let controller = AppController::new(profile, transport, bridge);
    client::run_app(controller).await
}

#[derive(Serialize)]
struct ProfileView {
    dapp: String,
    network: String,
    rpc_url: String,
    network_passphrase: String,
    contract_id: String,
}

fn show_network(cli: &Cli, dapp: DappKind, json: bool) -> Result<()> {
    let profile = resolve_profile(&cli.deployments_dir, cli.network(), dapp, &cli.overrides())?;
    if json {
        let view = ProfileView {
            dapp: profile.dapp.to_string(),
            network: profile.env.to_string(),
            rpc_url: profile.rpc_url,
            network_passphrase: profile.network_passphrase,
            contract_id: profile.contract_id.to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    println!("dapp:       {}", profile.dapp);
    println!("network:    {}", profile.env);
    println!("rpc url:    {}", profile.rpc_url);
    println!("passphrase: {}", profile.network_passphrase);
    println!("contract:   {}", profile.contract_id);
    Ok(())
}

fn set_network(cli: &Cli, dapp: DappKind) -> Result<()> {
    let env = cli.network();
    let raw = cli
        .contract_id
        .as_deref()
        .ok_or_else(|| eyre!("--contract-id is required for `network set`"))?;
    let contract: ContractAddress = raw
        .parse()
        .wrap_err_with(|| format!("invalid contract id '{raw}'"))?;
    let rpc_url = cli
        .rpc_url
        .clone()
        .unwrap_or_else(|| env.default_rpc_url().to_string());

    deployments::ensure_structure(&cli.deployments_dir).map_err(|e| eyre!(e))?;
    let record = deployments::record_deployment(
        &cli.deployments_dir,
        env,
        dapp,
        contract.to_string(),
        &rpc_url,
        env.passphrase(),
    )
    .map_err(|e| eyre!(e))
    .wrap_err("recording deployment failed")?;
    tracing::info!(%dapp, %env, contract = %record.contract_id, "deployment recorded");
    println!("Recorded {dapp} contract {} for {env}", record.contract_id);
    Ok(())
}

fn wallet_command(cli: &Cli, action: &WalletAction) -> Result<()> {
    let dir = resolve_wallet_dir(cli.wallet_dir.as_deref())?;
    match action {
        WalletAction::List => {
            let wallets = list_wallets(&dir)?;
            if wallets.is_empty() {
                println!("No wallets found in {}", dir.display());
            }
            for wallet in wallets {
                println!("{}", wallet.name);
            }
        }
        WalletAction::Address { name } => {
            let descriptor = find_wallet(&dir, name)?;
            let signer = prompt_and_unlock(&descriptor)?;
            println!("{}", signer.public_key());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    match &cli.command {
        Command::Poap => run_dapp(&cli, DappKind::Poap).await,
        Command::Game => run_dapp(&cli, DappKind::Game).await,
        Command::Network { action } => {
            init_stderr_logging();
            match action {
                NetworkAction::Show { dapp, json } => show_network(&cli, (*dapp).into(), *json),
                NetworkAction::Set { dapp } => set_network(&cli, (*dapp).into()),
            }
        }
        Command::Wallet { action } => {
            init_stderr_logging();
            wallet_command(&cli, action)
        }
    }
}
