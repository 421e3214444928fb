use anyhow::{
    Context,
    Result,
    anyhow,
};
use chrono::Utc;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

pub const DEPLOYMENTS_ROOT: &str = ".deployments";

pub const TESTNET_POAP_CONTRACT: &str =
    "CDWEW3HL6QNYT75IYAR6RIS4ALEINBUI4TMIXMDX6ZVFYQOQRA43SO3V";
pub const TESTNET_GAME_CONTRACT: &str =
    "CDGMJLYFSGEKLYMB4K22CIJRVUJBJZGPEB7JRLRWQQ7XMV75P2RUO2YY";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum NetworkEnv {
    Testnet,
    Futurenet,
    Local,
}

impl NetworkEnv {
    pub const ALL: [NetworkEnv; 3] =
        [NetworkEnv::Testnet, NetworkEnv::Futurenet, NetworkEnv::Local];

    pub fn dir_name(self) -> &'static str {
        match self {
            NetworkEnv::Testnet => "testnet",
            NetworkEnv::Futurenet => "futurenet",
            NetworkEnv::Local => "local",
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            NetworkEnv::Testnet => "https://soroban-testnet.stellar.org",
            NetworkEnv::Futurenet => "https://rpc-futurenet.stellar.org",
            NetworkEnv::Local => "http://localhost:8000/soroban/rpc",
        }
    }

    pub fn passphrase(self) -> &'static str {
        match self {
            NetworkEnv::Testnet => "Test SDF Network ; September 2015",
            NetworkEnv::Futurenet => "Test SDF Future Network ; October 2022",
            NetworkEnv::Local => "Standalone Network ; February 2017",
        }
    }
}

impl fmt::Display for NetworkEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkEnv::Testnet => "Testnet",
            NetworkEnv::Futurenet => "Futurenet",
            NetworkEnv::Local => "Local",
        };
        write!(f, "{name}")
    }
}

/// Which of the two dapps a record belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DappKind {
    Poap,
    Game,
}

impl DappKind {
    pub fn file_name(self) -> &'static str {
        match self {
            DappKind::Poap => "poap.json",
            DappKind::Game => "game.json",
        }
    }
}

impl fmt::Display for DappKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DappKind::Poap => write!(f, "POAP"),
            DappKind::Game => write!(f, "Game"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub recorded_at: String,
    pub contract_id: String,
    pub network_url: String,
    pub network_passphrase: String,
}

/// The contracts the dapps were published against. Only testnet has any.
pub fn builtin_record(env: NetworkEnv, dapp: DappKind) -> Option<DeploymentRecord> {
    let contract_id = match (env, dapp) {
        (NetworkEnv::Testnet, DappKind::Poap) => TESTNET_POAP_CONTRACT,
        (NetworkEnv::Testnet, DappKind::Game) => TESTNET_GAME_CONTRACT,
        _ => return None,
    };
    Some(DeploymentRecord {
        recorded_at: String::new(),
        contract_id: contract_id.to_string(),
        network_url: env.default_rpc_url().to_string(),
        network_passphrase: env.passphrase().to_string(),
    })
}

#[derive(Debug)]
pub struct DeploymentStore {
    path: PathBuf,
}

impl DeploymentStore {
    pub fn open(root: impl AsRef<Path>, env: NetworkEnv, dapp: DappKind) -> Result<Self> {
        let path = ensure_store(root.as_ref(), env, dapp)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<DeploymentRecord>> {
        read_record(&self.path)
    }

    pub fn save(&self, record: DeploymentRecord) -> Result<()> {
        write_record(&self.path, &record)
    }

    /// The stored record, falling back to the built-in one.
    pub fn resolve(&self, env: NetworkEnv, dapp: DappKind) -> Result<Option<DeploymentRecord>> {
        Ok(self.load()?.or_else(|| builtin_record(env, dapp)))
    }
}

pub fn ensure_structure(root: impl AsRef<Path>) -> Result<()> {
    for env in NetworkEnv::ALL {
        let env_dir = root.as_ref().join(env.dir_name());
        fs::create_dir_all(&env_dir).with_context(|| {
            format!("Failed to create deployments directory {}", env_dir.display())
        })?;
    }
    Ok(())
}

fn ensure_store(root: &Path, env: NetworkEnv, dapp: DappKind) -> Result<PathBuf> {
    let env_dir = root.join(env.dir_name());
    if !env_dir.exists() {
        fs::create_dir_all(&env_dir).with_context(|| {
            format!("Failed to create deployments directory {}", env_dir.display())
        })?;
    }

    let file_path = env_dir.join(dapp.file_name());
    if !file_path.exists() {
        fs::write(&file_path, b"").with_context(|| {
            format!(
                "Failed to create {} deployment record for {} at {:?}",
                dapp, env, file_path
            )
        })?;
    }

    Ok(file_path)
}

fn read_record(path: impl AsRef<Path>) -> Result<Option<DeploymentRecord>> {
    let data = fs::read(path.as_ref()).context("Failed to read deployment record")?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<DeploymentRecord>(&data).map(Some).map_err(|e| {
        anyhow!(
            "Failed to parse deployment record {}: {e}",
            path.as_ref().display()
        )
    })
}

fn write_record(path: impl AsRef<Path>, record: &DeploymentRecord) -> Result<()> {
    let json = serde_json::to_vec_pretty(record)
        .context("Failed to serialize deployment record")?;
    fs::write(path.as_ref(), json).context("Failed to write deployment record")?;
    Ok(())
}

pub fn record_deployment(
    root: impl AsRef<Path>,
    env: NetworkEnv,
    dapp: DappKind,
    contract_id: impl AsRef<str>,
    network_url: impl AsRef<str>,
    network_passphrase: impl AsRef<str>,
) -> Result<DeploymentRecord> {
    let store = DeploymentStore::open(root, env, dapp)?;
    let record = DeploymentRecord {
        recorded_at: Utc::now().to_rfc3339(),
        contract_id: contract_id.as_ref().to_string(),
        network_url: network_url.as_ref().to_string(),
        network_passphrase: network_passphrase.as_ref().to_string(),
    };
    store.save(record.clone())?;
    Ok(record)
}
