use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use contract_bindings::{
    AccountAddress,
    KeypairSigner,
    TransactionSigner,
};
use eth_keystore::decrypt_key;
use rpassword::prompt_password;
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::Arc,
};

pub const SECRET_KEY_ENV: &str = "SOROBAN_SECRET_KEY";
const ENV_WALLET_ID: &str = "env:SOROBAN_SECRET_KEY";

#[derive(Clone, Debug)]
pub struct WalletDescriptor {
    pub name: String,
    pub path: PathBuf,
}

impl WalletDescriptor {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }
}

pub fn default_wallet_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").wrap_err("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("soroban-dapps")
        .join("wallets"))
}

pub fn resolve_wallet_dir(dir: Option<&str>) -> Result<PathBuf> {
    match dir {
        Some(raw) => {
            let expanded = shellexpand::tilde(raw);
            Ok(PathBuf::from(expanded.into_owned()))
        }
        None => default_wallet_dir(),
    }
}

pub fn list_wallets(dir: &Path) -> Result<Vec<WalletDescriptor>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut wallets = Vec::new();
    for entry in fs::read_dir(dir).wrap_err("Failed to read wallet directory")? {
        let entry = entry.wrap_err("Failed to read wallet entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("wallet") {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| eyre!("Invalid wallet filename {:?}", path))?
            .to_owned();
        wallets.push(WalletDescriptor::new(name, path));
    }
    wallets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(wallets)
}

pub fn find_wallet(dir: &Path, name: &str) -> Result<WalletDescriptor> {
    let wallets = list_wallets(dir)?;
    wallets
        .into_iter()
        .find(|w| w.name == name)
        .ok_or_else(|| eyre!("Wallet '{name}' not found in {}", dir.to_string_lossy()))
}

/// Decrypt a keystore holding either a raw 32-byte ed25519 seed or an
/// `S...` secret.
pub fn unlock_wallet(descriptor: &WalletDescriptor, password: &str) -> Result<KeypairSigner> {
    let secret = decrypt_key(&descriptor.path, password.as_bytes())
        .map_err(|_| eyre!("Invalid password for wallet '{}'", descriptor.name))?;

    if secret.len() == 32 {
        return KeypairSigner::from_slice(&secret).map_err(|e| eyre!(e));
    }

    if let Ok(text) = std::str::from_utf8(&secret)
        && text.trim().starts_with('S')
    {
        return KeypairSigner::from_secret_strkey(text).map_err(|e| eyre!(e));
    }

    Err(eyre!(
        "Wallet '{}' contained unsupported key material",
        descriptor.name
    ))
}

pub fn prompt_and_unlock(descriptor: &WalletDescriptor) -> Result<KeypairSigner> {
    let prompt = format!("Enter password for wallet '{}': ", descriptor.name);
    let password = prompt_password(prompt).wrap_err("Failed to read wallet password")?;
    unlock_wallet(descriptor, &password)
}

/// One entry in the wallet-selection modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletOption {
    pub id: String,
    pub name: String,
    pub needs_password: bool,
}

/// The capability surface the dapps need from a wallet: list choices,
/// select one, report its address and sign with it.
///
/// `set_wallet` must leave the previous selection in place when it fails.
pub trait WalletBridge: Send + 'static {
    fn open_modal(&self) -> Result<Vec<WalletOption>>;

    fn set_wallet(&mut self, id: &str, password: Option<&str>) -> Result<()>;

    fn get_address(&self) -> Result<AccountAddress>;

    fn signer(&self) -> Result<Arc<dyn TransactionSigner>>;
}

/// Wallets from the keystore directory, plus the secret in
/// `SOROBAN_SECRET_KEY` when it is set.
pub struct KeystoreBridge {
    dir: PathBuf,
    active: Option<(String, Arc<KeypairSigner>)>,
}

impl KeystoreBridge {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, active: None }
    }

    fn unlock(&self, id: &str, password: Option<&str>) -> Result<KeypairSigner> {
        if id == ENV_WALLET_ID {
            let secret = std::env::var(SECRET_KEY_ENV)
                .wrap_err_with(|| format!("{SECRET_KEY_ENV} is not set"))?;
            return KeypairSigner::from_secret_strkey(&secret).map_err(|e| eyre!(e));
        }
        let descriptor = find_wallet(&self.dir, id)?;
        let password = password.ok_or_else(|| eyre!("Wallet '{id}' needs a password"))?;
        unlock_wallet(&descriptor, password)
    }
}

impl WalletBridge for KeystoreBridge {
    fn open_modal(&self) -> Result<Vec<WalletOption>> {
        let mut options: Vec<WalletOption> = list_wallets(&self.dir)?
            .into_iter()
            .map(|w| WalletOption {
                id: w.name.clone(),
                name: w.name,
                needs_password: true,
            })
            .collect();
        if std::env::var_os(SECRET_KEY_ENV).is_some() {
            options.push(WalletOption {
                id: ENV_WALLET_ID.to_string(),
                name: format!("${SECRET_KEY_ENV}"),
                needs_password: false,
            });
        }
        Ok(options)
    }

    fn set_wallet(&mut self, id: &str, password: Option<&str>) -> Result<()> {
        let signer = self.unlock(id, password)?;
        tracing::info!(wallet = id, address = %signer.public_key(), "wallet unlocked");
        self.active = Some((id.to_string(), Arc::new(signer)));
        Ok(())
    }

    fn get_address(&self) -> Result<AccountAddress> {
        self.active
            .as_ref()
            .map(|(_, signer)| signer.public_key())
            .ok_or_else(|| eyre!("No wallet selected"))
    }

    fn signer(&self) -> Result<Arc<dyn TransactionSigner>> {
        self.active
            .as_ref()
            .map(|(_, signer)| signer.clone() as Arc<dyn TransactionSigner>)
            .ok_or_else(|| eyre!("No wallet selected"))
    }
}
