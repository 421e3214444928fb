use crate::error::ClientError;
use std::{
    fmt,
    str::FromStr,
};
use stellar_xdr::curr::{
    AccountId,
    Hash,
    MuxedAccount,
    PublicKey,
    ScAddress,
    Uint256,
};

/// An ed25519 account, rendered as a `G...` strkey.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress(pub [u8; 32]);

/// A deployed contract, rendered as a `C...` strkey.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractAddress(pub [u8; 32]);

impl AccountAddress {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_sc_address(self) -> ScAddress {
        ScAddress::Account(self.to_account_id())
    }

    pub fn to_account_id(self) -> AccountId {
        AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(self.0)))
    }

    pub fn to_muxed(self) -> MuxedAccount {
        MuxedAccount::Ed25519(Uint256(self.0))
    }
}

impl ContractAddress {
    pub fn to_sc_address(self) -> ScAddress {
        ScAddress::Contract(Hash(self.0))
    }
}

/// Either kind of address a contract argument may name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Address {
    Account(AccountAddress),
    Contract(ContractAddress),
}

impl Address {
    pub fn to_sc_address(self) -> ScAddress {
        match self {
            Address::Account(account) => account.to_sc_address(),
            Address::Contract(contract) => contract.to_sc_address(),
        }
    }
}

impl From<AccountAddress> for Address {
    fn from(value: AccountAddress) -> Self {
        Address::Account(value)
    }
}

impl From<ContractAddress> for Address {
    fn from(value: ContractAddress) -> Self {
        Address::Contract(value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Account(account) => fmt::Display::fmt(account, f),
            Address::Contract(contract) => fmt::Display::fmt(contract, f),
        }
    }
}

impl FromStr for Address {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(account) = s.parse::<AccountAddress>() {
            return Ok(Address::Account(account));
        }
        s.parse::<ContractAddress>()
            .map(Address::Contract)
            .map_err(|_| ClientError::validation(format!("'{s}' is not a G... or C... address")))
    }
}

impl TryFrom<&ScAddress> for Address {
    type Error = ClientError;

    fn try_from(value: &ScAddress) -> Result<Self, Self::Error> {
        match value {
            ScAddress::Contract(Hash(bytes)) => Ok(Address::Contract(ContractAddress(*bytes))),
            other => AccountAddress::try_from(other).map(Address::Account),
        }
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = stellar_strkey::ed25519::PublicKey(self.0);
        write!(f, "{}", key.to_string())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({self})")
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = stellar_strkey::Contract(self.0);
        write!(f, "{}", key.to_string())
    }
}

impl fmt::Debug for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractAddress({self})")
    }
}

impl FromStr for AccountAddress {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        stellar_strkey::ed25519::PublicKey::from_string(s.trim())
            .map(|key| Self(key.0))
            .map_err(|_| ClientError::validation(format!("'{s}' is not a G... account address")))
    }
}

impl FromStr for ContractAddress {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        stellar_strkey::Contract::from_string(s.trim())
            .map(|key| Self(key.0))
            .map_err(|_| ClientError::validation(format!("'{s}' is not a C... contract id")))
    }
}

impl TryFrom<&ScAddress> for AccountAddress {
    type Error = ClientError;

    fn try_from(value: &ScAddress) -> Result<Self, Self::Error> {
        match value {
            ScAddress::Account(AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(bytes)))) => {
                Ok(Self(*bytes))
            }
            other => Err(ClientError::decode(format!(
                "expected an account address, got {other:?}"
            ))),
        }
    }
}
