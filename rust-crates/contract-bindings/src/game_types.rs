//! Bindings for the game-betting contract.

use crate::{
    address::{
        AccountAddress,
        Address,
    },
    client::{
        AssembledTransaction,
        ClientOptions,
        ContractClient,
    },
    codec::{
        FromScVal,
        IntoScVal,
    },
    error::{
        ClientError,
        Result,
    },
    transport::ContractTransport,
};
use std::fmt;
use stellar_xdr::curr::{
    ScBytes,
    ScVal,
};

pub const GAME_ID_LEN: usize = 32;

/// A game key: the label's UTF-8 bytes followed by zero padding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameId(pub [u8; GAME_ID_LEN]);

impl GameId {
    pub fn from_label(label: &str) -> Result<Self> {
        if label.is_empty() {
            return Err(ClientError::validation("Game ID cannot be empty"));
        }
        let bytes = label.as_bytes();
        if bytes.len() > GAME_ID_LEN {
            return Err(ClientError::validation(format!(
                "Game ID must be at most {GAME_ID_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut id = [0u8; GAME_ID_LEN];
        id[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; GAME_ID_LEN] {
        &self.0
    }

    /// The label with trailing padding removed.
    pub fn label(&self) -> String {
        let end = self
            .0
            .iter()
            .rposition(|b| *b != 0)
            .map(|pos| pos + 1)
            .unwrap_or(0);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({:?})", self.label())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl IntoScVal for GameId {
    fn into_sc_val(self) -> Result<ScVal> {
        let bytes = self
            .0
            .to_vec()
            .try_into()
            .map_err(|_| ClientError::decode("game id does not fit in bytes"))?;
        Ok(ScVal::Bytes(ScBytes(bytes)))
    }
}

impl FromScVal for GameId {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        match val {
            ScVal::Bytes(ScBytes(bytes)) => {
                let raw: [u8; GAME_ID_LEN] = bytes.as_slice().try_into().map_err(|_| {
                    ClientError::decode(format!(
                        "game id must be {GAME_ID_LEN} bytes, got {}",
                        bytes.len()
                    ))
                })?;
                Ok(Self(raw))
            }
            other => Err(ClientError::decode(format!(
                "expected game id bytes, got {other:?}"
            ))),
        }
    }
}

/// Typed client for the game contract.
#[derive(Clone, Debug)]
pub struct GameClient<T> {
    inner: ContractClient<T>,
}

impl<T: ContractTransport> GameClient<T> {
    pub fn new(options: ClientOptions<T>) -> Self {
        Self {
            inner: ContractClient::new(options),
        }
    }

    pub fn public_key(&self) -> AccountAddress {
        self.inner.public_key()
    }

    pub fn options(&self) -> &ClientOptions<T> {
        self.inner.options()
    }

    pub async fn init(&self, token: Address) -> Result<AssembledTransaction<(), T>> {
        self.inner.invoke("init", vec![token.into_sc_val()?]).await
    }

    pub async fn create_game(
        &self,
        game_id: GameId,
        min_bet: i128,
        max_players: u32,
    ) -> Result<AssembledTransaction<(), T>> {
        let args = vec![
            game_id.into_sc_val()?,
            min_bet.into_sc_val()?,
            max_players.into_sc_val()?,
        ];
        self.inner.invoke("create_game", args).await
    }

    pub async fn join_game(
        &self,
        game_id: GameId,
        player: AccountAddress,
        choice: u32,
        amount: i128,
    ) -> Result<AssembledTransaction<(), T>> {
        let args = vec![
            game_id.into_sc_val()?,
            player.into_sc_val()?,
            choice.into_sc_val()?,
            amount.into_sc_val()?,
        ];
        self.inner.invoke("join_game", args).await
    }

    pub async fn resolve_game(
        &self,
        game_id: GameId,
        result: u32,
    ) -> Result<AssembledTransaction<(), T>> {
        let args = vec![game_id.into_sc_val()?, result.into_sc_val()?];
        self.inner.invoke("resolve_game", args).await
    }

    pub async fn get_pot(&self, game_id: GameId) -> Result<AssembledTransaction<i128, T>> {
        self.inner
            .invoke("get_pot", vec![game_id.into_sc_val()?])
            .await
    }
}
