//! Bindings for the POAP factory contract.

use crate::{
    address::AccountAddress,
    client::{
        AssembledTransaction,
        ClientOptions,
        ContractClient,
    },
    codec::{
        FromScVal,
        IntoScVal,
        StructFields,
        struct_to_sc_val,
    },
    error::Result,
    transport::ContractTransport,
};
use std::fmt;
use stellar_xdr::curr::ScVal;

/// Full event record as stored by the contract. `secret` is write-only
/// from the client's point of view and is kept out of `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Event {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub creator: AccountAddress,
    pub max_supply: u32,
    pub minted_count: u32,
    pub secret: String,
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("creator", &self.creator)
            .field("max_supply", &self.max_supply)
            .field("minted_count", &self.minted_count)
            .field("secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// What `get_event` returns: the event without its secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPublicDetails {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub creator: AccountAddress,
    pub max_supply: u32,
    pub minted_count: u32,
}

impl EventPublicDetails {
    pub fn remaining(&self) -> u32 {
        self.max_supply.saturating_sub(self.minted_count)
    }
}

impl From<Event> for EventPublicDetails {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            image_url: event.image_url,
            creator: event.creator,
            max_supply: event.max_supply,
            minted_count: event.minted_count,
        }
    }
}

impl FromScVal for EventPublicDetails {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        let fields = StructFields::new(val)?;
        Ok(Self {
            id: fields.get("id")?,
            name: fields.get("name")?,
            description: fields.get("description")?,
            image_url: fields.get("image_url")?,
            creator: fields.get("creator")?,
            max_supply: fields.get("max_supply")?,
            minted_count: fields.get("minted_count")?,
        })
    }
}

impl IntoScVal for EventPublicDetails {
    fn into_sc_val(self) -> Result<ScVal> {
        struct_to_sc_val(vec![
            ("id", self.id.into_sc_val()?),
            ("name", self.name.into_sc_val()?),
            ("description", self.description.into_sc_val()?),
            ("image_url", self.image_url.into_sc_val()?),
            ("creator", self.creator.into_sc_val()?),
            ("max_supply", self.max_supply.into_sc_val()?),
            ("minted_count", self.minted_count.into_sc_val()?),
        ])
    }
}

impl FromScVal for Event {
    fn from_sc_val(val: &ScVal) -> Result<Self> {
        let fields = StructFields::new(val)?;
        Ok(Self {
            id: fields.get("id")?,
            name: fields.get("name")?,
            description: fields.get("description")?,
            image_url: fields.get("image_url")?,
            creator: fields.get("creator")?,
            max_supply: fields.get("max_supply")?,
            minted_count: fields.get("minted_count")?,
            secret: fields.get("secret")?,
        })
    }
}

impl IntoScVal for Event {
    fn into_sc_val(self) -> Result<ScVal> {
        struct_to_sc_val(vec![
            ("id", self.id.into_sc_val()?),
            ("name", self.name.into_sc_val()?),
            ("description", self.description.into_sc_val()?),
            ("image_url", self.image_url.into_sc_val()?),
            ("creator", self.creator.into_sc_val()?),
            ("max_supply", self.max_supply.into_sc_val()?),
            ("minted_count", self.minted_count.into_sc_val()?),
            ("secret", self.secret.into_sc_val()?),
        ])
    }
}

/// Typed client for the POAP factory.
#[derive(Clone, Debug)]
pub struct PoapClient<T> {
    inner: ContractClient<T>,
}

impl<T: ContractTransport> PoapClient<T> {
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

    pub async fn init(&self) -> Result<AssembledTransaction<(), T>> {
        self.inner.invoke("init", Vec::new()).await
    }

    pub async fn create_event(
        &self,
        creator: AccountAddress,
        name: &str,
        description: &str,
        image_url: &str,
        max_supply: u32,
        secret: &str,
    ) -> Result<AssembledTransaction<u32, T>> {
        let args = vec![
            creator.into_sc_val()?,
            name.into_sc_val()?,
            description.into_sc_val()?,
            image_url.into_sc_val()?,
            max_supply.into_sc_val()?,
            secret.into_sc_val()?,
        ];
        self.inner.invoke("create_event", args).await
    }

    pub async fn claim_poap(
        &self,
        to: AccountAddress,
        event_id: u32,
        provided_secret: &str,
    ) -> Result<AssembledTransaction<(), T>> {
        let args = vec![
            to.into_sc_val()?,
            event_id.into_sc_val()?,
            provided_secret.into_sc_val()?,
        ];
        self.inner.invoke("claim_poap", args).await
    }

    pub async fn get_event(
        &self,
        event_id: u32,
    ) -> Result<AssembledTransaction<EventPublicDetails, T>> {
        self.inner
            .invoke("get_event", vec![event_id.into_sc_val()?])
            .await
    }

    pub async fn has_claimed(
        &self,
        event_id: u32,
        addr: AccountAddress,
    ) -> Result<AssembledTransaction<bool, T>> {
        let args = vec![event_id.into_sc_val()?, addr.into_sc_val()?];
        self.inner.invoke("has_claimed", args).await
    }
}
