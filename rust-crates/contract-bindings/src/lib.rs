pub mod address;
pub mod client;
pub mod codec;
pub mod error;
pub mod game_types;
pub mod poap_types;
pub mod rpc;
pub mod signer;
pub mod transport;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use address::{
    AccountAddress,
    Address,
    ContractAddress,
};
pub use client::{
    AssembledTransaction,
    ClientOptions,
    ContractClient,
    SentTransaction,
};
pub use error::{
    ClientError,
    Result,
};
pub use game_types::{
    GameClient,
    GameId,
};
pub use poap_types::{
    Event,
    EventPublicDetails,
    PoapClient,
};
pub use rpc::SorobanRpcTransport;
pub use signer::{
    KeypairSigner,
    TransactionSigner,
};
pub use transport::{
    ContractTransport,
    InvocationRequest,
    Simulation,
    SubmitOutcome,
};
