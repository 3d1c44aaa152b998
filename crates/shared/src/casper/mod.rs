pub mod args;
pub mod bytesrepr;
pub mod client;
pub mod contracts;
pub mod deploy;
pub mod error;
pub mod hash;
pub mod key;
pub mod signer;
pub mod wallet;

pub use args::{ArgKind, ArgValue, CLValue, DomainValue, NamedArgInput, RuntimeArgs};
pub use client::{DeploySubmitter, RpcClient};
pub use contracts::core::builder::{InvocationBuilder, Target};
pub use deploy::{Deploy, DeployHash, Timestamp, UnsignedDeploy};
pub use error::{DeployError, KeyError, SubmissionError};
pub use key::{HashAddr, Key};
pub use signer::sign_deploy;
pub use wallet::{Identity, KeyAlgorithm, PublicKey};
