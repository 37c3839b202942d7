#![warn(clippy::all)]
#![allow(clippy::pedantic)]
#![forbid(unsafe_code)]

extern crate bech32;
extern crate num256;
extern crate num_traits;
extern crate ripemd;
extern crate rust_decimal;
extern crate serde;
extern crate sha2;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate serde_json;

#[cfg(not(test))]
extern crate serde_json;

pub mod address;
pub mod ante;
pub mod coin;
pub mod config;
pub mod error;
pub mod keeper;
pub mod params;
pub mod tx;
pub mod utils;

pub use address::Address;
pub use ante::{new_ante_handler, AnteDecorator, AnteHandler, Context, ExecMode, Next};
pub use coin::{Coin, DecCoin, Fee};
pub use config::AnteConfig;
pub use error::{AnteError, ConfigError, ParamError, SdkErrorCode};
pub use keeper::{AccountKeeper, BankKeeper, BaseAccount};
pub use params::{FeeParams, ParamStore, Subspace, VersionedFeeParams};
pub use tx::{DecodedTx, FeeTx, StdFeeTx, Tx};
