use crate::address::Address;
use crate::coin::{Coin, DecCoin};
use num256::Uint256;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::num::ParseIntError;
use std::str::Utf8Error;

/// Errors produced by the ante decorators, each one rejects the transaction
/// that produced it and maps onto a CosmosSDK error code for the host to
/// report back to the user
#[derive(Debug)]
pub enum AnteError {
    /// The transaction does not carry a fee, or could not be decoded at all
    TxDecode(String),
    /// The declared fee does not reach the local minimum gas price
    InsufficientFee { got: Vec<Coin>, required: Vec<Coin> },
    /// The declared fee is not a well formed coin set
    InvalidFee { fee: Vec<Coin>, reason: String },
    /// Multiplying the gas limit by a minimum price left the representable range
    FeeOverflow { gas_limit: u64, price: DecCoin },
    /// The fee payer has no account on chain
    UnknownAddress { address: Address },
    /// The bank refused to move the fee out of the payer account
    InsufficientFunds { error: BankError },
    /// The stored fee parameters could not be read
    Params { error: ParamError },
}

impl AnteError {
    /// The sdk error code the host should attach to the rejected tx
    pub fn code(&self) -> SdkErrorCode {
        match self {
            AnteError::TxDecode(_) => SdkErrorCode::ErrTxDecode,
            AnteError::InsufficientFee { .. }
            | AnteError::InvalidFee { .. }
            | AnteError::FeeOverflow { .. } => SdkErrorCode::ErrInsufficientFee,
            AnteError::UnknownAddress { .. } => SdkErrorCode::ErrUnknownAddress,
            AnteError::InsufficientFunds { .. } => SdkErrorCode::ErrInsufficientFunds,
            AnteError::Params { .. } => SdkErrorCode::ErrInvalidRequest,
        }
    }
}

impl Display for AnteError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            AnteError::TxDecode(val) => write!(f, "tx parse error: {}", val),
            AnteError::InsufficientFee { got, required } => write!(
                f,
                "insufficient fees; got: {} required: {}",
                Coin::display_list(got),
                Coin::display_list(required)
            ),
            AnteError::InvalidFee { fee, reason } => write!(
                f,
                "invalid fee amount: {} {}",
                Coin::display_list(fee),
                reason
            ),
            AnteError::FeeOverflow { gas_limit, price } => write!(
                f,
                "insufficient fees; gas limit {} at minimum price {} overflows",
                gas_limit, price
            ),
            AnteError::UnknownAddress { address } => {
                write!(f, "fee payer address: {} does not exist", address)
            }
            AnteError::InsufficientFunds { error } => write!(f, "insufficient funds: {}", error),
            AnteError::Params { error } => write!(f, "fee params unavailable: {}", error),
        }
    }
}

impl Error for AnteError {}

impl From<ParamError> for AnteError {
    fn from(error: ParamError) -> Self {
        AnteError::Params { error }
    }
}

/// Failures of the bank transfer primitive, any of these leave every balance
/// untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    InsufficientBalance {
        address: Address,
        denom: String,
        balance: Uint256,
        needed: Uint256,
    },
    UnknownModule(String),
    InvalidCoins(String),
    Overflow(String),
}

impl Display for BankError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            BankError::InsufficientBalance {
                address,
                denom,
                balance,
                needed,
            } => write!(
                f,
                "{} has {}{} which is smaller than {}{}",
                address, balance, denom, needed, denom
            ),
            BankError::UnknownModule(val) => write!(f, "module account {} does not exist", val),
            BankError::InvalidCoins(val) => write!(f, "invalid coins {}", val),
            BankError::Overflow(val) => write!(f, "balance overflow for {}", val),
        }
    }
}

impl Error for BankError {}

impl From<BankError> for AnteError {
    fn from(error: BankError) -> Self {
        AnteError::InsufficientFunds { error }
    }
}

/// Problems with a parameter value, raised by the validators registered in a
/// key table or by the subspace codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    InvalidType(String),
    EmptyFee,
    InvalidFee(String),
    NegativeBurnAmount(String),
    UnknownKey { subspace: String, key: String },
    Encode(String),
}

impl Display for ParamError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ParamError::InvalidType(val) => write!(f, "invalid parameter type: {}", val),
            ParamError::EmptyFee => write!(f, "fee must be positive: empty"),
            ParamError::InvalidFee(val) => write!(f, "invalid fee: {}", val),
            ParamError::NegativeBurnAmount(val) => {
                write!(f, "burn amount must be positive: {}", val)
            }
            ParamError::UnknownKey { subspace, key } => {
                write!(f, "parameter {}/{} not registered", subspace, key)
            }
            ParamError::Encode(val) => write!(f, "could not encode parameter {}", val),
        }
    }
}

impl Error for ParamError {}

/// Errors in node setup, these are fatal and the host must not start
/// processing transactions after seeing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ModuleAccountNotSet(String),
    InvalidPrefix(String),
    EmptyField(&'static str),
    BadJson(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ConfigError::ModuleAccountNotSet(val) => {
                write!(f, "{} module account has not been set", val)
            }
            ConfigError::InvalidPrefix(val) => write!(f, "invalid address prefix {}", val),
            ConfigError::EmptyField(val) => write!(f, "config field {} can not be empty", val),
            ConfigError::BadJson(val) => write!(f, "could not parse config {}", val),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    MissingAmount(String),
    BadAmount(String),
    InvalidDenom(String),
    InvalidPayer(String),
}

impl Display for CoinError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            CoinError::MissingAmount(val) => write!(f, "coin {} has no amount", val),
            CoinError::BadAmount(val) => write!(f, "could not parse amount {}", val),
            CoinError::InvalidDenom(val) => write!(f, "invalid denom {}", val),
            CoinError::InvalidPayer(val) => write!(f, "invalid fee payer {}", val),
        }
    }
}

impl Error for CoinError {}

#[derive(Debug)]
pub enum AddressError {
    Bech32WrongLength,
    Bech32InvalidBase32,
    Bech32InvalidEncoding,
    HexDecodeError(ByteDecodeError),
    HexDecodeErrorWrongLength,
    BytesDecodeErrorWrongLength,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressError::Bech32WrongLength => write!(f, "Bech32WrongLength"),
            AddressError::Bech32InvalidBase32 => write!(f, "Bech32InvalidBase32"),
            AddressError::Bech32InvalidEncoding => write!(f, "Bech32InvalidEncoding"),
            AddressError::HexDecodeError(val) => write!(f, "HexDecodeError {}", val),
            AddressError::HexDecodeErrorWrongLength => write!(f, "HexDecodeError Wrong Length"),
            AddressError::BytesDecodeErrorWrongLength => write!(f, "BytesDecodeError Wrong Length"),
        }
    }
}

impl std::error::Error for AddressError {}

impl From<bech32::Error> for AddressError {
    fn from(error: bech32::Error) -> Self {
        match error {
            bech32::Error::InvalidLength => AddressError::Bech32WrongLength,
            bech32::Error::InvalidChar(_) => AddressError::Bech32InvalidBase32,
            bech32::Error::InvalidData(_)
            | bech32::Error::InvalidChecksum
            | bech32::Error::InvalidPadding
            | bech32::Error::MixedCase
            | bech32::Error::MissingSeparator => AddressError::Bech32InvalidEncoding,
        }
    }
}

impl From<ByteDecodeError> for AddressError {
    fn from(error: ByteDecodeError) -> Self {
        AddressError::HexDecodeError(error)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ByteDecodeError {
    DecodeError(Utf8Error),
    ParseError(ParseIntError),
    OddLength,
}

impl Display for ByteDecodeError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ByteDecodeError::DecodeError(val) => write!(f, "ByteDecodeError {}", val),
            ByteDecodeError::ParseError(val) => write!(f, "ByteParseError {}", val),
            ByteDecodeError::OddLength => write!(f, "ByteDecodeError odd length"),
        }
    }
}

impl Error for ByteDecodeError {}

/// An enum representing Cosmos sdk errors
/// from the 'sdk' codespace that the ante handlers in this crate can
/// produce. Each of these errors maps to the code the sdk reports in
/// the TxResponse
/// https://github.com/cosmos/cosmos-sdk/blob/ed01c21584ab63efe0e505cd281cbc680f7623da/types/errors/errors.go
#[derive(Clone, PartialEq, Eq, Copy, Debug)]
pub enum SdkErrorCode {
    ErrTxDecode,
    ErrInsufficientFunds,
    ErrUnknownAddress,
    ErrInvalidCoins,
    ErrInsufficientFee,
    ErrInvalidRequest,
    ErrInvalidType,
    ErrAppConfig,
}

impl SdkErrorCode {
    pub fn get_code(&self) -> u32 {
        match self {
            SdkErrorCode::ErrTxDecode => 2,
            SdkErrorCode::ErrInsufficientFunds => 5,
            SdkErrorCode::ErrUnknownAddress => 9,
            SdkErrorCode::ErrInvalidCoins => 10,
            SdkErrorCode::ErrInsufficientFee => 13,
            SdkErrorCode::ErrInvalidRequest => 18,
            SdkErrorCode::ErrInvalidType => 29,
            SdkErrorCode::ErrAppConfig => 40,
        }
    }
}

impl ParamError {
    pub fn code(&self) -> SdkErrorCode {
        match self {
            ParamError::InvalidType(_) => SdkErrorCode::ErrInvalidType,
            ParamError::EmptyFee | ParamError::InvalidFee(_) => SdkErrorCode::ErrInvalidCoins,
            _ => SdkErrorCode::ErrInvalidRequest,
        }
    }
}

impl ConfigError {
    pub fn code(&self) -> SdkErrorCode {
        SdkErrorCode::ErrAppConfig
    }
}
