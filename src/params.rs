//! Fee parameters and the parameter subspace they live in. The store itself
//! belongs to the host, this module only adds the json codec and the
//! validators that must pass before a value is written
//!
use crate::coin::{validate_denom, DecCoin};
use crate::error::ParamError;
use num256::Int256;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// The subspace the fee parameters are stored under
pub const FEE_PARAMSPACE: &str = "fee";
/// The key of the fee parameters inside the fee subspace
pub const PARAM_STORE_KEY_FEE: &[u8] = b"fee";

/// Raw parameter storage owned by the host
pub trait ParamStore {
    fn get(&self, subspace: &str, key: &[u8]) -> Option<Vec<u8>>;
    fn set(&self, subspace: &str, key: &[u8], value: Vec<u8>);
}

impl<T: ParamStore + ?Sized> ParamStore for &T {
    fn get(&self, subspace: &str, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(subspace, key)
    }

    fn set(&self, subspace: &str, key: &[u8], value: Vec<u8>) {
        (**self).set(subspace, key, value)
    }
}

impl<T: ParamStore + ?Sized> ParamStore for std::sync::Arc<T> {
    fn get(&self, subspace: &str, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(subspace, key)
    }

    fn set(&self, subspace: &str, key: &[u8], value: Vec<u8>) {
        (**self).set(subspace, key, value)
    }
}

/// A parameter store backed by a hashmap
#[derive(Default)]
pub struct MemoryParamStore {
    values: RwLock<HashMap<(String, Vec<u8>), Vec<u8>>>,
}

impl MemoryParamStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParamStore for MemoryParamStore {
    fn get(&self, subspace: &str, key: &[u8]) -> Option<Vec<u8>> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(&(subspace.to_string(), key.to_vec())).cloned()
    }

    fn set(&self, subspace: &str, key: &[u8], value: Vec<u8>) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert((subspace.to_string(), key.to_vec()), value);
    }
}

/// Checks a candidate parameter value before it is written
pub type ValidatorFn = fn(&Value) -> Result<(), ParamError>;

#[derive(Clone)]
pub struct ParamSetPair {
    pub key: &'static [u8],
    pub validator: ValidatorFn,
}

/// The set of keys a subspace accepts along with their validators
#[derive(Clone, Default)]
pub struct KeyTable {
    pairs: Vec<ParamSetPair>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, key: &'static [u8], validator: ValidatorFn) -> Self {
        self.pairs.retain(|p| p.key != key);
        self.pairs.push(ParamSetPair { key, validator });
        self
    }

    pub fn validator(&self, key: &[u8]) -> Option<ValidatorFn> {
        self.pairs
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.validator)
    }
}

/// The key table of the fee subspace
pub fn fee_key_table() -> KeyTable {
    KeyTable::new().register(PARAM_STORE_KEY_FEE, validate_fee_params)
}

/// A named view onto the parameter store, values are stored as json and
/// every write runs the validator registered for its key
pub struct Subspace<S> {
    name: String,
    store: S,
    table: KeyTable,
}

impl<S: ParamStore> Subspace<S> {
    pub fn new(name: &str, store: S, table: KeyTable) -> Self {
        Subspace {
            name: name.to_string(),
            store,
            table,
        }
    }

    /// The fee subspace with its validators registered
    pub fn fee(store: S) -> Self {
        Subspace::new(FEE_PARAMSPACE, store, fee_key_table())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads and decodes a value, Ok(None) if it was never set
    pub fn get<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, ParamError> {
        match self.store.get(&self.name, key) {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(v) => Ok(Some(v)),
                Err(e) => Err(ParamError::InvalidType(e.to_string())),
            },
            None => Ok(None),
        }
    }

    /// Validates and writes a value, nothing is written if validation fails
    pub fn set<T: Serialize>(&self, key: &[u8], value: &T) -> Result<(), ParamError> {
        let value = serde_json::to_value(value).map_err(|e| ParamError::Encode(e.to_string()))?;
        self.set_json(key, value)
    }

    /// Validates and writes an already encoded value, this is the path used
    /// for parameter change proposals
    pub fn set_json(&self, key: &[u8], value: Value) -> Result<(), ParamError> {
        let validator = match self.table.validator(key) {
            Some(v) => v,
            None => {
                return Err(ParamError::UnknownKey {
                    subspace: self.name.clone(),
                    key: String::from_utf8_lossy(key).to_string(),
                })
            }
        };
        if let Err(e) = validator(&value) {
            warn!(
                "Rejected parameter update {}/{}: {} (code {})",
                self.name,
                String::from_utf8_lossy(key),
                e,
                e.code().get_code()
            );
            return Err(e);
        }
        let bytes = serde_json::to_vec(&value).map_err(|e| ParamError::Encode(e.to_string()))?;
        self.store.set(&self.name, key, bytes);
        Ok(())
    }

    /// Reads the fee parameters migrating older versions on the way out
    pub fn fee_params(&self) -> Result<Option<FeeParams>, ParamError> {
        let stored: Option<VersionedFeeParams> = self.get(PARAM_STORE_KEY_FEE)?;
        Ok(stored.map(VersionedFeeParams::into_latest))
    }

    /// Writes fee parameters, always in the latest version
    pub fn set_fee_params(&self, params: FeeParams) -> Result<(), ParamError> {
        self.set(PARAM_STORE_KEY_FEE, &VersionedFeeParams::V2(params))
    }
}

/// The minimum gas prices a node accepts and the burn amount. A price list
/// where every rate is zero is the way to say there is no minimum
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeeParams {
    pub fee: Vec<DecCoin>,
    pub burn_amount: Int256,
}

impl FeeParams {
    pub fn new(fee: Vec<DecCoin>, burn_amount: Int256) -> Self {
        FeeParams { fee, burn_amount }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        if self.fee.is_empty() {
            return Err(ParamError::EmptyFee);
        }
        let mut seen = HashSet::new();
        for price in self.fee.iter() {
            if let Err(e) = validate_denom(&price.denom) {
                return Err(ParamError::InvalidFee(e.to_string()));
            }
            if price.amount.is_sign_negative() && !price.amount.is_zero() {
                return Err(ParamError::InvalidFee(format!("negative price {}", price)));
            }
            if !seen.insert(price.denom.as_str()) {
                return Err(ParamError::InvalidFee(format!(
                    "duplicate denom {}",
                    price.denom
                )));
            }
        }
        if self.burn_amount < Int256::from(0i64) {
            return Err(ParamError::NegativeBurnAmount(self.burn_amount.to_string()));
        }
        Ok(())
    }
}

/// Every shape the fee parameters have been stored in. Version 1 carried only
/// the prices, version 2 added the burn amount
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "version")]
pub enum VersionedFeeParams {
    #[serde(rename = "v1")]
    V1 { fee: Vec<DecCoin> },
    #[serde(rename = "v2")]
    V2(FeeParams),
}

impl VersionedFeeParams {
    /// Migrates to the latest version, a v1 value burns nothing
    pub fn into_latest(self) -> FeeParams {
        match self {
            VersionedFeeParams::V1 { fee } => FeeParams::new(fee, 0i64.into()),
            VersionedFeeParams::V2(params) => params,
        }
    }
}

/// Validator registered for the fee key, accepts any stored version
pub fn validate_fee_params(candidate: &Value) -> Result<(), ParamError> {
    let params: VersionedFeeParams = match serde_json::from_value(candidate.clone()) {
        Ok(v) => v,
        Err(e) => return Err(ParamError::InvalidType(e.to_string())),
    };
    params.into_latest().validate()
}
