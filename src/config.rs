use crate::error::ConfigError;
use crate::keeper::FEE_COLLECTOR_NAME;
use crate::params::FEE_PARAMSPACE;
use crate::address::DEFAULT_PREFIX;

/// The longest address prefix we accept
const MAX_PREFIX_LEN: usize = 32;

/// Node level settings for the fee ante handlers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AnteConfig {
    /// Name of the module account fees are paid into
    pub fee_collector: String,
    /// The parameter subspace holding the fee parameters
    pub params_subspace: String,
    /// The bech32 prefix addresses are displayed with in log output
    pub address_prefix: String,
}

impl Default for AnteConfig {
    fn default() -> Self {
        AnteConfig {
            fee_collector: FEE_COLLECTOR_NAME.to_string(),
            params_subspace: FEE_PARAMSPACE.to_string(),
            address_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl AnteConfig {
    pub fn new(fee_collector: &str, address_prefix: &str) -> Result<Self, ConfigError> {
        let config = AnteConfig {
            fee_collector: fee_collector.to_string(),
            address_prefix: address_prefix.to_string(),
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses a json config, missing fields take their defaults
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: AnteConfig =
            serde_json::from_str(input).map_err(|e| ConfigError::BadJson(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_collector.is_empty() {
            return Err(ConfigError::EmptyField("fee_collector"));
        }
        if self.params_subspace.is_empty() {
            return Err(ConfigError::EmptyField("params_subspace"));
        }
        let prefix = &self.address_prefix;
        if prefix.is_empty()
            || prefix.len() > MAX_PREFIX_LEN
            || !prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidPrefix(prefix.clone()));
        }
        Ok(())
    }
}
