use crate::address::Address;
use crate::error::CoinError;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use cosmos_sdk_proto::cosmos::tx::v1beta1::Fee as ProtoFee;
use num256::Uint256;
use num_traits::CheckedAdd;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// Coin holds some amount of one currency we convert from ProtoCoin to do more
/// validation and provide a generally nicer interface
#[derive(Serialize, Debug, Default, Clone, Deserialize, Eq, PartialEq, Hash)]
pub struct Coin {
    pub amount: Uint256,
    pub denom: String,
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl TryFrom<&str> for Coin {
    type Error = CoinError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (amount, denom) = split_amount_denom(value)?;
        match amount.parse() {
            Ok(v) => Ok(Coin {
                amount: v,
                denom: denom.to_string(),
            }),
            Err(_) => Err(CoinError::BadAmount(amount.to_string())),
        }
    }
}

impl Coin {
    pub fn new(amount: Uint256, denom: String) -> Coin {
        Coin { amount, denom }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == zero()
    }

    /// utility function to display a list of coins the way the sdk prints
    /// a Coins value, comma separated
    pub fn display_list(input: &[Coin]) -> String {
        input
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(",")
    }
}

/// DecCoin is a coin with a decimal amount, used for prices such as the
/// minimum gas price where fractions of the smallest unit are meaningful
#[derive(Serialize, Debug, Default, Clone, Deserialize, Eq, PartialEq, Hash)]
pub struct DecCoin {
    pub amount: Decimal,
    pub denom: String,
}

impl fmt::Display for DecCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for DecCoin {
    type Err = CoinError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (amount, denom) = split_amount_denom(value)?;
        match Decimal::from_str(amount) {
            Ok(v) => Ok(DecCoin {
                amount: v,
                denom: denom.to_string(),
            }),
            Err(_) => Err(CoinError::BadAmount(amount.to_string())),
        }
    }
}

impl DecCoin {
    pub fn new(amount: Decimal, denom: String) -> DecCoin {
        DecCoin { amount, denom }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Multiplies this price by a gas amount and rounds up to the next whole
    /// unit, returns None if the product can not be represented or the price
    /// is negative
    pub fn mul_ceil(&self, gas: u64) -> Option<Coin> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return None;
        }
        let product = self.amount.checked_mul(Decimal::from(gas))?;
        let amount = product.ceil().trunc().to_string().parse().ok()?;
        Some(Coin {
            amount,
            denom: self.denom.clone(),
        })
    }

    pub fn display_list(input: &[DecCoin]) -> String {
        input
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(",")
    }
}

/// Splits "100uatom" into ("100", "uatom"), the denom starts at the first
/// alphabetic character
fn split_amount_denom(value: &str) -> Result<(&str, &str), CoinError> {
    let value = value.trim();
    let split_idx = match value.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((idx, _)) => idx,
        None => return Err(CoinError::InvalidDenom(value.to_string())),
    };
    if split_idx == 0 {
        return Err(CoinError::MissingAmount(value.to_string()));
    }
    let (amount, denom) = value.split_at(split_idx);
    validate_denom(denom)?;
    Ok((amount.trim(), denom))
}

/// Checks a denom against the sdk rule `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let len = denom.chars().count();
    let mut chars = denom.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic());
    let rest_ok =
        chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
    if first_ok && rest_ok && (3..=128).contains(&len) {
        Ok(())
    } else {
        Err(CoinError::InvalidDenom(denom.to_string()))
    }
}

/// Parses a comma separated coin list such as "10uatom,5stake", an empty
/// string is an empty list
pub fn parse_coins(input: &str) -> Result<Vec<Coin>, CoinError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Parses a comma separated price list such as "0.025uatom,0.1stake"
pub fn parse_dec_coins(input: &str) -> Result<Vec<DecCoin>, CoinError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

pub(crate) fn zero() -> Uint256 {
    0u32.into()
}

/// The amount of `denom` in the set, zero if absent
pub fn amount_of(coins: &[Coin], denom: &str) -> Uint256 {
    coins
        .iter()
        .find(|c| c.denom == denom)
        .map(|c| c.amount.clone())
        .unwrap_or_else(zero)
}

/// True for an empty set or a set where every amount is zero
pub fn coins_are_zero(coins: &[Coin]) -> bool {
    coins.iter().all(Coin::is_zero)
}

pub fn dec_coins_are_zero(coins: &[DecCoin]) -> bool {
    coins.iter().all(DecCoin::is_zero)
}

/// Returns true if any denom in `coins` covers its required amount in
/// `required`. Required entries of zero never count as covered so an
/// empty or all zero requirement is never satisfied by this function
pub fn is_any_gte(coins: &[Coin], required: &[Coin]) -> bool {
    if required.is_empty() {
        return false;
    }
    coins.iter().any(|coin| {
        let needed = amount_of(required, &coin.denom);
        needed != zero() && coin.amount >= needed
    })
}

/// Checks that a coin set is usable as a transfer amount, every denom
/// valid, every amount positive and no denom repeated
pub fn validate_coins(coins: &[Coin]) -> Result<(), CoinError> {
    let mut seen = HashSet::new();
    for coin in coins {
        validate_denom(&coin.denom)?;
        if coin.is_zero() {
            return Err(CoinError::BadAmount(coin.to_string()));
        }
        if !seen.insert(coin.denom.as_str()) {
            return Err(CoinError::InvalidDenom(format!("duplicate denom {}", coin.denom)));
        }
    }
    Ok(())
}

/// Sums two amounts, None on overflow
pub(crate) fn checked_sum(a: &Uint256, b: &Uint256) -> Option<Uint256> {
    a.checked_add(b)
}

impl TryFrom<ProtoCoin> for Coin {
    type Error = CoinError;

    fn try_from(value: ProtoCoin) -> Result<Self, Self::Error> {
        match value.amount.parse() {
            Ok(amount) => Ok(Coin {
                denom: value.denom,
                amount,
            }),
            Err(_) => Err(CoinError::BadAmount(value.amount)),
        }
    }
}

impl From<Coin> for ProtoCoin {
    fn from(value: Coin) -> Self {
        ProtoCoin {
            denom: value.denom,
            amount: value.amount.to_string(),
        }
    }
}

/// Fee represents everything about a Cosmos transaction fee, including the gas limit
/// who pays, and how much of an arbitrary number of Coin structs.
#[derive(Serialize, Debug, Default, Clone, Deserialize, Eq, PartialEq, Hash)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
    pub payer: Option<Address>,
    pub granter: Option<String>,
}

impl TryFrom<ProtoFee> for Fee {
    type Error = CoinError;

    fn try_from(value: ProtoFee) -> Result<Self, Self::Error> {
        let mut converted_coins = Vec::new();
        for coin in value.amount {
            converted_coins.push(Coin::try_from(coin)?);
        }
        let payer = if value.payer.is_empty() {
            None
        } else {
            match value.payer.parse::<Address>() {
                Ok(address) => Some(address),
                Err(e) => {
                    return Err(CoinError::InvalidPayer(format!("{}: {}", value.payer, e)))
                }
            }
        };
        let granter = if value.granter.is_empty() {
            None
        } else {
            Some(value.granter)
        };
        Ok(Fee {
            amount: converted_coins,
            gas_limit: value.gas_limit,
            payer,
            granter,
        })
    }
}

impl From<Fee> for ProtoFee {
    fn from(value: Fee) -> Self {
        let mut converted_coins = Vec::new();
        for coin in value.amount {
            converted_coins.push(coin.into());
        }
        let payer = match value.payer {
            Some(s) => s.to_bech32(crate::address::DEFAULT_PREFIX).unwrap_or_default(),
            None => String::new(),
        };
        ProtoFee {
            amount: converted_coins,
            gas_limit: value.gas_limit,
            payer,
            granter: value.granter.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Vec<Coin> {
        parse_coins(s).unwrap()
    }

    #[test]
    fn test_coin_parse() {
        let test: Coin = "100footoken".parse().unwrap();
        assert_eq!(test.amount, 100u32.into());
        assert_eq!(test.denom, "footoken");
        let _test2: Coin = "100000000000gravity0x7580bFE88Dd3d07947908FAE12d95872a260F2D8"
            .parse()
            .unwrap();
        let ibc: Coin = "7ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
            .parse()
            .unwrap();
        assert!(ibc.denom.starts_with("ibc/"));

        assert!("footoken".parse::<Coin>().is_err());
        assert!("100".parse::<Coin>().is_err());
        assert!("1.5uatom".parse::<Coin>().is_err());
        assert!("10a".parse::<Coin>().is_err());
    }

    #[test]
    fn test_dec_coin_parse() {
        let price: DecCoin = "0.025uatom".parse().unwrap();
        assert_eq!(price.amount, Decimal::new(25, 3));
        assert_eq!(price.denom, "uatom");
        let list = parse_dec_coins("0.1stake, 0.025uatom").unwrap();
        assert_eq!(list.len(), 2);
        assert!(parse_dec_coins("").unwrap().is_empty());
    }

    #[test]
    fn test_mul_ceil_rounds_up() {
        let price: DecCoin = "0.1uatom".parse().unwrap();
        assert_eq!(price.mul_ceil(100).unwrap(), "10uatom".parse().unwrap());
        assert_eq!(price.mul_ceil(101).unwrap(), "11uatom".parse().unwrap());
        assert_eq!(price.mul_ceil(0).unwrap().amount, zero());

        let tiny: DecCoin = "0.000001uatom".parse().unwrap();
        assert_eq!(tiny.mul_ceil(1).unwrap(), "1uatom".parse().unwrap());

        let huge = DecCoin::new(Decimal::MAX, "uatom".to_string());
        assert!(huge.mul_ceil(u64::MAX).is_none());

        let negative = DecCoin::new(Decimal::new(-1, 1), "uatom".to_string());
        assert!(negative.mul_ceil(10).is_none());
    }

    #[test]
    fn test_is_any_gte() {
        let required = coins("10uatom,20stake");
        assert!(is_any_gte(&coins("10uatom"), &required));
        assert!(is_any_gte(&coins("1uatom,25stake"), &required));
        assert!(!is_any_gte(&coins("9uatom,19stake"), &required));
        assert!(!is_any_gte(&coins("100other"), &required));
        assert!(!is_any_gte(&coins("10uatom"), &[]));
        // a zero requirement is never a way in
        assert!(!is_any_gte(&coins("5uatom"), &coins("0uatom,10stake")));
    }

    #[test]
    fn test_validate_coins() {
        assert!(validate_coins(&coins("10uatom,5stake")).is_ok());
        assert!(validate_coins(&[]).is_ok());
        assert!(validate_coins(&coins("10uatom,5uatom")).is_err());
        assert!(validate_coins(&coins("0uatom")).is_err());
        let bad = Coin::new(1u32.into(), "a".to_string());
        assert!(validate_coins(&[bad]).is_err());
    }

    #[test]
    fn test_zero_checks() {
        assert!(coins_are_zero(&[]));
        assert!(coins_are_zero(&coins("0uatom")));
        assert!(!coins_are_zero(&coins("0uatom,1stake")));
        assert!(dec_coins_are_zero(&parse_dec_coins("0.0uatom").unwrap()));
        assert_eq!(amount_of(&coins("3uatom"), "stake"), zero());
    }

    #[test]
    fn test_fee_proto_conversion() {
        let payer = Address::from_bytes([3u8; 20]);
        let fee = Fee {
            amount: coins("500uatom"),
            gas_limit: 200_000,
            payer: Some(payer),
            granter: None,
        };
        let proto: ProtoFee = fee.clone().into();
        assert_eq!(proto.gas_limit, 200_000);
        assert!(proto.granter.is_empty());
        assert_eq!(Fee::try_from(proto).unwrap(), fee);

        let bad = ProtoFee {
            amount: vec![ProtoCoin {
                denom: "uatom".to_string(),
                amount: "lots".to_string(),
            }],
            gas_limit: 1,
            payer: String::new(),
            granter: String::new(),
        };
        assert!(Fee::try_from(bad).is_err());

        let bad_payer = ProtoFee {
            amount: Vec::new(),
            gas_limit: 1,
            payer: "cosmos1notavalidaddress".to_string(),
            granter: String::new(),
        };
        assert!(matches!(
            Fee::try_from(bad_payer),
            Err(CoinError::InvalidPayer(_))
        ));
    }
}
