//! The transaction side of the ante handlers. A decorator only ever sees a
//! [`Tx`], the fee handlers additionally need it to expose a [`FeeTx`]
//!
use crate::address::Address;
use crate::coin::{Coin, Fee};
use crate::error::AnteError;
use cosmos_sdk_proto::cosmos::crypto::secp256k1::PubKey as ProtoSecp256k1Pubkey;
use cosmos_sdk_proto::cosmos::tx::v1beta1::{AuthInfo, TxRaw};
use prost::Message;
use prost_types::Any;
use std::convert::TryFrom;

/// The type url of a secp256k1 public key inside a SignerInfo
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Any transaction that can travel through the ante chain
pub trait Tx {
    /// The fee view of this transaction, None if it carries no fee
    fn fee_tx(&self) -> Option<&dyn FeeTx>;
}

/// A transaction with a fee, a gas limit and someone to pay for it
pub trait FeeTx {
    fn get_fee(&self) -> &[Coin];
    fn get_gas(&self) -> u64;
    fn fee_payer(&self) -> Address;
}

/// Converts a tx into its fee view or fails with a decode error
pub fn as_fee_tx(tx: &dyn Tx) -> Result<&dyn FeeTx, AnteError> {
    match tx.fee_tx() {
        Some(v) => Ok(v),
        None => Err(AnteError::TxDecode("Tx must be a FeeTx".to_string())),
    }
}

/// A transaction that is nothing but its fee and the signer that pays for it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StdFeeTx {
    pub fee: Fee,
    /// The first signer of the transaction, pays unless the fee names a payer
    pub signer: Address,
}

impl StdFeeTx {
    pub fn new(fee: Fee, signer: Address) -> Self {
        StdFeeTx { fee, signer }
    }
}

impl Tx for StdFeeTx {
    fn fee_tx(&self) -> Option<&dyn FeeTx> {
        Some(self)
    }
}

impl FeeTx for StdFeeTx {
    fn get_fee(&self) -> &[Coin] {
        &self.fee.amount
    }

    fn get_gas(&self) -> u64 {
        self.fee.gas_limit
    }

    fn fee_payer(&self) -> Address {
        self.fee.payer.unwrap_or(self.signer)
    }
}

/// A protobuf encoded transaction decoded just far enough to read its fee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTx {
    fee: Option<StdFeeTx>,
}

impl DecodedTx {
    /// Decodes the bytes of a TxRaw as broadcast to a node. A tx without an
    /// AuthInfo fee decodes fine but exposes no fee view
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AnteError> {
        let raw = TxRaw::decode(bytes).map_err(|e| AnteError::TxDecode(e.to_string()))?;
        let auth_info = AuthInfo::decode(raw.auth_info_bytes.as_slice())
            .map_err(|e| AnteError::TxDecode(e.to_string()))?;

        let proto_fee = match auth_info.fee {
            Some(v) => v,
            None => return Ok(DecodedTx { fee: None }),
        };
        let fee = Fee::try_from(proto_fee).map_err(|e| AnteError::TxDecode(e.to_string()))?;

        // the first signer pays when the fee does not name a payer
        let signer = match auth_info.signer_infos.first() {
            Some(info) => match &info.public_key {
                Some(key) => signer_address(key)?,
                None => return Err(AnteError::TxDecode("signer without public key".to_string())),
            },
            None => match fee.payer {
                Some(payer) => payer,
                None => return Err(AnteError::TxDecode("tx has no signers".to_string())),
            },
        };
        Ok(DecodedTx {
            fee: Some(StdFeeTx::new(fee, signer)),
        })
    }
}

fn signer_address(key: &Any) -> Result<Address, AnteError> {
    if key.type_url != SECP256K1_PUBKEY_TYPE_URL {
        return Err(AnteError::TxDecode(format!(
            "unsupported public key type {}",
            key.type_url
        )));
    }
    let pubkey = ProtoSecp256k1Pubkey::decode(key.value.as_slice())
        .map_err(|e| AnteError::TxDecode(e.to_string()))?;
    Ok(Address::from_secp256k1_pubkey(&pubkey.key))
}

impl Tx for DecodedTx {
    fn fee_tx(&self) -> Option<&dyn FeeTx> {
        self.fee.as_ref().map(|fee| fee as &dyn FeeTx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::parse_coins;
    use cosmos_sdk_proto::cosmos::tx::v1beta1::{Fee as ProtoFee, SignerInfo};

    const TEST_PUBKEY: [u8; 33] = [
        0x02, 0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87,
        0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b, 0x16,
        0xf8, 0x17, 0x98,
    ];

    /// Encodes a TxRaw with the given fee and one secp256k1 signer
    fn encode_tx(fee: Option<Fee>, pubkey: Option<&[u8]>) -> Vec<u8> {
        let signer_infos = match pubkey {
            Some(key) => vec![SignerInfo {
                public_key: Some(Any {
                    type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
                    value: ProtoSecp256k1Pubkey { key: key.to_vec() }.encode_to_vec(),
                }),
                mode_info: None,
                sequence: 0,
            }],
            None => Vec::new(),
        };
        let auth_info = AuthInfo {
            signer_infos,
            fee: fee.map(ProtoFee::from),
            ..Default::default()
        };
        TxRaw {
            body_bytes: Vec::new(),
            auth_info_bytes: auth_info.encode_to_vec(),
            signatures: vec![vec![0u8; 64]],
        }
        .encode_to_vec()
    }

    fn fee(amount: &str, payer: Option<Address>) -> Fee {
        Fee {
            amount: parse_coins(amount).unwrap(),
            gas_limit: 100_000,
            payer,
            granter: None,
        }
    }

    #[test]
    fn test_decode_signer_pays() {
        let bytes = encode_tx(Some(fee("250uatom", None)), Some(&TEST_PUBKEY));
        let tx = DecodedTx::from_bytes(&bytes).unwrap();
        let fee_tx = as_fee_tx(&tx).unwrap();
        assert_eq!(fee_tx.get_fee(), parse_coins("250uatom").unwrap().as_slice());
        assert_eq!(fee_tx.get_gas(), 100_000);
        assert_eq!(fee_tx.fee_payer(), Address::from_secp256k1_pubkey(&TEST_PUBKEY));
    }

    #[test]
    fn test_decode_explicit_payer() {
        let payer = Address::from_bytes([9u8; 20]);
        let bytes = encode_tx(Some(fee("1uatom", Some(payer))), Some(&TEST_PUBKEY));
        let tx = DecodedTx::from_bytes(&bytes).unwrap();
        assert_eq!(as_fee_tx(&tx).unwrap().fee_payer(), payer);
    }

    #[test]
    fn test_decode_without_fee() {
        let bytes = encode_tx(None, Some(&TEST_PUBKEY));
        let tx = DecodedTx::from_bytes(&bytes).unwrap();
        assert!(tx.fee_tx().is_none());
        match as_fee_tx(&tx) {
            Err(e @ AnteError::TxDecode(_)) => {
                assert_eq!(e.code(), crate::error::SdkErrorCode::ErrTxDecode)
            }
            _ => panic!("expected a decode error"),
        }
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            DecodedTx::from_bytes(&[0xff, 0xff, 0xff]),
            Err(AnteError::TxDecode(_))
        ));
        assert!(matches!(
            DecodedTx::from_bytes(&encode_tx(Some(fee("1uatom", None)), None)),
            Err(AnteError::TxDecode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_payer() {
        let auth_info = AuthInfo {
            fee: Some(ProtoFee {
                amount: Vec::new(),
                gas_limit: 100_000,
                payer: "cosmos1notavalidaddress".to_string(),
                granter: String::new(),
            }),
            ..Default::default()
        };
        let bytes = TxRaw {
            body_bytes: Vec::new(),
            auth_info_bytes: auth_info.encode_to_vec(),
            signatures: Vec::new(),
        }
        .encode_to_vec();
        // the signer must not silently become the payer
        match DecodedTx::from_bytes(&bytes) {
            Err(AnteError::TxDecode(msg)) => assert!(msg.contains("payer")),
            other => panic!("expected a decode error, got {:?}", other),
        }
    }
}
