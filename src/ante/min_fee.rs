use super::{AnteDecorator, Context, Next};
use crate::coin::{coins_are_zero, dec_coins_are_zero, is_any_gte, Coin, DecCoin};
use crate::error::AnteError;
use crate::params::{ParamStore, Subspace};
use crate::tx::{as_fee_tx, Tx};

/// MinGasPriceDecorator checks that the fee of a transaction is at least as
/// large as the minimum gas prices held in the fee parameters. If the fee is
/// too low the tx is rejected from the mempool. This only applies to CheckTx
/// and ReCheckTx outside of simulation, every other pass goes straight to the
/// next decorator
pub struct MinGasPriceDecorator<S> {
    params: Subspace<S>,
}

impl<S: ParamStore> MinGasPriceDecorator<S> {
    pub fn new(params: Subspace<S>) -> Self {
        MinGasPriceDecorator { params }
    }
}

/// The fee needed to buy `gas` at the given prices, each amount rounded up
/// so that fractional prices never under collect
pub fn required_fees(min_gas_prices: &[DecCoin], gas: u64) -> Result<Vec<Coin>, AnteError> {
    let mut required = Vec::with_capacity(min_gas_prices.len());
    for price in min_gas_prices {
        match price.mul_ceil(gas) {
            Some(fee) => required.push(fee),
            None => {
                return Err(AnteError::FeeOverflow {
                    gas_limit: gas,
                    price: price.clone(),
                })
            }
        }
    }
    Ok(required)
}

impl<S: ParamStore> AnteDecorator for MinGasPriceDecorator<S> {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<Context, AnteError> {
        let fee_tx = as_fee_tx(tx)?;

        if ctx.is_check_tx() && !simulate {
            let min_gas_prices = match self.params.fee_params()? {
                Some(params) => params.fee,
                None => Vec::new(),
            };
            if !dec_coins_are_zero(&min_gas_prices) {
                let fee = fee_tx.get_fee();
                let required = required_fees(&min_gas_prices, fee_tx.get_gas())?;
                if !coins_are_zero(&required) && !is_any_gte(fee, &required) {
                    debug!(
                        "Rejecting tx at height {} fee {} below minimum {}",
                        ctx.block_height(),
                        Coin::display_list(fee),
                        Coin::display_list(&required)
                    );
                    return Err(AnteError::InsufficientFee {
                        got: fee.to_vec(),
                        required,
                    });
                }
            }
        }

        next.run(ctx, tx, simulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::ante::{AnteHandler, ExecMode};
    use crate::coin::{parse_coins, parse_dec_coins, Fee};
    use crate::error::SdkErrorCode;
    use crate::params::{FeeParams, MemoryParamStore, FEE_PARAMSPACE, PARAM_STORE_KEY_FEE};
    use crate::tx::{FeeTx, StdFeeTx};
    use num256::Int256;

    struct NoFeeTx;

    impl Tx for NoFeeTx {
        fn fee_tx(&self) -> Option<&dyn FeeTx> {
            None
        }
    }

    fn store_with_prices(prices: &str) -> MemoryParamStore {
        let store = MemoryParamStore::new();
        Subspace::fee(&store)
            .set_fee_params(FeeParams::new(
                parse_dec_coins(prices).unwrap(),
                Int256::from(0i64),
            ))
            .unwrap();
        store
    }

    fn tx(fee: &str, gas: u64) -> StdFeeTx {
        StdFeeTx::new(
            Fee {
                amount: parse_coins(fee).unwrap(),
                gas_limit: gas,
                payer: None,
                granter: None,
            },
            Address::default(),
        )
    }

    fn run(
        store: &MemoryParamStore,
        mode: ExecMode,
        simulate: bool,
        tx: &dyn Tx,
    ) -> Result<Context, AnteError> {
        let decorator = MinGasPriceDecorator::new(Subspace::fee(store));
        let handler = AnteHandler::chain(vec![Box::new(decorator)]);
        handler.handle(Context::new("test", 1, mode), tx, simulate)
    }

    #[test]
    fn test_required_fees_round_up() {
        let prices = parse_dec_coins("0.1uatom,0.025stake").unwrap();
        let required = required_fees(&prices, 100).unwrap();
        assert_eq!(required, parse_coins("10uatom,3stake").unwrap());
        let required = required_fees(&prices, 0).unwrap();
        assert!(coins_are_zero(&required));
    }

    #[test]
    fn test_boundary() {
        let store = store_with_prices("0.1uatom");
        let err = run(&store, ExecMode::CheckTx, false, &tx("9uatom", 100)).unwrap_err();
        assert_eq!(err.code(), SdkErrorCode::ErrInsufficientFee);
        match err {
            AnteError::InsufficientFee { got, required } => {
                assert_eq!(got, parse_coins("9uatom").unwrap());
                assert_eq!(required, parse_coins("10uatom").unwrap());
            }
            other => panic!("unexpected error {}", other),
        }
        assert!(run(&store, ExecMode::CheckTx, false, &tx("10uatom", 100)).is_ok());
        assert!(run(&store, ExecMode::CheckTx, false, &tx("11uatom", 100)).is_ok());
        assert!(run(&store, ExecMode::ReCheckTx, false, &tx("9uatom", 100)).is_err());
    }

    #[test]
    fn test_any_denom_is_enough() {
        let store = store_with_prices("0.1uatom,1stake");
        assert!(run(&store, ExecMode::CheckTx, false, &tx("1uatom,100stake", 100)).is_ok());
        assert!(run(&store, ExecMode::CheckTx, false, &tx("10uatom", 100)).is_ok());
        assert!(run(&store, ExecMode::CheckTx, false, &tx("9uatom,99stake", 100)).is_err());
        assert!(run(&store, ExecMode::CheckTx, false, &tx("1000other", 100)).is_err());
        assert!(run(&store, ExecMode::CheckTx, false, &tx("", 100)).is_err());
    }

    #[test]
    fn test_passthrough_outside_admission() {
        let store = store_with_prices("1uatom");
        let cheap = tx("1uatom", 1_000);
        assert!(run(&store, ExecMode::CheckTx, true, &cheap).is_ok());
        assert!(run(&store, ExecMode::DeliverTx, false, &cheap).is_ok());
        assert!(run(&store, ExecMode::DeliverTx, true, &cheap).is_ok());
    }

    #[test]
    fn test_no_minimum() {
        let unset = MemoryParamStore::new();
        assert!(run(&unset, ExecMode::CheckTx, false, &tx("", 1_000)).is_ok());
        let zero = store_with_prices("0uatom,0.0stake");
        assert!(run(&zero, ExecMode::CheckTx, false, &tx("", 1_000)).is_ok());
        // no gas means nothing is required
        let priced = store_with_prices("0.5uatom");
        assert!(run(&priced, ExecMode::CheckTx, false, &tx("", 0)).is_ok());
    }

    #[test]
    fn test_tx_without_fee() {
        let store = store_with_prices("1uatom");
        let err = run(&store, ExecMode::DeliverTx, false, &NoFeeTx).unwrap_err();
        assert_eq!(err.code(), SdkErrorCode::ErrTxDecode);
    }

    #[test]
    fn test_overflow_is_insufficient() {
        let store = MemoryParamStore::new();
        store.set(
            FEE_PARAMSPACE,
            PARAM_STORE_KEY_FEE,
            br#"{"version":"v1","fee":[{"denom":"uatom","amount":"79228162514264337593543950335"}]}"#
                .to_vec(),
        );
        let err = run(&store, ExecMode::CheckTx, false, &tx("1uatom", u64::MAX)).unwrap_err();
        assert!(matches!(err, AnteError::FeeOverflow { .. }));
        assert_eq!(err.code(), SdkErrorCode::ErrInsufficientFee);
    }

    #[test]
    fn test_corrupt_params_reject() {
        let store = MemoryParamStore::new();
        store.set(FEE_PARAMSPACE, PARAM_STORE_KEY_FEE, b"{}".to_vec());
        let err = run(&store, ExecMode::CheckTx, false, &tx("1uatom", 1)).unwrap_err();
        assert!(matches!(err, AnteError::Params { .. }));
    }
}
