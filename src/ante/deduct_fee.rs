use super::{AnteDecorator, Context, Next};
use crate::address::Address;
use crate::coin::{coins_are_zero, validate_coins, Coin};
use crate::config::AnteConfig;
use crate::error::{AnteError, ConfigError};
use crate::keeper::{AccountKeeper, BankKeeper, BaseAccount};
use crate::tx::{as_fee_tx, Tx};

/// DeductFeeDecorator moves the fee of a transaction from the fee payer into
/// the fee collector module account. If the payer can not cover the fee the
/// transaction is rejected with an insufficient funds error and no balance
/// changes. Only final execution mutates the ledger, CheckTx and ReCheckTx
/// pass straight through to the next decorator
pub struct DeductFeeDecorator<A, B> {
    ak: A,
    bank_keeper: B,
    fee_collector: String,
    address_prefix: String,
}

impl<A: AccountKeeper, B: BankKeeper> DeductFeeDecorator<A, B> {
    /// Fails if the fee collector module account is not registered with the
    /// account keeper, the host must treat this as fatal
    pub fn new(config: &AnteConfig, ak: A, bank_keeper: B) -> Result<Self, ConfigError> {
        match ak.get_module_address(&config.fee_collector) {
            Some(address) => trace!(
                "Fee collector {} at {}",
                config.fee_collector,
                display_address(address, &config.address_prefix)
            ),
            None => {
                let err = ConfigError::ModuleAccountNotSet(config.fee_collector.clone());
                warn!("{} (code {})", err, err.code().get_code());
                return Err(err);
            }
        }
        Ok(DeductFeeDecorator {
            ak,
            bank_keeper,
            fee_collector: config.fee_collector.clone(),
            address_prefix: config.address_prefix.clone(),
        })
    }
}

impl<A: AccountKeeper, B: BankKeeper> AnteDecorator for DeductFeeDecorator<A, B> {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<Context, AnteError> {
        let fee_tx = as_fee_tx(tx)?;

        if ctx.is_check_tx() {
            return next.run(ctx, tx, simulate);
        }

        let fee_payer = fee_tx.fee_payer();
        let fee_payer_acc = match self.ak.get_account(fee_payer) {
            Some(acc) => acc,
            None => {
                debug!(
                    "Fee payer {} does not exist",
                    display_address(fee_payer, &self.address_prefix)
                );
                return Err(AnteError::UnknownAddress { address: fee_payer });
            }
        };

        let fee = fee_tx.get_fee();
        if !coins_are_zero(fee) {
            deduct_fees(&self.bank_keeper, &fee_payer_acc, fee, &self.fee_collector)?;
            trace!(
                "Deducted {} from {} at height {}",
                Coin::display_list(fee),
                display_address(fee_payer, &self.address_prefix),
                ctx.block_height()
            );
        }

        next.run(ctx, tx, simulate)
    }
}

/// Deducts fees from the given account into the named module account. The
/// fee must be a valid coin set, the transfer is all or nothing
pub fn deduct_fees<B: BankKeeper + ?Sized>(
    bank_keeper: &B,
    acc: &BaseAccount,
    fees: &[Coin],
    module: &str,
) -> Result<(), AnteError> {
    if let Err(e) = validate_coins(fees) {
        return Err(AnteError::InvalidFee {
            fee: fees.to_vec(),
            reason: e.to_string(),
        });
    }

    bank_keeper.send_coins_from_account_to_module(acc.address, module, fees)?;
    Ok(())
}

fn display_address(address: Address, prefix: &str) -> String {
    address
        .to_bech32(prefix)
        .unwrap_or_else(|_| address.to_string())
}
