//! The ledger collaborators the ante handlers consume, the host node supplies
//! the real implementations. An in memory ledger lives in [`memory`]
//!
use crate::address::Address;
use crate::coin::Coin;
use crate::error::BankError;

pub mod memory;

/// The name of the module account fees are collected into
pub const FEE_COLLECTOR_NAME: &str = "fee_collector";

/// This is the part of an on chain account the fee handlers care about
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BaseAccount {
    pub address: Address,
    pub account_number: u64,
    pub sequence: u64,
}

/// Read access to accounts
pub trait AccountKeeper {
    /// Looks up an account, None if the address has never been seen
    fn get_account(&self, address: Address) -> Option<BaseAccount>;

    /// The address of a registered module account, None if no module by
    /// this name has been set up
    fn get_module_address(&self, name: &str) -> Option<Address>;
}

/// The transfer primitive used to collect fees
pub trait BankKeeper {
    /// Moves `amount` from `from` into the named module account. Must be all or
    /// nothing, if any denom can not be paid no balance may change
    fn send_coins_from_account_to_module(
        &self,
        from: Address,
        module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError>;
}

impl<T: AccountKeeper + ?Sized> AccountKeeper for &T {
    fn get_account(&self, address: Address) -> Option<BaseAccount> {
        (**self).get_account(address)
    }

    fn get_module_address(&self, name: &str) -> Option<Address> {
        (**self).get_module_address(name)
    }
}

impl<T: BankKeeper + ?Sized> BankKeeper for &T {
    fn send_coins_from_account_to_module(
        &self,
        from: Address,
        module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        (**self).send_coins_from_account_to_module(from, module, amount)
    }
}

impl<T: AccountKeeper + ?Sized> AccountKeeper for std::sync::Arc<T> {
    fn get_account(&self, address: Address) -> Option<BaseAccount> {
        (**self).get_account(address)
    }

    fn get_module_address(&self, name: &str) -> Option<Address> {
        (**self).get_module_address(name)
    }
}

impl<T: BankKeeper + ?Sized> BankKeeper for std::sync::Arc<T> {
    fn send_coins_from_account_to_module(
        &self,
        from: Address,
        module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        (**self).send_coins_from_account_to_module(from, module, amount)
    }
}
