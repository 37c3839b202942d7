//! An in memory account and bank ledger, intended for tests and for hosts
//! that want to exercise the ante chain without a real store
//!
use super::{AccountKeeper, BankKeeper, BaseAccount};
use crate::address::Address;
use crate::coin::{checked_sum, validate_coins, zero, Coin};
use crate::error::BankError;
use num256::Uint256;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

#[derive(Default)]
struct LedgerState {
    accounts: BTreeMap<Address, BaseAccount>,
    balances: HashMap<Address, BTreeMap<String, Uint256>>,
    modules: HashMap<String, Address>,
}

/// A ledger held entirely in memory, every transfer takes the write lock for
/// its whole duration so it is atomic with respect to other callers
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
    transfers: AtomicU64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Creates an account for this address if none exists yet and returns it
    pub fn create_account(&self, address: Address) -> BaseAccount {
        let mut state = self.write();
        let next_number = state.accounts.len() as u64;
        state
            .accounts
            .entry(address)
            .or_insert(BaseAccount {
                address,
                account_number: next_number,
                sequence: 0,
            })
            .clone()
    }

    /// Registers a module account and returns its derived address
    pub fn add_module_account(&self, name: &str) -> Address {
        let address = Address::for_module(name);
        self.create_account(address);
        self.write().modules.insert(name.to_string(), address);
        address
    }

    /// Mints coins straight into an account, creating it if needed
    pub fn fund(&self, address: Address, amount: &[Coin]) -> Result<(), BankError> {
        validate_coins(amount).map_err(|e| BankError::InvalidCoins(e.to_string()))?;
        self.create_account(address);
        let mut state = self.write();
        let balances = state.balances.entry(address).or_default();
        for coin in amount {
            let current = balances.get(&coin.denom).cloned().unwrap_or_else(zero);
            let updated = checked_sum(&current, &coin.amount)
                .ok_or_else(|| BankError::Overflow(coin.denom.clone()))?;
            balances.insert(coin.denom.clone(), updated);
        }
        Ok(())
    }

    pub fn balance(&self, address: Address, denom: &str) -> Uint256 {
        self.read()
            .balances
            .get(&address)
            .and_then(|b| b.get(denom))
            .cloned()
            .unwrap_or_else(zero)
    }

    /// All non zero balances of an account, sorted by denom
    pub fn balances(&self, address: Address) -> Vec<Coin> {
        match self.read().balances.get(&address) {
            Some(b) => b
                .iter()
                .filter(|(_, amount)| **amount != zero())
                .map(|(denom, amount)| Coin::new(amount.clone(), denom.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// How many times the transfer primitive has been called, successful or not
    pub fn transfer_count(&self) -> u64 {
        self.transfers.load(Ordering::SeqCst)
    }
}

impl AccountKeeper for MemoryLedger {
    fn get_account(&self, address: Address) -> Option<BaseAccount> {
        self.read().accounts.get(&address).cloned()
    }

    fn get_module_address(&self, name: &str) -> Option<Address> {
        self.read().modules.get(name).copied()
    }
}

impl BankKeeper for MemoryLedger {
    fn send_coins_from_account_to_module(
        &self,
        from: Address,
        module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        self.transfers.fetch_add(1, Ordering::SeqCst);
        validate_coins(amount).map_err(|e| BankError::InvalidCoins(e.to_string()))?;

        let mut state = self.write();
        let to = match state.modules.get(module) {
            Some(addr) => *addr,
            None => return Err(BankError::UnknownModule(module.to_string())),
        };

        // work out every resulting balance before touching any of them
        let mut debits = Vec::with_capacity(amount.len());
        let mut credits = Vec::with_capacity(amount.len());
        for coin in amount {
            let balance = state
                .balances
                .get(&from)
                .and_then(|b| b.get(&coin.denom))
                .cloned()
                .unwrap_or_else(zero);
            if balance < coin.amount {
                return Err(BankError::InsufficientBalance {
                    address: from,
                    denom: coin.denom.clone(),
                    balance,
                    needed: coin.amount.clone(),
                });
            }
            debits.push((coin.denom.clone(), balance - coin.amount.clone()));

            let received = state
                .balances
                .get(&to)
                .and_then(|b| b.get(&coin.denom))
                .cloned()
                .unwrap_or_else(zero);
            let received = if from == to {
                received - coin.amount.clone()
            } else {
                received
            };
            let credited = checked_sum(&received, &coin.amount)
                .ok_or_else(|| BankError::Overflow(coin.denom.clone()))?;
            credits.push((coin.denom.clone(), credited));
        }

        let sender = state.balances.entry(from).or_default();
        for (denom, value) in debits {
            sender.insert(denom, value);
        }
        let receiver = state.balances.entry(to).or_default();
        for (denom, value) in credits {
            receiver.insert(denom, value);
        }
        trace!(
            "Moved {} from {} to module {}",
            Coin::display_list(amount),
            from,
            module
        );
        Ok(())
    }
}
