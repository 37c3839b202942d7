//! The ante chain, a list of decorators each of which inspects a transaction
//! and then either rejects it or hands it on to the rest of the chain
//!
use crate::config::AnteConfig;
use crate::error::{AnteError, ConfigError};
use crate::keeper::{AccountKeeper, BankKeeper};
use crate::params::{fee_key_table, ParamStore, Subspace};
use crate::tx::Tx;

pub mod deduct_fee;
pub mod min_fee;

pub use deduct_fee::{deduct_fees, DeductFeeDecorator};
pub use min_fee::{required_fees, MinGasPriceDecorator};

/// Which pass over a transaction is being made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecMode {
    /// First admission of a tx into the mempool
    CheckTx,
    /// Re-validation of a mempool tx after a new block was committed
    ReCheckTx,
    /// Final execution inside a block
    DeliverTx,
}

/// The state a transaction is processed in, handed from decorator to
/// decorator and returned to the host at the end of the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    mode: ExecMode,
    chain_id: String,
    block_height: u64,
}

impl Context {
    pub fn new(chain_id: &str, block_height: u64, mode: ExecMode) -> Self {
        Context {
            mode,
            chain_id: chain_id.to_string(),
            block_height,
        }
    }

    pub fn mode(&self) -> ExecMode {
        self.mode
    }

    /// True for both admission passes, these must not mutate state
    pub fn is_check_tx(&self) -> bool {
        matches!(self.mode, ExecMode::CheckTx | ExecMode::ReCheckTx)
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }
}

/// One stage of the ante chain. Implementations either return an error or
/// call `next.run` exactly once with the context they want to pass on
pub trait AnteDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<Context, AnteError>;
}

/// The remainder of the chain after the current decorator
pub struct Next<'a> {
    rest: &'a [Box<dyn AnteDecorator + 'a>],
}

impl<'a> Next<'a> {
    /// The end of a chain, running it just returns the context
    pub fn terminator() -> Next<'static> {
        Next { rest: &[] }
    }

    pub fn run(self, ctx: Context, tx: &dyn Tx, simulate: bool) -> Result<Context, AnteError> {
        match self.rest.split_first() {
            Some((first, rest)) => first.ante_handle(ctx, tx, simulate, Next { rest }),
            None => Ok(ctx),
        }
    }
}

/// A complete chain of decorators, run in order with early exit on error
pub struct AnteHandler<'a> {
    decorators: Vec<Box<dyn AnteDecorator + 'a>>,
}

impl<'a> AnteHandler<'a> {
    pub fn chain(decorators: Vec<Box<dyn AnteDecorator + 'a>>) -> Self {
        AnteHandler { decorators }
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    pub fn handle(&self, ctx: Context, tx: &dyn Tx, simulate: bool) -> Result<Context, AnteError> {
        Next {
            rest: &self.decorators,
        }
        .run(ctx, tx, simulate)
    }
}

/// Builds the standard fee chain, the minimum gas price check followed by the
/// fee deduction. Fails if the fee collector module account does not exist,
/// the node must not start in that case. Only DeliverTx runs move funds, the
/// admission passes stop at the price check
pub fn new_ante_handler<'a, A, B, S>(
    config: &AnteConfig,
    ak: A,
    bk: B,
    params: S,
) -> Result<AnteHandler<'a>, ConfigError>
where
    A: AccountKeeper + 'a,
    B: BankKeeper + 'a,
    S: ParamStore + 'a,
{
    config.validate()?;
    let subspace = Subspace::new(&config.params_subspace, params, fee_key_table());
    let deduct = DeductFeeDecorator::new(config, ak, bk)?;
    info!(
        "Fee ante chain ready, collecting into {} with params from subspace {}",
        config.fee_collector, config.params_subspace
    );
    Ok(AnteHandler::chain(vec![
        Box::new(MinGasPriceDecorator::new(subspace)),
        Box::new(deduct),
    ]))
}

/// Builds a chain holding only the minimum gas price check, for hosts that run
/// mempool admission without any account or bank keeper
pub fn new_check_ante_handler<'a, S>(
    config: &AnteConfig,
    params: S,
) -> Result<AnteHandler<'a>, ConfigError>
where
    S: ParamStore + 'a,
{
    config.validate()?;
    let subspace = Subspace::new(&config.params_subspace, params, fee_key_table());
    Ok(AnteHandler::chain(vec![Box::new(MinGasPriceDecorator::new(
        subspace,
    ))]))
}
