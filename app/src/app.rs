//! Transaction execution over a branchable chain state.
//!
//! Every transaction runs against a clone of the committed state. The clone
//! replaces the committed state only when every step succeeded, so a failed
//! transaction leaves no trace.

use crate::error::AppError;
use crate::genesis::{init_genesis, GenesisState, GenesisStore};
use crate::native::NativeHandler;
use lunc_router::{estimate_taxes, tax_router, Msg, Router};
use lunc_store::TaxState;
use lunc_tax::query::{query, TaxQuery, TaxQueryResponse};
use lunc_tax::{prepare, settle, sweep_burn_account, FeeInfo, ParamsKeeper, TaxError, CODESPACE};
use lunc_types::{AccAddress, Coins, Event, TaxParams};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A signed-and-verified transaction as handed over by the runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub msgs: Vec<Msg>,
    #[serde(default)]
    pub fee: Coins,
    #[serde(default)]
    pub gas_limit: u64,
    /// Bech32 address paying the fee.
    pub fee_payer: String,
}

/// Outcome of a delivered transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    /// 0 on success, otherwise the error's code within `codespace`.
    pub code: u32,
    pub codespace: String,
    /// JSON event list on success, the error message on failure.
    pub log: String,
    pub events: Vec<Event>,
}

impl TxResult {
    fn ok(events: Vec<Event>) -> Self {
        let log = serde_json::to_string(&events).unwrap_or_default();
        Self {
            code: 0,
            codespace: String::new(),
            log,
            events,
        }
    }

    fn err(err: &TaxError) -> Self {
        Self {
            code: err.code(),
            codespace: CODESPACE.to_string(),
            log: err.to_string(),
            events: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

pub struct App<S: TaxState + Clone + 'static> {
    state: S,
    router: Router<S>,
    native: NativeHandler,
    params: ParamsKeeper,
}

impl<S: TaxState + Clone + 'static> App<S> {
    pub fn new(state: S, authority: AccAddress) -> Self {
        Self {
            state,
            router: tax_router(),
            native: NativeHandler,
            params: ParamsKeeper::new(authority),
        }
    }

    /// Build an app whose state is `state` with `genesis` loaded.
    pub fn from_genesis(mut state: S, genesis: &GenesisState, authority: AccAddress) -> Result<Self, AppError>
    where
        S: GenesisStore,
    {
        init_genesis(&mut state, genesis)?;
        Ok(Self::new(state, authority))
    }

    /// Committed state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Run `tx` and commit its effects if it succeeds.
    pub fn deliver_tx(&mut self, tx: &Tx) -> TxResult {
        let mut branch = self.state.clone();
        match self.execute(&mut branch, tx) {
            Ok(events) => {
                self.state = branch;
                TxResult::ok(events)
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "transaction failed, state discarded");
                TxResult::err(&err)
            }
        }
    }

    fn execute(&self, state: &mut S, tx: &Tx) -> Result<Vec<Event>, TaxError> {
        let payer: AccAddress = tx
            .fee_payer
            .parse()
            .map_err(|e| TaxError::InvalidAddress(format!("fee_payer: {e}")))?;

        let taxes = estimate_taxes(state, &tx.msgs)?;
        let plan = prepare(
            state,
            &FeeInfo {
                payer: payer.clone(),
                fee: tx.fee.clone(),
                gas_limit: tx.gas_limit,
            },
            &taxes,
        )?;
        if !plan.gas_fee.is_empty() {
            state.deduct_fees(&payer, &plan.gas_fee)?;
        }

        let mut ctx = plan.context;
        let mut events = Vec::new();
        for msg in &tx.msgs {
            let response = self.router.route(state, &mut ctx, msg.clone(), &self.native)?;
            events.extend(ctx.take_events());
            events.extend(response.events);
        }

        settle(state, &mut ctx, true)?;
        events.extend(ctx.take_events());
        Ok(events)
    }

    /// End-of-block work: destroy what the burn module collected.
    pub fn end_block(&mut self) -> Result<Coins, AppError> {
        let mut branch = self.state.clone();
        let burned = sweep_burn_account(&mut branch)?;
        self.state = branch;
        if !burned.is_empty() {
            info!(burned = %burned, "end block");
        }
        Ok(burned)
    }

    /// Governance-authorised params update.
    pub fn update_params(&mut self, sender: &AccAddress, params: TaxParams) -> Result<(), AppError> {
        let mut branch = self.state.clone();
        self.params.update_params(&mut branch, sender, params)?;
        self.state = branch;
        Ok(())
    }

    pub fn query(&self, q: &TaxQuery) -> Result<TaxQueryResponse, AppError> {
        Ok(query(&self.state, q)?)
    }
}
