//! Request-scoped context threaded through the tax pipeline.
//!
//! One [`TaxContext`] is created when a transaction enters the pipeline and
//! dropped when it leaves. It replaces string-keyed context lookups with typed
//! fields; the key names survive only as labels for logging.

use crate::error::TaxError;
use lunc_types::{AccAddress, Coins, Event};

pub const KEY_REVERSE_CHARGE: &str = "tax.reverse_charge";
pub const KEY_TAX_DUE: &str = "tax.tax_due";
pub const KEY_TAX_PAYER: &str = "tax.tax_payer";
pub const KEY_WASM_FUNDS: &str = "tax.wasm_funds";
pub const KEY_WASM_BALANCE: &str = "tax.wasm_balance";

/// Per-message position in the pipeline.
///
/// ```text
/// Init ─┬─> Exempted    ─┐
///       ├─> Passthrough ─┼─> Settled | Failed
///       └─> Taxed       ─┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaxStage {
    Init,
    Exempted,
    Passthrough,
    Taxed,
    Settled,
    Failed,
}

impl TaxStage {
    pub fn can_advance_to(self, next: TaxStage) -> bool {
        use TaxStage::*;
        matches!(
            (self, next),
            (Init, Exempted | Passthrough | Taxed)
                | (Exempted | Passthrough | Taxed, Settled | Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaxStage::Settled | TaxStage::Failed)
    }
}

#[derive(Clone, Debug)]
pub struct TaxContext {
    /// False when the ante step has already arranged payment of the tax.
    pub reverse_charge: bool,
    /// Tax to collect after successful execution.
    pub tax_due: Option<Coins>,
    /// Account charged for `tax_due`.
    pub tax_payer: Option<AccAddress>,
    /// Net funds forwarded to the contract by the current wasm message.
    pub wasm_funds: Option<Coins>,
    /// Contract balance observed before the current wasm message ran.
    pub wasm_balance: Option<Coins>,
    stage: TaxStage,
    events: Vec<Event>,
}

impl TaxContext {
    pub fn new(reverse_charge: bool) -> Self {
        Self {
            reverse_charge,
            tax_due: None,
            tax_payer: None,
            wasm_funds: None,
            wasm_balance: None,
            stage: TaxStage::Init,
            events: Vec::new(),
        }
    }

    /// Defer collection of `taxes` from `payer` until after execution.
    pub fn defer(&mut self, payer: AccAddress, taxes: Coins) {
        self.tax_payer = Some(payer);
        self.tax_due = Some(taxes);
    }

    pub fn stage(&self) -> TaxStage {
        self.stage
    }

    /// Reset the stage for the next message of the transaction.
    pub fn begin_message(&mut self) {
        self.stage = TaxStage::Init;
        self.wasm_funds = None;
        self.wasm_balance = None;
    }

    pub fn advance(&mut self, next: TaxStage) -> Result<(), TaxError> {
        if !self.stage.can_advance_to(next) {
            return Err(TaxError::InvariantViolated(format!(
                "illegal tax stage transition {:?} -> {:?}",
                self.stage, next
            )));
        }
        self.stage = next;
        Ok(())
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drain the events emitted so far.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl Default for TaxContext {
    /// Reverse charge on: the message layer collects the tax.
    fn default() -> Self {
        Self::new(true)
    }
}
