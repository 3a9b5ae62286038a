//! Message interception for the burn tax.
//!
//! Taxable messages (bank sends, multi-sends, swap-sends, contract execution
//! and instantiation) are recognised, taxed through `lunc-tax` and rewritten
//! so the wrapped native handler only moves the net amount. Everything else
//! passes through unchanged.

pub mod middleware;
pub mod msgs;
pub mod multisend;
pub mod router;
pub mod taxable;

pub use middleware::{BankTax, MarketTax, WasmTax};
pub use msgs::{Input, Msg, Output};
pub use router::{Middleware, MsgHandler, MsgResponse, Next, Router};
pub use taxable::{estimate_taxes, Exemption, Taxable, TaxableKind};

use lunc_store::TaxState;

/// Router with the bank, market and wasm tax middlewares, in that order.
pub fn tax_router<S: TaxState + ?Sized>() -> Router<S> {
    Router::new().with(BankTax).with(MarketTax).with(WasmTax)
}
