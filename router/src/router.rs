//! Middleware chain around the native message handler.

use crate::msgs::Msg;
use lunc_tax::{TaxContext, TaxError, TaxStage};
use lunc_types::Event;
use tracing::{debug, trace};

/// What a handler returns for a message it executed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MsgResponse {
    pub events: Vec<Event>,
}

/// The wrapped (native) handler that performs the message's state change.
pub trait MsgHandler<S: ?Sized> {
    fn handle(&self, state: &mut S, msg: &Msg) -> Result<MsgResponse, TaxError>;
}

/// One link of the chain. A middleware may short-circuit, rewrite the message
/// before handing it on, or record values in the context.
pub trait Middleware<S: ?Sized> {
    fn name(&self) -> &'static str;

    fn handle(
        &self,
        state: &mut S,
        ctx: &mut TaxContext,
        msg: Msg,
        next: Next<'_, S>,
    ) -> Result<MsgResponse, TaxError>;
}

/// The rest of the chain after the current middleware.
pub struct Next<'a, S: ?Sized> {
    middlewares: &'a [Box<dyn Middleware<S>>],
    inner: &'a dyn MsgHandler<S>,
}

impl<'a, S: ?Sized> Next<'a, S> {
    pub fn run(self, state: &mut S, ctx: &mut TaxContext, msg: Msg) -> Result<MsgResponse, TaxError> {
        match self.middlewares.split_first() {
            Some((middleware, rest)) => {
                trace!(middleware = middleware.name(), msg = msg.kind(), "entering middleware");
                let next = Next {
                    middlewares: rest,
                    inner: self.inner,
                };
                middleware.handle(state, ctx, msg, next)
            }
            None => {
                if ctx.stage() == TaxStage::Init {
                    ctx.advance(TaxStage::Passthrough)?;
                }
                let result = self.inner.handle(state, &msg);
                let end = if result.is_ok() {
                    TaxStage::Settled
                } else {
                    TaxStage::Failed
                };
                ctx.advance(end)?;
                result
            }
        }
    }
}

/// Ordered middleware list applied to every message.
pub struct Router<S: ?Sized> {
    middlewares: Vec<Box<dyn Middleware<S>>>,
}

impl<S: ?Sized> Router<S> {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn with(mut self, middleware: impl Middleware<S> + 'static) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    /// Run `msg` through the chain and then `inner`.
    pub fn route(
        &self,
        state: &mut S,
        ctx: &mut TaxContext,
        msg: Msg,
        inner: &dyn MsgHandler<S>,
    ) -> Result<MsgResponse, TaxError> {
        ctx.begin_message();
        let kind = msg.kind();
        let next = Next {
            middlewares: &self.middlewares,
            inner,
        };
        let result = next.run(state, ctx, msg);
        if result.is_err() && ctx.stage().can_advance_to(TaxStage::Failed) {
            ctx.advance(TaxStage::Failed)?;
        }
        debug!(msg = kind, stage = ?ctx.stage(), ok = result.is_ok(), "routed message");
        result
    }
}

impl<S: ?Sized> Default for Router<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every message it sees; fails on `Other { type_url: "fail" }`.
    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<Msg>>,
    }

    impl MsgHandler<()> for Recorder {
        fn handle(&self, _state: &mut (), msg: &Msg) -> Result<MsgResponse, TaxError> {
            self.seen.borrow_mut().push(msg.clone());
            match msg {
                Msg::Other { type_url } if type_url == "fail" => {
                    Err(TaxError::InvariantViolated("inner failed".into()))
                }
                _ => Ok(MsgResponse::default()),
            }
        }
    }

    /// Renames every `Other` message and marks it exempt.
    struct Rename(&'static str);

    impl Middleware<()> for Rename {
        fn name(&self) -> &'static str {
            "rename"
        }

        fn handle(
            &self,
            state: &mut (),
            ctx: &mut TaxContext,
            msg: Msg,
            next: Next<'_, ()>,
        ) -> Result<MsgResponse, TaxError> {
            match msg {
                Msg::Other { type_url } if type_url != "fail" => {
                    ctx.advance(TaxStage::Exempted)?;
                    let renamed = Msg::Other {
                        type_url: format!("{}{type_url}", self.0),
                    };
                    next.run(state, ctx, renamed)
                }
                other => next.run(state, ctx, other),
            }
        }
    }

    /// Rejects everything without calling the rest of the chain.
    struct Wall;

    impl Middleware<()> for Wall {
        fn name(&self) -> &'static str {
            "wall"
        }

        fn handle(
            &self,
            _state: &mut (),
            _ctx: &mut TaxContext,
            _msg: Msg,
            _next: Next<'_, ()>,
        ) -> Result<MsgResponse, TaxError> {
            Err(TaxError::Unauthorized {
                expected: "nobody".into(),
                got: "anyone".into(),
            })
        }
    }

    fn other(url: &str) -> Msg {
        Msg::Other {
            type_url: url.into(),
        }
    }

    #[test]
    fn empty_chain_passes_through() {
        let router = Router::<()>::new();
        let inner = Recorder::default();
        let mut ctx = TaxContext::default();
        router.route(&mut (), &mut ctx, other("x"), &inner).unwrap();
        assert_eq!(*inner.seen.borrow(), vec![other("x")]);
        assert_eq!(ctx.stage(), TaxStage::Settled);
    }

    #[test]
    fn middlewares_run_in_order() {
        let router = Router::<()>::new().with(Rename("a.")).with(Rename("b."));
        assert_eq!(router.middleware_names(), vec!["rename", "rename"]);
        let inner = Recorder::default();
        let mut ctx = TaxContext::default();
        // The second rename tries Exempted again from Exempted and fails.
        let err = router.route(&mut (), &mut ctx, other("x"), &inner).unwrap_err();
        assert!(matches!(err, TaxError::InvariantViolated(_)));
        assert_eq!(ctx.stage(), TaxStage::Failed);
        assert!(inner.seen.borrow().is_empty());

        let router = Router::<()>::new().with(Rename("a."));
        let mut ctx = TaxContext::default();
        router.route(&mut (), &mut ctx, other("x"), &inner).unwrap();
        assert_eq!(*inner.seen.borrow(), vec![other("a.x")]);
    }

    #[test]
    fn inner_failure_ends_in_failed() {
        let router = Router::<()>::new().with(Rename("a."));
        let inner = Recorder::default();
        let mut ctx = TaxContext::default();
        assert!(router.route(&mut (), &mut ctx, other("fail"), &inner).is_err());
        assert_eq!(ctx.stage(), TaxStage::Failed);
    }

    #[test]
    fn short_circuit_skips_inner() {
        let router = Router::<()>::new().with(Wall).with(Rename("a."));
        let inner = Recorder::default();
        let mut ctx = TaxContext::default();
        assert!(router.route(&mut (), &mut ctx, other("x"), &inner).is_err());
        assert!(inner.seen.borrow().is_empty());
        assert_eq!(ctx.stage(), TaxStage::Init);
    }

    #[test]
    fn each_message_starts_from_init() {
        let router = Router::<()>::new();
        let inner = Recorder::default();
        let mut ctx = TaxContext::default();
        router.route(&mut (), &mut ctx, other("x"), &inner).unwrap();
        router.route(&mut (), &mut ctx, other("y"), &inner).unwrap();
        assert_eq!(ctx.stage(), TaxStage::Settled);
    }
}
