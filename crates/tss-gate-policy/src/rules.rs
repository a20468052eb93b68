//! Business rules evaluated after a ceremony's documents decode
//!
//! A rule sees the raw request plus the typed detail and extra views for one
//! ceremony kind. The default rule approves anything that decodes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use tss_gate_core::{
    CeremonyRequest, KeyGenDetail, KeyGenExtra, KeyReshareDetail, KeyReshareExtra, KeySignDetail,
    KeySignExtra, RequestKind,
};

use crate::error::Verdict;

/// Binds a request kind to its detail and extra projections
pub trait Ceremony: Send + Sync + 'static {
    type Detail: DeserializeOwned + Debug + Send + Sync;
    type Extra: DeserializeOwned + Debug + Send + Sync;

    const KIND: RequestKind;
}

/// Key generation ceremony
#[derive(Debug, Clone, Copy)]
pub struct KeyGen;

/// Key signing ceremony
#[derive(Debug, Clone, Copy)]
pub struct KeySign;

/// Key resharing ceremony
#[derive(Debug, Clone, Copy)]
pub struct KeyReshare;

impl Ceremony for KeyGen {
    type Detail = KeyGenDetail;
    type Extra = KeyGenExtra;
    const KIND: RequestKind = RequestKind::KeyGen;
}

impl Ceremony for KeySign {
    type Detail = KeySignDetail;
    type Extra = KeySignExtra;
    const KIND: RequestKind = RequestKind::KeySign;
}

impl Ceremony for KeyReshare {
    type Detail = KeyReshareDetail;
    type Extra = KeyReshareExtra;
    const KIND: RequestKind = RequestKind::KeyReshare;
}

/// Approval policy for one ceremony kind
#[async_trait]
pub trait CeremonyRule<C: Ceremony>: Send + Sync {
    /// Approve with `Ok(())` or decline with a rejection
    async fn evaluate(&self, request: &CeremonyRequest, detail: &C::Detail, extra: &C::Extra) -> Verdict;

    /// Get a description of this rule (for logging)
    fn description(&self) -> &str {
        "ceremony rule"
    }
}

/// Approves every decoded ceremony
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproveAll;

#[async_trait]
impl<C: Ceremony> CeremonyRule<C> for ApproveAll {
    async fn evaluate(&self, _request: &CeremonyRequest, _detail: &C::Detail, _extra: &C::Extra) -> Verdict {
        Ok(())
    }

    fn description(&self) -> &str {
        "approve once decoded"
    }
}

/// Adapts a plain function into a rule
pub struct RuleFn<C, F> {
    name: String,
    f: F,
    _ceremony: PhantomData<fn() -> C>,
}

impl<C, F> RuleFn<C, F>
where
    C: Ceremony,
    F: Fn(&C::Detail, &C::Extra) -> Verdict + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _ceremony: PhantomData,
        }
    }
}

#[async_trait]
impl<C, F> CeremonyRule<C> for RuleFn<C, F>
where
    C: Ceremony,
    F: Fn(&C::Detail, &C::Extra) -> Verdict + Send + Sync,
{
    async fn evaluate(&self, _request: &CeremonyRequest, detail: &C::Detail, extra: &C::Extra) -> Verdict {
        (self.f)(detail, extra)
    }

    fn description(&self) -> &str {
        &self.name
    }
}

/// Approves only when every inner rule approves; reports the first rejection
pub struct AllOf<C: Ceremony> {
    rules: Vec<Arc<dyn CeremonyRule<C>>>,
}

impl<C: Ceremony> AllOf<C> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule<R: CeremonyRule<C> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<C: Ceremony> Default for AllOf<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<C: Ceremony> CeremonyRule<C> for AllOf<C> {
    async fn evaluate(&self, request: &CeremonyRequest, detail: &C::Detail, extra: &C::Extra) -> Verdict {
        for rule in &self.rules {
            rule.evaluate(request, detail, extra).await?;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "all of"
    }
}
