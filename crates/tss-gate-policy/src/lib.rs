//! Verification Dispatcher
//!
//! Decides whether a parsed ceremony request should be approved.
//!
//! ## Architecture
//!
//! The dispatcher maintains a table of request handlers, one per request kind:
//!
//! - **PING**: approved immediately
//! - **KEYGEN / KEYSIGN / KEYRESHARE**: both sub-documents are required and
//!   decoded into the kind's detail and extra views, then a pluggable
//!   business rule decides
//!
//! Every failure for a recognized kind resolves to a [`Rejection`] whose text
//! is sent back to the cluster. Nothing in here panics on caller input.
//!
//! ## Usage
//!
//! ```ignore
//! use tss_gate_policy::{AddressWhitelist, DispatcherBuilder, KeySign};
//!
//! let dispatcher = DispatcherBuilder::new()
//!     .with_defaults()
//!     .with_rule::<KeySign, _>(AddressWhitelist::new(["0xabc"]))
//!     .build();
//!
//! dispatcher.dispatch(Some(&request)).await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod rules;

pub use dispatcher::{Dispatcher, DispatcherBuilder, RequestHandler};
pub use error::{Rejection, Verdict};
pub use handlers::{AddressWhitelist, CeremonyHandler, PingHandler};
pub use rules::{AllOf, ApproveAll, Ceremony, CeremonyRule, KeyGen, KeyReshare, KeySign, RuleFn};
