//! Token scope resolution for outbound provider calls.
//!
//! Every bearer-authenticated call to a provider needs an OAuth scope that is
//! correct for the endpoint's provider kind, cloud environment, and purpose
//! (inference vs. management/discovery). The registry holds the per-cloud
//! literal constants; the resolver layers administrator overrides on top and
//! produces an ephemeral [`AuthContext`] that is never persisted.

pub mod error;
pub mod registry;
pub mod scope;
pub mod token;

pub use {
    error::{AuthError, Result},
    scope::{AuthContext, EndpointAuth, Purpose, ResolvedAuth, resolve_auth, resolve_scope},
    token::{StaticTokenProvider, TokenProvider},
};
