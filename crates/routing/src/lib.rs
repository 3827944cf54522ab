//! Request routing over the canonical endpoint list.

pub mod error;
pub mod resolve;

pub use {
    error::{Result, RouteError},
    resolve::{
        AgentInfo, RequestContext, Selected, endpoint_for_agent_info, select_deployment,
        should_resolve_multi_endpoint,
    },
};
