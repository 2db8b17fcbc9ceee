//! Tool-call bridge for the Botpanel trading-bot management API.
//!
//! Exposes the platform's REST resources (users, routines, exchanges,
//! bots, trades) as named tools an agent runtime can invoke. Each tool
//! validates its input, performs one authenticated request through the
//! [`api::Gateway`], and renders the response as a text report.

pub mod api;
pub mod config;
pub mod models;
pub mod tools;

pub use api::{ApiClient, ApiError, Gateway};
pub use config::Config;
pub use tools::registry::{tool_specs, ToolSpec};
pub use tools::{dispatch, ToolError};
