//! Toolset construction core for AppBridge.
//!
//! Turns a cloud integration resource (an Application Integration workflow + trigger, or
//! an Integration Connectors connection + entity operations/actions) into a set of
//! callable tool definitions, exposed through a name-keyed registry.
//!
//! The pipeline: validate the [`config::ToolsetConfig`] into a tagged
//! [`config::ResourceSelector`], fetch an OpenAPI-shaped document from a
//! [`provider::SpecProvider`], resolve the auth scheme/credential pair, parse the
//! document into tools, and populate the [`registry::ToolRegistry`]. Construction is
//! all-or-nothing: any failure surfaces before a partial registry is observable.

pub mod auth;
pub mod config;
pub mod error;
pub mod provider;
pub mod registry;
pub mod toolset;

pub use config::{ResourceSelector, ToolsetConfig};
pub use error::{Result, ToolsetError};
pub use provider::{ConnectionDetails, SpecProvider};
pub use registry::ToolRegistry;
pub use toolset::IntegrationToolset;
