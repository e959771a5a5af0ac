//! Shared OpenAPI->tool plumbing for AppBridge.
//!
//! This crate is intended to be used by:
//! - `appbridge-toolset` (toolset construction core)
//! - `appbridge-connect` (control-plane clients that produce spec documents)
//!
//! It intentionally contains **no** network code and **no** toolset policy: it models
//! OpenAPI-shaped spec documents, the auth scheme/credential pair attached to generated
//! tools, and the parser that turns a document into [`tool::RestApiTool`] values.

pub mod auth;
pub mod document;
pub mod error;
pub mod parser;
pub mod tool;

pub use auth::{AuthCredential, AuthScheme, ServiceAccountKey, CLOUD_PLATFORM_SCOPE};
pub use document::ToolSpecDocument;
pub use error::{OpenApiToolError, Result};
pub use parser::parse_document;
pub use tool::RestApiTool;
