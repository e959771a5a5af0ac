//! Control-plane clients for AppBridge.
//!
//! Implements the toolset core's `SpecProvider` seam against the Application
//! Integration and Integration Connectors REST APIs: spec generation for an
//! integration/trigger pair, connection metadata retrieval, and local synthesis of
//! connection-mode spec documents. Also owns bearer-token acquisition (static token,
//! ADC metadata server, or service-account JWT-bearer grant).

pub mod connections;
pub mod error;
pub mod integrations;
pub mod provider;
pub mod token;

pub use connections::ConnectionsClient;
pub use error::{ConnectError, Result};
pub use integrations::IntegrationClient;
pub use provider::HttpSpecProvider;
pub use token::TokenSource;
