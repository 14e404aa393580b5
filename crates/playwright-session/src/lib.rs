//! playwright-session: multi-driver session management for browser e2e tests
//!
//! This crate provides the session-lifecycle layer of a BDD browser-testing
//! harness: a registry of named driver instances (standard browsers and
//! embedded desktop applications), the currently active driver/context/page,
//! and ordered transitions between them — launch, switch, close, per-scenario
//! teardown, and full shutdown — including a session-reuse mode that keeps
//! browser state alive across scenarios.
//!
//! The crate does not talk to any browser itself. A harness implements the
//! [`BrowserDriver`] / [`EmbeddedApp`] / [`SessionContext`] / [`SessionPage`]
//! traits over its automation binding and supplies a [`DriverProvider`];
//! step definitions then read the active page from the [`SessionManager`].
//!
//! # Example
//!
//! ```ignore
//! use playwright_session::{
//!     Capabilities, DriverConfig, SessionManager, TeardownOptions, Timeouts,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // `PlaywrightProvider` implements `DriverProvider` over a real binding
//!     let mut session = SessionManager::new(Arc::new(PlaywrightProvider::new()));
//!
//!     let config = DriverConfig::new()
//!         .capabilities(Capabilities::new().browser_name("chromium"))
//!         .timeout(Timeouts::default().action(10_000.0));
//!
//!     // Scenario: drive two isolated sessions side by side
//!     session.launch_driver("default", &config).await?;
//!     session.launch_context("admin", &Capabilities::new()).await?;
//!     session.switch_context("default").await?;
//!
//!     // Between scenarios: keep the browser process, drop its state
//!     session.teardown(&TeardownOptions::new()).await?;
//!
//!     // End of run
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod manager;

pub use config::{
    Capabilities, DriverConfig, LaunchMode, TeardownOptions, Timeouts, DEFAULT_ACTION_TIMEOUT_MS,
};
pub use driver::{
    BrowserDriver, DriverHandle, DriverProvider, EmbeddedApp, SessionContext, SessionPage,
};
pub use error::{Error, Result};
pub use manager::{SessionManager, DEFAULT_DRIVER_KEY};
