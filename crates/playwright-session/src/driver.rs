// Driver, context, and page contracts
//
// The session manager is generic over the automation engine. A harness
// implements these traits on top of its Playwright (or Playwright-like)
// binding and hands the manager a `DriverProvider`; the manager only ever
// talks to the trait objects.

use crate::config::{Capabilities, DriverConfig};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// A standard multi-context browser driver.
///
/// Maps onto Playwright's `Browser`: it can open any number of isolated
/// contexts and enumerate the ones currently alive.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Creates a new isolated context with the given capabilities.
    async fn new_context(&self, capabilities: &Capabilities) -> Result<Arc<dyn SessionContext>>;

    /// Returns all currently open contexts, oldest first.
    fn contexts(&self) -> Vec<Arc<dyn SessionContext>>;

    /// Closes the browser and all of its contexts.
    async fn close(&self) -> Result<()>;

    /// Downcast hook for harness code that needs the concrete driver.
    fn as_any(&self) -> &dyn Any;
}

/// An embedded-application driver (desktop app under test).
///
/// Maps onto Playwright's `ElectronApplication`: exactly one intrinsic
/// context, and a first window that may not exist yet at launch time, so
/// resolving it is asynchronous.
#[async_trait]
pub trait EmbeddedApp: Send + Sync {
    /// Returns the application's single intrinsic context.
    fn context(&self) -> Arc<dyn SessionContext>;

    /// Resolves the application's first window, waiting for it to open
    /// if necessary.
    async fn first_window(&self) -> Result<Arc<dyn SessionPage>>;

    /// Evaluates an expression inside the application's main process.
    async fn evaluate(&self, expression: &str) -> Result<Value>;

    /// Closes the application driver.
    async fn close(&self) -> Result<()>;

    /// Downcast hook for harness code that needs the concrete driver.
    fn as_any(&self) -> &dyn Any;
}

/// An isolated browsing session owned by a driver.
///
/// Carries a mutable name tag used for addressed switching; the manager tags
/// the context created by `launch_driver` as `"default"` and contexts created
/// by `launch_context` with their caller-supplied key.
#[async_trait]
pub trait SessionContext: Send + Sync {
    /// Opens a new page in this context.
    async fn new_page(&self) -> Result<Arc<dyn SessionPage>>;

    /// Returns all currently open pages, oldest first.
    fn pages(&self) -> Vec<Arc<dyn SessionPage>>;

    /// Closes this context and all of its pages.
    async fn close(&self) -> Result<()>;

    /// The context's name tag, if one was assigned.
    fn name(&self) -> Option<String>;

    /// Assigns the context's name tag.
    fn set_name(&self, name: &str);

    /// Sets the default timeout for interactions within this context.
    fn set_default_timeout(&self, timeout_ms: f64);

    /// Downcast hook for harness code that needs the concrete context.
    fn as_any(&self) -> &dyn Any;
}

/// A single tab or window within a context.
///
/// The manager only tracks page identity; all interaction methods live on
/// the harness's concrete page type, reachable through `as_any`.
pub trait SessionPage: Send + Sync {
    /// Downcast hook for harness code that needs the concrete page.
    fn as_any(&self) -> &dyn Any;
}

/// A registered driver: either a standard browser or an embedded application.
///
/// The variant is fixed at provisioning time and dispatched exhaustively,
/// so the browser/embedded-app asymmetry is handled in one place per
/// operation instead of being probed structurally.
#[derive(Clone)]
pub enum DriverHandle {
    /// Standard multi-context browser
    Standard(Arc<dyn BrowserDriver>),
    /// Single-context embedded application
    EmbeddedApp(Arc<dyn EmbeddedApp>),
}

impl DriverHandle {
    /// Returns true if this is an embedded-application driver.
    pub fn is_embedded_app(&self) -> bool {
        matches!(self, DriverHandle::EmbeddedApp(_))
    }

    /// Unified view of the driver's open contexts.
    ///
    /// For an embedded app this is always the single intrinsic context.
    pub fn contexts(&self) -> Vec<Arc<dyn SessionContext>> {
        match self {
            DriverHandle::Standard(browser) => browser.contexts(),
            DriverHandle::EmbeddedApp(app) => vec![app.context()],
        }
    }

    /// Closes the underlying driver resource.
    pub async fn close(&self) -> Result<()> {
        match self {
            DriverHandle::Standard(browser) => browser.close().await,
            DriverHandle::EmbeddedApp(app) => app.close().await,
        }
    }

    /// Identity comparison between two handles.
    pub fn same_driver(&self, other: &DriverHandle) -> bool {
        match (self, other) {
            (DriverHandle::Standard(a), DriverHandle::Standard(b)) => Arc::ptr_eq(a, b),
            (DriverHandle::EmbeddedApp(a), DriverHandle::EmbeddedApp(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for DriverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverHandle::Standard(browser) => f
                .debug_struct("DriverHandle::Standard")
                .field("contexts", &browser.contexts().len())
                .finish(),
            DriverHandle::EmbeddedApp(_) => f.debug_struct("DriverHandle::EmbeddedApp").finish(),
        }
    }
}

/// Provisions drivers on behalf of the session manager.
///
/// The implementation connects to or launches a browser process, or starts
/// an embedded application, according to `config.is_electron` and
/// `config.capabilities.launch_mode()`.
#[async_trait]
pub trait DriverProvider: Send + Sync {
    /// Obtains a new driver handle for the given configuration.
    async fn provision(&self, config: &DriverConfig) -> Result<DriverHandle>;
}
