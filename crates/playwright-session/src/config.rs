// Driver configuration
//
// Mirrors the camelCase driver section of a BDD harness config file, so a
// JSON config can be deserialized straight into `DriverConfig`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default per-action timeout applied to every freshly launched context.
pub const DEFAULT_ACTION_TIMEOUT_MS: f64 = 5_000.0;

/// Configuration for launching a driver.
///
/// All fields are optional in the serialized form; missing booleans default
/// to `false` and missing capability/timeout sections to empty defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverConfig {
    /// Provision an embedded-application driver instead of a browser
    pub is_electron: bool,

    /// Keep driver, context, and page alive across scenarios
    pub reuse_session: bool,

    /// Restart the default browser process on teardown instead of only
    /// closing its contexts
    pub restart_browser: bool,

    /// Capabilities forwarded to the driver provider and to `new_context`
    pub capabilities: Capabilities,

    /// Timeout settings
    pub timeout: Timeouts,
}

impl DriverConfig {
    /// Creates a new DriverConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision an embedded-application driver
    pub fn is_electron(mut self, enabled: bool) -> Self {
        self.is_electron = enabled;
        self
    }

    /// Keep the session alive across scenarios
    pub fn reuse_session(mut self, enabled: bool) -> Self {
        self.reuse_session = enabled;
        self
    }

    /// Restart the default browser process on teardown
    pub fn restart_browser(mut self, enabled: bool) -> Self {
        self.restart_browser = enabled;
        self
    }

    /// Set driver capabilities
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set timeout settings
    pub fn timeout(mut self, timeout: Timeouts) -> Self {
        self.timeout = timeout;
        self
    }

    /// The action timeout to apply to launched contexts, falling back to
    /// [`DEFAULT_ACTION_TIMEOUT_MS`].
    pub fn action_timeout_ms(&self) -> f64 {
        self.timeout.action.unwrap_or(DEFAULT_ACTION_TIMEOUT_MS)
    }
}

/// Driver capabilities.
///
/// Named fields cover provisioning decisions; everything else (viewport,
/// headless, recordVideo, ...) is carried opaquely in `extra` and handed to
/// the provider and to context creation untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capabilities {
    /// Browser to provision ("chromium", "firefox", "webkit")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,

    /// Connect to a running browser server over WebSocket
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws_endpoint: Option<String>,

    /// Connect to a running browser over the Chrome DevTools Protocol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdp_endpoint: Option<String>,

    /// Remaining capability fields, passed through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Capabilities {
    /// Creates a new Capabilities with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the browser name
    pub fn browser_name(mut self, name: impl Into<String>) -> Self {
        self.browser_name = Some(name.into());
        self
    }

    /// Connect to a running browser server over WebSocket
    pub fn ws_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ws_endpoint = Some(endpoint.into());
        self
    }

    /// Connect to a running browser over CDP
    pub fn cdp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.cdp_endpoint = Some(endpoint.into());
        self
    }

    /// Resolves how a provider should obtain the driver.
    ///
    /// A WebSocket endpoint wins over a CDP endpoint; with neither set the
    /// provider launches a local browser, `"chromium"` by default.
    pub fn launch_mode(&self) -> LaunchMode<'_> {
        if let Some(ws) = &self.ws_endpoint {
            LaunchMode::ConnectWs(ws)
        } else if let Some(cdp) = &self.cdp_endpoint {
            LaunchMode::ConnectCdp(cdp)
        } else {
            LaunchMode::Launch(self.browser_name.as_deref().unwrap_or("chromium"))
        }
    }
}

/// How a driver provider should obtain the underlying driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode<'a> {
    /// Launch a local browser of the given name
    Launch(&'a str),
    /// Connect to a browser server over WebSocket
    ConnectWs(&'a str),
    /// Connect over the Chrome DevTools Protocol
    ConnectCdp(&'a str),
}

/// Timeout settings, in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeouts {
    /// Default timeout for page interactions within a context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<f64>,
}

impl Timeouts {
    /// Set the action timeout in milliseconds
    pub fn action(mut self, ms: f64) -> Self {
        self.action = Some(ms);
        self
    }
}

/// Options controlling per-scenario teardown.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeardownOptions {
    /// Keep all drivers, contexts, and pages alive for the next scenario
    pub reuse_session: bool,

    /// Close the default browser process too, instead of only its contexts
    pub restart_browser: bool,
}

impl TeardownOptions {
    /// Creates a new TeardownOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the session alive for the next scenario
    pub fn reuse_session(mut self, enabled: bool) -> Self {
        self.reuse_session = enabled;
        self
    }

    /// Close the default browser process too
    pub fn restart_browser(mut self, enabled: bool) -> Self {
        self.restart_browser = enabled;
        self
    }
}
