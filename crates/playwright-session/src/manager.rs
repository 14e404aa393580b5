// Session manager
//
// Single source of truth for which driver/context/page is currently active,
// and for ordered lifecycle transitions between them. One instance per
// test-run worker; callers await each operation to completion before issuing
// the next (standard BDD step discipline), so no internal locking is needed.

use crate::config::{Capabilities, DriverConfig, TeardownOptions};
use crate::driver::{DriverHandle, DriverProvider, SessionContext, SessionPage};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry key of the distinguished default driver.
pub const DEFAULT_DRIVER_KEY: &str = "default";

/// Expression evaluated in an embedded application's main process to make it
/// exit during teardown. Closing the driver connection alone would leave the
/// app process running.
const EMBEDDED_APP_EXIT: &str = "({ app }) => app.exit(0)";

/// Tracks named driver instances and the active driver/context/page.
///
/// Drivers are registered under string keys by [`launch_driver`], `"default"`
/// being distinguished: it survives per-scenario teardown (unless
/// `restart_browser` is requested) and is the fallback target whenever the
/// active driver goes away.
///
/// # Example
///
/// ```ignore
/// use playwright_session::{DriverConfig, SessionManager, TeardownOptions};
///
/// let mut session = SessionManager::new(provider);
///
/// // One browser per scenario, cleaned up between scenarios
/// session.launch_driver("default", &DriverConfig::new()).await?;
/// let page = session.page().unwrap();
/// // ... run steps against `page` ...
/// session.teardown(&TeardownOptions::new()).await?;
/// ```
///
/// [`launch_driver`]: SessionManager::launch_driver
pub struct SessionManager {
    provider: Arc<dyn DriverProvider>,
    drivers: HashMap<String, DriverHandle>,
    driver: Option<DriverHandle>,
    context: Option<Arc<dyn SessionContext>>,
    page: Option<Arc<dyn SessionPage>>,
}

impl SessionManager {
    /// Creates a manager that obtains drivers from the given provider.
    pub fn new(provider: Arc<dyn DriverProvider>) -> Self {
        Self {
            provider,
            drivers: HashMap::new(),
            driver: None,
            context: None,
            page: None,
        }
    }

    /// The currently active driver, if any driver has been launched.
    pub fn driver(&self) -> Option<&DriverHandle> {
        self.driver.as_ref()
    }

    /// The currently active context.
    pub fn context(&self) -> Option<&Arc<dyn SessionContext>> {
        self.context.as_ref()
    }

    /// The currently active page.
    pub fn page(&self) -> Option<&Arc<dyn SessionPage>> {
        self.page.as_ref()
    }

    /// Read-only view of the driver registry.
    pub fn drivers(&self) -> &HashMap<String, DriverHandle> {
        &self.drivers
    }

    /// Launches (or reuses) a driver and makes it active.
    ///
    /// Launching under `"default"` when a default driver is already
    /// registered reuses that driver instead of provisioning a new one; this
    /// is the session-reuse fast path. Any other key always provisions.
    ///
    /// For a standard browser a fresh context and page are created, unless
    /// `config.reuse_session` is set and the browser already has a context,
    /// in which case its first context and page are reused. For an embedded
    /// application the intrinsic context and the (awaited) first window
    /// become active.
    ///
    /// The resulting context is tagged `"default"` and gets the configured
    /// action timeout.
    pub async fn launch_driver(&mut self, key: &str, config: &DriverConfig) -> Result<()> {
        let handle = match self.drivers.get(DEFAULT_DRIVER_KEY) {
            Some(default) if key == DEFAULT_DRIVER_KEY => default.clone(),
            _ => {
                tracing::debug!(key, is_electron = config.is_electron, "provisioning driver");
                self.provider.provision(config).await?
            }
        };
        self.drivers.insert(key.to_string(), handle.clone());

        let (context, page) = match &handle {
            DriverHandle::EmbeddedApp(app) => {
                let context = app.context();
                let page = app.first_window().await?;
                (context, page)
            }
            DriverHandle::Standard(browser) => {
                let context = match browser.contexts().into_iter().next() {
                    Some(existing) if config.reuse_session => existing,
                    _ => browser.new_context(&config.capabilities).await?,
                };
                let page = match context.pages().into_iter().next() {
                    Some(existing) if config.reuse_session => existing,
                    _ => context.new_page().await?,
                };
                (context, page)
            }
        };

        context.set_name(DEFAULT_DRIVER_KEY);
        context.set_default_timeout(config.action_timeout_ms());

        self.driver = Some(handle);
        self.context = Some(context);
        self.page = Some(page);
        Ok(())
    }

    /// Creates a named context under the active driver and makes it active,
    /// along with its first page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveDriver`] if no driver has been launched yet.
    pub async fn launch_context(&mut self, key: &str, capabilities: &Capabilities) -> Result<()> {
        let handle = self.driver.clone().ok_or(Error::NoActiveDriver)?;
        tracing::debug!(key, "launching context");
        let context = match &handle {
            DriverHandle::Standard(browser) => browser.new_context(capabilities).await?,
            DriverHandle::EmbeddedApp(_) => return Err(Error::EmbeddedAppContexts),
        };
        context.set_name(key);
        let page = context.new_page().await?;
        self.context = Some(context);
        self.page = Some(page);
        Ok(())
    }

    /// Makes the driver registered under `key` active, resetting the active
    /// context and page to that driver's defaults.
    pub async fn switch_driver(&mut self, key: &str) -> Result<()> {
        let handle = self
            .drivers
            .get(key)
            .cloned()
            .ok_or_else(|| Error::DriverNotFound {
                key: key.to_string(),
            })?;
        tracing::debug!(key, "switching driver");
        let context = Self::default_context(&handle)?;
        let page = Self::first_page(&handle, &context).await?;
        self.driver = Some(handle);
        self.context = Some(context);
        self.page = Some(page);
        Ok(())
    }

    /// Makes the active driver's context named `key` active, along with its
    /// first page.
    pub async fn switch_context(&mut self, key: &str) -> Result<()> {
        let context = self.find_context(key)?;
        tracing::debug!(key, "switching context");
        let handle = self.driver.clone().ok_or(Error::NoActiveDriver)?;
        let page = Self::first_page(&handle, &context).await?;
        self.context = Some(context);
        self.page = Some(page);
        Ok(())
    }

    /// Closes the active driver's context named `key`.
    ///
    /// If the closed context was the active one, the active driver's default
    /// context and its first page become active instead.
    pub async fn close_context(&mut self, key: &str) -> Result<()> {
        let context = self.find_context(key)?;
        tracing::debug!(key, "closing context");
        context.close().await?;
        let was_active = self
            .context
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, &context));
        if was_active {
            let handle = self.driver.clone().ok_or(Error::NoActiveDriver)?;
            let fallback = Self::default_context(&handle)?;
            let page = Self::first_page(&handle, &fallback).await?;
            self.context = Some(fallback);
            self.page = Some(page);
        }
        Ok(())
    }

    /// Closes the driver registered under `key` and removes it from the
    /// registry.
    ///
    /// If it was the active driver, the `"default"` driver (when still
    /// registered) becomes active with its default context and first page;
    /// otherwise all active pointers are cleared.
    pub async fn close_driver(&mut self, key: &str) -> Result<()> {
        let handle = self
            .drivers
            .get(key)
            .cloned()
            .ok_or_else(|| Error::DriverNotFound {
                key: key.to_string(),
            })?;
        tracing::debug!(key, "closing driver");
        handle.close().await?;
        self.drivers.remove(key);

        let was_active = self
            .driver
            .as_ref()
            .is_some_and(|active| active.same_driver(&handle));
        if was_active {
            match self.drivers.get(DEFAULT_DRIVER_KEY).cloned() {
                Some(default) => {
                    let context = Self::default_context(&default)?;
                    let page = Self::first_page(&default, &context).await?;
                    self.driver = Some(default);
                    self.context = Some(context);
                    self.page = Some(page);
                }
                None => {
                    self.driver = None;
                    self.context = None;
                    self.page = None;
                }
            }
        }
        Ok(())
    }

    /// Returns the session to its between-scenarios state.
    ///
    /// With `reuse_session` every driver, context, and page survives and the
    /// default driver simply becomes active again. Otherwise embedded
    /// applications are exited and deregistered, non-default browsers are
    /// closed and deregistered, and the default browser has its contexts
    /// closed while the process stays alive for the next scenario. Setting
    /// `restart_browser` closes and deregisters the default browser too.
    pub async fn teardown(&mut self, options: &TeardownOptions) -> Result<()> {
        tracing::debug!(
            reuse_session = options.reuse_session,
            restart_browser = options.restart_browser,
            "teardown"
        );
        if options.reuse_session {
            self.driver = self.drivers.get(DEFAULT_DRIVER_KEY).cloned();
            return Ok(());
        }

        let keys: Vec<String> = self.drivers.keys().cloned().collect();
        for key in keys {
            let handle = match self.drivers.get(&key) {
                Some(handle) => handle.clone(),
                None => continue,
            };
            match &handle {
                DriverHandle::EmbeddedApp(app) => {
                    app.evaluate(EMBEDDED_APP_EXIT).await?;
                    self.drivers.remove(&key);
                }
                DriverHandle::Standard(browser) => {
                    if key != DEFAULT_DRIVER_KEY || options.restart_browser {
                        browser.close().await?;
                        self.drivers.remove(&key);
                    } else {
                        for context in browser.contexts() {
                            context.close().await?;
                        }
                    }
                }
            }
        }

        // Whatever survived under "default" is the next scenario's starting
        // driver; the old context/page pointers refer to closed objects.
        self.driver = self.drivers.get(DEFAULT_DRIVER_KEY).cloned();
        self.context = None;
        self.page = None;
        Ok(())
    }

    /// Closes every registered driver and clears the registry. Called once
    /// at full test-run shutdown.
    pub async fn close(&mut self) -> Result<()> {
        tracing::debug!(drivers = self.drivers.len(), "closing all drivers");
        let keys: Vec<String> = self.drivers.keys().cloned().collect();
        for key in keys {
            let handle = match self.drivers.get(&key) {
                Some(handle) => handle.clone(),
                None => continue,
            };
            match &handle {
                DriverHandle::EmbeddedApp(app) => {
                    app.evaluate(EMBEDDED_APP_EXIT).await?;
                }
                DriverHandle::Standard(browser) => {
                    browser.close().await?;
                }
            }
            self.drivers.remove(&key);
        }
        self.driver = None;
        self.context = None;
        self.page = None;
        Ok(())
    }

    /// Finds a context by name tag among the active driver's open contexts.
    fn find_context(&self, key: &str) -> Result<Arc<dyn SessionContext>> {
        self.driver
            .as_ref()
            .map(|handle| handle.contexts())
            .unwrap_or_default()
            .into_iter()
            .find(|context| context.name().as_deref() == Some(key))
            .ok_or_else(|| Error::ContextNotFound {
                name: key.to_string(),
            })
    }

    /// Resolves a driver's default context: the intrinsic context for an
    /// embedded app, the first open context otherwise.
    fn default_context(handle: &DriverHandle) -> Result<Arc<dyn SessionContext>> {
        handle
            .contexts()
            .into_iter()
            .next()
            .ok_or(Error::NoOpenContexts)
    }

    /// Resolves the first page for a driver/context pair: the awaited first
    /// window for an embedded app, the context's first open page otherwise.
    async fn first_page(
        handle: &DriverHandle,
        context: &Arc<dyn SessionContext>,
    ) -> Result<Arc<dyn SessionPage>> {
        match handle {
            DriverHandle::EmbeddedApp(app) => app.first_window().await,
            DriverHandle::Standard(_) => context
                .pages()
                .into_iter()
                .next()
                .ok_or(Error::NoOpenPages),
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("drivers", &self.drivers.keys().collect::<Vec<_>>())
            .field("has_active_driver", &self.driver.is_some())
            .finish()
    }
}

// SessionManager testing lives in tests/session_lifecycle.rs, which drives
// the full lifecycle against mock drivers implementing the driver traits.
