//! Application state shared across handlers.

use std::sync::Arc;

use url::Url;

use shopverse_core::ProductId;
use shopverse_core::catalog::Catalog;
use shopverse_core::viewer::{ModelLibrary, NullXrRuntime, XrRuntime};

use crate::config::StorefrontConfig;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid base_url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, the model library, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    base_url: Url,
    catalog: Catalog,
    models: ModelLibrary,
    xr: Arc<dyn XrRuntime>,
}

impl AppState {
    /// Create application state with the default (unsupported) XR runtime.
    ///
    /// The server itself has no immersive display; AR endpoints report the
    /// runtime's capability to the client.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        Self::with_xr(config, Arc::new(NullXrRuntime))
    }

    /// Create application state with a caller-supplied XR runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn with_xr(
        config: StorefrontConfig,
        xr: Arc<dyn XrRuntime>,
    ) -> Result<Self, StateError> {
        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                base_url,
                catalog: Catalog::demo(),
                models: ModelLibrary::new(),
                xr,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the 3D model library.
    #[must_use]
    pub fn models(&self) -> &ModelLibrary {
        &self.inner.models
    }

    /// Get a reference to the XR runtime.
    #[must_use]
    pub fn xr(&self) -> &dyn XrRuntime {
        self.inner.xr.as_ref()
    }

    /// Absolute URL for sharing a product's AR experience.
    #[must_use]
    pub fn share_url(&self, id: ProductId) -> String {
        let mut url = self.inner.base_url.clone();
        url.set_path(&format!("/viewer/{id}"));
        url.to_string()
    }
}
