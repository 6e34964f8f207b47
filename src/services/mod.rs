//! Services module
//!
//! External collaborators of the conversation engine: the clinic backend and
//! the chat transport.

pub mod backend;
pub mod transport;

// Re-export commonly used services
pub use backend::{BackendService, ClinicBackend};
pub use transport::{TelegramTransport, Transport};

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::utils::errors::Result;

/// Shared services handed to every handler turn
#[derive(Clone)]
pub struct ServiceFactory {
    pub settings: Settings,
    pub backend: Arc<dyn ClinicBackend>,
}

impl ServiceFactory {
    /// Create a ServiceFactory talking to the configured HTTP backend
    pub fn new(settings: Settings) -> Result<Self> {
        let backend = BackendService::new(&settings.backend)?;
        Ok(Self::with_backend(settings, Arc::new(backend)))
    }

    /// Create a ServiceFactory around any backend implementation
    pub fn with_backend(settings: Settings, backend: Arc<dyn ClinicBackend>) -> Self {
        Self { settings, backend }
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
