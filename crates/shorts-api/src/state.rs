//! Application state.

use std::sync::Arc;

use shorts_ai::{SpeechModel, VoiceCatalog};
use shorts_queue::JobTracker;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub tracker: JobTracker,
    pub voices: Arc<VoiceCatalog>,
}

impl AppState {
    pub fn new(config: ApiConfig, tracker: JobTracker, voices: Arc<VoiceCatalog>) -> Self {
        Self {
            config,
            tracker,
            voices,
        }
    }

    /// Speech engine behind the voice catalog.
    pub fn speech(&self) -> &Arc<dyn SpeechModel> {
        self.voices.speech()
    }
}
