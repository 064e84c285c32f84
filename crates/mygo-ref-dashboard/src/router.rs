//! A `SurfaceRouter` that records every requested surface.

use std::sync::{Arc, Mutex};

use tracing::info;

use mygo_contracts::agent::Surface;
use mygo_core::traits::SurfaceRouter;

/// Stands in for the page/modal router. Clones share the recorded list.
#[derive(Clone, Default)]
pub struct RecordingRouter {
    surfaces: Arc<Mutex<Vec<Surface>>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surfaces(&self) -> Vec<Surface> {
        self.surfaces
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn last(&self) -> Option<Surface> {
        self.surfaces().pop()
    }
}

impl SurfaceRouter for RecordingRouter {
    fn request_surface(&self, surface: Surface) {
        info!(surface = ?surface, "surface requested");
        let mut surfaces = self
            .surfaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        surfaces.push(surface);
    }
}
