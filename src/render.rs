//! Chart instance bookkeeping for rendering front-ends.
//!
//! A canvas holds at most one live chart. Binding a new chart to a canvas
//! destroys the previous instance first, otherwise both render on top of each
//! other and the old one is never released.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

/// Delay before the single retry when a canvas is not in the page yet.
pub const CANVAS_RETRY_DELAY: Duration = Duration::from_millis(300);

/// A live chart instance owned by the rendering library.
pub trait ChartHandle {
    fn destroy(&mut self);
}

/// Finds the drawing surface for a canvas id, if it exists yet.
pub trait CanvasLookup {
    type Canvas;

    fn find(&self, canvas_id: &str) -> Option<Self::Canvas>;
}

pub struct ChartRegistry<H: ChartHandle> {
    mounted: HashMap<String, H>,
}

impl<H: ChartHandle> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ChartHandle> ChartRegistry<H> {
    pub fn new() -> Self {
        Self {
            mounted: HashMap::new(),
        }
    }

    /// Bind `handle` to `canvas_id`, destroying whatever was bound there.
    pub fn mount(&mut self, canvas_id: impl Into<String>, handle: H) {
        let canvas_id = canvas_id.into();
        if let Some(mut prior) = self.mounted.remove(&canvas_id) {
            prior.destroy();
        }
        self.mounted.insert(canvas_id, handle);
    }

    pub fn unmount(&mut self, canvas_id: &str) -> bool {
        match self.mounted.remove(canvas_id) {
            Some(mut handle) => {
                handle.destroy();
                true
            }
            None => false,
        }
    }

    pub fn is_mounted(&self, canvas_id: &str) -> bool {
        self.mounted.contains_key(canvas_id)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    pub fn clear(&mut self) {
        for (_, mut handle) in self.mounted.drain() {
            handle.destroy();
        }
    }
}

impl<H: ChartHandle> Drop for ChartRegistry<H> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Build and mount a chart once its canvas exists. A missing canvas is looked
/// up once more after `retry_delay` (normally [`CANVAS_RETRY_DELAY`]); if it
/// is still missing the update is dropped. Returns whether a chart was mounted.
pub async fn mount_when_ready<L, H, F>(
    registry: &mut ChartRegistry<H>,
    lookup: &L,
    canvas_id: &str,
    retry_delay: Duration,
    build: F,
) -> bool
where
    L: CanvasLookup,
    H: ChartHandle,
    F: FnOnce(L::Canvas) -> H,
{
    let canvas = match lookup.find(canvas_id) {
        Some(canvas) => canvas,
        None => {
            tokio::time::sleep(retry_delay).await;
            match lookup.find(canvas_id) {
                Some(canvas) => canvas,
                None => {
                    debug!(canvas_id, "Canvas still missing after retry, skipping chart update");
                    return false;
                }
            }
        }
    };

    registry.mount(canvas_id, build(canvas));
    true
}
