use std::fmt;
use std::sync::Arc;

use epigraph_core::{Catalog, ChartCache};

use crate::slack::dispatcher::CallbackDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub charts: Arc<ChartCache>,
    pub callbacks: CallbackDispatcher,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(charts: Arc<ChartCache>, callbacks: CallbackDispatcher) -> Self {
        Self { charts, callbacks }
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        self.charts.pipeline().catalog()
    }
}
