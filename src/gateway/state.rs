use std::sync::Arc;

use crate::completion::CompletionClient;
use crate::grading::GradingService;
use crate::store::SurveyStore;

pub struct HandlerState<C, S> {
    pub service: Arc<GradingService<C, S>>,
}

impl<C, S> Clone for HandlerState<C, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<C, S> HandlerState<C, S>
where
    C: CompletionClient + 'static,
    S: SurveyStore + 'static,
{
    pub fn new(service: GradingService<C, S>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Admin operations bypass the grading path and go straight to the store.
    pub fn store(&self) -> &S {
        self.service.store()
    }
}
