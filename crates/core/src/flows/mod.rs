//! Feature flows.
//!
//! Every flow has the same shape: render the prompt for an already validated
//! request, hand it to the `FlowInvoker`, and return the typed result. Flows
//! hold no state between calls.

pub mod code;
pub mod concept;
pub mod learning_path;
pub mod quiz;
pub mod visual;

pub use code::generate_code_snippet;
pub use concept::explain_concept;
pub use learning_path::generate_learning_path;
pub use quiz::generate_adaptive_quiz;
pub use visual::{VisualMode, generate_visual_explanation};

#[cfg(test)]
pub(crate) mod testing {
    use crate::backend::MockGenerationBackend;
    use crate::invoker::{FlowInvoker, InvokerConfig};
    use std::sync::Arc;

    pub fn invoker(mock: MockGenerationBackend) -> FlowInvoker {
        FlowInvoker::new(Arc::new(mock), InvokerConfig::default())
    }
}
