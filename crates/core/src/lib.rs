//! Core of the ML tutor: request and result contracts, prompt rendering, the
//! generation backends, and the feature flows built on top of them.

pub mod backend;
pub mod error;
pub mod flows;
pub mod grading;
pub mod invoker;
pub mod models;
pub mod prompts;
pub mod schema;
pub mod svg;
pub mod tutor;

pub use error::{GenerationFailure, ValidationError};
pub use flows::VisualMode;
pub use invoker::{FlowInvoker, InvokerConfig};
pub use tutor::Tutor;
