//! Reasoner seam: the classifier trait, a told-subsumption classifier and
//! the async adapter driving them

mod adapter;
mod classifier;
mod told;

pub use adapter::ReasonerAdapter;
pub use classifier::{Classifier, ReasonerError, ReasonerResult};
pub use told::ToldClassifier;
