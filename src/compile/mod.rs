//! Compilation of stated axiom graphs into the classifier model

mod cancel;
mod corpus;
mod definition;
mod error;
mod incremental;
mod progress;
mod walker;

pub use cancel::CancellationToken;
pub use corpus::{CorpusCompiler, Statistics};
pub use definition::DefinitionCompiler;
pub use error::{CompileError, CompileResult};
pub use incremental::IncrementalCompiler;
pub use progress::{Alert, AlertKind, AlertSink, CollectedAlerts, LogAlerts, LogProgress, ProgressSink};
pub use walker::GraphWalker;
