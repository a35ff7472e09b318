//! Variant policies, command synthesis and progress tracking

pub mod command;
pub mod loudness;
pub mod policy;
pub mod progress;

pub use command::{CommandSynthesizer, ToolPaths};
pub use policy::{ProgressKind, Variant, VariantPolicy};
pub use progress::{ElapsedProgressParser, PassProgressParser, ProgressParser, ProgressSnapshot};
