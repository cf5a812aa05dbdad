//! Dataset Preprocessing Pipeline

pub mod cancel;
pub mod discovery;
pub mod output;
pub mod pipeline;

pub use cancel::CancelFlag;
pub use discovery::{DiscoveredFile, discover_files};
pub use output::{check_output_dir_available, create_output_dir, output_dir_name};
pub use pipeline::{Preprocessor, RunSummary, StageReport};
