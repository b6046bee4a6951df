pub mod analysis;
pub mod file_item;
pub mod session;

pub use analysis::{AnalysisMetadata, AnalysisResult};
pub use file_item::{load_candidate_files, FileItem};
pub use session::{SessionState, StatusKind, StatusMessage};
