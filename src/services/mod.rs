pub mod exporter;
pub mod segmenter;
pub mod validator;

pub use exporter::ResultExporter;
pub use validator::AddOutcome;
