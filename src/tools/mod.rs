// Capabilities consumed by the pipeline
pub mod generate;
pub mod render;

// Pipeline stages
pub mod extract;
pub mod infer;
pub mod paginate;
