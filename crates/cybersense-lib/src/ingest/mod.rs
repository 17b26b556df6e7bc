pub mod chunker;
pub mod extract;
pub mod pipeline;
