//! ABI infrastructure - artifact scanning and alloy-based encoding/decoding

pub mod codec;
mod scanner;

pub use scanner::ArtifactScanner;
