/// Image source handling
///
/// This module handles:
/// - Building per-tile source chains (format negotiation and fallbacks)
/// - Decoding and downscaling images off the UI thread

pub mod loader;
pub mod sources;
