/// injected sink for non-fatal warnings
pub mod diagnostics;
/// simplelog set-up for the binary and the demos
pub mod logger;
