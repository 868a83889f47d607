//! One-shot command-line flags handled before a console session starts.

pub mod credentials;
