//! Error Types
//!
//! Fatal errors are construction-time only; everything that can happen at
//! runtime is signaled through absence (`Option`/`bool`) or a logged skip.

use thiserror::Error;

/// Errors produced while loading configuration or constructing need instances.
#[derive(Debug, Error)]
pub enum NeedsError {
    /// A need's max-to-min decay window is zero or negative, so no decay
    /// rate can be derived. The actor cannot be meaningfully simulated.
    #[error("need '{id}': minutes_from_max_to_min * decay_scalar must be > 0 (got {minutes})")]
    InvalidDecayWindow { id: String, minutes: f32 },

    /// The config named a resource kind this crate does not know.
    #[error("need '{id}': unknown need kind '{kind}'")]
    UnknownNeedKind { id: String, kind: String },

    /// A band referenced a slowdown id missing from the catalog. Bad content
    /// data that should be fixed, not silently degraded.
    #[error("need '{id}': band references unknown slowdown '{slowdown}'")]
    UnknownSlowdown { id: String, slowdown: String },

    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
