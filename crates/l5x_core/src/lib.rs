//! Public library API for the Logix value model of L5X project data.

/// Atomic codec, value model, member tree, tag addressing and data serialization.
pub mod logix;
