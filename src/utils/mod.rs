//! Request helpers shared by the middleware layers.
//!
//! - [`host`] - hostname and scheme extraction from HTTP requests

pub mod host;
