//! Streamer resolution: upstream seam, token cache, per-name resolver, batch fan-out.

pub mod aggregator;
pub mod resolver;
pub mod token;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testing;
