//! torero CLI integration.
//!
//! Wraps the external `torero` executable: spawning it with a bounded
//! timeout, decoding its `--raw` JSON output, and mapping that output into
//! typed records.

pub mod executor;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_support;
