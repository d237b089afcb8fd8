//! Verification orchestration.
//!
//! Drives the pipeline over a batch of notes: discovery, per-note
//! inspection (signatures, lambda block, purity, stub synthesis), the
//! purity gate, and one checker run over every stub module.

pub mod verifier;

#[cfg(test)]
mod tests;
