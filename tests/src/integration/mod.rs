//! # Integration Scenarios
//!
//! Each scenario wires the real services through the runtime container and
//! pumps the reference relay by hand.

#[cfg(test)]
mod handshake;
#[cfg(test)]
mod idempotency;
#[cfg(test)]
mod lifecycle;
#[cfg(test)]
mod mismatch;
#[cfg(test)]
mod uniqueness;
