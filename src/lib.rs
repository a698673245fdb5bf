//! Coordinator-side core of a BN254 powers-of-tau MPC ceremony.
//!
//! This crate is the engine a controller process embeds or shells out to:
//! it knows how to turn a secret scalar and a transcript directory into the
//! next shard of a structured reference string, how to verify that shards
//! chain together correctly, and how to turn the finished SRS into the
//! signature points a range-proof system needs. It does not speak to the
//! network, does not parse CLI flags beyond the minimal surface in
//! [`driver`], and does not implement curve arithmetic itself — that is
//! [`curve`]'s job, pinned once to `ark-bn254`.

pub mod batch;
pub mod bigint;
pub mod checksum;
pub mod curve;
pub mod driver;
pub mod engine;
pub mod error;
pub mod generator_poly;
pub mod multicore;
pub mod progress;
pub mod range_eval;
pub mod range_verify;
pub mod secret;
pub mod transcript;
pub mod verifier;

pub use error::{CoreError, CoreResult};
