//! Access to compiled contract artifacts.
//!
//! Artifacts are produced by the Solidity toolchain (Hardhat or Foundry) and
//! are not checked into this repository. They are looked up by contract name
//! at runtime, the same way `hardhat` resolves `deployContract("Name", ..)`.

pub mod artifact;

pub use artifact::{Artifact, ArtifactError};

/// Name of the whitelist contract deployed by this workspace.
pub const DYNAMIC_WHITELIST: &str = "DynamicWhitelist";
