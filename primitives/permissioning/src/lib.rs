//! Types and registry traits shared by the governance pallets of a
//! permissioned network.
//!
//! The registries (organizations, accounts, nodes, votes) only expose their
//! mutating operations through the traits defined here, and only to the
//! account returned by [`ImplementationResolver`].

#![cfg_attr(not(feature = "std"), no_std)]

pub mod traits;
pub mod types;

pub use traits::*;
pub use types::*;
