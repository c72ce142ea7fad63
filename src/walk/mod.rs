//! Random-walk machinery.
//!
//! One experiment round is one "instance" of the network: every node gets a
//! fresh random routing table ([`routing`]), and walks traverse the pairing
//! those tables define ([`engine`]).

pub mod engine;
pub mod routing;

pub use engine::{escape_walk, tail_walk, Tail, WalkError};
pub use routing::{RoutingTable, RoutingTables};
