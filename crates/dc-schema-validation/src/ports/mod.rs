//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that the forging loop and the network layer
//!   call before trusting a structure
//!
//! There are no outbound ports: validation never reaches out of process.

pub mod inbound;
