//! Engine modules: the state the board is made of.
//!
//! Both stores are plain state holders: every mutation is synchronous, total
//! and copy-on-write, so a snapshot taken before a mutation stays valid.
//!
//! # Modules
//!
//! - `placement`: cards, pick state and positions
//! - `z_order`: per (scene, subset) stacking order

pub mod placement;
pub mod z_order;
