//! egui rendering. Everything here reads and mutates [`AppState`](crate::state::AppState)
//! and holds no state of its own.

pub mod panels;
pub mod plot;
pub mod prediction;
