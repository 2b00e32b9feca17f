//! Services composed on top of the `db` repositories.
//!
//! Currently this is the board-view aggregation: the denormalized
//! board + columns + tasks structure the UI renders, and the multi-row
//! creation flow that seeds a new board with its default columns.

pub mod services;

pub use services::board_views;
