//! Part builders
//!
//! Each builder creates a fresh [`Part`](crate::part::Part) from resolved
//! [`Dimensions`](crate::dimensions::Dimensions). Builders are deterministic:
//! the same dimensions always give the same solid and registry.

mod table;
mod wall_shelf;

pub use table::{face_frame, leg, rear_panel, side_panel, table_top};
pub use wall_shelf::{
    shelf_board, shelf_bracket, wall_frame_horizontal_board, wall_frame_vertical_board,
};

/// Tag of the front loop of the `index`-th drawer opening (1-based)
pub fn drawer_tag(index: usize) -> String {
    format!("drawer_{}", index)
}
