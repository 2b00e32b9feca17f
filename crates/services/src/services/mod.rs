pub mod board_views;

pub use board_views::{
    BoardStore, BoardView, BoardViewError, BoardViews, ColumnWithTasks, MockBoardStore, NewBoard,
    PgBoardStore, StoreError,
};
