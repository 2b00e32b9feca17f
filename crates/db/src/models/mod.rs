pub mod board;
pub mod board_column;
pub mod task;

pub use board::{
    Board, BoardError, BoardRepository, CreateBoardData, DEFAULT_BOARD_COLOR, UpdateBoardData,
};
pub use board_column::{BoardColumn, ColumnError, ColumnRepository, CreateColumnData};
pub use task::{CreateTaskData, Task, TaskError, TaskRepository};
