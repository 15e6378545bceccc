//! Board geometry and the mine oracle

pub mod cell;
pub mod grid;
pub mod io;

pub use cell::Cell;
pub use grid::Board;
pub use io::{
    board_name, board_to_string, create_example_boards, load_board_from_file, load_boards_from_directory,
    parse_board_from_string, save_board_to_file,
};
