use std::fmt::Write;

use colored::Colorize;

use crate::difficulty::GameDifficulty;
use crate::engine::RunState;

pub const HELP_LINE: &str = "arrows: steer  g/h: grid on/off  1-3: easy/medium/hard  esc/q: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Empty,
    SnakeHead,
    SnakeBody,
    Apple,
}

pub fn clear_screen() -> String {
    format!("{}[2J{}[1;1H", 27 as char, 27 as char)
}

/// Draws one frame: bordered board, score line and key help.
pub fn render_board(state: &RunState, show_grid: bool, selected: GameDifficulty) -> String {
    let grid = &state.grid;
    let columns = grid.columns() as usize;
    let mut board = vec![vec![Tile::Empty; columns]; grid.rows() as usize];
    if let Some((x, y)) = grid.cell_of(&state.apple) {
        board[y as usize][x as usize] = Tile::Apple;
    }
    // tail first so the head wins when segments overlap
    for (i, segment) in state.snake.iter().enumerate().rev() {
        if let Some((x, y)) = grid.cell_of(segment) {
            board[y as usize][x as usize] = if i == 0 {
                Tile::SnakeHead
            } else {
                Tile::SnakeBody
            };
        }
    }

    let mut out = String::new();
    //border up
    let _ = writeln!(out, "▗{}▖", "▄▄".repeat(columns));
    for row in &board {
        //border left
        out.push('▐');
        for tile in row {
            let cell = match tile {
                Tile::Empty if show_grid => "· ".dimmed().to_string(),
                Tile::Empty => "  ".to_string(),
                Tile::SnakeHead => "Ӫ ".yellow().to_string(),
                Tile::SnakeBody => "⏺ ".green().to_string(),
                Tile::Apple => "♦ ".red().to_string(),
            };
            out.push_str(&cell);
        }
        //border right
        out.push_str("▌\n");
    }
    //border down
    let _ = writeln!(out, "▝{}▘", "▀▀".repeat(columns));

    let _ = writeln!(
        out,
        "Score: {}   Difficulty: {}   Speed: {}ms",
        state.score, state.difficulty, state.tick_delay_ms
    );
    if selected != state.difficulty {
        let _ = writeln!(out, "Next game: {}", selected);
    }
    let _ = writeln!(out, "{}", HELP_LINE);
    out
}

pub fn render_final_screen(state: &RunState, selected: GameDifficulty) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Game Over!".red().bold());
    let _ = writeln!(out, "Your final score is {}", state.score);
    let _ = writeln!(
        out,
        "Press Enter to play again on {}, 1-3 to change difficulty, Esc to quit",
        selected
    );
    out
}

pub fn render_exit_confirmation() -> String {
    "Are you sure you want to exit the Game? (y/n)\n".to_string()
}
