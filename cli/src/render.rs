use std::fmt;

use anyhow::Result;
use serde::Serialize;
use vimsweep_core::*;

const TITLE: &str = "MiNeSwEePeR";

fn cell_str(view: CellView) -> String {
    match view {
        CellView::Hidden => "[ ]".to_string(),
        CellView::Flagged => "[x]".to_string(),
        CellView::IncorrectFlag => "[!]".to_string(),
        CellView::Swept(CellValue::Blank) => "   ".to_string(),
        CellView::Swept(CellValue::Number(count)) => format!(" {count} "),
        CellView::Swept(CellValue::Mine) | CellView::Exploded => " # ".to_string(),
        CellView::Mine => " * ".to_string(),
    }
}

/// Plain text board: title and clock, one row per line, then a status line.
pub struct Text<'a>(pub &'a Session);

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        let board = session.board();
        let width = usize::from(board.width()) * 3;

        let clock = format!("{:03}", session.elapsed().as_secs());
        writeln!(f, "{TITLE}{clock:>pad$}", pad = width.saturating_sub(TITLE.len()).max(4))?;
        for y in 0..board.height() {
            for x in 0..board.width() {
                f.write_str(&cell_str(session.view_at((x, y))))?;
            }
            writeln!(f)?;
        }

        let message = match session.status() {
            Status::InProgress => "In progress",
            Status::Won => "You win!",
            Status::Lost => "Game Over",
            Status::Quit => "Quit",
        };
        writeln!(
            f,
            "{message} (mines left: {}, cursor: {:?})",
            session.mines_left(),
            session.cursor()
        )
    }
}

#[derive(Serialize)]
struct Report<'a> {
    status: Status,
    config: GameConfig,
    seed: Option<u64>,
    cursor: Coord2,
    elapsed_ms: u128,
    mines_left: i32,
    board: &'a Board,
}

pub fn json(session: &Session) -> Result<String> {
    let report = Report {
        status: session.status(),
        config: session.board().config(),
        seed: session.seed(),
        cursor: session.cursor(),
        elapsed_ms: session.elapsed().as_millis(),
        mines_left: session.mines_left(),
        board: session.board(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_board_shows_mines() {
        let board = Board::from_mine_coords((3, 1), &[(0, 0), (2, 0)]).unwrap();
        let mut session = Session::from_board(board);
        session
            .apply(&Token::Motion {
                motion: Motion::LineEnd,
                count: None,
            })
            .unwrap();
        session.apply(&Token::Sweep { count: None }).unwrap();

        let rendered = Text(&session).to_string();
        let rows: Vec<_> = rendered.lines().collect();
        assert_eq!(rows[1], " * [ ] # ");
        assert_eq!(rows[2], "Game Over (mines left: 2, cursor: (2, 0))");
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn text_header_pads_clock_to_board_width() {
        let board = Board::from_mine_coords((10, 1), &[(0, 0)]).unwrap();
        let session = Session::from_board(board);

        let rendered = Text(&session).to_string();
        let header = rendered.lines().next().unwrap();
        assert_eq!(header, format!("{TITLE}{:>19}", "000"));
        assert!(rendered.ends_with("In progress (mines left: 1, cursor: (0, 0))\n"));
    }

    #[test]
    fn json_report_has_status() {
        let board = Board::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let session = Session::from_board(board);

        let report: serde_json::Value = serde_json::from_str(&json(&session).unwrap()).unwrap();
        assert_eq!(report["status"], "InProgress");
        assert_eq!(report["mines_left"], 1);
        assert_eq!(report["config"]["size"], serde_json::json!([2, 2]));
        assert_eq!(report["config"]["mines"], 1);
    }
}
