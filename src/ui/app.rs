use crate::config::AppConfig;
use crate::game::{Color as PieceColor, Game, GameStatus, MoveError, Position};
use crate::ui::terminal::{Cursor, Direction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::{debug, info};

const LIGHT_SQUARE: Color = Color::Rgb(192, 192, 192);
const DARK_SQUARE: Color = Color::Rgb(205, 133, 63);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    About,
}

pub struct App {
    pub game_state: GameState,
    pub game: Game,
    pub cursor: Cursor,
    pub should_quit: bool,
    pub menu_index: usize,
    pub command_buffer: String,
    /// Last message for the players: check, rejected commands, the rematch prompt.
    pub notice: Option<String>,
    /// The game ended (checkmate or a captured king) and the players have not answered the prompt yet.
    pub awaiting_rematch: bool,
    highlights: Vec<Position>,
    highlight_moves: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            game_state: GameState::Menu,
            game: Game::with_rules(config.rules),
            cursor: Cursor::new(),
            should_quit: false,
            menu_index: 0,
            command_buffer: String::new(),
            notice: None,
            awaiting_rematch: false,
            highlights: Vec::new(),
            highlight_moves: config.display.highlight_moves,
        }
    }

    pub fn highlights(&self) -> &[Position] {
        &self.highlights
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if let KeyCode::Char('q') = key_event.code {
            self.should_quit = true;
            return;
        }

        match self.game_state {
            GameState::Menu => self.handle_menu_key(key_event.code),
            GameState::About => {
                if matches!(key_event.code, KeyCode::Esc | KeyCode::Enter) {
                    self.game_state = GameState::Menu;
                }
            }
            GameState::Playing if self.awaiting_rematch => self.handle_rematch_key(key_event.code),
            GameState::Playing => self.handle_game_key(key_event.code),
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.menu_index = self.menu_index.saturating_sub(1),
            KeyCode::Down => self.menu_index = (self.menu_index + 1).min(1),
            KeyCode::Enter => {
                self.game_state = match self.menu_index {
                    0 => GameState::Playing,
                    1 => GameState::About,
                    _ => GameState::Menu,
                };
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_rematch_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.reset(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                info!("players declined a rematch");
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_game_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.game_state = GameState::Menu;
                // get rid of any artifacts from the previous screen
                self.command_buffer.clear();
            }
            KeyCode::Up => self.cursor.move_by(Direction::Up),
            KeyCode::Down => self.cursor.move_by(Direction::Down),
            KeyCode::Left => self.cursor.move_by(Direction::Left),
            KeyCode::Right => self.cursor.move_by(Direction::Right),
            KeyCode::Char(' ') if self.command_buffer.trim().is_empty() => {
                self.command_buffer.clear();
                self.select_square(self.cursor.position());
            }
            KeyCode::Enter => {
                if self.command_buffer.trim().is_empty() {
                    self.select_square(self.cursor.position());
                } else {
                    self.handle_command();
                }
            }
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == ' ' => {
                self.command_buffer.push(c);
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
            }
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        self.game.reset();
        self.cursor = Cursor::new();
        self.command_buffer.clear();
        self.highlights.clear();
        self.notice = None;
        self.awaiting_rematch = false;
    }

    /// One click on a square: select a piece, or move the selected one there.
    pub fn select_square(&mut self, pos: Position) {
        let moved = self.game.select_square(pos);
        self.highlights.clear();

        if moved {
            self.after_move();
        } else if self.game.is_selected() {
            if self.highlight_moves {
                self.highlights = self.game.legal_moves_for(pos);
            }
        } else {
            debug!(square = %pos, "nothing selected");
        }
    }

    /// Runs a typed `<from> <to>` command, e.g. `e2 e4`.
    pub fn handle_command(&mut self) {
        let cmd = self.command_buffer.trim().to_lowercase();
        self.command_buffer.clear();
        let parts: Vec<&str> = cmd.split_whitespace().collect();

        let [from, to] = parts.as_slice() else {
            self.notice = Some("Invalid command. Use: <from> <to> (e.g. 'e2 e4')".to_string());
            return;
        };

        let (from, to) = match (from.parse::<Position>(), to.parse::<Position>()) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(err), _) | (_, Err(err)) => {
                self.notice = Some(err.to_string());
                return;
            }
        };

        self.game.clear_selection();
        self.highlights.clear();
        match self.game.try_move(from, to) {
            Ok(_) => self.after_move(),
            Err(err) => self.notice = Some(describe_rejection(&err)),
        }
    }

    fn after_move(&mut self) {
        // moves that leave the mover's own king attacked are accepted by default,
        // so the next move can take the king outright
        let captured_king = [PieceColor::White, PieceColor::Black]
            .into_iter()
            .find(|&color| self.game.board().find_king(color).is_none());
        if let Some(loser) = captured_king {
            info!(winner = %loser.opposite(), "king captured");
            self.awaiting_rematch = true;
            self.notice = Some(format!(
                "{loser} king captured! {} wins. Would you like to play again? (y/n)",
                loser.opposite()
            ));
            return;
        }

        self.notice = match self.game.status() {
            GameStatus::Ongoing => None,
            GameStatus::Check(color) => {
                info!(%color, "check");
                Some(format!("{color} is in check!"))
            }
            GameStatus::Checkmate(color) => {
                info!(%color, "checkmate");
                self.awaiting_rematch = true;
                Some(format!(
                    "Checkmate! {} wins. Would you like to play again? (y/n)",
                    color.opposite()
                ))
            }
        };
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.game_state {
            GameState::Menu => self.draw_menu(frame),
            GameState::Playing => self.draw_game(frame),
            GameState::About => self.draw_about(frame),
        }
    }

    fn draw_menu(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Length(8), // Title height
                Constraint::Length(3), // Spacing
                Constraint::Length(4), // Menu items
                Constraint::Min(0),
            ])
            .split(area);

        let title = vec![
            Line::from("██████╗██╗  ██╗███████╗███████╗███████╗"),
            Line::from("██╔════╝██║  ██║██╔════╝██╔════╝██╔════╝"),
            Line::from("██║     ███████║█████╗  ███████╗███████╗"),
            Line::from("██║     ██╔══██║██╔══╝  ╚════██║╚════██║"),
            Line::from("╚██████╗██║  ██║███████╗███████║███████║"),
            Line::from("╚═════╝╚═╝  ╚═╝╚══════╝╚══════╝╚══════╝"),
        ];

        let title_block = Paragraph::new(title)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::NONE));

        let menu_items: Vec<Line> = ["PLAY", "ABOUT"]
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let style = if self.menu_index == idx {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled("     ► ", Style::default().fg(Color::White)),
                    Span::styled(*label, style),
                ])
            })
            .collect();

        let menu = Paragraph::new(menu_items)
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::NONE));

        let instructions = Paragraph::new("Use ↑↓ arrows to select and ENTER to confirm")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);

        frame.render_widget(title_block, layout[1]);
        frame.render_widget(menu, layout[3]);
        frame.render_widget(instructions, layout[4]);
    }

    fn square_background(&self, pos: Position) -> Color {
        if pos == self.cursor.position() {
            Color::Blue
        } else if Some(pos) == self.game.selected() {
            Color::Yellow
        } else if self.highlights.contains(&pos) {
            Color::Green
        } else if (pos.row + pos.col) % 2 == 0 {
            LIGHT_SQUARE
        } else {
            DARK_SQUARE
        }
    }

    fn board_lines(&self) -> Vec<Line<'static>> {
        let mut board_content = vec![Line::from(Span::raw("    a  b  c  d  e  f  g  h"))];

        for row in 0..8i8 {
            let mut line = vec![Span::styled(
                format!(" {} ", 8 - row),
                Style::default().fg(Color::Green),
            )];
            for col in 0..8i8 {
                let pos = Position::new(row, col);
                let piece = self.game.board().get(pos);
                let piece_char = piece.map_or(' ', |p| p.to_char());
                let fg = match piece.map(|p| p.color) {
                    Some(PieceColor::White) => Color::White,
                    Some(PieceColor::Black) => Color::Black,
                    None => Color::DarkGray,
                };
                let style = Style::default()
                    .fg(fg)
                    .bg(self.square_background(pos))
                    .add_modifier(Modifier::BOLD);
                line.push(Span::styled(format!(" {piece_char} "), style));
            }
            line.push(Span::styled(
                format!(" {}", 8 - row),
                Style::default().fg(Color::Green),
            ));
            board_content.push(Line::from(line));
        }

        board_content.push(Line::from(Span::raw("    a  b  c  d  e  f  g  h")));
        board_content
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        let player = self.game.current_player();
        let rules = self.game.rules();
        let mut lines = vec![
            Line::from(vec![
                Span::raw("To move: "),
                Span::styled(
                    player.to_string(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw("Cursor: "),
                Span::styled(
                    self.cursor.position().to_string(),
                    Style::default().fg(Color::Blue),
                ),
            ]),
            Line::from(vec![
                Span::raw("Selected: "),
                Span::styled(
                    self.game
                        .selected()
                        .map_or_else(|| "-".to_string(), |p| p.to_string()),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Line::from(format!(
                "King safety: {}",
                if rules.king_safety { "on" } else { "off" }
            )),
            Line::from(format!("Mate detection: {:?}", rules.mate_detection)),
            Line::from(""),
        ];

        if let Some(notice) = &self.notice {
            let color = if self.awaiting_rematch {
                Color::Red
            } else {
                Color::Magenta
            };
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }
        lines
    }

    fn draw_game(&self, frame: &mut Frame) {
        let area = frame.area();

        let main_layout = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(30)])
            .split(area);

        let right_layout = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Min(3),    // Status takes most space
                Constraint::Length(3), // Command input height
            ])
            .split(main_layout[1]);

        let board = Paragraph::new(self.board_lines())
            .block(Block::default().borders(Borders::ALL).title("Board"));
        frame.render_widget(board, main_layout[0]);

        let status = Paragraph::new(self.status_lines())
            .block(Block::default().borders(Borders::ALL).title("Game"))
            .style(Style::default().fg(Color::White));
        frame.render_widget(status, right_layout[0]);

        let input = Paragraph::new(format!(">> {}", self.command_buffer))
            .block(Block::default().borders(Borders::ALL).title("Command"))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(input, right_layout[1]);
    }

    fn draw_about(&self, frame: &mut Frame) {
        let area = frame.area();

        let about_text = vec![
            Line::from("Hotseat Chess"),
            Line::from("-------------------"),
            Line::from(""),
            Line::from("two players, one terminal."),
            Line::from(""),
            Line::from("Controls:"),
            Line::from("←↑↓→   - Move the cursor"),
            Line::from("ENTER  - Select a piece, then its destination"),
            Line::from("e2 e4  - Move a piece from e2 to e4"),
            Line::from("R      - Start a new game"),
            Line::from("ESC    - Return to menu"),
            Line::from("Q      - Quit game"),
            Line::from(""),
            Line::from("No castling, en passant or promotion."),
        ];

        let about_block = Paragraph::new(about_text)
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL).title("About"))
            .alignment(Alignment::Center);

        frame.render_widget(Clear, area);
        frame.render_widget(about_block, area);
    }
}

fn describe_rejection(err: &MoveError) -> String {
    match err {
        MoveError::IllegalMove { .. } | MoveError::LeavesKingInCheck { .. } => {
            format!("Invalid move: {err}")
        }
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn playing_app() -> App {
        let mut app = App::new(&AppConfig::default());
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.game_state, GameState::Playing);
        app
    }

    fn type_command(app: &mut App, command: &str) {
        for c in command.chars() {
            app.handle_key_event(KeyEvent::from(KeyCode::Char(c)));
        }
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn cursor_selection_highlights_then_moves() {
        let mut app = playing_app();
        // cursor starts on e2
        app.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.game.selected(), Some(Position::new(6, 4)));
        assert_eq!(app.highlights(), &[Position::new(5, 4), Position::new(4, 4)]);

        app.handle_key_event(KeyEvent::from(KeyCode::Up));
        app.handle_key_event(KeyEvent::from(KeyCode::Up));
        app.handle_key_event(KeyEvent::from(KeyCode::Char(' ')));
        assert!(app.highlights().is_empty());
        assert!(app.game.board().get(Position::new(4, 4)).is_some());
        assert_eq!(app.game.current_player(), PieceColor::Black);
    }

    #[test]
    fn highlighting_can_be_disabled() {
        let mut config = AppConfig::default();
        config.display.highlight_moves = false;
        let mut app = App::new(&config);
        app.select_square(Position::new(6, 4));
        assert!(app.game.is_selected());
        assert!(app.highlights().is_empty());
    }

    #[test]
    fn typed_command_moves() {
        let mut app = playing_app();
        type_command(&mut app, "e2 e4");
        assert!(app.command_buffer.is_empty());
        assert!(app.notice.is_none());
        assert_eq!(app.game.current_player(), PieceColor::Black);
    }

    #[test]
    fn bad_commands_leave_a_notice() {
        let mut app = playing_app();
        type_command(&mut app, "e2");
        assert!(app.notice.as_deref().unwrap().starts_with("Invalid command"));

        type_command(&mut app, "e2 z9");
        assert!(app.notice.as_deref().unwrap().contains("z9"));

        type_command(&mut app, "e2 e5");
        assert!(app.notice.as_deref().unwrap().starts_with("Invalid move"));
        assert_eq!(app.game.current_player(), PieceColor::White);
    }

    #[test]
    fn checkmate_prompts_for_rematch() {
        let mut app = playing_app();
        for command in ["f2 f3", "e7 e5", "g2 g4", "d8 h4"] {
            type_command(&mut app, command);
        }
        assert!(app.awaiting_rematch);
        assert!(app.notice.as_deref().unwrap().starts_with("Checkmate! Black wins"));
        assert!(screen_text(&app).contains("Checkmate!"));

        // other keys are ignored until the players answer
        app.handle_key_event(KeyEvent::from(KeyCode::Up));
        assert!(app.awaiting_rematch);

        app.handle_key_event(KeyEvent::from(KeyCode::Char('y')));
        assert!(!app.awaiting_rematch);
        assert_eq!(app.game.current_player(), PieceColor::White);
        assert_eq!(app.game.board(), &crate::game::Board::new());
    }

    #[test]
    fn capturing_a_king_ends_the_game() {
        let mut app = playing_app();
        for command in ["e2 e4", "e7 e5", "f1 c4", "b8 c6", "c4 f7"] {
            type_command(&mut app, command);
        }
        assert_eq!(app.notice.as_deref(), Some("Black is in check!"));

        // ignoring the check is allowed, so the bishop can take the king
        type_command(&mut app, "a7 a6");
        type_command(&mut app, "f7 e8");
        assert!(app.game.board().find_king(PieceColor::Black).is_none());
        assert!(app.awaiting_rematch);
        assert!(app
            .notice
            .as_deref()
            .unwrap()
            .starts_with("Black king captured! White wins"));

        app.handle_key_event(KeyEvent::from(KeyCode::Char('y')));
        assert!(!app.awaiting_rematch);
        assert_eq!(app.game.board().find_king(PieceColor::Black), Some(Position::new(0, 4)));
    }

    #[test]
    fn declining_rematch_quits() {
        let mut app = playing_app();
        for command in ["f2 f3", "e7 e5", "g2 g4", "d8 h4"] {
            type_command(&mut app, command);
        }
        app.handle_key_event(KeyEvent::from(KeyCode::Char('n')));
        assert!(app.should_quit);
    }

    #[test]
    fn check_notice() {
        use crate::game::{Board, Piece, PieceType, Rules};

        let mut board = Board::empty();
        for (kind, color, row, col) in [
            (PieceType::King, PieceColor::White, 7, 4),
            (PieceType::Rook, PieceColor::White, 7, 0),
            (PieceType::King, PieceColor::Black, 0, 4),
        ] {
            let at = Position::new(row, col);
            board.set(at, Some(Piece::new(kind, color, at)));
        }
        let mut app = playing_app();
        app.game = Game::from_board(board, PieceColor::White, Rules::default());

        app.select_square(Position::new(7, 0));
        app.select_square(Position::new(0, 0));
        assert_eq!(app.notice.as_deref(), Some("Black is in check!"));
        assert!(!app.awaiting_rematch);
    }

    #[test]
    fn renders_board_and_status() {
        let app = playing_app();
        let text = screen_text(&app);
        assert!(text.contains("To move: White"));
        assert!(text.contains('♔'));
        assert!(text.contains('♚'));
    }
}
