mod view;

use anyhow::Result;
use blockpad_config::Config;
use blockpad_engine::{
    BlockDocument, BlockKind, CaretRequest, IoError, Key, KeyInput, PastePayload, PendingFocus,
    io,
};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    cell::Cell,
    env,
    fs::{File, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    rc::Rc,
};

struct App {
    document: BlockDocument,
    document_path: PathBuf,
    autosave: bool,
    /// Set by the document observer whenever the blocks change
    dirty: Rc<Cell<bool>>,
    focused: usize,
    caret: usize,
    pending_focus: PendingFocus,
    status: String,
}

impl App {
    fn new(document_path: PathBuf, autosave: bool) -> Result<Self> {
        let mut document = match io::read_document(&document_path) {
            Ok(document) => document,
            Err(IoError::NotFound(_)) => {
                log::info!("Starting new document at {}", document_path.display());
                BlockDocument::new()
            }
            Err(e) => return Err(e.into()),
        };

        let dirty = Rc::new(Cell::new(false));
        let observer_flag = Rc::clone(&dirty);
        document.subscribe(move |snapshot| {
            log::debug!("Document now at version {}", snapshot.version);
            observer_flag.set(true);
        });

        let mut app = Self {
            document,
            document_path,
            autosave,
            dirty,
            focused: 0,
            caret: 0,
            pending_focus: PendingFocus::new(),
            status: String::new(),
        };
        app.pending_focus.request(CaretRequest::end_of(0));
        Ok(app)
    }

    /// Queue focus for after the next render
    fn request_focus(&mut self, caret: Option<CaretRequest>) {
        if let Some(caret) = caret {
            self.pending_focus.request(caret);
        }
    }

    /// Move focus once the target block has been drawn
    fn apply_pending_focus(&mut self, rendered_blocks: usize) {
        if let Some(request) = self.pending_focus.take_ready(rendered_blocks) {
            let unit_len = self.document.unit_len(request.block_index).unwrap_or(0);
            self.focused = request.block_index;
            self.caret = request.resolve_offset(unit_len);
        }
    }

    fn focused_unit_len(&self) -> usize {
        self.document.unit_len(self.focused).unwrap_or(0)
    }

    fn handle_enter(&mut self, shift: bool) {
        let mut input = KeyInput::new(Key::Enter);
        input.modifiers.shift = shift;
        let outcome = self.document.handle_key(self.focused, self.caret, &input);
        if outcome.prevent_default() {
            self.request_focus(outcome.caret);
        } else {
            // Soft line break
            let caret = self.document.insert_text(self.focused, self.caret, "\n");
            self.request_focus(caret);
        }
    }

    fn handle_backspace(&mut self) {
        let input = KeyInput::new(Key::Backspace);
        let outcome = self.document.handle_key(self.focused, self.caret, &input);
        if outcome.prevent_default() {
            self.request_focus(outcome.caret);
        } else {
            let caret = self.document.delete_backward(self.focused, self.caret);
            self.request_focus(caret);
        }
    }

    fn insert_char(&mut self, c: char) {
        let caret = self.document.insert_text(self.focused, self.caret, &c.to_string());
        self.request_focus(caret);
    }

    fn paste(&mut self, text: String) {
        let caret = self
            .document
            .paste(self.focused, self.caret, PastePayload::Text(text));
        self.request_focus(caret);
    }

    fn toggle_code(&mut self) {
        let kind = match self.document.block(self.focused).map(|block| block.kind) {
            Some(BlockKind::Code) => BlockKind::Text,
            Some(BlockKind::Text) => BlockKind::Code,
            _ => return,
        };
        self.document.convert_block(self.focused, kind);
        self.status = format!("Block is now {kind}");
    }

    fn move_caret_left(&mut self) {
        if self.caret > 0 {
            self.caret -= 1;
        } else if self.focused > 0 {
            self.request_focus(Some(CaretRequest::end_of(self.focused - 1)));
        }
    }

    fn move_caret_right(&mut self) {
        if self.caret < self.focused_unit_len() {
            self.caret += 1;
        } else if self.focused + 1 < self.document.len() {
            self.request_focus(Some(CaretRequest::at(self.focused + 1, 0)));
        }
    }

    fn focus_previous(&mut self) {
        if self.focused > 0 {
            self.request_focus(Some(CaretRequest::at(self.focused - 1, self.caret)));
        }
    }

    fn focus_next(&mut self) {
        if self.focused + 1 < self.document.len() {
            self.request_focus(Some(CaretRequest::at(self.focused + 1, self.caret)));
        }
    }

    fn save(&mut self) {
        match io::write_document(&self.document_path, &self.document) {
            Ok(()) => {
                self.dirty.set(false);
                self.status = format!("Saved {}", self.document_path.display());
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", self.document_path.display());
                self.status = format!("Save failed: {e}");
            }
        }
    }

    fn autosave_if_dirty(&mut self) {
        if self.autosave && self.dirty.get() {
            self.save();
        }
    }

    /// Returns true when the user asked to quit
    fn on_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('q') if ctrl => return true,
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char('t') if ctrl => self.toggle_code(),
            KeyCode::Char(c) if !ctrl => self.insert_char(c),
            KeyCode::Enter => self.handle_enter(key.modifiers.contains(KeyModifiers::SHIFT)),
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Left => self.move_caret_left(),
            KeyCode::Right => self.move_caret_right(),
            KeyCode::Up => self.focus_previous(),
            KeyCode::Down => self.focus_next(),
            KeyCode::Home => self.caret = 0,
            KeyCode::End => self.caret = self.focused_unit_len(),
            _ => {}
        }
        false
    }
}

/// Open (or create) the append-only log file inside `dir`
fn open_log_file(dir: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("blockpad.log"))
}

/// Route logs to a file, since the terminal belongs to the UI
fn init_logging(dir: &Path) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match open_log_file(dir) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("Warning: Logging disabled, cannot open log in {}: {e}", dir.display());
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    if let Err(e) = init_logging(&Config::config_dir()) {
        eprintln!("Warning: Failed to initialise logging: {e}");
    }
    log::info!("blockpad starting up");

    // Determine document path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let document_arg = match args.len() {
        1 => None,
        2 => Some(PathBuf::from(&args[1])),
        _ => {
            eprintln!("Usage: {} [document.json]", args[0]);
            process::exit(1);
        }
    };
    let config = match Config::resolve(document_arg) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} [document.json]", args[0]);
            process::exit(1);
        }
    };
    log::info!("Editing {}", config.document_path.display());

    let mut app = match App::new(config.document_path.clone(), config.autosave) {
        Ok(app) => app,
        Err(e) => {
            eprintln!(
                "Error: Could not open document '{}': {e}",
                config.document_path.display()
            );
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if app.dirty.get() {
        app.save();
    }

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        // Surfaces for every block exist now
        app.apply_pending_focus(app.document.len());
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.on_key(key) {
                    return Ok(());
                }
            }
            Event::Paste(text) => app.paste(text),
            _ => {}
        }
        app.autosave_if_dirty();
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());

    let mut lines = Vec::new();
    let mut cursor_row = 0;
    let mut cursor_col = 0;

    for (index, block) in app.document.blocks().iter().enumerate() {
        let focused = index == app.focused;
        let (gutter, colour) = match block.kind {
            BlockKind::Text => ("│ ", Color::Gray),
            BlockKind::Code => ("┃ ", Color::Cyan),
            BlockKind::Image => ("▌ ", Color::Magenta),
        };
        let gutter_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(colour)
        };

        if focused {
            let (line, col) = view::caret_cell(block, app.caret);
            cursor_row = lines.len() + line;
            cursor_col = col;
        }

        for text in view::display_lines(block) {
            lines.push(Line::from(vec![
                Span::styled(gutter, gutter_style),
                Span::styled(text, Style::default().fg(colour)),
            ]));
        }
    }

    let area = chunks[0];
    let visible_rows = area.height.saturating_sub(2) as usize;
    let scroll = (cursor_row + 1).saturating_sub(visible_rows);

    let title = format!("blockpad: {}", app.document_path.display());
    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll as u16, 0));
    f.render_widget(content, area);

    f.set_cursor_position(Position::new(
        area.x + 3 + cursor_col as u16,
        area.y + 1 + cursor_row.saturating_sub(scroll) as u16,
    ));

    let help = if app.status.is_empty() {
        "Esc: Quit | Ctrl-S: Save | Ctrl-T: Toggle code | Enter: Split | Shift-Enter: Line break"
            .to_string()
    } else {
        app.status.clone()
    };
    f.render_widget(Paragraph::new(Line::from(help)), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_file_is_created_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested");

        writeln!(open_log_file(&log_dir).unwrap(), "first").unwrap();
        writeln!(open_log_file(&log_dir).unwrap(), "second").unwrap();

        let logged = std::fs::read_to_string(log_dir.join("blockpad.log")).unwrap();
        assert_eq!(logged, "first\nsecond\n");
    }

    #[test]
    fn test_unusable_log_dir_disables_logging() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        assert!(open_log_file(&blocker).is_err());
        assert!(init_logging(&blocker).is_ok());
    }
}
