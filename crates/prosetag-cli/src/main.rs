use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use prosetag_config::Config;
use prosetag_engine::{Document, RuleOutcome, Syntax, fill_paragraph, io};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{env, io::stdout, path::PathBuf, process};

struct App {
    path: PathBuf,
    doc: Document,
    fill_column: usize,
    /// Line index of the cursor, also the top of the viewport.
    cursor_line: usize,
}

impl App {
    fn new(path: PathBuf, config: &Config) -> Result<Self> {
        let syntax = Syntax {
            comment_marker: config.comment_marker,
            ..Syntax::default()
        };
        let doc = io::read_document_with_syntax(&path, syntax)?;

        Ok(Self {
            path,
            doc,
            fill_column: config.fill_column,
            cursor_line: 0,
        })
    }

    fn line_count(&self) -> usize {
        self.doc.text().lines().count()
    }

    fn next_line(&mut self) {
        let count = self.line_count();
        if count > 0 && self.cursor_line + 1 < count {
            self.cursor_line += 1;
        }
    }

    fn previous_line(&mut self) {
        self.cursor_line = self.cursor_line.saturating_sub(1);
    }

    /// Byte offset of the start of the cursor line.
    fn cursor_offset(&self) -> usize {
        let text = self.doc.text();
        let mut offset = 0;
        for (i, line) in text.split_inclusive('\n').enumerate() {
            if i == self.cursor_line {
                break;
            }
            offset += line.len();
        }
        offset
    }

    /// Rewrap the prose paragraph under the cursor to the fill column.
    fn fill_at_cursor(&mut self) {
        let pos = self.cursor_offset();
        match fill_paragraph(self.doc.buffer(), self.doc.tags(), self.fill_column, pos, false) {
            RuleOutcome::Edit(cmd) => {
                self.doc.apply(cmd);
            }
            RuleOutcome::Defer | RuleOutcome::Unchanged => {}
        }
    }

    fn save(&self) -> Result<()> {
        io::write_document(&self.path, &self.doc)?;
        Ok(())
    }

    /// One styled line per document line, colored by classification.
    fn styled_lines(&self) -> Vec<Line<'static>> {
        let text = self.doc.text();
        let mut lines = Vec::new();
        let mut offset = 0;

        for raw in text.split_inclusive('\n') {
            let content = raw.trim_end_matches('\n').to_string();
            let style = if content.trim().is_empty() {
                Style::default().fg(Color::DarkGray)
            } else if self.doc.is_prose_line(offset) {
                Style::default()
            } else {
                Style::default().fg(Color::Cyan)
            };
            lines.push(Line::from(Span::styled(content, style)));
            offset += raw.len();
        }

        if lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let document_path = if args.len() == 2 {
        PathBuf::from(&args[1])
    } else if args.len() == 1 {
        match config.document_path.clone() {
            Some(path) => path,
            None => {
                eprintln!("Error: No document path provided and none set in config");
                eprintln!("Usage: {} <text-file-path>", args[0]);
                eprintln!("Or set document_path in {}", config_path.display());
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [text-file-path]", args[0]);
        process::exit(1);
    };

    if !document_path.is_file() {
        eprintln!(
            "Error: Document path '{}' is not a readable file",
            document_path.display()
        );
        process::exit(1);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(document_path, &config)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_line(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_line(),
                KeyCode::Char('g') => app.cursor_line = 0,
                KeyCode::Char('G') => {
                    app.cursor_line = app.line_count().saturating_sub(1);
                }
                KeyCode::Char('f') => app.fill_at_cursor(),
                KeyCode::Char('w') => app.save()?,
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let title = format!("{} (v{})", app.path.display(), app.doc.version());
    let cursor_style = if app.doc.is_prose_line(app.cursor_offset()) {
        Span::styled("prose", Style::default().add_modifier(Modifier::BOLD))
    } else {
        Span::styled(
            "code",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };

    let content = Paragraph::new(app.styled_lines())
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((app.cursor_line as u16, 0));
    f.render_widget(content, chunks[0]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("q: Quit | ↑/k ↓/j: Move | g/G: Top/Bottom | f: Fill | w: Write | line: "),
        cursor_style,
    ]));
    f.render_widget(help, chunks[1]);
}
