use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

use vendor_directory::{
    interactive_level, Directory, Store, VendorCard, VendorFilter, NO_RESULTS_MESSAGE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Location,
}

impl InputMode {
    pub fn title(&self) -> &str {
        match self {
            InputMode::Normal => "Browse",
            InputMode::Search => "Search name",
            InputMode::Location => "Filter location",
        }
    }
}

pub struct App {
    /// Category names, "All" first
    pub categories: Vec<String>,
    pub category_index: usize,
    pub search: String,
    pub location: String,
    pub input_mode: InputMode,
    pub cards: Vec<VendorCard>,
    pub state: TableState,
    pub show_detail: bool,
    pub message: Option<String>,
    pub member: Option<String>,
}

impl App {
    pub fn new<S: Store>(directory: &Directory<S>) -> Result<Self> {
        let mut app = Self {
            categories: directory.catalogue().categories().names(),
            category_index: 0,
            search: String::new(),
            location: String::new(),
            input_mode: InputMode::Normal,
            cards: Vec::new(),
            state: TableState::default(),
            show_detail: false,
            message: None,
            member: None,
        };
        app.refresh(directory)?;
        Ok(app)
    }

    pub fn active_category(&self) -> &str {
        self.categories
            .get(self.category_index)
            .map(String::as_str)
            .unwrap_or("All")
    }

    pub fn filter(&self) -> VendorFilter {
        VendorFilter::new(self.active_category(), &self.search, &self.location)
    }

    /// Re-run the filter and re-read ratings and member state
    pub fn refresh<S: Store>(&mut self, directory: &Directory<S>) -> Result<()> {
        self.cards = directory.vendor_cards(&self.filter())?;
        self.member = directory.member()?.map(|m| m.name);

        let selected = match self.state.selected() {
            _ if self.cards.is_empty() => None,
            Some(i) if i >= self.cards.len() => Some(self.cards.len() - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.state.select(selected);
        Ok(())
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_card(&self) -> Option<&VendorCard> {
        self.state.selected().and_then(|i| self.cards.get(i))
    }

    pub fn next_category(&mut self) {
        self.category_index = (self.category_index + 1) % self.categories.len().max(1);
    }

    pub fn previous_category(&mut self) {
        let len = self.categories.len().max(1);
        self.category_index = (self.category_index + len - 1) % len;
    }

    pub fn clear_filter(&mut self) {
        self.category_index = 0;
        self.search.clear();
        self.location.clear();
    }

    pub fn rate_selected<S: Store>(&mut self, directory: &mut Directory<S>, stars: i64) {
        let Some(name) = self.selected_card().map(|c| c.vendor.name.clone()) else {
            return;
        };
        self.message = Some(match directory.rate(&name, stars) {
            Ok(average) => format!("Rated {} {} stars (average {:.1})", name, stars, average),
            Err(e) => e.to_string(),
        });
    }

    pub fn save_selected<S: Store>(&mut self, directory: &mut Directory<S>) {
        let Some(name) = self.selected_card().map(|c| c.vendor.name.clone()) else {
            return;
        };
        self.message = Some(match directory.save_favorite(&name) {
            Ok(_) => "Vendor saved successfully!".to_string(),
            Err(e) => e.to_string(),
        });
    }

    pub fn next(&mut self) {
        let len = self.cards.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.cards.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.cards.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = match self.state.selected() {
            Some(i) => i.saturating_sub(20),
            None => 0,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui<S: Store>(app: &mut App, directory: &mut Directory<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, directory);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend, S: Store>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    directory: &mut Directory<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.handle_key(key, directory)? {
            return Ok(());
        }
    }
}

impl App {
    /// Apply one key press. Returns true when the UI should quit.
    pub fn handle_key<S: Store>(
        &mut self,
        key: KeyEvent,
        directory: &mut Directory<S>,
    ) -> Result<bool> {
        // Ctrl+C quits from any mode
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        if self.input_mode != InputMode::Normal {
            let field = match self.input_mode {
                InputMode::Location => &mut self.location,
                _ => &mut self.search,
            };
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => {
                    field.pop();
                }
                KeyCode::Char(c) => field.push(c),
                _ => {}
            }
            self.refresh(directory)?;
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::Tab => self.next_category(),
            KeyCode::BackTab => self.previous_category(),
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('l') => self.input_mode = InputMode::Location,
            KeyCode::Char('c') => self.clear_filter(),
            KeyCode::Char('s') => self.save_selected(directory),
            KeyCode::Char(c @ '1'..='5') => {
                self.rate_selected(directory, i64::from(c as u8 - b'0'));
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => self.state.select(Some(0)),
            KeyCode::End => {
                if !self.cards.is_empty() {
                    self.state.select(Some(self.cards.len() - 1));
                }
            }
            _ => {}
        }

        self.refresh(directory)?;
        Ok(false)
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category tabs
            Constraint::Min(0),    // Vendor list
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, name) in app.categories.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if i == app.category_index {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(name.as_str(), style));
    }

    if let Some(member) = &app.member {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("Welcome back, {}!", member),
            Style::default().fg(Color::Green),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Vendor Directory "),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    if app.cards.is_empty() {
        let empty = Paragraph::new(NO_RESULTS_MESSAGE)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Vendors "));
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["Category", "Name", "Location", "Rating"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.cards.iter().map(|card| {
        let cells = vec![
            Cell::from(truncate(&card.vendor.category, 22)),
            Cell::from(truncate(&card.vendor.name, 32)),
            Cell::from(truncate(&card.vendor.location, 22)),
            Cell::from(card.stars.clone()).style(Style::default().fg(Color::Yellow)),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(34),
            Constraint::Length(24),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Vendors ({}) ", app.cards.len())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let Some(card) = app.selected_card() else {
        let empty = Paragraph::new("No vendor selected")
            .block(Block::default().borders(Borders::ALL).title(" Details "));
        f.render_widget(empty, area);
        return;
    };

    let label = Style::default().fg(Color::Cyan);
    let lit = interactive_level(card.average) as usize;
    let rating_widget: String = (1..=5).map(|i| if i <= lit { '★' } else { '☆' }).collect();

    let lines = vec![
        Line::from(Span::styled(
            card.vendor.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.vendor.category.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(card.vendor.description.clone()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Location: ", label),
            Span::raw(card.vendor.location.clone()),
        ]),
        Line::from(vec![
            Span::styled("Phone: ", label),
            Span::raw(card.vendor.phone.clone()),
        ]),
        Line::from(vec![
            Span::styled("Email: ", label),
            Span::raw(card.vendor.email.clone()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Rating: ", label),
            Span::styled(rating_widget, Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                "  {:.1} ({} ratings)",
                card.average, card.rating_count
            )),
        ]),
        Line::from(Span::styled(
            "Press 1-5 to rate",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Details "),
    );

    f.render_widget(detail, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);

    let mut status_spans = vec![Span::styled(
        format!(" {} ", app.input_mode.title()),
        Style::default().fg(Color::Cyan),
    )];

    match app.input_mode {
        InputMode::Search => {
            status_spans.push(Span::raw(format!("› {}_", app.search)));
        }
        InputMode::Location => {
            status_spans.push(Span::raw(format!("› {}_", app.location)));
        }
        InputMode::Normal => {
            if !app.search.is_empty() || !app.location.is_empty() {
                status_spans.push(Span::raw(" | "));
                status_spans.push(Span::styled(
                    format!("name~{:?} location~{:?}", app.search, app.location),
                    Style::default().fg(Color::Green),
                ));
            }

            if let Some(message) = &app.message {
                status_spans.push(Span::raw(" | "));
                status_spans.push(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Magenta),
                ));
            }

            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled("Tab", key));
            status_spans.push(Span::raw(" Category | "));
            status_spans.push(Span::styled("/", key));
            status_spans.push(Span::raw(" Search | "));
            status_spans.push(Span::styled("l", key));
            status_spans.push(Span::raw(" Location | "));
            status_spans.push(Span::styled("1-5", key));
            status_spans.push(Span::raw(" Rate | "));
            if app.member.is_some() {
                status_spans.push(Span::styled("s", key));
                status_spans.push(Span::raw(" Save | "));
            }
            status_spans.push(Span::styled("Enter", key));
            status_spans.push(Span::raw(" Details | "));
            status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Quit"));
        }
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendor_directory::MemoryStore;

    fn app() -> (App, Directory<MemoryStore>) {
        let directory = Directory::open(MemoryStore::new()).unwrap();
        let app = App::new(&directory).unwrap();
        (app, directory)
    }

    #[test]
    fn test_app_starts_on_all_with_selection() {
        let (app, _) = app();
        assert_eq!(app.active_category(), "All");
        assert_eq!(app.cards.len(), 1);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_category_cycling_wraps() {
        let (mut app, directory) = app();
        app.next_category();
        assert_eq!(app.active_category(), "Catering & Cakes");
        app.next_category();
        assert_eq!(app.active_category(), "All");
        app.previous_category();
        assert_eq!(app.active_category(), "Catering & Cakes");

        app.refresh(&directory).unwrap();
        assert_eq!(app.cards.len(), 1);
    }

    #[test]
    fn test_search_with_no_match_clears_selection() {
        let (mut app, directory) = app();
        app.search = "zzz".to_string();
        app.refresh(&directory).unwrap();

        assert!(app.cards.is_empty());
        assert_eq!(app.state.selected(), None);
        assert!(app.selected_card().is_none());
    }

    #[test]
    fn test_rate_selected_sets_message() {
        let (mut app, mut directory) = app();
        app.rate_selected(&mut directory, 4);
        app.refresh(&directory).unwrap();

        assert_eq!(app.cards[0].average, 4.0);
        assert!(app.message.as_deref().unwrap().starts_with("Rated"));
    }

    #[test]
    fn test_save_selected_requires_member() {
        let (mut app, mut directory) = app();
        app.save_selected(&mut directory);
        assert_eq!(
            app.message.as_deref(),
            Some("Please log in as a member first.")
        );
    }

    #[test]
    fn test_typing_in_search_mode() {
        let (mut app, mut directory) = app();
        for code in [KeyCode::Char('/'), KeyCode::Char('z'), KeyCode::Char('c')] {
            let quit = app
                .handle_key(KeyEvent::new(code, KeyModifiers::NONE), &mut directory)
                .unwrap();
            assert!(!quit);
        }

        assert_eq!(app.input_mode, InputMode::Search);
        assert_eq!(app.search, "zc");
        assert!(app.cards.is_empty());
    }

    #[test]
    fn test_ctrl_c_quits_from_input_mode() {
        let (mut app, mut directory) = app();
        app.input_mode = InputMode::Location;
        app.location = "Aus".to_string();

        let quit = app
            .handle_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut directory,
            )
            .unwrap();
        assert!(quit);
        assert_eq!(app.location, "Aus");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Alamo Fiesta Charcuterie", 10), "Alamo F...");
    }
}
