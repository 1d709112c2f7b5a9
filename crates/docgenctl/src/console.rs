//! Interactive terminal console.
//!
//! One draw/input loop owns the [`App`]. Network work runs in spawned tasks
//! that report back over a channel; every view load is tagged with a
//! generation number and results for a view that is no longer showing are
//! dropped on arrival.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use docgen_client::models::ListParams;
use docgen_client::{Access, AuthState, Docgen, Route, RouteGuard, StateStore, Theme, ThemePreference};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table as TableWidget, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::views::{self, Table};

pub async fn run(docgen: Arc<Docgen>, store: Arc<dyn StateStore>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(docgen, store);
    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
    error: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            muted: Color::DarkGray,
            error: Color::Red,
        },
        Theme::Dark => Palette {
            fg: Color::Gray,
            bg: Color::Black,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            error: Color::LightRed,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Email,
    Password,
}

#[derive(Debug)]
struct LoginForm {
    email: String,
    password: String,
    focus: Field,
    error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: Field::Email,
            error: None,
            submitting: false,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    fn switch_field(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
enum View {
    Idle,
    Loading,
    Ready(Table),
    Failed(String),
}

#[derive(Debug)]
enum Message {
    Loaded {
        generation: u64,
        route: Route,
        result: std::result::Result<Table, String>,
    },
    LoginFinished(std::result::Result<String, String>),
    LoggedOut,
}

enum Action {
    None,
    Quit,
    Submit,
    Reload,
    Logout,
}

struct App {
    docgen: Arc<Docgen>,
    theme: ThemePreference,
    menu_state: ListState,
    route: Route,
    /// Route and auth status the current view was loaded for.
    loaded_for: Option<(Route, bool)>,
    generation: u64,
    view: View,
    login: LoginForm,
    status: Option<String>,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl App {
    fn new(docgen: Arc<Docgen>, store: Arc<dyn StateStore>) -> App {
        let (tx, rx) = mpsc::unbounded_channel();
        let route = docgen.navigator().current();
        App {
            docgen,
            theme: ThemePreference::load(store),
            menu_state: ListState::default(),
            route,
            loaded_for: None,
            generation: 0,
            view: View::Idle,
            login: LoginForm::new(),
            status: None,
            tx,
            rx,
        }
    }

    fn spawn_init(&self) {
        let docgen = self.docgen.clone();
        tokio::spawn(async move {
            docgen.session.init().await;
        });
    }

    fn menu(&self, state: &AuthState) -> Vec<Route> {
        RouteGuard::visible_routes(&state.principal())
    }

    /// Follow guard redirects and (re)load the view when route or session changed.
    fn sync(&mut self, state: &AuthState) {
        let navigator = self.docgen.navigator().clone();
        self.route = navigator.current();

        match RouteGuard::check(state, self.route) {
            Access::Pending => return,
            Access::Redirect(target) => {
                navigator.navigate(target);
                self.route = target;
            }
            Access::Granted(_) => {}
        }

        let menu = self.menu(state);
        if state.is_authenticated() && !menu.contains(&self.route) {
            if let Some(first) = menu.first() {
                navigator.navigate(*first);
                self.route = *first;
            }
        }
        self.menu_state.select(menu.iter().position(|r| *r == self.route));

        let key = (self.route, state.is_authenticated());
        if self.loaded_for != Some(key) {
            self.loaded_for = Some(key);
            if state.is_authenticated() && self.route != Route::Login {
                self.start_load(self.route);
            } else {
                self.generation += 1;
                self.view = View::Idle;
            }
        }
    }

    fn start_load(&mut self, route: Route) {
        self.generation += 1;
        let generation = self.generation;
        self.view = View::Loading;

        let docgen = self.docgen.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = load(&docgen, route).await.map_err(|e| e.user_message());
            let _ = tx.send(Message::Loaded {
                generation,
                route,
                result,
            });
        });
    }

    fn handle_message(&mut self, message: Message) {
        match message {
            Message::Loaded {
                generation,
                route,
                result,
            } => {
                if generation != self.generation {
                    tracing::debug!(%route, generation, "Discarding result for a view no longer shown");
                    return;
                }
                self.view = match result {
                    Ok(table) => View::Ready(table),
                    Err(message) => View::Failed(message),
                };
            }
            Message::LoginFinished(result) => {
                self.login.submitting = false;
                match result {
                    Ok(name) => {
                        self.login = LoginForm::new();
                        self.status = Some(format!("Welcome, {}", name));
                        self.docgen.navigator().navigate(Route::Dashboard);
                    }
                    Err(message) => {
                        self.login.password.clear();
                        self.login.error = Some(message);
                    }
                }
            }
            Message::LoggedOut => {
                self.status = Some("Logged out".to_string());
            }
        }
    }

    fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        self.login.submitting = true;
        self.login.error = None;

        let email = self.login.email.clone();
        let password = self.login.password.clone();
        let docgen = self.docgen.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = docgen
                .session
                .login(&email, &password)
                .await
                .map(|user| user.display_name())
                .map_err(|e| e.user_message());
            let _ = tx.send(Message::LoginFinished(result));
        });
    }

    fn logout(&mut self) {
        let docgen = self.docgen.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            docgen.session.logout().await;
            let _ = tx.send(Message::LoggedOut);
        });
    }

    fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => self.status = Some(format!("Theme: {}", theme)),
            Err(e) => self.status = Some(e.user_message()),
        }
    }

    fn step_menu(&mut self, state: &AuthState, forward: bool) {
        let menu = self.menu(state);
        if menu.is_empty() {
            return;
        }
        let current = menu.iter().position(|r| *r == self.route).unwrap_or(0);
        let next = if forward {
            (current + 1) % menu.len()
        } else {
            (current + menu.len() - 1) % menu.len()
        };
        self.docgen.navigator().navigate(menu[next]);
    }

    fn on_login_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                self.login.switch_field();
                Action::None
            }
            KeyCode::Enter if self.login.focus == Field::Email => {
                self.login.focus = Field::Password;
                Action::None
            }
            KeyCode::Enter => Action::Submit,
            KeyCode::Backspace => {
                self.login.field_mut().pop();
                Action::None
            }
            KeyCode::Char(c) => {
                self.login.field_mut().push(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn on_main_key(&mut self, key: KeyEvent, state: &AuthState) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                self.step_menu(state, true);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.step_menu(state, false);
                Action::None
            }
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('t') => {
                self.toggle_theme();
                Action::None
            }
            KeyCode::Char('l') => Action::Logout,
            _ => Action::None,
        }
    }
}

async fn load(docgen: &Docgen, route: Route) -> docgen_client::Result<Table> {
    let api = &docgen.api;
    let params = ListParams::new().per_page(50);
    Ok(match route {
        Route::Dashboard => views::dashboard(&api.dashboard().stats().await?),
        Route::Customers => views::customers(&api.customers().list(&params).await?),
        Route::Products => views::products(&api.products().list(&params).await?),
        Route::Orders => views::orders(&api.orders().list(&params).await?),
        Route::Documents => views::documents(&api.documents().list(&params).await?),
        Route::DocumentGenerator => views::templates(&api.documents().templates().await?),
        Route::Settings => views::profile(&docgen.session.refresh().await?),
        Route::Login => Table::default(),
    })
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    app.spawn_init();
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(message) = app.rx.try_recv() {
            app.handle_message(message);
        }
        let state = app.docgen.session.state();
        app.sync(&state);

        terminal.draw(|f| ui(f, &mut app, &state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = match &state {
                    AuthState::Unknown | AuthState::Loading => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                        _ => Action::None,
                    },
                    AuthState::Anonymous => app.on_login_key(key),
                    AuthState::Authenticated(_) => app.on_main_key(key, &state),
                };
                match action {
                    Action::Quit => return Ok(()),
                    Action::Submit => app.submit_login(),
                    Action::Reload => app.start_load(app.route),
                    Action::Logout => app.logout(),
                    Action::None => {}
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

fn ui(f: &mut Frame, app: &mut App, state: &AuthState) {
    let colors = palette(app.theme.current());
    let base = Style::default().fg(colors.fg).bg(colors.bg);
    f.render_widget(Block::default().style(base), f.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.size());

    let who = match state.user() {
        Some(user) => format!("{} ({})", user.display_name(), user.role),
        None => "not signed in".to_string(),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Docgen", Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" - {} - {}", app.route.title(), who)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Info"))
    .style(base);
    f.render_widget(header, chunks[0]);

    let route = app.route;
    let access = RouteGuard::protect(state, route, |_| ());
    match access {
        Access::Pending => {
            let waiting = Paragraph::new("Checking session...")
                .style(Style::default().fg(colors.muted))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(waiting, chunks[1]);
        }
        Access::Redirect(_) => {}
        Access::Granted(()) if route == Route::Login => draw_login(f, chunks[1], &app.login, &colors),
        Access::Granted(()) => draw_main(f, chunks[1], app, state, &colors),
    }

    let help = match state {
        AuthState::Authenticated(_) => "q: Quit | ↑/↓: Navigate | r: Reload | t: Theme | l: Logout",
        AuthState::Anonymous => "Tab: Switch field | Enter: Sign in | Esc: Quit",
        _ => "q: Quit",
    };
    let footer_text = match &app.status {
        Some(status) => format!("{} | {}", status, help),
        None => help.to_string(),
    };
    let footer = Paragraph::new(footer_text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .style(base);
    f.render_widget(footer, chunks[2]);
}

fn draw_login(f: &mut Frame, area: Rect, form: &LoginForm, colors: &Palette) {
    let focused = |field: Field| {
        if form.focus == field {
            Style::default().fg(colors.accent)
        } else {
            Style::default().fg(colors.fg)
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Email:    ", focused(Field::Email)),
            Span::raw(form.email.clone()),
        ]),
        Line::from(vec![
            Span::styled("Password: ", focused(Field::Password)),
            Span::raw("*".repeat(form.password.chars().count())),
        ]),
        Line::from(""),
    ];
    if form.submitting {
        lines.push(Line::from(Span::styled("Signing in...", Style::default().fg(colors.muted))));
    }
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(colors.error))));
    }

    let login = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Sign in"));
    f.render_widget(login, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &mut App, state: &AuthState, colors: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)].as_ref())
        .split(area);

    let items: Vec<ListItem> = app
        .menu(state)
        .iter()
        .map(|route| ListItem::new(route.title()))
        .collect();
    let menu = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Menu"))
        .highlight_style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");
    f.render_stateful_widget(menu, chunks[0], &mut app.menu_state);

    let title = app.route.title();
    match &app.view {
        View::Idle | View::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(colors.muted))
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(loading, chunks[1]);
        }
        View::Failed(message) => {
            let failed = Paragraph::new(message.clone())
                .style(Style::default().fg(colors.error))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(failed, chunks[1]);
        }
        View::Ready(table) => draw_table(f, chunks[1], title, table, colors),
    }
}

fn draw_table(f: &mut Frame, area: Rect, title: &str, table: &Table, colors: &Palette) {
    let widths: Vec<Constraint> = table
        .widths()
        .into_iter()
        .map(|w| Constraint::Min(w.min(40) as u16))
        .collect();
    let header = Row::new(table.headers.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD));
    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone()))));

    let block_title = match &table.footer {
        Some(footer) => format!("{} ({})", title, footer),
        None => title.to_string(),
    };
    let widget = TableWidget::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(Block::default().borders(Borders::ALL).title(block_title));
    f.render_widget(widget, area);
}
