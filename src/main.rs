mod agent;
mod command;
mod config;
mod state;

use std::fs::OpenOptions;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agent::{AgentResponse, Orchestrator, Platform, ResponseStatus, WorkflowRunner};
use command::{CommandInput, CommandRouter};
use config::{AppConfig, ConfigStatus};
use state::{JsonFileStore, KeyValueStore, MemoryStore};

#[derive(Parser)]
#[command(name = "streamdesk", version, about = "Natural-language commands for Twitch, Discord and Instagram")]
struct Cli {
    /// Data directory holding config.json, state.json and logs
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Print responses as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,
    /// Run a single command
    Run {
        /// Command text, e.g. "check if twitch stream is live"
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show how a command is classified without running it
    Explain {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Run several commands in order
    Workflow {
        /// Name of a workflow from config.json
        #[arg(long, short)]
        name: Option<String>,
        /// Commands to run when no name is given
        commands: Vec<String>,
    },
    /// Show which platforms have real credentials
    Status,
    /// List example commands
    Suggest,
    /// Write config.json with placeholder credentials
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Poll stream status and the media feed
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = 60)]
        interval: u64,
        /// Poll once and exit
        #[arg(long)]
        once: bool,
    },
}

/// Shared handles for every front end
struct AppContext {
    config: Arc<AppConfig>,
    orchestrator: Arc<Orchestrator>,
}

impl AppContext {
    fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::load(data_dir)?);
        let store = open_store(data_dir);
        let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&config), store)?);
        Ok(Self {
            config,
            orchestrator,
        })
    }
}

fn open_store(data_dir: &Path) -> Arc<dyn KeyValueStore> {
    match JsonFileStore::new(data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "State file unavailable, keeping state in memory");
            Arc::new(MemoryStore::new())
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).context("Failed to create log directory")?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .context(format!("Failed to open {}", path.display()))?;
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let data_dir = config::resolve_data_dir(cli.dir);
    let command = cli.command.unwrap_or(Commands::Dashboard);

    match &command {
        Commands::Dashboard => init_logging(Some(&data_dir.join("logs").join("streamdesk.log")))?,
        _ => init_logging(None)?,
    }

    match command {
        Commands::Dashboard => {
            let ctx = AppContext::load(&data_dir)?;
            run_dashboard(ctx).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { text } => {
            let ctx = AppContext::load(&data_dir)?;
            let input = CommandInput::new(text.join(" "));
            let responses = ctx.orchestrator.process_command(&input).await;
            print_responses(&responses, cli.json)?;
            Ok(exit_code(&responses))
        }
        Commands::Explain { text } => {
            let ctx = AppContext::load(&data_dir)?;
            let intent = ctx.orchestrator.router().parse_command(&text.join(" "));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&intent)?);
            } else {
                println!("Action:     {}", intent.action);
                println!(
                    "Platforms:  {}",
                    intent
                        .platform
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!("Confidence: {:.1}", intent.confidence);
                let mut params: Vec<_> = intent.parameters.iter().collect();
                params.sort();
                for (key, value) in params {
                    println!("  {} = {}", key, value);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Workflow { name, commands } => {
            let ctx = AppContext::load(&data_dir)?;
            let commands = match name {
                Some(name) => match ctx.config.get_workflow(&name) {
                    Some(steps) => steps.to_vec(),
                    None => bail!(
                        "Unknown workflow '{}'. Available: {}",
                        name,
                        ctx.config.workflow_names().join(", ")
                    ),
                },
                None if commands.is_empty() => bail!("Give a workflow --name or some commands"),
                None => commands,
            };

            let runner = WorkflowRunner::new(Arc::clone(&ctx.orchestrator));
            let json = cli.json;
            let responses = runner
                .execute_workflow_with(&commands, |command, batch| {
                    if !json {
                        println!("▶ {}", command);
                        for response in batch {
                            println!("  {}", format_response(response));
                        }
                    }
                })
                .await;
            if json {
                print_responses(&responses, true)?;
            }
            Ok(exit_code(&responses))
        }
        Commands::Status => {
            let status = AppConfig::load(&data_dir)?.platforms.status();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status, &data_dir);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Suggest => {
            for suggestion in CommandRouter::suggestions() {
                println!("{}", suggestion);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            if data_dir.join("config.json").exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    data_dir.join("config.json").display()
                );
            }
            let path = AppConfig::default().save(&data_dir)?;
            println!("Wrote {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Watch { interval, once } => {
            let ctx = AppContext::load(&data_dir)?;
            watch(&ctx, Duration::from_secs(interval.max(1)), once).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn has_errors(responses: &[AgentResponse]) -> bool {
    responses.iter().any(|r| r.status == ResponseStatus::Error)
}

fn exit_code(responses: &[AgentResponse]) -> ExitCode {
    if has_errors(responses) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn format_response(response: &AgentResponse) -> String {
    format!(
        "{} [{}] {}",
        response.status.icon(),
        response.platform,
        response.message
    )
}

fn print_responses(responses: &[AgentResponse], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(responses)?);
    } else {
        for response in responses {
            println!("{}", format_response(response));
        }
    }
    Ok(())
}

fn print_status(status: &ConfigStatus, data_dir: &Path) {
    println!("Config: {}", data_dir.join("config.json").display());
    println!(
        "Configured platforms: {}/{}",
        status.configured_platforms, status.total_platforms
    );
    for result in &status.results {
        let mark = if result.is_valid { "✅" } else { "⚠️" };
        println!("{} {}", mark, result.platform.display_name());
        for (error, suggestion) in result.errors.iter().zip(&result.suggestions) {
            println!("   - {} ({})", error, suggestion);
        }
    }
}

/// Report stream transitions and new media until interrupted
async fn watch(ctx: &AppContext, interval: Duration, once: bool) -> anyhow::Result<()> {
    let mut was_live: Option<bool> = None;

    loop {
        match ctx.orchestrator.twitch().get_stream_info().await {
            Some(stream) if was_live != Some(stream.is_live) => {
                if stream.is_live {
                    println!("🔴 Stream is LIVE: {} ({} viewers)", stream.title, stream.viewer_count);
                } else {
                    println!("⚫ Stream is offline");
                }
                was_live = Some(stream.is_live);
            }
            Some(_) => {}
            None => warn!("Stream status unavailable"),
        }

        let content = ctx.orchestrator.instagram().check_for_new_content().await;
        match content.media_data() {
            Some(media) => println!("📸 New media: {}", media.permalink),
            None if content.status == ResponseStatus::Error => {
                println!("{}", format_response(&content))
            }
            None => info!("{}", content.message),
        }

        if once {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

// ========================================
// Dashboard
// ========================================

/// Events from background command tasks
#[derive(Debug)]
enum CommandEvent {
    /// Responses of one command
    Responses {
        command: String,
        responses: Vec<AgentResponse>,
    },
    /// The submitted command or workflow is done
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum InputMode {
    Normal,
    /// Typing a command
    Editing,
    /// Picking an example command
    SelectSuggestion,
    /// Picking a named workflow
    SelectWorkflow,
}

/// Dashboard state
struct App {
    config: Arc<AppConfig>,
    orchestrator: Arc<Orchestrator>,
    config_status: ConfigStatus,
    /// Every response so far, oldest first
    responses: Vec<AgentResponse>,
    input_mode: InputMode,
    input_buffer: String,
    status_message: Option<String>,
    command_count: usize,
    processing: bool,
    last_activity: Option<DateTime<Local>>,
    selection_list: Vec<String>,
    selected_index: usize,
    event_rx: mpsc::Receiver<CommandEvent>,
    event_tx: mpsc::Sender<CommandEvent>,
}

impl App {
    fn new(ctx: AppContext) -> Self {
        let (event_tx, event_rx) = mpsc::channel(100);
        let config_status = ctx.config.platforms.status();

        Self {
            config: ctx.config,
            orchestrator: ctx.orchestrator,
            config_status,
            responses: Vec::new(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            status_message: None,
            command_count: 0,
            processing: false,
            last_activity: None,
            selection_list: vec![],
            selected_index: 0,
            event_rx,
            event_tx,
        }
    }

    /// Responses for one platform, newest first
    fn responses_for(&self, platform: Platform) -> Vec<&AgentResponse> {
        self.responses
            .iter()
            .rev()
            .filter(|r| r.platform == platform)
            .collect()
    }

    fn start_editing(&mut self) {
        if self.processing {
            self.status_message = Some("⏳ Still processing the previous command".into());
            return;
        }
        self.input_mode = InputMode::Editing;
        self.status_message = Some("Type a command, Enter to run, Esc to cancel".into());
    }

    fn open_suggestions(&mut self) {
        self.selection_list = CommandRouter::suggestions()
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.selected_index = 0;
        self.input_mode = InputMode::SelectSuggestion;
    }

    fn open_workflows(&mut self) {
        self.selection_list = self
            .config
            .workflow_names()
            .into_iter()
            .map(String::from)
            .collect();
        if self.selection_list.is_empty() {
            self.status_message = Some("No workflows configured".into());
            return;
        }
        self.selected_index = 0;
        self.input_mode = InputMode::SelectWorkflow;
    }

    fn handle_input(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    fn handle_backspace(&mut self) {
        self.input_buffer.pop();
    }

    fn confirm_input(&mut self) {
        match self.input_mode {
            InputMode::Editing => {
                let text = std::mem::take(&mut self.input_buffer);
                self.input_mode = InputMode::Normal;
                self.submit_command(text);
            }
            InputMode::SelectSuggestion => {
                if let Some(text) = self.selection_list.get(self.selected_index).cloned() {
                    self.input_mode = InputMode::Normal;
                    self.submit_command(text);
                }
            }
            InputMode::SelectWorkflow => {
                if let Some(name) = self.selection_list.get(self.selected_index).cloned() {
                    self.input_mode = InputMode::Normal;
                    self.start_workflow(&name);
                }
            }
            InputMode::Normal => {}
        }
    }

    fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.status_message = None;
    }

    fn selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    fn selection_down(&mut self) {
        if self.selected_index < self.selection_list.len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    fn clear_responses(&mut self) {
        self.responses.clear();
        self.status_message = Some("Cleared responses".into());
    }

    /// Run one command in the background
    fn submit_command(&mut self, text: String) {
        if text.trim().is_empty() || self.processing {
            return;
        }
        self.processing = true;
        self.command_count += 1;
        self.status_message = Some(format!("⏳ Running: {}", text));

        let orchestrator = Arc::clone(&self.orchestrator);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let input = CommandInput::new(text.clone());
            let responses =
                run_guarded(async move { orchestrator.process_command(&input).await }).await;
            let _ = event_tx
                .send(CommandEvent::Responses {
                    command: text,
                    responses,
                })
                .await;
            let _ = event_tx.send(CommandEvent::Finished).await;
        });
    }

    /// Run a named workflow in the background
    fn start_workflow(&mut self, name: &str) {
        let Some(commands) = self.config.get_workflow(name).map(|c| c.to_vec()) else {
            self.status_message = Some(format!("❌ Unknown workflow '{}'", name));
            return;
        };
        if self.processing {
            return;
        }
        self.processing = true;
        self.command_count += commands.len();
        self.status_message = Some(format!("⏳ Running workflow '{}'", name));

        let runner = WorkflowRunner::new(Arc::clone(&self.orchestrator));
        let event_tx = self.event_tx.clone();
        let step_tx = self.event_tx.clone();
        let name = name.to_string();
        tokio::spawn(async move {
            let failure = run_guarded(async move {
                runner
                    .execute_workflow_with(&commands, |command, batch| {
                        let step = CommandEvent::Responses {
                            command: command.to_string(),
                            responses: batch.to_vec(),
                        };
                        if let Err(e) = step_tx.try_send(step) {
                            warn!(command, error = %e, "Dropped workflow step responses");
                        }
                    })
                    .await;
                Vec::new()
            })
            .await;

            if !failure.is_empty() {
                let _ = event_tx
                    .send(CommandEvent::Responses {
                        command: format!("workflow {}", name),
                        responses: failure,
                    })
                    .await;
            }
            let _ = event_tx.send(CommandEvent::Finished).await;
        });
    }

    /// Drain finished command events (non-blocking)
    fn process_command_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                CommandEvent::Responses { command, responses } => {
                    let succeeded = responses.iter().filter(|r| r.is_success()).count();
                    let failed = responses
                        .iter()
                        .filter(|r| r.status == ResponseStatus::Error)
                        .count();

                    self.status_message = Some(match (succeeded, failed) {
                        (_, 0) => format!(
                            "✅ {} action(s) completed successfully: {}",
                            succeeded, command
                        ),
                        (0, _) => format!("❌ {} action(s) encountered errors: {}", failed, command),
                        _ => format!(
                            "⚠️ {} succeeded, {} failed: {}",
                            succeeded, failed, command
                        ),
                    });
                    self.responses.extend(responses);
                    self.last_activity = Some(Local::now());
                }
                CommandEvent::Finished => {
                    self.processing = false;
                }
            }
        }
    }
}

/// Run a command task on its own task; a panic becomes a system error response
async fn run_guarded<F>(task: F) -> Vec<AgentResponse>
where
    F: Future<Output = Vec<AgentResponse>> + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(responses) => responses,
        Err(e) => {
            warn!(error = %e, "Command task failed");
            vec![AgentResponse::system_error("command task failed")]
        }
    }
}

async fn run_dashboard(ctx: AppContext) -> anyhow::Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(ctx);
    info!("Dashboard started");
    let result = dashboard_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

fn dashboard_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        app.process_command_events();

        terminal.draw(|frame| ui(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('i') | KeyCode::Enter => app.start_editing(),
                        KeyCode::Char('s') => app.open_suggestions(),
                        KeyCode::Char('w') => app.open_workflows(),
                        KeyCode::Char('c') => app.clear_responses(),
                        _ => {}
                    },
                    InputMode::Editing => match key.code {
                        KeyCode::Enter => app.confirm_input(),
                        KeyCode::Esc => app.cancel_input(),
                        KeyCode::Backspace => app.handle_backspace(),
                        KeyCode::Char(c) => app.handle_input(c),
                        _ => {}
                    },
                    InputMode::SelectSuggestion | InputMode::SelectWorkflow => match key.code {
                        KeyCode::Enter => app.confirm_input(),
                        KeyCode::Esc => app.cancel_input(),
                        KeyCode::Char('k') | KeyCode::Up => app.selection_up(),
                        KeyCode::Char('j') | KeyCode::Down => app.selection_down(),
                        _ => {}
                    },
                }
            }
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Command input
            Constraint::Min(0),    // Panels
            Constraint::Length(3), // Footer
        ])
        .split(area);

    // Header
    let processing_indicator = if app.processing { " ⏳ processing " } else { "" };
    let header_text = format!(
        " STREAMDESK - Multi-Agent Command Console  ({} commands){}",
        app.command_count, processing_indicator
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, main_layout[0]);

    // Command input
    let (input_text, input_style) = if app.input_mode == InputMode::Editing {
        (format!("{}▏", app.input_buffer), Style::default().fg(Color::Yellow))
    } else {
        (
            "Press [i] to type a command".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };
    let input_border = if app.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .title(" Command ")
            .borders(Borders::ALL)
            .border_style(input_border),
    );
    frame.render_widget(input, main_layout[1]);

    // Panels
    let panel_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(main_layout[2]);

    render_status_panel(frame, app, panel_layout[0]);

    let panels = [
        (Platform::Twitch, Color::Magenta),
        (Platform::Discord, Color::Blue),
        (Platform::Instagram, Color::LightRed),
    ];
    for ((platform, color), panel_area) in panels.iter().zip(panel_layout.iter().skip(1)) {
        let responses = app.responses_for(*platform);
        let items: Vec<ListItem> = responses
            .iter()
            .map(|response| {
                let style = match response.status {
                    ResponseStatus::Success => Style::default().fg(Color::White),
                    ResponseStatus::Error => Style::default().fg(Color::Red),
                    ResponseStatus::Pending => Style::default().fg(Color::Yellow),
                };
                let first_line = response.message.lines().next().unwrap_or("");
                ListItem::new(format!(
                    " {} {} {}",
                    response.status.icon(),
                    response.timestamp.with_timezone(&Local).format("%H:%M:%S"),
                    first_line
                ))
                .style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(format!(
                    "{} {} ({})",
                    platform.icon(),
                    platform.display_name(),
                    responses.len()
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(*color)),
        );
        frame.render_widget(list, *panel_area);
    }

    // Footer
    let footer_text = match app.input_mode {
        InputMode::Normal => app
            .status_message
            .as_deref()
            .unwrap_or(" [i]nput [s]uggestions [w]orkflows [c]lear [q]uit "),
        _ => app.status_message.as_deref().unwrap_or(""),
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, main_layout[3]);

    // Selection popups
    let popup = match app.input_mode {
        InputMode::SelectSuggestion => Some(("💡 Example Commands", Color::Yellow)),
        InputMode::SelectWorkflow => Some(("🔁 Workflows", Color::Cyan)),
        InputMode::Normal | InputMode::Editing => None,
    };
    if let Some((title, color)) = popup {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = app
            .selection_list
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let label = match app.input_mode {
                    InputMode::SelectWorkflow => {
                        let steps = app.config.get_workflow(entry).map_or(0, |s| s.len());
                        format!(" {} ({} steps)", entry, steps)
                    }
                    _ => format!(" {}", entry),
                };
                let style = if i == app.selected_index {
                    Style::default().bg(color).fg(Color::Black)
                } else {
                    Style::default()
                };
                ListItem::new(label).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(list, popup_area);
    }
}

fn render_status_panel(frame: &mut Frame, app: &App, area: Rect) {
    let state = if app.processing {
        Span::styled("Processing", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Idle", Style::default().fg(Color::Green))
    };
    let last_activity = app
        .last_activity
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".into());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Commands: ", Style::default().fg(Color::Gray)),
            Span::raw(app.command_count.to_string()),
        ]),
        Line::from(vec![
            Span::styled("State: ", Style::default().fg(Color::Gray)),
            state,
        ]),
        Line::from(vec![
            Span::styled("Last activity: ", Style::default().fg(Color::Gray)),
            Span::raw(last_activity),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Configured: ", Style::default().fg(Color::Gray)),
            Span::raw(format!(
                "{}/{}",
                app.config_status.configured_platforms, app.config_status.total_platforms
            )),
        ]),
    ];
    for result in &app.config_status.results {
        let (mark, mode, color) = if result.is_valid {
            ("✅", "live API", Color::Green)
        } else {
            ("⚠️", "demo mode", Color::Yellow)
        };
        lines.push(Line::from(vec![
            Span::raw(format!(" {} {} ", mark, result.platform.display_name())),
            Span::styled(mode, Style::default().fg(color)),
        ]));
    }

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" 📊 System Status ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, area);
}

/// Calculate centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
