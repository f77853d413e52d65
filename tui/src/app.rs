//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, paste, resize)
//! - TutorClient for orchestration
//! - DisplayState for rendering
//!
//! The App:
//! 1. Converts terminal events to SurfaceEvents
//! 2. Sends events to the embedded Tutor via TutorClient
//! 3. Receives TutorMessages and updates DisplayState
//! 4. Renders based on DisplayState and the board snapshot

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use tutor_core::{
    LlmBackend, NotifyLevel, PanelView, Point, SpeakTarget, StrokeSource, TutorState,
};

use crate::display::{BoardStatus, DisplayState};
use crate::input::{InputField, INPUT_PLACEHOLDER};
use crate::layout::{AppLayout, HitTarget};
use crate::theme::{
    DIM_GRAY, EMERALD, ERROR_RED, EXAMPLE_AMBER, PLAY_BLUE, SUCCESS_GREEN, TEXT_SLATE,
    WARNING_YELLOW,
};
use crate::tutor_client::TutorClient;
use crate::widgets::{BoardColors, BoardRaster, BoardTransform, BoardWidget, Button, DetailPanel};

/// Target ~30 FPS so stroke animations look smooth
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Title shown in the header
pub const TITLE: &str = "✍️  shijie汉字笔画学习器";

/// Subtitle shown under the title
pub const SUBTITLE: &str = "Interactive Stroke Order Practice Board";

/// Submit button label
pub const SUBMIT_LABEL: &str = "生成笔画";

/// Replay button label
pub const ANIMATE_LABEL: &str = "演示笔画";

/// Quiz button label
pub const QUIZ_LABEL: &str = "开始描红";

/// Shown under the board once strokes are loaded
pub const READY_TEXT: &str = "准备就绪！选择模式开始。";

/// Main application state
pub struct App<B: LlmBackend, S: StrokeSource> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Tutor Integration ===
    /// Client for communicating with the embedded Tutor
    client: TutorClient<B, S>,
    /// Display state derived from TutorMessages
    display: DisplayState,

    // === UI Components ===
    /// Screen regions
    layout: AppLayout,
    /// Cached stroke fills
    raster: BoardRaster,
    /// Stroke colors
    colors: BoardColors,

    // === Input State ===
    /// The single-glyph input field
    input: InputField,
    /// Stroke being dragged in quiz mode (canvas coordinates)
    drag: Vec<(f64, f64)>,
    /// Whether a drag started on the canvas
    dragging: bool,

    // === Misc State ===
    /// Last frame time (for timers)
    last_frame: Instant,
    /// Frame counter (for the spinner)
    frame_count: usize,
    /// Terminal area the layout was computed for
    area: Rect,
}

impl<B: LlmBackend + 'static, S: StrokeSource + 'static> App<B, S> {
    /// Create a new App for a terminal of `size` (columns, rows)
    pub fn new(client: TutorClient<B, S>, size: (u16, u16)) -> Self {
        let colors = BoardColors::from_config(client.board_config());
        let area = Rect::new(0, 0, size.0, size.1);
        Self {
            running: true,
            client,
            display: DisplayState::new(),
            layout: AppLayout::compute(area),
            raster: BoardRaster::new(),
            colors,
            input: InputField::new(),
            drag: Vec::new(),
            dragging: false,
            last_frame: Instant::now(),
            frame_count: 0,
            area,
        }
    }

    /// Main event loop
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.render(frame))?;

        self.start().await;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await,
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(FRAME_DURATION) => {}
            }

            self.tick().await;
            terminal.draw(|frame| self.render(frame))?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                tokio::time::sleep(FRAME_DURATION - elapsed).await;
            }
        }

        Ok(())
    }

    /// Start the Tutor (first lookup) and connect this surface
    pub async fn start(&mut self) {
        if let Err(e) = self.client.start().await {
            tracing::warn!(error = %e, "Tutor start error");
        }
        if let Err(e) = self.client.connect().await {
            tracing::warn!(error = %e, "Tutor connect error");
        }
        self.process_tutor_messages();
    }

    /// Poll the Tutor, apply its messages and advance timers
    pub async fn tick(&mut self) {
        self.client.poll().await;
        self.process_tutor_messages();

        let now = Instant::now();
        self.display.update(now - self.last_frame);
        self.last_frame = now;
        self.frame_count = self.frame_count.wrapping_add(1);

        if self.display.is_shutting_down() {
            self.running = false;
        }
    }

    /// Process all pending messages from the Tutor
    fn process_tutor_messages(&mut self) {
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
    }

    /// Dispatch one terminal event
    pub async fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse).await,
            Event::Paste(text) => self.input.paste(&text),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        let result = match key.code {
            // Quit
            KeyCode::Esc => self.quit().await,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit().await
            }

            // Submit
            KeyCode::Enter => self.submit().await,

            // Board and audio controls
            KeyCode::F(2) => self.client.animate().await,
            KeyCode::F(3) => self.client.quiz().await,
            KeyCode::F(5) => self.speak(SpeakTarget::Character).await,
            KeyCode::F(6) => self.speak(SpeakTarget::Example).await,

            // Typing
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                Ok(())
            }
            KeyCode::Backspace => {
                self.input.backspace();
                Ok(())
            }

            _ => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Tutor event failed");
        }
    }

    /// Handle mouse input
    pub async fn handle_mouse(&mut self, mouse: MouseEvent) {
        let result = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press(mouse.column, mouse.row).await
            }
            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                if let Some(point) = self.layout.canvas_point(mouse.column, mouse.row) {
                    self.drag.push(point);
                }
                Ok(())
            }
            MouseEventKind::Up(MouseButton::Left) if self.dragging => self.finish_drag().await,
            _ => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!(error = %e, "Tutor event failed");
        }
    }

    /// Left button pressed at a cell
    async fn press(&mut self, column: u16, row: u16) -> anyhow::Result<()> {
        match self.layout.hit(column, row, self.audio_available()) {
            Some(HitTarget::Submit) => self.submit().await,
            Some(HitTarget::Animate) => self.client.animate().await,
            Some(HitTarget::Quiz) => self.client.quiz().await,
            Some(HitTarget::SpeakCharacter) => self.speak(SpeakTarget::Character).await,
            Some(HitTarget::SpeakExample) => self.speak(SpeakTarget::Example).await,
            Some(HitTarget::Board) if self.client.in_quiz() => {
                self.dragging = true;
                self.drag.clear();
                self.drag.extend(self.layout.canvas_point(column, row));
                Ok(())
            }
            Some(HitTarget::Board) => self.client.board_clicked().await,
            Some(HitTarget::Input) | None => Ok(()),
        }
    }

    /// Whether the panel shows a record (and with it the audio buttons)
    fn audio_available(&self) -> bool {
        matches!(self.display.panel(), PanelView::Populated(_))
    }

    /// Read part of the shown record aloud
    async fn speak(&mut self, target: SpeakTarget) -> anyhow::Result<()> {
        if !self.audio_available() {
            tracing::debug!(?target, "Audio controls hidden");
            return Ok(());
        }
        self.client.speak(target).await
    }

    /// Left button released after drawing on the board
    async fn finish_drag(&mut self) -> anyhow::Result<()> {
        self.dragging = false;
        let drag = std::mem::take(&mut self.drag);
        if drag.len() < 2 {
            tracing::debug!("Ignoring click-sized stroke");
            return Ok(());
        }

        let transform = BoardTransform::new(self.client.board_config().padding_fraction());
        let points: Vec<Point> = drag
            .into_iter()
            .map(|(x, y)| transform.to_glyph(x, y))
            .collect();
        self.client.quiz_stroke(points).await
    }

    /// Submit the input field; Enter and the submit button both end up here
    async fn submit(&mut self) -> anyhow::Result<()> {
        self.client.submit(self.input.value().to_string()).await
    }

    /// Ask the Tutor to shut down and stop the loop
    async fn quit(&mut self) -> anyhow::Result<()> {
        self.running = false;
        self.client.request_quit().await?;
        self.process_tutor_messages();
        Ok(())
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        self.layout = AppLayout::compute(self.area);
        self.drag.clear();
        self.dragging = false;
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        if area != self.area {
            self.handle_resize(area.width, area.height);
        }

        self.render_header(frame);
        self.render_input(frame);
        self.render_board(frame);
        self.render_panel(frame);
        self.render_status(frame);
    }

    fn render_header(&self, frame: &mut Frame<'_>) {
        let header = Paragraph::new(vec![
            Line::styled(
                TITLE,
                Style::default().fg(TEXT_SLATE).add_modifier(Modifier::BOLD),
            ),
            Line::styled(SUBTITLE, Style::default().fg(DIM_GRAY)),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, self.layout.header);
    }

    fn render_input(&self, frame: &mut Frame<'_>) {
        let area = self.layout.input;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(EMERALD));
        let inner = block.inner(area);

        let text = if self.input.is_empty() {
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(DIM_GRAY))
        } else {
            Span::styled(
                self.input.value(),
                Style::default().fg(TEXT_SLATE).add_modifier(Modifier::BOLD),
            )
        };
        frame.render_widget(Paragraph::new(text).block(block), area);

        if inner.width > 0 && inner.height > 0 {
            let offset = u16::try_from(self.input.value().width()).unwrap_or(0);
            frame.set_cursor_position(Position::new(
                (inner.x + offset).min(inner.right().saturating_sub(1)),
                inner.y,
            ));
        }

        let busy = self.display.loading.then_some(self.frame_count);
        frame.render_widget(
            Button::new(SUBMIT_LABEL, EMERALD).busy(busy),
            self.layout.submit,
        );
    }

    fn render_board(&mut self, frame: &mut Frame<'_>) {
        let board_frame = self.client.board_frame(Instant::now());
        let widget = BoardWidget::new(
            board_frame.as_ref(),
            &self.display.board,
            self.client.board_config(),
            self.colors,
        )
        .drag(&self.drag);
        frame.render_stateful_widget(widget, self.layout.board, &mut self.raster);

        let (text, color) = match &self.display.board {
            BoardStatus::Ready(_) => (READY_TEXT.to_string(), DIM_GRAY),
            BoardStatus::Failed { error, .. } => (format!("无法绘制: {error}"), ERROR_RED),
            BoardStatus::Loading(_) | BoardStatus::Empty => (String::new(), DIM_GRAY),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(color)))
                .alignment(Alignment::Center),
            self.layout.ready_line,
        );

        frame.render_widget(
            Button::new(ANIMATE_LABEL, PLAY_BLUE).hint("F2"),
            self.layout.animate,
        );
        frame.render_widget(
            Button::new(QUIZ_LABEL, TEXT_SLATE).hint("F3"),
            self.layout.quiz,
        );
    }

    fn render_panel(&self, frame: &mut Frame<'_>) {
        let view = self.display.panel();
        frame.render_widget(DetailPanel::new(view), self.layout.panel);

        if matches!(view, PanelView::Populated(_)) {
            frame.render_widget(
                Button::new("🔊 读字", EMERALD).hint("F5"),
                self.layout.speak_character,
            );
            frame.render_widget(
                Button::new("🔊 读例句", EXAMPLE_AMBER).hint("F6"),
                self.layout.speak_example,
            );
        }
    }

    fn render_status(&self, frame: &mut Frame<'_>) {
        let keys = "Enter 生成 | F2 演示 | F3 描红 | F5/F6 朗读 | Esc 退出";

        let line = if let Some(n) = &self.display.notification {
            let color = match n.level {
                NotifyLevel::Info => TEXT_SLATE,
                NotifyLevel::Warning => WARNING_YELLOW,
                NotifyLevel::Error => ERROR_RED,
                NotifyLevel::Success => SUCCESS_GREEN,
            };
            Line::from(vec![
                Span::styled(format!(" {} ", n.message), Style::default().fg(color)),
                Span::styled(format!("| {keys}"), Style::default().fg(DIM_GRAY)),
            ])
        } else {
            let state_style = match self.display.tutor_state {
                TutorState::Fetching => Style::default().fg(EMERALD),
                _ => Style::default().fg(DIM_GRAY),
            };
            let model = if self.display.session_model.is_empty() {
                String::new()
            } else {
                format!(" ({})", self.display.session_model)
            };
            Line::from(vec![
                Span::styled(
                    format!(" {}{model} ", self.display.tutor_state.description()),
                    state_style,
                ),
                Span::styled(format!("| {keys}"), Style::default().fg(DIM_GRAY)),
            ])
        };
        frame.render_widget(Paragraph::new(line), self.layout.status);
    }

    // === Accessors ===

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// The input field
    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// Screen regions
    pub fn layout(&self) -> &AppLayout {
        &self.layout
    }

    /// The embedded Tutor client
    pub fn client(&self) -> &TutorClient<B, S> {
        &self.client
    }

    /// Get the goodbye message for display after TUI closes
    pub fn goodbye(&self) -> Option<&str> {
        self.display.goodbye.as_deref()
    }
}
