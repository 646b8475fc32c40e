//! TUI views and rendering
//!
//! All rendering logic is contained here. The views module draws the UI
//! from AppState but never modifies state.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::trace;

use super::state::{AppState, InteractionMode};
use crate::capture::ImagePayload;
use crate::domain::AnalysisResult;
use crate::present::{BadgeTone, MAINTENANCE_TIPS, TaskCard, headline, present};
use crate::session::{FailureNotice, NoticeKind, ViewState};

/// Palette
mod colors {
    use ratatui::style::Color;

    pub const ACCENT: Color = Color::Rgb(99, 102, 241); // Indigo
    pub const HEADER: Color = Color::Rgb(129, 140, 248);
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const ROSE: Color = Color::Rgb(244, 63, 94);
    pub const AMBER: Color = Color::Rgb(245, 158, 11);
    pub const EMERALD: Color = Color::Rgb(16, 185, 129);
    pub const DIM: Color = Color::DarkGray;
}

fn tone_color(tone: BadgeTone) -> Color {
    match tone {
        BadgeTone::Rose => colors::ROSE,
        BadgeTone::Amber => colors::AMBER,
        BadgeTone::Emerald => colors::EMERALD,
    }
}

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    trace!(view = state.session.view().name(), "render: called");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    match state.session.view() {
        ViewState::Home => render_home(frame, chunks[1]),
        ViewState::Analyzing { payload, .. } => render_analyzing(state, payload, frame, chunks[1]),
        ViewState::Result(result) => render_result(state, result, frame, chunks[1]),
        ViewState::Tips => render_tips(frame, chunks[1]),
    }

    render_footer(state, frame, chunks[2]);

    // Overlays; a notice sits on top of everything
    match &state.interaction_mode {
        InteractionMode::Help => render_help_overlay(frame, frame.area()),
        InteractionMode::ConfirmQuit => render_confirm_quit(frame, frame.area()),
        _ => {}
    }
    if let Some(notice) = state.session.notice() {
        render_notice(notice, frame, frame.area());
    }
}

/// Render header with title and view tabs
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_header: called");
    let active = state.session.view().name();

    let mut spans = vec![
        Span::styled(" Declutter", Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
        Span::styled(" Your Personal Organizing Coach", Style::default().fg(colors::DIM)),
        Span::raw(" │ "),
    ];
    for (idx, name) in ["Home", "Analyzing", "Result", "Tips"].iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(colors::DIM)));
        }
        let style = if *name == active {
            Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors::DIM)
        };
        spans.push(Span::styled(*name, style));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_home(frame: &mut Frame, area: Rect) {
    trace!("render_home: called");
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Feeling Overwhelmed?", bold.fg(colors::ACCENT))),
        Line::from(""),
        Line::from(
            "Take a photo of your messy room. The AI will spot the clutter and give you \
             a simple step-by-step plan to get it organized.",
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("[c]", bold.fg(colors::KEYBIND)),
            Span::styled(" Start Scanning", bold),
            Span::styled("  (or paste / drop an image file here)", Style::default().fg(colors::DIM)),
        ]),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("Why Declutter?", bold)),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Scan ", Style::default().fg(colors::AMBER).add_modifier(Modifier::BOLD)),
            Span::styled("Cluster Detection", bold),
            Span::raw("  Spots hidden piles you have grown blind to."),
        ]),
        Line::from(vec![
            Span::styled("  Buy  ", Style::default().fg(colors::EMERALD).add_modifier(Modifier::BOLD)),
            Span::styled("Product Match", bold),
            Span::raw("  Knows exactly which bins you need."),
        ]),
    ];

    let home = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Home "))
        .wrap(Wrap { trim: true });
    frame.render_widget(home, area);
}

fn render_analyzing(state: &AppState, payload: &ImagePayload, frame: &mut Frame, area: Rect) {
    trace!("render_analyzing: called");
    let elapsed = state
        .analysis_started
        .map(|started| format!("{}s", started.elapsed().as_secs()))
        .unwrap_or_default();
    let preview = &payload.preview;

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(state.spinner(), Style::default().fg(colors::ACCENT)),
            Span::styled(
                " Analyzing Your Space",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", elapsed), Style::default().fg(colors::DIM)),
        ]),
        Line::from(Span::styled(
            "Identifying objects and finding logic in the mess.",
            Style::default().fg(colors::DIM),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Image: ", Style::default().fg(colors::DIM)),
            Span::styled(preview.file_name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Path:  ", Style::default().fg(colors::DIM)),
            Span::raw(preview.path.display().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Size:  ", Style::default().fg(colors::DIM)),
            Span::raw(format!("{} ({})", preview.size_label(), payload.mime())),
        ]),
    ];

    let analyzing = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Analyzing "))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(analyzing, area);
}

fn render_result(state: &AppState, result: &AnalysisResult, frame: &mut Frame, area: Rect) {
    trace!(task_count = result.tasks.len(), "render_result: called");
    let head = headline(result);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Time: {}", head.estimated_time),
            Style::default().fg(colors::ACCENT),
        )),
        Line::from(""),
        Line::from(Span::styled(
            head.vibe_check,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(head.summary),
        Line::from(""),
        Line::from(Span::styled(
            format!("ACTION ITEMS ({})", head.task_count),
            Style::default().fg(colors::DIM).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for card in present(result) {
        lines.extend(card_lines(&card));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("[r]", Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD)),
        Span::styled(" Clear Room and Start Fresh", Style::default().add_modifier(Modifier::BOLD)),
    ]));

    let view = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Result "))
        .wrap(Wrap { trim: false })
        .scroll((state.result_scroll, 0));
    frame.render_widget(view, area);
}

/// Lines for one task card
fn card_lines(card: &TaskCard) -> Vec<Line<'static>> {
    let color = tone_color(card.badge.tone);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(card.number(), Style::default().fg(colors::DIM)),
            Span::raw(" "),
            Span::styled(card.item.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!(" {} ", card.badge.label()),
                Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("   Currently: {}", card.location),
            Style::default().fg(colors::DIM),
        )),
        Line::from(vec![
            Span::styled("   Observation: ", Style::default().fg(colors::DIM)),
            Span::raw(card.problem.clone()),
        ]),
        Line::from(vec![
            Span::styled("   AI Recommendation: ", Style::default().fg(colors::ACCENT)),
            Span::raw(card.suggestion.clone()),
        ]),
    ];

    if let Some(tip) = &card.shopping_tip {
        lines.push(Line::from(vec![
            Span::styled("   Pro Tip: ", Style::default().fg(colors::EMERALD)),
            Span::raw(tip.clone()),
        ]));
    }
    lines
}

fn render_tips(frame: &mut Frame, area: Rect) {
    trace!("render_tips: called");
    let mut lines = vec![
        Line::from(Span::styled(
            "Maintenance Hacks",
            Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for tip in MAINTENANCE_TIPS {
        lines.push(Line::from(Span::styled(
            tip.tag,
            Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(tip.title, Style::default().add_modifier(Modifier::BOLD))));
        lines.push(Line::from(Span::styled(tip.body, Style::default().fg(colors::DIM))));
        lines.push(Line::from(""));
    }

    let tips = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Tips "))
        .wrap(Wrap { trim: true });
    frame.render_widget(tips, area);
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!(?state.interaction_mode, "render_footer: called");
    let key_style = Style::default().fg(colors::KEYBIND).add_modifier(Modifier::BOLD);

    let content = match &state.interaction_mode {
        InteractionMode::PathInput(text) => Line::from(vec![
            Span::styled("Image path: ", key_style),
            Span::raw(text.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::styled("  (Enter to analyze, Esc to cancel)", Style::default().fg(colors::DIM)),
        ]),
        _ => {
            let keybinds = match state.session.view() {
                ViewState::Home => vec![("[c]", "Scan"), ("[t]", "Tips")],
                ViewState::Analyzing { .. } => vec![],
                ViewState::Result(_) => vec![("[j/k]", "Scroll"), ("[r]", "Start Fresh"), ("[c]", "Scan Again")],
                ViewState::Tips => vec![("[h]", "Home"), ("[c]", "Scan")],
            };

            let mut spans = vec![Span::raw(" ")];
            for (key, action) in keybinds.into_iter().chain([("[?]", "Help"), ("[q]", "Quit")]) {
                spans.push(Span::styled(key, key_style));
                spans.push(Span::raw(format!(" {} ", action)));
            }
            Line::from(spans)
        }
    };

    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Render the blocking failure notice
fn render_notice(notice: &FailureNotice, frame: &mut Frame, area: Rect) {
    trace!(?notice.kind, "render_notice: called");
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let color = match notice.kind {
        NoticeKind::CaptureRejected => colors::AMBER,
        NoticeKind::TransportError | NoticeKind::MalformedResponse => colors::ROSE,
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.title.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(notice.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("Enter / Esc: dismiss", Style::default().fg(colors::DIM))),
    ];

    let widget = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(" Notice ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, popup_area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    trace!("render_help_overlay: called");
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )]),
        Line::from(""),
        key_line("c / o / s", "Scan an image (type or paste a path)"),
        key_line("paste/drop", "Scan the pasted file directly"),
        key_line("t", "Maintenance tips"),
        key_line("h / Esc", "Back to Home"),
        key_line("r", "Clear result and start fresh"),
        key_line("j/↓ k/↑", "Scroll result"),
        key_line("?", "Toggle help"),
        key_line("q", "Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (any key to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Helper to create a key binding line
fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

fn render_confirm_quit(frame: &mut Frame, area: Rect) {
    trace!("render_confirm_quit: called");
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let content = vec![
        Line::from(""),
        Line::from("An analysis is still running. Quit anyway?"),
        Line::from(""),
        Line::from(Span::styled("y: quit  n / Esc: keep waiting", Style::default().fg(colors::DIM))),
    ];

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(dialog, popup_area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
