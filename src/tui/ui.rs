//! UI rendering for the TUI.
//!
//! Handles layout and widget rendering using ratatui.
//! One draw function per wizard screen, plus the attach-clip overlay.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
    Frame,
};

use crate::app::{InterviewFocus, FORM_FIELDS};
use crate::core::Screen;
use crate::App;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    match app.session.screen() {
        Screen::Welcome => draw_welcome(frame, app),
        Screen::LoadingGaps => draw_processing(frame, app, "Identifying knowledge topics..."),
        Screen::Interview => {
            draw_interview(frame, app);
            if app.attach_input.is_some() {
                draw_attach_overlay(frame, app);
            }
        }
        Screen::Finalizing => draw_processing(frame, app, "Finalizing handover document..."),
        Screen::Completed => draw_completed(frame, app),
    }
}

/// Welcome screen: the identity form.
fn draw_welcome(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(60, 60, frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.primary))
        .title(" handoff ")
        .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
        .padding(Padding::new(2, 2, 1, 1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // intro
            Constraint::Length(3), // name
            Constraint::Length(3), // role
            Constraint::Length(3), // department
            Constraint::Length(2), // status
            Constraint::Min(1),    // hints
        ])
        .split(inner);

    let intro = Paragraph::new(
        "Before you go, let's capture what only you know.\n\
         Tell us who you are and we'll build your interview.",
    )
    .style(Style::default().fg(theme.text_dim))
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, chunks[0]);

    for (i, label) in FORM_FIELDS.iter().enumerate() {
        let focused = app.form.focus == i;
        let border_color = if focused { theme.primary } else { theme.border };
        let mut spans = vec![Span::styled(
            app.form.values[i].clone(),
            Style::default().fg(theme.text),
        )];
        if focused {
            spans.push(Span::styled("│", Style::default().fg(theme.border)));
        }
        let field = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(format!(" {label} ")),
        );
        frame.render_widget(field, chunks[i + 1]);
    }

    if let Some(message) = &app.status_message {
        let status = Paragraph::new(message.as_str())
            .style(Style::default().fg(theme.error))
            .wrap(Wrap { trim: true });
        frame.render_widget(status, chunks[4]);
    }

    let hints = Paragraph::new("Tab next field · Enter start interview · Esc quit")
        .style(Style::default().fg(theme.text_muted))
        .alignment(Alignment::Center);
    frame.render_widget(hints, chunks[5]);
}

/// Full-screen spinner for the two processing states.
fn draw_processing(frame: &mut Frame, app: &App, message: &str) {
    let theme = &app.theme;
    let area = centered_rect(50, 20, frame.area());

    let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    let lines = vec![
        Line::from(Span::styled(
            format!("{spinner} {message}"),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This usually takes a few seconds.",
            Style::default().fg(theme.text_dim),
        )),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(paragraph, area);
}

/// Interview screen: topic sidebar, question card, answer editor, footer.
fn draw_interview(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(40)])
        .split(frame.area());

    draw_sidebar(frame, app, chunks[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // progress
            Constraint::Min(8),    // question card
            Constraint::Length(8), // answer editor
            Constraint::Length(2), // footer
        ])
        .split(chunks[1]);

    draw_progress(frame, app, main[0]);
    draw_question_card(frame, app, main[1]);
    draw_answer_editor(frame, app, main[2]);
    draw_footer(frame, app, main[3]);
}

/// Topic list with answered/active markers.
fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == InterviewFocus::Topics;

    let items: Vec<ListItem> = app
        .session
        .gaps()
        .iter()
        .enumerate()
        .map(|(i, gap)| {
            let active = i == app.session.current_index();
            let answered = app
                .session
                .answer_for(&gap.id)
                .is_some_and(|answer| answer.is_answered());

            let (marker, marker_color) = if app.is_transcribing(&gap.id) {
                ("◌", theme.warning)
            } else if active {
                ("▸", theme.primary)
            } else if answered {
                ("●", theme.success)
            } else {
                ("○", theme.text_muted)
            };

            let style = if active {
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_dim)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(marker_color)),
                Span::styled(gap.title.clone(), style),
            ]))
        })
        .collect();

    let border_color = if focused { theme.primary } else { theme.border };
    let user_line = app
        .session
        .user()
        .map(|user| format!(" {} · {} ", user.name, user.role))
        .unwrap_or_default();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(" Interview Topics ")
                .title_style(Style::default().fg(theme.primary))
                .title_bottom(Line::from(user_line).left_aligned())
                .title_style(Style::default().fg(theme.text_muted)),
        )
        .highlight_style(Style::default().bg(theme.selected_bg));

    let mut state = ListState::default();
    state.select(Some(app.topic_cursor.min(app.session.gaps().len().saturating_sub(1))));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Progress gauge across the topic list.
fn draw_progress(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let total = app.session.gaps().len().max(1);
    let current = app.session.current_index() + 1;

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)))
        .gauge_style(Style::default().fg(theme.primary))
        .ratio(current as f64 / total as f64)
        .label(format!("Topic {current} of {total}"));
    frame.render_widget(gauge, area);
}

/// The current topic's question script.
fn draw_question_card(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let Some(gap) = app.session.current_gap() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            gap.title.clone(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(gap.summary.clone(), Style::default().fg(theme.text_dim))),
        Line::from(""),
        Line::from(Span::styled(
            gap.primary_question.clone(),
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Memory trigger: ", Style::default().fg(theme.accent)),
            Span::styled(gap.memory_prompt.clone(), Style::default().fg(theme.text_dim)),
        ]),
        Line::from(vec![
            Span::styled("Follow-up: ", Style::default().fg(theme.accent)),
            Span::styled(gap.follow_up_question.clone(), Style::default().fg(theme.text_dim)),
        ]),
    ];

    if let Some(answer) = app.session.current_answer() {
        if let Some(path) = &answer.video_path {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("🎥 {}", path.display()),
                Style::default().fg(theme.secondary),
            )));
        }
    }

    let card = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" Question ")
            .title_style(Style::default().fg(theme.primary))
            .padding(Padding::new(1, 1, 0, 0)),
    );
    frame.render_widget(card, area);
}

/// The free-text answer editor.
fn draw_answer_editor(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == InterviewFocus::Answer;
    let border_color = if focused { theme.primary } else { theme.border };

    let mut text = app.answer_input.clone();
    if focused {
        text.push('│');
    }
    let content = if app.answer_input.is_empty() && !focused {
        Paragraph::new("Type your answer, or press Ctrl+O to attach a recorded clip.")
            .style(Style::default().fg(theme.text_muted))
    } else {
        Paragraph::new(text).style(Style::default().fg(theme.text))
    };

    frame.render_widget(
        content.wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(" Your Answer ")
                .title_style(Style::default().fg(theme.primary)),
        ),
        area,
    );
}

/// Key hints and the status line.
fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let on_last = app.session.current_index() + 1 == app.session.gaps().len();
    let next_hint = if on_last { "PgDn finish" } else { "PgDn next" };

    let hints = format!(
        "Tab focus · PgUp previous · {next_hint} · Ctrl+O attach clip · Ctrl+S save · Ctrl+E exit"
    );
    let mut lines = vec![Line::from(Span::styled(hints, Style::default().fg(theme.text_muted)))];
    if let Some(message) = &app.status_message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(theme.warning),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Completed screen: the handover document.
fn draw_completed(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // document
            Constraint::Length(2), // footer
        ])
        .split(frame.area());

    let subtitle = app
        .session
        .user()
        .map(|user| format!("Generated for {} · {}", user.name, user.role))
        .unwrap_or_default();
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Handover Document Ready",
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, Style::default().fg(theme.text_dim))),
    ])
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(theme.border)));
    frame.render_widget(header, chunks[0]);

    let document = app.session.document().unwrap_or_default();
    let body = Paragraph::new(document)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: false })
        .scroll((app.doc_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .padding(Padding::new(1, 1, 0, 0)),
        );
    frame.render_widget(body, chunks[1]);

    let exported = app
        .exported_to
        .as_ref()
        .map(|path| format!(" · saved to {}", path.display()))
        .unwrap_or_default();
    let mut lines = vec![Line::from(Span::styled(
        format!("↑/↓ scroll · e export markdown{exported} · r new session · q quit"),
        Style::default().fg(theme.text_muted),
    ))];
    if let Some(message) = &app.status_message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(theme.secondary),
        )));
    }
    frame.render_widget(Paragraph::new(lines), chunks[2]);
}

/// Path input overlay for attaching a recorded clip.
fn draw_attach_overlay(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let path = app.attach_input.as_deref().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(
            "Path to your recorded clip (.mp4, .webm, .mov):",
            Style::default().fg(theme.text_dim),
        )),
        Line::from(vec![
            Span::styled(path.to_string(), Style::default().fg(theme.text)),
            Span::styled("│", Style::default().fg(theme.border)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter attach & transcribe · Esc cancel",
            Style::default().fg(theme.text_muted),
        )),
    ];

    let overlay = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(" Attach Clip ")
            .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
            .padding(Padding::new(1, 1, 0, 0)),
    );
    frame.render_widget(overlay, area);
}

/// Create a centered rectangle with the given percentage dimensions.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}
