use crate::catalog;
use crate::engine::image_file_name;
use crate::model::ExportMode;
use crate::session::{ConfigField, PromptModal, Session, SessionState, TextField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

const ACCENT: Color = Color::Magenta;

pub fn draw(area: Rect, f: &mut ratatui::Frame, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    let tab = match session.state {
        SessionState::Configuring => 1,
        _ => 0,
    };
    let tabs = Tabs::new(vec![Line::from("1. TOOLS"), Line::from("2. SETTINGS")])
        .select(tab)
        .block(Block::default().borders(Borders::ALL).title("VOLTAS"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match session.state {
        SessionState::Listing => draw_listing(chunks[1], f, session),
        SessionState::Configuring => draw_settings(chunks[1], f, session),
        SessionState::Running => draw_running(chunks[1], f, session),
        SessionState::ShowingOutput => draw_output(chunks[1], f, session),
    }

    let notice = session.notice.as_deref().unwrap_or("");
    f.render_widget(
        Paragraph::new(Span::styled(notice, Style::default().fg(Color::Yellow))),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new(super::help::key_hints(session.state, session.prompt.is_some())),
        chunks[3],
    );

    if let Some(modal) = &session.prompt {
        draw_prompt(area, f, modal);
    }
}

fn mode_badge(mode: ExportMode) -> Span<'static> {
    match mode {
        ExportMode::Pretty => Span::styled(
            " MODE: PRETTY (Press X for CSV) ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        ExportMode::Csv => Span::styled(
            " CSV EXPORT (Press X to reset) ",
            Style::default().fg(Color::Black).bg(Color::Green),
        ),
    }
}

/// List rows: a header per category followed by its tools. Returns the rows and the row of
/// the selected tool.
fn tool_rows(session: &Session) -> (Vec<ListItem<'static>>, Option<usize>) {
    let mut rows = Vec::new();
    let mut selected_row = None;
    for (category, members) in catalog::groups(session.tools()) {
        rows.push(ListItem::new(Line::from(Span::styled(
            format!("── {} ──", category.label()),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        ))));
        for (idx, tool) in members {
            if idx == session.selected {
                selected_row = Some(rows.len());
            }
            rows.push(ListItem::new(vec![
                Line::from(Span::styled(
                    tool.title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  [{}] {}", tool.category, tool.description),
                    Style::default().fg(Color::Gray),
                )),
            ]));
        }
    }
    (rows, selected_row)
}

fn draw_listing(area: Rect, f: &mut ratatui::Frame, session: &Session) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)].as_ref())
        .split(area);

    let image = if session.config.memory_image_path.is_empty() {
        "None"
    } else {
        image_file_name(&session.config.memory_image_path)
    };
    let status = Line::from(vec![
        mode_badge(session.config.export_mode),
        Span::raw("  "),
        Span::styled("Image: ", Style::default().fg(Color::Gray)),
        Span::raw(image.to_string()),
    ]);
    f.render_widget(Paragraph::new(status), rows[0]);

    let (items, selected_row) = tool_rows(session);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Forensic Tools"))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(selected_row);
    f.render_stateful_widget(list, rows[1], &mut state);
}

fn field_line<'a>(label: &'a str, field: &'a TextField, placeholder: &'a str, focused: bool) -> Vec<Line<'a>> {
    let label_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let value = if field.is_empty() {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(field.value())
    };
    let mut input = vec![Span::raw(if focused { "> " } else { "  " }), value];
    if focused {
        input.push(Span::styled("█", Style::default().fg(ACCENT)));
    }
    vec![Line::from(Span::styled(label, label_style)), Line::from(input), Line::from("")]
}

fn draw_settings(area: Rect, f: &mut ratatui::Frame, session: &Session) {
    let mut lines = vec![
        Line::from(Span::styled(
            "SESSION CONFIGURATION",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(field_line(
        "Memory Image Path:",
        &session.image_input,
        "C:\\Cases\\memdump.mem",
        session.focus == Some(ConfigField::Image),
    ));
    lines.extend(field_line(
        "Output Directory:",
        &session.output_input,
        "C:\\Cases\\Output",
        session.focus == Some(ConfigField::Output),
    ));
    lines.push(Line::from(Span::styled(
        "[Enter] Save & Return",
        Style::default().fg(Color::Green),
    )));
    if !session.config.is_configured() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "A memory image is required before any tool can run.",
            Style::default().fg(Color::Yellow),
        )));
    }

    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Settings"));
    f.render_widget(form, area);
}

fn draw_running(area: Rect, f: &mut ratatui::Frame, session: &Session) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let title = session.current.as_ref().map(|t| t.tool.title).unwrap_or("-");
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Processing {title}...")),
        )
        .gauge_style(Style::default().fg(ACCENT))
        .ratio(session.progress.ratio())
        .label(format!("{}%", session.progress.percent()));
    f.render_widget(gauge, rows[1]);
}

fn draw_output(area: Rect, f: &mut ratatui::Frame, session: &Session) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(area);

    let title = session.current.as_ref().map(|t| t.tool.title).unwrap_or("-");
    let banner = Line::from(Span::styled(
        format!(" OUTPUT: {title} | SAVED TO: {} ", session.output.filename),
        Style::default().fg(Color::Black).bg(ACCENT),
    ));
    f.render_widget(Paragraph::new(banner), rows[0]);

    let body = Paragraph::new(session.output.text.as_str())
        .block(Block::default().borders(Borders::ALL))
        .scroll((session.output.scroll, 0));
    f.render_widget(body, rows[1]);

    let status = session
        .last_run
        .as_ref()
        .map(|r| r.save_status.message())
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(status, Style::default().fg(Color::Gray)),
            Span::raw("  Esc: Back"),
        ])),
        rows[2],
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_prompt(area: Rect, f: &mut ratatui::Frame, modal: &PromptModal) {
    let popup = centered(area, 60, 7);
    f.render_widget(Clear, popup);

    let value = if modal.input.is_empty() {
        Span::styled(modal.placeholder.prompt_hint(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(modal.input.value())
    };
    let lines = vec![
        Line::from(Span::styled(
            format!("Tool: {}", modal.tool.title),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![Span::raw("> "), value, Span::styled("█", Style::default().fg(ACCENT))]),
    ];
    let form = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(modal.placeholder.prompt_title()),
        );
    f.render_widget(form, popup);
}
