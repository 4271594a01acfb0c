use crate::session::SessionState;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

fn hint<'a>(key: &'a str, action: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(format!(" {action}  ")),
    ]
}

/// One-line key reference for the current screen.
pub fn key_hints(state: SessionState, prompt_open: bool) -> Line<'static> {
    let pairs: &[(&str, &str)] = if prompt_open {
        &[("Enter", "Submit"), ("Esc", "Cancel"), ("Ctrl-C", "Quit")]
    } else {
        match state {
            SessionState::Listing => &[
                ("↑/↓", "Select"),
                ("Enter", "Run"),
                ("x", "Toggle CSV"),
                ("tab", "Settings"),
                ("q", "Quit"),
            ],
            SessionState::Configuring => &[
                ("Enter", "Next / Save & Return"),
                ("tab", "Tools"),
                ("Ctrl-C", "Quit"),
            ],
            SessionState::Running => &[("Ctrl-C", "Quit")],
            SessionState::ShowingOutput => &[
                ("Esc", "Back"),
                ("↑/↓ PgUp/PgDn", "Scroll"),
                ("y", "Copy saved path"),
            ],
        }
    };
    Line::from(
        pairs
            .iter()
            .flat_map(|&(key, action)| hint(key, action))
            .collect::<Vec<_>>(),
    )
}
