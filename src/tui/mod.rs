mod clipboard;
mod help;
mod input;
mod view;

use crate::catalog;
use crate::engine::{CommandEngine, Environment};
use crate::model::AppEvent;
use crate::orchestrator::{self, UiCommand};
use crate::session::{Effect, Message, Session, Ticker};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run() -> Result<()> {
    // Unbounded channels avoid backpressure and task switching in the hot path.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let engine = CommandEngine::new(Environment::from_process());
    let res = orchestrator::run_controller(engine, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut event_rx: UnboundedReceiver<AppEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // Session is owned by the UI thread only; no cross-thread mutation.
    let mut session = Session::new(catalog::tools().to_vec());
    let mut ticker = Ticker::default();

    if let Ok(size) = terminal.size() {
        let resize = Message::Resize {
            height: size.height,
        };
        session = dispatch(session, resize, &mut ticker, &cmd_tx).0;
    }

    let frame_rate = Duration::from_millis(100);
    let mut last_frame: Option<Instant> = None;

    let res = loop {
        // Drain events without blocking to keep UI responsive.
        let mut quit = false;
        while let Ok(AppEvent::CommandFinished { outcome }) = event_rx.try_recv() {
            let (next, q) = dispatch(session, Message::CommandFinished(outcome), &mut ticker, &cmd_tx);
            session = next;
            quit |= q;
        }
        if quit {
            break Ok(());
        }

        if ticker.poll(Instant::now()) {
            let (next, q) = dispatch(session, Message::Tick, &mut ticker, &cmd_tx);
            session = next;
            if q {
                break Ok(());
            }
        }

        if last_frame.map_or(true, |t| t.elapsed() >= frame_rate) {
            terminal.draw(|f| view::draw(f.area(), f, &session)).ok();
            last_frame = Some(Instant::now());
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            let msg = match event::read() {
                Ok(Event::Key(k)) => input::map_key(k).map(Message::Key),
                Ok(Event::Resize(_, height)) => Some(Message::Resize { height }),
                _ => None,
            };
            if let Some(msg) = msg {
                let (next, q) = dispatch(session, msg, &mut ticker, &cmd_tx);
                session = next;
                // Redraw right away so typing does not lag behind the frame clock.
                last_frame = None;
                if q {
                    break Ok(());
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

/// Feed one message to the session and carry out its effects. Returns true on quit.
fn dispatch(
    session: Session,
    msg: Message,
    ticker: &mut Ticker,
    cmd_tx: &UnboundedSender<UiCommand>,
) -> (Session, bool) {
    let (mut session, effects) = session.update(msg);
    let mut quit = false;
    for effect in effects {
        match effect {
            Effect::Launch(request) => {
                if cmd_tx.send(UiCommand::Launch(Box::new(request))).is_err() {
                    tracing::error!("controller gone, cannot launch");
                    session.notice = Some("Command runner stopped; restart VOLTAS.".into());
                }
            }
            Effect::ArmTicker => ticker.arm(Instant::now()),
            Effect::CopyToClipboard(path) => {
                session.notice = Some(match clipboard::copy_to_clipboard(&path) {
                    Ok(()) => format!("Copied {path}"),
                    Err(e) => format!("Copy failed: {e:#}"),
                });
            }
            Effect::Quit => {
                let _ = cmd_tx.send(UiCommand::Quit);
                quit = true;
            }
        }
    }
    (session, quit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Key, SessionState};

    fn configured() -> Session {
        let mut session = Session::new(catalog::tools().to_vec());
        for c in "/cases/mem.raw".chars() {
            session = session.update(Message::Key(Key::Char(c))).0;
        }
        session = session.update(Message::Key(Key::Enter)).0;
        session.update(Message::Key(Key::Enter)).0
    }

    #[test]
    fn launch_effect_reaches_controller_and_arms_ticker() {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::default();
        let mut session = configured();
        // PsList has no placeholders.
        session.selected = catalog::tools()
            .iter()
            .position(|t| t.title == "PsList")
            .unwrap();

        let (session, quit) = dispatch(session, Message::Key(Key::Enter), &mut ticker, &cmd_tx);
        assert!(!quit);
        assert_eq!(session.state, SessionState::Running);
        assert!(ticker.poll(Instant::now() + Duration::from_secs(1)));
        match cmd_rx.try_recv() {
            Ok(UiCommand::Launch(req)) => assert_eq!(req.tool.tool.title, "PsList"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn interrupt_sends_quit() {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::default();
        let (_, quit) = dispatch(configured(), Message::Key(Key::Interrupt), &mut ticker, &cmd_tx);
        assert!(quit);
        assert!(matches!(cmd_rx.try_recv(), Ok(UiCommand::Quit)));
    }
}
