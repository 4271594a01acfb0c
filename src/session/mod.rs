//! Session controller.
//!
//! All mutable state of an interactive session lives in one [`Session`] value. Every input,
//! timer tick and command completion is a [`Message`]; [`Session::update`] consumes the session
//! and returns the next one together with the [`Effect`]s the UI loop has to carry out.

mod input;
mod ticker;

pub use input::{Key, TextField};
pub use ticker::Ticker;
use ticker::Progress;

use crate::model::{
    CommandOutcome, ResolvedTool, RunRecord, RunRequest, SessionConfig, ToolDescriptor,
};
use crate::resolver::{clean_path, Placeholder, Resolution, Step};

/// Lines moved by PageUp/PageDown before the viewport height is known.
const DEFAULT_PAGE: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Listing,
    Configuring,
    Running,
    ShowingOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Image,
    Output,
}

#[derive(Debug, Clone)]
pub enum Message {
    Key(Key),
    Tick,
    /// Terminal height in rows; sizes PageUp/PageDown steps.
    Resize { height: u16 },
    CommandFinished(Box<CommandOutcome>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the command generator for this request.
    Launch(RunRequest),
    /// Schedule the next progress tick.
    ArmTicker,
    CopyToClipboard(String),
    Quit,
}

/// Parameter form shown over the tool list while placeholders are being filled in.
#[derive(Debug, Clone)]
pub struct PromptModal {
    pub tool: ToolDescriptor,
    pub placeholder: Placeholder,
    pub input: TextField,
    resolution: Resolution,
}

#[derive(Debug, Clone, Default)]
pub struct OutputView {
    pub text: String,
    pub filename: String,
    pub scroll: u16,
}

impl OutputView {
    fn max_scroll(&self) -> u16 {
        u16::try_from(self.text.lines().count().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
        self.scroll = u16::try_from(next).unwrap_or(0);
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub state: SessionState,
    pub config: SessionConfig,
    tools: Vec<ToolDescriptor>,
    pub selected: usize,
    pub image_input: TextField,
    pub output_input: TextField,
    pub focus: Option<ConfigField>,
    pub prompt: Option<PromptModal>,
    pub progress: Progress,
    /// Tool of the latest confirmed run, with substituted arguments.
    pub current: Option<ResolvedTool>,
    pub last_run: Option<RunRecord>,
    pub output: OutputView,
    pub notice: Option<String>,
    viewport_height: u16,
}

impl Session {
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        Self {
            state: SessionState::Listing,
            config: SessionConfig::default(),
            tools,
            selected: 0,
            image_input: TextField::default(),
            output_input: TextField::default(),
            focus: None,
            prompt: None,
            progress: Progress::default(),
            current: None,
            last_run: None,
            output: OutputView::default(),
            notice: None,
            viewport_height: 0,
        }
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn selected_tool(&self) -> Option<&ToolDescriptor> {
        self.tools.get(self.selected)
    }

    pub fn update(mut self, msg: Message) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        let before = self.state;

        self.guard_unconfigured();
        match msg {
            Message::Key(Key::Interrupt) => effects.push(Effect::Quit),
            Message::Key(key) => self.on_key(key, &mut effects),
            Message::Tick => self.on_tick(&mut effects),
            Message::Resize { height } => self.viewport_height = height,
            Message::CommandFinished(outcome) => self.on_command_finished(*outcome),
        }
        self.guard_unconfigured();

        if self.state != before {
            tracing::debug!(from = ?before, to = ?self.state, "session transition");
        }
        (self, effects)
    }

    /// Without a memory image nothing may run, so the settings form takes over.
    fn guard_unconfigured(&mut self) {
        if !self.config.is_configured() && self.state != SessionState::Configuring {
            self.enter_configuring();
        }
    }

    fn enter_configuring(&mut self) {
        self.state = SessionState::Configuring;
        self.prompt = None;
        self.focus = Some(ConfigField::Image);
    }

    fn on_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        if self.prompt.is_some() {
            self.on_prompt_key(key, effects);
            return;
        }

        if key == Key::Tab {
            match self.state {
                SessionState::Listing => self.enter_configuring(),
                SessionState::Configuring => {
                    self.state = SessionState::Listing;
                    self.focus = None;
                }
                SessionState::Running | SessionState::ShowingOutput => {}
            }
            return;
        }

        match self.state {
            SessionState::Listing => self.on_listing_key(key, effects),
            SessionState::Configuring => self.on_configuring_key(key),
            SessionState::Running => {}
            SessionState::ShowingOutput => self.on_output_key(key, effects),
        }
    }

    fn on_listing_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        let last = self.tools.len().saturating_sub(1);
        match key {
            Key::Char('q') => effects.push(Effect::Quit),
            Key::Char('x') | Key::Char('X') => {
                self.config.export_mode = self.config.export_mode.toggle();
            }
            Key::Up | Key::Char('k') => self.selected = self.selected.saturating_sub(1),
            Key::Down | Key::Char('j') => self.selected = (self.selected + 1).min(last),
            Key::Home => self.selected = 0,
            Key::End => self.selected = last,
            Key::PageUp => self.selected = self.selected.saturating_sub(usize::from(self.page())),
            Key::PageDown => {
                self.selected = (self.selected + usize::from(self.page())).min(last);
            }
            Key::Enter => self.confirm_selection(effects),
            _ => {}
        }
    }

    fn confirm_selection(&mut self, effects: &mut Vec<Effect>) {
        let Some(tool) = self.selected_tool().copied() else {
            return;
        };
        let mut resolution = Resolution::new(tool.argument_template, &self.config.memory_image_path);
        let step = resolution.next();
        self.apply_step(tool, resolution, step, effects);
    }

    fn on_prompt_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        let Some(mut modal) = self.prompt.take() else {
            return;
        };
        match key {
            Key::Enter => {
                let step = modal.resolution.submit(modal.input.value());
                self.apply_step(modal.tool, modal.resolution, step, effects);
            }
            Key::Esc => {
                tracing::debug!(tool = modal.tool.title, "parameter prompt dismissed");
            }
            other => {
                modal.input.edit(other);
                self.prompt = Some(modal);
            }
        }
    }

    fn apply_step(
        &mut self,
        tool: ToolDescriptor,
        resolution: Resolution,
        step: Step,
        effects: &mut Vec<Effect>,
    ) {
        match step {
            Step::Prompt(placeholder) => {
                self.prompt = Some(PromptModal {
                    tool,
                    placeholder,
                    input: TextField::default(),
                    resolution,
                });
            }
            Step::Resolved(arguments) => self.launch(tool, arguments, effects),
            Step::Aborted => {
                tracing::debug!(tool = tool.title, "empty parameter, invocation aborted");
            }
        }
    }

    fn launch(&mut self, tool: ToolDescriptor, arguments: String, effects: &mut Vec<Effect>) {
        let resolved = ResolvedTool {
            tool,
            resolved_arguments: arguments,
        };
        let request = RunRequest {
            tool: resolved.clone(),
            config: self.config.clone(),
        };
        self.current = Some(resolved);
        self.state = SessionState::Running;
        self.progress.reset();
        self.notice = None;
        effects.push(Effect::Launch(request));
        effects.push(Effect::ArmTicker);
    }

    fn on_configuring_key(&mut self, key: Key) {
        match key {
            Key::Enter => match self.focus {
                Some(ConfigField::Image) => self.focus = Some(ConfigField::Output),
                Some(ConfigField::Output) | None => self.commit_config(),
            },
            other => match self.focus {
                Some(ConfigField::Image) => {
                    self.image_input.edit(other);
                }
                Some(ConfigField::Output) => {
                    self.output_input.edit(other);
                }
                None => {}
            },
        }
    }

    fn commit_config(&mut self) {
        let output = clean_path(self.output_input.value());
        self.config.memory_image_path = clean_path(self.image_input.value());
        self.config.output_directory = if output.is_empty() {
            ".".to_string()
        } else {
            output
        };
        tracing::info!(
            image = %self.config.memory_image_path,
            output = %self.config.output_directory,
            "settings saved"
        );
        self.state = SessionState::Listing;
        self.focus = None;
    }

    fn on_tick(&mut self, effects: &mut Vec<Effect>) {
        if self.state == SessionState::Running {
            self.progress.advance();
            effects.push(Effect::ArmTicker);
        }
    }

    fn on_command_finished(&mut self, outcome: CommandOutcome) {
        tracing::info!(
            tool = outcome.record.tool.tool.title,
            binary = %outcome.record.binary,
            found = outcome.record.binary_found,
            file = %outcome.filename,
            status = %outcome.record.save_status.message(),
            "command finished"
        );
        self.output = OutputView {
            text: outcome.display,
            filename: outcome.filename,
            scroll: 0,
        };
        self.last_run = Some(outcome.record);
        if self.state == SessionState::Running {
            self.state = SessionState::ShowingOutput;
        }
    }

    fn on_output_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        let page = i32::from(self.page());
        match key {
            Key::Esc | Key::Char('q') => {
                self.state = SessionState::Listing;
                self.notice = None;
            }
            Key::Up | Key::Char('k') => self.output.scroll_by(-1),
            Key::Down | Key::Char('j') => self.output.scroll_by(1),
            Key::PageUp => self.output.scroll_by(-page),
            Key::PageDown => self.output.scroll_by(page),
            Key::Home => self.output.scroll = 0,
            Key::End => self.output.scroll = self.output.max_scroll(),
            Key::Char('y') => match &self.last_run {
                Some(run) if run.save_status.succeeded() => {
                    effects.push(Effect::CopyToClipboard(
                        run.save_path.display().to_string(),
                    ));
                }
                _ => self.notice = Some("Nothing was saved for this run.".into()),
            },
            _ => {}
        }
    }

    fn page(&self) -> u16 {
        if self.viewport_height == 0 {
            DEFAULT_PAGE
        } else {
            self.viewport_height.saturating_sub(8).max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, ExportMode, Invocation, SaveStatus};
    use std::path::PathBuf;

    const PSLIST: ToolDescriptor = ToolDescriptor {
        title: "PsList",
        description: "List Processes",
        category: Category::Process,
        invocation: Invocation::Internal {
            plugin_id: "windows.pslist.PsList",
        },
        argument_template: "",
    };

    const DLLLIST: ToolDescriptor = ToolDescriptor {
        title: "DllList",
        description: "List DLLs",
        category: Category::Objects,
        invocation: Invocation::Internal {
            plugin_id: "windows.dlllist.DllList",
        },
        argument_template: "--pid <PID>",
    };

    const YARA: ToolDescriptor = ToolDescriptor {
        title: "VadYaraScan",
        description: "Scan with YARA File",
        category: Category::Injection,
        invocation: Invocation::Internal {
            plugin_id: "windows.vadyarascan.VadYaraScan",
        },
        argument_template: "--pid <PID> --yara-file <RULES>",
    };

    const MEMPROCFS: ToolDescriptor = ToolDescriptor {
        title: "MemProcFS",
        description: "Mount & Forensic Mode 1",
        category: Category::MemProcFS,
        invocation: Invocation::External {
            binary: "MemProcFS.exe",
        },
        argument_template: "-device <IMAGE> -forensic 1",
    };

    fn send(session: Session, msg: Message) -> (Session, Vec<Effect>) {
        session.update(msg)
    }

    fn key(session: Session, k: Key) -> (Session, Vec<Effect>) {
        session.update(Message::Key(k))
    }

    fn type_text(mut session: Session, text: &str) -> Session {
        for c in text.chars() {
            session = key(session, Key::Char(c)).0;
        }
        session
    }

    fn configured(tools: Vec<ToolDescriptor>) -> Session {
        let session = Session::new(tools);
        let (session, _) = send(session, Message::Resize { height: 40 });
        assert_eq!(session.state, SessionState::Configuring);
        let session = type_text(session, "\"C:\\cases\\mem.img\"");
        let (session, _) = key(session, Key::Enter);
        let session = type_text(session, "/tmp/voltas-out");
        let (session, _) = key(session, Key::Enter);
        assert_eq!(session.state, SessionState::Listing);
        session
    }

    fn outcome(filename: &str) -> Box<CommandOutcome> {
        Box::new(CommandOutcome {
            display: "COMMAND: vol\nline 2\nline 3".into(),
            filename: filename.into(),
            record: RunRecord {
                tool: ResolvedTool {
                    tool: PSLIST,
                    resolved_arguments: String::new(),
                },
                binary: "vol".into(),
                binary_found: true,
                command_line: "vol".into(),
                combined_output: Vec::new(),
                save_filename: filename.into(),
                save_path: PathBuf::from("/tmp/voltas-out").join(filename),
                save_status: SaveStatus::Saved,
            },
        })
    }

    #[test]
    fn unconfigured_session_is_forced_into_settings() {
        let session = Session::new(vec![PSLIST]);
        assert_eq!(session.state, SessionState::Listing);

        // Tab would normally leave the settings form; the guard keeps it there.
        let (session, effects) = key(session, Key::Tab);
        assert_eq!(session.state, SessionState::Configuring);
        assert_eq!(session.focus, Some(ConfigField::Image));
        assert!(effects.is_empty());

        let (session, _) = key(session, Key::Tab);
        assert_eq!(session.state, SessionState::Configuring);
    }

    #[test]
    fn committing_an_empty_image_stays_in_settings() {
        let session = Session::new(vec![PSLIST]);
        let (session, _) = key(session, Key::Enter);
        assert_eq!(session.focus, Some(ConfigField::Output));
        let (session, _) = key(session, Key::Enter);
        assert_eq!(session.state, SessionState::Configuring);
        assert_eq!(session.focus, Some(ConfigField::Image));
    }

    #[test]
    fn settings_commit_cleans_paths() {
        let session = configured(vec![PSLIST]);
        assert_eq!(session.config.memory_image_path, "C:\\cases\\mem.img");
        assert_eq!(session.config.output_directory, "/tmp/voltas-out");
        assert_eq!(session.focus, None);
    }

    #[test]
    fn empty_output_directory_defaults_to_working_directory() {
        let session = Session::new(vec![PSLIST]);
        let session = type_text(session, "/img/mem.raw");
        let (session, _) = key(session, Key::Enter);
        let (session, _) = key(session, Key::Enter);
        assert_eq!(session.config.output_directory, ".");
    }

    #[test]
    fn tab_switches_between_list_and_settings() {
        let session = configured(vec![PSLIST]);
        let (session, _) = key(session, Key::Tab);
        assert_eq!(session.state, SessionState::Configuring);
        assert_eq!(session.focus, Some(ConfigField::Image));
        let (session, _) = key(session, Key::Tab);
        assert_eq!(session.state, SessionState::Listing);
        assert_eq!(session.focus, None);
    }

    #[test]
    fn toggle_flips_export_mode() {
        let session = configured(vec![PSLIST]);
        assert_eq!(session.config.export_mode, ExportMode::Pretty);
        let (session, _) = key(session, Key::Char('x'));
        assert_eq!(session.config.export_mode, ExportMode::Csv);
        let (session, _) = key(session, Key::Char('x'));
        assert_eq!(session.config.export_mode, ExportMode::Pretty);
    }

    #[test]
    fn confirming_a_plain_tool_launches_immediately() {
        let session = configured(vec![PSLIST]);
        let (session, _) = key(session, Key::Char('x'));
        let (session, effects) = key(session, Key::Enter);

        assert_eq!(session.state, SessionState::Running);
        assert_eq!(session.progress.percent(), 0);
        assert!(session.prompt.is_none());
        assert_eq!(
            effects,
            vec![
                Effect::Launch(RunRequest {
                    tool: ResolvedTool {
                        tool: PSLIST,
                        resolved_arguments: String::new(),
                    },
                    config: SessionConfig {
                        memory_image_path: "C:\\cases\\mem.img".into(),
                        output_directory: "/tmp/voltas-out".into(),
                        export_mode: ExportMode::Csv,
                    },
                }),
                Effect::ArmTicker,
            ]
        );
    }

    #[test]
    fn pid_prompt_substitutes_every_occurrence() {
        let session = configured(vec![DLLLIST]);
        let (session, effects) = key(session, Key::Enter);
        assert!(effects.is_empty());
        assert_eq!(session.state, SessionState::Listing);
        assert_eq!(
            session.prompt.as_ref().map(|p| p.placeholder),
            Some(Placeholder::Pid)
        );

        let session = type_text(session, "4821");
        let (session, effects) = key(session, Key::Enter);
        assert_eq!(session.state, SessionState::Running);
        assert_eq!(
            session.current.as_ref().map(|t| t.resolved_arguments.as_str()),
            Some("--pid 4821")
        );
        assert!(matches!(effects.first(), Some(Effect::Launch(_))));
    }

    #[test]
    fn empty_pid_aborts_silently() {
        let session = configured(vec![DLLLIST]);
        let before = session.config.clone();
        let (session, _) = key(session, Key::Enter);
        let (session, effects) = key(session, Key::Enter);
        assert!(effects.is_empty());
        assert!(session.prompt.is_none());
        assert_eq!(session.state, SessionState::Listing);
        assert_eq!(session.config, before);
        assert!(session.current.is_none());
        assert!(session.notice.is_none());
    }

    #[test]
    fn rules_are_asked_after_pid_and_abort_on_empty() {
        let session = configured(vec![YARA]);
        let (session, _) = key(session, Key::Enter);
        let session = type_text(session, "4");
        let (session, effects) = key(session, Key::Enter);
        assert!(effects.is_empty());
        assert_eq!(
            session.prompt.as_ref().map(|p| p.placeholder),
            Some(Placeholder::Rules)
        );
        let (session, effects) = key(session, Key::Enter);
        assert!(effects.is_empty());
        assert!(session.prompt.is_none());
        assert_eq!(session.state, SessionState::Listing);
    }

    #[test]
    fn escape_dismisses_the_prompt() {
        let session = configured(vec![DLLLIST]);
        let (session, _) = key(session, Key::Enter);
        let session = type_text(session, "12");
        let (session, effects) = key(session, Key::Esc);
        assert!(effects.is_empty());
        assert!(session.prompt.is_none());
        assert_eq!(session.state, SessionState::Listing);
    }

    #[test]
    fn prompt_owns_input_while_open() {
        let session = configured(vec![DLLLIST]);
        let (session, _) = key(session, Key::Enter);
        let (session, _) = key(session, Key::Tab);
        let (session, _) = key(session, Key::Char('x'));
        assert_eq!(session.state, SessionState::Listing);
        assert_eq!(session.config.export_mode, ExportMode::Pretty);
        assert_eq!(session.prompt.as_ref().map(|p| p.input.value()), Some("x"));
    }

    #[test]
    fn image_placeholder_never_prompts() {
        let session = configured(vec![MEMPROCFS]);
        let (session, effects) = key(session, Key::Enter);
        assert!(session.prompt.is_none());
        assert_eq!(session.state, SessionState::Running);
        assert_eq!(
            session.current.as_ref().map(|t| t.resolved_arguments.as_str()),
            Some("-device C:\\cases\\mem.img -forensic 1")
        );
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn ticks_advance_only_while_running() {
        let session = configured(vec![PSLIST]);
        let (session, effects) = send(session, Message::Tick);
        assert!(effects.is_empty());
        assert_eq!(session.progress.percent(), 0);

        let (session, _) = key(session, Key::Enter);
        let (session, effects) = send(session, Message::Tick);
        assert_eq!(effects, vec![Effect::ArmTicker]);
        assert_eq!(session.progress.percent(), 2);
    }

    #[test]
    fn running_ignores_navigation_and_confirm() {
        let session = configured(vec![PSLIST, DLLLIST]);
        let (session, _) = key(session, Key::Enter);
        for k in [Key::Enter, Key::Tab, Key::Down, Key::Char('x'), Key::Char('q')] {
            let (next, effects) = key(session.clone(), k);
            assert_eq!(next.state, SessionState::Running);
            assert!(effects.is_empty(), "{k:?} produced {effects:?}");
        }
    }

    #[test]
    fn completion_shows_output_and_dismiss_returns_to_list() {
        let session = configured(vec![PSLIST]);
        let (session, _) = key(session, Key::Enter);
        let (session, effects) = send(session, Message::CommandFinished(outcome("mem-PsList.txt")));
        assert!(effects.is_empty());
        assert_eq!(session.state, SessionState::ShowingOutput);
        assert_eq!(session.output.filename, "mem-PsList.txt");
        assert!(session.output.text.starts_with("COMMAND: vol"));

        let (session, _) = send(session, Message::Tick);
        assert_eq!(session.state, SessionState::ShowingOutput);

        let (session, _) = key(session, Key::Esc);
        assert_eq!(session.state, SessionState::Listing);
    }

    #[test]
    fn output_scroll_is_clamped() {
        let session = configured(vec![PSLIST]);
        let (session, _) = key(session, Key::Enter);
        let (session, _) = send(session, Message::CommandFinished(outcome("mem-PsList.txt")));
        let (session, _) = key(session, Key::Up);
        assert_eq!(session.output.scroll, 0);
        let (session, _) = key(session, Key::PageDown);
        assert_eq!(session.output.scroll, 2);
        let (session, _) = key(session, Key::Down);
        assert_eq!(session.output.scroll, 2);
        let (session, _) = key(session, Key::Home);
        assert_eq!(session.output.scroll, 0);
    }

    #[test]
    fn copy_requests_saved_path() {
        let session = configured(vec![PSLIST]);
        let (session, _) = key(session, Key::Enter);
        let (session, _) = send(session, Message::CommandFinished(outcome("mem-PsList.txt")));
        let (_, effects) = key(session, Key::Char('y'));
        assert_eq!(
            effects,
            vec![Effect::CopyToClipboard(
                PathBuf::from("/tmp/voltas-out")
                    .join("mem-PsList.txt")
                    .display()
                    .to_string()
            )]
        );
    }

    #[test]
    fn leaving_output_clears_notice() {
        let session = configured(vec![PSLIST]);
        let (session, _) = key(session, Key::Enter);
        let mut failed = outcome("mem-PsList.txt");
        failed.record.save_status = SaveStatus::Failed;
        let (session, _) = send(session, Message::CommandFinished(failed));
        let (session, effects) = key(session, Key::Char('y'));
        assert!(effects.is_empty());
        assert_eq!(session.notice.as_deref(), Some("Nothing was saved for this run."));

        let (session, _) = key(session, Key::Esc);
        assert_eq!(session.state, SessionState::Listing);
        assert!(session.notice.is_none());
    }

    #[test]
    fn interrupt_quits_from_any_state() {
        let session = Session::new(vec![PSLIST]);
        let (_, effects) = key(session, Key::Interrupt);
        assert_eq!(effects, vec![Effect::Quit]);

        let session = configured(vec![PSLIST]);
        let (session, _) = key(session, Key::Enter);
        let (_, effects) = key(session, Key::Interrupt);
        assert_eq!(effects, vec![Effect::Quit]);
    }

    #[test]
    fn selection_is_clamped_to_catalog() {
        let session = configured(vec![PSLIST, DLLLIST, YARA]);
        let (session, _) = key(session, Key::Up);
        assert_eq!(session.selected, 0);
        let (session, _) = key(session, Key::End);
        assert_eq!(session.selected, 2);
        let (session, _) = key(session, Key::Char('j'));
        assert_eq!(session.selected, 2);
        assert_eq!(session.selected_tool().map(|t| t.title), Some("VadYaraScan"));
    }
}
