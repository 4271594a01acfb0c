//! Placeholder substitution for argument templates.
//!
//! A [`Resolution`] walks the placeholders in a fixed order (`<PID>`, `<RULES>`, `<IMAGE>`).
//! Operator-supplied values are requested one at a time through [`Step::Prompt`]; the session
//! shows them as a modal form and feeds the answer back with [`Resolution::submit`].

/// Marker substrings recognised in argument templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Pid,
    Rules,
    Image,
}

/// Resolution order.
pub const ORDER: [Placeholder; 3] = [Placeholder::Pid, Placeholder::Rules, Placeholder::Image];

impl Placeholder {
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Pid => "<PID>",
            Placeholder::Rules => "<RULES>",
            Placeholder::Image => "<IMAGE>",
        }
    }

    pub fn prompt_title(self) -> &'static str {
        match self {
            Placeholder::Pid => "Target PID",
            Placeholder::Rules => "Path to YARA Rules File",
            Placeholder::Image => "Memory Image",
        }
    }

    pub fn prompt_hint(self) -> &'static str {
        match self {
            Placeholder::Pid => "4821",
            Placeholder::Rules => "D:\\Rules\\malware.yar",
            Placeholder::Image => "",
        }
    }

    /// `<IMAGE>` comes from the session config and never prompts.
    pub fn requires_input(self) -> bool {
        !matches!(self, Placeholder::Image)
    }
}

/// Strip surrounding whitespace and quote characters from a pasted path.
pub fn clean_path(path: &str) -> String {
    path.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ask the operator for this placeholder's value.
    Prompt(Placeholder),
    /// No placeholders remain.
    Resolved(String),
    /// An empty value was submitted; nothing must run.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    args: String,
    image_path: String,
    cursor: usize,
    awaiting: Option<Placeholder>,
}

impl Resolution {
    pub fn new(template: &str, image_path: &str) -> Self {
        Self {
            args: template.to_string(),
            image_path: image_path.to_string(),
            cursor: 0,
            awaiting: None,
        }
    }

    /// Advance to the next placeholder that needs an answer, substituting automatic ones.
    pub fn next(&mut self) -> Step {
        if let Some(placeholder) = self.awaiting {
            return Step::Prompt(placeholder);
        }
        while let Some(&placeholder) = ORDER.get(self.cursor) {
            if !self.args.contains(placeholder.token()) {
                self.cursor += 1;
                continue;
            }
            if placeholder.requires_input() {
                self.awaiting = Some(placeholder);
                return Step::Prompt(placeholder);
            }
            let value = clean_path(&self.image_path);
            self.substitute(placeholder, &value);
        }
        Step::Resolved(self.args.clone())
    }

    /// Answer the pending prompt.
    pub fn submit(&mut self, value: &str) -> Step {
        let Some(placeholder) = self.awaiting.take() else {
            return self.next();
        };
        let value = value.trim();
        if value.is_empty() {
            return Step::Aborted;
        }
        let value = match placeholder {
            Placeholder::Pid => value.to_string(),
            Placeholder::Rules | Placeholder::Image => clean_path(value),
        };
        if value.is_empty() {
            return Step::Aborted;
        }
        self.substitute(placeholder, &value);
        self.next()
    }

    fn substitute(&mut self, placeholder: Placeholder, value: &str) {
        self.args = self.args.replace(placeholder.token(), value);
        self.cursor += 1;
    }
}
