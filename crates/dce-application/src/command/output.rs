use std::fmt;

/// How a line should be presented by a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Plain,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub tone: Tone,
    pub text: String,
}

/// Rendered result of one command. Never an error; failures are lines too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<OutputLine>,
}

impl CommandOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tone: Tone, text: impl Into<String>) -> &mut Self {
        self.lines.push(OutputLine {
            tone,
            text: text.into(),
        });
        self
    }

    pub fn heading(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Heading, text)
    }

    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Plain, text)
    }

    pub fn success(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Success, text)
    }

    pub fn warning(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Warning, text)
    }

    pub fn error(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Error, text)
    }

    pub fn extend(&mut self, other: CommandOutput) -> &mut Self {
        self.lines.extend(other.lines);
        self
    }

    pub fn is_error(&self) -> bool {
        self.lines.iter().any(|l| l.tone == Tone::Error)
    }

    /// All lines joined with `\n`, without styling.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
