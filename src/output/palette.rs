//! Terminal colors for text output
//!
//! Colors are an explicit argument of every render call rather than
//! process-wide state, so rendering stays a pure function of its input.

use console::Style;

/// Color tokens used by the text renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Red,
    Yellow,
    Green,
}

/// Applies [`Tone`]s when enabled, passes text through otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A palette that never emits escape codes
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        let style = match tone {
            Tone::Plain => return text.to_string(),
            Tone::Red => Style::new().red(),
            Tone::Yellow => Style::new().yellow(),
            Tone::Green => Style::new().green(),
        };
        style
            .force_styling(self.enabled)
            .apply_to(text)
            .to_string()
    }
}
