/// Reveals a text one character per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Typewriter {
    text: String,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown: 0,
        }
    }

    /// Text revealed so far.
    pub fn visible(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.shown)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.text.chars().count()
    }

    /// Reveal one more character. Returns false once everything is shown.
    pub fn tick(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        self.shown += 1;
        true
    }

    pub fn reveal_all(&mut self) {
        self.shown = self.text.chars().count();
    }
}
