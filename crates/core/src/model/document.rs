use serde::Serialize;

/// Plain text handed over by the document or transcript collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDocument {
    name: String,
    pages: Vec<String>,
}

impl SourceDocument {
    /// Blank pages are dropped.
    #[must_use]
    pub fn new(name: impl Into<String>, pages: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            pages: pages
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect(),
        }
    }

    /// Split `text` into pages on form-feed characters.
    #[must_use]
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.split('\u{c}').map(str::to_owned))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages separated by a blank line.
    #[must_use]
    pub fn full_text(&self) -> String {
        self.pages.join("\n\n")
    }
}
