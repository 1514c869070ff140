use serde::Serialize;

/// FAQ list where at most one answer is expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FaqAccordion {
    expanded: Option<usize>,
}

impl FaqAccordion {
    /// Expands `index`, collapsing any other item; toggling the expanded item collapses it.
    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        self.expanded = match self.expanded {
            Some(current) if current == index => None,
            _ => Some(index),
        };
        self.expanded
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }
}
