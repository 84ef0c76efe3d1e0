use crate::workspace::ExplorerEntry;

/// File picker listing the workspace directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExplorerState {
    #[default]
    Hidden,
    Visible {
        entries: Vec<ExplorerEntry>,
        selected: usize,
    },
}

impl ExplorerState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Move the highlight by `delta` rows, stopping at either end.
    pub fn move_selection(&mut self, delta: isize) {
        if let Self::Visible { entries, selected } = self {
            let last = entries.len().saturating_sub(1);
            *selected = selected.saturating_add_signed(delta).min(last);
        }
    }

    pub fn selected(&self) -> Option<&ExplorerEntry> {
        match self {
            Self::Hidden => None,
            Self::Visible { entries, selected } => entries.get(*selected),
        }
    }
}
