/// Two-step delete: a row is selected first, the id is released only on confirm.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteConfirmation {
    #[default]
    Idle,
    Pending {
        id: String,
        label: Option<String>,
    },
}

impl DeleteConfirmation {
    pub fn request(&mut self, id: impl Into<String>, label: Option<String>) {
        *self = DeleteConfirmation::Pending {
            id: id.into(),
            label,
        };
    }

    pub fn pending_id(&self) -> Option<&str> {
        match self {
            DeleteConfirmation::Pending { id, .. } => Some(id),
            DeleteConfirmation::Idle => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            DeleteConfirmation::Pending { label, .. } => label.as_deref(),
            DeleteConfirmation::Idle => None,
        }
    }

    /// Returns the selected id once and resets to idle.
    pub fn confirm(&mut self) -> Option<String> {
        match std::mem::take(self) {
            DeleteConfirmation::Pending { id, .. } => Some(id),
            DeleteConfirmation::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = DeleteConfirmation::Idle;
    }
}
