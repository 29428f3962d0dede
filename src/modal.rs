//! Explicit visibility state for overlay panels

/// Overlay panels known to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalId {
    /// Version picker for one game
    Versions,
    /// Static usage instructions
    Instructions,
}

impl ModalId {
    pub const ALL: [ModalId; 2] = [ModalId::Versions, ModalId::Instructions];

    /// Element id of the overlay in the page template
    pub fn dom_id(self) -> &'static str {
        match self {
            ModalId::Versions => crate::view::ids::VERSIONS_MODAL,
            ModalId::Instructions => crate::view::ids::INSTRUCTIONS_MODAL,
        }
    }

    pub fn from_dom_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.dom_id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

/// Visibility of every modal. The body scroll lock is held while any is shown.
#[derive(Debug, Clone, Default)]
pub struct Modals {
    versions: Visibility,
    instructions: Visibility,
}

impl Modals {
    fn slot(&mut self, id: ModalId) -> &mut Visibility {
        match id {
            ModalId::Versions => &mut self.versions,
            ModalId::Instructions => &mut self.instructions,
        }
    }

    pub fn visibility(&self, id: ModalId) -> Visibility {
        match id {
            ModalId::Versions => self.versions,
            ModalId::Instructions => self.instructions,
        }
    }

    pub fn open(&mut self, id: ModalId) {
        *self.slot(id) = Visibility::Shown;
    }

    pub fn close(&mut self, id: ModalId) {
        *self.slot(id) = Visibility::Hidden;
    }

    pub fn close_all(&mut self) {
        for id in ModalId::ALL {
            self.close(id);
        }
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.visibility(id) == Visibility::Shown
    }

    pub fn any_open(&self) -> bool {
        ModalId::ALL.into_iter().any(|id| self.is_open(id))
    }

    pub fn scroll_locked(&self) -> bool {
        self.any_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let mut modals = Modals::default();
        assert!(!modals.scroll_locked());

        modals.open(ModalId::Versions);
        assert!(modals.is_open(ModalId::Versions));
        assert!(!modals.is_open(ModalId::Instructions));
        assert!(modals.scroll_locked());

        modals.close(ModalId::Versions);
        assert!(!modals.scroll_locked());
    }

    #[test]
    fn test_scroll_lock_held_while_another_is_open() {
        let mut modals = Modals::default();
        modals.open(ModalId::Versions);
        modals.open(ModalId::Instructions);
        modals.close(ModalId::Versions);
        assert!(modals.scroll_locked());
    }

    #[test]
    fn test_close_all() {
        let mut modals = Modals::default();
        modals.open(ModalId::Versions);
        modals.open(ModalId::Instructions);
        modals.close_all();
        assert!(!modals.any_open());
        assert!(!modals.scroll_locked());
    }

    #[test]
    fn test_dom_ids() {
        assert_eq!(ModalId::Versions.dom_id(), "versionsModal");
        assert_eq!(ModalId::from_dom_id("instructionsModal"), Some(ModalId::Instructions));
        assert_eq!(ModalId::from_dom_id("nope"), None);
    }
}
