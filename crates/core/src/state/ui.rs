use serde::{Deserialize, Serialize};

/// Visibility of page chrome. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub announcement_visible: bool,
    /// Id of the open modal; at most one is open at a time.
    pub active_modal: Option<String>,
    pub mobile_nav_open: bool,
    pub search_open: bool,
    pub cart_drawer_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            announcement_visible: true,
            active_modal: None,
            mobile_nav_open: false,
            search_open: false,
            cart_drawer_open: false,
        }
    }
}

impl UiState {
    pub fn dismiss_announcement(&mut self) {
        self.announcement_visible = false;
    }

    pub fn open_modal(&mut self, id: &str) {
        self.active_modal = Some(id.to_owned());
    }

    pub fn close_modal(&mut self) {
        self.active_modal = None;
    }

    /// Open `id`, or close it if it is already the open modal.
    pub fn toggle_modal(&mut self, id: &str) {
        if self.is_modal_open(id) {
            self.close_modal();
        } else {
            self.open_modal(id);
        }
    }

    #[must_use]
    pub fn is_modal_open(&self, id: &str) -> bool {
        self.active_modal.as_deref() == Some(id)
    }

    pub const fn toggle_mobile_nav(&mut self) {
        self.mobile_nav_open = !self.mobile_nav_open;
    }

    /// Opening search closes the mobile nav.
    pub const fn toggle_search(&mut self) {
        self.search_open = !self.search_open;
        if self.search_open {
            self.mobile_nav_open = false;
        }
    }

    pub const fn set_cart_drawer(&mut self, open: bool) {
        self.cart_drawer_open = open;
    }

    /// Close every overlay. The announcement bar keeps its state.
    pub fn close_all(&mut self) {
        self.active_modal = None;
        self.mobile_nav_open = false;
        self.search_open = false;
        self.cart_drawer_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_toggle() {
        let mut ui = UiState::default();
        ui.toggle_modal("newsletter");
        assert!(ui.is_modal_open("newsletter"));
        ui.toggle_modal("size-guide");
        assert!(ui.is_modal_open("size-guide"));
        assert!(!ui.is_modal_open("newsletter"));
        ui.toggle_modal("size-guide");
        assert_eq!(ui.active_modal, None);
    }

    #[test]
    fn test_search_closes_mobile_nav() {
        let mut ui = UiState::default();
        ui.toggle_mobile_nav();
        ui.toggle_search();
        assert!(ui.search_open);
        assert!(!ui.mobile_nav_open);
    }

    #[test]
    fn test_close_all_keeps_announcement() {
        let mut ui = UiState::default();
        ui.dismiss_announcement();
        ui.set_cart_drawer(true);
        ui.open_modal("quick-view");
        ui.close_all();
        assert_eq!(
            ui,
            UiState {
                announcement_visible: false,
                ..UiState::default()
            }
        );
    }
}
