//! Per-visitor state containers.
//!
//! Cart and wishlist persist in the visitor's session under the
//! [`keys`] namespace. [`UiState`] is volatile and starts fresh on every
//! request. Handlers receive all three bundled in a [`ClientState`].

mod cart;
mod ui;
mod wishlist;

pub use cart::{CartLine, CartLineKey, CartState, MAX_LINE_QUANTITY};
pub use ui::UiState;
pub use wishlist::{WishlistItem, WishlistState};

use serde::{Deserialize, Serialize};

/// Session keys the persisted containers are stored under.
pub mod keys {
    /// Serialized [`super::CartState`].
    pub const CART: &str = "maison:cart";

    /// Serialized [`super::WishlistState`].
    pub const WISHLIST: &str = "maison:wishlist";
}

/// Everything a request knows about the visitor's client-side state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    pub cart: CartState,
    pub wishlist: WishlistState,
    #[serde(skip)]
    pub ui: UiState,
}

impl ClientState {
    #[must_use]
    pub fn new(cart: CartState, wishlist: WishlistState) -> Self {
        Self {
            cart,
            wishlist,
            ui: UiState::default(),
        }
    }
}
