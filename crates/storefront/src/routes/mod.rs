//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /products                  - Filtered, sorted, paginated listing
//! GET    /products/{slug}           - Product detail with related items
//! GET    /products/{slug}/reviews   - Approved reviews
//! GET    /categories                - All categories
//! GET    /categories/menu           - Navigation tree
//! GET    /collections               - Published collections
//! GET    /collections/{slug}        - Collection with a product page
//!
//! # Cart (session)
//! GET    /cart                      - Cart contents
//! POST   /cart/add                  - Add a product
//! POST   /cart/update               - Set a line quantity (0 removes)
//! POST   /cart/remove               - Remove a line
//! POST   /cart/clear                - Empty the cart
//! GET    /cart/count                - Item count badge
//!
//! # Wishlist (session)
//! GET    /wishlist                  - Saved products
//! POST   /wishlist/toggle           - Add or remove a product
//! DELETE /wishlist                  - Empty the wishlist
//!
//! # Account (bearer token)
//! GET    /account/orders            - Order history
//! GET    /account/orders/{id}       - Order detail
//! ```

pub mod account;
pub mod cart;
pub mod categories;
pub mod collections;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
        .route("/{slug}/reviews", get(products::reviews))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/menu", get(categories::menu))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{slug}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).delete(wishlist::clear))
        .route("/toggle", post(wishlist::toggle))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/collections", collection_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/account", account_routes())
}
