//! AgroLink Warehouse Board Widget
//!
//! This crate contains the warehouse map widget plus the pieces it needs to
//! talk to the outside: the REST client, the event bus and the JS bridge.
//! The app shell (config, data loading lifecycle) lives in the root crate.

pub mod api;
pub mod board;
pub mod bridge;
pub mod bus;

pub use api::{ApiClient, ApiError};
pub use board::{
    compute_layout,
    // Layout
    BoardLayout,
    // Widget
    BoardWidget,
    CellAddress,
    DetailStore,
    HudState,
    ShelfFilter,
    ShelfIndex,
    // Viewport
    ViewTransform,
    Viewport,
    ViewportConfig,
    ZoneLayout,
};
pub use bridge::JsBridge;
pub use bus::{EventBus, Subscription, Target};
