#![forbid(unsafe_code)]

//! Immediate-mode widgets.
//!
//! Every widget follows the same contract:
//!
//! 1. resolve its raw label into an [`Identity`](identity::Identity) under
//!    its kind tag;
//! 2. fetch or build its state in the scope's
//!    [`WidgetStateCache`](cache::WidgetStateCache);
//! 3. drain its own events and update that state;
//! 4. append a render op that reads the state back from the cache at layout
//!    time.
//!
//! Widgets are methods on [`Ui`], one module per widget.

pub mod button;
pub mod cache;
pub mod color;
pub mod context;
pub mod drag;
pub mod identity;
pub mod input;
pub mod slider;
pub mod text;
pub mod theme;

pub use button::ButtonState;
pub use cache::{CacheError, CacheRetention, CacheStats, IdentityCollision, WidgetStateCache};
pub use context::{Ui, UiContext};
pub use drag::DragValueState;
pub use identity::{Identity, resolve};
pub use input::TextFieldState;
pub use slider::SliderState;
pub use theme::{Palette, Theme};
