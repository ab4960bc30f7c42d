//! # Bake Events - Template Event Routing
//!
//! Routes code-generation template render passes to named events so other
//! listeners can customize the generated output:
//! - Closed mapping table from template fragment to callback name
//! - Capability declarations instead of runtime method probing
//! - Synchronous in-memory event bus with explicit subscription
//!
//! ## Flow
//!
//! ```text
//!   RenderContext ──► TemplateRouter ──is_type + capabilities──► [Callback]
//!                           │
//!                           └── execute ──► EventBus ──► "Bake.<callback>"
//!                                              │
//!                                              └──► subscribed listeners
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod bus;
pub mod callback;
pub mod context;
pub mod router;
pub mod types;

// Internal utilities
pub mod observability;

pub use bus::{Event, EventBus, EventDispatcher, EventListener, Subscription};
pub use callback::{Callback, CallbackSet};
pub use context::RenderContext;
pub use router::{HandlerBundle, TemplateListener, TemplateRouter};
pub use types::{Config, Error, Result, RouterConfig};
