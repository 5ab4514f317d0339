//! Deferred-loading video embed widget.
//!
//! A `<lazy-youtube>` element renders a lightweight thumbnail placeholder inside its own
//! shadow root and swaps in the real, autoplaying `<iframe>` on first activation. Hosts
//! without custom element support get every widget rewritten as a plain embed instead.

pub mod builder;
pub mod config;
pub mod error;
pub mod events;
pub mod fallback;
pub mod host;
pub mod lazy_image;
pub mod lifecycle;
pub mod placeholder;
pub mod resolver;
pub mod timing;

pub use crate::config::WidgetOptions;
pub use crate::error::{ConfigError, EmbedError, HostError, MarkupProblem};
pub use crate::events::{Key, ListenerId, Listeners, UiEvent};
pub use crate::host::{Environment, Host, Registration};
pub use crate::lifecycle::{CustomElement, LazyEmbed, LifecycleState};
pub use crate::placeholder::ShadowRoot;
pub use crate::resolver::{ResolvedSource, SourceMode};
pub use crate::timing::{NavigationTiming, ReadyState};
