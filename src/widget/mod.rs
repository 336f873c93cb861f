//! Widget lifecycle: instances, hooks, events, method dispatch.
//!
//! ```text
//! widget/
//! ├── command    # closed public-method command set
//! ├── error      # WidgetError
//! ├── instance   # WidgetInstance
//! └── registry   # ShareRegistry (element -> instance), global WIDGETS
//! ```
//!
//! Lifecycle per container: `Uninitialized -> Attached -> Destroyed`.
//! Attach is idempotent; destroy is terminal for the instance but a later
//! attach creates a fresh one. Every hook invocation is mirrored as a
//! [`ShareEvent`] dispatched to listeners subscribed on the element.

mod command;
mod error;
mod instance;
mod registry;

pub use command::Command;
pub use error::WidgetError;
pub use instance::WidgetInstance;
pub use registry::{AttachOptions, OPTIONS_ATTR, ShareRegistry, WIDGETS};

use std::sync::Arc;

use crate::popup::Popup;

/// Event namespace appended to hook event names.
pub const EVENT_NS: &str = "shareto";

/// Parameterless lifecycle callback (`on_init`, `on_destroy`).
pub type Hook = Arc<dyn Fn() + Send + Sync>;
/// Render callback, receives the opened popup handle.
pub type RenderHook = Arc<dyn Fn(&Popup) + Send + Sync>;
/// Subscribed event listener.
pub type EventListener = Arc<dyn Fn(&ShareEvent) + Send + Sync>;

// ============================================================================
// Hooks
// ============================================================================

/// Optional lifecycle/interaction callbacks, fixed signature per hook.
#[derive(Clone, Default)]
pub struct Hooks {
    /// Fired once at the end of attach.
    pub on_init: Option<Hook>,
    /// Fired on every successful popup open.
    pub on_render: Option<RenderHook>,
    /// Fired once at the start of destroy.
    pub on_destroy: Option<Hook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_init(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_init = Some(Arc::new(hook));
        self
    }

    pub fn on_render(mut self, hook: impl Fn(&Popup) + Send + Sync + 'static) -> Self {
        self.on_render = Some(Arc::new(hook));
        self
    }

    pub fn on_destroy(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_destroy = Some(Arc::new(hook));
        self
    }
}

// ============================================================================
// ShareEvent
// ============================================================================

/// Observable mirror of a hook invocation, dispatched to listeners
/// subscribed on the container element.
#[derive(Debug, Clone, PartialEq)]
pub enum ShareEvent {
    Init,
    Render(Popup),
    Destroy,
}

impl ShareEvent {
    /// Bare event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Render(_) => "render",
            Self::Destroy => "destroy",
        }
    }

    /// Namespaced event name, e.g. `init.shareto`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{EVENT_NS}", self.name())
    }
}

// ============================================================================
// tests
// ============================================================================
