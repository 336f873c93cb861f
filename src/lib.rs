//! shareto - share-to-social widget engine.
//!
//! Markup is someone else's job: given a parsed page [`Document`] and a
//! container element holding buttons tagged with network identifiers, the
//! widget resolves per-container configuration, gathers page metadata,
//! substitutes it into the network's URL template and opens a centered
//! popup window through a pluggable [`WindowOpener`]. Lifecycle hooks
//! (`on_init`, `on_render`, `on_destroy`) are mirrored as subscribable
//! events on the container.
//!
//! ```
//! use shareto::{AttachOptions, Document, ShareRegistry};
//!
//! let html = r#"
//!     <title>Hello</title>
//!     <link rel="canonical" href="https://example.com/hello/">
//!     <div id="share"><button data-social-network="twitter">t</button></div>
//! "#;
//! let doc = Document::parse(html).unwrap();
//!
//! let registry = ShareRegistry::new();
//! registry.attach(&doc, "share", AttachOptions::default());
//!
//! let popup = registry.share(&doc, "share", "twitter").unwrap();
//! assert!(popup.url.starts_with("https://twitter.com/share?"));
//! ```

pub mod config;
pub mod logger;
pub mod page;
pub mod popup;
pub mod template;
pub mod widget;

pub use config::{ConfigError, ConfigField, ConfigPatch, ShareConfig, ShareData};
pub use page::{Document, ElementRef, PageError, ShareParams, gather_params};
pub use popup::{HeadlessOpener, Popup, PopupGeometry, ScreenMetrics, WindowOpener, open_popup};
pub use template::build_url;
pub use widget::{
    AttachOptions, Command, Hooks, ShareEvent, ShareRegistry, WIDGETS, WidgetError, WidgetInstance,
};
