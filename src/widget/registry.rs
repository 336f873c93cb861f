//! Element -> instance registry and the widget entry points.
//!
//! A process-wide singleton ([`WIDGETS`]) owns the association between
//! container elements and their [`WidgetInstance`]s, the registered
//! options blobs, the event listeners and the window opener. All behavior
//! lives on [`ShareRegistry`] so tests (and embedders that want isolation)
//! can run against their own instances.
//!
//! Locks are never held across user callbacks: hooks and listeners are
//! cloned out of the maps before they are invoked.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, LazyLock};

use crate::config::{ConfigError, ConfigField, ConfigPatch, ShareConfig};
use crate::page::{Document, gather_params};
use crate::popup::{HeadlessOpener, Popup, WindowOpener, open_popup};
use crate::template::build_url;
use crate::{debug, log};

use super::{Command, EventListener, Hooks, ShareEvent, WidgetError, WidgetInstance};

/// Container attribute referencing a registered options blob.
pub const OPTIONS_ATTR: &str = "data-shareto-options";

/// Global widget registry.
pub static WIDGETS: LazyLock<ShareRegistry> = LazyLock::new(ShareRegistry::new);

/// Options for one attach call: the page-level config patch plus hooks.
#[derive(Default)]
pub struct AttachOptions {
    pub patch: ConfigPatch,
    pub hooks: Hooks,
}

/// Registry of live widget instances and their supporting state.
pub struct ShareRegistry {
    instances: RwLock<FxHashMap<String, WidgetInstance>>,
    options: RwLock<FxHashMap<String, ConfigPatch>>,
    listeners: RwLock<FxHashMap<String, Vec<EventListener>>>,
    opener: RwLock<Arc<dyn WindowOpener>>,
}

impl Default for ShareRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ShareRegistry {
    pub fn new() -> Self {
        Self {
            instances: RwLock::new(FxHashMap::default()),
            options: RwLock::new(FxHashMap::default()),
            listeners: RwLock::new(FxHashMap::default()),
            opener: RwLock::new(Arc::new(HeadlessOpener)),
        }
    }

    /// Install the environment's window opener.
    pub fn set_opener(&self, opener: Arc<dyn WindowOpener>) {
        *self.opener.write() = opener;
    }

    /// Register an options blob under a reference key.
    ///
    /// Containers point at the blob through their `data-shareto-options`
    /// attribute. Unknown JSON fields are warned about, not rejected.
    pub fn register_options(&self, key: &str, json: &str) -> Result<(), ConfigError> {
        let (patch, ignored) = ConfigPatch::from_json(json)?;
        if !ignored.is_empty() {
            log!(
                "warning";
                "options blob `{key}` has unknown fields: {}",
                ignored.join(", ")
            );
        }
        self.options.write().insert(key.to_string(), patch);
        Ok(())
    }

    /// Subscribe to an element's share events.
    pub fn on(&self, element: &str, listener: impl Fn(&ShareEvent) + Send + Sync + 'static) {
        self.listeners
            .write()
            .entry(element.to_string())
            .or_default()
            .push(Arc::new(listener));
    }

    /// Attach a widget to a container element. Idempotent per element.
    ///
    /// Failures are logged, never raised, so a misconfigured container
    /// cannot break page setup.
    pub fn attach(&self, doc: &Document, element: &str, options: AttachOptions) {
        if let Err(e) = self.try_attach(doc, element, options) {
            log!("error"; "{e}");
        }
    }

    /// Attach, returning whether a new instance was created.
    ///
    /// `Ok(false)` means the element already had a live instance and the
    /// call was a no-op.
    pub fn try_attach(
        &self,
        doc: &Document,
        element: &str,
        options: AttachOptions,
    ) -> Result<bool, WidgetError> {
        if self.instances.read().contains_key(element) {
            return Ok(false);
        }

        let container = doc
            .element(element)
            .ok_or_else(|| ConfigError::MissingElement(element.to_string()))?;

        // Layer order: defaults < registered blob < attach options < element attrs
        let mut layers: Vec<ConfigPatch> = Vec::new();
        if let Some(key) = container.attr(OPTIONS_ATTR) {
            match self.options.read().get(&key) {
                Some(blob) => layers.push(blob.clone()),
                None => log!("warning"; "no share options registered under key `{key}`"),
            }
        }
        layers.push(options.patch);
        layers.push(ConfigPatch::from_data_attrs(&container.data_attrs()));

        let config = ShareConfig::resolve(layers.iter());
        config.warn_invalid_templates();

        let buttons = container.share_buttons();
        for network in &buttons {
            if config.template(network).is_none() {
                log!(
                    "warning";
                    "share button in `#{element}` references unconfigured network `{network}`"
                );
            }
        }

        let instance = WidgetInstance::new(element.to_string(), config, options.hooks, buttons);
        let inserted = match self.instances.write().entry(element.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(instance);
                true
            }
            // Lost the race between the idempotency check and the insert
            Entry::Occupied(_) => false,
        };

        if inserted {
            self.fire(element, &ShareEvent::Init);
        }
        Ok(inserted)
    }

    /// Handle a click on a share button. Logged no-op on failure.
    pub fn share(&self, doc: &Document, element: &str, network: &str) -> Option<Popup> {
        match self.try_share(doc, element, network) {
            Ok(popup) => popup,
            Err(e) => {
                log!("error"; "{e}");
                None
            }
        }
    }

    /// Handle a click on a share button.
    ///
    /// Gathers page metadata, builds the network's share URL and opens a
    /// centered popup. `Ok(None)` when the network has no template (the
    /// click is a no-op) or the popup was blocked; the render hook fires
    /// only on success.
    pub fn try_share(
        &self,
        doc: &Document,
        element: &str,
        network: &str,
    ) -> Result<Option<Popup>, WidgetError> {
        let (template, data, width, height) = {
            let instances = self.instances.read();
            let instance = instances
                .get(element)
                .ok_or_else(|| WidgetError::NotAttached(element.to_string()))?;
            let config = instance.config();
            let Some(template) = config.template(network) else {
                debug!("share"; "no template configured for network `{network}`");
                return Ok(None);
            };
            (
                template.to_string(),
                config.data.clone(),
                config.width,
                config.height,
            )
        };

        let params = gather_params(doc, &data);
        let url = build_url(&template, &params);

        let opener = self.opener.read().clone();
        let Some(popup) = open_popup(opener.as_ref(), &url, width, height) else {
            debug!("share"; "popup for `{network}` was blocked");
            return Ok(None);
        };

        self.fire(element, &ShareEvent::Render(popup.clone()));
        Ok(Some(popup))
    }

    /// Dispatch a public method by name.
    pub fn invoke(
        &self,
        element: &str,
        method: &str,
        args: &[&str],
    ) -> Result<Option<String>, WidgetError> {
        let command = Command::parse(method, args)?;
        if !self.instances.read().contains_key(element) {
            return Err(WidgetError::UnknownMethod(method.to_string()));
        }

        match command {
            Command::Option { key, value: None } => {
                let field: ConfigField = key.parse()?;
                let instances = self.instances.read();
                let instance = instances
                    .get(element)
                    .ok_or_else(|| WidgetError::UnknownMethod(method.to_string()))?;
                Ok(instance.config().get(field))
            }
            Command::Option {
                key,
                value: Some(value),
            } => {
                let field: ConfigField = key.parse()?;
                let mut instances = self.instances.write();
                let instance = instances
                    .get_mut(element)
                    .ok_or_else(|| WidgetError::UnknownMethod(method.to_string()))?;
                instance.config_mut().set(field, value)?;
                Ok(None)
            }
            Command::Destroy => {
                self.destroy(element);
                Ok(None)
            }
        }
    }

    /// Destroy an element's widget instance.
    ///
    /// The instance is removed first, then its `on_destroy` hook and the
    /// `Destroy` event fire, then the element's listeners are dropped.
    /// Returns whether an instance existed.
    pub fn destroy(&self, element: &str) -> bool {
        let Some(instance) = self.instances.write().remove(element) else {
            return false;
        };
        debug!("destroy"; "tearing down share widget `#{}`", instance.element());

        if let Some(hook) = &instance.hooks().on_destroy {
            hook();
        }
        let listeners = self
            .listeners
            .read()
            .get(element)
            .cloned()
            .unwrap_or_default();
        for listener in &listeners {
            listener(&ShareEvent::Destroy);
        }
        self.listeners.write().remove(element);
        true
    }

    /// Whether an element currently has a live instance.
    pub fn is_attached(&self, element: &str) -> bool {
        self.instances.read().contains_key(element)
    }

    /// Cached button networks of an element's instance.
    pub fn buttons(&self, element: &str) -> Vec<String> {
        self.instances
            .read()
            .get(element)
            .map(|instance| instance.buttons().to_vec())
            .unwrap_or_default()
    }

    /// Drop all instances, blobs and listeners and reset the opener.
    pub fn clear(&self) {
        self.instances.write().clear();
        self.options.write().clear();
        self.listeners.write().clear();
        *self.opener.write() = Arc::new(HeadlessOpener);
    }

    /// Invoke the matching hook and dispatch the event to listeners.
    fn fire(&self, element: &str, event: &ShareEvent) {
        let hooks = self
            .instances
            .read()
            .get(element)
            .map(|instance| instance.hooks().clone());
        if let Some(hooks) = hooks {
            match event {
                ShareEvent::Init => {
                    if let Some(hook) = hooks.on_init {
                        hook();
                    }
                }
                ShareEvent::Render(popup) => {
                    if let Some(hook) = hooks.on_render {
                        hook(popup);
                    }
                }
                ShareEvent::Destroy => {
                    if let Some(hook) = hooks.on_destroy {
                        hook();
                    }
                }
            }
        }

        let listeners = self
            .listeners
            .read()
            .get(element)
            .cloned()
            .unwrap_or_default();
        for listener in &listeners {
            listener(event);
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::{PopupGeometry, ScreenMetrics};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PAGE: &str = r#"<html><head>
        <title>Page</title>
        <meta name="description" content="About the page">
        <meta name="keywords" content="rust,web">
        <meta property="og:image" content="https://example.com/img.png">
        <link rel="canonical" href="https://example.com/page/">
    </head><body>
        <div id="share" data-shareto-options="blob" data-width="640">
            <button data-social-network="twitter">t</button>
            <button data-social-network="somethingelse">s</button>
        </div>
        <div id="plain">
            <button data-social-network="twitter">t</button>
        </div>
    </body></html>"#;

    fn doc() -> Document<'static> {
        Document::parse(PAGE).unwrap()
    }

    /// Opener with browser-like screen metrics that records opened URLs.
    #[derive(Default)]
    struct Recording {
        urls: Mutex<Vec<String>>,
    }

    impl WindowOpener for Recording {
        fn screen(&self) -> Option<ScreenMetrics> {
            Some(ScreenMetrics {
                avail_width: 1024,
                avail_height: 700,
            })
        }

        fn open(&self, url: &str, geometry: PopupGeometry) -> Option<Popup> {
            self.urls.lock().push(url.to_string());
            Some(Popup {
                url: url.to_string(),
                geometry,
            })
        }
    }

    struct Blocked;

    impl WindowOpener for Blocked {
        fn open(&self, _url: &str, _geometry: PopupGeometry) -> Option<Popup> {
            None
        }
    }

    #[test]
    fn test_attach_is_idempotent() {
        let registry = ShareRegistry::new();
        let doc = doc();

        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let hooks = Hooks::new().on_init(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let first = registry
            .try_attach(
                &doc,
                "plain",
                AttachOptions {
                    hooks,
                    ..Default::default()
                },
            )
            .unwrap();
        let second = registry
            .try_attach(&doc, "plain", AttachOptions::default())
            .unwrap();

        assert!(first);
        assert!(!second);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(registry.is_attached("plain"));
    }

    #[test]
    fn test_attach_missing_element() {
        let registry = ShareRegistry::new();
        let doc = doc();

        let result = registry.try_attach(&doc, "nope", AttachOptions::default());
        assert!(matches!(
            result,
            Err(WidgetError::Config(ConfigError::MissingElement(_)))
        ));
        assert!(!registry.is_attached("nope"));

        // the logging entry point swallows the failure
        registry.attach(&doc, "nope", AttachOptions::default());
        assert!(!registry.is_attached("nope"));
    }

    #[test]
    fn test_config_layering() {
        let registry = ShareRegistry::new();
        let doc = doc();

        registry
            .register_options("blob", r#"{"width": 600, "height": 450}"#)
            .unwrap();
        let options = AttachOptions {
            patch: ConfigPatch {
                width: Some(700),
                ..Default::default()
            },
            ..Default::default()
        };
        registry.try_attach(&doc, "share", options).unwrap();

        // element data-width beats attach options beats blob; height only
        // set by the blob
        assert_eq!(
            registry.invoke("share", "option", &["width"]).unwrap(),
            Some("640".into())
        );
        assert_eq!(
            registry.invoke("share", "option", &["height"]).unwrap(),
            Some("450".into())
        );
    }

    #[test]
    fn test_unregistered_blob_key_warns_and_continues() {
        let registry = ShareRegistry::new();
        let doc = doc();

        // "blob" never registered; attach still succeeds with element attrs
        registry.try_attach(&doc, "share", AttachOptions::default()).unwrap();
        assert_eq!(
            registry.invoke("share", "option", &["width"]).unwrap(),
            Some("640".into())
        );
    }

    #[test]
    fn test_buttons_cached_at_attach() {
        let registry = ShareRegistry::new();
        let doc = doc();

        registry.try_attach(&doc, "share", AttachOptions::default()).unwrap();
        assert_eq!(registry.buttons("share"), ["twitter", "somethingelse"]);
        assert!(registry.buttons("plain").is_empty());
    }

    #[test]
    fn test_share_builds_url_and_centers_popup() {
        let registry = ShareRegistry::new();
        let doc = doc();
        let opener = Arc::new(Recording::default());
        registry.set_opener(opener.clone());

        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();
        let popup = registry.try_share(&doc, "plain", "twitter").unwrap().unwrap();

        assert_eq!(
            popup.url,
            "https://twitter.com/share?url=https%3A%2F%2Fexample.com%2Fpage%2F\
             &text=Page&hashtags=rust%2Cweb"
        );
        assert_eq!(popup.geometry.left, 112);
        assert_eq!(popup.geometry.top, 100);
        assert_eq!(opener.urls.lock().len(), 1);
    }

    #[test]
    fn test_share_fires_render_hook_with_handle() {
        let registry = ShareRegistry::new();
        let doc = doc();

        let rendered = Arc::new(Mutex::new(Vec::new()));
        let sink = rendered.clone();
        let hooks = Hooks::new().on_render(move |popup: &Popup| {
            sink.lock().push(popup.url.clone());
        });

        registry
            .try_attach(
                &doc,
                "plain",
                AttachOptions {
                    hooks,
                    ..Default::default()
                },
            )
            .unwrap();
        registry.try_share(&doc, "plain", "twitter").unwrap();

        let urls = rendered.lock();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].starts_with("https://twitter.com/share?"));
    }

    #[test]
    fn test_blocked_popup_skips_render_hook() {
        let registry = ShareRegistry::new();
        let doc = doc();
        registry.set_opener(Arc::new(Blocked));

        let renders = Arc::new(AtomicUsize::new(0));
        let counter = renders.clone();
        let hooks = Hooks::new().on_render(move |_: &Popup| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry
            .try_attach(
                &doc,
                "plain",
                AttachOptions {
                    hooks,
                    ..Default::default()
                },
            )
            .unwrap();

        let popup = registry.try_share(&doc, "plain", "twitter").unwrap();
        assert!(popup.is_none());
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_share_unknown_network_is_noop() {
        let registry = ShareRegistry::new();
        let doc = doc();

        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();
        let popup = registry.try_share(&doc, "plain", "somethingelse").unwrap();
        assert!(popup.is_none());
    }

    #[test]
    fn test_share_unattached_element() {
        let registry = ShareRegistry::new();
        let doc = doc();

        let result = registry.try_share(&doc, "plain", "twitter");
        assert!(matches!(result, Err(WidgetError::NotAttached(_))));
        assert!(registry.share(&doc, "plain", "twitter").is_none());
    }

    #[test]
    fn test_invoke_option_set_then_get() {
        let registry = ShareRegistry::new();
        let doc = doc();
        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();

        registry.invoke("plain", "option", &["width", "320"]).unwrap();
        assert_eq!(
            registry.invoke("plain", "option", &["width"]).unwrap(),
            Some("320".into())
        );
    }

    #[test]
    fn test_invoke_unknown_method() {
        let registry = ShareRegistry::new();
        let doc = doc();
        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();

        assert!(matches!(
            registry.invoke("plain", "explode", &[]),
            Err(WidgetError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_invoke_unknown_field() {
        let registry = ShareRegistry::new();
        let doc = doc();
        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();

        assert!(matches!(
            registry.invoke("plain", "option", &["popup"]),
            Err(WidgetError::Config(ConfigError::UnknownField(_)))
        ));
    }

    #[test]
    fn test_destroy_clears_association() {
        let registry = ShareRegistry::new();
        let doc = doc();

        let destroys = Arc::new(AtomicUsize::new(0));
        let counter = destroys.clone();
        let hooks = Hooks::new().on_destroy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry
            .try_attach(
                &doc,
                "plain",
                AttachOptions {
                    hooks,
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(registry.destroy("plain"));
        assert_eq!(destroys.load(Ordering::SeqCst), 1);
        assert!(!registry.is_attached("plain"));

        // dispatch on a destroyed element is an unknown method
        assert!(matches!(
            registry.invoke("plain", "option", &["width"]),
            Err(WidgetError::UnknownMethod(_))
        ));

        // destroying again is a no-op
        assert!(!registry.destroy("plain"));
        assert_eq!(destroys.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_attach_after_destroy_recreates() {
        let registry = ShareRegistry::new();
        let doc = doc();

        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();
        registry.invoke("plain", "option", &["width", "320"]).unwrap();
        registry.destroy("plain");

        let recreated = registry
            .try_attach(&doc, "plain", AttachOptions::default())
            .unwrap();
        assert!(recreated);
        // fresh instance, fresh config
        assert_eq!(
            registry.invoke("plain", "option", &["width"]).unwrap(),
            Some("800".into())
        );
    }

    #[test]
    fn test_listeners_observe_lifecycle() {
        let registry = ShareRegistry::new();
        let doc = doc();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        registry.on("plain", move |event: &ShareEvent| {
            sink.lock().push(event.name().to_string());
        });

        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();
        registry.try_share(&doc, "plain", "twitter").unwrap();
        registry.destroy("plain");

        assert_eq!(*events.lock(), ["init", "render", "destroy"]);
    }

    #[test]
    fn test_destroy_drops_listeners() {
        let registry = ShareRegistry::new();
        let doc = doc();

        let events = Arc::new(AtomicUsize::new(0));
        let counter = events.clone();
        registry.on("plain", move |_: &ShareEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();
        registry.destroy("plain");
        let after_destroy = events.load(Ordering::SeqCst);

        // listeners were dropped with the instance: a fresh lifecycle
        // starts silent
        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();
        assert_eq!(events.load(Ordering::SeqCst), after_destroy);
    }

    #[test]
    fn test_register_options_invalid_json() {
        let registry = ShareRegistry::new();
        assert!(matches!(
            registry.register_options("blob", "{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_clear() {
        let registry = ShareRegistry::new();
        let doc = doc();

        registry.register_options("blob", r#"{"width": 600}"#).unwrap();
        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();
        registry.clear();

        assert!(!registry.is_attached("plain"));
        // blob is gone too: attach resolves pure defaults
        registry.try_attach(&doc, "plain", AttachOptions::default()).unwrap();
        assert_eq!(
            registry.invoke("plain", "option", &["width"]).unwrap(),
            Some("800".into())
        );
    }

    #[test]
    fn test_static_overrides_flow_into_url() {
        let registry = ShareRegistry::new();
        let doc = doc();

        let options = AttachOptions {
            patch: ConfigPatch {
                data: crate::config::ShareData {
                    title: Some("Custom title".into()),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        registry.try_attach(&doc, "plain", options).unwrap();

        let popup = registry.try_share(&doc, "plain", "twitter").unwrap().unwrap();
        assert!(popup.url.contains("text=Custom%20title"));
    }
}
