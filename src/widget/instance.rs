//! One attached widget: its config, hooks and cached button list.

use crate::config::ShareConfig;

use super::Hooks;

/// A live widget bound to one container element.
///
/// Created by a successful attach, held by the registry, dropped by
/// destroy. The button list is cached at attach time; configuration is
/// only mutated afterwards through the `option` accessor.
pub struct WidgetInstance {
    element: String,
    config: ShareConfig,
    hooks: Hooks,
    buttons: Vec<String>,
}

impl WidgetInstance {
    pub(crate) fn new(
        element: String,
        config: ShareConfig,
        hooks: Hooks,
        buttons: Vec<String>,
    ) -> Self {
        Self {
            element,
            config,
            hooks,
            buttons,
        }
    }

    /// Container element id this instance is bound to.
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut ShareConfig {
        &mut self.config
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Network identifiers of the share buttons found at attach time.
    pub fn buttons(&self) -> &[String] {
        &self.buttons
    }
}
