//! Popup window geometry and the window-opener seam.
//!
//! The engine computes where a share popup goes and what chrome it gets;
//! actually creating the window is the embedder's job through
//! [`WindowOpener`]. A blocked popup is represented as `None`, never as an
//! error, and skips the render hook.

/// Window target name shared by all popups.
pub const WINDOW_NAME: &str = "social";

/// Screen area assumed when no metrics are available.
pub const FALLBACK_SCREEN: ScreenMetrics = ScreenMetrics {
    avail_width: 1024,
    avail_height: 700,
};

/// Available screen area reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMetrics {
    pub avail_width: u32,
    pub avail_height: u32,
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        FALLBACK_SCREEN
    }
}

/// Size and position of a popup window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupGeometry {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
}

impl PopupGeometry {
    /// Center a `width`×`height` popup on the available screen area.
    ///
    /// Offsets floor toward negative infinity, so a popup larger than the
    /// screen gets a negative offset rather than clamping.
    pub fn centered(width: u32, height: u32, screen: Option<ScreenMetrics>) -> Self {
        let screen = screen.unwrap_or_default();
        let left = (screen.avail_width as i32 - width as i32).div_euclid(2);
        let top = (screen.avail_height as i32 - height as i32).div_euclid(2);
        Self {
            width,
            height,
            left,
            top,
        }
    }

    /// Window feature list: sized, positioned, minimal chrome, scrollable
    /// and resizable.
    pub fn features(&self) -> String {
        [
            format!("width={}", self.width),
            format!("height={}", self.height),
            format!("left={}", self.left),
            format!("top={}", self.top),
            "location=0".into(),
            "menubar=0".into(),
            "toolbar=0".into(),
            "status=0".into(),
            "scrollbars=1".into(),
            "resizable=1".into(),
        ]
        .join(",")
    }
}

/// Handle to an opened share popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub url: String,
    pub geometry: PopupGeometry,
}

/// Environment seam for creating popup windows.
///
/// A browser embedding implements this over its window manager; tests and
/// headless embeddings use [`HeadlessOpener`] or their own stub.
pub trait WindowOpener: Send + Sync {
    /// Available screen area, `None` outside a browser context.
    fn screen(&self) -> Option<ScreenMetrics> {
        None
    }

    /// Create the popup window. `None` means creation was blocked.
    ///
    /// Implementations target the shared [`WINDOW_NAME`] and pass
    /// [`PopupGeometry::features`] as the window feature list.
    fn open(&self, url: &str, geometry: PopupGeometry) -> Option<Popup>;

    /// Bring an opened popup to the foreground.
    fn focus(&self, _popup: &Popup) {}
}

/// Opener for environments without a real window manager.
///
/// Reports no screen metrics and never blocks: every open returns the
/// handle it was asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessOpener;

impl WindowOpener for HeadlessOpener {
    fn open(&self, url: &str, geometry: PopupGeometry) -> Option<Popup> {
        Some(Popup {
            url: url.to_string(),
            geometry,
        })
    }
}

/// Open a centered share popup.
///
/// Computes geometry from the opener's screen metrics, opens the window
/// and focuses it. `None` when the opener blocked the popup.
pub fn open_popup(opener: &dyn WindowOpener, url: &str, width: u32, height: u32) -> Option<Popup> {
    let geometry = PopupGeometry::centered(width, height, opener.screen());
    let popup = opener.open(url, geometry)?;
    opener.focus(&popup);
    Some(popup)
}

// ============================================================================
// tests
// ============================================================================
