//! Chirp Theme - dark/light theme state
//!
//! Holds the dark-mode flag and mirrors every change onto an injected
//! display surface. The surface stands in for whatever global display
//! attribute the host UI uses; this crate never touches the platform
//! directly.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment color-scheme preference used to initialize the theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Display surface the theme flag is mirrored onto
pub trait ThemeSurface {
    fn apply(&mut self, dark: bool);
}

impl<F> ThemeSurface for F
where
    F: FnMut(bool),
{
    fn apply(&mut self, dark: bool) {
        self(dark)
    }
}

/// Theme state owner.
///
/// Invariant: after any operation the surface has been applied with the
/// current flag value.
pub struct ThemeManager {
    dark: bool,
    surface: Box<dyn ThemeSurface + Send>,
}

impl ThemeManager {
    /// Create a manager starting in light mode and apply the initial state
    /// to the surface.
    pub fn new(surface: Box<dyn ThemeSurface + Send>) -> Self {
        let mut manager = Self {
            dark: false,
            surface,
        };
        manager.surface.apply(manager.dark);
        manager
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Flip the flag and re-apply it to the surface
    pub fn toggle(&mut self) -> bool {
        self.set_dark(!self.dark);
        self.dark
    }

    /// Set the flag and mirror it onto the surface
    pub fn set_dark(&mut self, dark: bool) {
        debug!("Theme -> {}", if dark { "dark" } else { "light" });
        self.dark = dark;
        self.surface.apply(dark);
    }

    /// Initialize from the environment preference signal
    pub fn init_from(&mut self, preference: ColorScheme) {
        self.set_dark(preference == ColorScheme::Dark);
    }
}
