//! Session color-mode context.
//!
//! # Responsibility
//! - Hold the light/dark preference for the running app session.
//! - Broadcast every change to subscribed screens.
//!
//! # Invariants
//! - The preference lives in memory only and starts as `Light`.
//! - The context is created once at startup and passed explicitly to its
//!   consumers; there is no global instance.

use log::info;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Shared, observable color-mode preference.
#[derive(Debug)]
pub struct ColorModeContext {
    sender: watch::Sender<ColorMode>,
}

impl Default for ColorModeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorModeContext {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ColorMode::default());
        Self { sender }
    }

    pub fn current(&self) -> ColorMode {
        *self.sender.borrow()
    }

    pub fn is_dark(&self) -> bool {
        self.current() == ColorMode::Dark
    }

    /// Sets the mode and notifies subscribers when it changed.
    pub fn set(&self, mode: ColorMode) {
        let changed = self.sender.send_if_modified(|current| {
            if *current == mode {
                return false;
            }
            *current = mode;
            true
        });
        if changed {
            info!(
                "event=color_mode_set module=appearance status=ok mode={}",
                mode.as_str()
            );
        }
    }

    /// Flips light/dark and returns the new mode.
    pub fn toggle(&self) -> ColorMode {
        let mut next = ColorMode::default();
        self.sender.send_modify(|mode| {
            *mode = mode.toggled();
            next = *mode;
        });
        info!(
            "event=color_mode_set module=appearance status=ok mode={}",
            next.as_str()
        );
        next
    }

    /// Returns to the startup default.
    pub fn reset(&self) {
        self.set(ColorMode::default());
    }

    /// Receiver that observes the current mode and every later change.
    pub fn subscribe(&self) -> watch::Receiver<ColorMode> {
        self.sender.subscribe()
    }
}
