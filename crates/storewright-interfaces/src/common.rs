use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Element state a bounded wait can observe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WaitState {
    /// At least one matching element is in the DOM.
    Attached,
    /// At least one matching element is rendered and visible.
    Visible,
    /// No matching element is visible (absent elements count as hidden).
    Hidden,
    /// No matching element is in the DOM.
    Detached,
}

/// Available formats for taking screenshots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ScreenshotFormat {
    #[default]
    Png,
    Jpeg,
}

/// Options for taking a screenshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScreenshotOptions {
    /// Format of the resulting image. Defaults to Png.
    pub format: ScreenshotFormat,
    /// Capture the whole scrollable page instead of the viewport.
    pub full_page: bool,
}

impl ScreenshotOptions {
    pub fn full_page() -> Self {
        Self {
            full_page: true,
            ..Default::default()
        }
    }
}

/// Snapshot of a page's authenticated storage (cookies, local storage).
///
/// The layout is whatever the provider natively persists; callers only move it
/// around and hand it back to the same kind of provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct StorageState(pub Value);

impl StorageState {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}
