//! Types crossing the driver boundary

use plan_core::ElementState;
use serde::{Deserialize, Serialize};

/// Lookup strategy handed to [`crate::BrowserDriver::find_element`].
///
/// Each strategy is an exact match; fuzzy matching is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindStrategy {
    /// Explicit CSS selector
    Selector,

    /// `id` or `name` attribute equality
    IdOrName,

    /// Associated label text equality
    Label,

    /// Placeholder text equality
    Placeholder,

    /// Visible text equality, clickable elements only
    VisibleText,
}

impl FindStrategy {
    /// Stable name for logging and reports
    pub fn name(&self) -> &'static str {
        match self {
            FindStrategy::Selector => "selector",
            FindStrategy::IdOrName => "id-or-name",
            FindStrategy::Label => "label",
            FindStrategy::Placeholder => "placeholder",
            FindStrategy::VisibleText => "visible-text",
        }
    }
}

/// Live element reference returned by the driver.
///
/// Carries the descriptor metadata the engine needs to classify the control
/// kind without a second round-trip. Handles are only valid for the page
/// they were resolved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Driver-scoped node identifier
    pub node_id: String,

    /// Lowercase tag name
    pub tag: String,

    /// `type` attribute for input elements
    pub input_type: Option<String>,
}

impl ElementHandle {
    /// Classify the control for kind-appropriate set operations.
    pub fn control_kind(&self) -> ControlKind {
        match self.tag.as_str() {
            "select" => ControlKind::Select,
            "textarea" => ControlKind::Textarea,
            _ => match self.input_type.as_deref() {
                Some("checkbox") => ControlKind::Checkbox,
                Some("radio") => ControlKind::Radio,
                _ => ControlKind::Text,
            },
        }
    }
}

/// Form control classification used by the fill handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Text-like input (text, email, password, number, ...)
    Text,

    /// Dropdown / listbox
    Select,

    /// Checkbox toggle
    Checkbox,

    /// Radio toggle
    Radio,

    /// Multi-line text area
    Textarea,
}

/// Terminal state of a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationOutcome {
    /// URL the browser settled on
    pub final_url: String,

    /// HTTP status of the main document, when the driver reports one
    pub status: Option<u16>,
}

impl NavigationOutcome {
    /// True when the reported status (if any) is an error class.
    pub fn is_error_status(&self) -> bool {
        matches!(self.status, Some(status) if !(200..400).contains(&status))
    }
}

/// Scope of a text read.
#[derive(Debug, Clone, Copy)]
pub enum ReadScope<'a> {
    /// Full rendered text of the page
    Page,

    /// Live value / text content of one element
    Element(&'a ElementHandle),
}

/// Conditions the driver can wait on.
#[derive(Debug, Clone)]
pub enum WaitFor {
    /// Element is visible and enabled
    ElementInteractable(ElementHandle),

    /// Element matched by selector reaches the given state
    ElementState {
        selector: String,
        state: ElementState,
    },

    /// Current URL differs from the given one (navigation happened)
    UrlChangedFrom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(tag: &str, input_type: Option<&str>) -> ElementHandle {
        ElementHandle {
            node_id: "n1".into(),
            tag: tag.into(),
            input_type: input_type.map(Into::into),
        }
    }

    #[test]
    fn control_kind_classification() {
        assert_eq!(handle("select", None).control_kind(), ControlKind::Select);
        assert_eq!(
            handle("textarea", None).control_kind(),
            ControlKind::Textarea
        );
        assert_eq!(
            handle("input", Some("checkbox")).control_kind(),
            ControlKind::Checkbox
        );
        assert_eq!(
            handle("input", Some("radio")).control_kind(),
            ControlKind::Radio
        );
        assert_eq!(
            handle("input", Some("email")).control_kind(),
            ControlKind::Text
        );
        assert_eq!(handle("input", None).control_kind(), ControlKind::Text);
    }

    #[test]
    fn error_status_classes() {
        let ok = NavigationOutcome {
            final_url: "https://x".into(),
            status: Some(200),
        };
        assert!(!ok.is_error_status());

        let redirect = NavigationOutcome {
            final_url: "https://x".into(),
            status: Some(302),
        };
        assert!(!redirect.is_error_status());

        let server_error = NavigationOutcome {
            final_url: "https://x".into(),
            status: Some(500),
        };
        assert!(server_error.is_error_status());

        let unknown = NavigationOutcome {
            final_url: "https://x".into(),
            status: None,
        };
        assert!(!unknown.is_error_status());
    }
}
