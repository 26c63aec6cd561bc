//! One handler per action kind
//!
//! Handlers perform the browser work for a single step and fold every
//! failure into the returned [`crate::ActionResult`].

pub mod click;
pub mod fill_form;
pub mod navigate;
pub mod screenshot;
pub mod submit;
pub mod type_text;
pub mod wait;

use serde_json::Value;

/// Selector used when a submit step names no control of its own.
pub const DEFAULT_SUBMIT_SELECTOR: &str = "button[type=submit]";

/// Render a form value the way it would be typed.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truthiness for checkbox / radio values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            !s.is_empty() && s != "false" && s != "no" && s != "off" && s != "0"
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_render_like_typed_input() {
        assert_eq!(value_to_string(&json!("Test")), "Test");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(true)), "true");
    }

    #[test]
    fn checkbox_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("false")));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(null)));
    }
}
