//! Form fill handler

use crate::errors::{ErrorInfo, FailureKind};
use crate::handlers::{is_truthy, value_to_string};
use crate::types::{ActionData, ActionResult, FieldFill};
use driver_port::{BrowserDriver, ControlKind};
use element_resolver::ElementResolver;
use plan_core::Step;
use tracing::{info, warn};

/// Best-effort fill of every field in `target.form_data`, in plan order.
///
/// Each field resolves independently; a field that cannot be resolved or
/// set is recorded in the payload and the fill moves on. The step succeeds
/// when at least one field was filled. A fatal driver failure (session
/// loss) aborts the remaining fields.
pub(crate) async fn execute_fill_form(
    driver: &dyn BrowserDriver,
    resolver: &dyn ElementResolver,
    step: &Step,
) -> ActionResult {
    let form_data = &step.target.form_data;
    let total = form_data.len();
    let mut fields: Vec<FieldFill> = Vec::with_capacity(total);
    let mut fatal: Option<ErrorInfo> = None;

    info!(step = step.step_number, total, "filling form");

    for (name, value) in form_data {
        let resolved = match resolver.resolve_field(name).await {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                warn!(field = %name, "form field not found");
                fields.push(FieldFill::not_found(name));
                continue;
            }
            Err(err) => {
                let element_resolver::ResolveError::Driver(driver_err) = err;
                let info = ErrorInfo::from_driver(driver_err, FailureKind::ElementNotFound);
                if info.severity() == crate::Severity::Fatal {
                    fatal = Some(info);
                    break;
                }
                fields.push(FieldFill::not_found(name));
                continue;
            }
        };

        let control = resolved.handle.control_kind();
        let rendered = match control {
            ControlKind::Checkbox | ControlKind::Radio => is_truthy(value).to_string(),
            _ => value_to_string(value),
        };

        match driver.set_value(&resolved.handle, &rendered).await {
            Ok(()) => fields.push(FieldFill::filled(name, control)),
            Err(err) => {
                let info = ErrorInfo::from_driver(err, FailureKind::ElementNotFound);
                if info.severity() == crate::Severity::Fatal {
                    fatal = Some(info);
                    break;
                }
                fields.push(FieldFill::failed(name, control, info.message));
            }
        }
    }

    let filled = fields.iter().filter(|field| field.is_filled()).count();
    let data = ActionData::FillForm {
        fields,
        filled,
        total,
    };

    if let Some(error) = fatal {
        return ActionResult::failure(data, error);
    }

    if filled > 0 {
        ActionResult::success(data)
    } else {
        ActionResult::failure(
            data,
            ErrorInfo::new(
                FailureKind::ElementNotFound,
                format!("none of the {total} form fields could be filled"),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldOutcome;
    use driver_port::{ElementFixture, PageFixture, ScriptedDriver, ScriptedSite};
    use element_resolver::DefaultElementResolver;
    use plan_core::{ActionKind, FormData, TargetSpec};
    use serde_json::json;
    use std::sync::Arc;

    fn form_data(pairs: &[(&str, serde_json::Value)]) -> FormData {
        let mut data = FormData::new();
        for (name, value) in pairs {
            data.insert((*name).to_string(), value.clone());
        }
        data
    }

    async fn setup(page: PageFixture) -> (Arc<ScriptedDriver>, DefaultElementResolver) {
        let url = page.url.clone();
        let driver = Arc::new(ScriptedDriver::new(ScriptedSite::new(vec![page])));
        driver.navigate(&url).await.unwrap();
        let resolver = DefaultElementResolver::new(driver.clone());
        (driver, resolver)
    }

    #[tokio::test]
    async fn fills_every_resolvable_field() {
        let page = PageFixture::new("https://form.test")
            .with_element(ElementFixture::input("name"))
            .with_element(ElementFixture::input("email").with_input_type("email"));
        let (driver, resolver) = setup(page).await;

        let step = Step::new(1, ActionKind::FillForm).with_target(TargetSpec::form(form_data(&[
            ("name", json!("Test")),
            ("email", json!("t@x.com")),
        ])));
        let result = execute_fill_form(driver.as_ref(), &resolver, &step).await;

        assert!(result.success);
        match result.data {
            ActionData::FillForm {
                fields,
                filled,
                total,
            } => {
                assert_eq!((filled, total), (2, 2));
                assert!(fields.iter().all(FieldFill::is_filled));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn partial_fill_still_succeeds_and_records_misses() {
        let page = PageFixture::new("https://form.test")
            .with_element(ElementFixture::input("name"));
        let (driver, resolver) = setup(page).await;

        let step = Step::new(1, ActionKind::FillForm).with_target(TargetSpec::form(form_data(&[
            ("name", json!("Test")),
            ("phone", json!("555-0100")),
        ])));
        let result = execute_fill_form(driver.as_ref(), &resolver, &step).await;

        assert!(result.success);
        match result.data {
            ActionData::FillForm { fields, filled, .. } => {
                assert_eq!(filled, 1);
                assert_eq!(fields[1].outcome, FieldOutcome::NotFound);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_fillable_field_is_a_failure() {
        let (driver, resolver) = setup(PageFixture::new("https://form.test")).await;
        let step = Step::new(1, ActionKind::FillForm)
            .with_target(TargetSpec::form(form_data(&[("name", json!("Test"))])));
        let result = execute_fill_form(driver.as_ref(), &resolver, &step).await;

        assert!(!result.success);
        assert_eq!(result.error.unwrap().kind, FailureKind::ElementNotFound);
    }

    #[tokio::test]
    async fn checkbox_values_apply_as_checked_state() {
        let page = PageFixture::new("https://form.test")
            .with_element(ElementFixture::input("subscribe").with_input_type("checkbox"));
        let (driver, resolver) = setup(page).await;

        let step = Step::new(1, ActionKind::FillForm)
            .with_target(TargetSpec::form(form_data(&[("subscribe", json!(true))])));
        let result = execute_fill_form(driver.as_ref(), &resolver, &step).await;

        assert!(result.success);
        match result.data {
            ActionData::FillForm { fields, .. } => {
                assert_eq!(fields[0].control, Some(ControlKind::Checkbox));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fill_order_follows_plan_insertion_order() {
        let page = PageFixture::new("https://form.test")
            .with_element(ElementFixture::input("zeta"))
            .with_element(ElementFixture::input("alpha"));
        let (driver, resolver) = setup(page).await;

        let step = Step::new(1, ActionKind::FillForm).with_target(TargetSpec::form(form_data(&[
            ("zeta", json!("1")),
            ("alpha", json!("2")),
        ])));
        let result = execute_fill_form(driver.as_ref(), &resolver, &step).await;

        match result.data {
            ActionData::FillForm { fields, .. } => {
                let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, ["zeta", "alpha"]);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
