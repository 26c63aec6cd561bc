//! Deterministic scripted driver
//!
//! An in-memory [`BrowserDriver`] over declarative page fixtures. Every
//! operation is instantaneous and fully determined by the fixture, so
//! re-running the same plan yields identical outcomes; `wait_for` evaluates
//! its condition once, and a `false` answer models timeout expiry.

use crate::errors::DriverError;
use crate::port::{BrowserDriver, DriverSessionFactory};
use crate::types::{ControlKind, ElementHandle, FindStrategy, NavigationOutcome, ReadScope, WaitFor};
use async_trait::async_trait;
use parking_lot::Mutex;
use plan_core::ElementState;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A set of pages the scripted driver can serve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptedSite {
    pub pages: Vec<PageFixture>,
}

impl ScriptedSite {
    pub fn new(pages: Vec<PageFixture>) -> Self {
        Self { pages }
    }

    fn page(&self, url: &str) -> Option<&PageFixture> {
        self.pages.iter().find(|page| page.url == url)
    }
}

/// One navigable page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFixture {
    /// Exact URL the page answers on
    pub url: String,

    /// HTTP status of the main document
    #[serde(default = "default_status")]
    pub status: u16,

    /// Full rendered text of the page
    #[serde(default)]
    pub text: String,

    /// Elements in document order
    #[serde(default)]
    pub elements: Vec<ElementFixture>,

    /// Entering this page tears the whole session down
    #[serde(default)]
    pub crashes_session: bool,
}

fn default_status() -> u16 {
    200
}

impl PageFixture {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            text: String::new(),
            elements: Vec::new(),
            crashes_session: false,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_element(mut self, element: ElementFixture) -> Self {
        self.elements.push(element);
        self
    }

    pub fn crashes_session(mut self) -> Self {
        self.crashes_session = true;
        self
    }
}

/// One element on a fixture page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementFixture {
    /// Explicit selector the element answers to
    #[serde(default)]
    pub selector: Option<String>,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Associated label text
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub placeholder: Option<String>,

    /// Visible text content
    #[serde(default)]
    pub text: Option<String>,

    /// Lowercase tag name
    #[serde(default = "default_tag")]
    pub tag: String,

    /// `type` attribute for inputs
    #[serde(default)]
    pub input_type: Option<String>,

    /// Current value (mutated by `set_value`)
    #[serde(default)]
    pub value: String,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Effect applied when the element is clicked
    #[serde(default)]
    pub on_click: Option<ClickEffect>,
}

fn default_tag() -> String {
    "input".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ElementFixture {
    fn default() -> Self {
        Self {
            selector: None,
            id: None,
            name: None,
            label: None,
            placeholder: None,
            text: None,
            tag: default_tag(),
            input_type: None,
            value: String::new(),
            visible: true,
            enabled: true,
            on_click: None,
        }
    }
}

impl ElementFixture {
    /// Text input addressed by its `name` attribute
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Clickable button with visible text
    pub fn button(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tag: "button".to_string(),
            ..Self::default()
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Clicking navigates to the given page
    pub fn goto_on_click(mut self, url: impl Into<String>) -> Self {
        self.on_click = Some(ClickEffect {
            goto: Some(url.into()),
            replace_page_text: None,
        });
        self
    }

    /// Clicking swaps the page text in place (in-page submission)
    pub fn replace_text_on_click(mut self, text: impl Into<String>) -> Self {
        self.on_click = Some(ClickEffect {
            goto: None,
            replace_page_text: Some(text.into()),
        });
        self
    }

    fn is_clickable(&self) -> bool {
        matches!(self.tag.as_str(), "button" | "a")
            || matches!(self.input_type.as_deref(), Some("submit") | Some("button"))
            || self.on_click.is_some()
    }
}

/// Side effect of clicking an element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickEffect {
    /// Navigate to this page
    #[serde(default)]
    pub goto: Option<String>,

    /// Replace the page text without navigating
    #[serde(default)]
    pub replace_page_text: Option<String>,
}

struct SessionState {
    current_url: String,
    page_text: String,
    elements: Vec<ElementFixture>,
    node_ids: Vec<String>,
    closed: bool,
    shots: u32,
}

/// Deterministic in-memory driver over a [`ScriptedSite`].
pub struct ScriptedDriver {
    site: ScriptedSite,
    state: Mutex<SessionState>,
}

impl ScriptedDriver {
    pub fn new(site: ScriptedSite) -> Self {
        Self {
            site,
            state: Mutex::new(SessionState {
                current_url: "about:blank".to_string(),
                page_text: String::new(),
                elements: Vec::new(),
                node_ids: Vec::new(),
                closed: false,
                shots: 0,
            }),
        }
    }

    fn load_page(state: &mut SessionState, page: &PageFixture) {
        state.current_url = page.url.clone();
        state.page_text = page.text.clone();
        state.elements = page.elements.clone();
        state.node_ids = (0..page.elements.len())
            .map(|idx| format!("{}::{}", page.url, idx))
            .collect();
    }

    fn ensure_open(state: &SessionState) -> Result<(), DriverError> {
        if state.closed {
            Err(DriverError::SessionLost("session closed".to_string()))
        } else {
            Ok(())
        }
    }

    fn element_index(state: &SessionState, handle: &ElementHandle) -> Result<usize, DriverError> {
        state
            .node_ids
            .iter()
            .position(|id| id == &handle.node_id)
            .ok_or_else(|| {
                DriverError::Protocol(format!("stale element handle: {}", handle.node_id))
            })
    }

    fn matches(element: &ElementFixture, strategy: FindStrategy, value: &str) -> bool {
        let norm = |s: &str| s.trim().to_lowercase();
        match strategy {
            FindStrategy::Selector => {
                element.selector.as_deref() == Some(value)
                    || value
                        .strip_prefix('#')
                        .is_some_and(|id| element.id.as_deref() == Some(id))
                    || element
                        .name
                        .as_deref()
                        .is_some_and(|name| value == format!("[name=\"{name}\"]"))
            }
            FindStrategy::IdOrName => {
                element.id.as_deref() == Some(value) || element.name.as_deref() == Some(value)
            }
            FindStrategy::Label => element
                .label
                .as_deref()
                .is_some_and(|label| norm(label) == norm(value)),
            FindStrategy::Placeholder => element
                .placeholder
                .as_deref()
                .is_some_and(|placeholder| norm(placeholder) == norm(value)),
            FindStrategy::VisibleText => {
                element.is_clickable()
                    && element
                        .text
                        .as_deref()
                        .is_some_and(|text| norm(text) == norm(value))
            }
        }
    }

    fn find_in_state(
        state: &SessionState,
        strategy: FindStrategy,
        value: &str,
    ) -> Option<(usize, ElementHandle)> {
        // First match in document order; ambiguity resolves deterministically.
        state
            .elements
            .iter()
            .enumerate()
            .find(|(_, element)| Self::matches(element, strategy, value))
            .map(|(idx, element)| {
                (
                    idx,
                    ElementHandle {
                        node_id: state.node_ids[idx].clone(),
                        tag: element.tag.clone(),
                        input_type: element.input_type.clone(),
                    },
                )
            })
    }
}

#[async_trait]
impl BrowserDriver for ScriptedDriver {
    async fn navigate(&self, url: &str) -> Result<NavigationOutcome, DriverError> {
        let mut state = self.state.lock();
        Self::ensure_open(&state)?;

        let page = self
            .site
            .page(url)
            .ok_or_else(|| DriverError::Navigation(format!("no route for {url}")))?
            .clone();

        if page.crashes_session {
            state.closed = true;
            return Err(DriverError::SessionLost(format!(
                "session crashed entering {url}"
            )));
        }

        Self::load_page(&mut state, &page);
        debug!(url, status = page.status, "scripted navigation");
        Ok(NavigationOutcome {
            final_url: page.url,
            status: Some(page.status),
        })
    }

    async fn find_element(
        &self,
        strategy: FindStrategy,
        value: &str,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let state = self.state.lock();
        Self::ensure_open(&state)?;
        Ok(Self::find_in_state(&state, strategy, value).map(|(_, handle)| handle))
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        let effect = {
            let mut state = self.state.lock();
            Self::ensure_open(&state)?;
            let idx = Self::element_index(&state, handle)?;
            let element = &state.elements[idx];
            if !element.visible || !element.enabled {
                return Err(DriverError::Protocol(format!(
                    "element not interactable: {}",
                    handle.node_id
                )));
            }
            let effect = element.on_click.clone();
            if let Some(ClickEffect {
                replace_page_text: Some(text),
                goto: None,
            }) = &effect
            {
                state.page_text = text.clone();
            }
            effect
        };

        if let Some(ClickEffect {
            goto: Some(url), ..
        }) = effect
        {
            self.navigate(&url).await?;
        }
        Ok(())
    }

    async fn set_value(&self, handle: &ElementHandle, value: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        Self::ensure_open(&state)?;
        let idx = Self::element_index(&state, handle)?;
        let element = &mut state.elements[idx];
        element.value = match handle.control_kind() {
            ControlKind::Checkbox | ControlKind::Radio => {
                if value == "true" { "true" } else { "false" }.to_string()
            }
            _ => value.to_string(),
        };
        Ok(())
    }

    async fn read_text(&self, scope: ReadScope<'_>) -> Result<String, DriverError> {
        let state = self.state.lock();
        Self::ensure_open(&state)?;
        match scope {
            ReadScope::Page => Ok(state.page_text.clone()),
            ReadScope::Element(handle) => {
                let idx = Self::element_index(&state, handle)?;
                Ok(state.elements[idx].value.clone())
            }
        }
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let state = self.state.lock();
        Self::ensure_open(&state)?;
        Ok(state.current_url.clone())
    }

    async fn wait_for(&self, condition: &WaitFor, _timeout: Duration) -> Result<bool, DriverError> {
        let state = self.state.lock();
        Self::ensure_open(&state)?;
        let met = match condition {
            WaitFor::ElementInteractable(handle) => Self::element_index(&state, handle)
                .map(|idx| {
                    let element = &state.elements[idx];
                    element.visible && element.enabled
                })
                .unwrap_or(false),
            WaitFor::ElementState { selector, state: wanted } => {
                let found = Self::find_in_state(&state, FindStrategy::Selector, selector);
                match wanted {
                    ElementState::Visible => found
                        .map(|(idx, _)| state.elements[idx].visible)
                        .unwrap_or(false),
                    ElementState::Hidden => found
                        .map(|(idx, _)| !state.elements[idx].visible)
                        .unwrap_or(true),
                    ElementState::Attached => found.is_some(),
                }
            }
            WaitFor::UrlChangedFrom(url) => state.current_url != *url,
        };
        Ok(met)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        let mut state = self.state.lock();
        Self::ensure_open(&state)?;
        state.shots += 1;
        let mut bytes = vec![0x89, b'P', b'N', b'G'];
        bytes.extend_from_slice(state.shots.to_string().as_bytes());
        Ok(bytes)
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.state.lock().closed = true;
        Ok(())
    }
}

#[async_trait]
impl DriverSessionFactory for ScriptedSite {
    async fn acquire(&self) -> Result<Box<dyn BrowserDriver>, DriverError> {
        Ok(Box::new(ScriptedDriver::new(self.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_site() -> ScriptedSite {
        ScriptedSite::new(vec![
            PageFixture::new("https://app.test/login")
                .with_text("Please sign in")
                .with_element(
                    ElementFixture::input("email")
                        .with_id("email")
                        .with_label("Email address")
                        .with_placeholder("you@example.com")
                        .with_input_type("email"),
                )
                .with_element(
                    ElementFixture::button("Sign in")
                        .with_selector("button[type=submit]")
                        .goto_on_click("https://app.test/home"),
                ),
            PageFixture::new("https://app.test/home").with_text("Welcome back"),
        ])
    }

    #[tokio::test]
    async fn navigation_loads_the_fixture_page() {
        let driver = ScriptedDriver::new(login_site());
        let outcome = driver.navigate("https://app.test/login").await.unwrap();
        assert_eq!(outcome.status, Some(200));
        assert_eq!(
            driver.current_url().await.unwrap(),
            "https://app.test/login"
        );
        assert_eq!(
            driver.read_text(ReadScope::Page).await.unwrap(),
            "Please sign in"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_a_navigation_error() {
        let driver = ScriptedDriver::new(login_site());
        assert!(matches!(
            driver.navigate("https://app.test/nowhere").await,
            Err(DriverError::Navigation(_))
        ));
    }

    #[tokio::test]
    async fn find_element_honors_each_strategy() {
        let driver = ScriptedDriver::new(login_site());
        driver.navigate("https://app.test/login").await.unwrap();

        for (strategy, value) in [
            (FindStrategy::Selector, "#email"),
            (FindStrategy::IdOrName, "email"),
            (FindStrategy::Label, "Email address"),
            (FindStrategy::Placeholder, "you@example.com"),
        ] {
            let handle = driver.find_element(strategy, value).await.unwrap();
            assert!(handle.is_some(), "strategy {strategy:?} should match");
        }

        let button = driver
            .find_element(FindStrategy::VisibleText, "Sign in")
            .await
            .unwrap();
        assert_eq!(button.unwrap().tag, "button");

        assert!(driver
            .find_element(FindStrategy::IdOrName, "missing")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn ambiguous_match_returns_first_in_document_order() {
        let site = ScriptedSite::new(vec![PageFixture::new("https://dup.test")
            .with_element(ElementFixture::button("Save").with_id("first"))
            .with_element(ElementFixture::button("Save").with_id("second"))]);
        let driver = ScriptedDriver::new(site);
        driver.navigate("https://dup.test").await.unwrap();

        let handle = driver
            .find_element(FindStrategy::VisibleText, "Save")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(handle.node_id, "https://dup.test::0");
    }

    #[tokio::test]
    async fn click_navigates_and_stale_handles_are_rejected() {
        let driver = ScriptedDriver::new(login_site());
        driver.navigate("https://app.test/login").await.unwrap();
        let button = driver
            .find_element(FindStrategy::VisibleText, "Sign in")
            .await
            .unwrap()
            .unwrap();

        driver.click(&button).await.unwrap();
        assert_eq!(driver.current_url().await.unwrap(), "https://app.test/home");

        // Handle from the login page no longer resolves.
        assert!(matches!(
            driver.click(&button).await,
            Err(DriverError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn set_value_echoes_back_and_checkboxes_normalize() {
        let site = ScriptedSite::new(vec![PageFixture::new("https://form.test")
            .with_element(ElementFixture::input("email"))
            .with_element(ElementFixture::input("subscribe").with_input_type("checkbox"))]);
        let driver = ScriptedDriver::new(site);
        driver.navigate("https://form.test").await.unwrap();

        let email = driver
            .find_element(FindStrategy::IdOrName, "email")
            .await
            .unwrap()
            .unwrap();
        driver.set_value(&email, "t@x.com").await.unwrap();
        assert_eq!(
            driver.read_text(ReadScope::Element(&email)).await.unwrap(),
            "t@x.com"
        );

        let subscribe = driver
            .find_element(FindStrategy::IdOrName, "subscribe")
            .await
            .unwrap()
            .unwrap();
        driver.set_value(&subscribe, "yes").await.unwrap();
        assert_eq!(
            driver
                .read_text(ReadScope::Element(&subscribe))
                .await
                .unwrap(),
            "false"
        );
        driver.set_value(&subscribe, "true").await.unwrap();
        assert_eq!(
            driver
                .read_text(ReadScope::Element(&subscribe))
                .await
                .unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn wait_for_url_change_detects_in_page_submission() {
        let site = ScriptedSite::new(vec![PageFixture::new("https://ajax.test")
            .with_text("form")
            .with_element(
                ElementFixture::button("Send")
                    .with_selector("button[type=submit]")
                    .replace_text_on_click("Thanks, received"),
            )]);
        let driver = ScriptedDriver::new(site);
        driver.navigate("https://ajax.test").await.unwrap();
        let button = driver
            .find_element(FindStrategy::Selector, "button[type=submit]")
            .await
            .unwrap()
            .unwrap();

        driver.click(&button).await.unwrap();
        let navigated = driver
            .wait_for(
                &WaitFor::UrlChangedFrom("https://ajax.test".to_string()),
                Duration::from_millis(100),
            )
            .await
            .unwrap();
        assert!(!navigated);
        assert_eq!(
            driver.read_text(ReadScope::Page).await.unwrap(),
            "Thanks, received"
        );
    }

    #[tokio::test]
    async fn crash_page_tears_the_session_down() {
        let site = ScriptedSite::new(vec![
            PageFixture::new("https://ok.test"),
            PageFixture::new("https://boom.test").crashes_session(),
        ]);
        let driver = ScriptedDriver::new(site);
        driver.navigate("https://ok.test").await.unwrap();
        assert!(matches!(
            driver.navigate("https://boom.test").await,
            Err(DriverError::SessionLost(_))
        ));
        assert!(matches!(
            driver.current_url().await,
            Err(DriverError::SessionLost(_))
        ));
    }

    #[tokio::test]
    async fn screenshots_are_deterministic_per_session() {
        let driver = ScriptedDriver::new(login_site());
        driver.navigate("https://app.test/login").await.unwrap();
        let first = driver.screenshot().await.unwrap();
        let second = driver.screenshot().await.unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with(&[0x89, b'P', b'N', b'G']));

        // A fresh session from the factory replays identically.
        let session = login_site().acquire().await.unwrap();
        session.navigate("https://app.test/login").await.unwrap();
        assert_eq!(session.screenshot().await.unwrap(), first);
    }
}
