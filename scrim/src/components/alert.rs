//! Alert dialog overlay.
//!
//! An alert shows a header, message, optional inputs and a row of buttons.
//! Button handlers run before the alert closes and can keep it open by
//! returning [`HandlerOutcome::Veto`]. Whenever the alert closes with a
//! cancel or backdrop role, the cancel button's handler runs exactly once.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value, json};

use crate::animation::AnimationBuilder;
use crate::content::{Message, RenderedContent};
use crate::context::OverlayContext;
use crate::error::{HandlerError, OverlayError};
use crate::event::{OverlayEventDetail, ROLE_CANCEL, is_cancel};
use crate::overlay::{Overlay, OverlayConfig, OverlayKind, Phase, WillDismissHook};
use crate::platform::Mode;
use crate::view::{HostView, ViewNode};

/// What a button handler wants to happen next.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    /// Close the alert.
    Proceed,
    /// Keep the alert open.
    Veto,
    /// Close the alert and merge these fields into the dismiss payload.
    Data(Map<String, Value>),
}

/// Async button handler. Receives the alert's current input values.
pub type ButtonHandler =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<HandlerOutcome, HandlerError>> + Send + Sync>;

/// Called with the input after it changed.
pub type InputHandler = Arc<dyn Fn(&AlertInput) + Send + Sync>;

/// A button in the alert's button row.
#[derive(Clone)]
pub struct AlertButton {
    pub text: String,
    pub role: Option<String>,
    pub css_class: Vec<String>,
    pub id: Option<String>,
    pub handler: Option<ButtonHandler>,
}

impl AlertButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: None,
            css_class: Vec::new(),
            id: None,
            handler: None,
        }
    }

    /// A button with the cancel role.
    pub fn cancel(text: impl Into<String>) -> Self {
        Self::new(text).role(crate::event::ROLE_CANCEL)
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class.push(class.into());
        self
    }

    /// Attach an async handler.
    pub fn with_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerOutcome, HandlerError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |values| handler(values).boxed()));
        self
    }
}

impl From<&str> for AlertButton {
    fn from(text: &str) -> Self {
        AlertButton::new(text)
    }
}

impl From<String> for AlertButton {
    fn from(text: String) -> Self {
        AlertButton::new(text)
    }
}

impl fmt::Debug for AlertButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertButton")
            .field("text", &self.text)
            .field("role", &self.role)
            .field("id", &self.id)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Kind of alert input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertInputType {
    #[default]
    Text,
    Textarea,
    Password,
    Email,
    Number,
    Tel,
    Url,
    Search,
    Date,
    Time,
    Checkbox,
    Radio,
}

/// Inputs of one alert must all share an input group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputGroup {
    Radio,
    Checkbox,
    Field,
}

impl AlertInputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertInputType::Text => "text",
            AlertInputType::Textarea => "textarea",
            AlertInputType::Password => "password",
            AlertInputType::Email => "email",
            AlertInputType::Number => "number",
            AlertInputType::Tel => "tel",
            AlertInputType::Url => "url",
            AlertInputType::Search => "search",
            AlertInputType::Date => "date",
            AlertInputType::Time => "time",
            AlertInputType::Checkbox => "checkbox",
            AlertInputType::Radio => "radio",
        }
    }

    fn group(&self) -> InputGroup {
        match self {
            AlertInputType::Radio => InputGroup::Radio,
            AlertInputType::Checkbox => InputGroup::Checkbox,
            _ => InputGroup::Field,
        }
    }
}

/// An input inside the alert.
#[derive(Clone, Default)]
pub struct AlertInput {
    pub input_type: AlertInputType,
    pub name: Option<String>,
    pub placeholder: Option<String>,
    pub value: Option<Value>,
    /// Label shown next to radio and checkbox inputs.
    pub label: Option<String>,
    pub checked: bool,
    pub disabled: bool,
    pub id: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub css_class: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub tabindex: Option<i32>,
    pub handler: Option<InputHandler>,
}

impl AlertInput {
    /// A text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A radio option.
    pub fn radio(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            input_type: AlertInputType::Radio,
            label: Some(label.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A checkbox option.
    pub fn checkbox(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            input_type: AlertInputType::Checkbox,
            label: Some(label.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn input_type(mut self, input_type: AlertInputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_handler(mut self, handler: impl Fn(&AlertInput) + Send + Sync + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    fn display_value(&self) -> Option<String> {
        match &self.value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

impl fmt::Debug for AlertInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertInput")
            .field("input_type", &self.input_type)
            .field("name", &self.name)
            .field("value", &self.value)
            .field("checked", &self.checked)
            .field("disabled", &self.disabled)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Options for creating an [`Alert`].
#[derive(Debug, Clone)]
pub struct AlertOptions {
    pub id: Option<String>,
    pub header: Option<String>,
    pub sub_header: Option<String>,
    pub message: Option<Message>,
    pub css_class: Vec<String>,
    pub inputs: Vec<AlertInput>,
    pub buttons: Vec<AlertButton>,
    pub backdrop_dismiss: bool,
    pub translucent: bool,
    pub animated: bool,
    pub keyboard_close: bool,
    pub html_attributes: BTreeMap<String, String>,
    pub mode: Option<Mode>,
    pub enter_animation: Option<AnimationBuilder>,
    pub leave_animation: Option<AnimationBuilder>,
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            id: None,
            header: None,
            sub_header: None,
            message: None,
            css_class: Vec::new(),
            inputs: Vec::new(),
            buttons: Vec::new(),
            backdrop_dismiss: true,
            translucent: false,
            animated: true,
            keyboard_close: true,
            html_attributes: BTreeMap::new(),
            mode: None,
            enter_animation: None,
            leave_animation: None,
        }
    }
}

impl AlertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn sub_header(mut self, sub_header: impl Into<String>) -> Self {
        self.sub_header = Some(sub_header.into());
        self
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn button(mut self, button: impl Into<AlertButton>) -> Self {
        self.buttons.push(button.into());
        self
    }

    pub fn input(mut self, input: AlertInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn backdrop_dismiss(mut self, enabled: bool) -> Self {
        self.backdrop_dismiss = enabled;
        self
    }

    pub fn keyboard_close(mut self, enabled: bool) -> Self {
        self.keyboard_close = enabled;
        self
    }

    pub fn translucent(mut self, enabled: bool) -> Self {
        self.translucent = enabled;
        self
    }

    pub fn animated(mut self, enabled: bool) -> Self {
        self.animated = enabled;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class.push(class.into());
        self
    }

    pub fn html_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.html_attributes.insert(name.into(), value.into());
        self
    }

    pub fn enter_animation(mut self, builder: AnimationBuilder) -> Self {
        self.enter_animation = Some(builder);
        self
    }

    pub fn leave_animation(mut self, builder: AnimationBuilder) -> Self {
        self.leave_animation = Some(builder);
        self
    }
}

fn check_input_groups(inputs: &[AlertInput]) -> Result<Option<InputGroup>, OverlayError> {
    let mut groups: Vec<InputGroup> = Vec::new();
    let mut types: Vec<&'static str> = Vec::new();
    for input in inputs {
        let group = input.input_type.group();
        if !groups.contains(&group) {
            groups.push(group);
        }
        let name = input.input_type.as_str();
        if !types.contains(&name) {
            types.push(name);
        }
    }
    if groups.len() > 1 {
        return Err(OverlayError::MixedInputTypes(types.join("/")));
    }
    Ok(groups.first().copied())
}

fn collect_values(group: Option<InputGroup>, inputs: &[AlertInput]) -> Value {
    match group {
        None => Value::Null,
        Some(InputGroup::Radio) => inputs
            .iter()
            .find(|input| input.checked)
            .and_then(|input| input.value.clone())
            .unwrap_or(Value::Null),
        Some(InputGroup::Checkbox) => Value::Array(
            inputs
                .iter()
                .filter(|input| input.checked)
                .map(|input| input.value.clone().unwrap_or(Value::Null))
                .collect(),
        ),
        Some(InputGroup::Field) => Value::Object(
            inputs
                .iter()
                .enumerate()
                .map(|(i, input)| {
                    let key = input.name.clone().unwrap_or_else(|| i.to_string());
                    (key, input.value.clone().unwrap_or(Value::Null))
                })
                .collect(),
        ),
    }
}

/// Runs a cancel handler on dismissals with a cancel or backdrop role.
///
/// A clicked cancel-role button recorded in `clicked` takes precedence;
/// otherwise the first button with the `cancel` role is used.
fn cancel_hook(
    group: Option<InputGroup>,
    inputs: Arc<Mutex<Vec<AlertInput>>>,
    buttons: Arc<Vec<AlertButton>>,
    clicked: Arc<Mutex<Option<usize>>>,
) -> WillDismissHook {
    Arc::new(move |detail: OverlayEventDetail| {
        let clicked = clicked.lock().unwrap_or_else(|e| e.into_inner()).take();
        if !is_cancel(detail.role.as_deref()) {
            return futures::future::ready(()).boxed();
        }
        let button = match clicked {
            Some(index) => buttons.get(index),
            None => buttons
                .iter()
                .find(|button| button.role.as_deref() == Some(ROLE_CANCEL)),
        };
        let Some((text, handler)) =
            button.and_then(|b| b.handler.clone().map(|handler| (b.text.clone(), handler)))
        else {
            return futures::future::ready(()).boxed();
        };
        let values = collect_values(group, &inputs.lock().unwrap_or_else(|e| e.into_inner()));
        async move {
            if let Err(e) = handler(values).await {
                log::warn!("Cancel handler for '{}' failed: {}", text, e);
            }
        }
        .boxed()
    })
}

/// An alert dialog.
#[derive(Debug, Clone)]
pub struct Alert {
    overlay: Overlay,
    header: Option<String>,
    sub_header: Option<String>,
    group: Option<InputGroup>,
    inputs: Arc<Mutex<Vec<AlertInput>>>,
    buttons: Arc<Vec<AlertButton>>,
    cancel_click: Arc<Mutex<Option<usize>>>,
}

impl Alert {
    /// Create and register an alert.
    ///
    /// Fails if the inputs mix radio, checkbox and text-like types.
    pub fn create(ctx: &OverlayContext, options: AlertOptions) -> Result<Self, OverlayError> {
        let group = check_input_groups(&options.inputs)?;
        let config = OverlayConfig {
            id: options.id,
            message: options.message,
            backdrop_dismiss: options.backdrop_dismiss,
            translucent: options.translucent,
            animated: options.animated,
            keyboard_close: options.keyboard_close,
            mode: options.mode,
            enter_animation: options.enter_animation,
            leave_animation: options.leave_animation,
            html_attributes: options.html_attributes,
            css_class: options.css_class,
            ..OverlayConfig::default()
        };
        let overlay = Overlay::new(ctx, OverlayKind::Alert, config);

        let index = overlay.index();
        let mut radio_checked = false;
        let inputs = options
            .inputs
            .into_iter()
            .enumerate()
            .map(|(i, mut input)| {
                input.name.get_or_insert_with(|| i.to_string());
                input
                    .id
                    .get_or_insert_with(|| format!("alert-input-{}-{}", index, i));
                if input.input_type == AlertInputType::Radio && input.checked {
                    if radio_checked {
                        log::warn!("Alert has more than one checked radio; keeping the first");
                        input.checked = false;
                    }
                    radio_checked = true;
                }
                input
            })
            .collect();

        let inputs = Arc::new(Mutex::new(inputs));
        let buttons = Arc::new(options.buttons);
        let cancel_click = Arc::new(Mutex::new(None));
        overlay.set_will_dismiss_hook(cancel_hook(
            group,
            Arc::clone(&inputs),
            Arc::clone(&buttons),
            Arc::clone(&cancel_click),
        ));

        Ok(Self {
            overlay,
            header: options.header,
            sub_header: options.sub_header,
            group,
            inputs,
            buttons,
            cancel_click,
        })
    }

    fn inputs(&self) -> MutexGuard<'_, Vec<AlertInput>> {
        self.inputs.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cancel_click(&self) -> MutexGuard<'_, Option<usize>> {
        self.cancel_click.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn buttons(&self) -> &[AlertButton] {
        &self.buttons
    }

    /// Snapshot of the inputs.
    pub fn input_list(&self) -> Vec<AlertInput> {
        self.inputs().clone()
    }

    pub async fn present(&self) {
        self.overlay.present().await
    }

    pub async fn dismiss(&self, data: Option<Value>, role: Option<String>) -> bool {
        self.overlay.dismiss(data, role).await
    }

    pub fn on_did_dismiss(&self) -> BoxFuture<'static, OverlayEventDetail> {
        self.overlay.on_did_dismiss()
    }

    pub fn on_will_dismiss(&self) -> BoxFuture<'static, OverlayEventDetail> {
        self.overlay.on_will_dismiss()
    }

    pub async fn on_backdrop_tap(&self) -> bool {
        self.overlay.on_backdrop_tap().await
    }

    /// Current input values.
    ///
    /// Radio alerts yield the checked value (or null), checkbox alerts an
    /// array of checked values, and field alerts an object keyed by input
    /// name. Alerts without inputs yield null.
    pub fn values(&self) -> Value {
        collect_values(self.group, &self.inputs())
    }

    /// Apply `change` to the input at `index` and fire its handler.
    fn update_input(
        &self,
        index: usize,
        expected: InputGroup,
        change: impl FnOnce(&mut Vec<AlertInput>, usize),
    ) -> Result<bool, OverlayError> {
        let changed = {
            let mut inputs = self.inputs();
            let input = inputs.get(index).ok_or(OverlayError::IndexOutOfRange {
                kind: "input",
                index,
            })?;
            if input.disabled || input.input_type.group() != expected {
                return Ok(false);
            }
            change(&mut *inputs, index);
            inputs[index].clone()
        };
        if let Some(handler) = &changed.handler {
            handler(&changed);
        }
        Ok(true)
    }

    /// Check a radio input, unchecking the others.
    pub fn select_radio(&self, index: usize) -> Result<bool, OverlayError> {
        self.update_input(index, InputGroup::Radio, |inputs, index| {
            for (i, input) in inputs.iter_mut().enumerate() {
                input.checked = i == index;
            }
        })
    }

    /// Toggle a checkbox input.
    pub fn toggle_checkbox(&self, index: usize) -> Result<bool, OverlayError> {
        self.update_input(index, InputGroup::Checkbox, |inputs, index| {
            inputs[index].checked = !inputs[index].checked;
        })
    }

    /// Set the value of a text-like input.
    pub fn set_input_value(
        &self,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<bool, OverlayError> {
        let value = value.into();
        self.update_input(index, InputGroup::Field, move |inputs, index| {
            inputs[index].value = Some(value);
        })
    }

    /// Activate the button at `index`.
    ///
    /// Cancel-role buttons close the alert with the current values; their
    /// handler runs during dismissal and cannot keep the alert open. Other buttons run
    /// their handler first: a veto keeps the alert open, returned data is
    /// merged into the dismiss payload, and an error is returned to the
    /// caller with the alert still presented.
    pub async fn button_click(&self, index: usize) -> Result<bool, OverlayError> {
        let button = self
            .buttons
            .get(index)
            .cloned()
            .ok_or(OverlayError::IndexOutOfRange {
                kind: "button",
                index,
            })?;
        if !self.overlay.is_presented() {
            log::debug!("Click on '{}' ignored: alert not presented", button.text);
            return Ok(false);
        }
        self.overlay.cancel_auto_dismiss();

        let values = self.values();
        let role = button.role.clone();

        if is_cancel(role.as_deref()) {
            *self.cancel_click() = Some(index);
            let dismissed = self.dismiss(Some(json!({ "values": values })), role).await;
            self.cancel_click().take();
            return Ok(dismissed);
        }

        let outcome = match &button.handler {
            Some(handler) => handler(values.clone())
                .await
                .map_err(|source| OverlayError::Handler {
                    button: button.text.clone(),
                    source,
                })?,
            None => HandlerOutcome::Proceed,
        };

        let mut data = Map::new();
        data.insert("values".to_string(), values);
        match outcome {
            HandlerOutcome::Veto => {
                log::debug!("Handler for '{}' kept the alert open", button.text);
                Ok(false)
            }
            HandlerOutcome::Proceed => Ok(self.dismiss(Some(Value::Object(data)), role).await),
            HandlerOutcome::Data(extra) => {
                data.extend(extra);
                Ok(self.dismiss(Some(Value::Object(data)), role).await)
            }
        }
    }

    pub fn header_id(&self) -> String {
        format!("alert-{}-hdr", self.overlay.index())
    }

    pub fn sub_header_id(&self) -> String {
        format!("alert-{}-sub-hdr", self.overlay.index())
    }

    pub fn message_id(&self) -> String {
        format!("alert-{}-msg", self.overlay.index())
    }

    fn render_inputs(&self) -> Option<ViewNode> {
        let group = self.group?;
        let class = match group {
            InputGroup::Radio => "alert-radio-group",
            InputGroup::Checkbox => "alert-checkbox-group",
            InputGroup::Field => "alert-input-group",
        };
        let nodes = self
            .inputs()
            .iter()
            .map(|input| ViewNode::Input {
                id: input.id.clone().unwrap_or_default(),
                input_type: input.input_type.as_str().to_string(),
                name: input.name.clone(),
                label: input.label.clone(),
                value: input.display_value(),
                checked: input.checked,
                disabled: input.disabled,
            })
            .collect();
        Some(ViewNode::container(class, nodes))
    }

    fn render_buttons(&self) -> ViewNode {
        let class = if self.buttons.len() > 2 {
            "alert-button-group alert-button-group-vertical"
        } else {
            "alert-button-group"
        };
        let buttons = self
            .buttons
            .iter()
            .map(|button| {
                let mut classes = vec!["alert-button".to_string()];
                if let Some(role) = &button.role {
                    classes.push(format!("alert-button-role-{}", role));
                }
                classes.extend(button.css_class.iter().cloned());
                ViewNode::Button {
                    id: button.id.clone(),
                    text: button.text.clone(),
                    role: button.role.clone(),
                    classes,
                }
            })
            .collect();
        ViewNode::container(class, buttons)
    }

    /// Describe the current view.
    pub fn render(&self) -> HostView {
        let overlay = &self.overlay;
        let config = overlay.config();
        let ctx = overlay.context();
        let hidden = matches!(overlay.phase(), Phase::Mounted | Phase::Dismissed);

        let mut host = HostView::new()
            .attr("id", overlay.element_id())
            .attr("role", "alertdialog")
            .attr("aria-modal", "true")
            .attr("tabindex", "-1");
        if self.header.is_some() {
            host = host.attr("aria-labelledby", self.header_id());
        } else if self.sub_header.is_some() {
            host = host.attr("aria-labelledby", self.sub_header_id());
        }
        if config.message.is_some() {
            host = host.attr("aria-describedby", self.message_id());
        }
        let host = host
            .attrs(&config.html_attributes)
            .z_index(overlay.z_index())
            .classes(config.css_class.iter().cloned())
            .class_if(overlay.mode().as_str(), true)
            .class_if("overlay-hidden", hidden)
            .class_if("alert-translucent", config.translucent);

        let mut head = Vec::new();
        if let Some(header) = &self.header {
            head.push(ViewNode::Content {
                class: "alert-title".to_string(),
                id: Some(self.header_id()),
                content: RenderedContent::Text(header.clone()),
            });
        }
        if let Some(sub_header) = &self.sub_header {
            head.push(ViewNode::Content {
                class: "alert-sub-title".to_string(),
                id: Some(self.sub_header_id()),
                content: RenderedContent::Text(sub_header.clone()),
            });
        }

        let mut wrapper = vec![ViewNode::container("alert-head", head)];
        if let Some(message) = &config.message {
            wrapper.push(ViewNode::Content {
                class: "alert-message".to_string(),
                id: Some(self.message_id()),
                content: ctx.content_gate().render(message, ctx.sanitizer()),
            });
        }
        if let Some(inputs) = self.render_inputs() {
            wrapper.push(inputs);
        }
        wrapper.push(self.render_buttons());

        host.child(ViewNode::Backdrop {
            visible: true,
            tappable: config.backdrop_dismiss,
        })
        .child(ViewNode::FocusSentinel)
        .child(ViewNode::container("alert-wrapper overlay-wrapper", wrapper))
        .child(ViewNode::FocusSentinel)
    }
}
