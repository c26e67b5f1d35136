//! Alert buttons, inputs and rendering.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value, json};

use scrim::animation::ImmediateRunner;
use scrim::components::{
    Alert, AlertButton, AlertInput, AlertInputType, AlertOptions, HandlerOutcome,
};
use scrim::content::RenderedContent;
use scrim::context::OverlayContext;
use scrim::error::{HandlerError, OverlayError};
use scrim::overlay::Phase;
use scrim::view::ViewNode;

fn ctx() -> OverlayContext {
    OverlayContext::isolated().with_animator(ImmediateRunner)
}

async fn presented(options: AlertOptions) -> Alert {
    let alert = Alert::create(&ctx(), options).unwrap();
    alert.present().await;
    alert
}

// =============================================================================
// Buttons
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_button_without_handler_dismisses_with_role() {
    let alert = presented(
        AlertOptions::new()
            .button(AlertButton::new("OK").role("confirm"))
            .button("Later"),
    )
    .await;

    assert!(alert.button_click(0).await.unwrap());
    let detail = alert.on_did_dismiss().await;
    assert_eq!(detail.role.as_deref(), Some("confirm"));
    assert_eq!(detail.data, Some(json!({"values": null})));
}

#[tokio::test(start_paused = true)]
async fn test_veto_keeps_alert_open() {
    let alert = presented(AlertOptions::new().button(
        AlertButton::new("Save")
            .with_handler(|_| async { Ok::<_, HandlerError>(HandlerOutcome::Veto) }),
    ))
    .await;

    assert!(!alert.button_click(0).await.unwrap());
    assert!(alert.overlay().is_presented());
}

#[tokio::test(start_paused = true)]
async fn test_handler_data_is_merged() {
    let alert = presented(
        AlertOptions::new()
            .input(AlertInput::text("name").value("Ada"))
            .button(AlertButton::new("Save").with_handler(|_| async {
                let mut extra = Map::new();
                extra.insert("saved".to_string(), json!(true));
                Ok::<_, HandlerError>(HandlerOutcome::Data(extra))
            })),
    )
    .await;

    assert!(alert.button_click(0).await.unwrap());
    let detail = alert.on_did_dismiss().await;
    assert_eq!(
        detail.data,
        Some(json!({"values": {"name": "Ada"}, "saved": true}))
    );
}

#[tokio::test(start_paused = true)]
async fn test_handler_receives_values() {
    let seen = Arc::new(Mutex::new(None));
    let captured = seen.clone();
    let alert = presented(
        AlertOptions::new()
            .input(AlertInput::radio("Red", "red").checked(true))
            .input(AlertInput::radio("Blue", "blue"))
            .button(AlertButton::new("OK").with_handler(move |values: Value| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(values);
                    Ok::<_, HandlerError>(HandlerOutcome::Proceed)
                }
            })),
    )
    .await;

    alert.button_click(0).await.unwrap();
    assert_eq!(*seen.lock().unwrap(), Some(json!("red")));
}

#[tokio::test(start_paused = true)]
async fn test_handler_error_propagates_and_keeps_alert() {
    let alert = presented(
        AlertOptions::new().button(AlertButton::new("Save").with_handler(|_| async {
            Err::<HandlerOutcome, HandlerError>("disk full".into())
        })),
    )
    .await;

    let err = alert.button_click(0).await.unwrap_err();
    match &err {
        OverlayError::Handler { button, .. } => assert_eq!(button, "Save"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("disk full"));
    assert!(alert.overlay().is_presented());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_ignores_veto() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let alert = presented(
        AlertOptions::new().button(AlertButton::cancel("Cancel").with_handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, HandlerError>(HandlerOutcome::Veto) }
        })),
    )
    .await;

    assert!(alert.button_click(0).await.unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let detail = alert.on_did_dismiss().await;
    assert_eq!(detail.role.as_deref(), Some("cancel"));
    assert_eq!(detail.data, Some(json!({"values": null})));
}

#[tokio::test(start_paused = true)]
async fn test_click_before_present_is_ignored() {
    let alert = Alert::create(&ctx(), AlertOptions::new().button("OK")).unwrap();
    assert!(!alert.button_click(0).await.unwrap());
    assert_eq!(alert.overlay().phase(), Phase::Mounted);
}

#[tokio::test(start_paused = true)]
async fn test_click_out_of_range() {
    let alert = presented(AlertOptions::new().button("OK")).await;
    assert!(matches!(
        alert.button_click(3).await,
        Err(OverlayError::IndexOutOfRange { kind: "button", index: 3 })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_backdrop_dismiss_default_on() {
    let alert = presented(AlertOptions::new().button("OK")).await;
    assert!(alert.on_backdrop_tap().await);
    assert_eq!(alert.on_did_dismiss().await.role.as_deref(), Some("backdrop"));
}

fn counted_cancel(calls: &Arc<AtomicUsize>) -> AlertButton {
    let counter = calls.clone();
    AlertButton::cancel("Cancel").with_handler(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, HandlerError>(HandlerOutcome::Proceed) }
    })
}

#[tokio::test(start_paused = true)]
async fn test_backdrop_tap_runs_cancel_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let alert = presented(
        AlertOptions::new()
            .button(counted_cancel(&calls))
            .button("OK"),
    )
    .await;

    assert!(alert.on_backdrop_tap().await);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!alert.on_backdrop_tap().await);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_key_runs_cancel_handler_with_values() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let ctx = ctx();
    let alert = Alert::create(
        &ctx,
        AlertOptions::new()
            .input(AlertInput::radio("A", "a").checked(true))
            .button(AlertButton::cancel("Cancel").with_handler(move |values| {
                sink.lock().unwrap().push(values);
                async { Ok::<_, HandlerError>(HandlerOutcome::Proceed) }
            })),
    )
    .unwrap();
    alert.present().await;

    assert!(ctx.controller().handle_close_key().await);
    assert_eq!(*seen.lock().unwrap(), vec![json!("a")]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_click_runs_handler_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let alert = presented(AlertOptions::new().button(counted_cancel(&calls))).await;

    assert!(alert.button_click(0).await.unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_confirm_dismiss_skips_cancel_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let alert = presented(
        AlertOptions::new()
            .button(counted_cancel(&calls))
            .button(AlertButton::new("OK").role("confirm")),
    )
    .await;

    assert!(alert.button_click(1).await.unwrap());
    assert!(!alert.dismiss(None, Some("cancel".into())).await);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Inputs
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_mixed_input_types_rejected() {
    let ctx = ctx();
    let result = Alert::create(
        &ctx,
        AlertOptions::new()
            .input(AlertInput::radio("A", "a"))
            .input(AlertInput::text("name")),
    );
    assert!(matches!(result, Err(OverlayError::MixedInputTypes(_))));
    assert!(ctx.controller().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_text_like_types_can_mix() {
    let alert = Alert::create(
        &ctx(),
        AlertOptions::new()
            .input(AlertInput::text("email").input_type(AlertInputType::Email))
            .input(AlertInput::text("pin").input_type(AlertInputType::Number)),
    );
    assert!(alert.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_input_ids_and_default_names() {
    let alert = Alert::create(
        &ctx(),
        AlertOptions::new()
            .input(AlertInput::default())
            .input(AlertInput::text("city").id("city-field")),
    )
    .unwrap();

    let inputs = alert.input_list();
    let index = alert.overlay().index();
    assert_eq!(inputs[0].id.as_deref(), Some(format!("alert-input-{}-0", index).as_str()));
    assert_eq!(inputs[0].name.as_deref(), Some("0"));
    assert_eq!(inputs[1].id.as_deref(), Some("city-field"));
    assert_eq!(alert.values(), json!({"0": null, "city": null}));
}

#[tokio::test(start_paused = true)]
async fn test_radio_selection_is_exclusive() {
    let alert = presented(
        AlertOptions::new()
            .input(AlertInput::radio("Small", "s").checked(true))
            .input(AlertInput::radio("Large", "l")),
    )
    .await;
    assert_eq!(alert.values(), json!("s"));

    assert!(alert.select_radio(1).unwrap());
    let checked: Vec<bool> = alert.input_list().iter().map(|i| i.checked).collect();
    assert_eq!(checked, vec![false, true]);
    assert_eq!(alert.values(), json!("l"));
}

#[tokio::test(start_paused = true)]
async fn test_radio_values_null_when_none_checked() {
    let alert = presented(AlertOptions::new().input(AlertInput::radio("Only", 1))).await;
    assert_eq!(alert.values(), Value::Null);
}

#[tokio::test(start_paused = true)]
async fn test_checkbox_toggle_and_values() {
    let alert = presented(
        AlertOptions::new()
            .input(AlertInput::checkbox("Bread", "bread").checked(true))
            .input(AlertInput::checkbox("Milk", "milk"))
            .input(AlertInput::checkbox("Eggs", "eggs")),
    )
    .await;

    alert.toggle_checkbox(2).unwrap();
    alert.toggle_checkbox(0).unwrap();
    assert_eq!(alert.values(), json!(["eggs"]));
}

#[tokio::test(start_paused = true)]
async fn test_disabled_input_ignores_changes() {
    let alert = presented(
        AlertOptions::new()
            .input(AlertInput::checkbox("Locked", "x").disabled(true))
            .input(AlertInput::checkbox("Open", "y")),
    )
    .await;

    assert!(!alert.toggle_checkbox(0).unwrap());
    assert_eq!(alert.values(), json!([]));
}

#[tokio::test(start_paused = true)]
async fn test_input_handler_fires_on_change() {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let recorded = changes.clone();
    let alert = presented(AlertOptions::new().input(
        AlertInput::text("title").with_handler(move |input| {
            recorded.lock().unwrap().push(input.value.clone());
        }),
    ))
    .await;

    alert.set_input_value(0, "Draft").unwrap();
    assert_eq!(*changes.lock().unwrap(), vec![Some(json!("Draft"))]);
    assert_eq!(alert.values(), json!({"title": "Draft"}));
}

#[tokio::test(start_paused = true)]
async fn test_multiple_checked_radios_keep_first() {
    let alert = Alert::create(
        &ctx(),
        AlertOptions::new()
            .input(AlertInput::radio("A", "a").checked(true))
            .input(AlertInput::radio("B", "b").checked(true)),
    )
    .unwrap();
    assert_eq!(alert.values(), json!("a"));
}

// =============================================================================
// Render
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_render_ids_and_labels() {
    let alert = presented(
        AlertOptions::new()
            .header("Title")
            .sub_header("Subtitle")
            .message("Body")
            .button("OK"),
    )
    .await;
    let view = alert.render();
    let index = alert.overlay().index();

    assert_eq!(view.attributes["role"], "alertdialog");
    assert_eq!(view.attributes["aria-labelledby"], format!("alert-{}-hdr", index));
    assert_eq!(view.attributes["aria-describedby"], format!("alert-{}-msg", index));
    assert!(view.find(&format!("alert-{}-sub-hdr", index)).is_some());
    match view.find(&alert.message_id()) {
        Some(ViewNode::Content { content, .. }) => {
            assert_eq!(content, &RenderedContent::Markup("Body".to_string()))
        }
        other => panic!("unexpected node: {:?}", other),
    }
    assert!(!view.has_class("overlay-hidden"));
}

#[tokio::test(start_paused = true)]
async fn test_render_labels_by_sub_header_without_header() {
    let alert = presented(AlertOptions::new().sub_header("Only sub")).await;
    let view = alert.render();
    assert_eq!(view.attributes["aria-labelledby"], alert.sub_header_id());
}

#[tokio::test(start_paused = true)]
async fn test_render_vertical_buttons_and_role_classes() {
    let alert = presented(
        AlertOptions::new()
            .button(AlertButton::cancel("No"))
            .button("Maybe")
            .button(AlertButton::new("Yes").css_class("primary")),
    )
    .await;
    let view = alert.render();

    let groups = view.nodes(&|n| {
        matches!(n, ViewNode::Container { class, .. } if class.contains("alert-button-group-vertical"))
    });
    assert_eq!(groups.len(), 1);

    let buttons = view.nodes(&|n| matches!(n, ViewNode::Button { .. }));
    assert_eq!(buttons.len(), 3);
    match buttons[0] {
        ViewNode::Button { classes, .. } => {
            assert!(classes.contains(&"alert-button-role-cancel".to_string()))
        }
        _ => unreachable!(),
    }
    match buttons[2] {
        ViewNode::Button { classes, .. } => assert!(classes.contains(&"primary".to_string())),
        _ => unreachable!(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_render_hidden_after_dismiss() {
    let alert = presented(AlertOptions::new().button("OK")).await;
    alert.dismiss(None, None).await;
    assert!(alert.render().has_class("overlay-hidden"));
}
