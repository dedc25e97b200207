use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{window, Document, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config::EffectsConfig;
use crate::contact::{ContactDraft, ContactError, SubmitPhase, DEFAULT_SUBMIT_LABEL, THANK_YOU_NOTICE};
use crate::logging::{log_event, LogLevel};

const MOUNT_POINT_ID: &str = "contact-form-root";

#[derive(Properties, PartialEq)]
pub struct ContactFormProps {
    pub config: EffectsConfig,
    #[prop_or(AttrValue::from(DEFAULT_SUBMIT_LABEL))]
    pub submit_label: AttrValue,
}

fn alert(message: &str) {
    if let Some(win) = window() {
        let _ = win.alert_with_message(message);
    }
}

async fn sleep(delay_ms: u32) {
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = window().is_some_and(|win| {
            win.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay)
                .is_ok()
        });
        if !scheduled {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = JsFuture::from(promise).await;
}

#[function_component(ContactForm)]
fn contact_form(props: &ContactFormProps) -> Html {
    let draft = use_state(ContactDraft::default);
    let phase = use_state(|| SubmitPhase::Idle);

    let on_name = {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            let mut next = (*draft).clone();
            next.name = event.target_unchecked_into::<HtmlInputElement>().value();
            draft.set(next);
        })
    };

    let on_email = {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            let mut next = (*draft).clone();
            next.email = event.target_unchecked_into::<HtmlInputElement>().value();
            draft.set(next);
        })
    };

    let on_message = {
        let draft = draft.clone();
        Callback::from(move |event: InputEvent| {
            let mut next = (*draft).clone();
            next.message = event.target_unchecked_into::<HtmlTextAreaElement>().value();
            draft.set(next);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let phase = phase.clone();
        let config = props.config.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if (*phase).disabled() {
                return;
            }

            let message = match draft.validate() {
                Ok(message) => message,
                Err(error) => {
                    let ContactError::MissingFields(missing) = &error;
                    log_event(
                        &config,
                        LogLevel::Info,
                        "contact_rejected",
                        json!({ "missing": missing }),
                    );
                    alert(&error.to_string());
                    return;
                }
            };

            log_event(
                &config,
                LogLevel::Info,
                "contact_sending",
                json!({
                    "name": message.name,
                    "replyDomain": message.email.rsplit('@').next(),
                    "messageChars": message.message.chars().count(),
                }),
            );
            phase.set(SubmitPhase::Sending);

            let draft = draft.clone();
            let phase = phase.clone();
            let config = config.clone();
            spawn_local(async move {
                sleep(config.submit_delay_ms).await;
                alert(THANK_YOU_NOTICE);
                draft.set(ContactDraft::default());
                phase.set(SubmitPhase::Idle);
                log_event(&config, LogLevel::Debug, "contact_acknowledged", json!({}));
            });
        })
    };

    let label = (*phase).label(&props.submit_label).to_string();

    html! {
        <form class="contact-form" onsubmit={on_submit}>
            <div class="form-group">
                <label for="contact-name">{ "Name" }</label>
                <input
                    id="contact-name"
                    name="name"
                    type="text"
                    value={draft.name.clone()}
                    oninput={on_name}
                />
            </div>
            <div class="form-group">
                <label for="contact-email">{ "Email" }</label>
                <input
                    id="contact-email"
                    name="email"
                    type="email"
                    value={draft.email.clone()}
                    oninput={on_email}
                />
            </div>
            <div class="form-group">
                <label for="contact-message">{ "Message" }</label>
                <textarea
                    id="contact-message"
                    name="message"
                    rows="5"
                    value={draft.message.clone()}
                    oninput={on_message}
                />
            </div>
            <button class="btn btn-primary submit-btn" type="submit" disabled={(*phase).disabled()}>
                { label }
            </button>
        </form>
    }
}

pub fn mount(document: &Document, config: EffectsConfig) {
    let Some(root) = document.get_element_by_id(MOUNT_POINT_ID) else {
        return;
    };

    let submit_label = root
        .get_attribute("data-submit-label")
        .filter(|label| !label.trim().is_empty())
        .map(AttrValue::from)
        .unwrap_or_else(|| AttrValue::from(DEFAULT_SUBMIT_LABEL));

    yew::Renderer::<ContactForm>::with_root_and_props(
        root,
        ContactFormProps {
            config,
            submit_label,
        },
    )
    .render();
}
