//! Backend-served iframes spoken to over `postMessage`.
//!
//! The frame announces itself with `PUBLIC_KEY_READY`; after that every
//! request carries a `requestId` and is answered by exactly one reply or an
//! `ERROR`. Messages not sent by this frame's window, or from another origin,
//! are dropped. A reply naming an unknown `requestId` is ignored; only replies
//! with no `requestId` at all resolve the oldest pending request.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlIFrameElement, MessageEvent};

use crate::dom;

const PUBLIC_KEY_READY: &str = "PUBLIC_KEY_READY";
const INJECT_CREDENTIAL_BUNDLE: &str = "INJECT_CREDENTIAL_BUNDLE";
const INJECT_IMPORT_BUNDLE: &str = "INJECT_IMPORT_BUNDLE";
const EXTRACT_WALLET_ENCRYPTED_BUNDLE: &str = "EXTRACT_WALLET_ENCRYPTED_BUNDLE";
const STAMP_REQUEST: &str = "STAMP_REQUEST";
const BUNDLE_INJECTED: &str = "BUNDLE_INJECTED";
const ENCRYPTED_BUNDLE_EXTRACTED: &str = "ENCRYPTED_BUNDLE_EXTRACTED";
const STAMP: &str = "STAMP";
const ERROR: &str = "ERROR";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Outgoing<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
    request_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

struct Waiter {
    resolve: Function,
    reject: Function,
}

/// Requests awaiting a reply, in send order.
struct PendingReplies<T> {
    queue: VecDeque<(String, T)>,
}

impl<T> Default for PendingReplies<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<T> PendingReplies<T> {
    fn push(&mut self, request_id: String, waiter: T) {
        self.queue.push_back((request_id, waiter));
    }

    /// Exact id match; the oldest entry only for replies without an id.
    fn take(&mut self, request_id: Option<&str>) -> Option<T> {
        match request_id {
            Some(id) => {
                let pos = self.queue.iter().position(|(pending, _)| pending == id)?;
                self.queue.remove(pos).map(|(_, w)| w)
            }
            None => self.queue.pop_front().map(|(_, w)| w),
        }
    }

    fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.queue.drain(..).map(|(_, w)| w)
    }
}

#[derive(Default)]
struct Channel {
    ready: Option<Waiter>,
    pending: PendingReplies<Waiter>,
    public_key: Option<String>,
}

/// A promise plus the functions that settle it.
fn deferred() -> Result<(Promise, Function, Function), JsValue> {
    let mut settle = None;
    let promise = Promise::new(&mut |resolve, reject| settle = Some((resolve, reject)));
    let (resolve, reject) =
        settle.ok_or_else(|| JsValue::from_str("promise executor did not run"))?;
    Ok((promise, resolve, reject))
}

fn field(data: &JsValue, name: &str) -> JsValue {
    Reflect::get(data, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

fn sent_by(event: &MessageEvent, iframe: &HtmlIFrameElement) -> bool {
    match (event.source(), iframe.content_window()) {
        (Some(source), Some(window)) => Object::is(source.as_ref(), window.as_ref()),
        _ => false,
    }
}

fn on_message(channel: &RefCell<Channel>, iframe: &HtmlIFrameElement, origin: &str, event: &MessageEvent) {
    if event.origin() != origin || !sent_by(event, iframe) {
        return;
    }
    let data = event.data();
    let Some(kind) = field(&data, "type").as_string() else {
        return;
    };
    let value = field(&data, "value");
    let request_id = field(&data, "requestId").as_string();

    match kind.as_str() {
        PUBLIC_KEY_READY => {
            let ready = {
                let mut ch = channel.borrow_mut();
                ch.public_key = value.as_string();
                ch.ready.take()
            };
            if let Some(w) = ready {
                let _ = w.resolve.call1(&JsValue::NULL, &value);
            }
        }
        BUNDLE_INJECTED | ENCRYPTED_BUNDLE_EXTRACTED | STAMP => {
            let waiter = channel.borrow_mut().pending.take(request_id.as_deref());
            if let Some(w) = waiter {
                let _ = w.resolve.call1(&JsValue::NULL, &value);
            }
        }
        ERROR => {
            let waiter = {
                let mut ch = channel.borrow_mut();
                ch.pending.take(request_id.as_deref()).or_else(|| ch.ready.take())
            };
            if let Some(w) = waiter {
                let _ = w.reject.call1(&JsValue::NULL, &value);
            }
        }
        other => gloo_console::debug!(format!("ignoring frame message {other}")),
    }
}

/// One mounted frame. Dropping it detaches the listener and removes the
/// element from the document.
pub struct IframeStamper {
    element_id: String,
    iframe: HtmlIFrameElement,
    origin: String,
    channel: Rc<RefCell<Channel>>,
    listener: Closure<dyn FnMut(MessageEvent)>,
    next_request: Cell<u64>,
}

impl IframeStamper {
    /// Mount the frame inside `container` and wait for it to report ready.
    pub async fn init(
        container: &Element,
        iframe_url: &str,
        element_id: &str,
    ) -> Result<Self, JsValue> {
        let origin = web_sys::Url::new(iframe_url)?.origin();
        let iframe: HtmlIFrameElement = dom::create_element("iframe")?.dyn_into()?;
        iframe.set_id(element_id);
        iframe.set_src(iframe_url);
        iframe.set_attribute("title", element_id)?;

        let channel = Rc::new(RefCell::new(Channel::default()));
        let (ready, resolve, reject) = deferred()?;
        channel.borrow_mut().ready = Some(Waiter { resolve, reject });

        let listener = {
            let channel = channel.clone();
            let iframe = iframe.clone();
            let origin = origin.clone();
            Closure::wrap(Box::new(move |event: MessageEvent| {
                on_message(&channel, &iframe, &origin, &event);
            }) as Box<dyn FnMut(MessageEvent)>)
        };
        dom::window()
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())?;

        let stamper = IframeStamper {
            element_id: element_id.to_owned(),
            iframe,
            origin,
            channel,
            listener,
            next_request: Cell::new(0),
        };
        container.append_child(&stamper.iframe)?;
        JsFuture::from(ready).await?;
        Ok(stamper)
    }

    pub fn public_key(&self) -> Option<String> {
        self.channel.borrow().public_key.clone()
    }

    async fn send(
        &self,
        kind: &str,
        value: &str,
        organization_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<JsValue, JsValue> {
        let n = self.next_request.get() + 1;
        self.next_request.set(n);
        let request_id = format!("{}-{n}", self.element_id);

        let payload = serde_wasm_bindgen::to_value(&Outgoing {
            kind,
            value,
            request_id: &request_id,
            organization_id,
            user_id,
        })?;
        let target = self
            .iframe
            .content_window()
            .ok_or_else(|| JsValue::from_str("frame has no window"))?;

        let (reply, resolve, reject) = deferred()?;
        self.channel
            .borrow_mut()
            .pending
            .push(request_id.clone(), Waiter { resolve, reject });
        if let Err(err) = target.post_message(&payload, &self.origin) {
            self.channel.borrow_mut().pending.take(Some(&request_id));
            return Err(err);
        }
        JsFuture::from(reply).await
    }

    pub async fn inject_credential_bundle(&self, bundle: &str) -> Result<bool, JsValue> {
        let reply = self.send(INJECT_CREDENTIAL_BUNDLE, bundle, None, None).await?;
        Ok(reply.as_bool().unwrap_or(false))
    }

    pub async fn inject_import_bundle(
        &self,
        bundle: &str,
        organization_id: &str,
        user_id: &str,
    ) -> Result<bool, JsValue> {
        let reply = self
            .send(INJECT_IMPORT_BUNDLE, bundle, Some(organization_id), Some(user_id))
            .await?;
        Ok(reply.as_bool().unwrap_or(false))
    }

    pub async fn extract_wallet_encrypted_bundle(&self) -> Result<String, JsValue> {
        let reply = self.send(EXTRACT_WALLET_ENCRYPTED_BUNDLE, "", None, None).await?;
        Ok(reply.as_string().unwrap_or_default())
    }

    /// Sign `payload` with the injected credential; the reply is the
    /// `X-Stamp` header value.
    pub async fn stamp(&self, payload: &str) -> Result<String, JsValue> {
        let reply = self.send(STAMP_REQUEST, payload, None, None).await?;
        reply
            .as_string()
            .ok_or_else(|| JsValue::from_str("frame returned an empty stamp"))
    }
}

impl Drop for IframeStamper {
    fn drop(&mut self) {
        let _ = dom::window()
            .remove_event_listener_with_callback("message", self.listener.as_ref().unchecked_ref());
        self.iframe.remove();

        let waiters: Vec<Waiter> = {
            let mut guard = self.channel.borrow_mut();
            let ch = &mut *guard;
            ch.pending.drain().chain(ch.ready.take()).collect()
        };
        let closed = JsValue::from_str("frame closed");
        for w in waiters {
            let _ = w.reject.call1(&JsValue::NULL, &closed);
        }
    }
}
