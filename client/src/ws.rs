use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket, Window};

use syncboard_shared::{
    decode_server_message, encode_client_message, ClientMessage, ServerMessage,
};

const SNIPPET_CHARS: usize = 200;

#[derive(Debug)]
pub enum WsEvent {
    Open,
    Close,
    Error,
    Message(ServerMessage),
}

/// Exponential reconnect delay: doubles on every attempt up to `max_ms`,
/// back to `initial_ms` once a connection opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backoff {
    initial_ms: u32,
    max_ms: u32,
    next_ms: u32,
}

impl Backoff {
    pub fn new(initial_ms: u32, max_ms: u32) -> Self {
        Self {
            initial_ms,
            max_ms: max_ms.max(initial_ms),
            next_ms: initial_ms,
        }
    }

    pub fn next_delay(&mut self) -> u32 {
        let delay = self.next_ms;
        self.next_ms = self.next_ms.saturating_mul(2).min(self.max_ms);
        delay
    }

    pub fn reset(&mut self) {
        self.next_ms = self.initial_ms;
    }
}

pub struct WsSender {
    socket: RefCell<Option<WebSocket>>,
}

impl WsSender {
    /// Messages sent while offline are dropped.
    pub fn send(&self, message: &ClientMessage) {
        let socket = self.socket.borrow();
        let Some(socket) = socket
            .as_ref()
            .filter(|socket| socket.ready_state() == WebSocket::OPEN)
        else {
            log::debug!("WS not open, dropping outgoing message");
            return;
        };
        match encode_client_message(message) {
            Ok(payload) => {
                if let Err(error) = socket.send_with_str(&payload) {
                    log::warn!("WS send failed: {error:?}");
                }
            }
            Err(error) => log::error!("{error}"),
        }
    }
}

struct SocketHandlers {
    onopen: Closure<dyn FnMut(Event)>,
    onclose: Closure<dyn FnMut(CloseEvent)>,
    onerror: Closure<dyn FnMut(Event)>,
    onmessage: Closure<dyn FnMut(MessageEvent)>,
}

impl SocketHandlers {
    fn attach(&self, socket: &WebSocket) {
        socket.set_onopen(Some(self.onopen.as_ref().unchecked_ref()));
        socket.set_onclose(Some(self.onclose.as_ref().unchecked_ref()));
        socket.set_onerror(Some(self.onerror.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(self.onmessage.as_ref().unchecked_ref()));
    }
}

fn detach(socket: &WebSocket) {
    socket.set_onopen(None);
    socket.set_onclose(None);
    socket.set_onerror(None);
    socket.set_onmessage(None);
}

struct Channel {
    window: Window,
    url: String,
    sender: Rc<WsSender>,
    backoff: RefCell<Backoff>,
    reconnect_pending: Cell<bool>,
    shutting_down: Cell<bool>,
    handlers: RefCell<Option<SocketHandlers>>,
    on_event: RefCell<Box<dyn FnMut(WsEvent)>>,
}

impl Channel {
    fn emit(&self, event: WsEvent) {
        let mut on_event = self.on_event.borrow_mut();
        (*on_event)(event);
    }
}

fn snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(SNIPPET_CHARS).collect();
        format!("{head}...")
    }
}

fn handle_message(channel: &Channel, event: MessageEvent) {
    let Some(text) = event.data().as_string() else {
        log::warn!("WS message data is not text, dropping it");
        return;
    };
    if let Some(message) = decode_frame(&text) {
        channel.emit(WsEvent::Message(message));
    }
}

/// Decodes one text frame. Frames that do not carry a line are logged and
/// yield `None`.
pub fn decode_frame(text: &str) -> Option<ServerMessage> {
    match decode_server_message(text) {
        Ok(message) => Some(message),
        Err(error) => {
            log::warn!("WS message dropped: {error} payload={:?}", snippet(text));
            None
        }
    }
}

fn open_socket(channel: &Rc<Channel>) -> Result<(), JsValue> {
    log::info!("WS connecting url={}", channel.url);
    let socket = WebSocket::new(&channel.url)?;
    let weak = Rc::downgrade(channel);

    let onopen = {
        let weak = weak.clone();
        Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(channel) = weak.upgrade() else {
                return;
            };
            log::info!("WS open url={}", channel.url);
            channel.backoff.borrow_mut().reset();
            channel.emit(WsEvent::Open);
        })
    };

    let onclose = {
        let weak = weak.clone();
        Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            let Some(channel) = weak.upgrade() else {
                return;
            };
            log::warn!(
                "WS close url={} code={} was_clean={} reason={:?}",
                channel.url,
                event.code(),
                event.was_clean(),
                event.reason()
            );
            channel.emit(WsEvent::Close);
            schedule_reconnect(&channel);
        })
    };

    let onerror = {
        let weak = weak.clone();
        Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(channel) = weak.upgrade() else {
                return;
            };
            log::error!("WS error url={}", channel.url);
            channel.emit(WsEvent::Error);
        })
    };

    let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        if let Some(channel) = weak.upgrade() {
            handle_message(&channel, event);
        }
    });

    let handlers = SocketHandlers {
        onopen,
        onclose,
        onerror,
        onmessage,
    };
    handlers.attach(&socket);
    if let Some(previous) = channel.sender.socket.replace(Some(socket)) {
        detach(&previous);
    }
    channel.handlers.replace(Some(handlers));
    Ok(())
}

fn schedule_reconnect(channel: &Rc<Channel>) {
    if channel.shutting_down.get() || channel.reconnect_pending.replace(true) {
        return;
    }
    let delay = channel.backoff.borrow_mut().next_delay();
    log::info!("WS reconnecting in {delay}ms");
    let weak: Weak<Channel> = Rc::downgrade(channel);
    let callback = Closure::once_into_js(move || {
        let Some(channel) = weak.upgrade() else {
            return;
        };
        channel.reconnect_pending.set(false);
        if channel.shutting_down.get() {
            return;
        }
        if let Err(error) = open_socket(&channel) {
            log::error!("WS reconnect failed: {error:?}");
            schedule_reconnect(&channel);
        }
    });
    let timeout = i32::try_from(delay).unwrap_or(i32::MAX);
    if let Err(error) = channel
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout)
    {
        log::error!("WS could not schedule reconnect: {error:?}");
        channel.reconnect_pending.set(false);
    }
}

/// Opens the live channel and keeps it open: every close schedules a
/// reconnect with `backoff` while the page is shown.
pub fn connect_ws(
    window: &Window,
    url: &str,
    backoff: Backoff,
    on_event: impl 'static + FnMut(WsEvent),
) -> Result<Rc<WsSender>, JsValue> {
    let sender = Rc::new(WsSender {
        socket: RefCell::new(None),
    });
    let channel = Rc::new(Channel {
        window: window.clone(),
        url: url.to_string(),
        sender: sender.clone(),
        backoff: RefCell::new(backoff),
        reconnect_pending: Cell::new(false),
        shutting_down: Cell::new(false),
        handlers: RefCell::new(None),
        on_event: RefCell::new(Box::new(on_event)),
    });
    open_socket(&channel)?;

    // These listeners own the channel for the rest of the page's life.
    {
        let channel = channel.clone();
        let onpagehide = Closure::<dyn FnMut(Event)>::new(move |_| {
            channel.shutting_down.set(true);
            if let Some(socket) = channel.sender.socket.borrow().as_ref() {
                log::info!("pagehide -> ws.close url={}", channel.url);
                let _ = socket.close();
            }
        });
        window.add_event_listener_with_callback("pagehide", onpagehide.as_ref().unchecked_ref())?;
        onpagehide.forget();
    }

    // A page restored from the back/forward cache comes back after pagehide.
    let onpageshow = Closure::<dyn FnMut(Event)>::new(move |_| {
        if !channel.shutting_down.replace(false) {
            return;
        }
        log::info!("pageshow -> reopening url={}", channel.url);
        channel.backoff.borrow_mut().reset();
        if let Err(error) = open_socket(&channel) {
            log::error!("WS reopen failed: {error:?}");
            schedule_reconnect(&channel);
        }
    });
    window.add_event_listener_with_callback("pageshow", onpageshow.as_ref().unchecked_ref())?;
    onpageshow.forget();

    Ok(sender)
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
