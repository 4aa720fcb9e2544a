use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, HtmlInputElement, PointerEvent,
    Window,
};

use syncboard_shared::ClientMessage;

use crate::config::{ClientConfig, DEFAULT_COLOR};
use crate::dom::{get_element, pointer_sample, resize_canvas, set_canvas_cursor, set_mode_nav};
use crate::input::{Mode, PointerSample};
use crate::net::fetch_snapshot;
use crate::render::redraw;
use crate::state::{Board, Change};
use crate::ws::{connect_ws, Backoff, WsEvent, WsSender};

struct App {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    board: Board,
    width: f64,
    height: f64,
}

impl App {
    fn redraw(&self) {
        redraw(
            &self.ctx,
            self.board.lines(),
            self.board.view(),
            self.width,
            self.height,
        );
    }

    fn resize(&mut self, window: &Window) {
        let (width, height) = resize_canvas(window, &self.canvas, &self.ctx);
        self.width = width;
        self.height = height;
        self.redraw();
    }

    /// Carries out a board change. Anything bound for the server is handed
    /// back so the caller can send it after releasing the borrow.
    fn apply(&self, change: Change) -> Option<ClientMessage> {
        match change {
            Change::None => None,
            Change::Lines | Change::View => {
                self.redraw();
                None
            }
            Change::Cursor => {
                set_canvas_cursor(&self.canvas, self.board.cursor());
                None
            }
            Change::Outgoing(message) => Some(message),
        }
    }
}

fn handle_pointer(
    app: &RefCell<App>,
    sender: &WsSender,
    update: impl FnOnce(&mut Board) -> Change,
) {
    let outgoing = {
        let mut app = app.borrow_mut();
        let change = update(&mut app.board);
        app.apply(change)
    };
    if let Some(message) = outgoing {
        sender.send(&message);
    }
}

fn load_snapshot(window: &Window, url: &str, app: &Rc<RefCell<App>>) {
    let window = window.clone();
    let url = url.to_string();
    let app = app.clone();
    wasm_bindgen_futures::spawn_local(async move {
        match fetch_snapshot(&window, &url).await {
            Ok(snapshot) => {
                log::info!("Loaded snapshot lines={}", snapshot.lines.len());
                let mut app = app.borrow_mut();
                let change = app.board.load_snapshot(snapshot);
                let _ = app.apply(change);
            }
            Err(error) => log::error!("Could not fetch canvas lines: {error}"),
        }
    });
}

fn add_pointer_listener(
    canvas: &HtmlCanvasElement,
    events: &[&str],
    app: &Rc<RefCell<App>>,
    sender: &Rc<WsSender>,
    update: fn(&mut Board, PointerSample) -> Change,
) -> Result<(), JsValue> {
    let app = app.clone();
    let sender = sender.clone();
    let canvas_cb = canvas.clone();
    let onpointer = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
        let sample = pointer_sample(&canvas_cb, &event);
        if event.type_() == "pointerdown" && sample.button == 0 && sample.is_primary {
            event.prevent_default();
        }
        handle_pointer(&app, &sender, |board| update(board, sample));
    });
    for name in events {
        canvas.add_event_listener_with_callback(name, onpointer.as_ref().unchecked_ref())?;
    }
    onpointer.forget();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let config = ClientConfig::from_window(&window)?;
    if let Err(error) = console_log::init_with_level(config.log_level()) {
        web_sys::console::warn_1(&format!("Logger already initialized: {error}").into());
    }
    log::debug!("Starting with {config:?}");

    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let canvas: HtmlCanvasElement = get_element(&document, "canvas")?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    let pen_nav: Element = get_element(&document, "penNav")?;
    let hand_nav: Element = get_element(&document, "handNav")?;
    let color_picker: HtmlInputElement = get_element(&document, "color-picker")?;

    let initial_color = match color_picker.value() {
        value if value.is_empty() => DEFAULT_COLOR.to_string(),
        value => value,
    };
    let app = Rc::new(RefCell::new(App {
        canvas: canvas.clone(),
        ctx,
        board: Board::new(initial_color, config.line_width),
        width: 0.0,
        height: 0.0,
    }));

    {
        let mut app = app.borrow_mut();
        set_mode_nav(&pen_nav, &hand_nav, app.board.mode());
        set_canvas_cursor(&canvas, app.board.cursor());
        app.resize(&window);
    }

    {
        let resize_app = app.clone();
        let window_cb = window.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            resize_app.borrow_mut().resize(&window_cb);
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    load_snapshot(&window, &config.snapshot_url, &app);

    let sender = {
        let message_app = app.clone();
        let window_cb = window.clone();
        let snapshot_url = config.snapshot_url.clone();
        let opened_before = Cell::new(false);
        connect_ws(
            &window,
            &config.websocket_url,
            Backoff::new(config.reconnect_initial_ms, config.reconnect_max_ms),
            move |event| match event {
                WsEvent::Open => {
                    // Broadcasts sent while we were away are gone; start over.
                    if opened_before.replace(true) {
                        log::info!("Reconnected, reloading snapshot");
                        load_snapshot(&window_cb, &snapshot_url, &message_app);
                    }
                }
                WsEvent::Close | WsEvent::Error => {}
                WsEvent::Message(message) => {
                    let mut app = message_app.borrow_mut();
                    let change = app.board.receive(message);
                    let _ = app.apply(change);
                }
            },
        )?
    };

    add_pointer_listener(&canvas, &["pointerdown"], &app, &sender, Board::pointer_down)?;
    add_pointer_listener(&canvas, &["pointermove"], &app, &sender, Board::pointer_move)?;
    add_pointer_listener(&canvas, &["pointerup"], &app, &sender, Board::pointer_up)?;
    add_pointer_listener(
        &canvas,
        &["pointercancel", "pointerleave"],
        &app,
        &sender,
        Board::pointer_cancel,
    )?;

    for (nav, mode) in [(pen_nav.clone(), Mode::Draw), (hand_nav.clone(), Mode::Pan)] {
        let mode_app = app.clone();
        let pen_nav = pen_nav.clone();
        let hand_nav = hand_nav.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            {
                let mut app = mode_app.borrow_mut();
                let change = app.board.set_mode(mode);
                let _ = app.apply(change);
            }
            set_mode_nav(&pen_nav, &hand_nav, mode);
            log::debug!("Mode switched to {mode:?}");
        });
        nav.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let color_app = app.clone();
        let picker = color_picker.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            let color = picker.value();
            log::debug!("Color changed to {color}");
            color_app.borrow_mut().board.set_color(color);
        });
        color_picker
            .add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    log::info!("Board ready");
    Ok(())
}
