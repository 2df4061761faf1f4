//! GTK4 host window that runs on the **main thread**.
//!
//! # Widget tree
//!
//! ```text
//! window                 "SwayTreeViewer" (layer-shell overlay in transparent mode)
//! └ gtk4::DrawingArea    repainted through CairoCanvas + TreeRenderer
//! ```
//!
//! Snapshots arrive through a [`SnapshotMailbox`] filled by the feed thread.
//! A 16 ms GLib timeout takes the newest one and queues a redraw; the feed
//! thread never touches GTK objects.

use crate::config::{Mode, ViewConfig};
use crate::layout::Rect;
use crate::mailbox::SnapshotMailbox;
use crate::render::TreeRenderer;
use crate::traits::{Canvas, Rgba};
use crate::tree::{NativeRect, TreeSnapshot};
use gtk4::cairo;
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use gtk4_layer_shell::LayerShell;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

pub const WINDOW_TITLE: &str = "SwayTreeViewer";

/// The overlay takes keyboard focus only after a click, so mapping it never
/// steals focus but Escape still reaches it.
const OVERLAY_KEYBOARD_MODE: gtk4_layer_shell::KeyboardMode =
    gtk4_layer_shell::KeyboardMode::OnDemand;

const TRANSPARENT_CSS: &str = r#"
window,
window.background {
    background-color: transparent;
    background: none;
}
"#;

//  Cairo canvas

/// [`Canvas`] over a cairo context, valid for one draw callback.
pub struct CairoCanvas<'a> {
    cr: &'a cairo::Context,
    width: f64,
    height: f64,
}

impl<'a> CairoCanvas<'a> {
    pub fn new(cr: &'a cairo::Context, width: f64, height: f64) -> Self {
        Self { cr, width, height }
    }

    fn set_color(&self, color: Rgba) {
        self.cr.set_source_rgba(color.r, color.g, color.b, color.a);
    }
}

/// Cairo errors leave the surface in an error state; the frame is simply
/// incomplete, so log and carry on.
fn check(result: Result<(), cairo::Error>, op: &str) {
    if let Err(e) = result {
        debug!("cairo {} failed: {}", op, e);
    }
}

impl Canvas for CairoCanvas<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self, color: Rgba) {
        check(self.cr.save(), "save");
        self.cr.set_operator(cairo::Operator::Source);
        self.set_color(color);
        check(self.cr.paint(), "paint");
        check(self.cr.restore(), "restore");
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.set_color(color);
        self.cr.rectangle(rect.x, rect.y, rect.width, rect.height);
        check(self.cr.fill(), "fill");
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64) {
        self.set_color(color);
        self.cr.set_line_width(line_width);
        self.cr.rectangle(rect.x, rect.y, rect.width, rect.height);
        check(self.cr.stroke(), "stroke");
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Rgba) {
        self.set_color(color);
        self.cr
            .select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        self.cr.set_font_size(size);
        self.cr.move_to(x, y);
        check(self.cr.show_text(text), "show_text");
    }

    fn clipped(&mut self, clip: Rect, draw: &mut dyn FnMut(&mut dyn Canvas)) {
        check(self.cr.save(), "save");
        self.cr.rectangle(clip.x, clip.y, clip.width, clip.height);
        self.cr.clip();
        draw(&mut *self);
        check(self.cr.restore(), "restore");
    }
}

fn is_close_key(key: gdk::Key) -> bool {
    key == gdk::Key::Escape
}

//  Public API

/// Run the GTK4 main loop on the **current** (main) thread until the
/// window is closed.
///
/// `output` sizes percentage dimensions; `None` falls back to the fixed
/// default size.
pub fn run_main_loop(
    view: &ViewConfig,
    mailbox: SnapshotMailbox,
    output: Option<&NativeRect>,
) -> Result<(), glib::BoolError> {
    gtk4::init()?;
    info!("GTK4 initialised on main thread");

    let (width, height) = view.window_size(output);
    let renderer = TreeRenderer::new(view);
    let current: Rc<RefCell<Option<Arc<TreeSnapshot>>>> = Rc::new(RefCell::new(None));
    let main_loop = glib::MainLoop::new(None, false);

    //  Window
    let window = gtk4::Window::new();
    window.set_title(Some(WINDOW_TITLE));
    window.set_default_size(width, height);

    if view.mode == Mode::Transparent {
        window.init_layer_shell();
        window.set_layer(gtk4_layer_shell::Layer::Overlay);
        window.set_namespace("swaytree");
        window.set_keyboard_mode(OVERLAY_KEYBOARD_MODE);
        window.set_decorated(false);
        window.remove_css_class("background");
        load_transparent_css();
    }

    //  Drawing area
    let area = gtk4::DrawingArea::new();
    area.set_hexpand(true);
    area.set_vexpand(true);
    {
        let current = current.clone();
        area.set_draw_func(move |_, cr, w, h| {
            let mut canvas = CairoCanvas::new(cr, f64::from(w), f64::from(h));
            let snapshot = current.borrow();
            renderer.paint(&mut canvas, snapshot.as_deref());
        });
    }
    window.set_child(Some(&area));

    //  Escape closes
    let keys = gtk4::EventControllerKey::new();
    {
        let window = window.clone();
        keys.connect_key_pressed(move |_, key, _, _| {
            if is_close_key(key) {
                window.close();
                return glib::Propagation::Stop;
            }
            glib::Propagation::Proceed
        });
    }
    window.add_controller(keys);

    {
        let main_loop = main_loop.clone();
        window.connect_close_request(move |_| {
            info!("window closed");
            main_loop.quit();
            glib::Propagation::Proceed
        });
    }

    //  Snapshot polling (~60 fps)
    glib::timeout_add_local(Duration::from_millis(16), move || {
        if let Some(snapshot) = mailbox.take() {
            debug!("new snapshot for workspace {:?}", snapshot.focused_workspace);
            current.replace(Some(snapshot));
            area.queue_draw();
        }
        glib::ControlFlow::Continue
    });

    window.present();
    info!(
        "window presented: {}x{} ({:?} mode, alpha {:.2})",
        width,
        height,
        view.mode,
        view.alpha()
    );

    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");
    Ok(())
}

//  CSS loading

fn load_transparent_css() {
    let provider = gtk4::CssProvider::new();
    #[allow(deprecated)]
    provider.load_from_data(TRANSPARENT_CSS);

    match gdk::Display::default() {
        Some(display) => gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => warn!("no GDK display, window background stays opaque"),
    }
}

//  Tests
