//! The recursive partition and render pass.
//!
//! [`TreeRenderer::paint`] draws one frame: it clears the canvas, finds the
//! focused workspace, fits it into the canvas with
//! [`fit_workspace`](crate::layout::fit_workspace) and hands it to
//! [`TreeRenderer::render`], which paints a node and recurses into its
//! children.
//!
//! Per node, layers are drawn bottom to top:
//!
//! ```text
//! background fill        focused / leaf / container tint
//! header label           clipped to the header band
//! children               split, tabbed, stacked, or nothing
//! floating overlays      centered at half size
//! border                 last, so a focused border is never covered
//! ```
//!
//! A pass never fails.  Degenerate rectangles, missing workspaces and
//! unknown geometry all end in drawing less.

use crate::config::{Mode, ViewConfig};
use crate::layout::{self, Axis, Rect};
use crate::traits::{Canvas, Rgba};
use crate::tree::{breadcrumb, Layout, Node, TreeSnapshot};
use log::trace;

//  Palette (alpha is applied at draw time)

const WINDOW_BACKGROUND: Rgba = Rgba::grey(0.15, 1.0);
const BREADCRUMB_TEXT: Rgba = Rgba::grey(0.8, 1.0);
const BREADCRUMB_ORIGIN: (f64, f64) = (10.0, 20.0);
const BREADCRUMB_SIZE: f64 = 12.0;

const CONTAINER_FILL: Rgba = Rgba::grey(0.1, 1.0);
const LEAF_FILL: Rgba = Rgba::grey(0.18, 1.0);
const FOCUSED_FILL: Rgba = Rgba::new(0.1, 0.2, 0.3, 1.0);
const ACTIVE_TAB_FILL: Rgba = Rgba::new(0.2, 0.6, 1.0, 1.0);

const LABEL_TEXT: Rgba = Rgba::grey(0.7, 1.0);
const FOCUSED_LABEL_TEXT: Rgba = Rgba::grey(1.0, 1.0);
const LABEL_MAX_SIZE: f64 = 10.0;

const BORDER: Rgba = Rgba::grey(0.3, 1.0);
const FOCUSED_BORDER: Rgba = Rgba::new(0.3, 0.7, 1.0, 1.0);
const BORDER_WIDTH: f64 = 1.0;
const FOCUSED_BORDER_WIDTH: f64 = 2.0;

/// Draws tree snapshots onto a [`Canvas`].
///
/// Holds only the view settings; every frame is computed from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRenderer {
    mode: Mode,
    include_floating: bool,
    alpha: f64,
}

impl TreeRenderer {
    pub fn new(view: &ViewConfig) -> Self {
        Self {
            mode: view.mode,
            include_floating: view.include_floating,
            alpha: view.alpha(),
        }
    }

    /// Draw one full frame.
    ///
    /// With no snapshot, or when the focused workspace is not in the tree,
    /// only the background is drawn.
    pub fn paint(&self, canvas: &mut dyn Canvas, snapshot: Option<&TreeSnapshot>) {
        match self.mode {
            Mode::Transparent => canvas.clear(Rgba::TRANSPARENT),
            Mode::Window => canvas.clear(WINDOW_BACKGROUND),
        }

        let Some(snapshot) = snapshot else {
            return;
        };
        if snapshot.focused_workspace.is_empty() {
            return;
        }
        let Some(workspace) = snapshot
            .root
            .find_workspace_by_name(&snapshot.focused_workspace, self.include_floating)
        else {
            trace!("workspace {:?} not in tree", snapshot.focused_workspace);
            return;
        };

        let with_breadcrumb = self.mode == Mode::Window;
        if with_breadcrumb {
            let text = breadcrumb(&snapshot.root, workspace.id, self.include_floating);
            let (x, y) = BREADCRUMB_ORIGIN;
            canvas.draw_text(&text, x, y, BREADCRUMB_SIZE, BREADCRUMB_TEXT);
        }

        let avail = layout::available_area(canvas.width(), canvas.height(), with_breadcrumb);
        let target = layout::fit_workspace(&workspace.rect, avail);
        self.render(canvas, workspace, target);
    }

    /// Paint `node` into `rect` and recurse into its children.
    pub fn render(&self, canvas: &mut dyn Canvas, node: &Node, rect: Rect) {
        if rect.is_degenerate() {
            return;
        }

        let fill = if node.focused {
            FOCUSED_FILL
        } else if node.is_leaf() {
            LEAF_FILL
        } else {
            CONTAINER_FILL
        };
        canvas.fill_rect(rect, fill.with_alpha(self.alpha));

        let header = layout::header_band(rect.height);
        if header.has_label() {
            self.draw_label(canvas, node, rect, header.height);
        }

        // A collapsed node shows neither its children nor its floating
        // overlays.
        let content = layout::content_rect(rect, header);
        if !content.is_degenerate() {
            self.render_children(canvas, node, content);

            if self.include_floating {
                let overlay = layout::floating_rect(rect);
                for floating in &node.floating_nodes {
                    self.render(canvas, floating, overlay);
                }
            }
        }

        let (border, width) = if node.focused {
            (FOCUSED_BORDER, FOCUSED_BORDER_WIDTH)
        } else {
            (BORDER, BORDER_WIDTH)
        };
        canvas.stroke_rect(rect, border.with_alpha(self.alpha), width);
    }

    fn draw_label(&self, canvas: &mut dyn Canvas, node: &Node, rect: Rect, header_h: f64) {
        let label = node.label();
        let color = if node.focused {
            FOCUSED_LABEL_TEXT
        } else {
            LABEL_TEXT
        }
        .with_alpha(self.alpha);
        let size = LABEL_MAX_SIZE.min(header_h - 2.0);
        let band = Rect::new(rect.x, rect.y, rect.width, header_h);

        canvas.clipped(band, &mut |c| {
            c.draw_text(&label, rect.x + 4.0, rect.y + header_h / 2.0 + 4.0, size, color);
        });
    }

    fn render_children(&self, canvas: &mut dyn Canvas, node: &Node, content: Rect) {
        let children = &node.nodes;
        match node.layout {
            Layout::SplitHorizontal | Layout::SplitVertical => {
                let axis = if node.layout == Layout::SplitHorizontal {
                    Axis::Horizontal
                } else {
                    Axis::Vertical
                };
                for (child, slice) in children.iter().zip(layout::split(children, axis, content)) {
                    self.render(canvas, child, slice);
                }
            }
            Layout::Tabbed => {
                let Some(active) = node.active_child_index() else {
                    return;
                };
                let tabs = layout::tab_strip(children.len(), content);
                for (i, (child, cell)) in children.iter().zip(&tabs.cells).enumerate() {
                    if i == active {
                        canvas.fill_rect(*cell, ACTIVE_TAB_FILL.with_alpha(self.alpha));
                    } else {
                        self.render(canvas, child, *cell);
                    }
                }
                self.render(canvas, &children[active], tabs.body);
            }
            Layout::Stacked => {
                let Some(active) = node.active_child_index() else {
                    return;
                };
                let bands = layout::stack_bands(children.len(), active, content);
                for (child, band) in children.iter().zip(bands) {
                    self.render(canvas, child, band);
                }
            }
            Layout::None => {}
        }
    }
}

//  Tests
