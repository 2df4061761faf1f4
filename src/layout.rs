//! Diagram geometry.
//!
//! Every rectangle the renderer draws comes out of one of these pure
//! functions, so a fixed tree and canvas size always produce the same
//! rectangles.  Nothing here touches a canvas.
//!
//! The functions follow the order of a single render step:
//!
//! 1. [`fit_workspace`] places the workspace in the canvas once per frame.
//! 2. [`header_band`] and [`content_rect`] carve a node into label and body.
//! 3. [`split`], [`tab_strip`] and [`stack_bands`] partition the body among
//!    the children; [`floating_rect`] places floating overlays.

use crate::tree::{NativeRect, Node};

/// Inner padding between a node's edge and its children.
pub const PAD: f64 = 5.0;
/// Nominal header band height.
pub const HEADER_H: f64 = 20.0;
/// Height of a tab strip cell and of a stacked header band.
pub const TAB_SIZE: f64 = 22.0;
/// Headers at or below this height get no label.
pub const LABEL_MIN: f64 = 8.0;
/// Share of a stacked container the inactive bands may take before they
/// are compressed.
pub const STACK_HEADER_SHARE: f64 = 0.6;

/// Margins around the fitted workspace.
pub const MARGIN_X: f64 = 10.0;
pub const MARGIN_BOTTOM: f64 = 10.0;
/// Top margin when the breadcrumb header is shown.
pub const MARGIN_TOP_BREADCRUMB: f64 = 30.0;
/// Top margin without the breadcrumb header.
pub const MARGIN_TOP_PLAIN: f64 = 5.0;

/// A rectangle on the diagram canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle has no drawable area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// The axis a split container divides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn native_extent(self, rect: &NativeRect) -> f64 {
        match self {
            Axis::Horizontal => f64::from(rect.width),
            Axis::Vertical => f64::from(rect.height),
        }
    }
}

//  Root fit

/// The region of the canvas available to the workspace.
pub fn available_area(canvas_width: f64, canvas_height: f64, breadcrumb: bool) -> Rect {
    let top = if breadcrumb {
        MARGIN_TOP_BREADCRUMB
    } else {
        MARGIN_TOP_PLAIN
    };
    Rect::new(
        MARGIN_X,
        top,
        canvas_width - 2.0 * MARGIN_X,
        canvas_height - top - MARGIN_BOTTOM,
    )
}

/// Largest rectangle with the workspace's aspect ratio, centered in `avail`.
///
/// When the workspace geometry is unknown (zero width or height) the whole
/// available area is used unscaled.
pub fn fit_workspace(workspace: &NativeRect, avail: Rect) -> Rect {
    if !workspace.has_geometry() {
        return avail;
    }
    let ws_ratio = f64::from(workspace.width) / f64::from(workspace.height);
    let avail_ratio = avail.width / avail.height;

    let (width, height) = if ws_ratio > avail_ratio {
        (avail.width, avail.width / ws_ratio)
    } else {
        (avail.height * ws_ratio, avail.height)
    };

    Rect::new(
        avail.x + (avail.width - width) / 2.0,
        avail.y + (avail.height - height) / 2.0,
        width,
        height,
    )
}

//  Node bands

/// The label band at the top of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderBand {
    pub height: f64,
    /// The node is too short for a body and is drawn as a label only.
    pub collapsed: bool,
}

impl HeaderBand {
    /// Whether the band is tall enough to carry text.
    pub fn has_label(&self) -> bool {
        self.height > LABEL_MIN
    }
}

/// Size the header band of a node of height `h`.
pub fn header_band(h: f64) -> HeaderBand {
    if h < HEADER_H * 1.5 {
        HeaderBand {
            height: h - 2.0,
            collapsed: true,
        }
    } else {
        HeaderBand {
            height: HEADER_H.min(h * 0.3),
            collapsed: false,
        }
    }
}

/// The body left for children once the header and padding are taken.
///
/// May be degenerate; callers skip child recursion in that case.
pub fn content_rect(node: Rect, header: HeaderBand) -> Rect {
    let reserved = if header.collapsed {
        node.height
    } else if header.has_label() {
        header.height
    } else {
        0.0
    };
    Rect::new(
        node.x + PAD,
        node.y + reserved,
        node.width - 2.0 * PAD,
        node.height - reserved - PAD,
    )
}

//  Partitions

/// Divide `content` along `axis` in proportion to the children's native
/// extents.
///
/// A zero total is replaced by 1, so all-zero siblings collapse to empty
/// slices rather than being split evenly.
pub fn split(children: &[Node], axis: Axis, content: Rect) -> Vec<Rect> {
    let mut total: f64 = children.iter().map(|c| axis.native_extent(&c.rect)).sum();
    if total == 0.0 {
        total = 1.0;
    }

    let mut cursor = 0.0;
    children
        .iter()
        .map(|child| {
            let ratio = axis.native_extent(&child.rect) / total;
            match axis {
                Axis::Horizontal => {
                    let w = content.width * ratio;
                    let r = Rect::new(content.x + cursor, content.y, w, content.height);
                    cursor += w;
                    r
                }
                Axis::Vertical => {
                    let h = content.height * ratio;
                    let r = Rect::new(content.x, content.y + cursor, content.width, h);
                    cursor += h;
                    r
                }
            }
        })
        .collect()
}

/// Geometry of a tabbed container's body.
#[derive(Debug, Clone, PartialEq)]
pub struct TabLayout {
    /// One equal-width cell per child across the top strip.
    pub cells: Vec<Rect>,
    /// The area below the strip given to the active child.
    pub body: Rect,
}

pub fn tab_strip(count: usize, content: Rect) -> TabLayout {
    let cell_w = content.width / count.max(1) as f64;
    let cells = (0..count)
        .map(|i| Rect::new(content.x + i as f64 * cell_w, content.y, cell_w, TAB_SIZE))
        .collect();
    TabLayout {
        cells,
        body: Rect::new(
            content.x,
            content.y + TAB_SIZE,
            content.width,
            content.height - TAB_SIZE,
        ),
    }
}

/// Height of each inactive band in a stacked container.
///
/// Bands are [`TAB_SIZE`] tall unless together they would take more than
/// [`STACK_HEADER_SHARE`] of the body, in which case they share that much.
pub fn stack_band_height(count: usize, content_height: f64) -> f64 {
    let inactive = count.saturating_sub(1);
    let budget = content_height * STACK_HEADER_SHARE;
    if inactive > 0 && inactive as f64 * TAB_SIZE > budget {
        budget / inactive as f64
    } else {
        TAB_SIZE
    }
}

/// Accordion layout for a stacked container: every inactive child gets a
/// band, the active child gets whatever height remains, in child order.
pub fn stack_bands(count: usize, active: usize, content: Rect) -> Vec<Rect> {
    let band = stack_band_height(count, content.height);
    let inactive = count.saturating_sub(1) as f64;
    let active_h = content.height - inactive * band;

    let mut y = content.y;
    (0..count)
        .map(|i| {
            let h = if i == active { active_h } else { band };
            let r = Rect::new(content.x, y, content.width, h);
            y += h;
            r
        })
        .collect()
}

/// Overlay rectangle for a floating child: half the parent, centered.
pub fn floating_rect(parent: Rect) -> Rect {
    let w = parent.width * 0.5;
    let h = parent.height * 0.5;
    Rect::new(
        parent.x + (parent.width - w) / 2.0,
        parent.y + (parent.height - h) / 2.0,
        w,
        h,
    )
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeType;

    const EPS: f64 = 1e-9;

    fn sized(id: i64, width: u32, height: u32) -> Node {
        Node::new(id, NodeType::Container).with_rect(NativeRect::new(0, 0, width, height))
    }

    #[test]
    fn fit_wide_workspace_into_square() {
        let r = fit_workspace(
            &NativeRect::new(0, 0, 1920, 1080),
            Rect::new(0.0, 0.0, 400.0, 400.0),
        );
        assert_eq!(r.width, 400.0);
        assert_eq!(r.height, 225.0);
        assert_eq!(r.x, 0.0);
        assert_eq!(r.y, 87.5);
    }

    #[test]
    fn fit_tall_workspace_is_constrained_by_height() {
        let r = fit_workspace(
            &NativeRect::new(0, 0, 1080, 1920),
            Rect::new(10.0, 30.0, 400.0, 400.0),
        );
        assert_eq!(r.height, 400.0);
        assert!((r.width - 225.0).abs() < EPS);
        assert!((r.x - (10.0 + 87.5)).abs() < EPS);
        assert_eq!(r.y, 30.0);
    }

    #[test]
    fn fit_unknown_geometry_uses_available_area() {
        let avail = Rect::new(10.0, 5.0, 300.0, 200.0);
        assert_eq!(fit_workspace(&NativeRect::new(0, 0, 0, 1080), avail), avail);
        assert_eq!(fit_workspace(&NativeRect::new(0, 0, 1920, 0), avail), avail);
    }

    #[test]
    fn available_area_respects_breadcrumb() {
        assert_eq!(
            available_area(420.0, 440.0, true),
            Rect::new(10.0, 30.0, 400.0, 400.0)
        );
        assert_eq!(
            available_area(420.0, 440.0, false),
            Rect::new(10.0, 5.0, 400.0, 425.0)
        );
    }

    #[test]
    fn collapsed_header_takes_almost_everything() {
        let band = header_band(20.0);
        assert!(band.collapsed);
        assert_eq!(band.height, 18.0);
        assert!(band.has_label());
        let content = content_rect(Rect::new(0.0, 0.0, 100.0, 20.0), band);
        assert!(content.is_degenerate());
    }

    #[test]
    fn normal_header_is_clamped() {
        let tall = header_band(200.0);
        assert!(!tall.collapsed);
        assert_eq!(tall.height, HEADER_H);

        let medium = header_band(40.0);
        assert!(!medium.collapsed);
        assert!((medium.height - 12.0).abs() < EPS);
    }

    #[test]
    fn content_rect_reserves_header_and_padding() {
        let node = Rect::new(0.0, 0.0, 200.0, 100.0);
        let c = content_rect(node, header_band(100.0));
        assert_eq!(c, Rect::new(5.0, 20.0, 190.0, 75.0));
    }

    #[test]
    fn tiny_header_reserves_nothing() {
        let c = content_rect(
            Rect::new(0.0, 0.0, 50.0, 100.0),
            HeaderBand {
                height: 6.0,
                collapsed: false,
            },
        );
        assert_eq!(c.y, 0.0);
        assert_eq!(c.height, 95.0);
    }

    #[test]
    fn horizontal_split_is_proportional() {
        let children = vec![sized(1, 100, 10), sized(2, 300, 10)];
        let slices = split(&children, Axis::Horizontal, Rect::new(0.0, 0.0, 400.0, 50.0));
        assert_eq!(slices[0], Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(slices[1], Rect::new(100.0, 0.0, 300.0, 50.0));
    }

    #[test]
    fn vertical_split_stacks_downwards() {
        let children = vec![sized(1, 10, 1), sized(2, 10, 1), sized(3, 10, 2)];
        let slices = split(&children, Axis::Vertical, Rect::new(5.0, 20.0, 80.0, 100.0));
        assert_eq!(slices[0], Rect::new(5.0, 20.0, 80.0, 25.0));
        assert_eq!(slices[1], Rect::new(5.0, 45.0, 80.0, 25.0));
        assert_eq!(slices[2], Rect::new(5.0, 70.0, 80.0, 50.0));
    }

    #[test]
    fn zero_total_split_collapses_slices() {
        let children = vec![sized(1, 0, 0), sized(2, 0, 0)];
        let slices = split(&children, Axis::Horizontal, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(slices.iter().all(|s| s.width == 0.0));
        assert!(slices.iter().all(|s| s.is_degenerate()));
    }

    #[test]
    fn tab_strip_cells_are_equal() {
        let tabs = tab_strip(4, Rect::new(10.0, 10.0, 200.0, 100.0));
        assert_eq!(tabs.cells.len(), 4);
        for (i, cell) in tabs.cells.iter().enumerate() {
            assert_eq!(cell.width, 50.0);
            assert_eq!(cell.height, TAB_SIZE);
            assert_eq!(cell.x, 10.0 + 50.0 * i as f64);
        }
        assert_eq!(tabs.body, Rect::new(10.0, 32.0, 200.0, 78.0));
    }

    #[test]
    fn stacked_compression() {
        assert_eq!(stack_band_height(5, 100.0), 15.0);
        let bands = stack_bands(5, 2, Rect::new(0.0, 0.0, 50.0, 100.0));
        let heights: Vec<f64> = bands.iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![15.0, 15.0, 40.0, 15.0, 15.0]);
        assert_eq!(bands[3].y, 70.0);
    }

    #[test]
    fn stacked_without_compression_uses_tab_size() {
        let bands = stack_bands(3, 0, Rect::new(0.0, 0.0, 50.0, 200.0));
        assert_eq!(bands[0].height, 200.0 - 2.0 * TAB_SIZE);
        assert_eq!(bands[1].height, TAB_SIZE);
        assert_eq!(bands[2].y, 200.0 - TAB_SIZE);
    }

    #[test]
    fn single_stacked_child_takes_everything() {
        let bands = stack_bands(1, 0, Rect::new(0.0, 0.0, 50.0, 80.0));
        assert_eq!(bands, vec![Rect::new(0.0, 0.0, 50.0, 80.0)]);
    }

    #[test]
    fn floating_overlay_is_centered_half() {
        let r = floating_rect(Rect::new(10.0, 20.0, 200.0, 100.0));
        assert_eq!(r, Rect::new(60.0, 45.0, 100.0, 50.0));
    }
}
