//! Popup placement, drag and resize.
//!
//! Units are whatever the front end uses (terminal cells in the TUI).  The
//! popup starts anchored to the bottom-right corner of the viewport.  The
//! first drag or resize pins it to its current rectangle and from then on it
//! is positioned absolutely.
//!
//! Each interaction records the pointer and the popup rectangle at
//! pointer-down.  Moves are applied as the cumulative delta from that
//! origin, and pointer-up ends the interaction.  Only one interaction can
//! be active at a time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An on-screen rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn right(&self) -> i32 {
        self.left + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height - 1
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// How the popup's position is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Bottom-right corner, `margin` away from the viewport edges.
    Anchored { margin: i32 },
    /// Top-left corner at a fixed point.
    Absolute { left: i32, top: i32 },
}

/// Resize handle on the popup's edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Left,
    Right,
    Top,
    Bottom,
    /// Bottom-right corner: right and bottom together.
    Both,
}

impl ResizeHandle {
    fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::Both)
    }
}

/// What a pointer position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Header,
    Handle(ResizeHandle),
    Body,
    Outside,
}

/// The popup's current size and placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popup {
    pub size: Size,
    pub placement: Placement,
}

impl Popup {
    pub fn anchored(size: Size, margin: i32) -> Self {
        Self {
            size,
            placement: Placement::Anchored { margin },
        }
    }

    /// The rectangle the popup occupies in `viewport`.
    pub fn bounds(&self, viewport: Size) -> Bounds {
        let (left, top) = match self.placement {
            Placement::Anchored { margin } => (
                viewport.width - margin - self.size.width,
                viewport.height - margin - self.size.height,
            ),
            Placement::Absolute { left, top } => (left, top),
        };
        Bounds {
            left,
            top,
            width: self.size.width,
            height: self.size.height,
        }
    }

    /// Pin the popup at its current rectangle.  No-op once absolute.
    pub fn make_absolute(&mut self, viewport: Size) {
        if let Placement::Anchored { .. } = self.placement {
            let b = self.bounds(viewport);
            self.placement = Placement::Absolute {
                left: b.left,
                top: b.top,
            };
            tracing::debug!(left = b.left, top = b.top, "popup pinned");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Drag,
    Resize(ResizeHandle),
}

/// An active pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Capture {
    gesture: Gesture,
    pointer: Point,
    origin: Bounds,
}

/// Applies pointer events to a [`Popup`].
#[derive(Debug, Clone)]
pub struct GeometryController {
    popup: Popup,
    min: Size,
    capture: Option<Capture>,
}

impl GeometryController {
    pub fn new(popup: Popup, min: Size) -> Self {
        Self {
            popup,
            min,
            capture: None,
        }
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn bounds(&self, viewport: Size) -> Bounds {
        self.popup.bounds(viewport)
    }

    pub fn is_captured(&self) -> bool {
        self.capture.is_some()
    }

    /// Locate `p` on the popup.
    ///
    /// The border is the resize area: the top row resizes from the top, the
    /// left and right columns from their sides, the bottom row from the
    /// bottom, and the bottom-right cell from both.  The first row inside the
    /// border is the drag header.
    pub fn hit_test(&self, p: Point, viewport: Size) -> Hit {
        let b = self.bounds(viewport);
        if !b.contains(p) {
            return Hit::Outside;
        }
        let handle = if p.x == b.right() && p.y == b.bottom() {
            Some(ResizeHandle::Both)
        } else if p.y == b.top {
            Some(ResizeHandle::Top)
        } else if p.y == b.bottom() {
            Some(ResizeHandle::Bottom)
        } else if p.x == b.left {
            Some(ResizeHandle::Left)
        } else if p.x == b.right() {
            Some(ResizeHandle::Right)
        } else {
            None
        };
        match handle {
            Some(h) => Hit::Handle(h),
            None if p.y == b.top + 1 => Hit::Header,
            None => Hit::Body,
        }
    }

    /// Start dragging from the header.
    pub fn pointer_down_header(&mut self, p: Point, viewport: Size) {
        self.begin(Gesture::Drag, p, viewport);
    }

    /// Start resizing from `handle`.
    pub fn pointer_down_handle(&mut self, handle: ResizeHandle, p: Point, viewport: Size) {
        self.begin(Gesture::Resize(handle), p, viewport);
    }

    /// Dispatch a pointer-down by hit-testing.  Returns what was hit.
    pub fn pointer_down(&mut self, p: Point, viewport: Size) -> Hit {
        let hit = self.hit_test(p, viewport);
        match hit {
            Hit::Header => self.pointer_down_header(p, viewport),
            Hit::Handle(h) => self.pointer_down_handle(h, p, viewport),
            Hit::Body | Hit::Outside => {}
        }
        hit
    }

    fn begin(&mut self, gesture: Gesture, p: Point, viewport: Size) {
        self.popup.make_absolute(viewport);
        self.capture = Some(Capture {
            gesture,
            pointer: p,
            origin: self.popup.bounds(viewport),
        });
    }

    /// Apply a pointer move.  Returns whether the popup changed.  Moves
    /// without an active interaction are ignored.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        let Some(capture) = self.capture else {
            return false;
        };
        let before = self.popup;
        let dx = p.x - capture.pointer.x;
        let dy = p.y - capture.pointer.y;
        let o = capture.origin;

        match capture.gesture {
            Gesture::Drag => {
                self.popup.placement = Placement::Absolute {
                    left: o.left + dx,
                    top: o.top + dy,
                };
            }
            Gesture::Resize(handle) => {
                let (mut left, mut top) = match self.popup.placement {
                    Placement::Absolute { left, top } => (left, top),
                    Placement::Anchored { .. } => (o.left, o.top),
                };
                if handle.moves_right() {
                    let width = o.width + dx;
                    if width > self.min.width {
                        self.popup.size.width = width;
                    }
                }
                if handle.moves_bottom() {
                    let height = o.height + dy;
                    if height > self.min.height {
                        self.popup.size.height = height;
                    }
                }
                if handle == ResizeHandle::Left {
                    let width = o.width - dx;
                    if width > self.min.width {
                        self.popup.size.width = width;
                        left = o.left + dx;
                    }
                }
                if handle == ResizeHandle::Top {
                    let height = o.height - dy;
                    if height > self.min.height {
                        self.popup.size.height = height;
                        top = o.top + dy;
                    }
                }
                self.popup.placement = Placement::Absolute { left, top };
            }
        }
        self.popup != before
    }

    /// End the active interaction.  Returns whether one was active.
    pub fn pointer_up(&mut self) -> bool {
        self.capture.take().is_some()
    }
}
