//! Grid position and pixel state of the rows of a drag-and-drop list.

/// The `y` of an item that is not shown, such as the child of a collapsed row.
pub const HIDDEN: i32 = -1;

/// Grid coordinates of a row: `x` is the nesting level, `y` the row index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_visible(self) -> bool {
        self.y > HIDDEN
    }
}

/// One row of the list.
///
/// `top` and `margin` are the pixel offsets derived from the grid position,
/// except while the row is dragged, when they follow the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DndItem {
    key: String,
    position: Position,
    top: i32,
    margin: i32,
    dragging: bool,
    hover: bool,
}

impl DndItem {
    pub fn new(key: impl Into<String>, position: Position) -> Self {
        Self {
            key: key.into(),
            position,
            top: 0,
            margin: 0,
            dragging: false,
            hover: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn is_visible(&self) -> bool {
        self.position.is_visible()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_hover(&self) -> bool {
        self.hover
    }

    pub(super) fn set_x(&mut self, x: i32) {
        self.position.x = x;
    }

    pub(super) fn set_y(&mut self, y: i32) {
        self.position.y = y;
    }

    pub(super) fn set_top(&mut self, top: i32) {
        self.top = top;
    }

    pub(super) fn set_margin(&mut self, margin: i32) {
        self.margin = margin;
    }

    pub(super) fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub(super) fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }
}
