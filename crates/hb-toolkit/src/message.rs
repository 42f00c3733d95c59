// SPDX-License-Identifier: MIT
//
// Native toolkit messages.
//
// A toolkit delivers everything (input, window changes, application
// requests) as a message: a kind tag plus a bag of named, typed fields.
// Lookups are typed and fail soft: a missing field and a field of the
// wrong type both come back as `None`, and the adapter simply produces no
// event for that message.

use bitflags::bitflags;

// ─── Kinds ──────────────────────────────────────────────────────────────────

/// What a native message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// The application (or its window) is asked to quit.
    QuitRequested,
    /// Files were dropped on / opened with the application.
    RefsReceived,
    /// A key with a character mapping went down.
    KeyDown,
    /// A key with no character mapping (modifiers, etc.) went down.
    UnmappedKeyDown,
    /// A key with a character mapping went up.
    KeyUp,
    /// A key with no character mapping went up.
    UnmappedKeyUp,
    /// One or more mouse buttons went down.
    MouseDown,
    /// One or more mouse buttons went up.
    MouseUp,
    /// The pointer moved inside the view.
    MouseMoved,
    /// The wheel turned.
    MouseWheelChanged,
    /// The window was activated or deactivated.
    WindowActivated,
    /// The window was moved on screen.
    WindowMoved,
    /// The window frame changed size.
    WindowResized,
    /// The window contents need repainting.
    Update,
    /// Anything else, by raw message code.
    Other(u32),
}

// ─── Field Names ────────────────────────────────────────────────────────────

/// Well-known field names.
pub mod field {
    /// `i32` native key code.
    pub const KEY: &str = "key";
    /// UTF-8 text produced by a key press.
    pub const BYTES: &str = "bytes";
    /// `i32` mask of currently held buttons (see [`Buttons`](super::Buttons)).
    pub const BUTTONS: &str = "buttons";
    /// [`Point`](super::Point) pointer position in view coordinates.
    pub const WHERE: &str = "where";
    /// `f32` vertical wheel delta, positive towards the user.
    pub const WHEEL_DELTA_Y: &str = "be:wheel_delta_y";
    /// `bool` window activation state.
    pub const ACTIVE: &str = "active";
    /// `i32` new frame width, one less than the drawable width.
    pub const WIDTH: &str = "width";
    /// `i32` new frame height, one less than the drawable height.
    pub const HEIGHT: &str = "height";
}

bitflags! {
    /// Mouse buttons held at the time of a `MouseDown`/`MouseUp`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Buttons: u32 {
        const PRIMARY   = 1;
        const SECONDARY = 1 << 1;
        const TERTIARY  = 1 << 2;
    }
}

// ─── Values ─────────────────────────────────────────────────────────────────

/// A position in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A typed message field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I32(i32),
    F32(f32),
    Bool(bool),
    Point(Point),
    Str(String),
}

// ─── NativeMessage ──────────────────────────────────────────────────────────

/// A message as the toolkit hands it over.
///
/// # Example
///
/// ```
/// use hb_toolkit::message::{field, MessageKind, NativeMessage};
///
/// let msg = NativeMessage::new(MessageKind::WindowResized)
///     .with_i32(field::WIDTH, 799)
///     .with_i32(field::HEIGHT, 599);
///
/// assert_eq!(msg.find_i32(field::WIDTH), Some(799));
/// assert_eq!(msg.find_bool(field::WIDTH), None);
/// assert_eq!(msg.find_i32("depth"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NativeMessage {
    what: MessageKind,
    fields: Vec<(&'static str, Value)>,
}

impl NativeMessage {
    /// A message of kind `what` with no fields.
    #[must_use]
    pub const fn new(what: MessageKind) -> Self {
        Self {
            what,
            fields: Vec::new(),
        }
    }

    /// The message kind.
    #[must_use]
    pub const fn what(&self) -> MessageKind {
        self.what
    }

    /// Add a field. Lookups return the first field with a given name.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: Value) -> Self {
        self.fields.push((name, value));
        self
    }

    #[must_use]
    pub fn with_i32(self, name: &'static str, v: i32) -> Self {
        self.with(name, Value::I32(v))
    }

    #[must_use]
    pub fn with_f32(self, name: &'static str, v: f32) -> Self {
        self.with(name, Value::F32(v))
    }

    #[must_use]
    pub fn with_bool(self, name: &'static str, v: bool) -> Self {
        self.with(name, Value::Bool(v))
    }

    #[must_use]
    pub fn with_point(self, name: &'static str, v: Point) -> Self {
        self.with(name, Value::Point(v))
    }

    #[must_use]
    pub fn with_str(self, name: &'static str, v: impl Into<String>) -> Self {
        self.with(name, Value::Str(v.into()))
    }

    /// The first field called `name`, of any type.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn find_i32(&self, name: &str) -> Option<i32> {
        match self.find(name)? {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn find_f32(&self, name: &str) -> Option<f32> {
        match self.find(name)? {
            Value::F32(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn find_bool(&self, name: &str) -> Option<bool> {
        match self.find(name)? {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn find_point(&self, name: &str) -> Option<Point> {
        match self.find(name)? {
            Value::Point(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn find_str(&self, name: &str) -> Option<&str> {
        match self.find(name)? {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
