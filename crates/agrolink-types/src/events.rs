//! Board events
//!
//! Named events exchanged between the HUD, the page and the viewport. The
//! names and detail payloads match the browser `CustomEvent`s the board also
//! listens for on `window`:
//!
//! | name            | detail                |
//! |-----------------|-----------------------|
//! | `board:control` | `{ type }`            |
//! | `board:focus`   | `{ x, y, scale? }`    |
//! | `app:gotoShelf` | `{ shelfId }`         |

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EVENT_CONTROL: &str = "board:control";
pub const EVENT_FOCUS: &str = "board:focus";
pub const EVENT_GOTO_SHELF: &str = "app:gotoShelf";

/// Zoom command kinds for `board:control`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    ZoomIn,
    ZoomOut,
    Reset,
}

/// Center the viewport on a content-space point, optionally at a new scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusRequest {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl FocusRequest {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, scale: None }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.scale.map_or(true, |s| s.is_finite() && s > 0.0)
    }
}

/// A decoded board event.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Control(ControlKind),
    Focus(FocusRequest),
    GotoShelf { shelf_id: String },
}

#[derive(Serialize, Deserialize)]
struct ControlDetail {
    #[serde(rename = "type")]
    kind: ControlKind,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GotoShelfDetail {
    shelf_id: String,
}

impl BoardEvent {
    /// Event name on the wire
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::Control(_) => EVENT_CONTROL,
            BoardEvent::Focus(_) => EVENT_FOCUS,
            BoardEvent::GotoShelf { .. } => EVENT_GOTO_SHELF,
        }
    }

    /// Event detail payload on the wire
    pub fn detail(&self) -> Value {
        let detail = match self {
            BoardEvent::Control(kind) => serde_json::to_value(ControlDetail { kind: *kind }),
            BoardEvent::Focus(req) => serde_json::to_value(req),
            BoardEvent::GotoShelf { shelf_id } => serde_json::to_value(GotoShelfDetail {
                shelf_id: shelf_id.clone(),
            }),
        };
        detail.unwrap_or(Value::Null)
    }

    /// Decode a named event. Unknown names and malformed details yield `None`.
    pub fn from_named(name: &str, detail: &Value) -> Option<Self> {
        match name {
            EVENT_CONTROL => ControlDetail::deserialize(detail)
                .ok()
                .map(|d| BoardEvent::Control(d.kind)),
            EVENT_FOCUS => FocusRequest::deserialize(detail)
                .ok()
                .filter(FocusRequest::is_well_formed)
                .map(BoardEvent::Focus),
            EVENT_GOTO_SHELF => GotoShelfDetail::deserialize(detail)
                .ok()
                .map(|d| d.shelf_id.trim().to_string())
                .filter(|id| !id.is_empty())
                .map(|shelf_id| BoardEvent::GotoShelf { shelf_id }),
            _ => None,
        }
    }
}
