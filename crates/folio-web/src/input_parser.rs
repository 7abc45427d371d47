#![forbid(unsafe_code)]

//! JSON input parser for host-encoded page events.
//!
//! Hosts that record a session (or batch events between frames) encode each
//! browser event as one JSON object with a `kind` discriminator:
//!
//! ```json
//! {"kind":"ready"}
//! {"kind":"scroll","offset":412.5}
//! {"kind":"click","target":4}
//! {"kind":"keyDown","key":"Tab","mods":1}
//! {"kind":"input","target":21,"value":"Jo"}
//! {"kind":"blur","target":21}
//! {"kind":"submit","form":20}
//! {"kind":"intersect","observer":"reveal","target":6,"isIntersecting":true}
//! {"kind":"mouseEnter","target":40}
//! ```
//!
//! Unknown kinds parse to `Ok(None)` so newer hosts can send events this
//! runtime ignores. `mods` is a bitmask: `1=shift`, `2=alt`, `4=ctrl`,
//! `8=meta`.

use folio_core::{DomEvent, ElementId, IntersectionEntry, KeyCode, KeyEvent, Modifiers, ObserverKind};
use serde::Deserialize;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Observer name the runtime never created.
    #[error("unknown observer: {0}")]
    UnknownObserver(String),
}

/// One decoded host input.
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    /// The document finished loading.
    Ready,
    /// A control's value changed; mirror `value` before dispatching `Input`.
    Typed { target: ElementId, value: String },
    /// Any other page event.
    Event(DomEvent),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInput {
    kind: String,
    #[serde(default)]
    offset: Option<f64>,
    #[serde(default)]
    target: Option<u32>,
    #[serde(default)]
    form: Option<u32>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    mods: Option<u8>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    observer: Option<String>,
    #[serde(default)]
    is_intersecting: Option<bool>,
}

impl RawInput {
    fn target(&self) -> Result<ElementId, InputParseError> {
        self.target
            .map(ElementId)
            .ok_or(InputParseError::MissingField("target"))
    }
}

/// Parse one JSON-encoded host input.
pub fn parse_encoded_input(json: &str) -> Result<Option<HostInput>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let event = match raw.kind.as_str() {
        "ready" => return Ok(Some(HostInput::Ready)),
        "scroll" => DomEvent::Scroll {
            offset: raw.offset.ok_or(InputParseError::MissingField("offset"))?,
        },
        "click" => DomEvent::Click {
            target: raw.target()?,
        },
        "keyDown" => {
            let key = raw.key.as_deref().ok_or(InputParseError::MissingField("key"))?;
            DomEvent::KeyDown(
                KeyEvent::new(KeyCode::from_dom_key(key))
                    .with_modifiers(Modifiers::from_bits_truncate(raw.mods.unwrap_or(0))),
            )
        }
        "input" => {
            let target = raw.target()?;
            return Ok(Some(match raw.value {
                Some(value) => HostInput::Typed { target, value },
                None => HostInput::Event(DomEvent::Input { target }),
            }));
        }
        "blur" => DomEvent::Blur {
            target: raw.target()?,
        },
        "submit" => DomEvent::Submit {
            form: raw
                .form
                .map(ElementId)
                .ok_or(InputParseError::MissingField("form"))?,
        },
        "intersect" => {
            let name = raw
                .observer
                .as_deref()
                .ok_or(InputParseError::MissingField("observer"))?;
            let observer = ObserverKind::from_name(name)
                .ok_or_else(|| InputParseError::UnknownObserver(name.to_owned()))?;
            DomEvent::Intersect(IntersectionEntry {
                observer,
                target: raw.target()?,
                is_intersecting: raw
                    .is_intersecting
                    .ok_or(InputParseError::MissingField("isIntersecting"))?,
            })
        }
        "mouseEnter" => DomEvent::MouseEnter {
            target: raw.target()?,
        },
        _ => return Ok(None),
    };
    Ok(Some(HostInput::Event(event)))
}
