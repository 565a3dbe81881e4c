//! Actor Model: the input thread and its message protocol.
//!
//! ```text
//! ┌──────────────┐  ControlSignal (bounded, 15)  ┌──────────────────┐
//! │ Input Thread │ ────────────────────────────▶ │ Ship generator   │
//! └──────────────┘                               └──────────────────┘
//!        │
//!        │ exit (single-fire, then closed)
//!        ▼
//! ┌──────────────────┐
//! │ Frame loop       │  checks once per frame
//! └──────────────────┘
//! ```

mod input;
mod messages;

pub use input::InputActor;
pub use messages::ControlSignal;
