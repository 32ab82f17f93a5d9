//! Typed building blocks of the SIM Toolkit PDU formats.

pub mod command;
pub mod command_kind;
pub mod control_event;
pub mod device;
pub mod duration;
pub mod envelope;
pub mod icon;
pub mod menu_item;
pub mod number;
pub mod terminal_response;
pub mod text;
pub mod text_attribute;

pub use command::{Command, Disposition, MenuPresentation, RefreshType, Tone};
pub use command_kind::CommandKind;
pub use control_event::{ControlEvent, ControlEventKind, ControlResult};
pub use device::Device;
pub use envelope::{Envelope, EnvelopeKind, Event};
pub use menu_item::MenuItem;
pub use terminal_response::{result, CommandSummary, TerminalResponse};
pub use text_attribute::{Alignment, AttributeSpan, EmsColor, FontSize, TextAttributes};
