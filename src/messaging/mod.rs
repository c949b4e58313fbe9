//! Messaging between the session controller and the terminal.
//!
//! The controller never draws. It publishes [`Message`]s on the
//! [`MessageBus`] and any number of front-ends subscribe:
//!
//! ```text
//!     ┌──────────────────────┐
//!     │  SessionController   │
//!     └──────────┬───────────┘
//!                │ publish
//!         ┌──────┴───────┐
//!         │  MessageBus  │
//!         └──────┬───────┘
//!                │ broadcast
//!       ┌────────┴─────────┐
//!       ▼                  ▼
//! ┌──────────┐       ┌──────────┐
//! │ Terminal │       │  Tests   │
//! │ Renderer │       │ (drain)  │
//! └──────────┘       └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use giftchat::messaging::{MessageBus, TerminalRenderer};
//!
//! let bus = MessageBus::new();
//! let receiver = bus.subscribe();
//! tokio::spawn(TerminalRenderer::new().run_loop(receiver, None));
//! ```

mod bus;
mod renderer;
mod spinner;
mod types;

pub use bus::{BusError, MessageBus, MessageReceiver, MessageSender};
pub use renderer::{layout_chips, RenderStyle, TerminalRenderer};
pub use spinner::{Spinner, SpinnerConfig, SpinnerHandle};
pub use types::*;
