//! # Events Module
//!
//! Progress reporting for the range generator.
//!
//! The core emits events through a channel so the CLI (or any other front
//! end) can draw progress without the core knowing about terminals.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Hash(HashEvent::Progress(p)) = event {
//!             eprintln!("[{}/{}] {}", p.completed, p.total, p.current_frame);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender, &CancellationToken::new())?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
