//! # Events Module
//!
//! Progress events for whatever front end drives the pipeline.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Pipeline(PipelineEvent::PhaseChanged { phase }) = event {
//!             eprintln!("{phase}...");
//!         }
//!     }
//! });
//!
//! let result = pipeline.run_with_events(&trees, &sender);
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
