//! # Events Module
//!
//! Progress reporting for import batches.
//!
//! The import driver emits events through a crossbeam channel so any front
//! end (CLI progress bar, GUI, log sink) can follow along without the core
//! knowing about it.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Batch(BatchEvent::Progress(p)) => println!("{}/{}", p.completed, p.total),
//!             Event::File(FileEvent::Failed { path, message }) => eprintln!("{}: {}", path.display(), message),
//!             _ => {}
//!         }
//!     }
//! });
//!
//! processor.process_batch(&paths, &sender, &CancellationToken::new());
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
