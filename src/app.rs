//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the catalogue items, the
//! view selection and the playback coordinator state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
