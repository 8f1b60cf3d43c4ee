//! Pipeline stages from uploaded résumé to model answer.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the rendering backend can change without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ dispatch
//! (%PDF)    (pdfium)   (JPEG/b64) (model)
//! ```
//!
//! 1. [`input`]    — reject missing or non-PDF uploads early
//! 2. [`render`]   — rasterise page one; runs in `spawn_blocking` because
//!    pdfium is not async-safe
//! 3. [`encode`]   — JPEG-encode and base64-wrap the bitmap
//! 4. [`extract`]  — stages 1–3 behind one call returning an [`extract::ImageBundle`]
//! 5. [`dispatch`] — the only stage with network I/O

pub mod dispatch;
pub mod encode;
pub mod extract;
pub mod input;
pub mod render;
