//! Reusable HTML components for transcript pages
//!
//! Maud component functions for the page shell and for chat message rows.
//! Message content is produced by the rendering pipeline and inserted as
//! pre-escaped markup; every other value goes through maud escaping.

pub mod layout;
pub mod transcript;
