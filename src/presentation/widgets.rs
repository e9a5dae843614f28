//! Reusable render-only widgets
//!
//! Widgets are plain values built from domain data each frame; anything
//! stateful (selection, scrolling) lives in the core state.

pub mod comment_row;
pub mod page_bar;
pub mod post_card;
pub mod shrink_text;
pub mod user_row;
