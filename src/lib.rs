//! TaskHandler client: a kanban board client over a REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` speaks to the backend, `storage` persists the session token,
//! `pages` holds one controller per screen, and `app` routes between them.
//! The `taskhandler` binary drives the controllers from the terminal and
//! renders them through `render`.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod render;
pub mod storage;
pub mod ui;

#[cfg(test)]
mod test_helpers;
