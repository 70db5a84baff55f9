//! mabiao-im: a table-based Chinese input method engine for Linux
//!
//! This crate provides the key-event dispatcher and mode management for
//! table input. It uses mabiao-engine for composition state and candidate
//! lookup; the host framework drives it with key events and applies the
//! returned actions.

pub mod config;
pub mod core;

pub use config::Settings;
pub use core::engine::{
    EngineAction, EngineResult, InputMode, LookupView, SettingKey, SettingValue, TableEngine,
};
pub use core::keycode::{KeyEvent, KeyModifiers, Keysym};
pub use core::preedit::{AttributeType, Preedit, PreeditAttribute, PreeditSegment};
