//! Carrier Chat - conversational plan and subscription recommendations.
//!
//! A dialog kernel for a mobile carrier's customer chat: it classifies each
//! utterance, walks short question flows to collect preferences, scores the
//! plan and subscription catalog, and streams the answer as an ordered
//! sequence of envelope events (card, start, chunks, end).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
