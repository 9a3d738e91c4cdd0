//! Career Quest - adaptive aptitude interviews with roadmap feedback.
//!
//! A candidate runs a session of up to ten questions whose difficulty
//! follows their scores. Completing the session produces an analysis, and
//! the weaknesses it finds are turned into new stages on the candidate's
//! active learning roadmap.
//!
//! Layers follow ports and adapters: `domain` holds the aggregates,
//! `ports` the collaborator and repository traits, `application` the
//! handlers behind the `AptitudeEngine` facade, and `adapters` the HTTP,
//! WebSocket, storage and agent implementations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
