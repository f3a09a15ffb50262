//! Veredito server library: the HTTP gateway in front of the audit engine.

pub mod gateway;
