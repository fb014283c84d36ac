//! # Vive Controls Library
//!
//! Map HTC Vive hand controller input to semantic button and axis events.
//!
//! This library provides the binding between a host scene framework and the
//! platform gamepad list: it detects the controller for a hand, re-emits raw
//! indexed button/axis notifications under friendly names (`triggerdown`,
//! `trackpadmoved`, ...) and highlights pressed buttons on the controller
//! model.

pub mod config;
pub mod controls;
pub mod error;
pub mod gamepad;
pub mod scene;
