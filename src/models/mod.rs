//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod inbound;
pub mod clinic;
pub mod appointment;
pub mod queue;

// Re-export commonly used models
pub use inbound::{InboundEvent, Payload, Sender, MessageHandle};
pub use clinic::{Clinic, ClinicSummary};
pub use appointment::{Appointment, AppointmentSummary};
pub use queue::{QueueCount, WaitingTime};
