//! HTTP client for the Panieco group-order backend, and the participation
//! controller that drives join, leave, and pay on top of it.

pub mod client;
pub mod error;
pub mod participation;
pub(crate) mod retry;
pub mod types;

pub use client::PaniecoClient;
pub use error::ClientError;
pub use participation::{
    create_group_order, ErrorKind, GroupOrderSnapshot, ParticipationController,
    ParticipationError, ParticipationState,
};
pub use types::{GroupOrderSummary, ParticipantInfo};
