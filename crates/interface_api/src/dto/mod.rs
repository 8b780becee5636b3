//! Request and response payloads

pub mod jumpstart;
pub mod loss_events;
pub mod proof_of_loss;
