mod email_client;
mod whatsapp;

pub use email_client::*;
pub use whatsapp::*;
