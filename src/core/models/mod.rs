pub mod interaction;
pub mod session;
