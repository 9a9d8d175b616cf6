pub mod retry;
pub mod timeout;
