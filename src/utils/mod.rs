pub mod constants;
mod wait_until;

pub use wait_until::wait_until;
