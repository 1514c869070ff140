pub mod analysis;
pub mod assistant;
pub mod booking;
pub mod faq;
pub mod modal;
pub mod risk;
pub mod session;
