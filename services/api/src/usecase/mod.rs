pub mod availability;
pub mod calendar;
pub mod event;
pub mod login_token;
