mod helpers;

mod availability_test;
mod calendar_test;
mod event_test;
mod login_token_test;
