pub mod error;
pub mod logging;

pub static APP_NAME: &str = "actionspec";
