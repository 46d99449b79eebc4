mod health_check;
mod home;
mod relay;
mod send;
mod send_mail;

pub use health_check::*;
pub use home::*;
pub use relay::*;
pub use send::*;
pub use send_mail::*;
