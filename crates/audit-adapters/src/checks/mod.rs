//! Checks incluidos.

pub mod is_on_https;
pub mod manifest_short_name_length;
pub mod no_websql;
pub mod notification_on_start;
pub mod password_inputs;

pub use is_on_https::IsOnHttps;
pub use manifest_short_name_length::ManifestShortNameLength;
pub use no_websql::NoWebSql;
pub use notification_on_start::NotificationOnStart;
pub use password_inputs::PasswordInputsCanBePastedInto;
