pub mod password;
pub mod session_key;
