// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8087;
pub const WS_PATH: &str = "ws";

// Upper bound on user ids taken from the URL path
pub const MAX_USER_ID_LENGTH: usize = 128;
