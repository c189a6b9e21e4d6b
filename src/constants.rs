// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DATABASE_FILE_NAME: &str = "tracker.db";

// Token configuration
pub const MIN_TOKEN_SECRET_LENGTH: usize = 32;

// Validation limits
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_USERNAME_LENGTH: usize = 4;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_DATE_LENGTH: usize = 32;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

// Success messages
pub const MSG_USER_REGISTERED: &str = "user registration done.";
pub const MSG_TRANSACTION_ADDED: &str = "transaction added.";
pub const MSG_TRANSACTION_UPDATED: &str = "transaction updated success.";
pub const MSG_TRANSACTION_DELETED: &str = "transaction delete success.";

// Error messages
pub const ERR_TOKEN_MISSING: &str = "token missing.";
pub const ERR_TOKEN_INVALID: &str = "invalid token or token expired.";
pub const ERR_INVALID_USER: &str = "invalid user.";
pub const ERR_INVALID_PASSWORD: &str = "invalid password";
pub const ERR_USER_EXISTS: &str = "user already exists";
pub const ERR_INTERNAL: &str = "internal server error";
