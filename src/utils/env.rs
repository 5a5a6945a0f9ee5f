use std::env;

/// Whether the app runs in development mode.
pub fn is_development() -> bool {
    // 1. The HUBLINK_ENV environment variable wins when set
    if let Ok(env_val) = env::var("HUBLINK_ENV") {
        return env_val == "development";
    }
    // 2. Fall back to the compile-time debug_assertions flag
    #[cfg(debug_assertions)]
    {
        return true;
    }
    #[cfg(not(debug_assertions))]
    {
        return false;
    }
}
