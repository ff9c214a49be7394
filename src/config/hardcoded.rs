pub const ENV_KEY_DEPLOYMENT: &str = "AW_ENV";
pub const ENV_KEY_SERVE_STATIC: &str = "AW_STATIC";
pub const ENV_KEY_DB: &str = "AW_DB";

pub const PORT_WEB: u16 = 8000;
/// Seconds to wait for background tasks on shutdown.
pub const THREAD_JOIN_TIMEOUT: u64 = 3;
/// Seconds between scheduler ticks.
pub const RELOAD_INTERVAL: u64 = 10;
pub const LOGIN_PATH: &str = "/a/login/";
pub const LOGOUT_PATH: &str = "/o/";
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
pub const RUNNER_TMP_DIR_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub const SESSION_COOKIE: &str = "aw_session";
/// Upper bound for `AW_SESSION_HOURS`, one year.
pub const SESSION_HOURS_MAX: i64 = 24 * 365;
