use std::env;
use chrono::NaiveTime;
use dotenvy::dotenv;
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    /// Workday start used for late marking.
    pub scheduled_start: NaiveTime,
    /// Minutes after scheduled start before a clock-in counts as late.
    pub grace_period_minutes: i64,

    // Rate limiting
    pub rate_clock_per_min: u32,
    pub rate_submit_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            scheduled_start: NaiveTime::parse_from_str(
                &env::var("SCHEDULED_START").unwrap_or_else(|_| "09:00".to_string()),
                "%H:%M",
            )
            .expect("SCHEDULED_START must be HH:MM"),
            grace_period_minutes: env::var("GRACE_PERIOD_MINUTES")
                .unwrap_or_else(|_| "15".to_string()) // default 15 min
                .parse()
                .unwrap(),

            rate_clock_per_min: env::var("RATE_CLOCK_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_submit_per_min: env::var("RATE_SUBMIT_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
