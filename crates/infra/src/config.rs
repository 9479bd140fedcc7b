use campanile_domain::InstitutionSettings;
use campanile_utils::create_random_secret;
use chrono_tz::Tz;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// API key that protects the admin routes
    pub admin_api_key: String,
    /// Port for the application to run on
    pub port: usize,
    /// Time zone all class wall-clock times are interpreted against
    pub timezone: Tz,
    /// Seconds between dispatch ticks
    pub tick_interval_secs: u64,
    /// How far past the tick window occurrences are expanded, so that a
    /// slow or missed tick cannot skip reminders
    pub dispatch_lookahead_millis: i64,
    /// Maximum occurrences emitted per expansion call
    pub max_expansion_count: usize,
    /// Maximum reminder tasks dispatched concurrently within one tick
    pub dispatch_concurrency: usize,
    /// Per-task dispatch deadline; a task exceeding it is settled as failed
    pub dispatch_timeout_millis: u64,
    /// Age after which a pending claim is considered abandoned by a crashed
    /// scheduler instance and may be retaken
    pub claim_stale_after_millis: i64,
    /// Maximum allowed duration in millis for occurrence listing queries.
    /// This is used to avoid having clients ask for occurrences in a
    /// timespan of several years which will take a lot of time to compute
    /// and is also not very useful information to query about anyways.
    pub occurrence_query_duration_limit: i64,
}

impl Config {
    pub fn new() -> Self {
        let admin_api_key = match std::env::var("ADMIN_API_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find ADMIN_API_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!("Admin API key was generated and set to: {}", key);
                key
            }
        };
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().expect("valid default port")
            }
        };
        let timezone = match std::env::var("INSTITUTION_TIMEZONE") {
            Ok(raw) => match raw.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given INSTITUTION_TIMEZONE: {} is not valid, falling back to UTC.",
                        raw
                    );
                    chrono_tz::UTC
                }
            },
            Err(_) => chrono_tz::UTC,
        };
        Self {
            admin_api_key,
            port,
            timezone,
            tick_interval_secs: 60,
            dispatch_lookahead_millis: 1000 * 60 * 60 * 48, // 48 hours
            max_expansion_count: 256,
            dispatch_concurrency: 8,
            dispatch_timeout_millis: 1000 * 30,
            claim_stale_after_millis: 1000 * 60 * 10, // 10 minutes
            occurrence_query_duration_limit: 1000 * 60 * 60 * 24 * 62, // 62 days
        }
    }

    pub fn institution_settings(&self) -> InstitutionSettings {
        InstitutionSettings {
            timezone: self.timezone,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
