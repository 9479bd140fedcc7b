use crate::{reminder::DispatchDueRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::{interval, sleep_until, Instant};
use campanile_infra::Context;
use std::time::Duration;
use tracing::{error, info};

/// Seconds until the next minute boundary, minus `secs_before_min`, so the
/// tick driver lines up with wall-clock minutes.
pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Starts the tick-driven dispatch loop. One tick runs the dispatch use
/// case over the window since the persisted watermark; the use case itself
/// isolates per-task failures, so the loop only has to keep ticking.
pub fn start_dispatch_job(ctx: Context) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut tick_interval = interval(Duration::from_secs(ctx.config.tick_interval_secs));
        loop {
            tick_interval.tick().await;
            match execute(DispatchDueRemindersUseCase, &ctx).await {
                Ok(summary) => info!(
                    "Dispatch tick done. sent: {}, failed: {}, suppressed: {}, skipped: {}",
                    summary.sent, summary.failed, summary.suppressed, summary.skipped
                ),
                Err(e) => error!("Dispatch tick failed: {:?}", e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000, 5), 5);
        assert_eq!(get_start_delay(50 * 1000, 10), 60);
        assert_eq!(get_start_delay(50 * 1000, 15), 55);
        assert_eq!(get_start_delay(60 * 1000, 60), 60);
        assert_eq!(get_start_delay(60 * 1000, 10), 50);
        assert_eq!(get_start_delay(59 * 1000, 0), 1);
        assert_eq!(get_start_delay(59 * 1000, 1), 60);
    }
}
