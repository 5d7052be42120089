use super::Inner;
use std::sync::Weak;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Duration, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

const MIN_PERIOD: Duration = Duration::from_millis(10);
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Keep the period inside what the timer can represent.
pub(super) fn clamp_period(period: Duration) -> Duration {
    period.clamp(MIN_PERIOD, MAX_REFRESH_INTERVAL)
}

/// Spawn the background refresh loop. The first refresh fires one full period
/// after arming. A failed refresh logs the session out once and ends the loop;
/// the task only holds a weak reference so it never keeps the provider alive.
pub(super) fn spawn(inner: Weak<Inner>, period: Duration) -> JoinHandle<()> {
    let period = clamp_period(period);

    tokio::spawn(async move {
        let now = Instant::now();
        let start = now.checked_add(period).unwrap_or(now);
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(inner) = inner.upgrade() else {
                debug!("session provider dropped, stopping refresh");
                return;
            };

            match inner.refresh_session().await {
                Ok(user) => {
                    debug!(
                        "session refreshed for user {}, next refresh in {} seconds",
                        user.id,
                        period.as_secs()
                    );
                }

                Err(e) => {
                    warn!("Auto-refresh failed: {}", e);

                    inner.logout().await;

                    return;
                }
            }
        }
    })
}
