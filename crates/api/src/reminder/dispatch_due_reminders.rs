use super::channel_dispatcher::{dispatch_to_channels, record_outcome, ReminderNotice};
use crate::shared::usecase::UseCase;
use campanile_domain::{
    fire_plan, settle_outcomes, ChannelKind, ClaimStatus, DeliveryStatus, FirePlan, ReminderTask,
    TaskKey, TimeSpan, User,
};
use campanile_infra::Context;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::time::Duration;
use tracing::error;

/// A `ReminderTask` due inside the tick window, bundled with the rendering
/// payload and channel snapshot it will be dispatched with: either a
/// reminder to fire or a quiet-hours suppression to record.
#[derive(Debug)]
struct DueTask {
    task: ReminderTask,
    notice: ReminderNotice,
    channels: Vec<ChannelKind>,
    kind: DueKind,
}

#[derive(Debug)]
enum DueKind {
    Fire,
    QuietHours,
}

enum TaskOutcome {
    Sent,
    Failed,
    Suppressed,
    Skipped,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub suppressed: usize,
    pub skipped: usize,
}

/// The tick body of the dispatch scheduler, and the only code path that
/// sends scheduled reminders. Restart-safe: the processed window starts at
/// the persisted watermark, and every task takes a write-ahead claim before
/// any channel send, so replayed windows skip already handled keys.
#[derive(Debug)]
pub struct DispatchDueRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchDueRemindersUseCase {
    type Response = DispatchSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchDueReminders";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let tick_interval_millis = ctx.config.tick_interval_secs as i64 * 1000;
        let watermark = ctx
            .repos
            .scheduler_state
            .get_watermark()
            .await
            .unwrap_or(now - tick_interval_millis);
        let window = match TimeSpan::new(watermark, now) {
            Ok(window) => window,
            // clock went backwards or a concurrent instance already covered
            // this window, nothing to do
            Err(_) => return Ok(Default::default()),
        };
        // expansion reaches past the window end so a slow or missed tick
        // cannot skip occurrences whose fire instant is already computed
        let horizon = match TimeSpan::new(
            watermark,
            now + ctx.config.dispatch_lookahead_millis,
        ) {
            Ok(horizon) => horizon,
            Err(_) => return Ok(Default::default()),
        };
        let settings = ctx.config.institution_settings();

        // snapshot of definitions and subscriber preferences, read once at
        // tick start, so a mid-tick preference change cannot alter already
        // computed fire instants
        let classes = ctx.repos.classes.find_active().await;
        let mut subscribers: HashMap<String, Option<User>> = HashMap::new();
        for class in &classes {
            if !subscribers.contains_key(&class.teacher_email) {
                let user = ctx.repos.users.find_by_email(&class.teacher_email).await;
                subscribers.insert(class.teacher_email.clone(), user);
            }
        }

        let mut tasks = Vec::new();
        for class in &classes {
            let user = match subscribers.get(&class.teacher_email) {
                Some(Some(user)) => user,
                _ => continue,
            };
            for occurrence in class.expand(&horizon, &settings, ctx.config.max_expansion_count) {
                let (planned_fire_ts, kind) =
                    match fire_plan(&occurrence, &user.preferences, settings.timezone) {
                        FirePlan::At(fire_ts) => (fire_ts, DueKind::Fire),
                        FirePlan::Suppressed { candidate } => (candidate, DueKind::QuietHours),
                        FirePlan::Disabled => continue,
                    };
                if !window.contains(planned_fire_ts) {
                    continue;
                }
                tasks.push(DueTask {
                    task: ReminderTask {
                        class_id: class.id.clone(),
                        occurrence_start: occurrence.start_ts,
                        user_id: user.id.clone(),
                        planned_fire_ts,
                    },
                    notice: ReminderNotice::for_user(class, &occurrence, user),
                    channels: user.preferences.channels.enabled(),
                    kind,
                });
            }
        }

        let outcomes = stream::iter(tasks)
            .map(|task| process_task(task, ctx))
            .buffer_unordered(ctx.config.dispatch_concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut summary = DispatchSummary::default();
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Sent => summary.sent += 1,
                TaskOutcome::Failed => summary.failed += 1,
                TaskOutcome::Suppressed => summary.suppressed += 1,
                TaskOutcome::Skipped => summary.skipped += 1,
            }
        }

        // advance only after every task of this window settled, so a crash
        // mid-tick replays the window and the claims take care of the rest
        if let Err(e) = ctx.repos.scheduler_state.set_watermark(now).await {
            error!("Failed to persist dispatch watermark: {:?}", e);
        }

        Ok(summary)
    }
}

/// A task failing in here never propagates: the claim is settled, the
/// outcome is logged and the rest of the tick carries on.
async fn process_task(due: DueTask, ctx: &Context) -> TaskOutcome {
    let key = due.task.key();
    let claimed = match ctx
        .repos
        .reminder_claims
        .claim(
            &key,
            ctx.sys.get_timestamp_millis(),
            ctx.config.claim_stale_after_millis,
        )
        .await
    {
        Ok(claimed) => claimed,
        Err(e) => {
            error!("Failed to claim reminder task {:?}: {:?}", key, e);
            return TaskOutcome::Failed;
        }
    };
    if !claimed {
        // duplicate task: another tick or scheduler instance owns this key
        return TaskOutcome::Skipped;
    }

    match due.kind {
        DueKind::QuietHours => {
            record_outcome(
                &due.notice,
                &due.channels,
                DeliveryStatus::Suppressed,
                "suppressed by quiet hours",
                ctx,
            )
            .await;
            settle(ctx, &key, ClaimStatus::Suppressed).await;
            TaskOutcome::Suppressed
        }
        DueKind::Fire => {
            let deadline = Duration::from_millis(ctx.config.dispatch_timeout_millis);
            match tokio::time::timeout(
                deadline,
                dispatch_to_channels(&due.notice, &due.channels, ctx),
            )
            .await
            {
                Ok(entries) => {
                    let status = settle_outcomes(&entries);
                    settle(ctx, &key, status).await;
                    match status {
                        ClaimStatus::Sent => TaskOutcome::Sent,
                        ClaimStatus::Failed => TaskOutcome::Failed,
                        _ => TaskOutcome::Suppressed,
                    }
                }
                Err(_) => {
                    // timed-out work is settled failed, never left pending
                    record_outcome(
                        &due.notice,
                        &due.channels,
                        DeliveryStatus::Failed,
                        "dispatch timed out",
                        ctx,
                    )
                    .await;
                    settle(ctx, &key, ClaimStatus::Failed).await;
                    TaskOutcome::Failed
                }
            }
        }
    }
}

async fn settle(ctx: &Context, key: &TaskKey, status: ClaimStatus) {
    if let Err(e) = ctx
        .repos
        .reminder_claims
        .settle(key, status, ctx.sys.get_timestamp_millis())
        .await
    {
        error!("Failed to settle reminder claim {:?}: {:?}", key, e);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use campanile_domain::{ClassDefinition, Recurrence, Role};
    use campanile_infra::{RecordingEmailSender, StaticTimeSys};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn ts(day: u32, hours: u32, minutes: u32) -> i64 {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hours, minutes, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    struct TestRig {
        ctx: Context,
        sender: Arc<RecordingEmailSender>,
    }

    impl TestRig {
        /// Weekly class on Monday 2024-03-04 09:00 UTC with one subscribed
        /// staff user, lead time 15 minutes.
        async fn new() -> Self {
            let mut ctx = Context::create_inmemory();
            let sender = Arc::new(RecordingEmailSender::new());
            ctx.email_sender = sender.clone();

            let start = NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap();
            let class = ClassDefinition::new(
                "Linear Algebra".into(),
                "B-201".into(),
                "turing@example.edu".into(),
                start,
                start + chrono::Duration::minutes(90),
                Recurrence::Weekly,
                0,
            )
            .unwrap();
            ctx.repos.classes.insert(&class).await.unwrap();

            let user = User::new(
                "Alan Turing".into(),
                "turing@example.edu".into(),
                Role::Staff,
                0,
            );
            ctx.repos.users.insert(&user).await.unwrap();

            Self { ctx, sender }
        }

        async fn with_user_prefs<F: FnOnce(&mut User)>(self, mutate: F) -> Self {
            let mut user = self
                .ctx
                .repos
                .users
                .find_by_email("turing@example.edu")
                .await
                .unwrap();
            mutate(&mut user);
            self.ctx.repos.users.save(&user).await.unwrap();
            self
        }

        /// Runs one tick over the window `(watermark, now]`.
        async fn tick(&mut self, watermark: i64, now: i64) -> DispatchSummary {
            self.ctx
                .repos
                .scheduler_state
                .set_watermark(watermark)
                .await
                .unwrap();
            self.ctx.sys = Arc::new(StaticTimeSys {
                timestamp_millis: now,
            });
            execute(DispatchDueRemindersUseCase, &self.ctx).await.unwrap()
        }
    }

    #[actix_web::test]
    async fn fires_reminder_inside_tick_window() {
        let mut rig = TestRig::new().await;

        // lead 15 -> planned fire Monday 08:45
        let summary = rig.tick(ts(4, 8, 40), ts(4, 8, 50)).await;

        assert_eq!(summary.sent, 1);
        assert_eq!(rig.sender.sent_count(), 1);
        let logs = rig.ctx.repos.delivery_logs.query(10).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, DeliveryStatus::Sent);
        assert_eq!(logs[0].channel, ChannelKind::Email);
        assert_eq!(logs[0].key.occurrence_start, ts(4, 9, 0));
    }

    #[actix_web::test]
    async fn nothing_fires_outside_tick_window() {
        let mut rig = TestRig::new().await;

        let summary = rig.tick(ts(4, 8, 0), ts(4, 8, 30)).await;

        assert_eq!(summary, DispatchSummary::default());
        assert!(rig.ctx.repos.delivery_logs.query(10).await.is_empty());
    }

    #[actix_web::test]
    async fn replayed_tick_never_sends_twice() {
        let mut rig = TestRig::new().await;

        let first = rig.tick(ts(4, 8, 40), ts(4, 8, 50)).await;
        assert_eq!(first.sent, 1);

        // restart: watermark rolled back, same window derived again
        let second = rig.tick(ts(4, 8, 40), ts(4, 8, 50)).await;
        assert_eq!(second.sent, 0);
        assert_eq!(second.skipped, 1);

        let logs = rig.ctx.repos.delivery_logs.query(10).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(rig.sender.sent_count(), 1);
    }

    #[actix_web::test]
    async fn failed_sends_are_retried_on_a_later_tick() {
        let mut rig = TestRig::new().await;
        rig.sender.fail_with(Some("smtp down".into()));

        let first = rig.tick(ts(4, 8, 40), ts(4, 8, 50)).await;
        assert_eq!(first.failed, 1);

        rig.sender.fail_with(None);
        let second = rig.tick(ts(4, 8, 40), ts(4, 8, 50)).await;
        assert_eq!(second.sent, 1);

        let logs = rig.ctx.repos.delivery_logs.query(10).await;
        assert_eq!(logs.len(), 2);
        let sent: Vec<_> = logs
            .iter()
            .filter(|entry| entry.status == DeliveryStatus::Sent)
            .collect();
        assert_eq!(sent.len(), 1);
    }

    #[actix_web::test]
    async fn quiet_hours_suppression_is_logged_once() {
        // class at Monday 23:30, lead 60 -> candidate 22:30 inside
        // 22:00-07:00, deferral lands past class start -> suppressed
        let rig = TestRig::new().await;
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let late_class = ClassDefinition::new(
            "Evening Seminar".into(),
            "C-101".into(),
            "turing@example.edu".into(),
            start,
            start + chrono::Duration::minutes(60),
            Recurrence::Once,
            0,
        )
        .unwrap();
        rig.ctx.repos.classes.insert(&late_class).await.unwrap();
        let mut rig = rig
            .with_user_prefs(|user| {
                user.preferences.lead_time_minutes = 60;
                user.preferences.quiet_hours.enabled = true;
            })
            .await;

        let summary = rig.tick(ts(4, 22, 25), ts(4, 22, 35)).await;

        assert_eq!(summary.suppressed, 1);
        assert_eq!(summary.sent, 0);
        let logs = rig.ctx.repos.delivery_logs.query(10).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, DeliveryStatus::Suppressed);
        assert_eq!(rig.sender.sent_count(), 0);

        // replaying the window records nothing new
        let summary = rig.tick(ts(4, 22, 25), ts(4, 22, 35)).await;
        assert_eq!(summary.skipped, 1);
        assert_eq!(rig.ctx.repos.delivery_logs.query(10).await.len(), 1);
    }

    #[actix_web::test]
    async fn disabled_preferences_produce_no_tasks() {
        let mut rig = TestRig::new()
            .await
            .with_user_prefs(|user| user.preferences.enabled = false)
            .await;

        let summary = rig.tick(ts(4, 8, 40), ts(4, 8, 50)).await;

        assert_eq!(summary, DispatchSummary::default());
        assert!(rig.ctx.repos.delivery_logs.query(10).await.is_empty());
    }

    #[actix_web::test]
    async fn independent_tasks_dispatch_within_one_tick() {
        // a second class subscribed by another teacher rides the same tick
        let mut rig = TestRig::new().await;
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let other = ClassDefinition::new(
            "Number Theory".into(),
            "A-1".into(),
            "lovelace@example.edu".into(),
            start,
            start + chrono::Duration::minutes(45),
            Recurrence::Weekly,
            0,
        )
        .unwrap();
        rig.ctx.repos.classes.insert(&other).await.unwrap();
        let user = User::new(
            "Ada Lovelace".into(),
            "lovelace@example.edu".into(),
            Role::Staff,
            0,
        );
        rig.ctx.repos.users.insert(&user).await.unwrap();

        let summary = rig.tick(ts(4, 8, 40), ts(4, 8, 50)).await;

        // both tasks processed, neither aborted the tick
        assert_eq!(summary.sent, 2);
        assert_eq!(rig.ctx.repos.delivery_logs.query(10).await.len(), 2);
    }
}
