use campanile_domain::{
    ChannelKind, ClassDefinition, DeliveryLogEntry, DeliveryStatus, Occurrence, TaskKey, User,
};
use campanile_infra::{Context, EmailMessage};
use chrono::TimeZone;
use tracing::warn;

/// Everything the channel fan-out needs to address and render one reminder.
#[derive(Debug, Clone)]
pub struct ReminderNotice {
    pub key: TaskKey,
    pub class_title: String,
    pub class_room: String,
    pub occurrence_start: i64,
    pub recipient_name: String,
    pub recipient_email: String,
}

impl ReminderNotice {
    pub fn for_user(class: &ClassDefinition, occurrence: &Occurrence, user: &User) -> Self {
        Self {
            key: TaskKey {
                class_id: class.id.clone(),
                occurrence_start: occurrence.start_ts,
                user_id: user.id.clone(),
            },
            class_title: class.title.clone(),
            class_room: class.room.clone(),
            occurrence_start: occurrence.start_ts,
            recipient_name: user.name.clone(),
            recipient_email: user.email.clone(),
        }
    }

    /// Notice for a manually triggered test reminder. There is no class
    /// behind it, so the key is synthetic and never claimed.
    pub fn test_for_user(user: &User, now: i64) -> Self {
        Self {
            key: TaskKey {
                class_id: Default::default(),
                occurrence_start: now,
                user_id: user.id.clone(),
            },
            class_title: "Test reminder".into(),
            class_room: String::new(),
            occurrence_start: now,
            recipient_name: user.name.clone(),
            recipient_email: user.email.clone(),
        }
    }
}

/// Fans one due reminder out to each enabled channel. Channels are attempted
/// independently: a failing provider produces a `failed` entry for its own
/// channel and never blocks the rest. Every attempt is appended to the
/// delivery log.
pub async fn dispatch_to_channels(
    notice: &ReminderNotice,
    channels: &[ChannelKind],
    ctx: &Context,
) -> Vec<DeliveryLogEntry> {
    let mut entries = Vec::with_capacity(channels.len());
    for channel in channels {
        let (status, response) = match channel {
            ChannelKind::Email => send_email(notice, ctx).await,
            // accepted in preferences, but no transport is wired up yet
            ChannelKind::Sms | ChannelKind::Push => (
                DeliveryStatus::Suppressed,
                "channel not yet available".to_string(),
            ),
        };
        entries.push(append_entry(notice, *channel, status, response, ctx).await);
    }
    entries
}

/// Writes one log entry per channel without attempting any send. Used for
/// quiet-hours suppression and for tasks that ran out of time.
pub async fn record_outcome(
    notice: &ReminderNotice,
    channels: &[ChannelKind],
    status: DeliveryStatus,
    response: &str,
    ctx: &Context,
) -> Vec<DeliveryLogEntry> {
    let mut entries = Vec::with_capacity(channels.len());
    for channel in channels {
        entries.push(append_entry(notice, *channel, status, response.to_string(), ctx).await);
    }
    entries
}

async fn append_entry(
    notice: &ReminderNotice,
    channel: ChannelKind,
    status: DeliveryStatus,
    response: String,
    ctx: &Context,
) -> DeliveryLogEntry {
    let entry = DeliveryLogEntry::new(
        notice.key.clone(),
        channel,
        status,
        response,
        ctx.sys.get_timestamp_millis(),
    );
    if let Err(e) = ctx.repos.delivery_logs.append(&entry).await {
        warn!("Failed to append delivery log entry: {:?}", e);
    }
    entry
}

async fn send_email(notice: &ReminderNotice, ctx: &Context) -> (DeliveryStatus, String) {
    let start_text = match ctx
        .config
        .timezone
        .timestamp_millis_opt(notice.occurrence_start)
        .earliest()
    {
        Some(local) => local.format("%A %H:%M").to_string(),
        None => "soon".to_string(),
    };
    let location = if notice.class_room.is_empty() {
        String::new()
    } else {
        format!(" in room {}", notice.class_room)
    };
    let message = EmailMessage {
        to: notice.recipient_email.clone(),
        subject: format!("Reminder: {} at {}", notice.class_title, start_text),
        body: format!(
            "Hi {},\n\n{} starts {}{}.\n\nCampanile",
            notice.recipient_name, notice.class_title, start_text, location
        ),
    };

    match ctx.email_sender.send(message).await {
        Ok(response) => (DeliveryStatus::Sent, response),
        Err(e) => (DeliveryStatus::Failed, e.to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use campanile_domain::Role;
    use campanile_infra::RecordingEmailSender;
    use std::sync::Arc;

    fn notice() -> ReminderNotice {
        let user = User::new(
            "Alan Turing".into(),
            "turing@example.edu".into(),
            Role::Staff,
            0,
        );
        ReminderNotice::test_for_user(&user, 1709542800000)
    }

    fn ctx_with_recorder() -> (Context, Arc<RecordingEmailSender>) {
        let mut ctx = Context::create_inmemory();
        let sender = Arc::new(RecordingEmailSender::new());
        ctx.email_sender = sender.clone();
        (ctx, sender)
    }

    #[actix_web::test]
    async fn fans_out_one_entry_per_enabled_channel() {
        let (ctx, sender) = ctx_with_recorder();

        let entries = dispatch_to_channels(
            &notice(),
            &[ChannelKind::Email, ChannelKind::Sms],
            &ctx,
        )
        .await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].channel, ChannelKind::Email);
        assert_eq!(entries[0].status, DeliveryStatus::Sent);
        assert_eq!(entries[1].channel, ChannelKind::Sms);
        assert_eq!(entries[1].status, DeliveryStatus::Suppressed);
        assert_eq!(sender.sent_count(), 1);
        assert_eq!(ctx.repos.delivery_logs.query(10).await.len(), 2);
    }

    #[actix_web::test]
    async fn email_failure_does_not_block_other_channels() {
        let (ctx, sender) = ctx_with_recorder();
        sender.fail_with(Some("smtp down".into()));

        let entries = dispatch_to_channels(
            &notice(),
            &[ChannelKind::Email, ChannelKind::Sms],
            &ctx,
        )
        .await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, DeliveryStatus::Failed);
        assert!(entries[0].response.contains("smtp down"));
        assert_eq!(entries[1].status, DeliveryStatus::Suppressed);
    }

    #[actix_web::test]
    async fn records_outcomes_without_sending() {
        let (ctx, sender) = ctx_with_recorder();

        let entries = record_outcome(
            &notice(),
            &[ChannelKind::Email],
            DeliveryStatus::Suppressed,
            "suppressed by quiet hours",
            &ctx,
        )
        .await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, DeliveryStatus::Suppressed);
        assert_eq!(sender.sent_count(), 0);
        assert_eq!(ctx.repos.delivery_logs.query(10).await.len(), 1);
    }
}
