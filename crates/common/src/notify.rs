use async_trait::async_trait;

use crate::ids::DataroomId;
use crate::role::Role;

/// Everything needed to tell someone they were invited to a dataroom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationNotice {
    pub to_email: String,
    pub dataroom_id: DataroomId,
    pub dataroom_name: String,
    pub inviter_name: String,
    pub inviter_email: String,
    pub role: Role,
}

impl InvitationNotice {
    pub fn subject(&self) -> String {
        format!("You've been invited to access \"{}\"", self.dataroom_name)
    }

    /// Plain text body listing what the granted role allows.
    pub fn body(&self) -> String {
        let mut body = format!(
            "{} ({}) has invited you to access the dataroom \"{}\" as {}.\n\nYou will be able to:\n",
            self.inviter_name, self.inviter_email, self.dataroom_name, self.role
        );
        for capability in self.role.capabilities() {
            body.push_str("  - ");
            body.push_str(capability);
            body.push('\n');
        }
        body
    }
}

#[derive(Debug, thiserror::Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Best-effort delivery of invitation notices. Failures never affect
///  the grant that triggered them.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    async fn notify_invitation(&self, notice: &InvitationNotice) -> Result<(), NotifyError>;
}

/// Writes notices to the log instead of sending mail.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify_invitation(&self, notice: &InvitationNotice) -> Result<(), NotifyError> {
        tracing::info!(
            to = %notice.to_email,
            dataroom_id = %notice.dataroom_id,
            role = %notice.role,
            subject = %notice.subject(),
            "invitation email:\n{}",
            notice.body()
        );
        Ok(())
    }
}
