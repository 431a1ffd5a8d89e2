//! Running a mutation inside an audit session.

use std::future::Future;

use usermgmt_core::result::AppResult;
use usermgmt_core::types::UserId;

use super::handler::{AuditHandler, AuditSession};

impl<H: AuditHandler> AuditSession<H> {
    /// Capture `subject`, apply `action`, capture the result, then publish.
    ///
    /// An error from `action` is returned and nothing is published. Audit
    /// failures after a successful action are logged, never returned.
    pub async fn run_audited<F, Fut>(
        self,
        subject: H::Subject,
        originator_id: UserId,
        action: F,
    ) -> AppResult<H::Subject>
    where
        F: FnOnce(H::Subject) -> Fut,
        Fut: Future<Output = AppResult<H::Subject>>,
    {
        let pre = self.handle_pre_update_state(&subject);
        let updated = action(subject).await?;
        pre.handle_post_update_state(&updated)
            .publish_audit_event(originator_id)
            .await;
        Ok(updated)
    }
}
