//! Account lifecycle notifications.
//!
//! Notices are best-effort: the engines call them outside any store
//! transaction and log-and-swallow failures, so a broken notifier can
//! never fail or roll back the primary operation.

use tracing::info;

use crate::account::User;
use crate::Result;

/// Subject line for the activation request notice.
pub const ACTIVATION_SUBJECT: &str = "Activate your library account";

/// Subject line for the activation confirmation notice.
pub const ACTIVATION_CONFIRMED_SUBJECT: &str = "Your library account has been activated";

/// Subject line for the unsubscribe confirmation notice.
pub const UNSUBSCRIBE_SUBJECT: &str = "Unsubscribe confirmation";

/// Fire-and-forget account notices.
pub trait Notifier: Send + Sync {
    /// A new account was registered and needs activation.
    fn activation_requested(&self, user: &User) -> Result<()>;

    /// The account was activated.
    fn activation_confirmed(&self, user: &User) -> Result<()>;

    /// The account is about to be deleted.
    fn unsubscribe_confirmed(&self, user: &User) -> Result<()>;
}

/// Notifier that records each notice in the log.
///
/// Outbound delivery is out of scope for the core; the request layer can
/// swap in a real mailer through the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn activation_requested(&self, user: &User) -> Result<()> {
        info!(
            email = %user.email,
            subject = ACTIVATION_SUBJECT,
            "activation notice"
        );
        Ok(())
    }

    fn activation_confirmed(&self, user: &User) -> Result<()> {
        info!(
            email = %user.email,
            subject = ACTIVATION_CONFIRMED_SUBJECT,
            "activation confirmation notice"
        );
        Ok(())
    }

    fn unsubscribe_confirmed(&self, user: &User) -> Result<()> {
        info!(
            email = %user.email,
            subject = UNSUBSCRIBE_SUBJECT,
            "unsubscribe confirmation notice"
        );
        Ok(())
    }
}
