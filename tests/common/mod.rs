//! Test helpers for the integration suites.

use std::sync::{Arc, Mutex};

use biblio::{BiblioError, Config, CredentialHasher, Library, NewUser, Notifier, Result, User};

/// Deterministic hasher so multi-step flows stay fast.
///
/// Digests carry the plaintext behind a marker; good enough for exercising
/// the engines, useless as an actual hash.
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(format!("digest:{plaintext}"))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        digest == format!("digest:{plaintext}")
    }
}

/// Notifier that records every notice in a shared buffer.
///
/// Clones share the buffer, so a handle kept by the test observes notices
/// sent through the clone handed to the library.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingNotifier {
    /// A notifier whose every send fails after recording.
    pub fn failing() -> Self {
        Self {
            notices: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// The notices recorded so far, as `kind:email` strings.
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    fn record(&self, kind: &str, user: &User) -> Result<()> {
        self.notices
            .lock()
            .unwrap()
            .push(format!("{kind}:{}", user.email));
        if self.fail {
            Err(BiblioError::Config("notifier down".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Notifier for RecordingNotifier {
    fn activation_requested(&self, user: &User) -> Result<()> {
        self.record("activation", user)
    }

    fn activation_confirmed(&self, user: &User) -> Result<()> {
        self.record("activated", user)
    }

    fn unsubscribe_confirmed(&self, user: &User) -> Result<()> {
        self.record("unsubscribed", user)
    }
}

/// A library wired with the fast hasher and a recording notifier.
pub fn fast_library() -> (Library, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let library = Library::new(
        Box::new(PlainHasher),
        Box::new(notifier.clone()),
        Config::default(),
    );
    (library, notifier)
}

/// Register and activate a user so it can hold reservations.
pub fn register_active_user(library: &Library, email: &str) {
    library
        .register(
            NewUser::new(email, "initial-password", "Test", "Reader")
                .with_security("What is your city of birth?", "Paris"),
        )
        .unwrap();
    library.activate(email).unwrap();
}
