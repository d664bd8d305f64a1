//! # Session State
//!
//! The current [`Session`] plus the store it was loaded from. Login and
//! logout go through here so the file and the in-memory value never
//! disagree.

use std::path::Path;

use drivehub_client::{ClientResult, Session, SessionIdentity, SessionStore};

#[derive(Debug)]
pub struct SessionState {
    store: SessionStore,
    session: Session,
}

impl SessionState {
    /// Reads the persisted session (signed out if there is none).
    pub fn load(store: SessionStore) -> ClientResult<Self> {
        let session = store.load()?;
        Ok(SessionState { store, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn sign_in(&mut self, identity: SessionIdentity) -> ClientResult<()> {
        let session = Session::signed_in(identity.token, identity.user);
        self.store.save(&session)?;
        self.session = session;
        Ok(())
    }

    pub fn sign_out(&mut self) -> ClientResult<()> {
        self.store.clear()?;
        self.session = Session::signed_out();
        Ok(())
    }
}
