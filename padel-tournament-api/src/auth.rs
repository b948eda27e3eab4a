//! Admin gate for the mutating surface.
//!
//! A single shared credential checked locally. This is a convenience gate
//! for the public/admin split of the pages, not a security boundary.

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "1234";

/// Tracks whether the current session is the admin.
#[derive(Clone, Debug, Default)]
pub struct Session {
    admin: bool,
}

impl Session {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlocks the admin surface when the credentials match.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if username == ADMIN_USERNAME && password == ADMIN_PASSWORD {
            self.admin = true;
            log::info!("admin logged in");
            true
        } else {
            log::info!("rejected login for {:?}", username);
            false
        }
    }

    pub fn logout(&mut self) {
        self.admin = false;
        log::info!("admin logged out");
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}
