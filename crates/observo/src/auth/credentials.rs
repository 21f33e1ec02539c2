use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha256};

/// Prepended to the password before hashing it into the signing secret.
const KEY_PREFIX: &[u8] = b"observo-";
/// Secret used when no password is configured. Sessions are not meaningful
/// in that mode since the guard lets everything through.
const DEFAULT_SECRET: &str = "observo-secret-key";
/// `cookie::Key` needs at least this much key material.
const KEY_MATERIAL_LEN: usize = 64;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// The single shared login and the key that signs its sessions.
#[derive(Clone)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
    secret_override: Option<String>,
    key: Key,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("secret_override", &self.secret_override.is_some())
            .finish()
    }
}

impl Credentials {
    pub fn new(
        username: Option<String>,
        password: Option<String>,
        secret_override: Option<String>,
    ) -> Self {
        let key = compute_key(password.as_deref(), secret_override.as_deref());
        Self {
            username,
            password,
            secret_override,
            key,
        }
    }

    /// The guard is active when either a username or a password is set.
    pub fn is_enabled(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn signing_key(&self) -> &Key {
        &self.key
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    /// Replace the password and rotate the signing key, signing out every
    /// existing session. Drops any pinned secret.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
        self.secret_override = None;
        self.key = compute_key(self.password.as_deref(), None);
    }

    /// Pin the signing secret independently of the password.
    pub fn set_secret_key(&mut self, secret: impl Into<String>) {
        self.secret_override = Some(secret.into());
        self.key = compute_key(self.password.as_deref(), self.secret_override.as_deref());
    }

    /// Check a login form submission.
    ///
    /// Without a configured password every submission is accepted. With
    /// one, the username is compared only if a username is configured.
    pub fn verify(&self, username: Option<&str>, password: Option<&str>) -> Result<(), AuthError> {
        let Some(expected_password) = self.password.as_deref() else {
            return Ok(());
        };

        let username_ok = match self.username.as_deref() {
            Some(expected) => username == Some(expected),
            None => true,
        };

        if username_ok && password == Some(expected_password) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// `hex(sha256("observo-" + password))`.
pub fn derive_secret(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(KEY_PREFIX);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn compute_key(password: Option<&str>, secret_override: Option<&str>) -> Key {
    let secret = match (secret_override, password) {
        (Some(secret), _) => secret.to_string(),
        (None, Some(password)) => derive_secret(password),
        (None, None) => DEFAULT_SECRET.to_string(),
    };
    key_from_secret(&secret)
}

fn key_from_secret(secret: &str) -> Key {
    if secret.len() >= KEY_MATERIAL_LEN {
        Key::from(secret.as_bytes())
    } else {
        let stretched = hex::encode(Sha256::digest(secret.as_bytes()));
        Key::from(stretched.as_bytes())
    }
}
