//! Write capability for mutating bracket operations.
//!
//! The engine keeps no identity state. Callers authorize once at the boundary and
//! pass the resulting [`AdminCapability`] into every call that changes records.

/// Configured admin secret.
#[derive(Clone)]
pub struct AdminKey(String);

impl AdminKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Grant write access if `presented` matches the configured secret.
    pub fn authorize(&self, presented: &str) -> Option<AdminCapability> {
        if !self.0.is_empty() && self.0 == presented {
            Some(AdminCapability { _private: () })
        } else {
            None
        }
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminKey(..)")
    }
}

/// Proof that the caller was authorized; only obtainable from [`AdminKey::authorize`].
#[derive(Debug)]
pub struct AdminCapability {
    _private: (),
}
