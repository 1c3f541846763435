use flow_core::UserId;

/// Principal context for a request (the authenticated identity).
///
/// Inserted exactly once by the authentication gate and read-only afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
}

impl PrincipalContext {
    pub(crate) fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
