use shelfmark_core::AccountId;

/// Scoping identity for a request.
///
/// Inserted by the authorization gate after token verification and account
/// re-resolution; handlers take the owning account only from here, never
/// from client-supplied input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccountContext {
    account_id: AccountId,
}

impl AccountContext {
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }
}
