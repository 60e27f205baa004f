use super::AuthenticatedIdentity;

/// Outcome of an authorization check. Transient per-request value, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    OwnerMismatch,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Compare the resource owner declared in the request path against the
/// authenticated subject.
///
/// Exact string equality: case-sensitive, no trimming, no normalization.
/// This check depends only on the declared owner, never on whether the
/// target resource exists, so a denial cannot leak existence information.
pub fn authorize(declared_owner: &str, identity: &AuthenticatedIdentity) -> AccessDecision {
    if declared_owner == identity.subject {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::OwnerMismatch)
    }
}

/// Second ownership check against the stored owner of a fetched resource.
///
/// The store already scopes every query by subject, so under path-based
/// routing this can never deny; it guards callers that look resources up
/// by bare id without an owner-scoped path.
pub fn authorize_resource(owner_subject: &str, identity: &AuthenticatedIdentity) -> AccessDecision {
    authorize(owner_subject, identity)
}
