//! Roster tracking: who is currently in the room.

use std::collections::BTreeSet;

/// Maintains the current set of participant identities for display.
///
/// Join and leave notifications carry no payload; on either trigger the
/// driver re-enumerates the session's participants and calls [`resync`].
/// The roster is replaced wholesale each time, so it is exactly as accurate
/// as the enumeration was at call time, with no caching of its own.
///
/// [`resync`]: MembershipTracker::resync
#[derive(Debug, Clone, Default)]
pub struct MembershipTracker {
    roster: BTreeSet<String>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the roster from a fresh enumeration of remote participants
    /// plus the local identity (the session does not include itself in the
    /// enumerable set). Idempotent: repeated triggers with an unchanged
    /// enumeration produce a set-equal roster.
    pub fn resync<I>(&mut self, remote: I, local_identity: &str) -> &BTreeSet<String>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut next: BTreeSet<String> = remote.into_iter().map(Into::into).collect();
        next.insert(local_identity.to_string());
        self.roster = next;
        &self.roster
    }

    /// The current roster, ordered by identity.
    pub fn roster(&self) -> &BTreeSet<String> {
        &self.roster
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.roster.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }
}
