//! Per-user continuation state.
//!
//! Maps a user to the branch and change request their next prompt should
//! extend. Writes are last-write-wins per user; users never contend with
//! each other.

use acore::{Continuation, Error, ErrorKind, RepositoryRef};
use dashmap::DashMap;
use forge::Forge;

/// Keyed continuation storage.
pub trait ContinuationStore: Send + Sync {
    /// The user's active continuation.
    fn get(&self, user: &str) -> Option<Continuation>;

    /// Replace the user's continuation.
    fn set(&self, user: &str, continuation: Continuation);

    /// Leave continuation mode, returning what was active.
    fn clear(&self, user: &str) -> Option<Continuation>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Continuation>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContinuationStore for MemoryStore {
    fn get(&self, user: &str) -> Option<Continuation> {
        self.entries.get(user).map(|entry| entry.value().clone())
    }

    fn set(&self, user: &str, continuation: Continuation) {
        self.entries.insert(user.to_owned(), continuation);
    }

    fn clear(&self, user: &str) -> Option<Continuation> {
        self.entries.remove(user).map(|(_, continuation)| continuation)
    }
}

/// Find the change request to continue.
///
/// With a number, that request is fetched. Without one, the most recently
/// updated open request whose head branch starts with `prefix` is used.
pub async fn resolve(
    forge: &impl Forge,
    repo: &RepositoryRef,
    number: Option<u64>,
    prefix: &str,
) -> Result<Continuation, Error> {
    if let Some(number) = number {
        let request = forge.get_change_request(repo, number).await.map_err(|e| {
            if e.is_not_found() {
                Error::not_found(format!("change request #{number} not found in {repo}"))
            } else {
                e.into()
            }
        })?;
        return Ok(Continuation::new(request.head_branch, request.number));
    }

    let prefix = format!("{}/", prefix.trim_end_matches('/'));
    let open = forge.list_open_change_requests(repo).await?;
    open.into_iter()
        .map(|request| request.reference)
        .find(|reference| reference.head_branch.starts_with(&prefix))
        .map(|reference| Continuation::new(reference.head_branch, reference.number))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("no open {prefix}* change request in {repo}"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_per_user() {
        let store = MemoryStore::new();
        store.set("alice", Continuation::new("amadeus/a", 1));
        store.set("bob", Continuation::new("amadeus/b", 2));
        store.set("alice", Continuation::new("amadeus/c", 3));
        assert_eq!(store.get("alice"), Some(Continuation::new("amadeus/c", 3)));
        assert_eq!(store.get("bob"), Some(Continuation::new("amadeus/b", 2)));
        assert_eq!(store.clear("alice"), Some(Continuation::new("amadeus/c", 3)));
        assert_eq!(store.get("alice"), None);
        assert_eq!(store.clear("alice"), None);
    }
}
