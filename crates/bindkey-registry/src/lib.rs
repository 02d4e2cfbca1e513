//! Shortcut registry: the durable mapping from key combination to action.
//!
//! The registry owns the shortcut collection, enforces the one-action-per-
//! combination invariant with conflict detection, and writes the collection
//! back through its [`Store`] after every mutation. Reads (notably
//! [`Registry::lookup`], which runs on the input-event path) take a snapshot
//! under a short read lock and never touch I/O.

use mac_keycombo::KeyCombination;
use parking_lot::RwLock;
use tracing::warn;
use uuid::Uuid;

mod error;
mod shortcut;
mod store;

pub use error::{Error, Result};
pub use shortcut::Shortcut;
pub use store::{JsonStore, Store};

/// Owns the shortcut collection and its durable copy.
///
/// Mutations are expected from a single owning context; lookups may come
/// from the event-tap callback concurrently, hence the read/write lock.
pub struct Registry {
    store: Box<dyn Store>,
    items: RwLock<Vec<Shortcut>>,
}

impl Registry {
    /// Load the collection from `store` and take ownership of it.
    pub fn open(store: Box<dyn Store>) -> Result<Self> {
        let items = store.load()?;
        Ok(Self {
            store,
            items: RwLock::new(items),
        })
    }

    /// Add a new shortcut.
    ///
    /// Rejects with [`Error::Conflict`] before anything is persisted when
    /// another shortcut (any id) already owns the combination. On a persist
    /// failure the in-memory collection is rolled back, so memory and the
    /// reported result always agree.
    pub fn add(&self, shortcut: Shortcut) -> Result<()> {
        let mut items = self.items.write();
        if let Some(existing) = conflict_in(&items, &shortcut.combo, None) {
            return Err(Error::Conflict {
                combo: shortcut.combo.to_string(),
                existing: existing.describe(),
            });
        }
        items.push(shortcut);
        if let Err(e) = self.store.save(&items) {
            items.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Update an existing shortcut in place (combination, action, and tags
    /// may all change). The shortcut's own id is excluded from the conflict
    /// check, so it may keep its combination. Rolls back on persist failure
    /// like [`Registry::add`].
    pub fn update(&self, shortcut: Shortcut) -> Result<()> {
        let mut items = self.items.write();
        if let Some(existing) = conflict_in(&items, &shortcut.combo, Some(shortcut.id)) {
            return Err(Error::Conflict {
                combo: shortcut.combo.to_string(),
                existing: existing.describe(),
            });
        }
        let prior = match items.iter().position(|s| s.id == shortcut.id) {
            Some(i) => Some((i, std::mem::replace(&mut items[i], shortcut))),
            None => {
                items.push(shortcut);
                None
            }
        };
        if let Err(e) = self.store.save(&items) {
            match prior {
                Some((i, old)) => items[i] = old,
                None => {
                    items.pop();
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a shortcut by id. A no-op when the id is absent; rolls back
    /// on persist failure.
    pub fn remove(&self, id: Uuid) -> Result<()> {
        let mut items = self.items.write();
        let Some(i) = items.iter().position(|s| s.id == id) else {
            return Ok(());
        };
        let removed = items.remove(i);
        if let Err(e) = self.store.save(&items) {
            items.insert(i, removed);
            return Err(e);
        }
        Ok(())
    }

    /// First shortcut (other than `excluding`) owning `combo`, if any.
    pub fn find_conflict(
        &self,
        combo: &KeyCombination,
        excluding: Option<Uuid>,
    ) -> Option<Shortcut> {
        conflict_in(&self.items.read(), combo, excluding)
    }

    /// Record one use of a shortcut: bump the counter and stamp the time.
    ///
    /// Best-effort: persistence failures are logged and never surfaced to
    /// the caller.
    pub fn record_use(&self, id: Uuid) {
        let mut items = self.items.write();
        let Some(shortcut) = items.iter_mut().find(|s| s.id == id) else {
            return;
        };
        shortcut.usage_count += 1;
        shortcut.last_used_at = Some(chrono::Utc::now());
        if let Err(e) = self.store.save(&items) {
            warn!(%id, error = %e, "record_use_persist_failed");
        }
    }

    /// The shortcut bound to `combo`, if any. Lock-guarded in-memory read
    /// with no I/O; safe on the input-event path.
    pub fn lookup(&self, combo: &KeyCombination) -> Option<Shortcut> {
        self.items.read().iter().find(|s| s.combo == *combo).cloned()
    }

    /// Snapshot of all shortcuts in insertion order.
    pub fn all(&self) -> Vec<Shortcut> {
        self.items.read().clone()
    }

    /// Shortcuts carrying the given tag.
    pub fn by_tag(&self, tag: &str) -> Vec<Shortcut> {
        self.items
            .read()
            .iter()
            .filter(|s| s.tags.contains(tag))
            .cloned()
            .collect()
    }

    /// Case-insensitive text match on the action display name or the
    /// combination display string.
    pub fn search(&self, text: &str) -> Vec<Shortcut> {
        let needle = text.to_lowercase();
        self.items
            .read()
            .iter()
            .filter(|s| {
                s.action.display_name().to_lowercase().contains(&needle)
                    || s.combo.display_string().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

/// Scan for a conflicting shortcut under a lock the caller holds.
fn conflict_in(
    items: &[Shortcut],
    combo: &KeyCombination,
    excluding: Option<Uuid>,
) -> Option<Shortcut> {
    items
        .iter()
        .find(|s| s.combo == *combo && Some(s.id) != excluding)
        .cloned()
}

#[cfg(test)]
mod tests {
    use bindkey_engine::Action;

    use super::*;
    use crate::store::MemStore;

    fn combo(spec: &str) -> KeyCombination {
        KeyCombination::parse(spec).expect("combo spec")
    }

    fn launch(name: &str) -> Action {
        Action::LaunchApp {
            bundle_id: format!("com.example.{}", name.to_lowercase()),
            name: name.to_string(),
        }
    }

    fn registry() -> Registry {
        Registry::open(Box::new(MemStore::new())).expect("open")
    }

    #[test]
    fn add_then_conflict_leaves_registry_unchanged() {
        let reg = registry();
        let s1 = Shortcut::new(combo("cmd+shift+k"), launch("Safari"));
        reg.add(s1.clone()).expect("add");

        let s2 = Shortcut::new(combo("cmd+shift+k"), launch("Mail"));
        let err = reg.add(s2).unwrap_err();
        match err {
            Error::Conflict { combo, existing } => {
                assert_eq!(combo, "shift+cmd+k");
                assert!(existing.contains("Open Safari"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Still exactly S1.
        assert_eq!(reg.all(), vec![s1]);
    }

    #[test]
    fn no_two_shortcuts_ever_share_a_combination() {
        let reg = registry();
        let specs = ["cmd+1", "cmd+2", "cmd+1", "cmd+shift+1", "cmd+2", "cmd+3"];
        for spec in specs {
            let _ = reg.add(Shortcut::new(combo(spec), launch("App")));
        }
        let mut updated = reg.all().remove(0);
        updated.combo = combo("cmd+3");
        let _ = reg.update(updated);

        let all = reg.all();
        let mut seen = std::collections::HashSet::new();
        for s in &all {
            assert!(seen.insert(s.combo.clone()), "duplicate combo: {}", s.combo);
        }
    }

    #[test]
    fn update_excludes_own_id_from_conflict() {
        let reg = registry();
        let mut s1 = Shortcut::new(combo("cmd+shift+k"), launch("Safari"));
        reg.add(s1.clone()).expect("add");

        // Same combination, different action: no self-conflict.
        s1.action = launch("Mail");
        reg.update(s1.clone()).expect("update keeps own combo");
        assert_eq!(reg.all()[0].action, launch("Mail"));

        // But moving onto another shortcut's combination still conflicts.
        let s2 = Shortcut::new(combo("cmd+j"), launch("Notes"));
        reg.add(s2).expect("add");
        s1.combo = combo("cmd+j");
        assert!(matches!(reg.update(s1), Err(Error::Conflict { .. })));
    }

    #[test]
    fn remove_is_noop_for_absent_id() {
        let reg = registry();
        let s1 = Shortcut::new(combo("cmd+k"), launch("Safari"));
        reg.add(s1.clone()).expect("add");
        reg.remove(Uuid::new_v4()).expect("noop remove");
        assert_eq!(reg.all().len(), 1);
        reg.remove(s1.id).expect("remove");
        assert!(reg.all().is_empty());
    }

    #[test]
    fn record_use_updates_metadata_and_never_fails() {
        let store = Box::new(MemStore::new());
        let reg = Registry::open(store).expect("open");
        let s1 = Shortcut::new(combo("cmd+k"), launch("Safari"));
        reg.add(s1.clone()).expect("add");

        reg.record_use(s1.id);
        reg.record_use(s1.id);
        let loaded = reg.lookup(&combo("cmd+k")).expect("lookup");
        assert_eq!(loaded.usage_count, 2);
        assert!(loaded.last_used_at.is_some());

        // Unknown id is a silent no-op.
        reg.record_use(Uuid::new_v4());
    }

    #[test]
    fn persist_failure_surfaces_from_add() {
        let store = Box::new(MemStore::new());
        *store.fail_saves.lock() = true;
        let reg = Registry::open(store).expect("open");
        let err = reg
            .add(Shortcut::new(combo("cmd+k"), launch("Safari")))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        // The failed add leaves no trace in memory.
        assert!(reg.all().is_empty());
    }

    #[test]
    fn persist_failure_rolls_back_memory() {
        let store = MemStore::new();
        let reg = Registry::open(Box::new(store.clone())).expect("open");
        let s1 = Shortcut::new(combo("cmd+k"), launch("Safari"));
        reg.add(s1.clone()).expect("add");

        *store.fail_saves.lock() = true;

        // Failed update restores the prior shortcut.
        let mut changed = s1.clone();
        changed.action = launch("Mail");
        assert!(matches!(reg.update(changed), Err(Error::Io(_))));
        assert_eq!(reg.all(), vec![s1.clone()]);

        // Failed remove keeps the shortcut.
        assert!(matches!(reg.remove(s1.id), Err(Error::Io(_))));
        assert_eq!(reg.all(), vec![s1.clone()]);

        // Failed add of a second shortcut changes nothing.
        let s2 = Shortcut::new(combo("cmd+j"), launch("Notes"));
        assert!(matches!(reg.add(s2), Err(Error::Io(_))));
        assert_eq!(reg.all(), vec![s1]);
    }

    #[test]
    fn lookup_matches_by_code_and_modifiers_only() {
        let reg = registry();
        reg.add(Shortcut::new(combo("cmd+shift+k"), launch("Safari")))
            .expect("add");
        // Decoded from a raw event rather than parsed: same binding.
        let decoded = KeyCombination::from_event(40, (1 << 17) | (1 << 20));
        assert!(reg.lookup(&decoded).is_some());
        assert!(reg.lookup(&combo("cmd+k")).is_none());
    }

    #[test]
    fn listing_by_tag_and_search() {
        let reg = registry();
        let mut s1 = Shortcut::new(combo("cmd+shift+k"), launch("Safari"));
        s1.tags.insert("web".to_string());
        reg.add(s1).expect("add");
        let s2 = Shortcut::new(
            combo("ctrl+opt+t"),
            Action::TypeText {
                text: "hello".into(),
                label: "Greeting".into(),
            },
        );
        reg.add(s2).expect("add");

        assert_eq!(reg.by_tag("web").len(), 1);
        assert!(reg.by_tag("nope").is_empty());

        assert_eq!(reg.search("safari").len(), 1);
        assert_eq!(reg.search("greeting").len(), 1);
        assert_eq!(reg.search("ctrl+opt").len(), 1);
        assert!(reg.search("zzz").is_empty());
    }
}
