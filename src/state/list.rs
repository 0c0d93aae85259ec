//! Lists with optimistic creation and confirmed deletion.

use std::fmt::Debug;
use std::future::Future;

use storyline_core::ApiResult;
use uuid::Uuid;

use super::Store;
use super::optimistic::optimistic;

/// A server record with a stable identifier. Records the backend sent
/// without an id report `None`.
pub trait Record {
    type Id: Copy + PartialEq + Debug;

    fn record_id(&self) -> Option<Self::Id>;
}

/// A list slot: either a local placeholder awaiting the server or a
/// canonical record.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T, D> {
    Pending { temp_id: Uuid, draft: D },
    Saved(T),
}

impl<T, D> Entry<T, D> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn saved(&self) -> Option<&T> {
        match self {
            Self::Saved(record) => Some(record),
            Self::Pending { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticList<T, D> {
    entries: Vec<Entry<T, D>>,
}

impl<T, D> Default for OptimisticList<T, D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Record, D> OptimisticList<T, D> {
    pub fn from_saved(records: Vec<T>) -> Self {
        Self {
            entries: records.into_iter().map(Entry::Saved).collect(),
        }
    }

    pub fn entries(&self) -> &[Entry<T, D>] {
        &self.entries
    }

    pub fn saved(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(Entry::saved)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    /// Replaces every saved record with `records`. Placeholders for calls
    /// still in flight are kept after them.
    pub fn replace_saved(&mut self, records: Vec<T>) {
        let pending = self.entries.drain(..).filter(Entry::is_pending);
        let mut entries: Vec<_> = records.into_iter().map(Entry::Saved).collect();
        entries.extend(pending);
        self.entries = entries;
    }

    /// Appends a placeholder and returns its temporary id.
    pub fn push_pending(&mut self, draft: D) -> Uuid {
        let temp_id = Uuid::new_v4();
        self.entries.push(Entry::Pending { temp_id, draft });
        temp_id
    }

    /// Swaps the placeholder for the canonical record, or just drops the
    /// placeholder when a reload already brought the record in.
    ///
    /// Reloads keep placeholders, so a missing placeholder means the list was
    /// reset (for example to another story's episodes) and the record no
    /// longer belongs here. It is dropped and `false` is returned.
    pub fn confirm(&mut self, temp_id: Uuid, record: T) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|e| matches!(e, Entry::Pending { temp_id: id, .. } if *id == temp_id))
        else {
            return false;
        };

        let duplicate = record
            .record_id()
            .is_some_and(|id| self.saved().any(|r| r.record_id() == Some(id)));
        if duplicate {
            self.entries.remove(index);
        } else {
            self.entries[index] = Entry::Saved(record);
        }
        true
    }

    /// Drops a placeholder. Returns whether it was still present.
    pub fn discard(&mut self, temp_id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !matches!(e, Entry::Pending { temp_id: id, .. } if *id == temp_id));
        self.entries.len() != before
    }

    pub fn remove_saved(&mut self, id: T::Id) -> Option<T> {
        let index = self
            .entries
            .iter()
            .position(|e| e.saved().is_some_and(|r| r.record_id() == Some(id)))?;
        match self.entries.remove(index) {
            Entry::Saved(record) => Some(record),
            Entry::Pending { .. } => None,
        }
    }
}

/// Optimistically creates a record: a placeholder holding `draft` is shown
/// while `call` runs, then replaced by the server's record or removed.
pub async fn create<T, D, F>(store: &Store<OptimisticList<T, D>>, draft: D, call: F) -> ApiResult<T>
where
    T: Record + Clone,
    F: Future<Output = ApiResult<T>>,
{
    optimistic(
        store,
        |list| list.push_pending(draft),
        call,
        |list, temp_id, record| {
            list.confirm(temp_id, record.clone());
        },
        |list, temp_id| {
            list.discard(temp_id);
        },
    )
    .await
}

/// Deletes a record once the server confirms. The list is untouched on
/// failure.
pub async fn delete<T, D, F>(store: &Store<OptimisticList<T, D>>, id: T::Id, call: F) -> ApiResult<()>
where
    T: Record,
    F: Future<Output = ApiResult<()>>,
{
    call.await?;
    store.update(|list| list.remove_saved(id));
    Ok(())
}
