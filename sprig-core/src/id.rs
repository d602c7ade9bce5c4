//! # IDs
//!
//! Stable handles for document entities that survive index shuffles. Frame
//! *indices* move when frames are inserted or removed, so anything that must
//! keep referring to the same layer or tag across structural edits holds a
//! `UniqueId<T>` instead. IDs are namespaced by a marker type: a `LayerId`
//! never compares equal to a `TagId` even if the raw values collide.
//!
//! IDs are unique within one execution of the program. Order is not
//! meaningful.

static NEXT_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

pub struct UniqueId<T: ?Sized> {
    id: std::num::NonZeroU64,
    // `fn() -> T` keeps the namespace without inheriting T's auto traits.
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: ?Sized> UniqueId<T> {
    /// Allocate a fresh ID, distinct from every other ID handed out so far.
    #[must_use]
    pub fn new() -> Self {
        let raw = NEXT_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        // Exhausting u64::MAX ids is not a reachable program state.
        let Some(id) = std::num::NonZeroU64::new(raw) else {
            std::process::abort();
        };
        Self {
            id,
            _marker: std::marker::PhantomData,
        }
    }
    /// The raw numeric value. IDs from different namespaces may share one.
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.id.get()
    }
}

impl<T: ?Sized> Default for UniqueId<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T: ?Sized> Clone for UniqueId<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: ?Sized> Copy for UniqueId<T> {}
impl<T: ?Sized> PartialEq for UniqueId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: ?Sized> Eq for UniqueId<T> {}
impl<T: ?Sized> std::hash::Hash for UniqueId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl<T: ?Sized> std::fmt::Debug for UniqueId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("?");
        write!(f, "{name}#{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::UniqueId;

    #[test]
    fn ids_are_unique() {
        struct Marker;
        let a = UniqueId::<Marker>::new();
        let b = UniqueId::<Marker>::new();
        assert_ne!(a, b);
        assert_ne!(a.raw(), b.raw());
    }
    #[test]
    fn copies_compare_equal() {
        struct Marker;
        let a = UniqueId::<Marker>::new();
        let b = a;
        assert_eq!(a, b);
    }
}
