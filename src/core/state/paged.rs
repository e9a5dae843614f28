use serde::{Deserialize, Serialize};

use crate::domain::query::Page;
use crate::domain::{Entity, EntityId};

/// State of one paginated listing.
///
/// The slot is generic over the entity and over the query snapshot `Q`
/// (ordering, filter text, owning scope). Offsets never live in `Q`; they
/// are derived from what is already loaded. A fetch carries the snapshot it
/// was issued under and its response is merged only while [`matches`]
/// still holds, so late responses for an abandoned query are dropped.
///
/// [`matches`]: PagedSlot::matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedSlot<T, Q> {
    items: Vec<T>,
    total_count: u32,
    next_offset: u32,
    has_more: bool,
    loading: bool,
    loading_more: bool,
    in_flight: bool,
    query: Option<Q>,
}

impl<T, Q> Default for PagedSlot<T, Q> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            next_offset: 0,
            has_more: false,
            loading: false,
            loading_more: false,
            in_flight: false,
            query: None,
        }
    }
}

impl<T, Q> PagedSlot<T, Q>
where
    T: Entity + Clone,
    Q: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn query(&self) -> Option<&Q> {
        self.query.as_ref()
    }

    /// Stale-response guard. Responses are merged only while the query they
    /// were issued under is still the slot's current one.
    pub fn matches(&self, query: &Q) -> bool {
        self.query.as_ref() == Some(query)
    }

    /// Begin a fresh fetch at offset 0: drops loaded items and remembers
    /// the new query snapshot.
    pub fn reset(&mut self, query: Q) {
        self.items.clear();
        self.total_count = 0;
        self.next_offset = 0;
        self.has_more = false;
        self.loading = true;
        self.loading_more = false;
        self.query = Some(query);
    }

    /// Begin an append fetch at `next_offset`. Arms the single-flight latch;
    /// it stays armed until [`release_latch`] runs, which happens on a
    /// delayed message rather than on response arrival.
    ///
    /// [`release_latch`]: PagedSlot::release_latch
    pub fn start_append(&mut self) {
        self.loading_more = true;
        self.in_flight = true;
    }

    /// Whether an append may start: more pages exist and nothing is loading
    /// or latched.
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading && !self.loading_more && !self.in_flight
    }

    pub fn release_latch(&mut self) {
        self.in_flight = false;
    }

    /// Merge one page. Offset 0 replaces the items wholesale; any other
    /// offset appends, skipping ids already present. `has_more` derives
    /// from the raw batch length, not the kept items, so duplicates still
    /// count as progress toward `total_count` and an empty batch always
    /// closes the listing.
    pub fn apply_page(&mut self, page: Page<T>) {
        let batch_len = page.items.len() as u32;

        if page.offset == 0 {
            self.items = page.items;
        } else {
            let seen: std::collections::HashSet<EntityId> =
                self.items.iter().map(Entity::entity_id).collect();
            self.items
                .extend(page.items.into_iter().filter(|item| !seen.contains(&item.entity_id())));
        }

        self.total_count = page.total_count;
        self.next_offset = page.offset + page.limit;
        self.has_more = (page.offset + batch_len) < page.total_count && batch_len > 0;
        self.loading = false;
        self.loading_more = false;
    }

    /// A failed fetch clears the loading flag for its offset class and
    /// nothing else: an append failure keeps every loaded item.
    pub fn apply_failure(&mut self, offset: u32) {
        if offset == 0 {
            self.loading = false;
        } else {
            self.loading_more = false;
        }
    }

    /// Insert at the head unless the id is already present
    pub fn prepend(&mut self, item: T) {
        if self.contains(item.entity_id()) {
            return;
        }
        self.items.insert(0, item);
        self.total_count += 1;
    }

    /// Insert at the tail unless the id is already present
    pub fn append(&mut self, item: T) {
        if self.contains(item.entity_id()) {
            return;
        }
        self.items.push(item);
        self.total_count += 1;
    }

    /// Remove by id. Idempotent; the count only drops when something was
    /// actually removed.
    pub fn remove(&mut self, id: EntityId) {
        let before = self.items.len();
        self.items.retain(|item| item.entity_id() != id);
        if self.items.len() < before {
            self.total_count = self.total_count.saturating_sub(1);
        }
    }

    /// Replace in place by id without reordering
    pub fn replace(&mut self, item: T) {
        if let Some(slot) = self
            .items
            .iter_mut()
            .find(|existing| existing.entity_id() == item.entity_id())
        {
            *slot = item;
        }
    }

    /// Patch one loaded item in place
    pub fn patch(&mut self, id: EntityId, f: impl FnOnce(&mut T)) {
        if let Some(item) = self.items.iter_mut().find(|item| item.entity_id() == id) {
            f(item);
        }
    }

    /// Patch every loaded item in place
    pub fn patch_all(&mut self, mut f: impl FnMut(&mut T)) {
        for item in &mut self.items {
            f(item);
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.iter().any(|item| item.entity_id() == id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: EntityId,
        label: String,
    }

    impl Entity for Item {
        fn entity_id(&self) -> EntityId {
            self.id
        }
    }

    fn item(id: EntityId) -> Item {
        Item {
            id,
            label: format!("item-{id}"),
        }
    }

    fn items(ids: &[EntityId]) -> Vec<Item> {
        ids.iter().copied().map(item).collect()
    }

    fn page(ids: &[EntityId], total_count: u32, offset: u32, limit: u32) -> Page<Item> {
        Page {
            items: items(ids),
            total_count,
            offset,
            limit,
        }
    }

    type Slot = PagedSlot<Item, String>;

    #[test]
    fn test_reset_clears_items_and_stores_query() {
        let mut slot = Slot::new();
        slot.apply_page(page(&[1, 2], 10, 0, 2));
        slot.reset("b".to_string());

        assert!(slot.is_empty());
        assert_eq!(slot.total_count(), 0);
        assert_eq!(slot.next_offset(), 0);
        assert!(!slot.has_more());
        assert!(slot.is_loading());
        assert!(!slot.is_loading_more());
        assert!(slot.matches(&"b".to_string()));
        assert!(!slot.matches(&"a".to_string()));
    }

    #[test]
    fn test_apply_page_at_offset_zero_replaces() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[9, 8], 5, 0, 2));

        slot.reset("q".to_string());
        slot.apply_page(page(&[1, 2], 5, 0, 2));

        assert_eq!(slot.items(), items(&[1, 2]).as_slice());
        assert_eq!(slot.total_count(), 5);
        assert_eq!(slot.next_offset(), 2);
        assert!(slot.has_more());
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_apply_page_appends_and_deduplicates() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[1, 2, 3], 10, 0, 3));

        slot.start_append();
        slot.apply_page(page(&[3, 4, 5], 10, 3, 3));

        // the duplicate is dropped from the items but still advances the
        // listing: 6 of 10 rows are accounted for
        assert_eq!(slot.items(), items(&[1, 2, 3, 4, 5]).as_slice());
        assert!(slot.has_more());
        assert_eq!(slot.next_offset(), 6);
        assert!(!slot.is_loading_more());
    }

    #[rstest]
    // full batch, more remaining
    #[case(&[4, 5, 6], 10, 3, 3, true)]
    // exact tail
    #[case(&[4, 5, 6], 6, 3, 3, false)]
    // short tail, still short of the total
    #[case(&[4], 10, 3, 3, true)]
    // short tail reaching the total
    #[case(&[4], 4, 3, 3, false)]
    // empty batch never reports more
    #[case(&[], 10, 3, 3, false)]
    fn test_has_more_derivation(
        #[case] batch: &[EntityId],
        #[case] total_count: u32,
        #[case] offset: u32,
        #[case] limit: u32,
        #[case] expected: bool,
    ) {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[1, 2, 3], total_count, 0, 3));
        slot.start_append();
        slot.apply_page(page(batch, total_count, offset, limit));

        assert_eq!(slot.has_more(), expected);
    }

    #[test]
    fn test_append_failure_keeps_items() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[1, 2, 3], 6, 0, 3));
        slot.start_append();

        slot.apply_failure(3);

        assert_eq!(slot.items(), items(&[1, 2, 3]).as_slice());
        assert!(!slot.is_loading_more());
        assert!(slot.has_more());
    }

    #[test]
    fn test_initial_failure_clears_loading_only() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());

        slot.apply_failure(0);

        assert!(!slot.is_loading());
        assert!(slot.is_empty());
    }

    #[test]
    fn test_latch_blocks_until_released() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[1, 2, 3], 9, 0, 3));
        assert!(slot.can_load_more());

        slot.start_append();
        assert!(!slot.can_load_more());

        // response lands but the latch is still armed
        slot.apply_page(page(&[4, 5, 6], 9, 3, 3));
        assert!(!slot.can_load_more());

        slot.release_latch();
        assert!(slot.can_load_more());
    }

    #[test]
    fn test_loading_flags_are_exclusive_per_request() {
        let mut slot = Slot::new();

        slot.reset("q".to_string());
        assert!(slot.is_loading());
        assert!(!slot.is_loading_more());

        slot.apply_page(page(&[1], 5, 0, 1));
        slot.start_append();
        assert!(!slot.is_loading());
        assert!(slot.is_loading_more());
    }

    #[test]
    fn test_prepend_is_idempotent() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[2, 3], 2, 0, 2));

        slot.prepend(item(1));
        slot.prepend(item(1));

        assert_eq!(slot.items(), items(&[1, 2, 3]).as_slice());
        assert_eq!(slot.total_count(), 3);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[1, 2, 3], 3, 0, 3));

        slot.remove(2);
        slot.remove(2);

        assert_eq!(slot.items(), items(&[1, 3]).as_slice());
        assert_eq!(slot.total_count(), 2);
    }

    #[test]
    fn test_remove_missing_keeps_count() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[1], 1, 0, 1));

        slot.remove(99);

        assert_eq!(slot.total_count(), 1);
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[1, 2, 3], 3, 0, 3));

        slot.replace(Item {
            id: 2,
            label: "edited".to_string(),
        });

        assert_eq!(slot.items()[1].label, "edited");
        assert_eq!(slot.items()[0].id, 1);
        assert_eq!(slot.items()[2].id, 3);
    }

    #[test]
    fn test_patch_targets_one_item() {
        let mut slot = Slot::new();
        slot.reset("q".to_string());
        slot.apply_page(page(&[1, 2], 2, 0, 2));

        slot.patch(2, |item| item.label = "patched".to_string());

        assert_eq!(slot.items()[0].label, "item-1");
        assert_eq!(slot.items()[1].label, "patched");
    }

    #[test]
    fn test_three_page_walk() {
        // 20 items fetched 8/8/4
        let mut slot = Slot::new();
        slot.reset("q".to_string());

        slot.apply_page(page(&[1, 2, 3, 4, 5, 6, 7, 8], 20, 0, 8));
        assert_eq!(slot.len(), 8);
        assert!(slot.has_more());
        assert_eq!(slot.next_offset(), 8);

        slot.start_append();
        slot.apply_page(page(&[9, 10, 11, 12, 13, 14, 15, 16], 20, 8, 8));
        slot.release_latch();
        assert_eq!(slot.len(), 16);
        assert!(slot.has_more());
        assert_eq!(slot.next_offset(), 16);

        slot.start_append();
        slot.apply_page(page(&[17, 18, 19, 20], 20, 16, 8));
        slot.release_latch();
        assert_eq!(slot.len(), 20);
        assert!(!slot.has_more());
        assert!(!slot.can_load_more());
    }
}
