//! Fetch triggering
//!
//! Decides when a listing asks for more data: a restartable per-surface
//! debounce for search input, and a load boundary that fires when the
//! selection nears the end of what is loaded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::query::PeopleKind;
use crate::domain::EntityId;

/// Search debounce window in milliseconds
pub const DEBOUNCE_MS: u64 = 400;

/// Cool-down before the append latch releases, in milliseconds
pub const COOLDOWN_MS: u64 = 80;

/// Rows from the end of a loaded list at which the next page is requested
pub const LOAD_MARGIN: usize = 3;

/// Identifies one paginated surface for routing debounce and latch messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    Feed,
    ProfilePosts,
    Directory,
    Blacklist,
    People(PeopleKind, EntityId),
    Comments(EntityId),
}

/// Whether `selected` sits within [`LOAD_MARGIN`] rows of the end of a list
/// of `len` loaded rows.
pub fn near_end(selected: usize, len: usize) -> bool {
    len > 0 && selected + LOAD_MARGIN >= len.saturating_sub(1)
}

/// Per-surface generation counters for restartable debounce.
///
/// Every keystroke bumps the surface's generation and schedules a delayed
/// message carrying the bumped value. When the message fires, only the one
/// carrying the current generation issues a fetch; earlier timers are
/// silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Debouncer {
    generations: HashMap<Surface, u64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the debounce window, returning the generation the
    /// scheduled timer must carry.
    pub fn bump(&mut self, surface: Surface) -> u64 {
        let generation = self.generations.entry(surface).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Whether a fired timer's generation is still the latest one
    pub fn is_current(&self, surface: Surface, generation: u64) -> bool {
        self.generations.get(&surface) == Some(&generation)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 0, false)]
    #[case(0, 1, true)]
    #[case(0, 4, true)]
    #[case(0, 5, false)]
    #[case(4, 8, true)]
    #[case(3, 8, false)]
    #[case(19, 20, true)]
    fn test_near_end(#[case] selected: usize, #[case] len: usize, #[case] expected: bool) {
        assert_eq!(near_end(selected, len), expected);
    }

    #[test]
    fn test_bump_invalidates_previous_generation() {
        let mut debouncer = Debouncer::new();

        let first = debouncer.bump(Surface::Directory);
        let second = debouncer.bump(Surface::Directory);

        assert!(!debouncer.is_current(Surface::Directory, first));
        assert!(debouncer.is_current(Surface::Directory, second));
    }

    #[test]
    fn test_surfaces_are_independent() {
        let mut debouncer = Debouncer::new();

        let directory = debouncer.bump(Surface::Directory);
        let blacklist = debouncer.bump(Surface::Blacklist);

        assert!(debouncer.is_current(Surface::Directory, directory));
        assert!(debouncer.is_current(Surface::Blacklist, blacklist));

        debouncer.bump(Surface::Directory);
        assert!(!debouncer.is_current(Surface::Directory, directory));
        assert!(debouncer.is_current(Surface::Blacklist, blacklist));
    }

    #[test]
    fn test_unknown_surface_is_never_current() {
        let debouncer = Debouncer::new();
        assert!(!debouncer.is_current(Surface::Feed, 0));
        assert!(!debouncer.is_current(Surface::Feed, 1));
    }

    #[test]
    fn test_keyed_surfaces_carry_their_owner() {
        let mut debouncer = Debouncer::new();

        let followers_of_1 = debouncer.bump(Surface::People(PeopleKind::Followers, 1));
        let followers_of_2 = debouncer.bump(Surface::People(PeopleKind::Followers, 2));

        assert!(debouncer.is_current(Surface::People(PeopleKind::Followers, 1), followers_of_1));
        assert!(debouncer.is_current(Surface::People(PeopleKind::Followers, 2), followers_of_2));
    }
}
