//! Deck sampling: draw exercise cards of a requested category from
//! location-filtered, consumable pools. Sampling is without replacement —
//! the same card cannot appear twice in one session.

use rand::Rng;
use std::collections::BTreeMap;

use crate::catalog::{CardLibrary, Category, DeckCard, Location};
use crate::session::{Mission, Zone};

/// Per-category consumable pools for one generation pass.
#[derive(Debug, Clone)]
pub struct Deck {
    pools: BTreeMap<Category, Vec<DeckCard>>,
}

impl Deck {
    /// Build pools from the card library, filtered to the chosen location.
    #[must_use]
    pub fn build(library: &CardLibrary, location: Location) -> Self {
        let pools = Category::ALL
            .into_iter()
            .map(|category| (category, library.pool(category, location)))
            .collect();
        Self { pools }
    }

    #[must_use]
    pub fn remaining(&self, category: Category) -> usize {
        self.pools.get(&category).map_or(0, Vec::len)
    }

    /// Draw one card of `category` priced for `zone`, assigning `id`.
    ///
    /// An exhausted pool substitutes a fallback category chosen 50/50
    /// between core and cardio; if the substitute pool is also empty the
    /// draw yields nothing and the slot is omitted downstream.
    pub fn draw<R: Rng>(
        &mut self,
        category: Category,
        zone: Zone,
        id: u32,
        rng: &mut R,
    ) -> Option<Mission> {
        let mut category = category;
        if self.remaining(category) == 0 {
            category = if rng.gen_bool(0.5) {
                Category::Core
            } else {
                Category::Cardio
            };
        }

        let pool = self.pools.get_mut(&category)?;
        if pool.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..pool.len());
        let card = pool.remove(index);

        let (xp, gold) = zone.rewards();
        Some(Mission {
            id,
            title: card.title,
            lore: card.lore,
            action: card.action,
            meta: card.meta,
            xp,
            gold,
            zone,
            icon: card.icon,
        })
    }
}
