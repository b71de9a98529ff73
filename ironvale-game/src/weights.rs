//! Per-class category weighting for the random workout generator.
//!
//! The weight table is immutable configuration injected into the generator;
//! each row holds five integer weights summing to 100.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Category;
use crate::constants::WEIGHT_ROLL_SPAN;
use crate::hero::HeroClass;

/// One row of category weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub push: u32,
    pub pull: u32,
    pub squat: u32,
    pub core: u32,
    pub cardio: u32,
}

impl CategoryWeights {
    #[must_use]
    pub const fn new(push: u32, pull: u32, squat: u32, core: u32, cardio: u32) -> Self {
        Self {
            push,
            pull,
            squat,
            core,
            cardio,
        }
    }

    #[must_use]
    pub const fn get(&self, category: Category) -> u32 {
        match category {
            Category::Push => self.push,
            Category::Pull => self.pull,
            Category::Squat => self.squat,
            Category::Core => self.core,
            Category::Cardio => self.cardio,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.push + self.pull + self.squat + self.core + self.cardio
    }
}

const EVEN_ROW: CategoryWeights = CategoryWeights::new(20, 20, 20, 20, 20);

/// Class-keyed weight table. Classes missing from an injected table use the
/// default row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    pub rows: BTreeMap<HeroClass, CategoryWeights>,
    pub default_row: CategoryWeights,
}

impl Default for WeightTable {
    fn default() -> Self {
        let rows = BTreeMap::from([
            (HeroClass::Forca, CategoryWeights::new(35, 35, 20, 5, 5)),
            (
                HeroClass::Agilidade,
                CategoryWeights::new(10, 10, 30, 10, 40),
            ),
            (
                HeroClass::Destreza,
                CategoryWeights::new(15, 15, 15, 40, 15),
            ),
            (HeroClass::Vigor, CategoryWeights::new(25, 25, 25, 10, 15)),
            (HeroClass::Guardian, EVEN_ROW),
        ]);
        Self {
            rows,
            default_row: EVEN_ROW,
        }
    }
}

impl WeightTable {
    #[must_use]
    pub fn row(&self, class: HeroClass) -> &CategoryWeights {
        self.rows.get(&class).unwrap_or(&self.default_row)
    }

    /// Weighted category pick: draw a uniform value in [0, 100) and walk the
    /// row in declaration order, returning the first category whose
    /// cumulative weight meets the draw. Cardio absorbs any rounding gap.
    pub fn pick_category<R: Rng>(&self, class: HeroClass, rng: &mut R) -> Category {
        let row = self.row(class);
        let roll = rng.gen_range(0.0..WEIGHT_ROLL_SPAN);
        let mut sum = 0.0;
        for category in Category::WEIGHTED_ORDER {
            sum += f64::from(row.get(category));
            if roll <= sum {
                return category;
            }
        }
        Category::Cardio
    }
}
