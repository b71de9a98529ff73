//! Shape checks over the embedded catalog assets: everything must parse and
//! satisfy the invariants the generator and progression engine lean on.

use ironvale_game::{
    Archetype, CardLibrary, Category, ExerciseLibrary, ItemCatalog, ItemKind, Location,
    QuestCatalog, RiteCatalog, TemplateSet,
};
use std::collections::HashSet;

#[test]
fn every_category_has_cards_at_every_concrete_location() {
    let library = CardLibrary::builtin();
    for category in Category::ALL {
        for location in [Location::Home, Location::Gym, Location::Park, Location::Any] {
            let pool = library.pool(category, location);
            assert!(
                !pool.is_empty(),
                "no {category} cards available at {location}"
            );
        }
    }
}

#[test]
fn card_titles_are_unique_within_a_category() {
    let library = CardLibrary::builtin();
    for category in Category::ALL {
        let pool = library.pool(category, Location::Any);
        let titles: HashSet<_> = pool.iter().map(|card| card.title.as_str()).collect();
        assert_eq!(titles.len(), pool.len(), "duplicate titles in {category}");
    }
}

#[test]
fn exercise_ids_are_unique_and_fields_nonempty() {
    let library = ExerciseLibrary::builtin();
    assert!(library.exercises.len() >= 20);

    let mut ids = HashSet::new();
    for exercise in &library.exercises {
        assert!(ids.insert(exercise.id.as_str()), "duplicate id {}", exercise.id);
        assert!(!exercise.name.is_empty());
        assert!(!exercise.rpg_title.is_empty());
        assert!(!exercise.rpg_lore.is_empty());
        assert!(!exercise.locations.is_empty(), "{} lists no venue", exercise.id);
        assert!(
            !exercise.locations.contains(&Location::Any),
            "{} must list concrete venues only",
            exercise.id
        );
    }
}

#[test]
fn templates_cover_every_archetype() {
    let templates = TemplateSet::builtin();
    for archetype in [
        Archetype::HeavyLift,
        Archetype::FastCardio,
        Archetype::BalanceCore,
        Archetype::HighReps,
        Archetype::Stretching,
    ] {
        let template = templates
            .get(archetype)
            .unwrap_or_else(|| panic!("no template for {archetype}"));
        assert!(!template.titles.is_empty());
        assert!(!template.lore.is_empty());
    }
}

#[test]
fn item_catalog_carries_the_progression_items() {
    let catalog = ItemCatalog::builtin();

    for id in ["medal_discipline", "sword_demon"] {
        let item = catalog.get(id).unwrap_or_else(|| panic!("missing {id}"));
        assert!(item.price.is_none(), "{id} is drop-only");
        assert!(item.bonuses.is_some());
    }

    for item in &catalog.items {
        if item.kind == ItemKind::Consumable {
            assert!(
                item.use_xp.is_some(),
                "consumable {} grants nothing on use",
                item.id
            );
        } else {
            assert!(item.kind.slot().is_some());
        }
    }
}

#[test]
fn quest_and_rite_catalogs_parse() {
    let quests = QuestCatalog::builtin();
    assert_eq!(quests.quests.len(), 4);
    for quest in &quests.quests {
        assert!(quest.xp > 0);
        assert!(quest.gold > 0);
        assert!(quest.gold_cooldown_days > 0);
    }

    let rites = RiteCatalog::builtin();
    assert_eq!(rites.rites.len(), 3);
    for rite in &rites.rites {
        assert!(rite.xp > 0);
        assert!(rite.minutes > 0);
    }
}
