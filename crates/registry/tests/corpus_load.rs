use corpus_model::{Chunk, Classification, Hlo, Unit, UnitIdFactory};
use corpus_registry::{HloKey, RegistryError, UnitRegistry};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn factory() -> UnitIdFactory {
    UnitIdFactory::new("ys").expect("namespace")
}

fn unit_i41(f: &UnitIdFactory) -> Unit {
    Unit::new(f.make("I.41").unwrap(), "lucidity", "Transparency of the settled mind")
        .classification(Classification::default().scope("samapatti").lens("logic"))
        .chunk(Chunk::new(
            "c1",
            "The jewel",
            "Like a transparent jewel, the mind takes the color of what it rests on.",
        ))
        .chunk(Chunk::new(
            "c2",
            "Grasper and grasped",
            "Grasper, grasping, and grasped stand in one field.",
        ))
        .hlo(
            Hlo::new("h1", "c1", "Coalescence")
                .clause("tag('sutra','I.41')")
                .clause("coalescence := unity(grasper, grasping, grasped)"),
        )
        .symbol("coalescence", "Samapatti as the jewel-like taking-on of form")
}

fn unit_i45_lecture1(f: &UnitIdFactory) -> Unit {
    Unit::new(f.make("I.45.L1").unwrap(), "lecture1", "Subtlety, first lecture")
        .chunk(Chunk::new("c1", "The unmarked", "Subtlety terminates in the unmarked."))
        .hlo(Hlo::new("h1", "c1", "Terminus").clause("tag('sutra','I.45')"))
        .symbol("alinga", "The unmarked terminus of the subtle")
}

fn unit_i45_lecture2(f: &UnitIdFactory) -> Unit {
    Unit::new(f.make("I.45.L2").unwrap(), "lecture2", "Subtlety, second lecture")
        .chunk(Chunk::new("c1", "Looking back", "The second pass rereads the terminus."))
        .hlo(
            Hlo::new("h1", "c1", "Recapitulation")
                .clause("tag('sutra','I.45')")
                .clause("terminus := lecture1.alinga seen again"),
        )
}

#[test]
fn register_then_query_by_tag() {
    let f = factory();
    let mut registry = UnitRegistry::new();
    registry.register(unit_i41(&f)).unwrap();

    let id = f.make("I.41").unwrap();
    let unit = registry.get(&id).unwrap();
    assert_eq!(unit.title, "Transparency of the settled mind");

    let hits = registry.by_tag("sutra", Some("I.41"));
    assert_eq!(hits.len(), 1);
    assert!(hits.contains(&HloKey::new(id, "h1")));
    assert!(registry.by_tag("sutra", Some("I.42")).is_empty());
}

#[test]
fn duplicate_unit_id_keeps_first_registration() {
    let f = factory();
    let mut registry = UnitRegistry::new();
    registry.register(unit_i41(&f)).unwrap();

    let mut second = unit_i41(&f);
    second.alias = "lucidity2".to_string();
    second.title = "An impostor".to_string();

    match registry.register(second).unwrap_err() {
        RegistryError::DuplicateUnitId(id) => assert_eq!(id.as_str(), "ys:i.41"),
        other => panic!("expected DuplicateUnitId, got {other:?}"),
    }

    assert_eq!(registry.all().count(), 1);
    let kept = registry.get(&f.make("I.41").unwrap()).unwrap();
    assert_eq!(kept.title, "Transparency of the settled mind");
}

#[test]
fn deferred_reference_resolves_when_target_registers() {
    let f = factory();
    let mut registry = UnitRegistry::new();

    // Lecture 2 cites lecture 1, but registers first.
    registry.register(unit_i45_lecture2(&f)).unwrap();
    assert_eq!(registry.pending_references().len(), 1);
    assert_eq!(registry.pending_references()[0].alias, "lecture1");
    assert_eq!(registry.pending_references()[0].symbol, "alinga");

    registry.register(unit_i45_lecture1(&f)).unwrap();
    assert!(registry.pending_references().is_empty());

    let stats = registry.complete_load().unwrap();
    assert_eq!(stats.units, 2);
    assert_eq!(stats.pending_references, 0);

    let l2 = f.make("I.45.L2").unwrap();
    let l1 = f.make("I.45.L1").unwrap();
    let graph = registry.reference_graph();
    assert_eq!(graph.cites(&l2), vec![&l1]);
    assert_eq!(graph.cited_by(&l1), vec![&l2]);
    let edge = graph.citation(&l2, &l1).unwrap();
    assert!(edge.symbols.contains("alinga"));
}

#[test]
fn unresolved_reference_reported_in_aggregate_at_load_completion() {
    let f = factory();
    let mut registry = UnitRegistry::new();

    let unit = unit_i41(&f).hlo(
        Hlo::new("h2", "c2", "Broken links")
            .clause("first := ghost.summit")
            .clause("second := ghost.abyss"),
    );
    registry.register(unit).unwrap();

    // Deferred while loading, hard once the load is declared complete.
    assert_eq!(registry.pending_references().len(), 2);
    let err = registry.complete_load().unwrap_err();
    match &err {
        RegistryError::UnresolvedSymbols(pending) => {
            assert_eq!(pending.len(), 2);
            assert_eq!(pending[0].unit.as_str(), "ys:i.41");
            assert_eq!(pending[0].hlo, "h2");
            assert_eq!(pending[0].alias, "ghost");
        }
        other => panic!("expected UnresolvedSymbols, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("ghost.summit"), "message: {message}");
    assert!(message.contains("ghost.abyss"), "message: {message}");
    assert!(message.contains("ys:i.41#h2"), "message: {message}");
}

#[test]
fn resolve_symbol_by_qualified_name() {
    let f = factory();
    let mut registry = UnitRegistry::new();
    registry.register(unit_i41(&f)).unwrap();

    let text = registry.resolve_symbol("lucidity", "coalescence").unwrap();
    assert_eq!(text, "Samapatti as the jewel-like taking-on of form");

    assert!(matches!(
        registry.resolve_symbol("lucidity", "nonesuch").unwrap_err(),
        RegistryError::UnresolvedSymbol { .. }
    ));
    assert!(matches!(
        registry.resolve_symbol("unknown", "coalescence").unwrap_err(),
        RegistryError::UnresolvedSymbol { .. }
    ));
}

#[test]
fn iteration_follows_registration_order() {
    let f = factory();
    let mut registry = UnitRegistry::new();
    registry.register(unit_i45_lecture2(&f)).unwrap();
    registry.register(unit_i41(&f)).unwrap();
    registry.register(unit_i45_lecture1(&f)).unwrap();

    let order: Vec<_> = registry.all().map(|u| u.id.as_str().to_string()).collect();
    assert_eq!(order, vec!["ys:i.45.l2", "ys:i.41", "ys:i.45.l1"]);

    // Restartable: a second pass sees the same sequence.
    let again: Vec<_> = registry.all().map(|u| u.id.as_str().to_string()).collect();
    assert_eq!(order, again);
}

#[test]
fn dangling_chunk_reference_blocks_admission_entirely() {
    let f = factory();
    let mut registry = UnitRegistry::new();

    let unit = unit_i41(&f).hlo(Hlo::new("h9", "c99", "Orphan"));
    match registry.register(unit).unwrap_err() {
        RegistryError::DanglingChunkReference { hlo, chunk, .. } => {
            assert_eq!(hlo, "h9");
            assert_eq!(chunk, "c99");
        }
        other => panic!("expected DanglingChunkReference, got {other:?}"),
    }

    // All-or-nothing: nothing of the unit is visible.
    assert_eq!(registry.all().count(), 0);
    assert!(registry.by_tag("sutra", Some("I.41")).is_empty());
    assert!(registry.get(&f.make("I.41").unwrap()).is_err());
}

#[test]
fn every_registered_hlo_chunk_link_resolves() {
    let f = factory();
    let mut registry = UnitRegistry::new();
    registry.register(unit_i41(&f)).unwrap();
    registry.register(unit_i45_lecture1(&f)).unwrap();
    registry.register(unit_i45_lecture2(&f)).unwrap();

    for unit in registry.all() {
        for hlo in &unit.hlos {
            assert!(
                unit.chunk_by_id(&hlo.chunk_id).is_some(),
                "HLO {} in {} has no chunk {}",
                hlo.id,
                unit.id,
                hlo.chunk_id
            );
        }
    }
}

#[test]
fn by_tag_without_value_unions_across_units() {
    let f = factory();
    let mut registry = UnitRegistry::new();
    registry.register(unit_i41(&f)).unwrap();
    registry.register(unit_i45_lecture1(&f)).unwrap();
    registry.register(unit_i45_lecture2(&f)).unwrap();

    let all_sutra = registry.by_tag("sutra", None);
    assert_eq!(all_sutra.len(), 3);
    assert_eq!(registry.by_tag("sutra", Some("I.45")).len(), 2);
    assert_eq!(registry.tag_keys(), BTreeSet::from(["sutra"]));
}
