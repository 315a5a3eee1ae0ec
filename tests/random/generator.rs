//! Integration tests for generator records

use xqlib_foundation::{Item, Sequence};
use xqlib_stdlib::random::permute;
use xqlib_stdlib::{Context, GeneratorRecord, Library, LibraryConfig, RandomSource};

fn generate(library: &Library, ctx: &mut Context, seed: Sequence) -> Item {
    let record = library
        .call(ctx, "random-number-generator", &[seed])
        .unwrap();
    record.as_single().cloned().unwrap()
}

fn entry<'a>(record: &'a Item, key: &str) -> &'a Item {
    record
        .as_map()
        .and_then(|map| map.get_str(key))
        .and_then(Sequence::as_single)
        .unwrap()
}

fn letters() -> Sequence {
    Sequence::from(vec!["a", "b", "c", "d"])
}

// =============================================================================
// Reproducibility
// =============================================================================

#[test]
fn integral_double_seed_matches_integer_seed() {
    let library = Library::standard();
    let mut ctx = Context::default();

    let from_int = generate(&library, &mut ctx, Sequence::one(42));
    let from_double = generate(&library, &mut ctx, Sequence::one(42.0));
    assert_eq!(entry(&from_int, "number"), entry(&from_double, "number"));

    let a = library.invoke(&mut ctx, entry(&from_int, "permute"), &[letters()]).unwrap();
    let b = library.invoke(&mut ctx, entry(&from_double, "permute"), &[letters()]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn permute_is_usable_as_a_function_argument() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let record = generate(&library, &mut ctx, Sequence::one(5));
    let permute_fn = Sequence::one(entry(&record, "permute").clone());

    let result = library
        .call(&mut ctx, "for-each", &[letters(), permute_fn])
        .unwrap();
    assert_eq!(result, letters());
}

#[test]
fn same_seed_same_permutation() {
    let library = Library::standard();
    let mut ctx = Context::default();

    let first = generate(&library, &mut ctx, Sequence::one(42));
    let second = generate(&library, &mut ctx, Sequence::one(42));

    let a = library.invoke(&mut ctx, entry(&first, "permute"), &[letters()]).unwrap();
    let b = library.invoke(&mut ctx, entry(&second, "permute"), &[letters()]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 4);
}

#[test]
fn same_seed_across_contexts() {
    let library = Library::standard();
    let mut one = Context::default();
    let mut two = Context::new(LibraryConfig::strict()).unwrap();

    let a = generate(&library, &mut one, Sequence::one("seed"));
    let b = generate(&library, &mut two, Sequence::one("seed"));
    assert_eq!(entry(&a, "number"), entry(&b, "number"));
}

#[test]
fn different_seeds_diverge() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let numbers: Vec<f64> = (0..8)
        .map(|seed| {
            let record = generate(&library, &mut ctx, Sequence::one(seed));
            entry(&record, "number").as_double().unwrap()
        })
        .collect();
    let mut distinct = numbers.clone();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    assert_eq!(distinct.len(), numbers.len());
}

#[test]
fn numbers_are_in_unit_interval() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let mut record = generate(&library, &mut ctx, Sequence::one(7));
    for _ in 0..100 {
        let number = entry(&record, "number").as_double().unwrap();
        assert!((0.0..1.0).contains(&number));
        let next = library.invoke(&mut ctx, entry(&record, "next"), &[]).unwrap();
        record = next.as_single().cloned().unwrap();
    }
}

// =============================================================================
// Shared Source
// =============================================================================

#[test]
fn records_share_one_stream() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let record = generate(&library, &mut ctx, Sequence::one(5));
    let parsed = GeneratorRecord::from_item(&record).unwrap();
    assert_eq!(ctx.source(parsed.source).unwrap().draws(), 1);

    // Calling next twice on the same record gives two different records
    let a = library.invoke(&mut ctx, entry(&record, "next"), &[]).unwrap();
    let b = library.invoke(&mut ctx, entry(&record, "next"), &[]).unwrap();
    assert_ne!(a, b);
    assert_eq!(ctx.source(parsed.source).unwrap().draws(), 3);
    assert_eq!(ctx.source_count(), 1);
}

#[test]
fn empty_permute_draws_nothing() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let record = generate(&library, &mut ctx, Sequence::one(1));
    let parsed = GeneratorRecord::from_item(&record).unwrap();

    let result = library
        .invoke(&mut ctx, entry(&record, "permute"), &[Sequence::empty()])
        .unwrap();
    assert!(result.is_empty());
    assert_eq!(ctx.source(parsed.source).unwrap().draws(), 1);
}

#[test]
fn permute_matches_direct_fisher_yates() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let record = generate(&library, &mut ctx, Sequence::one(99));
    let through_library = library
        .invoke(&mut ctx, entry(&record, "permute"), &[letters()])
        .unwrap();

    let mut source = RandomSource::create(Some(99));
    source.next_double();
    let direct = permute(&mut source, &letters()).unwrap();
    assert_eq!(through_library, direct);
}

#[test]
fn released_source_makes_record_stale() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let record = generate(&library, &mut ctx, Sequence::one(3));
    let parsed = GeneratorRecord::from_item(&record).unwrap();

    ctx.release_source(parsed.source).unwrap();
    let err = library.invoke(&mut ctx, entry(&record, "next"), &[]).unwrap_err();
    assert_eq!(err.code(), "FOER0000");
}

#[test]
fn unseeded_generators_work() {
    let library = Library::standard();
    let mut ctx = Context::default();
    let record = library.call(&mut ctx, "random-number-generator", &[]).unwrap();
    let record = record.as_single().unwrap();
    let shuffled = library
        .invoke(&mut ctx, entry(record, "permute"), &[letters()])
        .unwrap();
    let mut sorted: Vec<String> = shuffled.iter().map(ToString::to_string).collect();
    sorted.sort();
    assert_eq!(sorted, vec!["a", "b", "c", "d"]);
}
