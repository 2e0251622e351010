//! Integration scenarios against a 22-record seed dataset, mirroring a
//! reference client's filter/order/paging queries end to end.

use gridify::{
    apply_everything, apply_filtering, apply_ordering, gridify_queryable, FieldKind, FieldMapper,
    GridifyQuery, MapEntry, Mappable, QuerySource, VecQuery,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Person {
    id: i64,
    name: String,
    guid: Option<Uuid>,
}

impl Mappable for Person {
    fn generate_mappings() -> FieldMapper<Self> {
        let mut mapper = FieldMapper::new();
        mapper.add_map("id", MapEntry::new(FieldKind::Integer, |p: &Person| p.id));
        mapper.add_map(
            "name",
            MapEntry::new(FieldKind::Text, |p: &Person| p.name.clone()),
        );
        mapper.add_map(
            "guid",
            MapEntry::new(FieldKind::Uuid, |p: &Person| p.guid),
        );
        mapper
    }
}

fn seed() -> Vec<Person> {
    let names = [
        "John", "Jack", "Rose", "Jack", "Anne", "Sam", "Steve", "Jane", "Jack", "Rose", "Bob",
        "John", "Jill", "Jim", "Jasmine", "Sara", "Joy", "Jerry", "Rick", "Morty", "Beth",
        "Summer",
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Person {
            id: i as i64,
            name: name.to_string(),
            guid: if i == 0 {
                Some(Uuid::parse_str("e2cec5dd-208d-4bb5-a852-0242ac130003").unwrap())
            } else {
                None
            },
        })
        .collect()
}

fn gq(filter: &str) -> GridifyQuery {
    GridifyQuery {
        filter: Some(filter.to_string()),
        ..GridifyQuery::default()
    }
}

#[test]
fn s1_single_equality_match() {
    let gq = gq("name==John");
    let result =
        apply_filtering::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&gq), None)
            .unwrap();
    let names: Vec<_> = result.to_vec().iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["John".to_string(), "John".to_string()]);
}

#[test]
fn s2_or_union_semantics() {
    let gq = gq("name==Jack|name==Rose|id>>7");
    let result =
        apply_filtering::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&gq), None)
            .unwrap();
    let matched = result.to_vec();
    assert!(matched.iter().all(|p| p.name == "Jack" || p.name == "Rose" || p.id > 7));
    assert!(matched.iter().any(|p| p.id > 7 && p.name != "Jack" && p.name != "Rose"));
}

#[test]
fn s3_grouped_or_and_and() {
    let gq = gq("(name=*J|name=*S),(id<<5)");
    let result =
        apply_filtering::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&gq), None)
            .unwrap();
    for p in result.to_vec() {
        assert!(p.id < 5);
        let lower = p.name.to_lowercase();
        assert!(lower.contains('j') || lower.contains('s'));
    }
}

#[test]
fn s4_malformed_uuid_collapses_to_empty_and_full() {
    let eq_gq = gq("guid==e2cec5dd-208d-4bb5-a852-");
    let eq_result =
        apply_filtering::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&eq_gq), None)
            .unwrap();
    assert_eq!(eq_result.count(), 0);

    let neq_gq = gq("guid!=e2cec5dd-208d-4bb5-a852-");
    let neq_result = apply_filtering::<Person, _, FieldMapper<Person>>(
        VecQuery::new(seed()),
        Some(&neq_gq),
        None,
    )
    .unwrap();
    assert_eq!(neq_result.count(), seed().len());
}

#[test]
fn s5_descending_name_order() {
    let gq = GridifyQuery {
        sort_by: Some("name".to_string()),
        is_sort_asc: false,
        ..GridifyQuery::default()
    };
    let result =
        apply_ordering::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&gq), None)
            .unwrap();
    let names: Vec<_> = result.to_vec().iter().map(|p| p.name.to_lowercase()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    sorted.reverse();
    assert_eq!(names, sorted);
}

#[test]
fn s6_page_two_size_five_source_order() {
    let gq = GridifyQuery {
        page: 2,
        page_size: 5,
        ..GridifyQuery::default()
    };
    let (windowed, total) =
        gridify_queryable::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&gq), None)
            .unwrap();
    assert_eq!(total, 22);
    let ids: Vec<_> = windowed.to_vec().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![5, 6, 7, 8, 9]);
}

#[test]
fn identity_on_absent_gridify_query() {
    let baseline = VecQuery::new(seed());
    let result = apply_filtering::<Person, _, FieldMapper<Person>>(baseline, None, None).unwrap();
    assert_eq!(result.count(), seed().len());
}

#[test]
fn identity_on_empty_filter_string() {
    let gq = gq("");
    let result =
        apply_filtering::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&gq), None)
            .unwrap();
    assert_eq!(result.count(), seed().len());
}

#[test]
fn boolean_laws_double_parens_is_identity() {
    let plain = gq("id>>3");
    let parenthesised = gq("((id>>3))");

    let plain_result =
        apply_filtering::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&plain), None)
            .unwrap();
    let paren_result = apply_filtering::<Person, _, FieldMapper<Person>>(
        VecQuery::new(seed()),
        Some(&parenthesised),
        None,
    )
    .unwrap();

    let plain_ids: Vec<_> = plain_result.to_vec().iter().map(|p| p.id).collect();
    let paren_ids: Vec<_> = paren_result.to_vec().iter().map(|p| p.id).collect();
    assert_eq!(plain_ids, paren_ids);
}

#[test]
fn apply_everything_composes_filter_order_and_page() {
    let gq = GridifyQuery {
        page: 1,
        page_size: 3,
        sort_by: Some("id".to_string()),
        is_sort_asc: false,
        filter: Some("id<<10".to_string()),
    };
    let result =
        apply_everything::<Person, _, FieldMapper<Person>>(VecQuery::new(seed()), Some(&gq), None)
            .unwrap();
    let ids: Vec<_> = result.to_vec().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![9, 8, 7]);
}
