use ironstream::collectors::*;
use ironstream::testing::*;
use ironstream::*;
use std::collections::{HashMap, HashSet};

#[test]
fn grouping_keeps_insertion_order_within_groups() -> anyhow::Result<()> {
    let data: Vec<(i32, String)> = vec![(1, "a".into()), (2, "b".into()), (1, "c".into())];
    let g = from_vec(data)
        .collect(grouping_by_with(|e: &(i32, String)| e.0, mapping(|e: (i32, String)| e.1, to_list())))?;
    let expected: HashMap<i32, Vec<String>> =
        [(1, vec!["a".to_string(), "c".to_string()]), (2, vec!["b".to_string()])].into_iter().collect();
    assert_maps_equal(&g, &expected);
    Ok(())
}

#[test]
fn grouping_people_by_age_with_counting() -> anyhow::Result<()> {
    let by_age = from_vec(people()).collect(grouping_by_with(|p: &Person| p.age, counting()))?;
    let expected: HashMap<u32, u64> = [(30, 1), (41, 2), (12, 1)].into_iter().collect();
    assert_maps_equal(&by_age, &expected);
    Ok(())
}

#[test]
fn nested_grouping() -> anyhow::Result<()> {
    let nested = from_vec(people()).collect(grouping_by_with(
        |p: &Person| p.age > 18,
        grouping_by_with(|p: &Person| p.name.clone(), counting()),
    ))?;
    assert_eq!(nested[&true]["xiaohong"], 2);
    assert_eq!(nested[&true]["xiaoming"], 1);
    assert_eq!(nested[&false]["xiaokang"], 1);
    Ok(())
}

#[test]
fn partitioning_always_has_both_keys() -> anyhow::Result<()> {
    let parts = from_vec(vec![1, 2, 3]).collect(partitioning_by(|age: &i32| *age > 2))?;
    assert_eq!(parts[&true], vec![3]);
    assert_eq!(parts[&false], vec![1, 2]);

    let none_match = from_vec(vec![1, 2]).collect(partitioning_by_with(|x: &i32| *x > 10, counting()))?;
    assert_eq!(none_match.len(), 2);
    assert_eq!(none_match[&true], 0);
    assert_eq!(none_match[&false], 2);
    Ok(())
}

#[test]
fn to_map_rejects_duplicate_keys() {
    let res = from_vec(vec![(1, 10), (1, 20)]).collect(to_map(|p: &(i32, i32)| p.0, |p: (i32, i32)| p.1));
    assert_stream_error(&res, |k| matches!(k, StreamError::DuplicateKey { key } if key == "1"));
}

#[test]
fn to_map_by_name() -> anyhow::Result<()> {
    let ages = from_vec(people())
        .filter(|p| p.age < 41)
        .collect(to_map(|p: &Person| p.name.clone(), |p: Person| p.age))?;
    assert_eq!(ages["xiaohong"], 30);
    assert_eq!(ages["xiaokang"], 12);
    Ok(())
}

#[test]
fn joining_variants() -> anyhow::Result<()> {
    let names = || from_vec(people()).map(|p| p.name).distinct();
    assert_eq!(names().collect(joining(",", "(", ")"))?, "(xiaohong,xiaoming,xiaokang)");
    assert_eq!(names().collect(joining_with("/"))?, "xiaohong/xiaoming/xiaokang");
    assert_eq!(empty::<String>().collect(joining(",", "[", "]"))?, "[]");
    Ok(())
}

#[test]
fn to_set_and_numeric_collectors() -> anyhow::Result<()> {
    let ages: HashSet<u32> = from_vec(people()).map(|p| p.age).collect(to_set())?;
    assert_eq!(ages, [12, 30, 41].into_iter().collect());

    assert_eq!(from_vec(people()).collect(summing(|p: &Person| p.age))?, 124);
    assert_eq!(from_vec(people()).collect(averaging(|p: &Person| p.age))?, 31.0);
    assert_eq!(empty::<Person>().collect(averaging(|p: &Person| p.age))?, 0.0);
    Ok(())
}

#[test]
fn min_max_reducing_collectors() -> anyhow::Result<()> {
    let oldest = from_vec(people()).collect(max_by(|a: &Person, b: &Person| a.age.cmp(&b.age)))?;
    assert_eq!(oldest.map(|p| p.name), Some("xiaoming".to_string()));
    let youngest = from_vec(people()).collect(min_by(|a: &Person, b: &Person| a.age.cmp(&b.age)))?;
    assert_eq!(youngest.map(|p| p.age), Some(12));

    assert_eq!(from_vec(vec![1, 2, 3]).collect(reducing(|a: i32, b: i32| a.max(b)))?, Some(3));
    assert_eq!(empty::<i32>().collect(reducing(|a: i32, b: i32| a + b))?, None);
    assert_eq!(from_vec(vec![2, 3]).collect(reducing_from(1, |a: i32, b: i32| a * b))?, 6);
    Ok(())
}

#[test]
fn custom_collector_from_closures() -> anyhow::Result<()> {
    let longest_name = from_vec(people()).collect(from_fns(
        String::new,
        |acc: &mut String, p: Person| {
            if p.name.len() > acc.len() {
                *acc = p.name;
            }
        },
        |acc: &mut String, other: String| {
            if other.len() > acc.len() {
                *acc = other;
            }
        },
        |acc| acc,
    ))?;
    assert_eq!(longest_name, "xiaohong");
    Ok(())
}

#[test]
fn collectors_are_reusable_across_evaluations() -> anyhow::Result<()> {
    let c = grouping_by(|x: &u8| x % 2);
    let a = from_vec(vec![1u8, 2, 3]).collect(&c)?;
    let b = from_vec(vec![4u8]).collect(&c)?;
    assert_eq!(a[&1], vec![1, 3]);
    assert_eq!(b[&0], vec![4]);
    Ok(())
}
