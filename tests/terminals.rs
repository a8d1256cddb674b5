use ironstream::testing::*;
use ironstream::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn matching_short_circuits() -> anyhow::Result<()> {
    let pulled = Arc::new(AtomicUsize::new(0));
    let p = Arc::clone(&pulled);
    let found = from_vec((0..100).collect::<Vec<u32>>())
        .peek(move |_| {
            p.fetch_add(1, Ordering::SeqCst);
        })
        .any_match(|x| *x == 3)?;
    assert!(found);
    assert_eq!(pulled.load(Ordering::SeqCst), 4);
    Ok(())
}

#[test]
fn all_and_none_match_on_people() -> anyhow::Result<()> {
    assert!(from_vec(people()).all_match(|p| p.name.starts_with("xiao"))?);
    assert!(!from_vec(people()).all_match(|p| p.age > 18)?);
    assert!(from_vec(people()).none_match(|p| p.age > 100)?);
    Ok(())
}

#[test]
fn matching_on_infinite_source_terminates() -> anyhow::Result<()> {
    assert!(!iterate(1u64, |x| x + 1).all_match(|x| *x < 50)?);
    assert!(!iterate(1u64, |x| x + 1).none_match(|x| *x == 50)?);
    Ok(())
}

#[test]
fn find_first_and_any() -> anyhow::Result<()> {
    let first = from_vec(people()).filter(|p| p.age == 41).find_first()?;
    assert_eq!(first.map(|p| p.name), Some("xiaoming".to_string()));
    assert!(from_vec(people()).find_any()?.is_some());
    assert_eq!(from_vec(Vec::<Person>::new()).find_first()?, None);
    Ok(())
}

#[test]
fn count_min_max() -> anyhow::Result<()> {
    assert_eq!(from_vec(people()).count()?, 4);
    let youngest = from_vec(people()).min_by_key(|p| p.age)?;
    assert_eq!(youngest.map(|p| p.age), Some(12));
    let oldest = from_vec(people()).max_by(|a, b| a.age.cmp(&b.age))?;
    assert_eq!(oldest, Some(Person::new(41, "xiaoming")));
    assert_eq!(from_vec(vec!["pear", "fig", "banana"]).max()?, Some("pear"));
    assert_eq!(empty::<i32>().min_by(|a, b| a.cmp(b))?, None);
    Ok(())
}

#[test]
fn reduce_fold_and_reduce_with() -> anyhow::Result<()> {
    assert_eq!(from_vec(vec![1, 2, 3, 4]).reduce(|a, b| a + b)?, Some(10));
    assert_eq!(empty::<i32>().reduce(|a, b| a + b)?, None);
    assert_eq!(from_vec(vec![1, 2, 3]).fold(10, |a, b| a - b)?, 4);
    assert_eq!(empty::<i32>().fold(10, |a, b| a - b)?, 10);

    let total_age = from_vec(people()).reduce_with(0u32, |n, p| n + p.age, |a, b| a + b)?;
    assert_eq!(total_age, 124);
    Ok(())
}

#[test]
fn sequential_reduce_with_never_combines() -> anyhow::Result<()> {
    let combines = AtomicUsize::new(0);
    let r = from_vec((1..=24).collect::<Vec<i64>>()).reduce_with(
        0i64,
        |a, b| a - b,
        |a, b| {
            combines.fetch_add(1, Ordering::SeqCst);
            a * b
        },
    )?;
    assert_eq!(r, -300);
    assert_eq!(combines.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn for_each_visits_every_element() -> anyhow::Result<()> {
    let total = AtomicUsize::new(0);
    from_vec(vec![1usize, 2, 3]).for_each(|x| {
        total.fetch_add(x, Ordering::SeqCst);
    })?;
    assert_eq!(total.load(Ordering::SeqCst), 6);
    Ok(())
}

#[test]
fn try_map_error_aborts_terminal() {
    let res = from_vec(vec!["4", "five", "6"]).try_map(|s| Ok(s.parse::<i32>()?)).sum();
    assert!(res.is_err());
}
