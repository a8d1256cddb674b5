//! Algebraic laws that hold for any input and any partitioning.

use ironstream::collectors::*;
use ironstream::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn filter_then_all_match_holds(data in prop::collection::vec(any::<i32>(), 0..200), m in 1i32..10) {
        let kept = from_vec(data.clone()).filter(move |x| x % m == 0).to_vec().unwrap();
        prop_assert!(kept.iter().all(|x| x % m == 0));
        prop_assert!(from_vec(data).filter(move |x| x % m == 0).all_match(|x| x % m == 0).unwrap());
    }

    #[test]
    fn distinct_is_idempotent(data in prop::collection::vec(0u8..20, 0..100)) {
        let once = from_vec(data.clone()).distinct().to_vec().unwrap();
        let twice = from_vec(data).distinct().distinct().to_vec().unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn map_composes(data in prop::collection::vec(any::<i16>(), 0..100)) {
        let f = |x: i16| i32::from(x) * 3;
        let g = |y: i32| y - 7;
        let chained = from_vec(data.clone()).map(f).map(g).to_vec().unwrap();
        let fused = from_vec(data).map(move |x| g(f(x))).to_vec().unwrap();
        prop_assert_eq!(chained, fused);
    }

    #[test]
    fn associative_folds_agree_for_any_partitioning(
        data in prop::collection::vec(-1000i64..1000, 0..300),
        parts in 1usize..40,
    ) {
        let seq = from_vec(data.clone()).fold(0, |a, b| a + b).unwrap();
        let par = from_vec(data.clone()).parallel_with(None, Some(parts)).fold(0, |a, b| a + b).unwrap();
        prop_assert_eq!(seq, par);
        let with = from_vec(data)
            .parallel_with(None, Some(parts))
            .reduce_with(0i64, |a, b| a + b, |a, b| a + b)
            .unwrap();
        prop_assert_eq!(seq, with);
    }

    #[test]
    fn parallel_to_vec_equals_sequential(data in prop::collection::vec(any::<u32>(), 0..300), parts in 1usize..40) {
        let seq = from_vec(data.clone()).map(|x| x / 2).to_vec().unwrap();
        let par = from_vec(data).parallel_with(None, Some(parts)).map(|x| x / 2).to_vec().unwrap();
        prop_assert_eq!(seq, par);
    }

    #[test]
    fn skip_limit_match_slices(data in prop::collection::vec(any::<u8>(), 0..100), s in 0usize..120, l in 0usize..120) {
        let expected: Vec<u8> = data.iter().copied().skip(s).take(l).collect();
        let seq = from_vec(data.clone()).skip(s).limit(l).to_vec().unwrap();
        let par = from_vec(data).parallel_with(None, Some(7)).skip(s).limit(l).to_vec().unwrap();
        prop_assert_eq!(&seq, &expected);
        prop_assert_eq!(&par, &expected);
    }

    #[test]
    fn counting_matches_len(data in prop::collection::vec(any::<bool>(), 0..200)) {
        let n = data.len() as u64;
        prop_assert_eq!(from_vec(data.clone()).count().unwrap(), n);
        prop_assert_eq!(from_vec(data).parallel().collect(counting()).unwrap(), n);
    }
}
