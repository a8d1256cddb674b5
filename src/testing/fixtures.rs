//! Small fixed datasets.

use serde::{Deserialize, Serialize};

/// A person record with an age and a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Person {
    pub age: u32,
    pub name: String,
}

impl Person {
    pub fn new(age: u32, name: &str) -> Self {
        Self { age, name: name.to_string() }
    }
}

/// Four people; two of them share the age 41 and one name appears twice.
///
/// ```
/// use ironstream::*;
/// use ironstream::testing::people;
///
/// let adults = from_vec(people()).filter(|p| p.age >= 18).count().unwrap();
/// assert_eq!(adults, 3);
/// ```
#[must_use]
pub fn people() -> Vec<Person> {
    vec![
        Person::new(30, "xiaohong"),
        Person::new(41, "xiaoming"),
        Person::new(12, "xiaokang"),
        Person::new(41, "xiaohong"),
    ]
}

/// Classic word count input.
#[must_use]
pub fn word_count_data() -> Vec<String> {
    [
        "the quick brown fox",
        "jumps over the lazy dog",
        "the dog barks",
        "quick quick fox",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
