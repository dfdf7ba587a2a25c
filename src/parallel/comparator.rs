use std::cmp::Ordering;
use crate::core::keys::RecordKey;
use crate::core::types::Student;

/// Orders students by roll number using the key's own strategy.
pub fn by_roll_number<R: RecordKey, C: RecordKey>(a: &Student<R, C>, b: &Student<R, C>) -> bool {
    a.roll_number.key_less(&b.roll_number)
}

/// Orders students by name, ignoring case, with roll number as tie-break.
/// Unnamed students come after every named one.
pub fn by_name<R: RecordKey, C: RecordKey>(a: &Student<R, C>, b: &Student<R, C>) -> bool {
    match (a.name(), b.name()) {
        (Some(left), Some(right)) => match compare_ignore_case(left, right) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => by_roll_number(a, b),
        },
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => by_roll_number(a, b),
    }
}

/// Lexicographic comparison on lower-cased characters.
pub fn compare_ignore_case(left: &str, right: &str) -> Ordering {
    let left = left.chars().flat_map(char::to_lowercase);
    let right = right.chars().flat_map(char::to_lowercase);
    left.cmp(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keys::ByteKey;

    type S = Student<u32, ByteKey>;

    #[test]
    fn case_is_ignored_for_names() {
        assert_eq!(compare_ignore_case("bob", "Bob"), Ordering::Equal);
        assert_eq!(compare_ignore_case("alice", "Bob"), Ordering::Less);
        assert_eq!(compare_ignore_case("Zed", "adam"), Ordering::Greater);
        assert_eq!(compare_ignore_case("Ann", "anna"), Ordering::Less);
    }

    #[test]
    fn name_ties_fall_back_to_roll_number() {
        let lower = S::new("bob", 2, "CSE", 2020);
        let upper = S::new("Bob", 1, "CSE", 2020);
        assert!(by_name(&upper, &lower));
        assert!(!by_name(&lower, &upper));
    }

    #[test]
    fn equal_students_do_not_precede_each_other() {
        let a = S::new("Kim", 4, "ECE", 2021);
        assert!(!by_name(&a, &a.clone()));
        assert!(!by_roll_number(&a, &a.clone()));
    }

    #[test]
    fn unnamed_students_sort_last() {
        let named = S::new("Zoe", 9, "CSD", 2022);
        let unnamed = S::unnamed(1, "CSD", 2022);
        assert!(by_name(&named, &unnamed));
        assert!(!by_name(&unnamed, &named));

        let other_unnamed = S::unnamed(2, "CSD", 2022);
        assert!(by_name(&unnamed, &other_unnamed));
    }

    #[test]
    fn byte_roll_numbers_order_bytewise() {
        let a = Student::<ByteKey, u32>::new("A", "MT2024".into(), "CSE", 2024);
        let b = Student::<ByteKey, u32>::new("B", "MT2025".into(), "CSE", 2024);
        assert!(by_roll_number(&a, &b));
    }
}
