use proptest::prelude::*;
use registrar::core::database::{Database, ViewKind};
use registrar::core::keys::ByteKey;
use registrar::core::types::{Course, Grade, RecordId, Student};
use registrar::parallel::comparator::{by_name, by_roll_number};
use registrar::parallel::sorter::{ParallelSorter, chunk_bounds};

const COURSES: [&str; 4] = ["OOPD", "DSA", "oopd", "AI"];
const NAMES: [&str; 5] = ["ann", "Ann", "bob", "Cy", "cy"];

type Db = Database<i64, ByteKey>;

fn arb_student() -> impl Strategy<Value = Student<i64, ByteKey>> {
    (
        prop::option::weighted(0.9, prop::sample::select(NAMES.to_vec())),
        -50i64..50,
        prop::collection::vec((prop::sample::select(COURSES.to_vec()), 0u8..=10), 0..4),
    )
        .prop_map(|(name, roll, courses)| {
            let mut student = match name {
                Some(name) => Student::new(name, roll, "CSE", 2020),
                None => Student::unnamed(roll, "CSE", 2020),
            };
            for (course, grade) in courses {
                student.add_completed_course(Course::graded(course.into(), course, Grade::new(grade).unwrap()));
            }
            student
        })
}

fn load(students: Vec<Student<i64, ByteKey>>) -> Db {
    let mut db = Db::new();
    for student in students {
        db.append(student).unwrap();
    }
    db.prepare_views().unwrap();
    db
}

fn reference_order(db: &Db, less: fn(&Student<i64, ByteKey>, &Student<i64, ByteKey>) -> bool) -> Vec<RecordId> {
    let mut ids = db.insertion_order().to_vec();
    ids.sort_by(|a, b| {
        let (a, b) = (db.get(*a).unwrap(), db.get(*b).unwrap());
        if less(a, b) {
            std::cmp::Ordering::Less
        } else if less(b, a) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });
    ids
}

proptest! {
    #[test]
    fn matches_single_threaded_stable_sort(
        students in prop::collection::vec(arb_student(), 0..40),
        workers in 1usize..9,
    ) {
        let mut db = load(students);
        let sorter = ParallelSorter::new(workers);

        db.sort_view(ViewKind::ByRollNumber, &sorter).unwrap();
        db.sort_view(ViewKind::ByName, &sorter).unwrap();

        prop_assert_eq!(db.sorted_by_roll_number().to_vec(), reference_order(&db, by_roll_number));
        prop_assert_eq!(db.sorted_by_name().to_vec(), reference_order(&db, by_name));
    }

    #[test]
    fn views_are_permutations_of_the_store(
        students in prop::collection::vec(arb_student(), 0..40),
        workers in 1usize..6,
    ) {
        let mut db = load(students);
        let sorter = ParallelSorter::new(workers);
        db.sort_view(ViewKind::ByRollNumber, &sorter).unwrap();
        db.sort_view(ViewKind::ByName, &sorter).unwrap();

        let expected: Vec<RecordId> = (0..db.len() as u32).map(RecordId).collect();
        prop_assert_eq!(db.insertion_order().to_vec(), expected.clone());
        for kind in [ViewKind::ByRollNumber, ViewKind::ByName] {
            let mut ids = db.view(kind).to_vec();
            prop_assert_eq!(ids.len(), db.len());
            ids.sort();
            prop_assert_eq!(ids, expected.clone());
        }
    }

    #[test]
    fn sorting_is_idempotent(
        students in prop::collection::vec(arb_student(), 0..40),
        workers in 1usize..6,
    ) {
        let mut db = load(students);
        let sorter = ParallelSorter::new(workers);
        db.sort_view(ViewKind::ByName, &sorter).unwrap();
        let once = db.sorted_by_name().to_vec();
        db.sort_view(ViewKind::ByName, &sorter).unwrap();
        prop_assert_eq!(db.sorted_by_name().to_vec(), once);
    }

    #[test]
    fn empty_chunks_report_zero_time(
        keys in prop::collection::vec(any::<u32>(), 0..12),
        workers in 1usize..16,
    ) {
        let mut keys = keys;
        let sorter = ParallelSorter::new(workers);
        let report = sorter.sort(&mut keys, |a: &u32, b: &u32| a < b).unwrap();

        prop_assert_eq!(report.timings.len(), workers);
        for (timing, range) in report.timings.iter().zip(chunk_bounds(keys.len(), workers)) {
            prop_assert_eq!((timing.start, timing.end), (range.start, range.end));
            if range.is_empty() {
                prop_assert_eq!(timing.elapsed_micros, 0);
            } else {
                prop_assert!(timing.elapsed_micros >= 1);
            }
        }
        prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn grade_index_matches_scan(students in prop::collection::vec(arb_student(), 0..40)) {
        let mut db = load(students);
        db.build_grade_index().unwrap();

        for course in COURSES {
            let course = ByteKey::from(course);
            prop_assert_eq!(db.query_by_grade(&course, 9).to_vec(), db.scan_by_grade(&course, 9));
            for other in [0u8, 8, 10] {
                prop_assert!(db.query_by_grade(&course, other).is_empty());
            }
        }
    }
}
