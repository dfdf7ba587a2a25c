use tracing::debug;
use crate::core::error::Result;
use crate::core::keys::RecordKey;
use crate::core::types::{RecordId, Student};

/// The only threshold materialized by [`GradeIndex::build`].
pub const INDEXED_MIN_GRADE: u8 = 9;

/// Students holding a completed course at or above `min_grade`.
#[derive(Debug, Clone)]
pub struct GradeEntry<C: RecordKey> {
    pub course: C,
    pub min_grade: u8,
    pub students: Vec<RecordId>,  // Insertion order, no duplicates
}

/// Flat (course, min_grade) -> students table.
///
/// Built by one scan over the store and never updated incrementally; a
/// rebuild discards every entry first. Course matching uses
/// [`RecordKey::key_eq`] for both population and lookup, so byte-string
/// course ids are matched case-sensitively.
#[derive(Debug, Clone)]
pub struct GradeIndex<C: RecordKey> {
    pub entries: Vec<GradeEntry<C>>,
    pub initial_entries: usize,
    indexed_records: Option<usize>,
}

impl<C: RecordKey> GradeIndex<C> {
    pub fn new(initial_entries: usize) -> Self {
        GradeIndex {
            entries: Vec::new(),
            initial_entries: initial_entries.max(1),
            indexed_records: None,
        }
    }

    pub fn build<R: RecordKey>(&mut self, students: &[Student<R, C>]) -> Result<()> {
        self.entries = Vec::new();
        self.indexed_records = None;

        for (position, student) in students.iter().enumerate() {
            let id = RecordId(position as u32);
            for course in &student.completed_courses {
                if course.grade.is_some_and(|g| g.value() >= INDEXED_MIN_GRADE) {
                    self.insert(&course.id, INDEXED_MIN_GRADE, id)?;
                }
            }
        }

        self.indexed_records = Some(students.len());
        debug!(entries = self.entries.len(), records = students.len(), "grade index rebuilt");
        Ok(())
    }

    /// Adds `student` under `(course, min_grade)`, creating the entry on first use.
    pub fn insert(&mut self, course: &C, min_grade: u8, student: RecordId) -> Result<()> {
        let position = match self.find(course, min_grade) {
            Some(position) => position,
            None => {
                self.grow_if_full()?;
                self.entries.push(GradeEntry {
                    course: course.clone(),
                    min_grade,
                    students: Vec::new(),
                });
                self.entries.len() - 1
            }
        };

        let students = &mut self.entries[position].students;
        // A student with two qualifying attempts at one course is listed once.
        if students.last() != Some(&student) {
            students.push(student);
        }
        Ok(())
    }

    /// Students indexed under the exact `(course, min_grade)` key; empty when absent.
    pub fn query(&self, course: &C, min_grade: u8) -> &[RecordId] {
        match self.find(course, min_grade) {
            Some(position) => &self.entries[position].students,
            None => &[],
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.indexed_records = None;
    }

    pub fn is_built(&self) -> bool {
        self.indexed_records.is_some()
    }

    /// Number of records seen by the last build.
    pub fn indexed_records(&self) -> Option<usize> {
        self.indexed_records
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn reference_count(&self) -> usize {
        self.entries.iter().map(|e| e.students.len()).sum()
    }

    fn find(&self, course: &C, min_grade: u8) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.min_grade == min_grade && e.course.key_eq(course))
    }

    fn grow_if_full(&mut self) -> Result<()> {
        let len = self.entries.len();
        if len < self.entries.capacity() {
            return Ok(());
        }
        let target = if len == 0 { self.initial_entries } else { len * 2 };
        self.entries.try_reserve_exact(target - len)?;
        Ok(())
    }
}
