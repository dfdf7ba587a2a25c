use tracing::{debug, info};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::keys::RecordKey;
use crate::core::stats::DatabaseStats;
use crate::core::types::{RecordId, Student};
use crate::index::grade_index::GradeIndex;
use crate::parallel::comparator::{by_name, by_roll_number};
use crate::parallel::sorter::{ParallelSorter, SortReport};
use crate::reader::cursor::{CursorKind, ViewCursor};

/// The three traversal orders kept over the same students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Insertion,
    ByRollNumber,
    ByName,
}

#[derive(Debug, Clone, Default)]
struct OrderViews {
    insertion: Vec<RecordId>,
    by_roll_number: Vec<RecordId>,
    by_name: Vec<RecordId>,
}

/// Append-only student store with order views and a grade index.
///
/// Lifecycle: append every student, call [`Database::prepare_views`], then sort,
/// traverse and query. Students never move once appended, so views and index
/// entries are plain positions into the backing storage. Appending after
/// `prepare_views` leaves the views stale until they are prepared again.
#[derive(Debug, Clone)]
pub struct Database<R: RecordKey, C: RecordKey> {
    config: Config,
    students: Vec<Student<R, C>>,
    views: OrderViews,
    grade_index: GradeIndex<C>,
}

impl<R: RecordKey, C: RecordKey> Database<R, C> {
    pub fn new() -> Self {
        let config = Config::default();
        let grade_index = GradeIndex::new(config.index_initial_entries);
        Database {
            config,
            students: Vec::new(),
            views: OrderViews::default(),
            grade_index,
        }
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let grade_index = GradeIndex::new(config.index_initial_entries);
        Ok(Database {
            config,
            students: Vec::new(),
            views: OrderViews::default(),
            grade_index,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stores `student` and stamps its insertion sequence.
    ///
    /// Storage grows geometrically: `initial_capacity` on first use, doubling
    /// whenever full. Allocation failure is the only error.
    pub fn append(&mut self, mut student: Student<R, C>) -> Result<RecordId> {
        let len = self.students.len();
        if len == self.students.capacity() {
            let target = if len == 0 { self.config.initial_capacity } else { len * 2 };
            self.students.try_reserve_exact(target - len)?;
            debug!(from = len, to = self.students.capacity(), "student storage grown");
        }

        let seq = u32::try_from(len)
            .map_err(|_| Error::new(ErrorKind::OutOfMemory, "student count exceeds u32 range"))?;
        student.insertion_seq = seq;
        self.students.push(student);
        Ok(RecordId(seq))
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.students.capacity()
    }

    pub fn get(&self, id: RecordId) -> Option<&Student<R, C>> {
        self.students.get(id.index())
    }

    pub fn students(&self) -> &[Student<R, C>] {
        &self.students
    }

    /// Rebuilds all three views in insertion order, discarding earlier sorts.
    pub fn prepare_views(&mut self) -> Result<()> {
        let len = self.students.len();
        let mut insertion = Vec::new();
        insertion.try_reserve_exact(len)?;
        insertion.extend((0..len as u32).map(RecordId));

        let mut by_roll_number = Vec::new();
        by_roll_number.try_reserve_exact(len)?;
        by_roll_number.extend_from_slice(&insertion);

        let mut by_name = Vec::new();
        by_name.try_reserve_exact(len)?;
        by_name.extend_from_slice(&insertion);

        self.views = OrderViews { insertion, by_roll_number, by_name };
        info!(records = len, "order views prepared");
        Ok(())
    }

    /// True when the views cover every stored student.
    pub fn views_current(&self) -> bool {
        self.views.insertion.len() == self.students.len()
    }

    pub fn view(&self, kind: ViewKind) -> &[RecordId] {
        match kind {
            ViewKind::Insertion => &self.views.insertion,
            ViewKind::ByRollNumber => &self.views.by_roll_number,
            ViewKind::ByName => &self.views.by_name,
        }
    }

    pub fn insertion_order(&self) -> &[RecordId] {
        self.view(ViewKind::Insertion)
    }

    pub fn sorted_by_roll_number(&self) -> &[RecordId] {
        self.view(ViewKind::ByRollNumber)
    }

    pub fn sorted_by_name(&self) -> &[RecordId] {
        self.view(ViewKind::ByName)
    }

    /// Sorts a view with the comparator that matches its kind.
    pub fn sort_view(&mut self, kind: ViewKind, sorter: &ParallelSorter) -> Result<SortReport> {
        match kind {
            ViewKind::ByName => self.sort_view_with(kind, sorter, by_name::<R, C>),
            _ => self.sort_view_with(kind, sorter, by_roll_number::<R, C>),
        }
    }

    /// Sorts a view with a caller-supplied strict "a precedes b" comparator.
    pub fn sort_view_with<F>(&mut self, kind: ViewKind, sorter: &ParallelSorter, less: F) -> Result<SortReport>
    where
        F: Fn(&Student<R, C>, &Student<R, C>) -> bool + Sync,
    {
        self.ensure_views_current()?;
        let students = &self.students;
        let view = match kind {
            ViewKind::Insertion => {
                return Err(Error::new(ErrorKind::InvalidArgument, "the insertion view is never reordered"));
            }
            ViewKind::ByRollNumber => &mut self.views.by_roll_number,
            ViewKind::ByName => &mut self.views.by_name,
        };

        sorter.sort(view, |a: &RecordId, b: &RecordId| {
            less(&students[a.index()], &students[b.index()])
        })
    }

    /// Recomputes the grade index from every stored student.
    pub fn build_grade_index(&mut self) -> Result<()> {
        self.grade_index.build(&self.students)?;
        info!(
            entries = self.grade_index.entry_count(),
            references = self.grade_index.reference_count(),
            "grade index built"
        );
        Ok(())
    }

    /// Students with a completed `course` graded at least `min_grade`, from the index.
    ///
    /// Only the threshold 9 is indexed; any other `min_grade`, or a query before
    /// [`Database::build_grade_index`], yields an empty slice.
    pub fn query_by_grade(&self, course: &C, min_grade: u8) -> &[RecordId] {
        if !self.index_is_current() {
            debug!(course = %course, "querying a stale grade index");
        }
        self.grade_index.query(course, min_grade)
    }

    /// Uncached scan for any threshold, in insertion order.
    pub fn scan_by_grade(&self, course: &C, min_grade: u8) -> Vec<RecordId> {
        self.students
            .iter()
            .enumerate()
            .filter(|(_, s)| s.has_grade_in(course, min_grade))
            .map(|(i, _)| RecordId(i as u32))
            .collect()
    }

    pub fn index_is_current(&self) -> bool {
        self.grade_index.indexed_records() == Some(self.students.len())
    }

    pub fn grade_index(&self) -> &GradeIndex<C> {
        &self.grade_index
    }

    /// Cursor over one of the order views.
    pub fn cursor(&self, kind: ViewKind) -> Result<ViewCursor<'_, R, C>> {
        self.ensure_views_current()?;
        let cursor_kind = match kind {
            ViewKind::Insertion => CursorKind::Insertion,
            _ => CursorKind::Sorted,
        };
        Ok(ViewCursor::new(&self.students, self.view(kind), cursor_kind))
    }

    /// Cursor over the indexed result of [`Database::query_by_grade`].
    pub fn query_cursor(&self, course: &C, min_grade: u8) -> ViewCursor<'_, R, C> {
        ViewCursor::filtered(&self.students, self.query_by_grade(course, min_grade))
    }

    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            record_count: self.students.len(),
            capacity: self.students.capacity(),
            views_len: self.views.insertion.len(),
            views_current: self.views_current(),
            index_entries: self.grade_index.entry_count(),
            index_references: self.grade_index.reference_count(),
            index_current: self.index_is_current(),
        }
    }

    fn ensure_views_current(&self) -> Result<()> {
        if self.views_current() {
            return Ok(());
        }
        Err(Error::new(
            ErrorKind::InvalidState,
            format!(
                "order views cover {} of {} students; call prepare_views",
                self.views.insertion.len(),
                self.students.len()
            ),
        ))
    }
}

impl<R: RecordKey, C: RecordKey> Default for Database<R, C> {
    fn default() -> Self {
        Self::new()
    }
}
