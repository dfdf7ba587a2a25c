use crate::core::keys::RecordKey;
use crate::core::types::{RecordId, Student};

/// Rewindable traversal over one order of students.
///
/// `next` yields `None` once the order is exhausted and keeps doing so until
/// `reset`. Cursors never modify the order they walk.
pub trait StudentCursor<'a, R: RecordKey, C: RecordKey>: Iterator<Item = &'a Student<R, C>> {
    fn has_next(&self) -> bool;

    fn reset(&mut self);
}

/// Which order a cursor was opened on. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Insertion,
    Sorted,
    Filtered,
}

#[derive(Debug, Clone)]
pub struct ViewCursor<'a, R: RecordKey, C: RecordKey> {
    students: &'a [Student<R, C>],
    view: &'a [RecordId],
    position: usize,
    kind: CursorKind,
}

impl<'a, R: RecordKey, C: RecordKey> ViewCursor<'a, R, C> {
    pub fn new(students: &'a [Student<R, C>], view: &'a [RecordId], kind: CursorKind) -> Self {
        ViewCursor { students, view, position: 0, kind }
    }

    pub fn insertion(students: &'a [Student<R, C>], view: &'a [RecordId]) -> Self {
        Self::new(students, view, CursorKind::Insertion)
    }

    pub fn sorted(students: &'a [Student<R, C>], view: &'a [RecordId]) -> Self {
        Self::new(students, view, CursorKind::Sorted)
    }

    pub fn filtered(students: &'a [Student<R, C>], view: &'a [RecordId]) -> Self {
        Self::new(students, view, CursorKind::Filtered)
    }

    pub fn kind(&self) -> CursorKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.view.len() - self.position
    }
}

impl<'a, R: RecordKey, C: RecordKey> Iterator for ViewCursor<'a, R, C> {
    type Item = &'a Student<R, C>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.view.get(self.position)?;
        self.position += 1;
        self.students.get(id.index())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<'a, R: RecordKey, C: RecordKey> StudentCursor<'a, R, C> for ViewCursor<'a, R, C> {
    fn has_next(&self) -> bool {
        self.position < self.view.len()
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn students() -> Vec<Student<u32, u32>> {
        (0..3).map(|i| Student::new(format!("S{}", i), 100 + i, "CSE", 2020)).collect()
    }

    #[test]
    fn walks_view_order_then_exhausts() {
        let students = students();
        let view = [RecordId(2), RecordId(0), RecordId(1)];
        let mut cursor = ViewCursor::sorted(&students, &view);

        let rolls: Vec<u32> = cursor.by_ref().map(|s| s.roll_number).collect();
        assert_eq!(rolls, vec![102, 100, 101]);
        assert!(!cursor.has_next());
        assert!(cursor.next().is_none());
        assert!(cursor.next().is_none());
    }

    #[test]
    fn reset_rewinds_without_touching_view() {
        let students = students();
        let view = [RecordId(1), RecordId(0)];
        let mut cursor = ViewCursor::filtered(&students, &view);

        assert_eq!(cursor.next().map(|s| s.roll_number), Some(101));
        cursor.reset();
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.next().map(|s| s.roll_number), Some(101));
        assert_eq!(view, [RecordId(1), RecordId(0)]);
    }

    #[test]
    fn many_cursors_share_one_view() {
        let students = students();
        let view = [RecordId(0), RecordId(1), RecordId(2)];
        let mut first = ViewCursor::insertion(&students, &view);
        let second = ViewCursor::insertion(&students, &view);

        first.next();
        assert_eq!(first.remaining(), 2);
        assert_eq!(second.count(), 3);
    }

    #[test]
    fn empty_view_has_nothing() {
        let students = students();
        let mut cursor = ViewCursor::filtered(&students, &[]);
        assert!(!cursor.has_next());
        assert!(cursor.next().is_none());
        assert_eq!(cursor.kind(), CursorKind::Filtered);
    }
}
