use std::fmt;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::keys::RecordKey;

/// Stable position of a student in the store's backing storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub u32);

impl RecordId {
    pub fn new(id: u32) -> Self {
        RecordId(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        RecordId(id)
    }
}

/// A grade on the 0..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade(u8);

impl Grade {
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("grade {} outside 0..={}", value, Self::MAX),
            ));
        }
        Ok(Grade(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Course<C: RecordKey> {
    pub id: C,
    pub name: String,
    pub grade: Option<Grade>,  // None while the course is in progress
}

impl<C: RecordKey> Course<C> {
    pub fn graded(id: C, name: impl Into<String>, grade: Grade) -> Self {
        Course { id, name: name.into(), grade: Some(grade) }
    }

    pub fn in_progress(id: C, name: impl Into<String>) -> Self {
        Course { id, name: name.into(), grade: None }
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Student<R: RecordKey, C: RecordKey> {
    pub name: Option<String>,
    pub roll_number: R,
    pub branch: String,
    pub start_year: i32,
    pub current_courses: Vec<Course<C>>,
    pub completed_courses: Vec<Course<C>>,
    pub(crate) insertion_seq: u32,
}

impl<R: RecordKey, C: RecordKey> Student<R, C> {
    pub fn new(name: impl Into<String>, roll_number: R, branch: impl Into<String>, start_year: i32) -> Self {
        Self::with_name(Some(name.into()), roll_number, branch, start_year)
    }

    /// Student without a name; sorts after every named student.
    pub fn unnamed(roll_number: R, branch: impl Into<String>, start_year: i32) -> Self {
        Self::with_name(None, roll_number, branch, start_year)
    }

    fn with_name(name: Option<String>, roll_number: R, branch: impl Into<String>, start_year: i32) -> Self {
        Student {
            name,
            roll_number,
            branch: branch.into(),
            start_year,
            current_courses: Vec::new(),
            completed_courses: Vec::new(),
            insertion_seq: 0,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn roll_number(&self) -> &R {
        &self.roll_number
    }

    /// Position at which the store received this student. Zero until appended.
    pub fn insertion_seq(&self) -> u32 {
        self.insertion_seq
    }

    pub fn add_current_course(&mut self, course: Course<C>) {
        self.current_courses.push(course);
    }

    pub fn add_completed_course(&mut self, course: Course<C>) {
        self.completed_courses.push(course);
    }

    pub fn with_current_course(mut self, course: Course<C>) -> Self {
        self.add_current_course(course);
        self
    }

    pub fn with_completed_course(mut self, course: Course<C>) -> Self {
        self.add_completed_course(course);
        self
    }

    /// True when a completed course matches `course` with a grade of at least `min_grade`.
    pub fn has_grade_in(&self, course: &C, min_grade: u8) -> bool {
        self.completed_courses.iter().any(|c| {
            c.id.key_eq(course) && c.grade.is_some_and(|g| g.value() >= min_grade)
        })
    }
}

impl<R: RecordKey, C: RecordKey> fmt::Display for Student<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Name: {}, Roll: {}, Branch: {}, Year: {}",
            self.name().unwrap_or("<unnamed>"),
            self.roll_number,
            self.branch,
            self.start_year,
        )?;
        if !self.completed_courses.is_empty() {
            write!(f, ", Completed: [")?;
            for (i, course) in self.completed_courses.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                match course.grade {
                    Some(grade) => write!(f, "{}({})", course.id, grade)?,
                    None => write!(f, "{}(-)", course.id)?,
                }
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
