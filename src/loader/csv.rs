use std::path::Path;
use nom::{IResult, Parser};
use nom::branch::alt;
use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::char;
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, preceded};
use tracing::{info, warn};
use crate::core::database::Database;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::keys::RecordKey;
use crate::core::types::{Course, Grade, Student};

/// Minimum fields in a data row: name, roll number, branch, year.
const REQUIRED_FIELDS: usize = 4;

/// One parsed data row, before it becomes a [`Student`].
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow<R: RecordKey, C: RecordKey> {
    pub name: Option<String>,
    pub roll_number: R,
    pub branch: String,
    pub start_year: i32,
    pub current_courses: Vec<C>,
    pub completed_courses: Vec<(C, Grade)>,
}

impl<R: RecordKey, C: RecordKey> StudentRow<R, C> {
    /// Course display names are the course ids as written in the file.
    pub fn into_student(self) -> Student<R, C> {
        let mut student = match self.name {
            Some(name) => Student::new(name, self.roll_number, self.branch, self.start_year),
            None => Student::unnamed(self.roll_number, self.branch, self.start_year),
        };
        for id in self.current_courses {
            let name = id.to_string();
            student.add_current_course(Course::in_progress(id, name));
        }
        for (id, grade) in self.completed_courses {
            let name = id.to_string();
            student.add_completed_course(Course::graded(id, name, grade));
        }
        student
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Loads `name,roll,branch,year,(course,grade)*` rows into a [`Database`].
///
/// A course with an empty grade is in progress; one with a grade is completed.
/// A trailing course without a grade column is ignored. Short or unparsable
/// rows are skipped and counted, never fatal.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    pub has_header: bool,
}

impl Default for CsvLoader {
    fn default() -> Self {
        CsvLoader { has_header: true }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_file<R: RecordKey, C: RecordKey>(
        &self,
        path: impl AsRef<Path>,
        db: &mut Database<R, C>,
    ) -> Result<LoadSummary> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let summary = self.load_str(&text, db)?;
        info!(
            path = %path.as_ref().display(),
            loaded = summary.loaded,
            skipped = summary.skipped,
            "csv loaded"
        );
        Ok(summary)
    }

    pub fn load_str<R: RecordKey, C: RecordKey>(&self, text: &str, db: &mut Database<R, C>) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();
        let mut header_pending = self.has_header;

        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if header_pending {
                header_pending = false;
                continue;
            }

            let fields = split_fields(line)?;
            match parse_row::<R, C>(&fields) {
                Ok(row) => {
                    db.append(row.into_student())?;
                    summary.loaded += 1;
                }
                Err(err) => {
                    warn!(line = line_no + 1, error = %err, "skipping row");
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Splits one line on commas. Double quotes group text that may contain
/// commas and are dropped from the field value; an unterminated quote runs
/// to the end of the line.
pub fn split_fields(line: &str) -> Result<Vec<String>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    match fields(line) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rest, _)) => Err(Error::new(ErrorKind::Parse, format!("unparsed input near {:?}", rest))),
        Err(e) => Err(Error::new(ErrorKind::Parse, e.to_string())),
    }
}

fn fields(input: &str) -> IResult<&str, Vec<String>> {
    separated_list0(char(','), field).parse(input)
}

fn field(input: &str) -> IResult<&str, String> {
    many0(alt((quoted, unterminated, bare)))
        .map(|segments: Vec<&str>| segments.concat())
        .parse(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c: char| c != '"'), char('"')).parse(input)
}

fn unterminated(input: &str) -> IResult<&str, &str> {
    preceded(char('"'), take_while(|c: char| c != '"')).parse(input)
}

fn bare(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ',' && c != '"').parse(input)
}

/// Converts split fields into a row; any parse failure rejects the whole row.
pub fn parse_row<R: RecordKey, C: RecordKey>(fields: &[String]) -> Result<StudentRow<R, C>> {
    if fields.len() < REQUIRED_FIELDS {
        return Err(Error::new(
            ErrorKind::Parse,
            format!("expected at least {} fields, found {}", REQUIRED_FIELDS, fields.len()),
        ));
    }

    let name = match fields[0].trim() {
        "" => None,
        name => Some(name.to_string()),
    };
    let roll_number = R::parse_key(&fields[1])?;
    let branch = fields[2].trim().to_string();
    let start_year = fields[3].trim().parse::<i32>().map_err(|e| {
        Error::new(ErrorKind::Parse, format!("invalid year {:?}: {}", fields[3], e))
    })?;

    let mut current_courses = Vec::new();
    let mut completed_courses = Vec::new();
    for pair in fields[REQUIRED_FIELDS..].chunks_exact(2) {
        let course = C::parse_key(&pair[0])?;
        match pair[1].trim() {
            "" => current_courses.push(course),
            raw => {
                let value = raw.parse::<u8>().map_err(|e| {
                    Error::new(ErrorKind::Parse, format!("invalid grade {:?}: {}", raw, e))
                })?;
                completed_courses.push((course, Grade::new(value)?));
            }
        }
    }

    Ok(StudentRow {
        name,
        roll_number,
        branch,
        start_year,
        current_courses,
        completed_courses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keys::ByteKey;
    use std::io::Write;

    type Db = Database<u32, ByteKey>;

    #[test]
    fn splits_plain_and_quoted_fields() {
        assert_eq!(split_fields("a,b,,c").unwrap(), vec!["a", "b", "", "c"]);
        assert_eq!(
            split_fields("\"Kumar, Adarsh\",2020101,CSE").unwrap(),
            vec!["Kumar, Adarsh", "2020101", "CSE"]
        );
        assert_eq!(split_fields("x\"y,z\"w,v\r").unwrap(), vec!["xy,zw", "v"]);
        assert_eq!(split_fields("open \"quote, here").unwrap(), vec!["open quote, here"]);
        assert_eq!(split_fields("").unwrap(), vec![""]);
    }

    #[test]
    fn parses_completed_and_current_courses() {
        let fields = split_fields("Priya,2020102,ECE,2020,EM,8,DSA,,OS").unwrap();
        let row = parse_row::<u32, ByteKey>(&fields).unwrap();

        assert_eq!(row.roll_number, 2020102);
        assert_eq!(row.completed_courses, vec![(ByteKey::from("EM"), Grade::new(8).unwrap())]);
        assert_eq!(row.current_courses, vec![ByteKey::from("DSA")]);

        let student = row.into_student();
        assert_eq!(student.completed_courses[0].name, "EM");
        assert!(!student.current_courses[0].is_graded());
    }

    #[test]
    fn rejects_bad_rows() {
        let short = split_fields("Only,Three,Fields").unwrap();
        assert_eq!(parse_row::<u32, ByteKey>(&short).unwrap_err().kind(), ErrorKind::Parse);

        let bad_grade = split_fields("A,1,CSE,2020,AI,11").unwrap();
        assert_eq!(parse_row::<u32, ByteKey>(&bad_grade).unwrap_err().kind(), ErrorKind::InvalidArgument);

        let bad_roll = split_fields("A,x1,CSE,2020").unwrap();
        assert!(parse_row::<u32, ByteKey>(&bad_roll).is_err());
    }

    #[test]
    fn empty_name_loads_as_unnamed() {
        let fields = split_fields(",7,CSB,2023").unwrap();
        let row = parse_row::<u32, ByteKey>(&fields).unwrap();
        assert!(row.into_student().name().is_none());
    }

    #[test]
    fn load_skips_header_blank_and_bad_rows() {
        let text = "Name,RollNumber,Branch,Year,Course1,Grade1\n\
                    Adarsh,2020101,CSE,2020,OOPD,9\n\
                    \n\
                    Broken,row\n\
                    Priya,2020102,ECE,2020,EM,8\n";
        let mut db = Db::new();
        let summary = CsvLoader::new().load_str(text, &mut db).unwrap();

        assert_eq!(summary, LoadSummary { loaded: 2, skipped: 1 });
        assert_eq!(db.len(), 2);
        assert_eq!(db.students()[1].insertion_seq(), 1);
    }

    #[test]
    fn headerless_input_loads_first_line() {
        let loader = CsvLoader { has_header: false };
        let mut db = Db::new();
        loader.load_str("Adarsh,2020101,CSE,2020\n", &mut db).unwrap();
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,RollNumber,Branch,Year").unwrap();
        writeln!(file, "Rahul,2020201,CSE,2020").unwrap();

        let mut db = Db::new();
        let summary = CsvLoader::new().load_file(file.path(), &mut db).unwrap();
        assert_eq!(summary.loaded, 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut db = Db::new();
        let err = CsvLoader::new().load_file("/nonexistent/students.csv", &mut db).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
