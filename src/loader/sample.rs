use std::fmt::Write as _;
use std::path::Path;
use crate::core::error::Result;

pub const HEADER: &str = "Name,RollNumber,Branch,Year,Course1,Grade1,Course2,Grade2";

const BRANCHES: [&str; 5] = ["CSE", "ECE", "CSAM", "CSD", "CSB"];
const COURSES: [&str; 7] = ["OOPD", "DSA", "OS", "CN", "DBMS", "AI", "ML"];

/// Deterministic sample roster with `records` rows.
///
/// Roll numbers are scrambled (`2020000 + i * 7919 % records`) so the data
/// arrives unsorted; every third row takes OOPD and grades cycle 6..=10.
pub fn generate_csv(records: usize) -> String {
    let mut out = String::with_capacity(64 * (records + 1));
    out.push_str(HEADER);
    out.push('\n');

    for i in 0..records {
        let roll = 2_020_000 + (i * 7919) % records;
        let branch = BRANCHES[i % BRANCHES.len()];
        let year = 2020 + i % 4;
        let first = if i % 3 == 0 { "OOPD" } else { COURSES[i % COURSES.len()] };
        let second = COURSES[(i + 1) % COURSES.len()];
        let grade = 6 + i % 5;

        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "Student{},{},{},{},{},{},{},{}",
            i + 1, roll, branch, year, first, grade, second, grade
        );
    }

    out
}

pub fn write_csv(path: impl AsRef<Path>, records: usize) -> Result<()> {
    std::fs::write(path, generate_csv(records))?;
    Ok(())
}
