/// Registrar walkthrough
///
/// Demonstrates the main store operations:
/// - Generic records (string and integer course codes)
/// - Loading a generated roster from CSV
/// - Parallel sorting by roll number and by name, with per-thread timings
/// - Cursors over each order view
/// - Grade index queries

use registrar::core::config::Config;
use registrar::core::database::{Database, ViewKind};
use registrar::core::keys::ByteKey;
use registrar::core::types::{Course, Grade, Student};
use registrar::loader::csv::CsvLoader;
use registrar::loader::sample::write_csv;
use registrar::parallel::sorter::ParallelSorter;
use registrar::reader::cursor::StudentCursor;

const RECORDS: usize = 3000;
const SHOWN: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║        Registrar - Student Records Demo       ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Records keyed by string course codes
    println!("String course codes:");
    let mut iiitd: Database<u32, ByteKey> = Database::new();
    iiitd.append(
        Student::new("Adarsh Kumar", 2020101, "CSE", 2020)
            .with_completed_course(Course::graded("OOPD".into(), "Object Oriented Programming", Grade::new(9)?))
            .with_current_course(Course::in_progress("DSA".into(), "Data Structures")),
    )?;
    iiitd.append(
        Student::new("Priya Singh", 2020102, "ECE", 2020)
            .with_completed_course(Course::graded("EM".into(), "Electromagnetics", Grade::new(8)?)),
    )?;
    for student in iiitd.students() {
        println!("  {}", student);
    }

    // Step 2: Records keyed by integer course codes
    println!("\nInteger course codes:");
    let mut iitd: Database<u32, i32> = Database::new();
    iitd.append(
        Student::new("Rahul Verma", 2020201, "CSE", 2020)
            .with_completed_course(Course::graded(101, "Programming", Grade::new(10)?)),
    )?;
    iitd.append(
        Student::new("Sneha Patel", 2020202, "ME", 2020)
            .with_completed_course(Course::graded(201, "Mechanics", Grade::new(7)?)),
    )?;
    for student in iitd.students() {
        println!("  {}", student);
    }

    // Step 3: Load a generated roster
    let dir = std::env::temp_dir().join("registrar_demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("students.csv");
    write_csv(&path, RECORDS)?;

    let config = Config::with_available_parallelism();
    let mut db: Database<u32, ByteKey> = Database::with_config(config.clone())?;
    let summary = CsvLoader::new().load_file(&path, &mut db)?;
    println!("\nLoaded {} students ({} rows skipped)", summary.loaded, summary.skipped);
    db.prepare_views()?;

    // Step 4: Sort both views
    let sorter = ParallelSorter::from_config(&config);
    println!("\nSorting by roll number with {} threads...", sorter.workers());
    db.sort_view(ViewKind::ByRollNumber, &sorter)?;
    for timing in sorter.thread_times() {
        println!("  {}", timing);
    }

    println!("\nSorting by name with {} threads...", sorter.workers());
    let report = db.sort_view(ViewKind::ByName, &sorter)?;
    for timing in &report.timings {
        println!("  {}", timing);
    }
    println!("  merged {} chunks in {} microseconds", report.merges, report.merge_elapsed_micros);

    // Step 5: Walk each view
    for (label, kind) in [
        ("insertion order", ViewKind::Insertion),
        ("roll number order", ViewKind::ByRollNumber),
        ("name order", ViewKind::ByName),
    ] {
        println!("\nFirst {} in {}:", SHOWN, label);
        let mut cursor = db.cursor(kind)?;
        let mut shown = 0;
        while cursor.has_next() && shown < SHOWN {
            if let Some(student) = cursor.next() {
                println!("  {}", student);
            }
            shown += 1;
        }
    }

    // Step 6: Grade index
    db.build_grade_index()?;
    let course = ByteKey::from("oopd").to_ascii_uppercase();
    let hits = db.query_by_grade(&course, 9);
    println!("\nStudents with grade >= 9 in {}: {}", course, hits.len());
    for student in db.query_cursor(&course, 9).take(SHOWN) {
        println!("  {}", student);
    }
    if hits.len() > SHOWN {
        println!("  ... and {} more", hits.len() - SHOWN);
    }

    println!("\nStatistics:\n{}", db.stats().to_json());

    std::fs::remove_file(&path)?;
    Ok(())
}
