pub mod core;
pub mod index;
pub mod parallel;
pub mod reader;
pub mod loader;

/*
┌──────────────────────────────────────── REGISTRAR LAYOUT ─────────────────────────────────────────┐
│                                                                                                   │
│  loader::csv / loader::sample          (text in, StudentRow out)                                  │
│              │                                                                                    │
│              ▼  append (single writer)                                                            │
│  ┌─────────────────────────────── struct Database<R, C> ───────────────────────────────┐         │
│  │ students: Vec<Student<R, C>>      // append-only, geometric growth                   │         │
│  │ views.insertion: Vec<RecordId>    // never reordered                                 │         │
│  │ views.by_roll_number              // reordered by ParallelSorter                     │         │
│  │ views.by_name                     // reordered by ParallelSorter                     │         │
│  │ grade_index: GradeIndex<C>        // (course, 9) -> Vec<RecordId>, rebuilt on demand │         │
│  └──────────────────────────────────────────────────────────────────────────────────────┘         │
│              │                                    │                                               │
│              ▼ sort_view                          ▼ cursor / query_cursor                         │
│  parallel::sorter::ParallelSorter         reader::cursor::ViewCursor                              │
│   1. split view into N chunks              has_next / next / reset over any                       │
│   2. merge_sort each chunk on a             &[RecordId] (read-only)                               │
│      scoped thread, timing each                                                                   │
│   3. join all workers                                                                             │
│   4. fold chunk i into sorted prefix                                                              │
│      on the calling thread                                                                        │
│                                                                                                   │
└───────────────────────────────────────────────────────────────────────────────────────────────────┘
*/
