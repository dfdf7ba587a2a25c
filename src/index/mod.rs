pub mod grade_index;
