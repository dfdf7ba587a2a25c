pub mod merge;
pub mod sorter;
pub mod comparator;
