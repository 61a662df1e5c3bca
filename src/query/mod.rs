pub mod columns;
pub mod sql;
