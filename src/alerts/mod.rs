//! Alert view logic: predicates, view composition, table state, suggestions.

pub mod filter;
pub mod suggest;
pub mod table;
pub mod view;

pub use table::{Pagination, RowSelection};
pub use view::{extra_columns, filter_and_sort, table_columns, AlertColumn};
