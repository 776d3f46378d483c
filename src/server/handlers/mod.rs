pub mod item_list;
pub mod item_selection;
pub mod item_sort;
