pub mod banner;
pub mod carousel_row;
pub mod detail_overlay;
pub mod header;
pub mod help_overlay;
pub mod search_view;
