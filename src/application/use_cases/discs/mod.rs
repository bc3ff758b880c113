pub mod list_discs;
