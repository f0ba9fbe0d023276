pub mod moviebox;
