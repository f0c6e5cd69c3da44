pub mod release_info;
