pub mod num_utils;
