pub mod catalog_gen;
