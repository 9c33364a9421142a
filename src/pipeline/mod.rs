pub mod extraction;
pub mod analysis;
pub mod diagnostic; // Analysis dump (CLAUSE_LENS_DUMP_DIR)
