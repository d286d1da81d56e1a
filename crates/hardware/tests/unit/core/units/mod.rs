pub mod segment;
pub mod tlb;
