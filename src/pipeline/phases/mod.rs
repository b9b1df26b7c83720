// Generation phases
//
// Each phase is a free `execute` function; data flows scan -> extract -> emit
// and no phase calls back into an earlier one.

#[path = "01_scan.rs"]
pub mod scan;
#[path = "02_extract.rs"]
pub mod extract;
#[path = "03_emit.rs"]
pub mod emit;
