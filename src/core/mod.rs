// The Task Assignment & Achievement Engine.
//
// Four components, leaf-first: the ledger owns the fan-out and the
// per-assignment delivery state, the catalog owns task creation, the
// achievements module decides badge grants, and the directory resolves
// classes and rosters. Handlers stay thin wrappers over these functions.

pub mod achievements;
pub mod catalog;
pub mod directory;
pub mod ledger;
