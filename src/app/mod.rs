// Application layer - Use case interactors

pub mod apply_interactor;
pub mod container;
pub mod edit_interactor;
pub mod probe_interactor;

// Re-export interactors
pub use apply_interactor::ApplyInteractor;
pub use edit_interactor::{EditInteractor, EditWorkflow};
pub use probe_interactor::ProbeInteractor;
