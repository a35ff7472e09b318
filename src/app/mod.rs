// Application layer - Use case interactors

pub mod check_interactor;
pub mod container;
pub mod inspect_interactor;
pub mod worker_interactor;

// Re-export interactors
pub use check_interactor::CheckInteractor;
pub use container::{AppContainer, DefaultAppContainer, Ports};
pub use inspect_interactor::{InspectInteractor, InspectRequest, InspectResponse};
pub use worker_interactor::{WorkerInteractor, WorkerRequest, WorkerResponse};
