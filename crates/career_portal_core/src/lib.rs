pub mod application;
pub mod assistant;
pub mod domain;
pub mod error;
pub mod identity;
pub mod memory;
pub mod normalize;
pub mod notice;
pub mod placeholder;
pub mod portal;
pub mod ports;
pub mod profile;
pub mod search;

pub use application::{ApplyOutcome, ApplyState, InFlightApplies};
pub use assistant::{CareerAssistant, CvSummary};
pub use domain::{
    ApplicantRecord, ApplicationRecord, ApplicationStatus, Collection, Document, Identity,
    JobListing, ResourceCategory, ResourceEntry, ResourceKind, StoredDocument, UserProfile,
};
pub use error::{PortalError, PortalResult};
pub use identity::IdentityCell;
pub use memory::InMemoryDocumentStore;
pub use notice::{Notice, NoticeLevel};
pub use placeholder::Loaded;
pub use portal::{Portal, ProfileOverview};
pub use ports::{
    CareerAssistantService, ChatRole, ChatTurn, DocumentGateway, IdentityObserver, PortError,
    PortResult,
};
pub use profile::ProfileForm;
pub use search::{CategoryFilter, JobFilters};
